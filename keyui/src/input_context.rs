//! One layer of longest-prefix matching: bytes→terminal keys, or keys→macro
//! expansions. Corresponds to `kui_context` in `kui.c`.
//!
//! An [`InputContext`] pulls one-at-a-time [`LogicalKey`] values from a
//! [`KeySource`], feeds them through its attached [`MapSet`]'s trie, and
//! yields either a resolved key or a freshly expanded mapping's value
//! sequence. It owns two queues: the *primary buffer*, a pushback/replay
//! FIFO that `find_char` drains before ever calling the source, and the
//! *volatile buffer*, the log of keys consumed during the current match
//! attempt, restored onto the primary buffer whenever that attempt ends
//! without completing a longer match.

use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use crate::keyseq::LogicalKey;
use crate::mapset::{MapSet, Mapping};
use crate::trie::TrieState;

/// What a [`KeySource`] produced for one requested key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOutcome {
    Key(LogicalKey),
    /// No key arrived within the requested timeout.
    Timeout,
}

/// Where an [`InputContext`] pulls keys from: a raw byte reader for the
/// terminal layer, or an upstream `InputContext` for the user layer. Never
/// stored across calls — built fresh at each `get_key`/`find_key` call site
/// so the user layer's source is a one-way borrow of the terminal layer,
/// not a stored cyclic reference.
pub trait KeySource {
    async fn next_key(&mut self, timeout_ms: u64) -> io::Result<SourceOutcome>;
}

/// Outcome of one [`InputContext::find_key`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindKeyOutcome {
    /// A key is ready to return to the caller.
    Key(LogicalKey),
    /// A mapping was just expanded; its value sequence (and any overconsumed
    /// keys) are now queued on the primary buffer. The caller should call
    /// `find_key` again to retrieve the first of them.
    Expanded,
    /// No key arrived before the configured timeout elapsed.
    Timeout,
}

/// One matching layer. See the module docs.
pub struct InputContext {
    map_set: Option<MapSet>,
    primary: VecDeque<LogicalKey>,
    volatile: VecDeque<LogicalKey>,
    timeout_ms: u64,
}

impl InputContext {
    pub fn new(map_set: Option<MapSet>, timeout_ms: u64) -> Self {
        Self { map_set, primary: VecDeque::new(), volatile: VecDeque::new(), timeout_ms }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn set_timeout_ms(&mut self, timeout_ms: u64) {
        self.timeout_ms = timeout_ms;
    }

    pub fn map_set(&self) -> Option<&MapSet> {
        self.map_set.as_ref()
    }

    pub fn set_map_set(&mut self, map_set: Option<MapSet>) {
        self.map_set = map_set;
    }

    /// `true` if a call to `get_key` could return without touching `source`
    /// — i.e. the primary buffer already has something queued.
    pub fn can_get_key(&self) -> bool {
        !self.primary.is_empty()
    }

    /// Read one underlying key: pop the primary buffer if non-empty,
    /// otherwise pull from `source` with this context's configured timeout.
    async fn find_char<S: KeySource>(&mut self, source: &mut S) -> io::Result<Option<LogicalKey>> {
        if let Some(k) = self.primary.pop_front() {
            return Ok(Some(k));
        }
        match source.next_key(self.timeout_ms).await? {
            SourceOutcome::Key(k) => Ok(Some(k)),
            SourceOutcome::Timeout => Ok(None),
        }
    }

    /// Resolve one key: run it through the attached map-set's trie,
    /// replaying or expanding as needed.
    pub async fn find_key<S: KeySource>(&mut self, source: &mut S) -> io::Result<FindKeyOutcome> {
        self.volatile.clear();

        let Some(map_set) = self.map_set.as_mut() else {
            return Ok(match self.find_char(source).await? {
                Some(k) => FindKeyOutcome::Key(k),
                None => FindKeyOutcome::Timeout,
            });
        };

        let trie = map_set.trie_mut();
        trie.reset();
        loop {
            let Some(k) = self.find_char(source).await? else { break };
            self.volatile.push_back(k);
            let outcome = trie.push(k);
            if outcome.found_mapping {
                self.volatile.clear();
            }
            if trie.state() != TrieState::Matching {
                break;
            }
        }
        trie.finalize();

        if let Some(mapping) = trie.value() {
            let mapping: Rc<Mapping> = Rc::clone(mapping);
            self.replay_front(self.volatile.len());
            for &k in mapping.value_seq.iter().rev() {
                self.primary.push_front(k);
            }
            return Ok(FindKeyOutcome::Expanded);
        }

        match self.volatile.pop_front() {
            Some(k) => {
                self.replay_front(self.volatile.len());
                Ok(FindKeyOutcome::Key(k))
            }
            None => Ok(FindKeyOutcome::Timeout),
        }
    }

    /// Drain the first `count` entries of the volatile buffer back onto the
    /// front of the primary buffer, preserving arrival order.
    fn replay_front(&mut self, count: usize) {
        let drained: Vec<LogicalKey> = self.volatile.drain(..count).collect();
        for k in drained.into_iter().rev() {
            self.primary.push_front(k);
        }
    }

    /// Repeat `find_key` until it yields a resolved key (driving through any
    /// number of chained macro expansions transparently) or a timeout.
    pub async fn get_key<S: KeySource>(&mut self, source: &mut S) -> io::Result<Option<LogicalKey>> {
        loop {
            match self.find_key(source).await? {
                FindKeyOutcome::Key(k) => return Ok(Some(k)),
                FindKeyOutcome::Expanded => continue,
                FindKeyOutcome::Timeout => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyseq::NamedKey;
    use std::cell::RefCell;

    /// Scripted source: a fixed queue of outcomes, consumed in order.
    struct ScriptedSource {
        script: VecDeque<SourceOutcome>,
        reads: RefCell<usize>,
    }

    impl ScriptedSource {
        fn bytes(bytes: &[u8]) -> Self {
            Self {
                script: bytes.iter().map(|&b| SourceOutcome::Key(LogicalKey::Byte(b))).collect(),
                reads: RefCell::new(0),
            }
        }

        fn bytes_then_timeout(bytes: &[u8]) -> Self {
            let mut s = Self::bytes(bytes);
            s.script.push_back(SourceOutcome::Timeout);
            s
        }
    }

    impl KeySource for ScriptedSource {
        async fn next_key(&mut self, _timeout_ms: u64) -> io::Result<SourceOutcome> {
            *self.reads.borrow_mut() += 1;
            Ok(self.script.pop_front().unwrap_or(SourceOutcome::Timeout))
        }
    }

    fn seq(bytes: &[u8]) -> crate::keyseq::KeySeq {
        bytes.iter().map(|&b| LogicalKey::Byte(b)).collect()
    }

    async fn get_all(ctx: &mut InputContext, source: &mut ScriptedSource, n: usize) -> Vec<LogicalKey> {
        let mut out = Vec::new();
        for _ in 0..n {
            out.push(ctx.get_key(source).await.unwrap().expect("expected a key, got timeout"));
        }
        out
    }

    #[tokio::test]
    async fn order_preservation_with_no_mapset() {
        let mut ctx = InputContext::new(None, 100);
        let mut source = ScriptedSource::bytes(b"hello");
        let out = get_all(&mut ctx, &mut source, 5).await;
        assert_eq!(out, seq(b"hello"));
    }

    #[tokio::test]
    async fn byte_exact_replay_on_failed_match() {
        let mut ms = MapSet::new();
        ms.register("abc", "xyz").unwrap();
        let mut ctx = InputContext::new(Some(ms), 100);
        let mut source = ScriptedSource::bytes(b"abd");
        let out = get_all(&mut ctx, &mut source, 3).await;
        assert_eq!(out, seq(b"abd"));
    }

    #[tokio::test]
    async fn expansion_on_success() {
        let mut ms = MapSet::new();
        ms.register("abc", "xyz").unwrap();
        let mut ctx = InputContext::new(Some(ms), 100);
        let mut source = ScriptedSource::bytes(b"abc");
        let out = get_all(&mut ctx, &mut source, 3).await;
        assert_eq!(out, seq(b"xyz"));
    }

    #[tokio::test]
    async fn subset_longest_match_with_timeout() {
        let mut ms = MapSet::new();
        ms.register("abc", "X").unwrap();
        ms.register("abcde", "Y").unwrap();
        let mut ctx = InputContext::new(Some(ms), 100);
        let mut source = ScriptedSource::bytes_then_timeout(b"abcd");
        let out = get_all(&mut ctx, &mut source, 2).await;
        assert_eq!(out, vec![LogicalKey::Byte(b'X'), LogicalKey::Byte(b'd')]);
    }

    #[tokio::test]
    async fn extended_overread_preserved() {
        let mut ms = MapSet::new();
        ms.register("ab", "xyz").unwrap();
        let mut ctx = InputContext::new(Some(ms), 100);
        let mut source = ScriptedSource::bytes(b"abcdefgh");
        let out = get_all(&mut ctx, &mut source, 9).await;
        assert_eq!(out, seq(b"xyzcdefgh"));
    }

    #[tokio::test]
    async fn empty_map_set_is_identity() {
        let ms = MapSet::new();
        let mut ctx = InputContext::new(Some(ms), 100);
        let mut source = ScriptedSource::bytes(b"q");
        let out = get_all(&mut ctx, &mut source, 1).await;
        assert_eq!(out, seq(b"q"));
    }

    #[tokio::test]
    async fn lone_prefix_byte_times_out_to_nothing_queued() {
        // `a` alone, with only `ab` mapped: a read, then a gap, should
        // produce exactly the byte `a` once finalize runs out of any
        // remembered mapping.
        let mut ms = MapSet::new();
        ms.register("ab", "xyz").unwrap();
        let mut ctx = InputContext::new(Some(ms), 100);
        let mut source = ScriptedSource::bytes_then_timeout(b"a");
        let k = ctx.get_key(&mut source).await.unwrap();
        assert_eq!(k, Some(LogicalKey::Byte(b'a')));
    }

    #[tokio::test]
    async fn can_get_key_reflects_queued_primary_buffer() {
        let mut ms = MapSet::new();
        ms.register("ab", "xy").unwrap();
        let mut ctx = InputContext::new(Some(ms), 100);
        assert!(!ctx.can_get_key());
        let mut source = ScriptedSource::bytes(b"ab");
        let _ = ctx.get_key(&mut source).await.unwrap();
        // The second value key ('y') should still be queued.
        assert!(ctx.can_get_key());
    }

    #[tokio::test]
    async fn named_key_value_sequence_is_delivered_in_order() {
        let mut ms = MapSet::new();
        ms.register("<F1>", "hi").unwrap();
        let mut ctx = InputContext::new(Some(ms), 100);
        let mut source = ScriptedSource {
            script: VecDeque::from(vec![SourceOutcome::Key(LogicalKey::Named(NamedKey::F1))]),
            reads: RefCell::new(0),
        };
        let out = get_all(&mut ctx, &mut source, 2).await;
        assert_eq!(out, seq(b"hi"));
    }
}
