//! Top-level facade composing the terminal-escape and user-macro matching
//! layers into the single `get_key` entry point the rest of a front-end
//! calls. Corresponds to `kui_manager` in `kui.c`.

use std::io;
use std::os::unix::io::RawFd;

use crate::input_context::{InputContext, KeySource, SourceOutcome};
use crate::keyseq::LogicalKey;
use crate::mapset::MapSet;
use crate::reader::{ByteReader, FdByteReader, ReadOutcome};
use crate::termkeys::{self, CapabilityDb};

/// Adapts a [`ByteReader`] into the [`KeySource`] the terminal-layer
/// [`InputContext`] pulls from: every byte becomes [`LogicalKey::Byte`].
struct ByteKeySource<'a, R> {
    reader: &'a mut R,
}

impl<R: ByteReader> KeySource for ByteKeySource<'_, R> {
    async fn next_key(&mut self, timeout_ms: u64) -> io::Result<SourceOutcome> {
        match self.reader.read_byte(timeout_ms).await? {
            ReadOutcome::Byte(b) => Ok(SourceOutcome::Key(LogicalKey::Byte(b))),
            ReadOutcome::Timeout => Ok(SourceOutcome::Timeout),
            ReadOutcome::Eof => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input descriptor closed")),
        }
    }
}

/// Adapts the terminal-layer [`InputContext`] into the [`KeySource`] the
/// user-layer context pulls from. The `timeout_ms` a caller passes to
/// `next_key` is not separately enforced here: the terminal context already
/// bounds each of its own reads by its own configured timeout, and that is
/// the independence the two-layer design is for — a macro in progress never
/// freezes escape-sequence recognition, and vice versa.
struct ContextKeySource<'a, R> {
    terminal: &'a mut InputContext,
    reader: &'a mut R,
}

impl<R: ByteReader> KeySource for ContextKeySource<'_, R> {
    async fn next_key(&mut self, _timeout_ms: u64) -> io::Result<SourceOutcome> {
        let mut byte_source = ByteKeySource { reader: self.reader };
        match self.terminal.get_key(&mut byte_source).await? {
            Some(k) => Ok(SourceOutcome::Key(k)),
            None => Ok(SourceOutcome::Timeout),
        }
    }
}

/// Owns the built-in terminal map-set, the terminal [`InputContext`] bound
/// to a file descriptor, and the user [`InputContext`] layered on top of it.
///
/// Constructed once per descriptor; default terminal mappings are built at
/// construction and are immutable for the manager's lifetime. The user
/// map-set may be swapped at any time between `get_key` calls.
pub struct KeyManager<R> {
    reader: R,
    terminal_ctx: InputContext,
    user_ctx: InputContext,
}

impl KeyManager<FdByteReader> {
    /// Build a manager reading from `fd`, with a terminal map-set derived
    /// from the process's `TERM` environment via `terminfo`.
    ///
    /// Returns build warnings from the terminal-capability lookup alongside
    /// the manager — a missing or partial terminfo entry is not fatal.
    pub fn from_env(fd: RawFd, escape_timeout_ms: u64, macro_timeout_ms: u64) -> io::Result<(Self, Vec<String>)> {
        let reader = FdByteReader::new(fd)?;
        let (terminal_map_set, warnings) = match termkeys::TerminfoDb::from_env() {
            Ok(db) => termkeys::build_terminal_map_set(&db),
            Err(e) => (MapSet::new(), vec![format!("terminal capability database unavailable: {e}")]),
        };
        Ok((Self::new(reader, terminal_map_set, escape_timeout_ms, macro_timeout_ms), warnings))
    }
}

impl<R: ByteReader> KeyManager<R> {
    pub fn new(reader: R, terminal_map_set: MapSet, escape_timeout_ms: u64, macro_timeout_ms: u64) -> Self {
        Self {
            reader,
            terminal_ctx: InputContext::new(Some(terminal_map_set), escape_timeout_ms),
            user_ctx: InputContext::new(None, macro_timeout_ms),
        }
    }

    pub fn set_user_map_set(&mut self, map_set: MapSet) {
        self.user_ctx.set_map_set(Some(map_set));
    }

    pub fn clear_user_map_set(&mut self) {
        self.user_ctx.set_map_set(None);
    }

    pub fn set_escape_timeout_ms(&mut self, timeout_ms: u64) {
        self.terminal_ctx.set_timeout_ms(timeout_ms);
    }

    pub fn set_macro_timeout_ms(&mut self, timeout_ms: u64) {
        self.user_ctx.set_timeout_ms(timeout_ms);
    }

    /// One resolved key, run through both matching layers. Degenerates to
    /// returning exactly what the terminal layer produces when no user
    /// map-set is attached.
    pub async fn get_key(&mut self) -> io::Result<Option<LogicalKey>> {
        let mut source = ContextKeySource { terminal: &mut self.terminal_ctx, reader: &mut self.reader };
        self.user_ctx.get_key(&mut source).await
    }

    /// `get_key`, but with both timeouts temporarily set to wait forever,
    /// restored afterward regardless of the outcome.
    pub async fn get_key_blocking(&mut self) -> io::Result<LogicalKey> {
        let saved_escape = self.terminal_ctx.timeout_ms();
        let saved_macro = self.user_ctx.timeout_ms();
        self.terminal_ctx.set_timeout_ms(crate::config::FOREVER_MS);
        self.user_ctx.set_timeout_ms(crate::config::FOREVER_MS);

        let result = self.get_key().await;

        self.terminal_ctx.set_timeout_ms(saved_escape);
        self.user_ctx.set_timeout_ms(saved_macro);

        match result? {
            Some(k) => Ok(k),
            None => unreachable!("a forever timeout cannot itself time out"),
        }
    }

    /// `true` if either layer's primary buffer already has a key queued —
    /// used by an event loop to decide whether to drain before waiting on
    /// the descriptor again via `select`. This is strictly buffer state, not
    /// a descriptor poll: a `false` result doesn't preclude a byte already
    /// sitting in the kernel's read buffer (see `ByteReader::ready` for
    /// that lower-level check, which a front-end may use directly on its
    /// own descriptor before ever constructing a `KeyManager`).
    pub fn can_get_key(&self) -> bool {
        self.user_ctx.can_get_key() || self.terminal_ctx.can_get_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// A [`ByteReader`] fed from a fixed script of outcomes.
    struct ScriptedReader {
        script: RefCell<VecDeque<ReadOutcome>>,
    }

    impl ScriptedReader {
        fn bytes(bytes: &[u8]) -> Self {
            Self { script: RefCell::new(bytes.iter().map(|&b| ReadOutcome::Byte(b)).collect()) }
        }
    }

    impl ByteReader for ScriptedReader {
        async fn read_byte(&mut self, _timeout_ms: u64) -> io::Result<ReadOutcome> {
            Ok(self.script.borrow_mut().pop_front().unwrap_or(ReadOutcome::Timeout))
        }

        async fn ready(&self, _timeout_ms: u64) -> io::Result<bool> {
            Ok(matches!(self.script.borrow().front(), Some(ReadOutcome::Byte(_))))
        }
    }

    async fn get_all<R: ByteReader>(manager: &mut KeyManager<R>, n: usize) -> Vec<LogicalKey> {
        let mut out = Vec::new();
        for _ in 0..n {
            out.push(manager.get_key().await.unwrap().expect("expected a key, got timeout"));
        }
        out
    }

    #[tokio::test]
    async fn empty_user_map_set_is_identity_over_terminal_layer() {
        let mut terminal_map_set = MapSet::new();
        terminal_map_set.register("\x1b[A", "<Up>").unwrap();
        let reader = ScriptedReader::bytes(b"q");
        let mut manager = KeyManager::new(reader, terminal_map_set, 40, 1000);
        let out = get_all(&mut manager, 1).await;
        assert_eq!(out, vec![LogicalKey::Byte(b'q')]);
    }

    #[tokio::test]
    async fn escape_disambiguation_resolves_named_key_with_no_gap() {
        let mut terminal_map_set = MapSet::new();
        terminal_map_set.register("\x1b[A", "<Up>").unwrap();
        let reader = ScriptedReader::bytes(b"\x1b[A");
        let mut manager = KeyManager::new(reader, terminal_map_set, 40, 1000);
        let out = get_all(&mut manager, 1).await;
        assert_eq!(out, vec![LogicalKey::Named(crate::keyseq::NamedKey::Up)]);
    }

    #[tokio::test]
    async fn two_stage_independence_terminal_named_key_drives_user_macro() {
        let mut terminal_map_set = MapSet::new();
        terminal_map_set.register("\x1b[A", "<Up>").unwrap();
        let reader = ScriptedReader::bytes(b"\x1b[A");
        let mut manager = KeyManager::new(reader, terminal_map_set, 40, 1000);

        let mut user_map_set = MapSet::new();
        user_map_set.register("<Up>", ":prev").unwrap();
        manager.set_user_map_set(user_map_set);

        let out = get_all(&mut manager, 5).await;
        assert_eq!(
            out,
            vec![
                LogicalKey::Byte(b':'),
                LogicalKey::Byte(b'p'),
                LogicalKey::Byte(b'r'),
                LogicalKey::Byte(b'e'),
                LogicalKey::Byte(b'v'),
            ]
        );
    }

    #[tokio::test]
    async fn clearing_user_map_set_reverts_to_terminal_layer_output() {
        let mut terminal_map_set = MapSet::new();
        terminal_map_set.register("\x1b[A", "<Up>").unwrap();
        let reader = ScriptedReader::bytes(b"\x1b[A");
        let mut manager = KeyManager::new(reader, terminal_map_set, 40, 1000);

        let mut user_map_set = MapSet::new();
        user_map_set.register("<Up>", ":prev").unwrap();
        manager.set_user_map_set(user_map_set);
        manager.clear_user_map_set();

        let out = get_all(&mut manager, 1).await;
        assert_eq!(out, vec![LogicalKey::Named(crate::keyseq::NamedKey::Up)]);
    }

    #[tokio::test]
    async fn macro_over_named_key() {
        let mut terminal_map_set = MapSet::new();
        terminal_map_set.register("<F1>", "<F1>").unwrap();
        let reader = ScriptedReader::bytes(b"q");
        let mut manager = KeyManager::new(reader, terminal_map_set, 40, 1000);

        let mut user_map_set = MapSet::new();
        user_map_set.register("q", "hi").unwrap();
        manager.set_user_map_set(user_map_set);

        let out = get_all(&mut manager, 2).await;
        assert_eq!(out, vec![LogicalKey::Byte(b'h'), LogicalKey::Byte(b'i')]);
    }
}
