//! One set of key→value bindings: either the built-in terminal-escape table
//! or a user map-set.
//!
//! Corresponds to the `kui_map` / `kui_manager` binding tables in `kui.c`.
//! A [`MapSet`] owns a dictionary of [`Mapping`]s keyed by `human_key`
//! (unique, last-write-wins) and a [`Trie`] populated from those mappings'
//! `key_seq -> Mapping` bindings; every registration path updates both.

use std::collections::HashMap;
use std::rc::Rc;

use crate::codec;
use crate::keyseq::{KeySeq, NamedKey};
use crate::trie::Trie;

/// An immutable `key_seq -> value_seq` rewrite rule.
///
/// `human_key`/`human_value` preserve the user's original text for listing
/// and debugging; `key_seq`/`value_seq` are the decoded forms used at match
/// time. Invariant: `key_seq` is never empty (enforced at registration, see
/// [`MapSet::register`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub human_key: String,
    pub human_value: String,
    pub key_seq: KeySeq,
    pub value_seq: KeySeq,
}

impl Mapping {
    pub fn new(human_key: impl Into<String>, human_value: impl Into<String>) -> Self {
        let human_key = human_key.into();
        let human_value = human_value.into();
        let key_seq = codec::decode(&human_key);
        let value_seq = codec::decode(&human_value);
        Self { human_key, human_value, key_seq, value_seq }
    }
}

/// The bundle of [`Mapping`]s active for one purpose: terminal-layer escape
/// decoding, or a front-end's user macros.
///
/// Invariant: `dictionary.keys() == {m.human_key for m in trie's mappings}`
/// — every mutating method keeps both halves in lock-step.
pub struct MapSet {
    dictionary: HashMap<String, Rc<Mapping>>,
    trie: Trie,
}

impl MapSet {
    pub fn new() -> Self {
        Self { dictionary: HashMap::new(), trie: Trie::new() }
    }

    /// Construct a [`Mapping`] from `human_key`/`human_value` via
    /// [`codec::decode`], replace any existing entry with the same
    /// `human_key` (erasing its trie entry first), and insert the new
    /// mapping into both the dictionary and the trie.
    ///
    /// Rejected only when the decoded key sequence is empty (an empty
    /// `human_key`, or one that decodes to nothing) — the
    /// `RegistrationRejected` case.
    pub fn register(&mut self, human_key: &str, human_value: &str) -> Result<(), crate::error::KuiError> {
        let mapping = Mapping::new(human_key, human_value);
        if mapping.key_seq.is_empty() {
            return Err(crate::error::KuiError::RegistrationRejected {
                human_key: human_key.to_owned(),
            });
        }

        if let Some(old) = self.dictionary.remove(human_key) {
            self.trie.erase(&old.key_seq);
        }

        let mapping = Rc::new(mapping);
        self.trie.insert(&mapping.key_seq, Rc::clone(&mapping));
        self.dictionary.insert(mapping.human_key.clone(), mapping);
        Ok(())
    }

    /// Look up `human_key`; if present, erase it from both the dictionary
    /// and the trie.
    pub fn deregister(&mut self, human_key: &str) {
        if let Some(old) = self.dictionary.remove(human_key) {
            self.trie.erase(&old.key_seq);
        }
    }

    /// All registered mappings, for listing/debugging.
    pub fn iterate(&self) -> impl Iterator<Item = &Rc<Mapping>> {
        self.dictionary.values()
    }

    pub fn len(&self) -> usize {
        self.dictionary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty()
    }

    pub fn contains(&self, human_key: &str) -> bool {
        self.dictionary.contains_key(human_key)
    }

    pub(crate) fn trie_mut(&mut self) -> &mut Trie {
        &mut self.trie
    }

    pub(crate) fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Register each string in `human_keys` as a `human_key` mapped to the
    /// canonical escape sequence for `named` — the hook an (external)
    /// config-file reader calls to teach new escape sequences for an
    /// existing named key.
    pub fn get_terminal_keys_kui_map(
        &mut self,
        named: NamedKey,
        human_keys: &[String],
    ) -> Result<(), crate::error::KuiError> {
        let value = codec::encode_key(crate::keyseq::LogicalKey::Named(named));
        for human_key in human_keys {
            self.register(human_key, &value)?;
        }
        Ok(())
    }
}

impl Default for MapSet {
    fn default() -> Self {
        Self::new()
    }
}
