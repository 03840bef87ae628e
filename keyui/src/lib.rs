//! Key-input engine for a curses-based debugger front-end: resolves raw
//! terminal bytes into logical keys, disambiguating terminal escape
//! sequences and user-defined macro key bindings via two independent
//! longest-prefix matches, each on its own timeout.
//!
//! The crate's layering, leaves first:
//!
//! - [`keyseq`] — the atomic [`keyseq::LogicalKey`] token and [`keyseq::KeySeq`] vocabulary.
//! - [`codec`] — human `"a<Esc><Home>"` notation ⇄ [`keyseq::KeySeq`].
//! - [`trie`] — the stateful longest-prefix matcher.
//! - [`mapset`] — one set of key→value bindings, wrapping a trie.
//! - [`termkeys`] — builds the built-in terminal-escape [`mapset::MapSet`] from a
//!   terminal capability database.
//! - [`reader`] — timeout-bounded single-byte reads from a file descriptor.
//! - [`input_context`] — one matching layer (bytes→keys, or keys→macro-expanded keys).
//! - [`key_manager`] — composes the terminal and user layers behind one `get_key` call.
//! - [`config`] — tuning knobs and the user map-directive file format.
//! - [`error`] — the crate's error type.

pub mod codec;
pub mod config;
pub mod error;
pub mod input_context;
pub mod key_manager;
pub mod keyseq;
pub mod mapset;
pub mod reader;
pub mod termkeys;
pub mod trie;

pub use config::EngineConfig;
pub use error::KuiError;
pub use key_manager::KeyManager;
pub use keyseq::{KeySeq, LogicalKey, NamedKey};
pub use mapset::{MapSet, Mapping};
