//! Terminal capability lookup and the built-in escape-sequence [`MapSet`].
//!
//! Corresponds to `kui_term_get_terminal_keys` in `kui.c`, which queries the
//! terminal database twice per named key — once through the termcap
//! compatibility layer, once through terminfo proper — and unions whatever
//! comes back, since terminals disagree on which interface carries the
//! right answer for a given key. This crate keeps that two-query shape
//! even though, today, both queries are answered by the one real backend
//! on hand ([`terminfo::Database`]); see `DESIGN.md` for why no separate
//! termcap crate is pulled in.

use terminfo::{capability as cap, Database};

use crate::codec;
use crate::keyseq::NamedKey;
use crate::mapset::MapSet;

/// Abstraction over "ask a terminal database for the escape sequence bound
/// to a capability name", queried once per interface so a caller can union
/// the results. Exists so tests can supply a [`FakeCapabilityDb`] instead of
/// depending on a real terminal's terminfo entry.
pub trait CapabilityDb {
    /// Look up `capname` via the termcap-compatibility interface.
    fn termcap_lookup(&self, capname: &str) -> Option<String>;
    /// Look up `capname` via terminfo proper.
    fn terminfo_lookup(&self, capname: &str) -> Option<String>;
}

/// Production [`CapabilityDb`] backed by a loaded [`terminfo::Database`].
///
/// The `terminfo` crate exposes one typed capability API; there is no
/// independent termcap backend in this dependency stack, so both trait
/// methods query the same [`Database`] (see `DESIGN.md`). The two-query
/// shape is preserved at the call site in [`build_terminal_map_set`] so the
/// union-of-results algorithm still does real work on a terminal database
/// that genuinely disagrees between interfaces, even though, today, both
/// sides agree by construction.
pub struct TerminfoDb {
    db: Database,
}

impl TerminfoDb {
    pub fn from_env() -> Result<Self, terminfo::Error> {
        Ok(Self { db: Database::from_env()? })
    }

    pub fn from_name(name: &str) -> Result<Self, terminfo::Error> {
        Ok(Self { db: Database::from_name(name)? })
    }

    fn lookup(&self, capname: &str) -> Option<String> {
        macro_rules! get_string {
            ($cap:ty) => {
                self.db
                    .get::<$cap>()
                    .map(|c| String::from_utf8_lossy(c.as_ref()).into_owned())
            };
        }
        match capname {
            "kdch1" => get_string!(cap::KeyDc),
            "kcuu1" => get_string!(cap::KeyUp),
            "kcud1" => get_string!(cap::KeyDown),
            "kcub1" => get_string!(cap::KeyLeft),
            "kcuf1" => get_string!(cap::KeyRight),
            "khome" => get_string!(cap::KeyHome),
            "kend" => get_string!(cap::KeyEnd),
            "kpp" => get_string!(cap::KeyPPage),
            "knp" => get_string!(cap::KeyNPage),
            "kich1" => get_string!(cap::KeyIC),
            "kf1" => get_string!(cap::KeyF1),
            "kf2" => get_string!(cap::KeyF2),
            "kf3" => get_string!(cap::KeyF3),
            "kf4" => get_string!(cap::KeyF4),
            "kf5" => get_string!(cap::KeyF5),
            "kf6" => get_string!(cap::KeyF6),
            "kf7" => get_string!(cap::KeyF7),
            "kf8" => get_string!(cap::KeyF8),
            "kf9" => get_string!(cap::KeyF9),
            "kf10" => get_string!(cap::KeyF10),
            "kf11" => get_string!(cap::KeyF11),
            "kf12" => get_string!(cap::KeyF12),
            _ => None,
        }
    }
}

impl CapabilityDb for TerminfoDb {
    fn termcap_lookup(&self, capname: &str) -> Option<String> {
        self.lookup(capname)
    }

    fn terminfo_lookup(&self, capname: &str) -> Option<String> {
        self.lookup(capname)
    }
}

/// Test double letting tests script exactly what each interface returns for
/// a given capability name, independent of any real terminal.
#[cfg(test)]
#[derive(Default)]
pub struct FakeCapabilityDb {
    pub termcap: std::collections::HashMap<&'static str, &'static str>,
    pub terminfo: std::collections::HashMap<&'static str, &'static str>,
}

#[cfg(test)]
impl CapabilityDb for FakeCapabilityDb {
    fn termcap_lookup(&self, capname: &str) -> Option<String> {
        self.termcap.get(capname).map(|s| s.to_string())
    }

    fn terminfo_lookup(&self, capname: &str) -> Option<String> {
        self.terminfo.get(capname).map(|s| s.to_string())
    }
}

/// Arrow/Home/End keys covered by the `ESC [` / `ESC O` overlay, paired with
/// the final letter both prefixes use across the common VT100/xterm/ANSI
/// conventions a terminal's own terminfo entry sometimes omits or splits
/// across only one of the two prefixes.
const OVERLAY_ARROWS: &[(u8, NamedKey)] = &[
    (b'A', NamedKey::Up),
    (b'B', NamedKey::Down),
    (b'C', NamedKey::Right),
    (b'D', NamedKey::Left),
    (b'H', NamedKey::Home),
    (b'F', NamedKey::End),
];

/// The full printable ASCII letter/digit/punctuation range an `ESC <letter>`
/// Alt chord can shift, per [`NamedKey::alt_for_char`].
const OVERLAY_ALT_CHARS: &str = "abcdefghijklmnopqrstuvwxyz0123456789-=`,./;";

/// Append the fixed overlay: the standard `ESC [` / `ESC O` prefixed
/// arrow/Home/End sequences terminals commonly emit even when their
/// terminfo entry doesn't name them, plus the `ESC <letter>` Alt chords for
/// the full printable ASCII range.
fn register_overlay(register: &mut dyn FnMut(String, String)) {
    for &(letter, named) in OVERLAY_ARROWS {
        let canonical = codec::encode_key(crate::keyseq::LogicalKey::Named(named)).into_owned();
        register(format!("\x1b[{}", letter as char), canonical.clone());
        register(format!("\x1bO{}", letter as char), canonical);
    }

    for c in OVERLAY_ALT_CHARS.chars() {
        let Some(named) = NamedKey::alt_for_char(c) else { continue };
        let canonical = codec::encode_key(crate::keyseq::LogicalKey::Named(named)).into_owned();
        register(format!("\x1b{c}"), canonical);
    }
}

/// Build the built-in terminal-escape [`MapSet`] for every [`NamedKey`] that
/// carries a terminal capability (see [`codec::keycode_for`]), then extend it
/// with the fixed overlay and a lone-Escape self-binding.
///
/// For each capability-bearing key, query `db` through both interfaces and
/// register every distinct non-empty sequence returned, under the canonical
/// `<Name>` notation (so disagreeing terminals both still decode to the same
/// [`NamedKey`]). Then [`register_overlay`] appends the `ESC [`/`ESC O`
/// arrow/Home/End sequences and the `ESC <letter>` Alt chords terminfo
/// doesn't carry at all. Finally a lone `ESC` byte self-binds to
/// [`NamedKey::Escape`] (it has no terminal capability of its own). Any
/// registration that is rejected contributes a warning to the returned list
/// rather than failing the whole build — there's no sequence that should
/// ever be empty here, but the build stays honest about it instead of
/// asserting.
pub fn build_terminal_map_set(db: &dyn CapabilityDb) -> (MapSet, Vec<String>) {
    let mut map_set = MapSet::new();
    let mut warnings = Vec::new();

    let mut register = |human_key: String, human_value: String| {
        if let Err(e) = map_set.register(&human_key, &human_value) {
            warnings.push(e.to_string());
        }
    };

    for &named in NamedKey::ALL {
        let Some(capname) = codec::keycode_for(named) else { continue };
        let canonical = codec::encode_key(crate::keyseq::LogicalKey::Named(named)).into_owned();

        let mut sequences = Vec::new();
        if let Some(seq) = db.termcap_lookup(capname) {
            if !seq.is_empty() {
                sequences.push(seq);
            }
        }
        if let Some(seq) = db.terminfo_lookup(capname) {
            if !seq.is_empty() && !sequences.contains(&seq) {
                sequences.push(seq);
            }
        }

        for seq in sequences {
            register(seq, canonical.clone());
        }
    }

    register_overlay(&mut register);

    // Escape itself has no terminal capability: a lone ESC byte.
    register("\x1b".to_owned(), codec::encode_key(crate::keyseq::LogicalKey::Named(NamedKey::Escape)).into_owned());

    (map_set, warnings)
}
