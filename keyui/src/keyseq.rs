//! The engine's atomic output unit and the sequences built from it.
//!
//! Corresponds to `kui_tree.h`'s integer key-token space: bytes and named
//! keys share one token space so a [`Trie`](crate::trie::Trie) can walk
//! either kind uniformly. `0` is reserved as a terminator in the source and
//! is unrepresentable here by construction — there is no way to build a
//! [`LogicalKey`] whose wire value is zero.

use std::fmt;

/// Wire-space base for [`NamedKey`] discriminants. Bytes occupy `1..=255`;
/// named keys occupy `NAMED_KEY_BASE..`.
pub const NAMED_KEY_BASE: i32 = 10_000;

/// The closed set of high-level keys the engine can recognize.
///
/// Fixed at build time — no dynamic extension. Each
/// discriminant is `NAMED_KEY_BASE` plus a stable small offset, which
/// doubles as the engine's wire-numeric convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum NamedKey {
    Escape = NAMED_KEY_BASE,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    // Ctrl-A .. Ctrl-Z, in letter order.
    CtrlA,
    CtrlB,
    CtrlC,
    CtrlD,
    CtrlE,
    CtrlF,
    CtrlG,
    CtrlH,
    CtrlI,
    CtrlJ,
    CtrlK,
    CtrlL,
    CtrlM,
    CtrlN,
    CtrlO,
    CtrlP,
    CtrlQ,
    CtrlR,
    CtrlS,
    CtrlT,
    CtrlU,
    CtrlV,
    CtrlW,
    CtrlX,
    CtrlY,
    CtrlZ,
    // Alt-<letter>, Alt-<digit>.
    AltA,
    AltB,
    AltC,
    AltD,
    AltE,
    AltF,
    AltG,
    AltH,
    AltI,
    AltJ,
    AltK,
    AltL,
    AltM,
    AltN,
    AltO,
    AltP,
    AltQ,
    AltR,
    AltS,
    AltT,
    AltU,
    AltV,
    AltW,
    AltX,
    AltY,
    AltZ,
    Alt0,
    Alt1,
    Alt2,
    Alt3,
    Alt4,
    Alt5,
    Alt6,
    Alt7,
    Alt8,
    Alt9,
    // A fixed set of punctuation/shifted-punctuation Alt chords.
    AltMinus,
    AltEquals,
    AltBacktick,
    AltComma,
    AltPeriod,
    AltSlash,
    AltSemicolon,
}

impl NamedKey {
    /// All variants, in declaration order. Used to build lookup tables once.
    pub const ALL: &'static [NamedKey] = &[
        NamedKey::Escape,
        NamedKey::Up,
        NamedKey::Down,
        NamedKey::Left,
        NamedKey::Right,
        NamedKey::Home,
        NamedKey::End,
        NamedKey::PageUp,
        NamedKey::PageDown,
        NamedKey::Insert,
        NamedKey::Delete,
        NamedKey::F1,
        NamedKey::F2,
        NamedKey::F3,
        NamedKey::F4,
        NamedKey::F5,
        NamedKey::F6,
        NamedKey::F7,
        NamedKey::F8,
        NamedKey::F9,
        NamedKey::F10,
        NamedKey::F11,
        NamedKey::F12,
        NamedKey::CtrlA,
        NamedKey::CtrlB,
        NamedKey::CtrlC,
        NamedKey::CtrlD,
        NamedKey::CtrlE,
        NamedKey::CtrlF,
        NamedKey::CtrlG,
        NamedKey::CtrlH,
        NamedKey::CtrlI,
        NamedKey::CtrlJ,
        NamedKey::CtrlK,
        NamedKey::CtrlL,
        NamedKey::CtrlM,
        NamedKey::CtrlN,
        NamedKey::CtrlO,
        NamedKey::CtrlP,
        NamedKey::CtrlQ,
        NamedKey::CtrlR,
        NamedKey::CtrlS,
        NamedKey::CtrlT,
        NamedKey::CtrlU,
        NamedKey::CtrlV,
        NamedKey::CtrlW,
        NamedKey::CtrlX,
        NamedKey::CtrlY,
        NamedKey::CtrlZ,
        NamedKey::AltA,
        NamedKey::AltB,
        NamedKey::AltC,
        NamedKey::AltD,
        NamedKey::AltE,
        NamedKey::AltF,
        NamedKey::AltG,
        NamedKey::AltH,
        NamedKey::AltI,
        NamedKey::AltJ,
        NamedKey::AltK,
        NamedKey::AltL,
        NamedKey::AltM,
        NamedKey::AltN,
        NamedKey::AltO,
        NamedKey::AltP,
        NamedKey::AltQ,
        NamedKey::AltR,
        NamedKey::AltS,
        NamedKey::AltT,
        NamedKey::AltU,
        NamedKey::AltV,
        NamedKey::AltW,
        NamedKey::AltX,
        NamedKey::AltY,
        NamedKey::AltZ,
        NamedKey::Alt0,
        NamedKey::Alt1,
        NamedKey::Alt2,
        NamedKey::Alt3,
        NamedKey::Alt4,
        NamedKey::Alt5,
        NamedKey::Alt6,
        NamedKey::Alt7,
        NamedKey::Alt8,
        NamedKey::Alt9,
        NamedKey::AltMinus,
        NamedKey::AltEquals,
        NamedKey::AltBacktick,
        NamedKey::AltComma,
        NamedKey::AltPeriod,
        NamedKey::AltSlash,
        NamedKey::AltSemicolon,
    ];

    /// The Alt-chord letter/digit variant for `c`, if any.
    pub fn alt_for_char(c: char) -> Option<NamedKey> {
        NamedKey::ALL
            .iter()
            .copied()
            .find(|k| k.alt_char() == Some(c))
    }

    /// The Ctrl-chord letter variant for `c` (`'a'..='z'`), if any.
    pub fn ctrl_for_char(c: char) -> Option<NamedKey> {
        let upper = c.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return None;
        }
        let idx = (upper as u8 - b'A') as i32;
        let wire = NamedKey::CtrlA as i32 + idx;
        NamedKey::from_wire(wire)
    }

    /// Inverse of [`alt_for_char`](Self::alt_for_char): the plain character
    /// this Alt chord shifts, or `None` for chords with no single-char form.
    pub fn alt_char(self) -> Option<char> {
        use NamedKey::*;
        Some(match self {
            AltA => 'a', AltB => 'b', AltC => 'c', AltD => 'd', AltE => 'e',
            AltF => 'f', AltG => 'g', AltH => 'h', AltI => 'i', AltJ => 'j',
            AltK => 'k', AltL => 'l', AltM => 'm', AltN => 'n', AltO => 'o',
            AltP => 'p', AltQ => 'q', AltR => 'r', AltS => 's', AltT => 't',
            AltU => 'u', AltV => 'v', AltW => 'w', AltX => 'x', AltY => 'y',
            AltZ => 'z',
            Alt0 => '0', Alt1 => '1', Alt2 => '2', Alt3 => '3', Alt4 => '4',
            Alt5 => '5', Alt6 => '6', Alt7 => '7', Alt8 => '8', Alt9 => '9',
            AltMinus => '-', AltEquals => '=', AltBacktick => '`',
            AltComma => ',', AltPeriod => '.', AltSlash => '/',
            AltSemicolon => ';',
            _ => return None,
        })
    }

    /// The plain letter this Ctrl chord shifts (`'A'..='Z'`), or `None`.
    pub fn ctrl_char(self) -> Option<char> {
        let wire = self as i32;
        if (NamedKey::CtrlA as i32..=NamedKey::CtrlZ as i32).contains(&wire) {
            Some((b'A' + (wire - NamedKey::CtrlA as i32) as u8) as char)
        } else {
            None
        }
    }

    /// Reconstruct a [`NamedKey`] from its wire discriminant.
    pub fn from_wire(wire: i32) -> Option<NamedKey> {
        NamedKey::ALL.iter().copied().find(|k| *k as i32 == wire)
    }
}

/// The engine's atomic output unit: either a raw byte or a named high-level
/// key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    /// A raw ASCII/extended byte, `1..=255`. `0` is never constructed.
    Byte(u8),
    /// A high-level key from the closed [`NamedKey`] enumeration.
    Named(NamedKey),
}

impl LogicalKey {
    /// The wire-numeric form: bytes as themselves
    /// (`1..=255`), named keys at `NamedKey as i32` (`>= 10000`).
    pub fn to_wire(self) -> i32 {
        match self {
            LogicalKey::Byte(b) => b as i32,
            LogicalKey::Named(n) => n as i32,
        }
    }

    /// Inverse of [`to_wire`](Self::to_wire). Rejects `0` and negative
    /// values, and any named-key value with no matching [`NamedKey`]
    /// variant.
    pub fn from_wire(wire: i32) -> Option<LogicalKey> {
        match wire {
            1..=255 => Some(LogicalKey::Byte(wire as u8)),
            w if w >= NAMED_KEY_BASE => NamedKey::from_wire(w).map(LogicalKey::Named),
            _ => None,
        }
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalKey::Byte(b) if b.is_ascii_graphic() || *b == b' ' => {
                write!(f, "{}", *b as char)
            }
            LogicalKey::Byte(b) => write!(f, "\\x{b:02x}"),
            LogicalKey::Named(n) => write!(f, "{n:?}"),
        }
    }
}

/// An ordered, finite sequence of [`LogicalKey`] values — the matching
/// vocabulary of the [`Trie`](crate::trie::Trie) and the result of decoding
/// a human string.
pub type KeySeq = Vec<LogicalKey>;

#[cfg(test)]
mod tests {
    use super::*;

    // ── Wire conversion ───────────────────────────────────────────────────

    #[test]
    fn byte_round_trips() {
        for b in 1u8..=255 {
            let k = LogicalKey::Byte(b);
            assert_eq!(LogicalKey::from_wire(k.to_wire()), Some(k));
        }
    }

    #[test]
    fn named_round_trips() {
        for &n in NamedKey::ALL {
            let k = LogicalKey::Named(n);
            assert_eq!(LogicalKey::from_wire(k.to_wire()), Some(k));
        }
    }

    #[test]
    fn zero_is_unrepresentable() {
        assert_eq!(LogicalKey::from_wire(0), None);
    }

    #[test]
    fn negative_is_unrepresentable() {
        assert_eq!(LogicalKey::from_wire(-1), None);
    }

    #[test]
    fn gap_between_bytes_and_named_is_unrepresentable() {
        assert_eq!(LogicalKey::from_wire(256), None);
        assert_eq!(LogicalKey::from_wire(NAMED_KEY_BASE - 1), None);
    }

    // ── Ctrl/Alt chord helpers ────────────────────────────────────────────

    #[test]
    fn ctrl_for_char_round_trips() {
        for c in 'A'..='Z' {
            let named = NamedKey::ctrl_for_char(c).unwrap();
            assert_eq!(named.ctrl_char(), Some(c));
        }
    }

    #[test]
    fn ctrl_for_char_lowercase_normalizes() {
        assert_eq!(NamedKey::ctrl_for_char('a'), NamedKey::ctrl_for_char('A'));
    }

    #[test]
    fn ctrl_for_non_letter_is_none() {
        assert_eq!(NamedKey::ctrl_for_char('1'), None);
    }

    #[test]
    fn alt_for_char_round_trips() {
        for c in "abcdefghijklmnopqrstuvwxyz0123456789-=`,./;".chars() {
            let named = NamedKey::alt_for_char(c).unwrap();
            assert_eq!(named.alt_char(), Some(c));
        }
    }

    #[test]
    fn display_formats_printable_byte_as_char() {
        assert_eq!(LogicalKey::Byte(b'a').to_string(), "a");
    }

    #[test]
    fn display_formats_control_byte_as_hex() {
        assert_eq!(LogicalKey::Byte(0x01).to_string(), "\\x01");
    }
}
