//! Bidirectional conversion between human key notation (`"a<Esc><Home>\t"`)
//! and [`KeySeq`] token sequences.
//!
//! Corresponds to `kui_term_get_terminal_keys` / the `<...>` notation parser
//! in `kui.c`. All three public operations are driven off one `const` name
//! table ([`NAME_TABLE`]) so `decode`, `encode_key`, and `keycode_for` can
//! never drift out of sync with each other.

use std::borrow::Cow;

use crate::keyseq::{KeySeq, LogicalKey, NamedKey};

/// One entry in the fixed `<Name>` table: the notation (case-insensitive),
/// the [`LogicalKey`] it decodes to, and — for named keys with a terminal
/// capability — the termcap/terminfo capability name used to look up the
/// default escape sequence.
struct NameEntry {
    name: &'static str,
    key: LogicalKey,
    capname: Option<&'static str>,
}

/// The single authoritative list backing `decode`, `encode_key`, and
/// `keycode_for`. Capability names follow terminfo's short form (`khome`,
/// `kcuu1`, ...), which is also accepted by the termcap compatibility layer
/// most terminfo databases ship alongside.
const NAME_TABLE: &[NameEntry] = &[
    NameEntry { name: "Esc",      key: LogicalKey::Named(NamedKey::Escape), capname: None },
    NameEntry { name: "CR",       key: LogicalKey::Byte(b'\r'), capname: None },
    NameEntry { name: "NL",       key: LogicalKey::Byte(b'\n'), capname: None },
    NameEntry { name: "Tab",      key: LogicalKey::Byte(b'\t'), capname: None },
    NameEntry { name: "BS",       key: LogicalKey::Byte(0x08), capname: None },
    NameEntry { name: "Space",    key: LogicalKey::Byte(b' '), capname: None },
    NameEntry { name: "lt",       key: LogicalKey::Byte(b'<'), capname: None },
    NameEntry { name: "Bslash",   key: LogicalKey::Byte(b'\\'), capname: None },
    NameEntry { name: "Bar",      key: LogicalKey::Byte(b'|'), capname: None },
    NameEntry { name: "Del",      key: LogicalKey::Named(NamedKey::Delete), capname: Some("kdch1") },
    NameEntry { name: "Up",       key: LogicalKey::Named(NamedKey::Up), capname: Some("kcuu1") },
    NameEntry { name: "Down",     key: LogicalKey::Named(NamedKey::Down), capname: Some("kcud1") },
    NameEntry { name: "Left",     key: LogicalKey::Named(NamedKey::Left), capname: Some("kcub1") },
    NameEntry { name: "Right",    key: LogicalKey::Named(NamedKey::Right), capname: Some("kcuf1") },
    NameEntry { name: "Home",     key: LogicalKey::Named(NamedKey::Home), capname: Some("khome") },
    NameEntry { name: "End",      key: LogicalKey::Named(NamedKey::End), capname: Some("kend") },
    NameEntry { name: "PageUp",   key: LogicalKey::Named(NamedKey::PageUp), capname: Some("kpp") },
    NameEntry { name: "PageDown", key: LogicalKey::Named(NamedKey::PageDown), capname: Some("knp") },
    NameEntry { name: "Insert",   key: LogicalKey::Named(NamedKey::Insert), capname: Some("kich1") },
    NameEntry { name: "F1",       key: LogicalKey::Named(NamedKey::F1), capname: Some("kf1") },
    NameEntry { name: "F2",       key: LogicalKey::Named(NamedKey::F2), capname: Some("kf2") },
    NameEntry { name: "F3",       key: LogicalKey::Named(NamedKey::F3), capname: Some("kf3") },
    NameEntry { name: "F4",       key: LogicalKey::Named(NamedKey::F4), capname: Some("kf4") },
    NameEntry { name: "F5",       key: LogicalKey::Named(NamedKey::F5), capname: Some("kf5") },
    NameEntry { name: "F6",       key: LogicalKey::Named(NamedKey::F6), capname: Some("kf6") },
    NameEntry { name: "F7",       key: LogicalKey::Named(NamedKey::F7), capname: Some("kf7") },
    NameEntry { name: "F8",       key: LogicalKey::Named(NamedKey::F8), capname: Some("kf8") },
    NameEntry { name: "F9",       key: LogicalKey::Named(NamedKey::F9), capname: Some("kf9") },
    NameEntry { name: "F10",      key: LogicalKey::Named(NamedKey::F10), capname: Some("kf10") },
    NameEntry { name: "F11",      key: LogicalKey::Named(NamedKey::F11), capname: Some("kf11") },
    NameEntry { name: "F12",      key: LogicalKey::Named(NamedKey::F12), capname: Some("kf12") },
];

/// Parse a human notation string into a [`KeySeq`].
///
/// Any character outside `<…>` decodes to its byte value. Any `<Name>`
/// token (case-insensitive) recognized from [`NAME_TABLE`], of the form
/// `C-<letter>` / `A-<letter>` / `S-<letter>`, or of the form `0xNN` (two hex
/// digits, the escape [`encode_key`] uses for non-ASCII bytes), decodes to a
/// single token. Unknown `<Name>` content decodes literally, byte-for-byte,
/// including the angle brackets — this function never fails.
pub fn decode(text: &str) -> KeySeq {
    let chars: Vec<char> = text.chars().collect();
    let mut out = KeySeq::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '<' {
            if let Some(close) = find_close(&chars, i) {
                let inner: String = chars[i + 1..close].iter().collect();
                match decode_name(&inner) {
                    Some(key) => {
                        out.push(key);
                        i = close + 1;
                        continue;
                    }
                    None => {
                        // Unknown <Name>: emit literally, angle brackets included.
                        for &c in &chars[i..=close] {
                            push_char(&mut out, c);
                        }
                        i = close + 1;
                        continue;
                    }
                }
            }
        }
        push_char(&mut out, chars[i]);
        i += 1;
    }
    out
}

/// Find the index of the `>` closing the `<` at `open`, if the text between
/// them contains no further `<` or `>` (so `"a < b"` is not mistaken for a
/// name token).
fn find_close(chars: &[char], open: usize) -> Option<usize> {
    let mut j = open + 1;
    while j < chars.len() {
        match chars[j] {
            '>' => return Some(j),
            '<' => return None,
            _ => j += 1,
        }
    }
    None
}

/// Push one `char` onto `out` as its byte value(s) (UTF-8 encoded).
fn push_char(out: &mut KeySeq, c: char) {
    let mut buf = [0u8; 4];
    for &b in c.encode_utf8(&mut buf).as_bytes() {
        if b != 0 {
            out.push(LogicalKey::Byte(b));
        }
    }
}

/// Decode the inner text of a `<...>` token (without the brackets) to a
/// single [`LogicalKey`], or `None` if it isn't recognized.
fn decode_name(inner: &str) -> Option<LogicalKey> {
    if let Some(entry) = NAME_TABLE.iter().find(|e| e.name.eq_ignore_ascii_case(inner)) {
        return Some(entry.key);
    }
    if let Some(hex) = inner.strip_prefix("0x").or_else(|| inner.strip_prefix("0X")) {
        if let Ok(byte) = u8::from_str_radix(hex, 16) {
            if byte != 0 {
                return Some(LogicalKey::Byte(byte));
            }
        }
    }
    if inner.len() >= 2 && inner.as_bytes()[1] == b'-' {
        let (prefix, rest) = inner.split_at(1);
        let letter = rest.strip_prefix('-')?;
        let mut cs = letter.chars();
        let c = cs.next()?;
        if cs.next().is_some() {
            return None; // more than one char after "X-"
        }
        return match prefix.to_ascii_uppercase().as_str() {
            "C" => NamedKey::ctrl_for_char(c).map(LogicalKey::Named),
            "A" => NamedKey::alt_for_char(c.to_ascii_lowercase()).map(LogicalKey::Named),
            // Shift+letter has no dedicated NamedKey in the data model — it's
            // indistinguishable from the uppercase byte a terminal sends.
            "S" if c.is_ascii_alphabetic() => {
                Some(LogicalKey::Byte(c.to_ascii_uppercase() as u8))
            }
            _ => None,
        };
    }
    None
}

/// Inverse of [`decode`] for a single named key. Returns the canonical
/// `<Name>` form; bytes return themselves as a one-character string, except
/// for bytes outside the ASCII range, which have no single-`char` UTF-8
/// representation and so round-trip through the `<0xNN>` escape instead.
pub fn encode_key(k: LogicalKey) -> Cow<'static, str> {
    match k {
        LogicalKey::Byte(b) if b.is_ascii() => Cow::Owned((b as char).to_string()),
        LogicalKey::Byte(b) => Cow::Owned(format!("<0x{b:02x}>")),
        LogicalKey::Named(n) => {
            if let Some(entry) = NAME_TABLE.iter().find(|e| e.key == LogicalKey::Named(n)) {
                return Cow::Owned(format!("<{}>", entry.name));
            }
            if let Some(c) = n.ctrl_char() {
                return Cow::Owned(format!("<C-{}>", c.to_ascii_lowercase()));
            }
            if let Some(c) = n.alt_char() {
                return Cow::Owned(format!("<A-{c}>"));
            }
            Cow::Borrowed("<?>")
        }
    }
}

/// The terminal capability name (e.g. `khome`, `kcuu1`) used to look up the
/// default escape sequence for `named`, or `None` for named keys with no
/// terminal capability (the Ctrl-X and Alt-X families).
pub fn keycode_for(named: NamedKey) -> Option<&'static str> {
    NAME_TABLE
        .iter()
        .find(|e| e.key == LogicalKey::Named(named))
        .and_then(|e| e.capname)
}
