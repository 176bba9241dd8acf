// Character class matching for Lua patterns
// Handles %a, %d, %l, %u, %w, %s, %p, %c, %g, %x and their uppercase inverses
// Also handles [set] matching
//
// Classification is byte-wise with C-locale semantics: bytes >= 0x80 belong
// to no class.

use super::item::SingleItem;
use crate::limits::L_ESC;

/// Check if byte `c` matches the class written as `%cl`.
/// Uppercase letters negate; any other byte matches itself.
#[inline(always)]
pub fn match_class(c: u8, cl: u8) -> bool {
    let res = match cl.to_ascii_lowercase() {
        b'a' => c.is_ascii_alphabetic(),
        b'c' => c.is_ascii_control(),
        b'd' => c.is_ascii_digit(),
        b'g' => c.is_ascii_graphic(),
        b'l' => c.is_ascii_lowercase(),
        b'p' => c.is_ascii_punctuation(),
        // C isspace also includes \v
        b's' => matches!(c, b' ' | b'\t'..=b'\r'),
        b'u' => c.is_ascii_uppercase(),
        b'w' => c.is_ascii_alphanumeric(),
        b'x' => c.is_ascii_hexdigit(),
        _ => return cl == c,
    };
    if cl.is_ascii_uppercase() { !res } else { res }
}

/// Match byte `c` against a single-byte item.
#[inline]
pub fn single_match(c: u8, item: &SingleItem, pat: &[u8]) -> bool {
    match *item {
        SingleItem::Any => true,
        SingleItem::Literal(b) => b == c,
        SingleItem::Class(cl) => match_class(c, cl),
        SingleItem::Set { start, end } => match_bracket_class(c, pat, start, end),
    }
}

/// Match byte `c` against the `[set]` spanning `pat[start..=end]`.
pub fn match_bracket_class(c: u8, pat: &[u8], start: usize, end: usize) -> bool {
    let mut i = start + 1;
    let negated = pat[i] == b'^';
    if negated {
        i += 1;
    }
    while i < end {
        let b = pat[i];
        if b == L_ESC && i + 1 < end {
            i += 1;
            if match_class(c, pat[i]) {
                return !negated;
            }
            i += 1;
        } else if i + 2 < end && pat[i + 1] == b'-' {
            // range a-z
            if b <= c && c <= pat[i + 2] {
                return !negated;
            }
            i += 3;
        } else {
            if b == c {
                return !negated;
            }
            i += 1;
        }
    }
    negated
}
