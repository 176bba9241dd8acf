// Pattern item reader
// Classifies the item starting at a pattern offset and reports where its
// base form ends. Quantifier suffixes are read separately by the caller.

use crate::error::{PatternError, PatternResult};
use crate::limits::L_ESC;

/// An item that matches exactly one subject byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleItem {
    /// `.`
    Any,
    /// Plain byte, or `%x` where `x` is not a class letter
    Literal(u8),
    /// `%a`, `%D`, ... (the letter as written; uppercase negates)
    Class(u8),
    /// `[set]`: `start` is the `[`, `end` is the closing `]`
    Set { start: usize, end: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    /// Pattern exhausted
    End,
    /// `$` as the last pattern byte
    EndAnchor,
    /// `(`
    OpenCapture,
    /// `()`
    PositionCapture,
    /// `)`
    CloseCapture,
    /// `%bxy`
    Balanced { open: u8, close: u8 },
    /// `%f[set]`, carrying the set
    Frontier(SingleItem),
    /// `%0` - `%9`
    BackRef(usize),
    Single(SingleItem),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `-`
    Lazy,
    /// `?`
    Optional,
}

/// Read the item at `pat[pp]`.
/// Returns the item and the pattern offset just past its base form.
pub fn read_item(pat: &[u8], pp: usize) -> PatternResult<(Item, usize)> {
    let Some(&c) = pat.get(pp) else {
        return Ok((Item::End, pp));
    };
    match c {
        b'(' => {
            if pat.get(pp + 1) == Some(&b')') {
                Ok((Item::PositionCapture, pp + 2))
            } else {
                Ok((Item::OpenCapture, pp + 1))
            }
        }
        b')' => Ok((Item::CloseCapture, pp + 1)),
        b'$' if pp + 1 == pat.len() => Ok((Item::EndAnchor, pp + 1)),
        L_ESC => read_escape(pat, pp),
        b'[' => {
            let end = class_end(pat, pp)?;
            Ok((Item::Single(SingleItem::Set { start: pp, end }), end + 1))
        }
        b'.' => Ok((Item::Single(SingleItem::Any), pp + 1)),
        _ => Ok((Item::Single(SingleItem::Literal(c)), pp + 1)),
    }
}

/// `pat[pp]` is `%`.
fn read_escape(pat: &[u8], pp: usize) -> PatternResult<(Item, usize)> {
    let Some(&cl) = pat.get(pp + 1) else {
        return Err(PatternError::EndsWithPercent);
    };
    match cl {
        b'b' => {
            if pp + 3 >= pat.len() {
                return Err(PatternError::MissingBalanceArgs);
            }
            let item = Item::Balanced {
                open: pat[pp + 2],
                close: pat[pp + 3],
            };
            Ok((item, pp + 4))
        }
        b'f' => {
            let start = pp + 2;
            if pat.get(start) != Some(&b'[') {
                return Err(PatternError::MissingFrontierSet);
            }
            let end = class_end(pat, start)?;
            Ok((Item::Frontier(SingleItem::Set { start, end }), end + 1))
        }
        b'0'..=b'9' => Ok((Item::BackRef((cl - b'0') as usize), pp + 2)),
        _ if is_class_letter(cl) => Ok((Item::Single(SingleItem::Class(cl)), pp + 2)),
        _ => Ok((Item::Single(SingleItem::Literal(cl)), pp + 2)),
    }
}

/// Find the closing `]` of the set opening at `pat[pp]`.
/// A `]` right after `[` or `[^` is a member, not the terminator.
pub fn class_end(pat: &[u8], pp: usize) -> PatternResult<usize> {
    let mut i = pp + 1;
    if pat.get(i) == Some(&b'^') {
        i += 1;
    }
    // first member is consumed unconditionally
    loop {
        let Some(&c) = pat.get(i) else {
            return Err(PatternError::MissingBracket);
        };
        i += 1;
        if c == L_ESC && i < pat.len() {
            i += 1;
        }
        match pat.get(i) {
            Some(b']') => return Ok(i),
            Some(_) => {}
            None => return Err(PatternError::MissingBracket),
        }
    }
}

/// Quantifier suffix at `pat[ep]`, if any.
#[inline]
pub fn read_quantifier(pat: &[u8], ep: usize) -> Option<Quantifier> {
    match pat.get(ep)? {
        b'*' => Some(Quantifier::Star),
        b'+' => Some(Quantifier::Plus),
        b'-' => Some(Quantifier::Lazy),
        b'?' => Some(Quantifier::Optional),
        _ => None,
    }
}

/// Class letters recognized after `%`, in either case.
#[inline(always)]
pub fn is_class_letter(cl: u8) -> bool {
    matches!(
        cl.to_ascii_lowercase(),
        b'a' | b'c' | b'd' | b'g' | b'l' | b'p' | b's' | b'u' | b'w' | b'x'
    )
}
