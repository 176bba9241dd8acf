// Lua string library pattern functions: find, match, gmatch, gsub
//
// Positions are 1-based at this boundary, like Lua string indexing.
// Subjects and patterns are raw bytes; anything `AsRef<[u8]>` is accepted.

mod gmatch;
mod repl;

use std::borrow::Cow;

use log::trace;
use memchr::memmem;

use crate::error::PatternResult;
use crate::option::MatchOption;
use crate::pattern::{CaptureValue, MatchInfo, MatchState, Pattern, is_plain_pattern};

pub use gmatch::GMatch;
pub use repl::{Repl, ReplTable, ReplValue};

/// A resolved capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture<'s> {
    /// Substring of the subject
    Str(&'s [u8]),
    /// `()` position capture, 1-based
    Position(usize),
}

impl<'s> Capture<'s> {
    pub fn as_bytes(&self) -> Option<&'s [u8]> {
        match *self {
            Capture::Str(s) => Some(s),
            Capture::Position(_) => None,
        }
    }

    pub fn position(&self) -> Option<usize> {
        match *self {
            Capture::Str(_) => None,
            Capture::Position(p) => Some(p),
        }
    }

    /// Bytes of a substring capture, or the decimal text of a position.
    pub fn to_bytes(&self) -> Cow<'s, [u8]> {
        match *self {
            Capture::Str(s) => Cow::Borrowed(s),
            Capture::Position(p) => {
                let mut buffer = itoa::Buffer::new();
                Cow::Owned(buffer.format(p).as_bytes().to_vec())
            }
        }
    }
}

/// Result of `find`: 1-based inclusive bounds plus captures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found<'s> {
    pub start: usize,
    pub end: usize,
    pub captures: Vec<Capture<'s>>,
}

#[inline]
fn to_capture<'s>(src: &'s [u8], value: &CaptureValue) -> Capture<'s> {
    match *value {
        CaptureValue::Substring(start, end) => Capture::Str(&src[start..end]),
        CaptureValue::Position(p) => Capture::Position(p),
    }
}

/// Capture `i` of a match; with no captures, index 0 is the whole match.
pub(crate) fn capture_at<'s>(src: &'s [u8], m: &MatchInfo, i: usize) -> Option<Capture<'s>> {
    match m.captures.get(i) {
        Some(value) => Some(to_capture(src, value)),
        None if i == 0 => Some(Capture::Str(&src[m.start..m.end])),
        None => None,
    }
}

pub(crate) fn get_captures<'s>(src: &'s [u8], m: &MatchInfo, whole_if_none: bool) -> Vec<Capture<'s>> {
    if m.captures.is_empty() {
        if whole_if_none {
            vec![Capture::Str(&src[m.start..m.end])]
        } else {
            Vec::new()
        }
    } else {
        m.captures.iter().map(|value| to_capture(src, value)).collect()
    }
}

/// Convert a Lua 1-based `init` (negative counts from the end) to a 0-based
/// offset. `None` when it lies past `len + 1`.
pub(crate) fn start_offset(init: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let pos = if init > 0 {
        init
    } else if init == 0 || init < -len {
        1
    } else {
        len + init + 1
    };
    if pos > len + 1 {
        None
    } else {
        Some((pos - 1) as usize)
    }
}

/// String pattern functions bound to a set of match limits
#[derive(Debug, Clone, Default)]
pub struct StrLib {
    option: MatchOption,
}

impl StrLib {
    pub fn new(option: MatchOption) -> Self {
        Self { option }
    }

    pub fn option(&self) -> &MatchOption {
        &self.option
    }

    /// string.find(s, pattern [, init [, plain]])
    pub fn find<'s, S, P>(
        &self,
        s: &'s S,
        pattern: &P,
        init: Option<i64>,
        plain: bool,
    ) -> PatternResult<Option<Found<'s>>>
    where
        S: AsRef<[u8]> + ?Sized,
        P: AsRef<[u8]> + ?Sized,
    {
        let src = s.as_ref();
        let pat = pattern.as_ref();
        let Some(init) = start_offset(init.unwrap_or(1), src.len()) else {
            return Ok(None);
        };
        trace!("find: subject {} bytes, init {}, plain {}", src.len(), init, plain);

        // Plain string search, no pattern validation at all
        if plain || is_plain_pattern(pat) {
            return Ok(memmem::find(&src[init..], pat).map(|pos| Found {
                start: init + pos + 1,
                end: init + pos + pat.len(),
                captures: Vec::new(),
            }));
        }

        let pattern = Pattern::new(pat, &self.option)?;
        let mut ms = MatchState::new(src, pattern, &self.option);
        Ok(ms.find_at(init, None)?.map(|m| Found {
            start: m.start + 1,
            end: m.end,
            captures: get_captures(src, &m, false),
        }))
    }

    /// string.match(s, pattern [, init])
    ///
    /// Returns the captures, or the whole match when the pattern has none.
    pub fn r#match<'s, S, P>(
        &self,
        s: &'s S,
        pattern: &P,
        init: Option<i64>,
    ) -> PatternResult<Option<Vec<Capture<'s>>>>
    where
        S: AsRef<[u8]> + ?Sized,
        P: AsRef<[u8]> + ?Sized,
    {
        let src = s.as_ref();
        let Some(init) = start_offset(init.unwrap_or(1), src.len()) else {
            return Ok(None);
        };
        trace!("match: subject {} bytes, init {}", src.len(), init);

        let pattern = Pattern::new(pattern.as_ref(), &self.option)?;
        let mut ms = MatchState::new(src, pattern, &self.option);
        Ok(ms
            .find_at(init, None)?
            .map(|m| get_captures(src, &m, true)))
    }

    /// string.gmatch(s, pattern)
    pub fn gmatch<'s, 'p, S, P>(&self, s: &'s S, pattern: &'p P) -> PatternResult<GMatch<'s, 'p>>
    where
        S: AsRef<[u8]> + ?Sized,
        P: AsRef<[u8]> + ?Sized,
    {
        self.gmatch_at(s, pattern, None)
    }

    /// string.gmatch(s, pattern [, init])
    pub fn gmatch_at<'s, 'p, S, P>(
        &self,
        s: &'s S,
        pattern: &'p P,
        init: Option<i64>,
    ) -> PatternResult<GMatch<'s, 'p>>
    where
        S: AsRef<[u8]> + ?Sized,
        P: AsRef<[u8]> + ?Sized,
    {
        let src = s.as_ref();
        let pattern = Pattern::new(pattern.as_ref(), &self.option)?;
        let start = start_offset(init.unwrap_or(1), src.len());
        trace!("gmatch: subject {} bytes, init {:?}", src.len(), start);
        Ok(GMatch::new(MatchState::new(src, pattern, &self.option), start))
    }

    /// string.gsub(s, pattern, repl [, n])
    ///
    /// Returns the new string and the number of substitutions made.
    pub fn gsub<S, P>(
        &self,
        s: &S,
        pattern: &P,
        mut repl: Repl<'_>,
        n: Option<i64>,
    ) -> PatternResult<(Vec<u8>, usize)>
    where
        S: AsRef<[u8]> + ?Sized,
        P: AsRef<[u8]> + ?Sized,
    {
        let src = s.as_ref();
        let max = n.map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(0));
        // no substitution is attempted, so the pattern is never read
        if max == 0 {
            return Ok((src.to_vec(), 0));
        }
        let pattern = Pattern::new(pattern.as_ref(), &self.option)?;

        let mut ms = MatchState::new(src, pattern, &self.option);
        let mut result = Vec::with_capacity(src.len());
        let mut count = 0usize;
        let mut pos = 0usize;
        let mut last_match = None;

        while count < max {
            let Some(m) = ms.find_at(pos, last_match)? else {
                break;
            };
            // Copy text between last match end and this match start
            result.extend_from_slice(&src[pos..m.start]);
            count += 1;
            repl.add_value(&mut result, src, &m)?;
            pos = m.end;
            last_match = Some(m.end);
            if pattern.is_anchored() {
                break;
            }
        }

        // Copy remaining text
        result.extend_from_slice(&src[pos..]);
        trace!("gsub: {} substitutions, {} -> {} bytes", count, src.len(), result.len());
        Ok((result, count))
    }
}

/// string.find with default limits
pub fn find<'s, S, P>(
    s: &'s S,
    pattern: &P,
    init: Option<i64>,
    plain: bool,
) -> PatternResult<Option<Found<'s>>>
where
    S: AsRef<[u8]> + ?Sized,
    P: AsRef<[u8]> + ?Sized,
{
    StrLib::default().find(s, pattern, init, plain)
}

/// string.match with default limits
pub fn r#match<'s, S, P>(
    s: &'s S,
    pattern: &P,
    init: Option<i64>,
) -> PatternResult<Option<Vec<Capture<'s>>>>
where
    S: AsRef<[u8]> + ?Sized,
    P: AsRef<[u8]> + ?Sized,
{
    StrLib::default().r#match(s, pattern, init)
}

/// string.gmatch with default limits
pub fn gmatch<'s, 'p, S, P>(s: &'s S, pattern: &'p P) -> PatternResult<GMatch<'s, 'p>>
where
    S: AsRef<[u8]> + ?Sized,
    P: AsRef<[u8]> + ?Sized,
{
    StrLib::default().gmatch(s, pattern)
}

/// string.gmatch with an `init` offset and default limits
pub fn gmatch_at<'s, 'p, S, P>(
    s: &'s S,
    pattern: &'p P,
    init: Option<i64>,
) -> PatternResult<GMatch<'s, 'p>>
where
    S: AsRef<[u8]> + ?Sized,
    P: AsRef<[u8]> + ?Sized,
{
    StrLib::default().gmatch_at(s, pattern, init)
}

/// string.gsub with default limits
pub fn gsub<S, P>(s: &S, pattern: &P, repl: Repl<'_>, n: Option<i64>) -> PatternResult<(Vec<u8>, usize)>
where
    S: AsRef<[u8]> + ?Sized,
    P: AsRef<[u8]> + ?Sized,
{
    StrLib::default().gsub(s, pattern, repl, n)
}
