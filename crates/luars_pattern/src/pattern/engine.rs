// Core pattern matching engine: direct interpretation, no AST
//
// Follows C Lua's lstrlib.c design:
// - Pattern is validated once, then walked with index arithmetic
// - MatchState holds subject, pattern, captures and the depth budget
// - do_match recursively walks the pattern with backtracking
// - Fixed capture slots (no heap alloc during matching)

use log::debug;
use memchr::memmem;

use super::capture::{CaptureLen, CaptureResults, CaptureStack};
use super::class::single_match;
use super::item::{Item, Quantifier, SingleItem, read_item, read_quantifier};
use crate::error::{PatternError, PatternResult};
use crate::limits::{LUA_MAXCAPTURES, SPECIALS};
use crate::option::MatchOption;

/// Check if pattern has no special characters (can be matched as plain text).
/// Mirrors C Lua's `nospecials()` in lstrlib.c.
#[inline]
pub fn is_plain_pattern(pat: &[u8]) -> bool {
    !pat.iter().any(|c| SPECIALS.contains(c))
}

/// A validated pattern. Borrows the pattern bytes; nothing is compiled.
#[derive(Debug, Clone, Copy)]
pub struct Pattern<'p> {
    src: &'p [u8],
    anchored: bool,
    plain: bool,
}

impl<'p> Pattern<'p> {
    /// Validate `pat` against the limits in `option`.
    ///
    /// A stray `)` is not a magic byte for plain `find`, but it is still an
    /// error here, so such patterns go through validation.
    pub fn new(pat: &'p [u8], option: &MatchOption) -> PatternResult<Self> {
        if is_plain_pattern(pat) && !pat.contains(&b')') {
            return Ok(Self {
                src: pat,
                anchored: false,
                plain: true,
            });
        }
        let anchored = pat.first() == Some(&b'^');
        let body = usize::from(anchored);
        validate_pattern(pat, body, option.capture_limit()).inspect_err(|e| {
            debug!("rejected pattern {:?}: {}", String::from_utf8_lossy(pat), e);
        })?;
        Ok(Self {
            src: pat,
            anchored,
            plain: false,
        })
    }

    #[inline]
    pub fn as_bytes(&self) -> &'p [u8] {
        self.src
    }

    /// Starts with `^`: only the initial offset is tried.
    #[inline]
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// No magic characters at all.
    #[inline]
    pub fn is_plain(&self) -> bool {
        self.plain
    }

    /// Offset of the first item after a leading `^`.
    #[inline]
    fn body(&self) -> usize {
        usize::from(self.anchored)
    }
}

/// Walk every item once, reporting syntax and capture errors up front.
/// Returns the number of captures declared.
fn validate_pattern(pat: &[u8], mut pp: usize, limit: usize) -> PatternResult<usize> {
    let mut total = 0usize;
    let mut closed = [false; LUA_MAXCAPTURES];
    // indices of captures still open, innermost last
    let mut open = [0usize; LUA_MAXCAPTURES];
    let mut open_level = 0usize;
    loop {
        let (item, ep) = read_item(pat, pp)?;
        match item {
            Item::End => break,
            Item::OpenCapture | Item::PositionCapture => {
                if total >= limit {
                    return Err(PatternError::TooManyCaptures);
                }
                if item == Item::OpenCapture {
                    open[open_level] = total;
                    open_level += 1;
                } else {
                    closed[total] = true;
                }
                total += 1;
            }
            Item::CloseCapture => {
                if open_level == 0 {
                    return Err(PatternError::InvalidPatternCapture);
                }
                open_level -= 1;
                closed[open[open_level]] = true;
            }
            Item::BackRef(n) => {
                if n == 0 || n > total || !closed[n - 1] {
                    return Err(PatternError::InvalidCaptureIndex(n));
                }
            }
            Item::Single(_) => {
                if read_quantifier(pat, ep).is_some() {
                    pp = ep + 1;
                    continue;
                }
            }
            Item::EndAnchor | Item::Balanced { .. } | Item::Frontier(_) => {}
        }
        pp = ep;
    }
    if open_level > 0 {
        return Err(PatternError::UnfinishedCapture);
    }
    Ok(total)
}

/// Information about a single match
#[derive(Debug, Clone, Copy)]
pub struct MatchInfo {
    pub start: usize, // byte offset
    pub end: usize,   // byte offset, exclusive
    pub captures: CaptureResults,
}

/// All matching context for one run
pub struct MatchState<'s, 'p> {
    src: &'s [u8],
    pattern: Pattern<'p>,
    captures: CaptureStack,
    depth: usize, // remaining recursion budget
    max_depth: usize,
}

impl<'s, 'p> MatchState<'s, 'p> {
    pub fn new(src: &'s [u8], pattern: Pattern<'p>, option: &MatchOption) -> Self {
        Self {
            src,
            pattern,
            captures: CaptureStack::new(option.capture_limit()),
            depth: option.max_match_depth,
            max_depth: option.max_match_depth,
        }
    }

    #[inline]
    pub fn subject(&self) -> &'s [u8] {
        self.src
    }

    #[inline]
    pub fn pattern(&self) -> &Pattern<'p> {
        &self.pattern
    }

    /// Reset for the next start offset
    #[inline]
    fn reset(&mut self) {
        self.captures.reset();
        self.depth = self.max_depth;
    }

    /// Find the leftmost match starting at or after `init`.
    ///
    /// A match ending exactly at `last_match` is rejected and the search
    /// moves on; gmatch and gsub use this to skip an empty match right
    /// after the previous one.
    pub fn find_at(
        &mut self,
        init: usize,
        last_match: Option<usize>,
    ) -> PatternResult<Option<MatchInfo>> {
        let len = self.src.len();
        if init > len {
            return Ok(None);
        }

        // FAST PATH: plain non-empty pattern never matches empty
        let pat = self.pattern.as_bytes();
        if self.pattern.is_plain() && !pat.is_empty() {
            return Ok(memmem::find(&self.src[init..], pat).map(|pos| MatchInfo {
                start: init + pos,
                end: init + pos + pat.len(),
                captures: CaptureResults::new(),
            }));
        }

        let body = self.pattern.body();
        let mut si = init;
        loop {
            self.reset();
            if let Some(end) = self.do_match(si, body)?
                && Some(end) != last_match
            {
                let captures = self.captures.results()?;
                return Ok(Some(MatchInfo {
                    start: si,
                    end,
                    captures,
                }));
            }
            if self.pattern.is_anchored() || si >= len {
                return Ok(None);
            }
            si += 1;
        }
    }

    /// Try to match the pattern from `pat[p]` against the subject from `src[s]`.
    /// Returns `Some(end)` on success (offset past the match), `None` on failure.
    fn do_match(&mut self, s: usize, p: usize) -> PatternResult<Option<usize>> {
        if self.depth == 0 {
            debug!("pattern too complex: match depth {} exhausted", self.max_depth);
            return Err(PatternError::TooComplex);
        }
        self.depth -= 1;
        let result = self.match_inner(s, p);
        self.depth += 1;
        result
    }

    fn match_inner(&mut self, mut s: usize, mut p: usize) -> PatternResult<Option<usize>> {
        // Items that need no backtracking loop here instead of recursing
        loop {
            let (item, ep) = read_item(self.pattern.as_bytes(), p)?;
            match item {
                Item::End => return Ok(Some(s)),
                Item::EndAnchor => return Ok((s == self.src.len()).then_some(s)),
                Item::OpenCapture => return self.start_capture(s, ep, CaptureLen::Unfinished),
                Item::PositionCapture => return self.start_capture(s, ep, CaptureLen::Position),
                Item::CloseCapture => return self.end_capture(s, ep),
                Item::Balanced { open, close } => match self.match_balance(s, open, close) {
                    Some(e) => s = e,
                    None => return Ok(None),
                },
                Item::Frontier(set) => {
                    if !self.match_frontier(s, &set) {
                        return Ok(None);
                    }
                }
                Item::BackRef(n) => match self.match_backref(s, n)? {
                    Some(e) => s = e,
                    None => return Ok(None),
                },
                Item::Single(single) => {
                    let matched = self.single_at(s, &single);
                    match read_quantifier(self.pattern.as_bytes(), ep) {
                        None => {
                            if !matched {
                                return Ok(None);
                            }
                            s += 1;
                        }
                        Some(Quantifier::Optional) => {
                            if matched && let Some(e) = self.do_match(s + 1, ep + 1)? {
                                return Ok(Some(e));
                            }
                            p = ep + 1;
                            continue;
                        }
                        Some(Quantifier::Plus) => {
                            return if matched {
                                self.max_expand(s + 1, &single, ep + 1)
                            } else {
                                Ok(None)
                            };
                        }
                        Some(Quantifier::Star) => return self.max_expand(s, &single, ep + 1),
                        Some(Quantifier::Lazy) => return self.min_expand(s, &single, ep + 1),
                    }
                }
            }
            p = ep;
        }
    }

    #[inline(always)]
    fn single_at(&self, s: usize, single: &SingleItem) -> bool {
        self.src
            .get(s)
            .is_some_and(|&c| single_match(c, single, self.pattern.as_bytes()))
    }

    /// Greedy repetition (*, +): longest run first, then shorter
    fn max_expand(
        &mut self,
        s: usize,
        single: &SingleItem,
        rp: usize, // rest of pattern (after repetition char)
    ) -> PatternResult<Option<usize>> {
        let mut count = 0;
        while self.single_at(s + count, single) {
            count += 1;
        }
        loop {
            if let Some(end) = self.do_match(s + count, rp)? {
                return Ok(Some(end));
            }
            if count == 0 {
                return Ok(None);
            }
            count -= 1;
        }
    }

    /// Lazy repetition (-): shortest run first, then longer
    fn min_expand(
        &mut self,
        mut s: usize,
        single: &SingleItem,
        rp: usize,
    ) -> PatternResult<Option<usize>> {
        loop {
            if let Some(end) = self.do_match(s, rp)? {
                return Ok(Some(end));
            }
            if self.single_at(s, single) {
                s += 1;
            } else {
                return Ok(None);
            }
        }
    }

    /// Open a new capture (`(` or `()`)
    fn start_capture(&mut self, s: usize, p: usize, len: CaptureLen) -> PatternResult<Option<usize>> {
        self.captures.push(s, len)?;
        let result = self.do_match(s, p)?;
        if result.is_none() {
            self.captures.pop(); // undo
        }
        Ok(result)
    }

    /// Close the most recent unfinished capture
    fn end_capture(&mut self, s: usize, p: usize) -> PatternResult<Option<usize>> {
        let n = self.captures.innermost_open()?;
        self.captures.close(n, s);
        let result = self.do_match(s, p)?;
        if result.is_none() {
            // Undo close on backtrack
            self.captures.reopen(n);
        }
        Ok(result)
    }

    /// Balanced match %bxy
    fn match_balance(&self, s: usize, open: u8, close: u8) -> Option<usize> {
        if self.src.get(s) != Some(&open) {
            return None;
        }
        let mut depth = 1usize;
        for (i, &c) in self.src.iter().enumerate().skip(s + 1) {
            if c == close {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            } else if c == open {
                depth += 1;
            }
        }
        None
    }

    /// Frontier %f[set]; the subject is bounded by `\0` on both sides
    fn match_frontier(&self, s: usize, set: &SingleItem) -> bool {
        let pat = self.pattern.as_bytes();
        let prev = if s == 0 { 0 } else { self.src[s - 1] };
        let curr = self.src.get(s).copied().unwrap_or(0);
        !single_match(prev, set, pat) && single_match(curr, set, pat)
    }

    /// Back reference %1-%9
    fn match_backref(&self, s: usize, n: usize) -> PatternResult<Option<usize>> {
        let slot = *self.captures.closed(n)?;
        // a position capture records no bytes and never matches
        let CaptureLen::Len(len) = slot.len else {
            return Ok(None);
        };
        let captured = &self.src[slot.start..slot.start + len];
        Ok(self
            .src
            .get(s..s + len)
            .filter(|window| *window == captured)
            .map(|_| s + len))
    }
}

/// Find pattern in subject. `init` is a 0-based byte offset.
pub fn find(
    subject: &[u8],
    pat: &[u8],
    init: usize,
    option: &MatchOption,
) -> PatternResult<Option<MatchInfo>> {
    let pattern = Pattern::new(pat, option)?;
    MatchState::new(subject, pattern, option).find_at(init, None)
}
