use std::iter::FusedIterator;

use log::trace;

use super::{Capture, get_captures};
use crate::error::PatternResult;
use crate::pattern::MatchState;

/// Iterator returned by `gmatch`.
///
/// Each step resumes the search where the previous match ended and yields
/// the captures (or the whole match). An empty match ending where the
/// previous match ended is skipped, so the cursor always moves forward.
/// With a `^` anchor only the starting offset is tried, once.
/// After the subject is exhausted or an error is yielded the iterator is done.
pub struct GMatch<'s, 'p> {
    ms: MatchState<'s, 'p>,
    pos: usize,
    last_match: Option<usize>,
    done: bool,
}

impl<'s, 'p> GMatch<'s, 'p> {
    /// `start` of `None` gives an exhausted iterator
    pub(crate) fn new(ms: MatchState<'s, 'p>, start: Option<usize>) -> Self {
        Self {
            ms,
            pos: start.unwrap_or(0),
            last_match: None,
            done: start.is_none(),
        }
    }
}

impl<'s> Iterator for GMatch<'s, '_> {
    type Item = PatternResult<Vec<Capture<'s>>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.ms.pattern().is_anchored() {
            self.done = true;
        }
        match self.ms.find_at(self.pos, self.last_match) {
            Ok(Some(m)) => {
                self.pos = m.end;
                self.last_match = Some(m.end);
                Some(Ok(get_captures(self.ms.subject(), &m, true)))
            }
            Ok(None) => {
                trace!("gmatch: exhausted at offset {}", self.pos);
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for GMatch<'_, '_> {}
