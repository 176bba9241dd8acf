// Capture stack for a single matching run
//
// Fixed-size slot array indexed by capture-open order. Slots are mutated in
// place and rolled back while the matcher backtracks, so no allocation
// happens inside the hot loop.

use crate::error::{PatternError, PatternResult};
use crate::limits::LUA_MAXCAPTURES;

/// Byte length of a closed capture, or a marker for open and position captures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureLen {
    Unfinished,
    Position,
    Len(usize),
}

/// A single capture slot
#[derive(Debug, Clone, Copy)]
pub struct CaptureSlot {
    pub start: usize, // start offset in subject
    pub len: CaptureLen,
}

const EMPTY_SLOT: CaptureSlot = CaptureSlot {
    start: 0,
    len: CaptureLen::Unfinished,
};

pub struct CaptureStack {
    slots: [CaptureSlot; LUA_MAXCAPTURES],
    level: usize,
    limit: usize,
}

impl CaptureStack {
    pub fn new(limit: usize) -> Self {
        Self {
            slots: [EMPTY_SLOT; LUA_MAXCAPTURES],
            level: 0,
            limit: limit.min(LUA_MAXCAPTURES),
        }
    }

    /// Forget all captures (avoids re-zeroing the slot array)
    #[inline]
    pub fn reset(&mut self) {
        self.level = 0;
    }

    /// Push a new capture starting at `start`. Returns its index.
    pub fn push(&mut self, start: usize, len: CaptureLen) -> PatternResult<usize> {
        if self.level >= self.limit {
            return Err(PatternError::TooManyCaptures);
        }
        let n = self.level;
        self.slots[n] = CaptureSlot { start, len };
        self.level = n + 1;
        Ok(n)
    }

    /// Drop the most recent capture (undo of `push` on backtrack)
    #[inline]
    pub fn pop(&mut self) {
        self.level -= 1;
    }

    /// Index of the innermost capture that is still open
    pub fn innermost_open(&self) -> PatternResult<usize> {
        self.slots[..self.level]
            .iter()
            .rposition(|slot| slot.len == CaptureLen::Unfinished)
            .ok_or(PatternError::InvalidPatternCapture)
    }

    /// Close capture `n` at subject offset `end`
    #[inline]
    pub fn close(&mut self, n: usize, end: usize) {
        self.slots[n].len = CaptureLen::Len(end - self.slots[n].start);
    }

    /// Undo of `close` on backtrack
    #[inline]
    pub fn reopen(&mut self, n: usize) {
        self.slots[n].len = CaptureLen::Unfinished;
    }

    /// Slot for the 1-based backreference `%n`. Open or missing captures are
    /// invalid references.
    pub fn closed(&self, n: usize) -> PatternResult<&CaptureSlot> {
        match n.checked_sub(1).and_then(|i| self.slots[..self.level].get(i)) {
            Some(slot) if slot.len != CaptureLen::Unfinished => Ok(slot),
            _ => Err(PatternError::InvalidCaptureIndex(n)),
        }
    }

    /// Resolve the captures of a successful match
    pub fn results(&self) -> PatternResult<CaptureResults> {
        let mut result = CaptureResults::new();
        for slot in &self.slots[..self.level] {
            let value = match slot.len {
                CaptureLen::Len(len) => CaptureValue::Substring(slot.start, slot.start + len),
                CaptureLen::Position => CaptureValue::Position(slot.start + 1),
                CaptureLen::Unfinished => return Err(PatternError::UnfinishedCapture),
            };
            result.data[result.count] = value;
            result.count += 1;
        }
        Ok(result)
    }
}

/// A capture value returned to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureValue {
    Substring(usize, usize), // start, end offsets in subject
    Position(usize),         // 1-based position
}

/// Resolved captures of one match, stored inline
#[derive(Debug, Clone, Copy)]
pub struct CaptureResults {
    data: [CaptureValue; LUA_MAXCAPTURES],
    count: usize,
}

impl CaptureResults {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            data: [CaptureValue::Substring(0, 0); LUA_MAXCAPTURES],
            count: 0,
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, CaptureValue> {
        self.data[..self.count].iter()
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&CaptureValue> {
        self.data[..self.count].get(index)
    }
}

impl Default for CaptureResults {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a CaptureResults {
    type Item = &'a CaptureValue;
    type IntoIter = std::slice::Iter<'a, CaptureValue>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.data[..self.count].iter()
    }
}
