use crate::limits::{LUA_MAXCAPTURES, MAXCCALLS_PATTERN};

/// Resource limits for a matching run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatchOption {
    /// Nested `match` calls allowed before the run fails with
    /// "pattern too complex".
    pub max_match_depth: usize,
    /// Captures a pattern may declare. Values above `LUA_MAXCAPTURES`
    /// are clamped, the capture stack never grows past it.
    pub max_captures: usize,
}

impl Default for MatchOption {
    fn default() -> Self {
        Self {
            max_match_depth: MAXCCALLS_PATTERN,
            max_captures: LUA_MAXCAPTURES,
        }
    }
}

impl MatchOption {
    #[inline]
    pub fn capture_limit(&self) -> usize {
        self.max_captures.min(LUA_MAXCAPTURES)
    }
}
