// Lua pattern matching over raw bytes, modeled after C Lua's lstrlib.c
//
// Every byte is a "character"; there is no UTF-8 awareness.
//
// 1. No AST or compile phase: pattern bytes are interpreted while matching
// 2. One validation walk up front, so malformed patterns fail before any matching
// 3. Fixed-size capture array (32 slots), no heap allocation while matching
// 4. Recursion depth is bounded by `MatchOption::max_match_depth`

mod capture;
mod class;
mod engine;
mod item;

pub use capture::{CaptureResults, CaptureValue};
pub use class::match_class;
pub use engine::{MatchInfo, MatchState, Pattern, find, is_plain_pattern};
