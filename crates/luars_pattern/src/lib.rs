// Lua Patterns
// Lua 5.4 string pattern matching over raw bytes: find, match, gmatch, gsub

#[cfg(test)]
mod test;

pub mod error;
pub mod limits;
pub mod option;
pub mod pattern;
pub mod strlib;

pub use error::{PatternError, PatternResult};
pub use option::MatchOption;
pub use strlib::{
    Capture, Found, GMatch, Repl, ReplTable, ReplValue, StrLib, find, gmatch, gmatch_at, gsub,
    r#match,
};
