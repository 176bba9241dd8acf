//! Centralized pattern-matching limits and constants.
//!
//! Mirrors Lua 5.4's `lstrlib.c` / `luaconf.h` values. All magic numbers
//! that bound the matcher are collected here.

// ===== Captures =====

/// Maximum number of captures a single pattern may declare.
/// Matches Lua 5.4's LUA_MAXCAPTURES.
pub const LUA_MAXCAPTURES: usize = 32;

// ===== Recursion =====

/// Maximum match recursion depth before "pattern too complex".
/// Matches Lua 5.4's MAXCCALLS for `match`.
pub const MAXCCALLS_PATTERN: usize = 200;

// ===== Pattern syntax =====

/// Escape byte for classes and literal magic characters.
pub const L_ESC: u8 = b'%';

/// Bytes that make a pattern non-literal. A pattern containing none of these
/// can be searched as a plain substring.
pub const SPECIALS: &[u8] = b"^$*+?.([%-";
