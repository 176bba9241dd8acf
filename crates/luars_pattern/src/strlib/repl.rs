// gsub replacement: template string, callback or keyed lookup

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use memchr::memchr;

use super::{Capture, capture_at, get_captures};
use crate::error::{PatternError, PatternResult};
use crate::limits::L_ESC;
use crate::pattern::MatchInfo;

/// Replacement argument of `gsub`
pub enum Repl<'r> {
    /// Template where `%0`-`%9` expand to captures and `%%` is a literal `%`
    Str(&'r [u8]),
    /// Called with the captures of each match (the whole match if the pattern
    /// has none). `None` keeps the matched text.
    Func(&'r mut dyn FnMut(&[Capture<'_>]) -> Option<ReplValue>),
    /// Looked up with the first capture (or the whole match). A miss keeps
    /// the matched text.
    Table(&'r dyn ReplTable),
}

impl<'r> From<&'r str> for Repl<'r> {
    fn from(s: &'r str) -> Self {
        Repl::Str(s.as_bytes())
    }
}

impl<'r> From<&'r [u8]> for Repl<'r> {
    fn from(s: &'r [u8]) -> Self {
        Repl::Str(s)
    }
}

impl Repl<'_> {
    /// Append the replacement for match `m` to `out`
    pub(crate) fn add_value(&mut self, out: &mut Vec<u8>, src: &[u8], m: &MatchInfo) -> PatternResult<()> {
        let value = match self {
            Repl::Str(template) => return add_template(out, *template, src, m),
            Repl::Func(f) => (*f)(&get_captures(src, m, true)),
            Repl::Table(table) => match capture_at(src, m, 0) {
                Some(key) => table.lookup(&key),
                None => None,
            },
        };
        match value {
            Some(value) => value.write_to(out),
            // keep original text
            None => out.extend_from_slice(&src[m.start..m.end]),
        }
        Ok(())
    }
}

fn add_template(out: &mut Vec<u8>, template: &[u8], src: &[u8], m: &MatchInfo) -> PatternResult<()> {
    let mut rest = template;
    while let Some(i) = memchr(L_ESC, rest) {
        out.extend_from_slice(&rest[..i]);
        let Some(&c) = rest.get(i + 1) else {
            return Err(PatternError::InvalidReplacement);
        };
        match c {
            L_ESC => out.push(L_ESC),
            b'0' => out.extend_from_slice(&src[m.start..m.end]),
            b'1'..=b'9' => {
                let n = (c - b'0') as usize;
                match capture_at(src, m, n - 1) {
                    Some(Capture::Str(s)) => out.extend_from_slice(s),
                    Some(Capture::Position(p)) => {
                        let mut buffer = itoa::Buffer::new();
                        out.extend_from_slice(buffer.format(p).as_bytes());
                    }
                    None => return Err(PatternError::InvalidReplacementIndex(n)),
                }
            }
            _ => return Err(PatternError::InvalidReplacement),
        }
        rest = &rest[i + 2..];
    }
    out.extend_from_slice(rest);
    Ok(())
}

/// Value produced by a replacement callback or table
#[derive(Debug, Clone, PartialEq)]
pub enum ReplValue {
    Bytes(Vec<u8>),
    Integer(i64),
    Number(f64),
}

impl ReplValue {
    /// Append the string form of this value, the way `tostring` renders it
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            ReplValue::Bytes(b) => out.extend_from_slice(b),
            ReplValue::Integer(i) => {
                let mut buffer = itoa::Buffer::new();
                out.extend_from_slice(buffer.format(*i).as_bytes());
            }
            ReplValue::Number(n) => out.extend_from_slice(format_number(*n).as_bytes()),
        }
    }
}

/// `%.14g`, with `.0` appended when the result reads as an integer
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return if n.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if n.is_infinite() {
        return if n < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    const PRECISION: i32 = 14;
    // rounding to the final precision can bump the exponent (9.99..e14)
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, n);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= PRECISION {
        let mantissa = trim_fraction(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    } else {
        let digits = (PRECISION - 1 - exp).max(0) as usize;
        let fixed = format!("{:.*}", digits, n);
        let fixed = trim_fraction(&fixed);
        if fixed.bytes().all(|b| b == b'-' || b.is_ascii_digit()) {
            format!("{}.0", fixed)
        } else {
            fixed.to_string()
        }
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

impl From<&str> for ReplValue {
    fn from(s: &str) -> Self {
        ReplValue::Bytes(s.as_bytes().to_vec())
    }
}

impl From<String> for ReplValue {
    fn from(s: String) -> Self {
        ReplValue::Bytes(s.into_bytes())
    }
}

impl From<&[u8]> for ReplValue {
    fn from(b: &[u8]) -> Self {
        ReplValue::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for ReplValue {
    fn from(b: Vec<u8>) -> Self {
        ReplValue::Bytes(b)
    }
}

impl From<i64> for ReplValue {
    fn from(i: i64) -> Self {
        ReplValue::Integer(i)
    }
}

impl From<f64> for ReplValue {
    fn from(n: f64) -> Self {
        ReplValue::Number(n)
    }
}

impl From<Capture<'_>> for ReplValue {
    fn from(cap: Capture<'_>) -> Self {
        match cap {
            Capture::Str(s) => ReplValue::Bytes(s.to_vec()),
            Capture::Position(p) => ReplValue::Integer(p as i64),
        }
    }
}

/// Keyed lookup used by `Repl::Table`
pub trait ReplTable {
    fn lookup(&self, key: &Capture<'_>) -> Option<ReplValue>;
}

/// Byte-string keyed maps. Position captures are integer keys and never
/// hit a byte-keyed map.
impl<K, V, S> ReplTable for HashMap<K, V, S>
where
    K: Borrow<[u8]> + Eq + Hash,
    V: Clone + Into<ReplValue>,
    S: BuildHasher,
{
    fn lookup(&self, key: &Capture<'_>) -> Option<ReplValue> {
        let key = key.as_bytes()?;
        self.get(key).map(|v| v.clone().into())
    }
}
