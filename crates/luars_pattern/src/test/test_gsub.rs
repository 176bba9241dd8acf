// Tests for gsub: templates, callbacks, tables, limits
use std::collections::HashMap;

use crate::*;

fn sub(s: &str, p: &str, r: &str, n: Option<i64>) -> (String, usize) {
    let (out, count) = gsub(s, p, Repl::from(r), n).unwrap();
    (String::from_utf8(out).unwrap(), count)
}

#[test]
fn test_gsub_literal() {
    assert_eq!(sub("hello world", "o", "0", None), ("hell0 w0rld".into(), 2));
    assert_eq!(sub("hello world", "o", "0", Some(1)), ("hell0 world".into(), 1));
    assert_eq!(sub("abc", "z", "y", None), ("abc".into(), 0));
}

#[test]
fn test_gsub_limit() {
    assert_eq!(sub("aaa", "a", "b", Some(0)), ("aaa".into(), 0));
    assert_eq!(sub("aaa", "a", "b", Some(-1)), ("aaa".into(), 0));
    assert_eq!(sub("aaa", "a", "b", Some(2)), ("bba".into(), 2));
    assert_eq!(sub("aaa", "a", "b", Some(10)), ("bbb".into(), 3));
}

#[test]
fn test_gsub_zero_limit_skips_pattern() {
    assert_eq!(sub("x", "(", "y", Some(0)), ("x".into(), 0));
    assert_eq!(sub("x", "[a", "y", Some(-2)), ("x".into(), 0));
    assert_eq!(
        gsub("x", "(", Repl::from("y"), Some(1)).unwrap_err(),
        PatternError::UnfinishedCapture
    );
}

#[test]
fn test_gsub_template() {
    assert_eq!(
        sub("hello world", "%w+", "%0 %0", None),
        ("hello hello world world".into(), 2)
    );
    assert_eq!(
        sub("hello world", "(%w+) (%w+)", "%2 %1", None),
        ("world hello".into(), 1)
    );
    assert_eq!(sub("50", "%d+", "%0%%", None), ("50%".into(), 1));
    // %1 without captures is the whole match
    assert_eq!(sub("abc", "b", "[%1]", None), ("a[b]c".into(), 1));
    assert_eq!(sub("abc", "()b", "%1", None), ("a2c".into(), 1));
}

#[test]
fn test_gsub_template_errors() {
    let err = |r: &str| gsub("abc", "(b)", Repl::from(r), None).unwrap_err();
    assert_eq!(err("%2"), PatternError::InvalidReplacementIndex(2));
    assert_eq!(err("%x"), PatternError::InvalidReplacement);
    assert_eq!(err("tail%"), PatternError::InvalidReplacement);
    assert_eq!(
        err("%9").to_string(),
        "invalid capture index %9 in replacement string"
    );
    // never expanded without a match
    assert_eq!(sub("abc", "z", "%9", None), ("abc".into(), 0));
}

#[test]
fn test_gsub_empty_matches() {
    assert_eq!(sub("hello world", "%w*", "x", None), ("x x".into(), 2));
    assert_eq!(sub("abc", "", "-", None), ("-a-b-c-".into(), 4));
    assert_eq!(sub("", "", "-", None), ("-".into(), 1));
    assert_eq!(sub("abc", "x*", "-", None), ("-a-b-c-".into(), 4));
}

#[test]
fn test_gsub_anchored() {
    assert_eq!(sub("aaa", "^a", "b", None), ("baa".into(), 1));
    assert_eq!(sub("hello", "^", ">", None), (">hello".into(), 1));
    assert_eq!(sub("xaa", "^a", "b", None), ("xaa".into(), 0));
}

#[test]
fn test_gsub_func_uppercase_words() {
    let mut upper =
        |caps: &[Capture<'_>]| Some(ReplValue::from(caps[0].to_bytes().to_ascii_uppercase()));
    let (out, count) = gsub("THE (quick) fox", "%f[%a]%a+", Repl::Func(&mut upper), None).unwrap();
    assert_eq!(out, b"THE (QUICK) FOX");
    assert_eq!(count, 3);
}

#[test]
fn test_gsub_func_keep_and_values() {
    let mut only_b = |caps: &[Capture<'_>]| {
        (caps[0] == Capture::Str(b"b")).then(|| ReplValue::from("B"))
    };
    let (out, count) = gsub("abc", "%w", Repl::Func(&mut only_b), None).unwrap();
    assert_eq!(out, b"aBc");
    // kept matches still count
    assert_eq!(count, 3);

    let mut seen = Vec::new();
    let mut numbers = |caps: &[Capture<'_>]| {
        seen.push(caps.len());
        Some(ReplValue::Integer(caps.len() as i64))
    };
    let (out, _) = gsub("k=v x=y", "(%w)=(%w)", Repl::Func(&mut numbers), None).unwrap();
    assert_eq!(out, b"2 2");
    assert_eq!(seen, vec![2, 2]);

    let mut half = |_: &[Capture<'_>]| Some(ReplValue::Number(0.5));
    let (out, _) = gsub("a", "a", Repl::Func(&mut half), None).unwrap();
    assert_eq!(out, b"0.5");
}

#[test]
fn test_gsub_table() {
    let mut vars: HashMap<&[u8], ReplValue> = HashMap::new();
    vars.insert(b"name", ReplValue::from("Ann"));
    vars.insert(b"age", ReplValue::from(30i64));
    let (out, count) = gsub(
        "$name is $age, $unknown",
        "%$(%w+)",
        Repl::Table(&vars),
        None,
    )
    .unwrap();
    assert_eq!(out, b"Ann is 30, $unknown");
    assert_eq!(count, 3);
}

#[test]
fn test_gsub_table_with_ahash() {
    let mut table: HashMap<Vec<u8>, String, ahash::RandomState> =
        HashMap::with_hasher(ahash::RandomState::new());
    table.insert(b"hello".to_vec(), "hi".to_string());
    let (out, count) = gsub("hello world", "%w+", Repl::Table(&table), None).unwrap();
    assert_eq!(out, b"hi world");
    assert_eq!(count, 2);

    // position keys never hit a byte-keyed table
    let (out, count) = gsub("abc", "()b", Repl::Table(&table), None).unwrap();
    assert_eq!(out, b"abc");
    assert_eq!(count, 1);
}

#[test]
fn test_gsub_with_strlib_handle() {
    let lib = StrLib::new(MatchOption::default());
    let (out, count) = lib
        .gsub("a,b,,c", ",", Repl::from(";"), None)
        .unwrap();
    assert_eq!(out, b"a;b;;c");
    assert_eq!(count, 3);
}
