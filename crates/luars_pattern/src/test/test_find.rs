// Tests for find: bounds, init handling, plain search, captures
use crate::*;

fn span(s: &str, p: &str) -> Option<(usize, usize)> {
    find(s, p, None, false).unwrap().map(|f| (f.start, f.end))
}

#[test]
fn test_find_literal() {
    let found = find("hello world", "wor", None, false).unwrap().unwrap();
    assert_eq!(
        found,
        Found {
            start: 7,
            end: 9,
            captures: vec![],
        }
    );
    assert_eq!(span("hello world", "xyz"), None);
}

#[test]
fn test_find_pattern() {
    assert_eq!(span("hello", "l+"), Some((3, 4)));
    assert_eq!(span("abc 123 def", "%d+"), Some((5, 7)));
    assert_eq!(span("hello", ".-l"), Some((1, 3)));
    assert_eq!(span("x = 10", "%s*=%s*"), Some((2, 4)));
}

#[test]
fn test_find_empty_pattern() {
    assert_eq!(span("abc", ""), Some((1, 0)));
    assert_eq!(span("", ""), Some((1, 0)));
    let found = find("abc", "", Some(4), false).unwrap().unwrap();
    assert_eq!((found.start, found.end), (4, 3));
    assert_eq!(find("abc", "", Some(5), false).unwrap(), None);
}

#[test]
fn test_find_init() {
    let at = |init| {
        find("abcabc", "abc", Some(init), false)
            .unwrap()
            .map(|f| (f.start, f.end))
    };
    assert_eq!(at(1), Some((1, 3)));
    assert_eq!(at(2), Some((4, 6)));
    assert_eq!(at(-3), Some((4, 6)));
    assert_eq!(at(-100), Some((1, 3)));
    assert_eq!(at(0), Some((1, 3)));
    assert_eq!(at(5), None);
    assert_eq!(at(100), None);
}

#[test]
fn test_find_plain_ignores_magic() {
    let found = find("a.b+c", ".b+", None, true).unwrap().unwrap();
    assert_eq!((found.start, found.end), (2, 4));
    // malformed as a pattern, fine as plain text
    let found = find("a[b", "[", None, true).unwrap().unwrap();
    assert_eq!((found.start, found.end), (2, 2));
    assert_eq!(find("a.b", "%", None, true).unwrap(), None);
}

#[test]
fn test_find_returns_captures() {
    let found = find("key = value", "(%w+)%s*=%s*(%w+)", None, false)
        .unwrap()
        .unwrap();
    assert_eq!((found.start, found.end), (1, 11));
    assert_eq!(
        found.captures,
        vec![Capture::Str(b"key"), Capture::Str(b"value")]
    );
}

#[test]
fn test_find_position_captures() {
    let found = find("hello", "()ll()", None, false).unwrap().unwrap();
    assert_eq!((found.start, found.end), (3, 4));
    assert_eq!(
        found.captures,
        vec![Capture::Position(3), Capture::Position(5)]
    );
}

#[test]
fn test_find_anchored() {
    assert_eq!(span("hello", "^h"), Some((1, 1)));
    assert_eq!(span("hello", "^e"), None);
    let found = find("hello", "^e", Some(2), false).unwrap().unwrap();
    assert_eq!((found.start, found.end), (2, 2));
    // '^' elsewhere is literal
    assert_eq!(span("a^b", "a^b"), Some((1, 3)));
}

#[test]
fn test_find_end_anchor() {
    assert_eq!(span("hello", "o$"), Some((5, 5)));
    assert_eq!(span("hello", "l$"), None);
    assert_eq!(span("hello", "^hello$"), Some((1, 5)));
    // '$' not at the end is literal
    assert_eq!(span("a$b", "a$b"), Some((1, 3)));
}

#[test]
fn test_find_bytes() {
    // UTF-8 bytes of 'é' are not letters
    assert_eq!(span("caf\u{e9}", "%a+"), Some((1, 3)));
    let subject: &[u8] = b"\x00\xffab";
    let found = find(subject, "%a+", None, false).unwrap().unwrap();
    assert_eq!((found.start, found.end), (3, 4));
    let found = find(subject, "\u{0}", None, false).unwrap().unwrap();
    assert_eq!((found.start, found.end), (1, 1));
}

#[test]
fn test_find_with_strlib_handle() {
    let lib = StrLib::default();
    let found = lib.find("one two", "%s", None, false).unwrap().unwrap();
    assert_eq!((found.start, found.end), (4, 4));
    assert_eq!(lib.option(), &MatchOption::default());
}
