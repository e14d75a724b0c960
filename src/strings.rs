//! String helpers.
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

static FIRST_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("valid regex"));
static ALL_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z0-9])([A-Z])").expect("valid regex"));

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `"fooBar"` → `"foo_bar"`, `"HTTPServer"` → `"http_server"`.
///
/// Whitespace is left as is.
pub fn to_snake_case(s: &str) -> String {
    let snake = FIRST_CAP.replace_all(s, "${1}_${2}");
    let snake = ALL_CAP.replace_all(&snake, "${1}_${2}");
    snake.to_lowercase()
}

/// Upper-cases the first character.
///
/// Only one-to-one mappings apply: a character whose upper case spans
/// several characters, like `'ß'`, is kept as is.
pub fn uc_first(s: &str) -> String {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut upper = first.to_uppercase();
    let first = match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => first,
    };
    std::iter::once(first).chain(chars).collect()
}

/// Random string of `n` ASCII letters.
pub fn rand_string(n: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}

/// Decodes `bytes` as UTF-8, dropping every invalid sequence.
pub fn to_valid_utf8(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Pads with spaces on the right up to `width` characters.
pub fn pad_right(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}

/// Pads with spaces on the left up to `width` characters.
pub fn pad_left(s: &str, width: usize) -> String {
    format!("{s:>width$}")
}

#[cfg(test)]
mod tests {
    use crate::strings::*;

    #[test]
    fn upper_cases_first() {
        for (subject, expected) in [
            ("", ""),
            (" ", " "),
            ("foo", "Foo"),
            ("bar", "Bar"),
            ("ärger", "Ärger"),
            ("ßtraße", "ßtraße"),
            (
                "found 55 table(s) in the source database [glasshouse]",
                "Found 55 table(s) in the source database [glasshouse]",
            ),
        ] {
            assert_eq!(uc_first(subject), expected);
        }
    }

    #[test]
    fn snake_cases() {
        for (subject, expected) in [
            ("", ""),
            (" ", " "),
            ("foo bar", "foo bar"),
            ("fooBar", "foo_bar"),
            ("FooBarBaz", "foo_bar_baz"),
            ("HTTPServer", "http_server"),
            ("version2Id", "version2_id"),
        ] {
            assert_eq!(to_snake_case(subject), expected, "{subject}");
        }
    }

    #[test]
    fn random_letters() {
        let s = rand_string(64);
        assert_eq!(s.len(), 64);
        assert!(s.chars().all(|c| c.is_ascii_alphabetic()));
        assert_eq!(rand_string(0), "");
    }

    #[test]
    fn drops_invalid_utf8() {
        assert_eq!(to_valid_utf8(b"abc"), "abc");
        assert_eq!(to_valid_utf8(b"a\xffb\xc3"), "ab");
        assert_eq!(to_valid_utf8("héllo".as_bytes()), "héllo");
    }

    #[test]
    fn pads() {
        assert_eq!(pad_left("apple", 8), "   apple");
        assert_eq!(pad_right("apple", 8), "apple   ");
        assert_eq!(pad_left("banana", 5), "banana");
        assert_eq!(pad_right("banana", 5), "banana");
    }
}
