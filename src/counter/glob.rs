//! Shell-style glob patterns over element ids
//!
//! Inclusion, substitution and attribute rules are keyed by globs that are
//! matched case-sensitively against the whole element id. Patterns are
//! translated once into anchored regexes.
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Clone)]
pub struct Glob {
    pattern: String,
    // None when the pattern has an invalid class (e.g. `[z-a]`), which then
    // only matches itself literally
    regex: Option<Regex>,
}

impl Glob {
    pub fn new(pattern: &str) -> Self {
        let regex = Regex::new(&translate(pattern)).ok();
        Glob {
            pattern: pattern.to_string(),
            regex,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, id: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(id),
            None => id == self.pattern,
        }
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for Glob {}

impl fmt::Debug for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Glob({:?})", self.pattern)
    }
}

impl Serialize for Glob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pattern)
    }
}

/// Translate a glob into an anchored regex source.
///
/// `*` matches any run, `?` any single char, `[...]` a class (`[!...]`
/// negated). An unclosed `[` is a literal.
fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("^");
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i + 1..end]));
                    i = end;
                }
                None => out.push_str("\\["),
            },
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }
    out.push('$');
    out
}

/// Index of the `]` closing the class opened at `start`.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    // A leading ']' is part of the class
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while j < chars.len() {
        if chars[j] == ']' {
            return Some(j);
        }
        j += 1;
    }
    None
}

fn translate_class(body: &[char]) -> String {
    let mut out = String::from("[");
    let mut rest = body;
    if let Some(('!', tail)) = rest.split_first() {
        out.push('^');
        rest = tail;
    }
    let mut previous = None;
    for &c in rest {
        match c {
            '-' if previous == Some('-') => out.push_str("\\-"),
            '-' => out.push('-'),
            '\\' | '[' | ']' | '^' | '&' | '~' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
        previous = Some(c);
    }
    out.push(']');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_full_match() {
        let g = Glob::new("e");
        assert!(g.matches("e"));
        assert!(!g.matches("e-one"));
        assert!(!g.matches("E"));
    }

    #[test]
    fn test_star_and_question() {
        assert!(Glob::new("e-*").matches("e-one"));
        assert!(Glob::new("e-*").matches("e-"));
        assert!(Glob::new("t?xt").matches("text"));
        assert!(!Glob::new("t?xt").matches("teext"));
    }

    #[test]
    fn test_classes() {
        assert!(Glob::new("unit[0-9]").matches("unit7"));
        assert!(!Glob::new("unit[!0-9]").matches("unit7"));
        assert!(Glob::new("unit[!0-9]").matches("unitx"));
        assert!(Glob::new("a[]]").matches("a]"));
    }

    #[test]
    fn test_regex_metachars_are_literal() {
        assert!(Glob::new("a.b(c)").matches("a.b(c)"));
        assert!(!Glob::new("a.b").matches("axb"));
        assert!(Glob::new("a[").matches("a["));
    }

    #[test]
    fn test_invalid_range_matches_literally() {
        assert!(Glob::new("[z-a]").matches("[z-a]"));
        assert!(!Glob::new("[z-a]").matches("b"));
    }
}
