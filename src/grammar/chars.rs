//! Character classes used by `word` expressions

use std::fmt;
use std::ops::Add;

/// A set of characters, made of inclusive ranges plus loose extra chars
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharSet {
    ranges: Vec<(char, char)>,
    extra: String,
}

impl CharSet {
    /// ASCII letters
    pub fn alphas() -> Self {
        Self {
            ranges: vec![('A', 'Z'), ('a', 'z')],
            extra: String::new(),
        }
    }

    /// ASCII digits
    pub fn nums() -> Self {
        Self {
            ranges: vec![('0', '9')],
            extra: String::new(),
        }
    }

    /// ASCII letters and digits
    pub fn alphanums() -> Self {
        Self {
            ranges: vec![('A', 'Z'), ('a', 'z'), ('0', '9')],
            extra: String::new(),
        }
    }

    /// Exactly the characters of `chars`
    pub fn chars(chars: &str) -> Self {
        Self {
            ranges: Vec::new(),
            extra: String::new(),
        }
        .with(chars)
    }

    /// Add loose characters to the set
    pub fn with(mut self, chars: &str) -> Self {
        for ch in chars.chars() {
            if !self.contains(ch) {
                self.extra.push(ch);
            }
        }
        self
    }

    pub fn contains(&self, ch: char) -> bool {
        self.ranges.iter().any(|&(lo, hi)| lo <= ch && ch <= hi) || self.extra.contains(ch)
    }
}

impl Add<&str> for CharSet {
    type Output = CharSet;

    fn add(self, chars: &str) -> CharSet {
        self.with(chars)
    }
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (lo, hi) in &self.ranges {
            write!(f, "{}-{}", lo, hi)?;
        }
        write!(f, "{}", self.extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_sets() {
        assert!(CharSet::alphas().contains('q'));
        assert!(!CharSet::alphas().contains('7'));
        assert!(CharSet::nums().contains('7'));
        assert!(CharSet::alphanums().contains('Z'));
        assert!(!CharSet::alphanums().contains('_'));
    }

    #[test]
    fn test_extension() {
        let ident_body = CharSet::alphanums() + "_";
        assert!(ident_body.contains('_'));
        assert_eq!(ident_body.to_string(), "A-Za-z0-9_");

        let number = CharSet::nums() + ".";
        assert!(number.contains('.'));
        assert_eq!(number.to_string(), "0-9.");
    }

    #[test]
    fn test_no_duplicate_extras() {
        let set = CharSet::chars("aab").with("b1");
        assert_eq!(set.to_string(), "ab1");
    }
}
