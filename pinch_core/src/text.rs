//! Append-only buffer of everything typed this session.

use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypedText {
    text: String,
}

impl TypedText {
    pub fn new() -> Self { TypedText::default() }

    pub fn push(&mut self, c: char) { self.text.push(c); }

    pub fn as_str(&self) -> &str { &self.text }

    /// Number of characters (not bytes).
    pub fn char_count(&self) -> usize { self.text.chars().count() }

    pub fn is_empty(&self) -> bool { self.text.is_empty() }
}

impl fmt::Display for TypedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_in_order() {
        let mut t = TypedText::new();
        for c in "HI THERE".chars() { t.push(c); }
        assert_eq!(t.as_str(), "HI THERE");
        assert_eq!(t.char_count(), 8);
        assert_eq!(t.to_string(), "HI THERE");
    }
}
