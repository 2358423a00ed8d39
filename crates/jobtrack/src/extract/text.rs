//! Text views and small string helpers shared by the extractors.

use crate::email::RawMessage;

/// The parts of a message the extractors read.
#[derive(Debug, Clone, Copy)]
pub struct MessageText<'a> {
    pub subject: &'a str,
    pub snippet: &'a str,
    pub body: &'a str,
    pub sender: &'a str,
}

impl<'a> MessageText<'a> {
    pub fn new(message: &'a RawMessage) -> Self {
        Self {
            subject: message.subject(),
            snippet: &message.snippet,
            body: &message.body,
            sender: message.sender(),
        }
    }

    pub fn subject_snippet(&self) -> String {
        format!("{} {}", self.subject, self.snippet)
    }

    pub fn subject_body(&self) -> String {
        format!("{}\n{}", self.subject, self.body)
    }

    pub fn all(&self) -> String {
        format!("{}\n{}\n{}", self.subject, self.snippet, self.body)
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases
/// the rest: `ge aerospace` → `Ge Aerospace`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// True when `needle` occurs in `haystack` with no alphanumeric character
/// directly on either side. Both are expected lower-case.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Length check in characters, not bytes.
pub fn char_len_within(s: &str, min: usize, max: usize) -> bool {
    let len = s.chars().count();
    len >= min && len <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ge aerospace"), "Ge Aerospace");
        assert_eq!(title_case("SOFTWARE engineer"), "Software Engineer");
        assert_eq!(title_case("o'neil-labs"), "O'Neil-Labs");
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("apply on linkedin today", "linkedin"));
        assert!(contains_word("(lever)", "lever"));
        assert!(!contains_word("leverage your skills", "lever"));
        assert!(!contains_word("anything", ""));
    }

    #[test]
    fn test_char_len_within_counts_chars() {
        assert!(char_len_within("Zürich", 3, 6));
        assert!(!char_len_within("ab", 3, 6));
    }
}
