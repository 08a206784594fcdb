//! Selection gating

/// A single English word worth a dictionary lookup: ASCII letters only,
/// at least two of them.
pub fn is_english_word(text: &str) -> bool {
    text.len() > 1 && text.chars().all(|c| c.is_ascii_alphabetic())
}

/// A longer English passage: some ASCII letter, not a bare word, and more
/// than three characters.
pub fn is_english_text(text: &str) -> bool {
    let has_letter = text.chars().any(|c| c.is_ascii_alphabetic());
    let bare_word = !text.is_empty() && text.chars().all(|c| c.is_ascii_alphabetic());
    has_letter && !bare_word && text.chars().count() > 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_word() {
        assert!(is_english_word("study"));
        assert!(is_english_word("OK"));
        assert!(!is_english_word("a"));
        assert!(!is_english_word("don't"));
        assert!(!is_english_word("café"));
        assert!(!is_english_word("two words"));
        assert!(!is_english_word(""));
    }

    #[test]
    fn test_english_text() {
        assert!(is_english_text("two words"));
        assert!(is_english_text("it's"));
        assert!(!is_english_text("word"));
        assert!(!is_english_text("a b"));
        assert!(!is_english_text("1234 5678"));
        assert!(!is_english_text(""));
    }
}
