use regex::Regex;
use std::sync::LazyLock;

// A possessive clitic, a word (with inner hyphens), or a single non-space symbol.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'s\b|\w+(?:-\w+)*|[^\w\s]")
        .unwrap_or_else(|e| panic!("invalid token pattern: {e}"))
});

/// A token and its byte offsets in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Split text into word and punctuation tokens
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    TOKEN
        .find_iter(text)
        .map(|m| Token {
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// Token texts only
pub fn words(text: &str) -> Vec<&str> {
    tokenize(text).into_iter().map(|t| t.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_trailing_punctuation() {
        assert_eq!(
            words("Who is the president of France?"),
            vec!["Who", "is", "the", "president", "of", "France", "?"]
        );
    }

    #[test]
    fn test_splits_possessive() {
        assert_eq!(words("Who's Obama's wife?"), vec!["Who", "'s", "Obama", "'s", "wife", "?"]);
    }

    #[test]
    fn test_keeps_hyphenated_words() {
        assert_eq!(
            words("Is Baden-Württemberg a state?"),
            vec!["Is", "Baden-Württemberg", "a", "state", "?"]
        );
    }

    #[test]
    fn test_offsets() {
        let tokens = tokenize("Where is Ulm?");
        assert_eq!(tokens[2], Token { text: "Ulm", start: 9, end: 12 });
        assert_eq!(tokens[3].start, 12);
    }

    #[test]
    fn test_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
