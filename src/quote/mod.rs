pub mod groq;
pub mod mock;

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

/// Characters stripped from model output wherever they appear.
const QUOTE_CHARS: &[char] = &['"', '\'', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}'];

/// A cleaned, immutable quote: trimmed, quote characters removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote(String);

impl Quote {
    /// Clean raw model output. Returns `None` if nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned = clean_quote(raw);
        if cleaned.is_empty() {
            None
        } else {
            Some(Self(cleaned))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Quote {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trim whitespace and drop every quote character.
pub fn clean_quote(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !QUOTE_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Where quotes come from. An LLM in production, a fixed string in tests.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn next_quote(&self) -> Result<Quote>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_trims_whitespace() {
        assert_eq!(clean_quote("  Keep going.\n"), "Keep going.");
    }

    #[test]
    fn clean_strips_surrounding_quotes() {
        assert_eq!(clean_quote("\"Dream big.\""), "Dream big.");
        assert_eq!(clean_quote("'Dream big.'"), "Dream big.");
        assert_eq!(clean_quote("\u{201C}Dream big.\u{201D}"), "Dream big.");
        assert_eq!(clean_quote("\u{2018}Dream big.\u{2019}"), "Dream big.");
    }

    #[test]
    fn clean_strips_inner_quote_chars() {
        assert_eq!(clean_quote("Don't stop"), "Dont stop");
        assert_eq!(clean_quote("Don\u{2019}t stop"), "Dont stop");
    }

    #[test]
    fn clean_handles_whitespace_inside_quotes() {
        assert_eq!(clean_quote("\" Rise again \""), "Rise again");
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(Quote::parse("").is_none());
        assert!(Quote::parse("  \"\"  ").is_none());
    }

    #[test]
    fn parse_keeps_text() {
        let quote = Quote::parse("Stay focused and never give up").unwrap();
        assert_eq!(quote.as_str(), "Stay focused and never give up");
        assert_eq!(quote.word_count(), 6);
        assert_eq!(quote.to_string(), "Stay focused and never give up");
    }
}
