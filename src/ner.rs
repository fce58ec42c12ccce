//! Named entity recognition for questions
//!
//! The recognizer is a seam: [`RuleBasedNer`] is the shipped strategy, built
//! from capitalization rules and a year pattern. The extractor on top of it
//! keeps one span per question and shapes it into a knowledge-graph resource
//! name.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::tokenizer::{Token, tokenize};

/// Kind of span found by a recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityLabel {
    /// Proper name (person, place, organization, work)
    Name,
    /// Calendar year
    Date,
}

/// An entity span in the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

/// Finds entity spans in a piece of text
pub trait EntityRecognizer {
    /// Spans in text order
    fn recognize(&self, text: &str) -> Vec<EntitySpan>;
}

// ============================================================================
// Rule-based recognizer
// ============================================================================

/// Capitalization-driven recognizer
pub struct RuleBasedNer {
    /// Capitalized words that do not start a name at sentence start
    sentence_openers: HashSet<&'static str>,
    /// Lowercase words allowed between two capitalized words of a name
    connectors: HashSet<&'static str>,
    year: Regex,
}

impl RuleBasedNer {
    pub fn new() -> Self {
        Self {
            sentence_openers: [
                "Who", "Whom", "Whose", "What", "Which", "Where", "When", "Why", "How", "Is",
                "Are", "Was", "Were", "Do", "Does", "Did", "Can", "Has", "Have", "Had", "Give",
                "List", "Show", "Name", "Tell", "In", "On", "At", "To", "From", "For", "By",
                "Of", "A", "An",
            ]
            .into_iter()
            .collect(),
            connectors: ["of", "the", "de", "du", "des", "la", "le", "and", "von", "van", "der"]
                .into_iter()
                .collect(),
            year: Regex::new(r"^\d{4}$").unwrap_or_else(|e| panic!("invalid year pattern: {e}")),
        }
    }

    fn is_capitalized(token: &Token<'_>) -> bool {
        token.text.chars().next().is_some_and(char::is_uppercase)
    }

    fn starts_name(&self, tokens: &[Token<'_>], index: usize) -> bool {
        let token = &tokens[index];
        Self::is_capitalized(token) && !(index == 0 && self.sentence_openers.contains(token.text))
    }

    /// Index one past the last token of the name starting at `start`
    fn extend_name(&self, tokens: &[Token<'_>], start: usize) -> usize {
        let mut end = start + 1;
        while end < tokens.len() {
            if Self::is_capitalized(&tokens[end]) {
                end += 1;
                continue;
            }

            let mut next = end;
            while next < tokens.len() && self.connectors.contains(tokens[next].text) {
                next += 1;
            }
            if next > end && next < tokens.len() && Self::is_capitalized(&tokens[next]) {
                end = next + 1;
            } else {
                break;
            }
        }
        end
    }
}

impl Default for RuleBasedNer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRecognizer for RuleBasedNer {
    fn recognize(&self, text: &str) -> Vec<EntitySpan> {
        let tokens = tokenize(text);
        let mut spans = Vec::new();
        let mut index = 0;

        while index < tokens.len() {
            if self.starts_name(&tokens, index) {
                let end = self.extend_name(&tokens, index);
                // A lowercase article directly before the name belongs to it
                let first = if index > 0 && tokens[index - 1].text == "the" {
                    index - 1
                } else {
                    index
                };
                let start_byte = tokens[first].start;
                let end_byte = tokens[end - 1].end;
                spans.push(EntitySpan {
                    text: text[start_byte..end_byte].to_string(),
                    label: EntityLabel::Name,
                    start: start_byte,
                    end: end_byte,
                });
                index = end;
                continue;
            }

            let token = &tokens[index];
            if self.year.is_match(token.text) {
                spans.push(EntitySpan {
                    text: token.text.to_string(),
                    label: EntityLabel::Date,
                    start: token.start,
                    end: token.end,
                });
            }
            index += 1;
        }

        spans
    }
}

// ============================================================================
// Entity extraction
// ============================================================================

/// Extract the entity of a question as a resource name
///
/// When the recognizer reports several spans the last one wins. Returns
/// `None` when nothing was recognized.
pub fn extract_entity<R: EntityRecognizer + ?Sized>(
    recognizer: &R,
    question: &str,
) -> Option<String> {
    recognizer
        .recognize(question)
        .pop()
        .map(|span| to_resource_name(&span.text))
}

/// Shape entity text into a resource name: drop every `"the "`, then join
/// words with underscores
pub fn to_resource_name(entity: &str) -> String {
    entity.replace("the ", "").replace(' ', "_")
}
