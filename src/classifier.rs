use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Expected answer category derived from the interrogative word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterrogativeCategory {
    Person,
    Geo,
    Time,
    Unknown,
}

impl InterrogativeCategory {
    /// Corpus tag for the category
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Person => "PERS",
            Self::Geo => "GEO",
            Self::Time => "TIM",
            Self::Unknown => "",
        }
    }
}

impl std::fmt::Display for InterrogativeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// Checked in order, first match wins.
static PATTERNS: LazyLock<[(Regex, InterrogativeCategory); 3]> = LazyLock::new(|| {
    [
        (pattern(r"^[Ww]ho"), InterrogativeCategory::Person),
        (pattern(r"^[Ww]here"), InterrogativeCategory::Geo),
        (pattern(r"^[Ww]hen"), InterrogativeCategory::Time),
    ]
});

fn pattern(source: &str) -> Regex {
    Regex::new(source).unwrap_or_else(|e| panic!("invalid interrogative pattern {source}: {e}"))
}

/// Classify a question by its first token
pub fn classify(token: &str) -> InterrogativeCategory {
    PATTERNS
        .iter()
        .find(|(regex, _)| regex.is_match(token))
        .map(|(_, category)| *category)
        .unwrap_or(InterrogativeCategory::Unknown)
}
