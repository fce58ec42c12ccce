use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

// Everything from the first lowercase letter up to the last colon: the
// namespace prefix of a line such as `dbo:birthPlace`.
static PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-z].*:").unwrap_or_else(|e| panic!("invalid relation prefix pattern: {e}"))
});

/// A knowledge-graph predicate from the relation list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// The line as written in the relation file
    pub line: String,
    /// Form compared against question tokens
    pub label: String,
}

impl Relation {
    pub fn new(line: &str) -> Self {
        Self {
            line: line.to_string(),
            label: PREFIX.replace_all(line, "").into_owned(),
        }
    }
}

/// The candidate relations, in file order
#[derive(Debug, Clone, Default)]
pub struct RelationCatalog {
    relations: Vec<Relation>,
}

impl RelationCatalog {
    /// Load one relation per line
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read relation file: {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        Self {
            relations: content.lines().map(Relation::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// The relation whose label is closest to any of the tokens
    ///
    /// Distances are compared strictly, so the first relation reaching the
    /// minimum wins. Returns `None` when there are no tokens or no relations.
    pub fn best_match<S: AsRef<str>>(&self, tokens: &[S]) -> Option<&Relation> {
        let mut best: Option<(usize, &Relation)> = None;

        for relation in &self.relations {
            for token in tokens {
                let score = edit_distance(token.as_ref(), &relation.label);
                if best.is_none_or(|(min, _)| score < min) {
                    best = Some((score, relation));
                }
            }
        }

        best.map(|(_, relation)| relation)
    }
}

/// Levenshtein distance over characters
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for j in 1..=b.len() {
            let cost = if ca == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
