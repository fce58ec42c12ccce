use crate::classifier::InterrogativeCategory;
use crate::metrics::Metrics;
use serde::{Deserialize, Serialize};

/// What the pipeline did with a single question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    /// Original question text
    pub question: String,
    /// Category of the first token, absent for an empty question
    pub category: Option<InterrogativeCategory>,
    /// Resource name of the recognized entity
    pub entity: Option<String>,
    /// Relation line used in the query
    pub relation: Option<String>,
    /// Answer URIs returned by the knowledge graph
    pub answers: Vec<String>,
}

/// Final report of an evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Pooled metrics over all questions
    pub metrics: Metrics,
    /// Number of gold answers the metrics were computed against
    pub expected_total: usize,
    /// Number of answers produced across all questions
    pub produced_total: usize,
    /// Per-question outcomes in corpus order
    pub questions: Vec<QuestionOutcome>,
}

impl EvaluationReport {
    /// All produced answers, concatenated in question order
    pub fn produced_answers(questions: &[QuestionOutcome]) -> Vec<String> {
        questions
            .iter()
            .flat_map(|outcome| outcome.answers.iter().cloned())
            .collect()
    }
}
