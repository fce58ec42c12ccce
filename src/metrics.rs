//! Pooled answer metrics
//!
//! Produced answers from every question are compared in bulk against the
//! whole gold answer list. Counting runs over the produced list, so a
//! duplicated correct answer counts twice. Empty denominators are errors.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsError {
    #[error("cannot compute recall: the expected answer set is empty")]
    EmptyExpected,

    #[error("cannot compute precision: no answers were produced")]
    EmptyProduced,

    #[error("cannot compute F-measure: precision and recall are both zero")]
    ZeroPrecisionAndRecall,
}

/// Recall, precision and F-measure of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub recall: f64,
    pub precision: f64,
    pub f_measure: f64,
}

impl Metrics {
    /// Compute all three metrics for a run
    pub fn compute(produced: &[String], expected: &[String]) -> Result<Self, MetricsError> {
        let recall = recall(produced, expected)?;
        let precision = precision(produced, expected)?;
        let f_measure = f_measure(recall, precision)?;

        Ok(Self {
            recall,
            precision,
            f_measure,
        })
    }
}

/// Produced answers that appear in the expected set
fn correct_count(produced: &[String], expected: &[String]) -> usize {
    let gold: HashSet<&str> = expected.iter().map(String::as_str).collect();
    produced
        .iter()
        .filter(|answer| gold.contains(answer.as_str()))
        .count()
}

/// Correct produced answers over the size of the expected set
pub fn recall(produced: &[String], expected: &[String]) -> Result<f64, MetricsError> {
    if expected.is_empty() {
        return Err(MetricsError::EmptyExpected);
    }
    Ok(correct_count(produced, expected) as f64 / expected.len() as f64)
}

/// Correct produced answers over the number of produced answers
pub fn precision(produced: &[String], expected: &[String]) -> Result<f64, MetricsError> {
    if produced.is_empty() {
        return Err(MetricsError::EmptyProduced);
    }
    Ok(correct_count(produced, expected) as f64 / produced.len() as f64)
}

/// Harmonic mean of precision and recall
pub fn f_measure(recall: f64, precision: f64) -> Result<f64, MetricsError> {
    let sum = precision + recall;
    if sum == 0.0 {
        return Err(MetricsError::ZeroPrecisionAndRecall);
    }
    Ok(2.0 * precision * recall / sum)
}
