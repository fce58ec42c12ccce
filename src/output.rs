use crate::models::EvaluationReport;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

const OPENING_BANNER: &str = "(---- Natural-language question answering evaluation ----)";
const CLOSING_BANNER: &str = "(---------------------------------------------------------)";

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Print the report in the specified format
pub fn print_results(report: &EvaluationReport, format: OutputFormat) {
    match format {
        OutputFormat::Plain => print!("{}", render_plain(report)),
        OutputFormat::Json => print_json(report),
    }
}

/// Metrics block framed by banner lines
fn render_plain(report: &EvaluationReport) -> String {
    let metrics = &report.metrics;
    // Debug formatting keeps the decimal point on whole numbers ("1.0")
    let lines = [
        OPENING_BANNER.to_string(),
        format!("      Recall: {:?}", metrics.recall),
        format!("      Precision: {:?}", metrics.precision),
        format!("      F-measure: {:?}", metrics.f_measure),
        CLOSING_BANNER.to_string(),
    ];
    lines.join("\n") + "\n"
}

/// Print the report in JSON format
fn print_json(report: &EvaluationReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing report to JSON: {}", e),
    }
}
