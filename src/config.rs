use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for an evaluation run
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Path to the question/answer corpus (XML)
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,
    /// Path to the relation list, one relation per line
    #[serde(default = "default_relations_path")]
    pub relations_path: PathBuf,
    /// Language tag used to select question strings
    #[serde(default = "default_language")]
    pub language: String,
    /// SPARQL endpoint of the knowledge graph
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Rate limit for SPARQL requests per second (0 disables it)
    #[serde(default)]
    pub rate_limit_rps: f64,
    /// Optional request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Only keep gold answers of questions asked in `language`
    #[serde(default)]
    pub answers_follow_language: bool,
    /// Optional local path to store the report as JSON
    #[serde(default)]
    pub storage_path: Option<String>,
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("./questions.xml")
}

fn default_relations_path() -> PathBuf {
    PathBuf::from("relations.txt")
}

fn default_language() -> String {
    "en".to_string()
}

fn default_endpoint() -> String {
    "http://dbpedia.org/sparql".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            relations_path: default_relations_path(),
            language: default_language(),
            endpoint: default_endpoint(),
            rate_limit_rps: 0.0,
            timeout_secs: None,
            answers_follow_language: false,
            storage_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Reject values that cannot drive a run
    pub fn validate(&self) -> Result<()> {
        let rps = self.rate_limit_rps;
        if !rps.is_finite() || rps < 0.0 {
            bail!("rate_limit_rps must be a finite, non-negative number, got {rps}");
        }
        if rps > 0.0 && Duration::try_from_secs_f64(1.0 / rps).is_err() {
            bail!("rate_limit_rps is too small to schedule requests, got {rps}");
        }
        Ok(())
    }

    /// Load from `path` when given, otherwise fall back to the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
