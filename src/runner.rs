use crate::classifier::classify;
use crate::config::Config;
use crate::corpus::Corpus;
use crate::metrics::Metrics;
use crate::models::{EvaluationReport, QuestionOutcome};
use crate::ner::{EntityRecognizer, RuleBasedNer, extract_entity};
use crate::relation::RelationCatalog;
use crate::sparql::{KnowledgeBase, SparqlClient};
use crate::tokenizer::words;
use anyhow::{Context, Result, bail};
use std::path::Path;

/// Main runner that orchestrates the evaluation process
pub struct Runner<K, R> {
    config: Config,
    knowledge_base: K,
    recognizer: R,
}

impl Runner<SparqlClient, RuleBasedNer> {
    /// Create a runner that queries the configured SPARQL endpoint
    pub fn from_config(config: Config) -> Result<Self> {
        let knowledge_base = SparqlClient::new(&config)?;
        Ok(Self::new(config, knowledge_base, RuleBasedNer::new()))
    }
}

impl<K: KnowledgeBase, R: EntityRecognizer> Runner<K, R> {
    /// Create a new runner with the given configuration and collaborators
    pub fn new(config: Config, knowledge_base: K, recognizer: R) -> Self {
        Self {
            config,
            knowledge_base,
            recognizer,
        }
    }

    /// Load the corpus and relation list, then evaluate every question
    pub async fn run(&mut self) -> Result<EvaluationReport> {
        let corpus = Corpus::from_file(
            &self.config.corpus_path,
            &self.config.language,
            self.config.answers_follow_language,
        )?;
        let relations = RelationCatalog::from_file(&self.config.relations_path)?;

        tracing::info!(
            questions = corpus.questions.len(),
            expected_answers = corpus.expected_answers.len(),
            relations = relations.len(),
            language = %self.config.language,
            "loaded corpus"
        );

        let report = self.evaluate(&corpus, &relations).await?;
        self.store_results_if_configured(&report)?;

        Ok(report)
    }

    /// Answer every corpus question and score the pooled answers
    pub async fn evaluate(
        &mut self,
        corpus: &Corpus,
        relations: &RelationCatalog,
    ) -> Result<EvaluationReport> {
        let outcomes = self.process_all_questions(&corpus.questions, relations).await?;
        let produced = EvaluationReport::produced_answers(&outcomes);

        tracing::info!(
            produced = produced.len(),
            expected = corpus.expected_answers.len(),
            "calculating metrics"
        );

        let metrics = Metrics::compute(&produced, &corpus.expected_answers)
            .context("Failed to compute evaluation metrics")?;

        Ok(EvaluationReport {
            metrics,
            expected_total: corpus.expected_answers.len(),
            produced_total: produced.len(),
            questions: outcomes,
        })
    }

    /// Process all questions in order
    async fn process_all_questions(
        &mut self,
        questions: &[String],
        relations: &RelationCatalog,
    ) -> Result<Vec<QuestionOutcome>> {
        let mut outcomes = Vec::with_capacity(questions.len());
        let total = questions.len();

        for (index, question) in questions.iter().enumerate() {
            tracing::debug!("Processing question {}/{}: {}", index + 1, total, question);

            let outcome = self
                .process_question(question, relations)
                .await
                .with_context(|| format!("Failed to answer question: {}", question))?;

            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Classify, extract, match and query a single question
    async fn process_question(
        &mut self,
        question: &str,
        relations: &RelationCatalog,
    ) -> Result<QuestionOutcome> {
        let tokens = words(question);
        let category = tokens.first().map(|token| classify(token));

        let mut outcome = QuestionOutcome {
            question: question.to_string(),
            category,
            entity: None,
            relation: None,
            answers: Vec::new(),
        };

        let Some(entity) = extract_entity(&self.recognizer, question) else {
            tracing::warn!(question, "no named entity found, skipping query");
            return Ok(outcome);
        };

        if relations.is_empty() {
            bail!("No relation matched: the relation list is empty");
        }
        let relation = relations
            .best_match(&tokens)
            .with_context(|| format!("No relation matched {} question tokens", tokens.len()))?
            .line
            .clone();

        tracing::debug!(%entity, %relation, category = ?category, "querying knowledge graph");

        let response = self
            .knowledge_base
            .select_uris(&relation, &entity)
            .await
            .context("Failed to query knowledge graph")?;

        outcome.answers = response.uris();
        outcome.entity = Some(entity);
        outcome.relation = Some(relation);

        tracing::debug!(answers = outcome.answers.len(), "question answered");

        Ok(outcome)
    }

    /// Store the report if a storage path is configured
    fn store_results_if_configured(&self, report: &EvaluationReport) -> Result<()> {
        if let Some(storage_path) = &self.config.storage_path {
            tracing::info!("Storing report to {}", storage_path);
            self.store_results(report, storage_path)?;
        }
        Ok(())
    }

    /// Store the report to a JSON file
    fn store_results(&self, report: &EvaluationReport, path: &str) -> Result<()> {
        let json_content = self.serialize_results(report)?;
        self.ensure_directory_exists(path)?;
        self.write_results_file(path, &json_content)?;
        tracing::info!("Report stored to: {}", path);

        Ok(())
    }

    /// Serialize the report to JSON
    fn serialize_results(&self, report: &EvaluationReport) -> Result<String> {
        serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
    }

    /// Ensure the directory for the report file exists
    fn ensure_directory_exists(&self, path: &str) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }

    /// Write the report to file
    fn write_results_file(&self, path: &str, content: &str) -> Result<()> {
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write report to: {}", path))
    }
}
