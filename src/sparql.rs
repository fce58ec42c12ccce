use crate::config::Config;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::time::sleep;

const QUERY_PREFIX: &str = concat!(
    "PREFIX dbo: <http://dbpedia.org/ontology/> ",
    "PREFIX res: <http://dbpedia.org/resource/> ",
    "SELECT DISTINCT ?uri WHERE { res:",
);

/// Build the lookup query for `entity` through `relation`
pub fn build_query(relation: &str, entity: &str) -> String {
    format!("{QUERY_PREFIX}{entity} {relation} ?uri . }}")
}

/// SPARQL JSON results document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparqlResponse {
    #[serde(default)]
    pub head: SparqlHead,
    pub results: SparqlResults,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparqlHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<HashMap<String, BindingValue>>,
}

/// One bound RDF term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingValue {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl SparqlResponse {
    /// Values bound to `?uri`, in result order
    pub fn uris(&self) -> Vec<String> {
        self.results
            .bindings
            .iter()
            .filter_map(|binding| binding.get("uri"))
            .map(|term| term.value.clone())
            .collect()
    }
}

/// A knowledge graph that can answer relation lookups
pub trait KnowledgeBase {
    /// Resources linked to `entity` through `relation`
    async fn select_uris(&mut self, relation: &str, entity: &str) -> Result<SparqlResponse>;
}

/// HTTP client for a SPARQL endpoint
pub struct SparqlClient {
    http: reqwest::Client,
    endpoint: String,
    rate_limit_rps: f64,
    last_request: Option<Instant>,
}

impl SparqlClient {
    /// Create a client for the endpoint named in the configuration
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            rate_limit_rps: config.rate_limit_rps,
            last_request: None,
        })
    }

    /// Enforce rate limiting for endpoint requests
    async fn enforce_rate_limit(last_request: &mut Option<Instant>, rate_limit_rps: f64) {
        if rate_limit_rps.is_nan() || rate_limit_rps <= 0.0 {
            return;
        }

        let Ok(min_interval) = Duration::try_from_secs_f64(1.0 / rate_limit_rps) else {
            return;
        };

        if let Some(last_time) = *last_request {
            let elapsed = last_time.elapsed();
            if elapsed < min_interval {
                sleep(min_interval - elapsed).await;
            }
        }

        *last_request = Some(Instant::now());
    }

    /// Send a query and decode the JSON results
    pub async fn execute(&mut self, query: &str) -> Result<SparqlResponse> {
        Self::enforce_rate_limit(&mut self.last_request, self.rate_limit_rps).await;

        tracing::debug!(endpoint = %self.endpoint, query, "sending SPARQL query");

        self.http
            .get(&self.endpoint)
            .query(&[("query", query), ("format", "json")])
            .header(reqwest::header::ACCEPT, "application/sparql-results+json")
            .send()
            .await
            .with_context(|| format!("Failed to reach SPARQL endpoint: {}", self.endpoint))?
            .error_for_status()
            .context("SPARQL endpoint returned an error status")?
            .json::<SparqlResponse>()
            .await
            .context("Failed to decode SPARQL JSON results")
    }
}

impl KnowledgeBase for SparqlClient {
    async fn select_uris(&mut self, relation: &str, entity: &str) -> Result<SparqlResponse> {
        let query = build_query(relation, entity);
        self.execute(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const BODY: &str = r#"{
  "head": { "link": [], "vars": ["uri"] },
  "results": { "distinct": false, "ordered": true, "bindings": [
    { "uri": { "type": "uri", "value": "http://dbpedia.org/resource/Emmanuel_Macron" } },
    { "uri": { "type": "uri", "value": "http://dbpedia.org/resource/François_Hollande" } }
  ] }
}"#;

    fn config_for(endpoint: String) -> Config {
        Config {
            endpoint,
            ..Config::default()
        }
    }

    #[test]
    fn test_build_query() {
        assert_eq!(
            build_query("dbo:president", "France"),
            concat!(
                "PREFIX dbo: <http://dbpedia.org/ontology/> ",
                "PREFIX res: <http://dbpedia.org/resource/> ",
                "SELECT DISTINCT ?uri WHERE { res:France dbo:president ?uri . }",
            )
        );
    }

    #[test]
    fn test_uris_skips_bindings_without_uri() {
        let response: SparqlResponse = serde_json::from_str(
            r#"{"results": {"bindings": [
                {"uri": {"type": "uri", "value": "http://dbpedia.org/resource/Ulm"}},
                {"label": {"type": "literal", "value": "Ulm"}}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(response.uris(), vec!["http://dbpedia.org/resource/Ulm".to_string()]);
        assert!(response.head.vars.is_empty());
    }

    #[test]
    fn test_uris_empty() {
        let response: SparqlResponse =
            serde_json::from_str(r#"{"head": {"vars": ["uri"]}, "results": {"bindings": []}}"#)
                .unwrap();
        assert!(response.uris().is_empty());
    }

    #[tokio::test]
    async fn test_select_uris() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sparql")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("format".into(), "json".into()),
                Matcher::UrlEncoded("query".into(), build_query("dbo:president", "France")),
            ]))
            .match_header("accept", "application/sparql-results+json")
            .with_status(200)
            .with_header("content-type", "application/sparql-results+json")
            .with_body(BODY)
            .create_async()
            .await;

        let mut client =
            SparqlClient::new(&config_for(format!("{}/sparql", server.url()))).unwrap();
        let response = client.select_uris("dbo:president", "France").await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.head.vars, vec!["uri".to_string()]);
        assert_eq!(
            response.uris(),
            vec![
                "http://dbpedia.org/resource/Emmanuel_Macron".to_string(),
                "http://dbpedia.org/resource/François_Hollande".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_error_status_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sparql")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let mut client =
            SparqlClient::new(&config_for(format!("{}/sparql", server.url()))).unwrap();
        let result = client.select_uris("dbo:president", "France").await;

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("error status"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sparql")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let mut client =
            SparqlClient::new(&config_for(format!("{}/sparql", server.url()))).unwrap();
        let result = client.select_uris("dbo:president", "France").await;

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to decode SPARQL JSON results"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_fatal() {
        let mut client =
            SparqlClient::new(&config_for("http://127.0.0.1:1/sparql".to_string())).unwrap();
        let result = client.select_uris("dbo:president", "France").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_enforce_rate_limit_disabled() {
        let mut last_request = None;
        let start = Instant::now();

        SparqlClient::enforce_rate_limit(&mut last_request, 0.0).await;
        SparqlClient::enforce_rate_limit(&mut last_request, 0.0).await;

        assert!(start.elapsed() < Duration::from_millis(50));
        assert!(last_request.is_none());
    }

    #[tokio::test]
    async fn test_enforce_rate_limit_first_request() {
        let mut last_request = None;
        let start = Instant::now();

        SparqlClient::enforce_rate_limit(&mut last_request, 10.0).await;

        assert!(start.elapsed() < Duration::from_millis(50));
        assert!(last_request.is_some());
    }

    #[tokio::test]
    async fn test_enforce_rate_limit_with_sleep() {
        let mut last_request = Some(Instant::now());
        let start = Instant::now();

        SparqlClient::enforce_rate_limit(&mut last_request, 10.0).await;

        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_enforce_rate_limit_ignores_nan() {
        let mut last_request = Some(Instant::now());
        let start = Instant::now();

        SparqlClient::enforce_rate_limit(&mut last_request, f64::NAN).await;

        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_enforce_rate_limit_ignores_unrepresentable_interval() {
        let mut last_request = Some(Instant::now());
        let start = Instant::now();

        SparqlClient::enforce_rate_limit(&mut last_request, 1e-310).await;

        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_new_rejects_invalid_rate_limit() {
        for rate_limit_rps in [f64::NAN, 1e-310, -2.0] {
            let config = Config {
                rate_limit_rps,
                ..Config::default()
            };
            assert!(SparqlClient::new(&config).is_err());
        }
    }
}
