//! Wikipedia tool - search titles, then fetch intro extracts

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;

use super::{ToolAdapter, ToolError, http_client, truncate_chars};
use crate::config::WikipediaConfig;
use crate::error::Result;

const NO_RESULTS: &str = "No good Wikipedia Search Result was found";

/// Get factual information from Wikipedia
pub struct WikipediaTool {
    client: reqwest::Client,
    config: WikipediaConfig,
}

impl WikipediaTool {
    pub fn new(config: WikipediaConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_ms)?,
            config,
        })
    }

    fn api_url(&self) -> String {
        format!("https://{}.wikipedia.org/w/api.php", self.config.lang)
    }

    async fn query(&self, params: &[(&str, &str)]) -> std::result::Result<Value, ToolError> {
        let response = self
            .client
            .get(self.api_url())
            .query(&[("action", "query"), ("format", "json")])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Response(format!("Wikipedia returned HTTP {}", status)));
        }
        Ok(response.json().await?)
    }

    async fn lookup(&self, query: &str) -> std::result::Result<String, ToolError> {
        let limit = self.config.top_k_results.to_string();
        let search = self
            .query(&[("list", "search"), ("srsearch", query), ("srlimit", limit.as_str())])
            .await?;
        let titles = parse_search_titles(&search);
        debug!("Wikipedia: {} titles for {:?}", titles.len(), query);

        let mut pages = Vec::new();
        for title in titles.iter().take(self.config.top_k_results) {
            let body = self
                .query(&[
                    ("prop", "extracts"),
                    ("exintro", "1"),
                    ("explaintext", "1"),
                    ("redirects", "1"),
                    ("titles", title.as_str()),
                ])
                .await?;
            if let Some(summary) = parse_extract(&body) {
                pages.push(format!("Page: {}\nSummary: {}", title, summary));
            }
        }

        if pages.is_empty() {
            return Ok(NO_RESULTS.to_string());
        }
        Ok(truncate_chars(&pages.join("\n\n"), self.config.max_chars))
    }
}

#[async_trait]
impl ToolAdapter for WikipediaTool {
    fn name(&self) -> &str {
        "Wikipedia"
    }

    fn description(&self) -> &str {
        "Get factual information"
    }

    async fn invoke(&self, input: &str) -> std::result::Result<String, ToolError> {
        let query = input.trim().trim_matches('"');
        if query.is_empty() {
            return Err(ToolError::InvalidInput("empty lookup query".to_string()));
        }

        match self.lookup(query).await {
            Ok(output) => Ok(output),
            Err(e) => {
                warn!("Wikipedia lookup failed for {:?}: {}", query, e);
                Ok(format!("Wikipedia lookup failed: {}", e))
            }
        }
    }
}

/// Titles from a `list=search` response, in rank order
fn parse_search_titles(body: &Value) -> Vec<String> {
    body["query"]["search"]
        .as_array()
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| hit["title"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// First non-empty plain-text extract from a `prop=extracts` response
fn parse_extract(body: &Value) -> Option<String> {
    body["query"]["pages"]
        .as_object()?
        .values()
        .filter_map(|page| page["extract"].as_str())
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_search_titles() {
        let body = json!({
            "batchcomplete": "",
            "query": {
                "searchinfo": {"totalhits": 2},
                "search": [
                    {"ns": 0, "title": "Seneca the Younger", "pageid": 1},
                    {"ns": 0, "title": "Stoicism", "pageid": 2}
                ]
            }
        });
        assert_eq!(parse_search_titles(&body), vec!["Seneca the Younger", "Stoicism"]);
    }

    #[test]
    fn test_parse_search_titles_no_hits() {
        assert!(parse_search_titles(&json!({"query": {"search": []}})).is_empty());
        assert!(parse_search_titles(&json!({"error": {"code": "x"}})).is_empty());
    }

    #[test]
    fn test_parse_extract() {
        let body = json!({
            "query": {
                "pages": {
                    "5432": {"pageid": 5432, "title": "Stoicism", "extract": "  Stoicism is a school of philosophy.  "}
                }
            }
        });
        assert_eq!(parse_extract(&body).as_deref(), Some("Stoicism is a school of philosophy."));
    }

    #[test]
    fn test_parse_extract_missing_page() {
        let body = json!({"query": {"pages": {"-1": {"title": "Nope", "missing": ""}}}});
        assert_eq!(parse_extract(&body), None);
    }

    #[test]
    fn test_api_url_uses_language() {
        let config = WikipediaConfig {
            lang: "de".to_string(),
            ..Default::default()
        };
        let tool = WikipediaTool::new(config).unwrap();
        assert_eq!(tool.api_url(), "https://de.wikipedia.org/w/api.php");
    }

    #[tokio::test]
    async fn test_empty_query_is_invalid_input() {
        let tool = WikipediaTool::new(WikipediaConfig::default()).unwrap();
        let result = tool.invoke("").await;
        assert!(matches!(result, Err(ToolError::InvalidInput(_))));
    }
}
