//! WebSearch tool - DuckDuckGo HTML results, no API key needed

use std::sync::LazyLock;

use async_trait::async_trait;
use log::{debug, warn};
use regex::Regex;

use super::{ToolAdapter, ToolError, http_client};
use crate::config::SearchConfig;
use crate::error::Result;

const NO_RESULTS: &str = "No good DuckDuckGo Search Result was found";

static CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class\s*=\s*"([^"]*)""#).expect("class attribute pattern"));

/// Search the web for research
pub struct WebSearchTool {
    client: reqwest::Client,
    config: SearchConfig,
}

impl WebSearchTool {
    pub fn new(config: SearchConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_ms)?,
            config,
        })
    }

    async fn search(&self, query: &str) -> std::result::Result<String, ToolError> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Response(format!("DuckDuckGo returned HTTP {}", status)));
        }

        let html = response.text().await?;
        let results = extract_results(&html, self.config.max_results);
        debug!("WebSearch: {} results for {:?}", results.len(), query);

        if results.is_empty() {
            return Ok(NO_RESULTS.to_string());
        }

        Ok(results
            .iter()
            .map(SearchResult::render)
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

#[async_trait]
impl ToolAdapter for WebSearchTool {
    fn name(&self) -> &str {
        "WebSearch"
    }

    fn description(&self) -> &str {
        "Search the web for research"
    }

    async fn invoke(&self, input: &str) -> std::result::Result<String, ToolError> {
        let query = input.trim().trim_matches('"');
        if query.is_empty() {
            return Err(ToolError::InvalidInput("empty search query".to_string()));
        }

        match self.search(query).await {
            Ok(output) => Ok(output),
            Err(e) => {
                warn!("WebSearch failed for {:?}: {}", query, e);
                Ok(format!("Web search failed: {}", e))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchResult {
    title: String,
    snippet: String,
    url: String,
}

impl SearchResult {
    fn render(&self) -> String {
        if self.url.is_empty() {
            format!("{}\n{}", self.title, self.snippet)
        } else {
            format!("{}\n{}\nURL: {}", self.title, self.snippet, self.url)
        }
    }
}

/// Pull title, snippet and URL out of each `result__body` block
fn extract_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    let starts: Vec<usize> = class_positions(html, "result__body").collect();

    starts
        .iter()
        .enumerate()
        .filter_map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(html.len());
            let chunk = &html[start..end];

            let title = element_text(chunk, "result__a")?;
            if title.is_empty() {
                return None;
            }
            Some(SearchResult {
                title,
                snippet: element_text(chunk, "result__snippet").unwrap_or_default(),
                url: element_text(chunk, "result__url").unwrap_or_default(),
            })
        })
        .take(max_results)
        .collect()
}

/// Offsets just past every `class="..."` attribute that lists `token`
fn class_positions<'a>(html: &'a str, token: &'a str) -> impl Iterator<Item = usize> + 'a {
    CLASS_ATTR
        .captures_iter(html)
        .filter(move |caps| caps[1].split_whitespace().any(|class| class == token))
        .filter_map(|caps| caps.get(0).map(|m| m.end()))
}

/// Text content of the first element whose class list contains `token`
fn element_text(chunk: &str, token: &str) -> Option<String> {
    let attr_end = class_positions(chunk, token).next()?;
    let after_attr = &chunk[attr_end..];
    let body_start = after_attr.find('>')? + 1;
    let body = &after_attr[body_start..];
    let end = body.find("</a>").or_else(|| body.find("</div>")).unwrap_or(body.len());
    let text = html_decode(&strip_tags(&body[..end]));
    Some(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn html_decode(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
