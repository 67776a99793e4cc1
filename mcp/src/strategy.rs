//! The strategy-fallback engine behind [`GatewayClient::gather_information`].
//!
//! Strategies run in the fixed order of [`Strategy::ORDER`] and the first one
//! that produces an answer wins. Failures inside a strategy are logged and
//! only move the search along; callers see a single flat error when every
//! strategy has been exhausted.

use crate::client::GatewayClient;
use crate::extract::{extract, Extraction};
use crate::transport::HttpRequest;
use lowband_core::errors::{GatewayError, GatewayResult};
use reqwest::Url;
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, info, warn};

/// REST-style chat endpoints tried with a JSON POST.
pub const DIRECT_API_ENDPOINTS: [&str; 6] = [
    "/api/chat",
    "/chat",
    "/api/completion",
    "/completion",
    "/api/generate",
    "/generate",
];

/// Paths tried with a query-string GET.
pub const QUERY_ENDPOINTS: [&str; 3] = ["/", "/api", "/query"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// POST the prompt to well-known chat endpoints
    DirectApi,
    /// MCP handshake, tool discovery and tool call
    ProtocolFlow,
    /// GET with the prompt in the query string
    QueryString,
}

impl Strategy {
    pub const ORDER: [Strategy; 3] = [
        Strategy::DirectApi,
        Strategy::ProtocolFlow,
        Strategy::QueryString,
    ];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::DirectApi => write!(f, "direct-api"),
            Strategy::ProtocolFlow => write!(f, "protocol-flow"),
            Strategy::QueryString => write!(f, "query-string"),
        }
    }
}

/// What a successful strategy produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Body returned as-is
    RawText(String),
    /// Text located inside a JSON value
    StructuredField(Extraction),
}

impl Answer {
    pub fn into_text(self) -> String {
        match self {
            Answer::RawText(text) => text,
            Answer::StructuredField(extraction) => extraction.into_text(),
        }
    }

    /// JSON objects go through the extractor; anything else is kept verbatim.
    fn from_body(body: &[u8]) -> Self {
        if let Ok(value @ Value::Object(_)) = serde_json::from_slice::<Value>(body) {
            let extraction = extract(&value);
            if !extraction.text().is_empty() {
                return Answer::StructuredField(extraction);
            }
        }
        Answer::RawText(String::from_utf8_lossy(body).into_owned())
    }
}

impl GatewayClient {
    /// Tries every strategy in order and returns the first answer
    pub async fn gather_information(&mut self, prompt: &str, model: &str) -> GatewayResult<String> {
        for strategy in Strategy::ORDER {
            info!(stage = %strategy, "Trying strategy");
            match self.run_strategy(strategy, prompt, model).await {
                Ok(answer) => {
                    info!(stage = %strategy, "Strategy produced an answer");
                    return Ok(answer.into_text());
                }
                Err(e) => warn!(stage = %strategy, error = %e, "Strategy failed"),
            }
        }

        Err(GatewayError::Exhausted("all approaches failed".to_string()))
    }

    async fn run_strategy(
        &mut self,
        strategy: Strategy,
        prompt: &str,
        model: &str,
    ) -> GatewayResult<Answer> {
        match strategy {
            Strategy::DirectApi => self.try_direct_api(prompt, model).await,
            Strategy::ProtocolFlow => self
                .mcp_flow(prompt, model)
                .await
                .map(Answer::StructuredField),
            Strategy::QueryString => self.try_alternative_endpoints(prompt, model).await,
        }
    }

    /// POSTs the prompt under every common field name; first HTTP 200 wins
    pub async fn try_direct_api(&mut self, prompt: &str, model: &str) -> GatewayResult<Answer> {
        let body = serde_json::to_vec(&json!({
            "prompt": prompt,
            "model": model,
            "query": prompt,
            "input": prompt,
        }))?;

        for endpoint in DIRECT_API_ENDPOINTS {
            let url = self.url(endpoint);
            debug!(%url, "Trying direct API");

            let reply = match self.send(HttpRequest::json_post(url, body.clone())).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(endpoint, error = %e, "Direct API call failed");
                    continue;
                }
            };
            debug!(endpoint, status = reply.status, body = %reply.text(), "Direct API response");

            if reply.is_ok() {
                return Ok(Answer::from_body(&reply.body));
            }
        }

        Err(GatewayError::Exhausted("direct API calls failed".to_string()))
    }

    /// GETs the prompt as query parameters; first HTTP 200 body wins
    pub async fn try_alternative_endpoints(
        &mut self,
        prompt: &str,
        model: &str,
    ) -> GatewayResult<Answer> {
        for endpoint in QUERY_ENDPOINTS {
            let url = match query_url(&self.url(endpoint), prompt, model) {
                Ok(url) => url,
                Err(e) => {
                    warn!(endpoint, error = %e, "Skipping malformed query URL");
                    continue;
                }
            };
            debug!(%url, "Trying GET request");

            let reply = match self.send(HttpRequest::get(url)).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(endpoint, error = %e, "GET request failed");
                    continue;
                }
            };
            debug!(endpoint, status = reply.status, body = %reply.text(), "GET response");

            if reply.is_ok() {
                return Ok(Answer::RawText(reply.text()));
            }
        }

        Err(GatewayError::Exhausted("alternative endpoints failed".to_string()))
    }
}

/// `url` with `model`, `prompt` and `q` form-encoded, keys sorted
fn query_url(url: &str, prompt: &str, model: &str) -> GatewayResult<String> {
    let mut parsed = Url::parse(url)
        .map_err(|e| GatewayError::ConfigError(format!("invalid URL {}: {}", url, e)))?;
    parsed
        .query_pairs_mut()
        .append_pair("model", model)
        .append_pair("prompt", prompt)
        .append_pair("q", prompt);
    Ok(parsed.into())
}
