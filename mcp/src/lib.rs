// Adaptive client for AI gateways whose API shape is unknown up front:
// - Transport over reqwest
// - Session negotiation
// - MCP handshake, tool discovery and tool calls
// - Strategy fallback and answer extraction

pub mod client;
pub mod extract;
pub mod session;
pub mod strategy;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::GatewayClient;
pub use extract::{extract, extract_text, Extraction};
pub use session::{SessionNegotiator, SessionSource, SessionToken};
pub use strategy::{Answer, Strategy};
pub use transport::{HttpMethod, HttpReply, HttpRequest, ReqwestTransport, Transport};

use lowband_core::config::GatewayConfig;
use lowband_core::errors::{GatewayError, GatewayResult};

/// Asks the default gateway (`http://localhost:8080`) for an answer
pub async fn ai_function(prompt: &str, model: &str) -> GatewayResult<String> {
    ai_function_with_config(&GatewayConfig::default(), prompt, model).await
}

/// Asks the configured gateway for an answer, using a fresh client
pub async fn ai_function_with_config(
    config: &GatewayConfig,
    prompt: &str,
    model: &str,
) -> GatewayResult<String> {
    if prompt.is_empty() {
        return Err(GatewayError::ConfigError("prompt cannot be empty".to_string()));
    }
    if model.is_empty() {
        return Err(GatewayError::ConfigError("model cannot be empty".to_string()));
    }

    let mut client = GatewayClient::new(config)?;
    client.gather_information(prompt, model).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::spawn_gateway;
    use axum::routing::post;
    use axum::{Json, Router};
    use lowband_core::errors::ErrorKind;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_empty_prompt_or_model_is_config_error() {
        // Nothing listens here; a network attempt would surface as exhaustion.
        let config = GatewayConfig::with_base_url("http://127.0.0.1:9");

        let err = ai_function_with_config(&config, "", "m").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "Configuration Error: prompt cannot be empty");

        let err = ai_function_with_config(&config, "p", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "Configuration Error: model cannot be empty");

        let err = ai_function("", "mistral").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_config_error() {
        let config = GatewayConfig::with_base_url("");
        let err = ai_function_with_config(&config, "p", "m").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    async fn chat(Json(body): Json<Value>) -> Json<Value> {
        let prompt = body["prompt"].as_str().unwrap_or_default();
        let model = body["model"].as_str().unwrap_or_default();
        Json(json!({"response": format!("{} via {}", prompt, model)}))
    }

    #[tokio::test]
    async fn test_end_to_end_over_http() {
        let app = Router::new().route("/chat", post(chat));
        let base_url = spawn_gateway(app).await;
        let config = GatewayConfig {
            timeout_secs: 5,
            ..GatewayConfig::with_base_url(base_url)
        };

        let answer = ai_function_with_config(&config, "Weather in New York?", "mistral")
            .await
            .unwrap();
        assert_eq!(answer, "Weather in New York? via mistral");
    }
}
