use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::errors::{GatewayError, GatewayResult};

/// Protocol tag carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision announced during the handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

// Basic JSON-RPC Structures

/// Represents a JSON-RPC Request object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Request {
    pub jsonrpc: String, // Should always be "2.0"
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl Request {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }

    /// Serializes the request into the bytes sent on the wire.
    pub fn encode(&self) -> GatewayResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| GatewayError::ParsingError(format!("failed to marshal request: {}", e)))
    }
}

/// Represents a JSON-RPC Response object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Response {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl Response {
    /// Decodes a response envelope. Malformed JSON is always an error.
    pub fn decode(bytes: &[u8]) -> GatewayResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| {
            GatewayError::ParsingError(format!("failed to unmarshal response: {}", e))
        })
    }

    /// Convenience method to extract the result or return the error.
    pub fn result(&self) -> Result<Value, JsonRpcError> {
        if let Some(err) = &self.error {
            Err(err.clone())
        } else if let Some(res) = &self.result {
            Ok(res.clone())
        } else {
            Ok(Value::Null)
        }
    }
}

/// Represents a JSON-RPC Error object.
#[derive(Error, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MCP error {}: {}", self.code, self.message)
    }
}

// MCP Specific Structures

/// `initialize` request parameters. Also posted verbatim to `/initialize`
/// when no session endpoint hands out a token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    pub capabilities: Value,
    pub client_info: ClientInfo,
}

impl InitializeParams {
    pub fn new(protocol_version: impl Into<String>, client_info: ClientInfo) -> Self {
        Self {
            protocol_version: protocol_version.into(),
            capabilities: json!({ "tools": {} }),
            client_info,
        }
    }

    pub fn to_value(&self) -> GatewayResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Body returned by a session-creation endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SessionResponse {
    #[serde(rename = "sessionId", default)]
    pub session_id: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = Request::new(7, "tools/list", json!({}));
        let bytes = request.encode().unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": 7, "method": "tools/list", "params": {}})
        );
    }

    #[test]
    fn test_decode_result_envelope() {
        let response =
            Response::decode(br#"{"jsonrpc":"2.0","id":1,"result":{"tools":[]}}"#).unwrap();
        assert_eq!(response.id, Some(1));
        assert_eq!(response.result().unwrap(), json!({"tools": []}));
    }

    #[test]
    fn test_decode_error_envelope() {
        let response = Response::decode(
            br#"{"jsonrpc":"2.0","id":2,"error":{"code":-32601,"message":"Method not found"}}"#,
        )
        .unwrap();
        let err = response.result().unwrap_err();
        assert_eq!(err.code, -32601);
        assert_eq!(err.to_string(), "MCP error -32601: Method not found");
    }

    #[test]
    fn test_decode_malformed_is_error() {
        let err = Response::decode(b"<html>not json</html>").unwrap_err();
        assert!(matches!(err, GatewayError::ParsingError(_)));
    }

    #[test]
    fn test_missing_result_is_null() {
        let response = Response::decode(br#"{"jsonrpc":"2.0","id":3}"#).unwrap();
        assert_eq!(response.result().unwrap(), Value::Null);
    }

    #[test]
    fn test_initialize_params_shape() {
        let params = InitializeParams::new(
            PROTOCOL_VERSION,
            ClientInfo {
                name: "lowband-client".to_string(),
                version: "1.0.0".to_string(),
            },
        );
        assert_eq!(
            params.to_value().unwrap(),
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {"tools": {}},
                "clientInfo": {"name": "lowband-client", "version": "1.0.0"}
            })
        );
    }

    #[test]
    fn test_session_response_tolerates_missing_fields() {
        let parsed: SessionResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(parsed.session_id.is_empty());

        let parsed: SessionResponse =
            serde_json::from_str(r#"{"sessionId":"abc","status":"created"}"#).unwrap();
        assert_eq!(parsed.session_id, "abc");
    }
}
