use crate::extract::{extract, Extraction};
use crate::session::{SessionNegotiator, SessionToken};
use crate::transport::{HttpReply, HttpRequest, ReqwestTransport, Transport};
use lowband_core::config::GatewayConfig;
use lowband_core::errors::{GatewayError, GatewayResult};
use lowband_core::rpc_types::{InitializeParams, Request, Response};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Client for one gateway and one logical query.
///
/// Holds the request-id counter and the negotiated session, so an instance
/// must not be shared between queries; build a new one per answer.
pub struct GatewayClient {
    base_url: String,
    transport: Box<dyn Transport>,
    init_params: InitializeParams,
    next_id: u64,
    session: Option<SessionToken>,
}

impl GatewayClient {
    /// Create a client using the reqwest transport and the configured timeout
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let config = config.clone().validate()?;
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(&config, Box::new(transport)))
    }

    /// Create a client over any transport
    pub fn with_transport(config: &GatewayConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            transport,
            init_params: config.initialize_params(),
            next_id: 1,
            session: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Sends through the transport with the session headers attached
    pub(crate) async fn send(&self, mut request: HttpRequest) -> GatewayResult<HttpReply> {
        if let Some(session) = self.session.as_ref().filter(|s| !s.value.is_empty()) {
            request = request
                .with_header("X-Session-ID", session.value.as_str())
                .with_header("Session-ID", session.value.as_str());
        }
        self.transport.send(request).await
    }

    /// Negotiates a session unless one is already held
    pub async fn create_session(&mut self) -> GatewayResult<()> {
        if self.session.is_some() {
            return Ok(());
        }
        let token = SessionNegotiator::new(self.transport.as_ref(), &self.base_url, &self.init_params)
            .negotiate()
            .await?;
        self.session = Some(token);
        Ok(())
    }

    /// Sends a JSON-RPC request to the base URL
    async fn send_request(&mut self, method: &str, params: Value) -> GatewayResult<Response> {
        let request = Request::new(self.next_id(), method, params);
        let payload = request.encode()?;
        debug!(id = request.id, method, "Sending MCP request");

        let reply = self
            .send(HttpRequest::json_post(self.base_url.clone(), payload))
            .await?;
        debug!(status = reply.status, body = %reply.text(), "MCP response");

        if !reply.is_ok() {
            return Err(GatewayError::HttpError {
                status_code: reply.status,
                message: reply.text(),
            });
        }

        let response = Response::decode(&reply.body)?;
        if response.id != i64::try_from(request.id).ok() {
            warn!(
                sent = request.id,
                received = ?response.id,
                method,
                "Response id does not match request id"
            );
        }
        Ok(response)
    }

    /// Establishes the MCP connection, negotiating a session first when possible
    pub async fn initialize(&mut self) -> GatewayResult<Value> {
        if let Err(e) = self.create_session().await {
            warn!(error = %e, "Session creation failed, trying direct initialization");
        }

        let params = self.init_params.to_value()?;
        let response = self.send_request("initialize", params).await?;
        let result = response.result().map_err(GatewayError::RpcError)?;

        info!("MCP connection initialized successfully");
        Ok(result)
    }

    /// Lists the tools the gateway advertises, in the order it sent them
    pub async fn list_tools(&mut self) -> GatewayResult<Vec<Value>> {
        let response = self.send_request("tools/list", json!({})).await?;
        let result = response.result().map_err(GatewayError::RpcError)?;

        match result {
            Value::Object(mut fields) => match fields.remove("tools") {
                Some(Value::Array(tools)) => Ok(tools),
                _ => Err(GatewayError::FormatError(
                    "unexpected response format: no tools list".to_string(),
                )),
            },
            _ => Err(GatewayError::FormatError(
                "unexpected response format: result is not an object".to_string(),
            )),
        }
    }

    /// Calls a tool and returns its raw result
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> GatewayResult<Value> {
        let params = json!({
            "name": name,
            "arguments": arguments,
        });
        let response = self.send_request("tools/call", params).await?;
        response.result().map_err(GatewayError::RpcError)
    }

    /// initialize, list tools, call the first one, extract its answer
    pub async fn try_mcp_flow(&mut self, prompt: &str, model: &str) -> GatewayResult<String> {
        self.mcp_flow(prompt, model).await.map(Extraction::into_text)
    }

    pub(crate) async fn mcp_flow(&mut self, prompt: &str, model: &str) -> GatewayResult<Extraction> {
        self.initialize().await?;

        let tools = self.list_tools().await?;
        let tool = tools
            .first()
            .ok_or_else(|| GatewayError::FormatError("no tools available".to_string()))?;
        let name = tool_name(tool)?;
        info!(tool = %name, available = tools.len(), "Calling first advertised tool");

        let arguments = json!({
            "prompt": prompt,
            "model": model,
        });
        let result = self.call_tool(&name, arguments).await?;
        Ok(extract(&result))
    }
}

fn tool_name(tool: &Value) -> GatewayResult<String> {
    tool.get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| GatewayError::FormatError(format!("tool descriptor has no name: {}", tool)))
}
