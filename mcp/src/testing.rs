//! Test doubles shared by the unit tests in this crate.

use crate::transport::{HttpMethod, HttpReply, HttpRequest, Transport};
use async_trait::async_trait;
use lowband_core::errors::GatewayResult;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

pub(crate) const BASE_URL: &str = "http://gateway.test";

type Handler = dyn Fn(&HttpRequest) -> GatewayResult<HttpReply> + Send + Sync;

/// In-memory transport answering from a closure and recording every request
#[derive(Clone)]
pub(crate) struct ScriptedTransport {
    handler: Arc<Handler>,
    log: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn new<F>(handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> GatewayResult<HttpReply> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.log.lock().unwrap().clone()
    }

    /// Request paths relative to [`BASE_URL`], query strings dropped
    pub(crate) fn paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| path_of(&request.url))
            .collect()
    }

    /// `method` of every JSON-RPC envelope posted to the base URL
    pub(crate) fn rpc_methods(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(rpc_envelope)
            .filter_map(|body| body["method"].as_str().map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> GatewayResult<HttpReply> {
        self.log.lock().unwrap().push(request.clone());
        (self.handler)(&request)
    }
}

pub(crate) fn path_of(url: &str) -> String {
    let rest = url.strip_prefix(BASE_URL).unwrap_or(url);
    rest.split('?').next().unwrap_or("").to_string()
}

/// Decoded body of a POST to the base URL itself
pub(crate) fn rpc_envelope(request: &HttpRequest) -> Option<Value> {
    if request.method != HttpMethod::Post || request.url != BASE_URL {
        return None;
    }
    serde_json::from_slice(request.body.as_ref()?).ok()
}

/// 200 reply carrying a JSON-RPC result for `request`
pub(crate) fn rpc_result(request: &HttpRequest, result: Value) -> HttpReply {
    let id = rpc_envelope(request).map(|body| body["id"].clone()).unwrap_or(Value::Null);
    HttpReply::new(
        200,
        json!({"jsonrpc": "2.0", "id": id, "result": result}).to_string(),
    )
}

/// 200 reply carrying a JSON-RPC error object for `request`
pub(crate) fn rpc_error(request: &HttpRequest, code: i64, message: &str) -> HttpReply {
    let id = rpc_envelope(request).map(|body| body["id"].clone()).unwrap_or(Value::Null);
    HttpReply::new(
        200,
        json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}})
            .to_string(),
    )
}

pub(crate) fn not_found() -> GatewayResult<HttpReply> {
    Ok(HttpReply::new(404, "404 page not found"))
}

/// Serves `app` on an ephemeral loopback port and returns its base URL
pub(crate) async fn spawn_gateway(app: axum::Router) -> String {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let server = axum::Server::bind(&addr).serve(app.into_make_service());
    let local_addr = server.local_addr();
    tokio::spawn(server);
    format!("http://{}", local_addr)
}
