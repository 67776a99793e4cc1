//! Session negotiation against gateways that may or may not hand out tokens.

use crate::transport::{HttpReply, HttpRequest, Transport};
use lowband_core::errors::{GatewayError, GatewayResult};
use lowband_core::rpc_types::{InitializeParams, SessionResponse};
use std::fmt;
use tracing::{debug, info, warn};

/// Session-creation endpoints, tried in order.
pub const SESSION_ENDPOINTS: [&str; 4] = ["/session", "/api/session", "/sessions", "/create-session"];

/// Handshake endpoint used when no session endpoint produced a token.
pub const INITIALIZE_ENDPOINT: &str = "/initialize";

/// Response header that may carry the token.
pub const SESSION_HEADER: &str = "X-Session-ID";

/// Cookie names accepted as the token.
pub const SESSION_COOKIES: [&str; 2] = ["session_id", "sessionId"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    Body,
    Header,
    Cookie,
}

impl fmt::Display for SessionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionSource::Body => write!(f, "body"),
            SessionSource::Header => write!(f, "header"),
            SessionSource::Cookie => write!(f, "cookie"),
        }
    }
}

/// A negotiated session token and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub value: String,
    pub source: SessionSource,
}

type TokenMatcher = fn(&HttpReply) -> Option<SessionToken>;

const CREATE_MATCHERS: [TokenMatcher; 3] = [token_from_body, token_from_header, token_from_cookie];
const INITIALIZE_MATCHERS: [TokenMatcher; 2] = [token_from_header, token_from_cookie];

fn token_from_body(reply: &HttpReply) -> Option<SessionToken> {
    let parsed: SessionResponse = serde_json::from_slice(&reply.body).ok()?;
    if parsed.session_id.is_empty() {
        return None;
    }
    Some(SessionToken {
        value: parsed.session_id,
        source: SessionSource::Body,
    })
}

fn token_from_header(reply: &HttpReply) -> Option<SessionToken> {
    reply
        .header(SESSION_HEADER)
        .filter(|value| !value.is_empty())
        .map(|value| SessionToken {
            value: value.to_string(),
            source: SessionSource::Header,
        })
}

fn token_from_cookie(reply: &HttpReply) -> Option<SessionToken> {
    reply
        .cookies
        .iter()
        .find(|(name, value)| SESSION_COOKIES.contains(&name.as_str()) && !value.is_empty())
        .map(|(_, value)| SessionToken {
            value: value.clone(),
            source: SessionSource::Cookie,
        })
}

fn first_token(reply: &HttpReply, matchers: &[TokenMatcher]) -> Option<SessionToken> {
    matchers.iter().find_map(|matcher| matcher(reply))
}

/// Walks the session endpoints, then the `/initialize` fallback
pub struct SessionNegotiator<'a> {
    transport: &'a dyn Transport,
    base_url: &'a str,
    init_params: &'a InitializeParams,
}

impl<'a> SessionNegotiator<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        base_url: &'a str,
        init_params: &'a InitializeParams,
    ) -> Self {
        Self {
            transport,
            base_url,
            init_params,
        }
    }

    pub async fn negotiate(&self) -> GatewayResult<SessionToken> {
        for endpoint in SESSION_ENDPOINTS {
            let url = format!("{}{}", self.base_url, endpoint);
            debug!(%url, "Trying to create session");

            let reply = match self
                .transport
                .send(HttpRequest::json_post(url, b"{}".to_vec()))
                .await
            {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(endpoint, error = %e, "Failed to create session");
                    continue;
                }
            };
            debug!(endpoint, status = reply.status, body = %reply.text(), "Session creation response");

            if reply.status == 200 || reply.status == 201 {
                if let Some(token) = first_token(&reply, &CREATE_MATCHERS) {
                    info!(endpoint, source = %token.source, "Session created");
                    return Ok(token);
                }
            }
        }

        self.initialize_with_session().await
    }

    /// Posts the handshake parameters to `/initialize` and looks for a token
    /// in the reply's header or cookies, whatever the status.
    async fn initialize_with_session(&self) -> GatewayResult<SessionToken> {
        let url = format!("{}{}", self.base_url, INITIALIZE_ENDPOINT);
        let payload = serde_json::to_vec(self.init_params)?;

        let reply = self
            .transport
            .send(HttpRequest::json_post(url, payload))
            .await?;
        debug!(status = reply.status, body = %reply.text(), "Initialize response");

        match first_token(&reply, &INITIALIZE_MATCHERS) {
            Some(token) => {
                info!(source = %token.source, "Session taken from initialize response");
                Ok(token)
            }
            None => Err(GatewayError::NoSession),
        }
    }
}
