use thiserror::Error;

use crate::rpc_types::JsonRpcError;

/// Gateway client errors
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Transport Error: {0}")]
    TransportError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error(transparent)]
    RpcError(JsonRpcError),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("Format Error: {0}")]
    FormatError(String),

    #[error("could not establish session")]
    NoSession,

    #[error("{0}")]
    Exhausted(String),

    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
}

/// Broad classification of a [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input or configuration, detected before any network call.
    Configuration,
    /// Connection, DNS or timeout failure.
    Transport,
    /// Non-200 status, envelope error object or malformed JSON.
    Protocol,
    /// Well-formed response missing an expected field.
    Format,
    /// Every attempt within a stage failed.
    Exhaustion,
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::ConfigError(_) => ErrorKind::Configuration,
            GatewayError::TransportError(_) => ErrorKind::Transport,
            GatewayError::HttpError { .. }
            | GatewayError::RpcError(_)
            | GatewayError::ParsingError(_)
            | GatewayError::SerdeError(_) => ErrorKind::Protocol,
            GatewayError::FormatError(_) => ErrorKind::Format,
            GatewayError::NoSession | GatewayError::Exhausted(_) => ErrorKind::Exhaustion,
        }
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
