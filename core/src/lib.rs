// Core pieces shared by the gateway client:
// - JSON-RPC envelope types and their codec
// - Configuration loading
// - Database collaborator configuration
// - Shared error types

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export db module - Connection parameters for the database collaborator
pub mod db;
pub use db::DatabaseConfig;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

// Export envelope types
pub mod rpc_types;
pub use rpc_types::{
    ClientInfo, InitializeParams, JsonRpcError, Request, Response, SessionResponse,
    JSONRPC_VERSION, PROTOCOL_VERSION,
};
