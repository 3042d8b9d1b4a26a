//! HTTP host for the Donation Tracking Ledger.
//!
//! Exposes the dispatch façade as JSON endpoints:
//!
//! - `GET  /v1/health`
//! - `GET  /v1/info` -- version and the operation table
//! - `POST /v1/invoke` -- state-changing operations
//! - `POST /v1/query` -- read operations; payloads are hex-encoded records

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{AppState, CallRequest, CallResponse, ErrorResponse, SharedDispatcher};
pub use server::DtlServer;
