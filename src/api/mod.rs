//! HTTP API for the report pipeline.
//!
//! `api_router()` returns a composable `Router` with every route under
//! `/api/`; `start_api_server()` binds and serves it in the background.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_api_server, ApiServer, ApiSession};
pub use types::ApiContext;
