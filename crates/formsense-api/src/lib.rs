//! # FormSense API
//!
//! HTTP surface over the form pipeline: one endpoint to process a form
//! for a domain, one to check whether known forms exist for a set of
//! URLs, and a health probe.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use server::{ApiServer, ServerConfig};
pub use state::AppState;
