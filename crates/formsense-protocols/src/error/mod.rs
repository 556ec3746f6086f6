//! Error types for the FormSense protocol layer.

mod pipeline;
mod provider;
mod store;

pub use pipeline::*;
pub use provider::*;
pub use store::*;
