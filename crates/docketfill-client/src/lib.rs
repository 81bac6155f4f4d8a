//! Record-store and importer client for CourtAPI-style case record services.
//!
//! Credentials live in an explicit [`ClientConfig`] scoped to one invocation;
//! nothing is held in process-wide state.

mod config;
pub use config::{ClientConfig, ClientError, DEFAULT_BASE_URL};

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
mod wire;

#[cfg(feature = "http")]
pub use http::CourtApiClient;
