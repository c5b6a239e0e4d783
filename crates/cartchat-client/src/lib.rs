//! Search backend client for CartChat.
//!
//! Provides the [`SearchBackend`] seam used by the conversation store and an
//! HTTP implementation talking to the backend's `POST /chat` endpoint.

pub mod backend;
pub mod config;
pub mod error;
pub mod http;

pub use backend::{SearchBackend, SearchReply, FALLBACK_REPLY};
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpSearchClient;
