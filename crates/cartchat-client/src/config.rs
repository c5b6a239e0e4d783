//! Client configuration.

/// Search client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without the `/chat` path.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}
