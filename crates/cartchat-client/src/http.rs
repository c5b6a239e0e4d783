//! HTTP client for the backend chat endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::backend::{SearchBackend, SearchReply};
use crate::config::ClientConfig;
use crate::error::ClientError;

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// HTTP implementation of [`SearchBackend`].
pub struct HttpSearchClient {
    inner: reqwest::Client,
    base_url: String,
}

impl HttpSearchClient {
    /// Create a new HTTP client with default settings.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_config(&ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        })
    }

    /// Create a new HTTP client from configuration.
    pub fn with_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Ok(Self {
            inner,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the chat endpoint.
    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    async fn search(&self, query: &str) -> Result<SearchReply, ClientError> {
        let url = self.chat_url();
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .post(&url)
            .json(&ChatRequest { message: query })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                status: response.status().as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(e.to_string()))?;

        let reply = SearchReply::from_body(body)?;
        match &reply {
            SearchReply::Markets(markets) => {
                debug!(markets = markets.len(), "Received market results")
            }
            SearchReply::Text(_) => debug!("Received text reply"),
        }
        Ok(reply)
    }
}
