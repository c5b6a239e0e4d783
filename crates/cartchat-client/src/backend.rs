//! The search collaborator contract.

use async_trait::async_trait;
use serde_json::Value;

use cartchat_core::MarketResult;

use crate::error::ClientError;

/// Reply used when the backend answers without usable content.
pub const FALLBACK_REPLY: &str = "Não foi possível obter uma resposta válida";

/// What the backend answered, classified once at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchReply {
    /// Free-text answer.
    Text(String),
    /// Products grouped by market.
    Markets(Vec<MarketResult>),
}

impl SearchReply {
    /// Classify the `message` field of a `/chat` response body.
    ///
    /// A non-empty array whose first element names a market is a market
    /// list; a non-empty string is text; anything else becomes the
    /// fallback text.
    pub fn from_message(message: Option<Value>) -> Result<Self, ClientError> {
        match message {
            Some(Value::Array(items)) if is_market_list(&items) => {
                let markets: Vec<MarketResult> = serde_json::from_value(Value::Array(items))?;
                Ok(SearchReply::Markets(markets))
            }
            Some(Value::String(text)) if !text.is_empty() => Ok(SearchReply::Text(text)),
            _ => Ok(SearchReply::Text(FALLBACK_REPLY.to_string())),
        }
    }

    /// Classify a full response body of the form `{"message": ...}`.
    pub fn from_body(body: Value) -> Result<Self, ClientError> {
        match body {
            Value::Object(mut map) => Self::from_message(map.remove("message")),
            other => Err(ClientError::Serialization(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }
}

fn is_market_list(items: &[Value]) -> bool {
    items
        .first()
        .and_then(|first| first.get("nome_mercado"))
        .and_then(Value::as_str)
        .is_some_and(|name| !name.is_empty())
}

/// Answers a shopper's request.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Send `query` to the backend and classify its answer.
    async fn search(&self, query: &str) -> Result<SearchReply, ClientError>;
}
