//! Message identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique, opaque identifier of a chat message.
///
/// Ids are only ever minted by [`MessageId::generate`], so two messages in
/// one conversation never share an id, even across edits and deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generate a new random MessageId.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough to tell messages apart in logs.
        let id = self.0.simple().to_string();
        write!(f, "{}", &id[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_message_id_generate() {
        let ids: HashSet<MessageId> = (0..100).map(|_| MessageId::generate()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_display_is_short() {
        assert_eq!(MessageId::generate().to_string().len(), 8);
    }

    #[test]
    fn test_serializes_as_plain_uuid() {
        let id = MessageId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json.len(), 38);
        assert_eq!(serde_json::from_str::<MessageId>(&json).unwrap(), id);
    }
}
