//! Chat message types for the conversation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::MessageId;
use crate::market::MarketResult;
use crate::reaction::{ReactionKind, Reactions};

/// Author of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// Message typed, picked, or recorded by the user.
    User,
    /// Message produced by the shopping assistant.
    Assistant,
}

/// Where a media attachment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentSource {
    /// Picked from the gallery.
    Gallery,
    /// Taken with the camera.
    Camera,
    /// Recorded with the voice recorder.
    VoiceRecorder,
}

/// Local media resource handed over by a picker or recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub source: AttachmentSource,
    pub uri: String,
}

impl Attachment {
    pub fn gallery(uri: impl Into<String>) -> Self {
        Self {
            source: AttachmentSource::Gallery,
            uri: uri.into(),
        }
    }

    pub fn camera(uri: impl Into<String>) -> Self {
        Self {
            source: AttachmentSource::Camera,
            uri: uri.into(),
        }
    }

    pub fn voice(uri: impl Into<String>) -> Self {
        Self {
            source: AttachmentSource::VoiceRecorder,
            uri: uri.into(),
        }
    }
}

/// Content of a message, one variant per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageBody {
    /// Plain text.
    Text { text: String },
    /// Image with an optional caption.
    Image { uri: String, caption: String },
    /// Voice note with an optional caption.
    Audio { uri: String, caption: String },
    /// Text followed by a market result list rendered after it.
    Markets {
        text: String,
        markets: Vec<MarketResult>,
    },
}

impl MessageBody {
    /// Text content of the body (caption for media).
    pub fn text(&self) -> &str {
        match self {
            MessageBody::Text { text } | MessageBody::Markets { text, .. } => text,
            MessageBody::Image { caption, .. } | MessageBody::Audio { caption, .. } => caption,
        }
    }

    fn set_text(&mut self, new_text: String) {
        match self {
            MessageBody::Text { text } | MessageBody::Markets { text, .. } => *text = new_text,
            MessageBody::Image { caption, .. } | MessageBody::Audio { caption, .. } => {
                *caption = new_text
            }
        }
    }
}

/// A message in the conversation history.
///
/// Fields are private so that reactions can only exist on assistant
/// messages and ids cannot be changed after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    author: Author,
    created_at: DateTime<Utc>,
    body: MessageBody,
    reactions: Option<Reactions>,
}

impl Message {
    fn new(author: Author, body: MessageBody) -> Self {
        let reactions = match author {
            Author::Assistant => Some(Reactions::new()),
            Author::User => None,
        };
        Self {
            id: MessageId::generate(),
            author,
            created_at: Utc::now(),
            body,
            reactions,
        }
    }

    /// Create a user text message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Author::User, MessageBody::Text { text: text.into() })
    }

    /// Create a user message carrying a media attachment and no caption.
    pub fn user_attachment(attachment: Attachment) -> Self {
        let body = match attachment.source {
            AttachmentSource::Gallery | AttachmentSource::Camera => MessageBody::Image {
                uri: attachment.uri,
                caption: String::new(),
            },
            AttachmentSource::VoiceRecorder => MessageBody::Audio {
                uri: attachment.uri,
                caption: String::new(),
            },
        };
        Self::new(Author::User, body)
    }

    /// Create an assistant text message with fresh reactions.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Author::Assistant, MessageBody::Text { text: text.into() })
    }

    /// Create an assistant message presenting market results after `text`.
    pub fn assistant_markets(text: impl Into<String>, markets: Vec<MarketResult>) -> Self {
        Self::new(
            Author::Assistant,
            MessageBody::Markets {
                text: text.into(),
                markets,
            },
        )
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn author(&self) -> Author {
        self.author
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    pub fn text(&self) -> &str {
        self.body.text()
    }

    pub fn reactions(&self) -> Option<&Reactions> {
        self.reactions.as_ref()
    }

    /// Market results carried by this message, if any.
    pub fn markets(&self) -> Option<&[MarketResult]> {
        match &self.body {
            MessageBody::Markets { markets, .. } => Some(markets),
            _ => None,
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.author == Author::Assistant
    }

    /// Replace the text, keeping id, author and timestamp.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.body.set_text(text.into());
    }

    /// Toggle a reaction. Returns the new counters, or None for user messages.
    pub fn react(&mut self, kind: ReactionKind) -> Option<Reactions> {
        let reactions = self.reactions.as_mut()?;
        reactions.toggle(kind);
        Some(*reactions)
    }
}
