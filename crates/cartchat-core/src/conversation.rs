//! Ordered conversation history and the pure operations that reshape it.
//!
//! Every operation here is synchronous and lenient: an unknown id or an
//! empty edit leaves the conversation untouched and reports `None`.

use crate::ids::MessageId;
use crate::message::Message;
use crate::reaction::{ReactionKind, Reactions};

/// First greeting shown when a conversation starts.
pub const GREETING: &str = "Olá! Sou seu assistente de compras.";

/// Second greeting, inviting the user to type or pick a suggestion.
pub const GREETING_PROMPT: &str =
    "Digite os produtos que você procura ou escolha uma das sugestões abaixo.";

/// Number of seed messages; suggestions stay visible until the user adds more.
pub const SEED_LEN: usize = 2;

/// Result of deleting a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Index the deleted message occupied.
    pub index: usize,
    /// Number of messages dropped (the target plus everything after it).
    pub removed: usize,
}

impl DeleteOutcome {
    /// Whether content after the deleted message was discarded too.
    pub fn discarded_trailing(&self) -> bool {
        self.removed > 1
    }
}

/// Ordered message history.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation pre-seeded with the assistant greetings.
    pub fn seeded() -> Self {
        Self {
            messages: vec![
                Message::assistant(GREETING),
                Message::assistant(GREETING_PROMPT),
            ],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    /// Index of the message with the given id.
    pub fn position(&self, id: &MessageId) -> Option<usize> {
        self.messages.iter().position(|m| m.id() == id)
    }

    /// Append a message at the end.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Suggestions are offered until the user has said something.
    pub fn suggestions_visible(&self) -> bool {
        self.messages.len() <= SEED_LEN
    }

    /// Replace the text of `id` and drop everything after it.
    ///
    /// Returns a copy of the edited message, or `None` if the id is unknown
    /// or the new text is blank.
    pub fn truncate_for_edit(&mut self, id: &MessageId, new_text: &str) -> Option<Message> {
        if new_text.trim().is_empty() {
            return None;
        }
        let index = self.position(id)?;
        self.messages.truncate(index + 1);
        let edited = &mut self.messages[index];
        edited.set_text(new_text);
        Some(edited.clone())
    }

    /// Drop `id` and every message after it.
    pub fn truncate_for_delete(&mut self, id: &MessageId) -> Option<DeleteOutcome> {
        let index = self.position(id)?;
        let removed = self.messages.len() - index;
        self.messages.truncate(index);
        Some(DeleteOutcome { index, removed })
    }

    /// Toggle a reaction on an assistant message.
    pub fn react(&mut self, id: &MessageId, kind: ReactionKind) -> Option<Reactions> {
        self.messages
            .iter_mut()
            .find(|m| m.id() == id)
            .and_then(|m| m.react(kind))
    }
}
