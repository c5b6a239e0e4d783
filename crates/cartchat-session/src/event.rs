//! Events emitted by the conversation store for front ends.

use cartchat_core::Message;

/// Something the front end may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A message was appended at the end of the conversation.
    MessageAppended(Message),
    /// An edit or delete shortened the conversation to `len` messages.
    ConversationTruncated { len: usize },
    /// Typing indicator turned on or off.
    TypingChanged(bool),
    /// One-shot alert to show the user.
    Alert { title: String, body: String },
}
