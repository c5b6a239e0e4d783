//! Conversation store for CartChat.
//!
//! Wraps the pure [`cartchat_core::Conversation`] reducer with the async
//! parts of a chat session: calling the search backend, the typing
//! indicator, and delayed assistant follow-ups.

pub mod config;
pub mod event;
pub mod replies;
pub mod store;

pub use config::StoreConfig;
pub use event::StoreEvent;
pub use store::{ConversationStore, Deletion, FollowUp, Trigger};
