//! CartChat Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Async runtime
//! - Rendering
//!
//! All types here represent the conversation a shopper has with the
//! CartChat assistant and the market results it returns.

pub mod conversation;
pub mod error;
pub mod ids;
pub mod market;
pub mod message;
pub mod navigation;
pub mod reaction;
pub mod suggestion;

// Re-export commonly used types
pub use conversation::{Conversation, DeleteOutcome};
pub use error::CoreError;
pub use ids::MessageId;
pub use market::{Categories, Category, MarketResult, Price, Product};
pub use message::{Attachment, AttachmentSource, Author, Message, MessageBody};
pub use navigation::{NavigationState, Route};
pub use reaction::{ReactionKind, Reactions};
pub use suggestion::{Suggestion, SUGGESTIONS};
