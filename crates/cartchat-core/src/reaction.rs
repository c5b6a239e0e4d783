//! Like/dislike reactions on assistant messages.

use serde::{Deserialize, Serialize};

/// Kind of reaction a user can leave on an assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

/// Aggregate reaction counters plus the local user's current reaction.
///
/// Counters are unsigned and the user holds at most one reaction, so a
/// message can never count the same user as both liking and disliking it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reactions {
    pub likes: u32,
    pub dislikes: u32,
    pub user_reaction: Option<ReactionKind>,
}

impl Reactions {
    /// Fresh counters with no reaction from the user.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a user reaction with toggle semantics.
    ///
    /// Reacting with the kind already held removes it. Reacting with the
    /// other kind moves the user's vote across in one step.
    pub fn toggle(&mut self, kind: ReactionKind) {
        if self.user_reaction == Some(kind) {
            *self.counter_mut(kind) = self.counter(kind).saturating_sub(1);
            self.user_reaction = None;
            return;
        }

        if let Some(old) = self.user_reaction {
            *self.counter_mut(old) = self.counter(old).saturating_sub(1);
        }
        *self.counter_mut(kind) += 1;
        self.user_reaction = Some(kind);
    }

    /// Counter for the given kind.
    pub fn counter(&self, kind: ReactionKind) -> u32 {
        match kind {
            ReactionKind::Like => self.likes,
            ReactionKind::Dislike => self.dislikes,
        }
    }

    fn counter_mut(&mut self, kind: ReactionKind) -> &mut u32 {
        match kind {
            ReactionKind::Like => &mut self.likes,
            ReactionKind::Dislike => &mut self.dislikes,
        }
    }
}
