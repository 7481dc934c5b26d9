use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's stance on a post. Mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    #[default]
    None,
    Like,
    Dislike,
}

/// What a user can ask for. There is no "clear" action: a reaction is removed
/// by repeating the one already in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionAction {
    Like,
    Dislike,
}

impl From<ReactionAction> for Reaction {
    fn from(action: ReactionAction) -> Self {
        match action {
            ReactionAction::Like => Reaction::Like,
            ReactionAction::Dislike => Reaction::Dislike,
        }
    }
}

impl Reaction {
    /// Transition for a requested action.
    ///
    /// | current | Like    | Dislike |
    /// |---------|---------|---------|
    /// | None    | Like    | Dislike |
    /// | Like    | None    | Dislike |
    /// | Dislike | Like    | None    |
    pub fn next(self, requested: ReactionAction) -> Reaction {
        match (self, requested) {
            (Reaction::Like, ReactionAction::Like) => Reaction::None,
            (Reaction::Dislike, ReactionAction::Dislike) => Reaction::None,
            (_, requested) => requested.into(),
        }
    }

    pub fn is_none(self) -> bool {
        self == Reaction::None
    }

    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Reaction::None => "none",
            Reaction::Like => "like",
            Reaction::Dislike => "dislike",
        }
    }
}

/// The persisted relationship of one user to one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub reaction: Reaction,
    /// Sticky: once true it stays true.
    pub viewed: bool,
    pub interacted_at: DateTime<Utc>,
}

impl Interaction {
    /// A reaction implies the post has been viewed.
    pub fn reacted(post_id: Uuid, user_id: Uuid, reaction: Reaction) -> Self {
        Self {
            post_id,
            user_id,
            reaction,
            viewed: true,
            interacted_at: Utc::now(),
        }
    }
}
