//! Domain entities - the core business objects.

mod id;
mod interaction;
mod post;

pub use id::parse_id;
pub use interaction::{Interaction, Reaction, ReactionAction};
pub use post::{PopularityCounts, Post};
