//! Application services driving the ports.

mod listing;
mod popularity;

pub use listing::{ListingService, PostPage};
pub use popularity::{PopularityService, ReactionOutcome};
