//! In-memory stores, used when no database is configured and in tests.
//!
//! Data is lost on process restart.

mod interaction;
mod post;

pub use interaction::InMemoryInteractionRepository;
pub use post::InMemoryPostRepository;
