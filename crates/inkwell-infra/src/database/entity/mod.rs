//! SeaORM entities.

pub mod interaction;
pub mod post;
