//! Post listing queries: optional criteria ANDed together, a sort key and a page.

mod builder;
mod predicate;

pub use builder::{PostQueryBuilder, SearchFilterSpec};
pub use predicate::{PageWindow, PostPredicate, PostQuery, SortKey};
