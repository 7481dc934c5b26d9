//! Composable post predicates, sort keys and page windows.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Post;

/// A single filter condition on a post. A [`PostQuery`] ANDs them together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostPredicate {
    /// Exact author match.
    Author(Uuid),
    /// At least one of the post's tags is in the set.
    AnyTag(Vec<String>),
    /// Case-insensitive substring of the title. Stored lowercased.
    TitleContains(String),
    /// Inclusive bounds on `created_at`.
    CreatedBetween {
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
    /// Inclusive bounds on `like_count`.
    LikesBetween { min: Option<i64>, max: Option<i64> },
}

impl PostPredicate {
    /// Evaluate the predicate against a post held in memory.
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostPredicate::Author(author_id) => post.author_id == *author_id,
            PostPredicate::AnyTag(tags) => post.tags.iter().any(|tag| tags.contains(tag)),
            PostPredicate::TitleContains(needle) => post.title.to_lowercase().contains(needle),
            PostPredicate::CreatedBetween { from, to } => {
                from.is_none_or(|from| post.created_at >= from)
                    && to.is_none_or(|to| post.created_at <= to)
            }
            PostPredicate::LikesBetween { min, max } => {
                min.is_none_or(|min| post.like_count >= min)
                    && max.is_none_or(|max| post.like_count <= max)
            }
        }
    }
}

/// Ordering of a listing. Every key is followed by `id` ascending so pages
/// never overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Popularity,
}

impl SortKey {
    /// Parse a `sort_by` parameter. Unknown values fall back to newest first.
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "oldest" | "date_asc" => SortKey::Oldest,
            "popularity" | "popular" => SortKey::Popularity,
            _ => SortKey::Newest,
        }
    }

    pub fn compare(self, a: &Post, b: &Post) -> Ordering {
        let primary = match self {
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::Oldest => a.created_at.cmp(&b.created_at),
            SortKey::Popularity => b.like_count.cmp(&a.like_count),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// A 1-based page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u64,
    page_size: u64,
}

impl PageWindow {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_PAGE_SIZE: u64 = 10;
    pub const MAX_PAGE_SIZE: u64 = 100;
    /// Largest offset a SQL backend accepts (a signed 64-bit integer).
    pub const MAX_SKIP: u64 = i64::MAX as u64;

    /// Out-of-range input is clamped to the defaults, never rejected.
    pub fn new(page: i64, page_size: i64) -> Self {
        let page = u64::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .unwrap_or(Self::DEFAULT_PAGE);
        let page_size = u64::try_from(page_size)
            .ok()
            .filter(|s| *s >= 1)
            .map_or(Self::DEFAULT_PAGE_SIZE, |s| s.min(Self::MAX_PAGE_SIZE));

        Self { page, page_size }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of matching rows before this page, capped at [`Self::MAX_SKIP`].
    pub fn skip(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.page_size)
            .min(Self::MAX_SKIP)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// A compiled listing request: predicates, ordering and the page to return.
///
/// The same value is used to fetch a page and to count all matches, so the
/// total can never disagree with the items shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostQuery {
    pub(crate) predicates: Vec<PostPredicate>,
    pub(crate) sort: SortKey,
    pub(crate) window: PageWindow,
}

impl PostQuery {
    pub fn predicates(&self) -> &[PostPredicate] {
        &self.predicates
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    /// True when every predicate holds. An empty query matches everything.
    pub fn matches(&self, post: &Post) -> bool {
        self.predicates.iter().all(|p| p.matches(post))
    }

    pub fn compare(&self, a: &Post, b: &Post) -> Ordering {
        self.sort.compare(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn post(title: &str, tags: &[&str], likes: i64) -> Post {
        let mut post = Post::new(
            Uuid::new_v4(),
            title.to_string(),
            String::new(),
            tags.iter().map(|t| t.to_string()).collect(),
        );
        post.like_count = likes;
        post
    }

    #[test]
    fn test_any_tag_is_set_intersection() {
        let p = post("Intro", &["rust", "async"], 0);
        assert!(PostPredicate::AnyTag(vec!["go".into(), "async".into()]).matches(&p));
        assert!(!PostPredicate::AnyTag(vec!["go".into()]).matches(&p));
    }

    #[test]
    fn test_title_contains_ignores_case() {
        let p = post("Go Tutorial", &[], 0);
        assert!(PostPredicate::TitleContains("tutorial".into()).matches(&p));
        assert!(!PostPredicate::TitleContains("python".into()).matches(&p));
    }

    #[test]
    fn test_likes_between_is_inclusive() {
        let p = post("x", &[], 7);
        let range = |min, max| PostPredicate::LikesBetween { min, max };
        assert!(range(Some(5), Some(10)).matches(&p));
        assert!(range(Some(7), Some(7)).matches(&p));
        assert!(!range(Some(5), Some(6)).matches(&p));
        assert!(range(None, Some(7)).matches(&p));
        assert!(!range(Some(8), None).matches(&p));
    }

    #[test]
    fn test_created_between_single_bound() {
        let p = post("x", &[], 0);
        let before = p.created_at - TimeDelta::hours(1);
        let after = p.created_at + TimeDelta::hours(1);

        let from_only = PostPredicate::CreatedBetween {
            from: Some(before),
            to: None,
        };
        let to_only = PostPredicate::CreatedBetween {
            from: None,
            to: Some(before),
        };
        let exact = PostPredicate::CreatedBetween {
            from: Some(p.created_at),
            to: Some(p.created_at),
        };
        assert!(from_only.matches(&p));
        assert!(!to_only.matches(&p));
        assert!(exact.matches(&p));
        assert!(
            PostPredicate::CreatedBetween {
                from: None,
                to: Some(after)
            }
            .matches(&p)
        );
    }

    #[test]
    fn test_page_window_clamps_invalid_input() {
        assert_eq!(PageWindow::new(0, 3), PageWindow::new(1, 3));
        assert_eq!(PageWindow::new(-4, -1), PageWindow::default());
        assert_eq!(PageWindow::new(2, 1_000).page_size(), PageWindow::MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_window_skip() {
        assert_eq!(PageWindow::new(1, 3).skip(), 0);
        assert_eq!(PageWindow::new(2, 3).skip(), 3);
        assert_eq!(PageWindow::new(4, 10).skip(), 30);
    }

    #[test]
    fn test_page_window_skip_fits_signed_offset() {
        let window = PageWindow::new(i64::MAX, 100);
        assert_eq!(window.page(), i64::MAX as u64);
        assert_eq!(window.skip(), PageWindow::MAX_SKIP);
        assert!(i64::try_from(window.skip()).is_ok());

        let window = PageWindow::new(i64::MAX / 50, 100);
        assert!(i64::try_from(window.skip()).is_ok());
    }

    #[test]
    fn test_sort_key_from_param() {
        assert_eq!(SortKey::from_param("popularity"), SortKey::Popularity);
        assert_eq!(SortKey::from_param("date_asc"), SortKey::Oldest);
        assert_eq!(SortKey::from_param("OLDEST"), SortKey::Oldest);
        assert_eq!(SortKey::from_param("date_desc"), SortKey::Newest);
        assert_eq!(SortKey::from_param("whatever"), SortKey::Newest);
    }

    #[test]
    fn test_popularity_sort_breaks_ties_by_id() {
        let mut a = post("a", &[], 3);
        let mut b = post("b", &[], 3);
        a.id = Uuid::from_u128(1);
        b.id = Uuid::from_u128(2);
        assert_eq!(SortKey::Popularity.compare(&a, &b), Ordering::Less);
        assert_eq!(SortKey::Popularity.compare(&b, &a), Ordering::Greater);

        let c = post("c", &[], 9);
        assert_eq!(SortKey::Popularity.compare(&c, &a), Ordering::Less);
    }
}
