//! Accumulates optional criteria into a [`PostQuery`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::predicate::{PageWindow, PostPredicate, PostQuery, SortKey};
use crate::domain::parse_id;
use crate::error::DomainError;

/// Listing request as received from the delivery layer. Nothing here is
/// validated yet; see [`PostQuery::from_spec`].
#[derive(Debug, Clone)]
pub struct SearchFilterSpec {
    pub author_id: Option<String>,
    pub tags: Vec<String>,
    pub title: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub min_popularity: Option<i64>,
    pub max_popularity: Option<i64>,
    pub sort: SortKey,
    pub page: i64,
    pub page_size: i64,
}

impl Default for SearchFilterSpec {
    fn default() -> Self {
        Self {
            author_id: None,
            tags: Vec::new(),
            title: None,
            start_date: None,
            end_date: None,
            min_popularity: None,
            max_popularity: None,
            sort: SortKey::default(),
            page: PageWindow::DEFAULT_PAGE as i64,
            page_size: PageWindow::DEFAULT_PAGE_SIZE as i64,
        }
    }
}

/// Builder for [`PostQuery`].
///
/// Each criterion is optional and independent; range bounds supplied through
/// separate calls are merged into one predicate at [`build`](Self::build).
#[derive(Debug, Default)]
pub struct PostQueryBuilder {
    predicates: Vec<PostPredicate>,
    created_from: Option<DateTime<Utc>>,
    created_to: Option<DateTime<Utc>>,
    min_likes: Option<i64>,
    max_likes: Option<i64>,
    sort: SortKey,
    page: i64,
    page_size: i64,
}

impl PostQueryBuilder {
    pub fn author(mut self, author_id: Uuid) -> Self {
        self.predicates.push(PostPredicate::Author(author_id));
        self
    }

    /// Blank tags are dropped; an empty set adds no constraint.
    pub fn any_tag<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags: Vec<String> = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if !tags.is_empty() {
            self.predicates.push(PostPredicate::AnyTag(tags));
        }
        self
    }

    pub fn title_contains(mut self, needle: &str) -> Self {
        let needle = needle.trim();
        if !needle.is_empty() {
            self.predicates
                .push(PostPredicate::TitleContains(needle.to_lowercase()));
        }
        self
    }

    pub fn created_from(mut self, from: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self
    }

    pub fn created_to(mut self, to: DateTime<Utc>) -> Self {
        self.created_to = Some(to);
        self
    }

    pub fn min_likes(mut self, min: i64) -> Self {
        self.min_likes = Some(min);
        self
    }

    pub fn max_likes(mut self, max: i64) -> Self {
        self.max_likes = Some(max);
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn page(mut self, page: i64, page_size: i64) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn build(self) -> Result<PostQuery, DomainError> {
        let mut predicates = self.predicates;

        if let (Some(from), Some(to)) = (self.created_from, self.created_to) {
            if from > to {
                return Err(DomainError::InvalidFilter(format!(
                    "start_date {from} is after end_date {to}"
                )));
            }
        }
        if self.created_from.is_some() || self.created_to.is_some() {
            predicates.push(PostPredicate::CreatedBetween {
                from: self.created_from,
                to: self.created_to,
            });
        }

        if self.min_likes.is_some_and(|n| n < 0) || self.max_likes.is_some_and(|n| n < 0) {
            return Err(DomainError::InvalidFilter(
                "popularity bounds must not be negative".to_string(),
            ));
        }
        if let (Some(min), Some(max)) = (self.min_likes, self.max_likes) {
            if min > max {
                return Err(DomainError::InvalidFilter(format!(
                    "min_popularity {min} exceeds max_popularity {max}"
                )));
            }
        }
        if self.min_likes.is_some() || self.max_likes.is_some() {
            predicates.push(PostPredicate::LikesBetween {
                min: self.min_likes,
                max: self.max_likes,
            });
        }

        Ok(PostQuery {
            predicates,
            sort: self.sort,
            window: PageWindow::new(self.page, self.page_size),
        })
    }
}

impl PostQuery {
    pub fn builder() -> PostQueryBuilder {
        PostQueryBuilder::default()
    }

    /// Validate a raw listing request and compile it.
    pub fn from_spec(spec: &SearchFilterSpec) -> Result<PostQuery, DomainError> {
        let mut builder = PostQuery::builder()
            .any_tag(&spec.tags)
            .sort(spec.sort)
            .page(spec.page, spec.page_size);

        if let Some(raw) = spec.author_id.as_deref().filter(|s| !s.trim().is_empty()) {
            builder = builder.author(parse_id("author", raw)?);
        }
        if let Some(title) = spec.title.as_deref() {
            builder = builder.title_contains(title);
        }
        if let Some(from) = spec.start_date {
            builder = builder.created_from(from);
        }
        if let Some(to) = spec.end_date {
            builder = builder.created_to(to);
        }
        if let Some(min) = spec.min_popularity {
            builder = builder.min_likes(min);
        }
        if let Some(max) = spec.max_popularity {
            builder = builder.max_likes(max);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_empty_spec_has_no_predicates() {
        let query = PostQuery::from_spec(&SearchFilterSpec::default()).unwrap();
        assert!(query.predicates().is_empty());
        assert_eq!(query.sort(), SortKey::Newest);
        assert_eq!(query.window(), PageWindow::default());
    }

    #[test]
    fn test_popularity_bounds_compose_into_one_range() {
        let query = PostQuery::builder()
            .min_likes(5)
            .max_likes(10)
            .build()
            .unwrap();
        assert_eq!(
            query.predicates(),
            &[PostPredicate::LikesBetween {
                min: Some(5),
                max: Some(10)
            }]
        );
    }

    #[test]
    fn test_inverted_popularity_range_is_rejected() {
        let spec = SearchFilterSpec {
            min_popularity: Some(10),
            max_popularity: Some(5),
            ..Default::default()
        };
        assert!(matches!(
            PostQuery::from_spec(&spec),
            Err(DomainError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_negative_popularity_is_rejected() {
        let result = PostQuery::builder().min_likes(-1).build();
        assert!(matches!(result, Err(DomainError::InvalidFilter(_))));
    }

    #[test]
    fn test_inverted_date_range_is_rejected() {
        let now = Utc::now();
        let result = PostQuery::builder()
            .created_from(now)
            .created_to(now - TimeDelta::days(1))
            .build();
        assert!(matches!(result, Err(DomainError::InvalidFilter(_))));
    }

    #[test]
    fn test_malformed_author_is_invalid_identifier() {
        let spec = SearchFilterSpec {
            author_id: Some("bob".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            PostQuery::from_spec(&spec),
            Err(DomainError::InvalidIdentifier { field: "author", .. })
        ));
    }

    #[test]
    fn test_blank_criteria_are_omitted() {
        let spec = SearchFilterSpec {
            author_id: Some("  ".to_string()),
            tags: vec![String::new(), " ".to_string()],
            title: Some(String::new()),
            ..Default::default()
        };
        let query = PostQuery::from_spec(&spec).unwrap();
        assert!(query.predicates().is_empty());
    }

    #[test]
    fn test_all_criteria_present() {
        let author = Uuid::new_v4();
        let spec = SearchFilterSpec {
            author_id: Some(author.to_string()),
            tags: vec!["go".to_string(), "rust".to_string()],
            title: Some("Go".to_string()),
            start_date: Some(Utc::now() - TimeDelta::days(7)),
            end_date: None,
            min_popularity: None,
            max_popularity: Some(3),
            sort: SortKey::Popularity,
            page: 2,
            page_size: 5,
        };
        let query = PostQuery::from_spec(&spec).unwrap();

        assert_eq!(query.predicates().len(), 5);
        assert!(query.predicates().contains(&PostPredicate::Author(author)));
        assert!(
            query
                .predicates()
                .contains(&PostPredicate::TitleContains("go".to_string()))
        );
        assert_eq!(query.window().skip(), 5);
        assert_eq!(query.sort(), SortKey::Popularity);
    }
}
