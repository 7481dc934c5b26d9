use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{PopularityCounts, Post};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, PostRepository};
use inkwell_core::query::PostQuery;

/// Post store backed by a `HashMap` behind an async `RwLock`.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    fn sorted_matches(store: &HashMap<Uuid, Post>, query: &PostQuery) -> Vec<Post> {
        let mut matches: Vec<Post> = store
            .values()
            .filter(|post| query.matches(post))
            .cloned()
            .collect();
        matches.sort_by(|a, b| query.compare(a, b));
        matches
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        self.store.write().await.insert(entity.id, entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_matching(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let window = query.window();

        Ok(Self::sorted_matches(&store, query)
            .into_iter()
            .skip(window.skip() as usize)
            .take(window.limit() as usize)
            .collect())
    }

    async fn count_matching(&self, query: &PostQuery) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().filter(|post| query.matches(post)).count() as u64)
    }

    async fn update_counters(&self, id: Uuid, counts: PopularityCounts) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let post = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.apply_counts(counts);
        Ok(())
    }
}
