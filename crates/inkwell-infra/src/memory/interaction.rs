use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{Interaction, PopularityCounts, Reaction};
use inkwell_core::error::RepoError;
use inkwell_core::ports::InteractionRepository;

/// Interaction store keyed by `(post_id, user_id)`.
pub struct InMemoryInteractionRepository {
    store: RwLock<HashMap<(Uuid, Uuid), Interaction>>,
}

impl InMemoryInteractionRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryInteractionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InteractionRepository for InMemoryInteractionRepository {
    async fn find_reaction(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Interaction>, RepoError> {
        Ok(self.store.read().await.get(&(post_id, user_id)).cloned())
    }

    async fn upsert(&self, interaction: &Interaction) -> Result<(), RepoError> {
        self.store.write().await.insert(
            (interaction.post_id, interaction.user_id),
            interaction.clone(),
        );
        Ok(())
    }

    async fn mark_viewed(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let entry = store
            .entry((post_id, user_id))
            .or_insert_with(|| Interaction {
                post_id,
                user_id,
                reaction: Reaction::None,
                viewed: true,
                interacted_at: at,
            });
        entry.viewed = true;
        entry.interacted_at = at;
        Ok(())
    }

    async fn count_by_reaction(&self, post_id: Uuid) -> Result<PopularityCounts, RepoError> {
        let store = self.store.read().await;
        let counts = store
            .values()
            .filter(|record| record.post_id == post_id)
            .fold(PopularityCounts::default(), |mut counts, record| {
                match record.reaction {
                    Reaction::Like => counts.likes += 1,
                    Reaction::Dislike => counts.dislikes += 1,
                    Reaction::None => {}
                }
                if record.viewed {
                    counts.views += 1;
                }
                counts
            });
        Ok(counts)
    }
}
