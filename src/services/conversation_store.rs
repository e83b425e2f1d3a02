use std::sync::Arc;

use tokio::sync::watch;

use super::conversation::normalize_title;
use super::error::StoreError;
use crate::models::conversation::sort_by_recency;
use crate::models::Conversation;
use crate::remote::RemoteStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    /// Most recently updated first.
    pub conversations: Vec<Conversation>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Client-side cache of the remote conversation list.
///
/// Every mutation is applied only after the remote store confirms it. A
/// failed call leaves the list as it was.
pub struct ConversationStore {
    remote: Arc<dyn RemoteStore>,
    state: watch::Sender<ConversationState>,
}

impl ConversationStore {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        let (state, _) = watch::channel(ConversationState::default());
        Self { remote, state }
    }

    pub fn snapshot(&self) -> ConversationState {
        self.state.borrow().clone()
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        self.state.borrow().conversations.clone()
    }

    pub fn get(&self, id: i64) -> Option<Conversation> {
        self.state
            .borrow()
            .conversations
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Replace the cache with the remote list, sorted by recency.
    pub async fn list(&self) -> Result<(), StoreError> {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        match self.remote.list_conversations().await {
            Ok(mut conversations) => {
                sort_by_recency(&mut conversations);
                tracing::info!(count = conversations.len(), "loaded conversations");
                self.state.send_modify(|s| {
                    s.conversations = conversations;
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load conversations: {}", e);
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(format!("Failed to load conversations: {e}"));
                });
                Err(StoreError::Fetch(e))
            }
        }
    }

    /// Create a conversation and put it at the top of the list.
    pub async fn create(&self, title: &str) -> Result<Conversation, StoreError> {
        let created = self.remote.create_conversation(title).await.map_err(|e| {
            tracing::error!("Failed to create conversation: {}", e);
            StoreError::Create(e)
        })?;

        tracing::debug!(id = created.id, "created conversation");
        let entry = created.clone();
        self.state.send_modify(|s| s.conversations.insert(0, entry));
        Ok(created)
    }

    /// Rename a conversation. Whitespace-only titles are rejected without
    /// contacting the remote store.
    pub async fn rename(&self, id: i64, title: &str) -> Result<Conversation, StoreError> {
        let title = normalize_title(title).ok_or(StoreError::EmptyTitle)?;

        let updated = self.remote.update_conversation(id, title).await.map_err(|e| {
            tracing::error!("Failed to update conversation {}: {}", id, e);
            StoreError::Update(e)
        })?;

        let entry = updated.clone();
        self.state.send_modify(|s| {
            if let Some(slot) = s.conversations.iter_mut().find(|c| c.id == id) {
                *slot = entry;
            }
        });
        Ok(updated)
    }

    pub async fn remove(&self, id: i64) -> Result<(), StoreError> {
        self.remote.delete_conversation(id).await.map_err(|e| {
            tracing::error!("Failed to delete conversation {}: {}", id, e);
            StoreError::Delete(e)
        })?;

        tracing::debug!(id, "deleted conversation");
        self.state.send_modify(|s| s.conversations.retain(|c| c.id != id));
        Ok(())
    }
}
