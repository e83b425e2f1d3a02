//! In-memory `RemoteStore` for store tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use super::traits::RemoteStore;
use super::types::{NewMessage, RemoteError};
use crate::models::{Conversation, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListConversations,
    CreateConversation,
    UpdateConversation,
    DeleteConversation,
    ListMessages,
    CreateMessage,
}

#[derive(Default)]
struct Inner {
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    next_id: i64,
    ticks: i64,
    failing: HashSet<Op>,
    /// Successful calls left before the operation starts failing.
    fail_after: HashMap<Op, usize>,
    calls: Vec<Op>,
}

/// Mock remote store keeping records in memory. Each write advances a fake
/// clock so `updated_at` values are strictly increasing.
pub struct MockRemoteStore {
    inner: Mutex<Inner>,
}

impl MockRemoteStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }

    pub fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    /// Seed a conversation with an explicit `updated_at`.
    pub fn seed_conversation(&self, id: i64, title: &str, updated_at: DateTime<Utc>) {
        let mut inner = self.inner.lock().unwrap();
        inner.conversations.push(Conversation {
            id,
            title: title.to_string(),
            created_at: updated_at,
            updated_at,
        });
        inner.next_id = inner.next_id.max(id + 1);
    }

    pub fn seed_message(&self, message: Message) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id = inner.next_id.max(message.id + 1);
        inner.messages.push(message);
    }

    pub fn fail(&self, op: Op) {
        self.inner.lock().unwrap().failing.insert(op);
    }

    /// Let `op` succeed `n` more times, then fail like [`Self::fail`].
    pub fn fail_after(&self, op: Op, n: usize) {
        self.inner.lock().unwrap().fail_after.insert(op, n);
    }

    pub fn recover(&self, op: Op) {
        let mut inner = self.inner.lock().unwrap();
        inner.failing.remove(&op);
        inner.fail_after.remove(&op);
    }

    pub fn calls(&self) -> Vec<Op> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }

    fn begin(&self, op: Op) -> Result<std::sync::MutexGuard<'_, Inner>, RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(op);
        let exhausted = match inner.fail_after.get_mut(&op) {
            Some(0) => true,
            Some(remaining) => {
                *remaining -= 1;
                false
            }
            None => false,
        };
        if exhausted {
            inner.failing.insert(op);
        }
        if inner.failing.contains(&op) {
            return Err(RemoteError::Status { status: 500 });
        }
        Ok(inner)
    }
}

impl Inner {
    fn tick(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        MockRemoteStore::epoch() + Duration::minutes(self.ticks)
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[async_trait]
impl RemoteStore for MockRemoteStore {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, RemoteError> {
        let inner = self.begin(Op::ListConversations)?;
        Ok(inner.conversations.clone())
    }

    async fn create_conversation(&self, title: &str) -> Result<Conversation, RemoteError> {
        let mut inner = self.begin(Op::CreateConversation)?;
        let now = inner.tick();
        let conversation = Conversation {
            id: inner.allocate_id(),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.conversations.push(conversation.clone());
        Ok(conversation)
    }

    async fn update_conversation(
        &self,
        id: i64,
        title: &str,
    ) -> Result<Conversation, RemoteError> {
        let mut inner = self.begin(Op::UpdateConversation)?;
        let now = inner.tick();
        let conversation = inner
            .conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RemoteError::Status { status: 404 })?;
        conversation.title = title.to_string();
        conversation.updated_at = now;
        Ok(conversation.clone())
    }

    async fn delete_conversation(&self, id: i64) -> Result<(), RemoteError> {
        let mut inner = self.begin(Op::DeleteConversation)?;
        let before = inner.conversations.len();
        inner.conversations.retain(|c| c.id != id);
        if inner.conversations.len() == before {
            return Err(RemoteError::Status { status: 404 });
        }
        Ok(())
    }

    async fn list_messages(&self, conversation_id: i64) -> Result<Vec<Message>, RemoteError> {
        let inner = self.begin(Op::ListMessages)?;
        Ok(inner
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn create_message(&self, message: NewMessage) -> Result<Message, RemoteError> {
        let mut inner = self.begin(Op::CreateMessage)?;
        let now = inner.tick();
        let created = Message {
            id: inner.allocate_id(),
            conversation_id: message.conversation_id,
            role: message.role,
            content: message.content,
            created_at: now,
        };
        inner.messages.push(created.clone());
        Ok(created)
    }
}
