use async_trait::async_trait;

use super::types::{NewMessage, RemoteError};
use crate::models::{Conversation, Message};

/// The remote persistence service. The client never holds an authoritative
/// copy of anything returned here.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, RemoteError>;

    async fn create_conversation(&self, title: &str) -> Result<Conversation, RemoteError>;

    async fn update_conversation(&self, id: i64, title: &str)
        -> Result<Conversation, RemoteError>;

    async fn delete_conversation(&self, id: i64) -> Result<(), RemoteError>;

    async fn list_messages(&self, conversation_id: i64) -> Result<Vec<Message>, RemoteError>;

    async fn create_message(&self, message: NewMessage) -> Result<Message, RemoteError>;
}
