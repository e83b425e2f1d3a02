use async_trait::async_trait;
use reqwest::{Client, Response};
use url::Url;

use super::traits::RemoteStore;
use super::types::{NewMessage, RemoteError, TitleBody};
use crate::config::RemoteConfig;
use crate::models::{Conversation, Message};

/// `RemoteStore` over the REST contract: one resource for conversations, one
/// for messages, both relative to a base URL.
pub struct HttpRemoteStore {
    client: Client,
    base_url: Url,
    conversations: String,
    messages: String,
}

impl HttpRemoteStore {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            conversations: config.conversations_resource.clone(),
            messages: config.messages_resource.clone(),
        }
    }

    fn resource_url(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check_status(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), body = %body, "remote store rejected request");
        Err(RemoteError::Status {
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, RemoteError> {
        let url = self.resource_url(&[&self.conversations])?;
        tracing::debug!(%url, "GET conversations");
        let response = self.client.get(url).send().await?;
        let conversations = Self::check_status(response).await?.json().await?;
        Ok(conversations)
    }

    async fn create_conversation(&self, title: &str) -> Result<Conversation, RemoteError> {
        let url = self.resource_url(&[&self.conversations])?;
        tracing::debug!(%url, "POST conversation");
        let response = self
            .client
            .post(url)
            .json(&TitleBody { title })
            .send()
            .await?;
        let conversation = Self::check_status(response).await?.json().await?;
        Ok(conversation)
    }

    async fn update_conversation(
        &self,
        id: i64,
        title: &str,
    ) -> Result<Conversation, RemoteError> {
        let url = self.resource_url(&[&self.conversations, &id.to_string()])?;
        tracing::debug!(%url, "PUT conversation");
        let response = self
            .client
            .put(url)
            .json(&TitleBody { title })
            .send()
            .await?;
        let conversation = Self::check_status(response).await?.json().await?;
        Ok(conversation)
    }

    async fn delete_conversation(&self, id: i64) -> Result<(), RemoteError> {
        let url = self.resource_url(&[&self.conversations, &id.to_string()])?;
        tracing::debug!(%url, "DELETE conversation");
        let response = self.client.delete(url).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn list_messages(&self, conversation_id: i64) -> Result<Vec<Message>, RemoteError> {
        let url = self.resource_url(&[&self.messages])?;
        tracing::debug!(%url, conversation_id, "GET messages");
        let response = self
            .client
            .get(url)
            .query(&[("conversation_id", conversation_id)])
            .send()
            .await?;
        let messages = Self::check_status(response).await?.json().await?;
        Ok(messages)
    }

    async fn create_message(&self, message: NewMessage) -> Result<Message, RemoteError> {
        let url = self.resource_url(&[&self.messages])?;
        tracing::debug!(%url, conversation_id = message.conversation_id, role = message.role.as_str(), "POST message");
        let response = self.client.post(url).json(&message).send().await?;
        let created = Self::check_status(response).await?.json().await?;
        Ok(created)
    }
}
