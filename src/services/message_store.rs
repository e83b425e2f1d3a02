use std::sync::Arc;

use tokio::sync::watch;

use super::error::StoreError;
use crate::models::{Message, Role};
use crate::providers::ReplyProvider;
use crate::remote::{NewMessage, RemoteStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageState {
    pub active: Option<i64>,
    /// Messages of the active conversation, in insertion order.
    pub messages: Vec<Message>,
    pub is_typing: bool,
    pub loading: bool,
    pub error: Option<String>,
}

/// Messages of the currently selected conversation.
pub struct MessageStore {
    remote: Arc<dyn RemoteStore>,
    replies: Arc<dyn ReplyProvider>,
    state: watch::Sender<MessageState>,
}

impl MessageStore {
    pub fn new(remote: Arc<dyn RemoteStore>, replies: Arc<dyn ReplyProvider>) -> Self {
        let (state, _) = watch::channel(MessageState::default());
        Self {
            remote,
            replies,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<MessageState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> MessageState {
        self.state.borrow().clone()
    }

    pub fn active(&self) -> Option<i64> {
        self.state.borrow().active
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.borrow().messages.clone()
    }

    /// Switch the active conversation. Cached messages are dropped right
    /// away; `None` never touches the remote store.
    pub async fn select(&self, conversation_id: Option<i64>) -> Result<(), StoreError> {
        self.state.send_modify(|s| {
            s.active = conversation_id;
            s.messages.clear();
            s.error = None;
            s.loading = conversation_id.is_some();
        });

        match conversation_id {
            Some(id) => self.load(id).await,
            None => Ok(()),
        }
    }

    /// Reload the active conversation, if any.
    pub async fn refresh(&self) -> Result<(), StoreError> {
        match self.active() {
            Some(id) => {
                self.state.send_modify(|s| {
                    s.loading = true;
                    s.error = None;
                });
                self.load(id).await
            }
            None => Ok(()),
        }
    }

    async fn load(&self, conversation_id: i64) -> Result<(), StoreError> {
        let result = self.remote.list_messages(conversation_id).await;

        // The selection may have moved on while the request was in flight.
        let current = self.active() == Some(conversation_id);
        if !current {
            tracing::debug!(conversation_id, "discarding stale message load");
        }

        match result {
            Ok(messages) => {
                if current {
                    tracing::debug!(conversation_id, count = messages.len(), "loaded messages");
                    self.state.send_modify(|s| {
                        s.messages = messages;
                        s.loading = false;
                    });
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load messages for {}: {}", conversation_id, e);
                if current {
                    self.state.send_modify(|s| {
                        s.loading = false;
                        s.error = Some(format!("Failed to load messages: {e}"));
                    });
                }
                Err(StoreError::Fetch(e))
            }
        }
    }

    /// Post a user message, then the assistant's reply to it.
    ///
    /// Returns `Ok(None)` without doing anything when no conversation is
    /// selected or `content` is blank. Messages committed before a failure
    /// stay in the list.
    pub async fn send(&self, content: &str) -> Result<Option<(Message, Message)>, StoreError> {
        let Some(conversation_id) = self.active() else {
            return Ok(None);
        };
        if content.trim().is_empty() {
            return Ok(None);
        }

        let user = self
            .remote
            .create_message(NewMessage {
                conversation_id,
                role: Role::User,
                content: content.to_string(),
            })
            .await
            .map_err(|e| self.fail(StoreError::Create(e)))?;
        self.append(&user);

        self.state.send_modify(|s| s.is_typing = true);

        let history = self.history_for(&user);
        let reply = self
            .replies
            .generate(&history)
            .await
            .map_err(|e| self.fail(StoreError::Reply(e)))?;

        let assistant = self
            .remote
            .create_message(NewMessage {
                conversation_id,
                role: Role::Assistant,
                content: reply,
            })
            .await
            .map_err(|e| self.fail(StoreError::Create(e)))?;
        self.append(&assistant);

        self.state.send_modify(|s| s.is_typing = false);
        tracing::debug!(
            conversation_id,
            provider = self.replies.name(),
            "exchange complete"
        );

        Ok(Some((user, assistant)))
    }

    /// Append to the local list, unless the user has since switched to a
    /// different conversation.
    fn append(&self, message: &Message) {
        self.state.send_if_modified(|s| {
            if s.active != Some(message.conversation_id) {
                return false;
            }
            s.messages.push(message.clone());
            true
        });
    }

    fn history_for(&self, user: &Message) -> Vec<Message> {
        let state = self.state.borrow();
        if state.active == Some(user.conversation_id) {
            state.messages.clone()
        } else {
            vec![user.clone()]
        }
    }

    fn fail(&self, err: StoreError) -> StoreError {
        tracing::error!("Failed to send message: {}", err);
        let text = err.to_string();
        self.state.send_modify(|s| {
            s.is_typing = false;
            s.error = Some(text);
        });
        err
    }
}
