use std::fmt;

use crate::services::conversation::{title_from_first_message, DEFAULT_TITLE};
use crate::services::{ConversationStore, MessageStore, StoreError};

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMsg {
    NewChat,
    ConversationSelected(i64),
    DeleteConversation(i64),
    RenameConversation(i64, String), // id, new_title
    SendMessage(String),
    Refresh,
}

/// One-line status shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    fn success(text: &str) -> Self {
        Notice::Success(text.to_string())
    }

    fn failure(text: &str) -> Self {
        Notice::Failure(text.to_string())
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success(text) => write!(f, "✓ {text}"),
            Notice::Failure(text) => write!(f, "✗ {text}"),
        }
    }
}

/// Composes the two stores: owns the selection and turns store results into
/// notices. Holds no conversation or message data of its own.
pub struct App {
    conversations: ConversationStore,
    messages: MessageStore,
    active_conversation: Option<i64>,
}

impl App {
    pub fn new(conversations: ConversationStore, messages: MessageStore) -> Self {
        Self {
            conversations,
            messages,
            active_conversation: None,
        }
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }

    pub fn active_conversation(&self) -> Option<i64> {
        self.active_conversation
    }

    /// Load the conversation list and open the most recent conversation.
    pub async fn init(&mut self) -> Option<Notice> {
        if self.conversations.list().await.is_err() {
            return Some(Notice::failure("Failed to load conversations"));
        }
        if self.active_conversation.is_none() {
            if let Some(first) = self.conversations.conversations().first() {
                return self.select(Some(first.id)).await;
            }
        }
        None
    }

    pub async fn update(&mut self, msg: AppMsg) -> Option<Notice> {
        match msg {
            AppMsg::NewChat => match self.conversations.create(DEFAULT_TITLE).await {
                Ok(conv) => match self.select(Some(conv.id)).await {
                    Some(failure) => Some(failure),
                    None => Some(Notice::success("New conversation started")),
                },
                Err(_) => Some(Notice::failure("Failed to create conversation")),
            },
            AppMsg::ConversationSelected(id) => self.select(Some(id)).await,
            AppMsg::DeleteConversation(id) => {
                if self.conversations.remove(id).await.is_err() {
                    return Some(Notice::failure("Failed to delete conversation"));
                }
                if self.active_conversation == Some(id) {
                    let next = self.conversations.conversations().first().map(|c| c.id);
                    // Deleted, but the next conversation failed to load.
                    if let Some(failure) = self.select(next).await {
                        return Some(failure);
                    }
                }
                Some(Notice::success("Conversation deleted"))
            }
            AppMsg::RenameConversation(id, title) => {
                match self.conversations.rename(id, &title).await {
                    Ok(_) => Some(Notice::success("Conversation renamed")),
                    Err(StoreError::EmptyTitle) => {
                        Some(Notice::failure("Conversation title cannot be empty"))
                    }
                    Err(_) => Some(Notice::failure("Failed to rename conversation")),
                }
            }
            AppMsg::SendMessage(content) => self.send_message(&content).await,
            AppMsg::Refresh => {
                if self.conversations.list().await.is_err() {
                    return Some(Notice::failure("Failed to load conversations"));
                }
                if self.messages.refresh().await.is_err() {
                    return Some(Notice::failure("Failed to load messages"));
                }
                None
            }
        }
    }

    async fn select(&mut self, id: Option<i64>) -> Option<Notice> {
        self.active_conversation = id;
        match self.messages.select(id).await {
            Ok(()) => None,
            Err(_) => Some(Notice::failure("Failed to load messages")),
        }
    }

    async fn send_message(&mut self, content: &str) -> Option<Notice> {
        if content.trim().is_empty() {
            return None;
        }

        if self.active_conversation.is_none() {
            match self.conversations.create(DEFAULT_TITLE).await {
                Ok(conv) => {
                    if let Some(notice) = self.select(Some(conv.id)).await {
                        return Some(notice);
                    }
                }
                Err(_) => return Some(Notice::failure("Failed to send message")),
            }
        }

        let was_empty = self.messages.messages().is_empty();
        let sent = match self.messages.send(content).await {
            Ok(sent) => sent,
            Err(_) => return Some(Notice::failure("Failed to send message")),
        };

        // First exchange in this conversation: name it after the opening line.
        if let (true, Some((user, _))) = (was_empty, sent) {
            let title = title_from_first_message(content);
            if let Err(e) = self.conversations.rename(user.conversation_id, &title).await {
                tracing::warn!("Auto-title failed: {}", e);
                return Some(Notice::failure("Failed to rename conversation"));
            }
        }
        None
    }
}
