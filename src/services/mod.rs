pub mod conversation;
pub mod conversation_store;
pub mod error;
pub mod message_store;

pub use conversation_store::{ConversationState, ConversationStore};
pub use error::StoreError;
pub use message_store::{MessageState, MessageStore};
