pub mod conversation;
pub mod message;
pub mod timestamp;

pub use conversation::Conversation;
pub use message::{Message, Role};
