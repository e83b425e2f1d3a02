use async_trait::async_trait;

use super::types::ProviderError;
use crate::models::Message;

/// Produces the assistant's side of a turn.
///
/// `history` is the conversation so far, ending with the user message that
/// is being answered.
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, history: &[Message]) -> Result<String, ProviderError>;
}
