//! Canned replies standing in for a generation backend.

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;

use super::traits::ReplyProvider;
use super::types::ProviderError;
use crate::models::{Message, Role};

const GREETING_REPLY: &str = "Hello! I'm here to help. How can I assist you today?";

const TEMPLATES: [&str; 5] = [
    "I'm a demo chat assistant! I can help you with various tasks. What would you like to know?",
    "That's an interesting question! Let me help you with that.",
    "I understand what you're asking. Here's my response based on the information provided.",
    "Great question! I'd be happy to help you explore this topic further.",
    "I appreciate your curiosity! Let me break this down for you.",
];

fn is_greeting(input: &str) -> bool {
    input
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word.eq_ignore_ascii_case("hello") || word.eq_ignore_ascii_case("hi"))
}

/// Map user input to a canned reply. Greetings get a fixed answer; anything
/// else gets a random template followed by an echo of the input.
pub fn canned_reply<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    if is_greeting(input) {
        return GREETING_REPLY.to_string();
    }

    let template = TEMPLATES.choose(rng).copied().unwrap_or(TEMPLATES[0]);
    format!(
        "{template}\n\nYou asked: \"{input}\"\n\nThis is a demo response. \
         Configure a generation backend to get real answers."
    )
}

/// Waits a fixed delay, then answers the latest user message with
/// [`canned_reply`].
pub struct CannedReplyProvider {
    delay: Duration,
}

impl CannedReplyProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ReplyProvider for CannedReplyProvider {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn generate(&self, history: &[Message]) -> Result<String, ProviderError> {
        tokio::time::sleep(self.delay).await;

        let input = history
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        Ok(canned_reply(input, &mut rand::thread_rng()))
    }
}
