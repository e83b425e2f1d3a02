use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub title: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Order conversations most recently updated first.
///
/// The sort is stable, so conversations sharing an `updated_at` keep the
/// order the remote store returned them in.
pub fn sort_by_recency(conversations: &mut [Conversation]) {
    conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}
