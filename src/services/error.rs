use thiserror::Error;

use crate::providers::ProviderError;
use crate::remote::RemoteError;

/// Failure of a store operation. The store's local state is left as it was
/// before the call (apart from its `error` field).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to fetch: {0}")]
    Fetch(#[source] RemoteError),

    #[error("Failed to create: {0}")]
    Create(#[source] RemoteError),

    #[error("Failed to update: {0}")]
    Update(#[source] RemoteError),

    #[error("Failed to delete: {0}")]
    Delete(#[source] RemoteError),

    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Failed to generate a reply: {0}")]
    Reply(#[source] ProviderError),
}
