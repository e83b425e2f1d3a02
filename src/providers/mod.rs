pub mod canned;
pub mod local;
pub mod traits;
pub mod types;

pub use canned::CannedReplyProvider;
pub use local::LocalProvider;
pub use traits::ReplyProvider;
pub use types::ProviderError;
