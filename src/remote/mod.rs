pub mod http;
#[cfg(test)]
pub mod testing;
pub mod traits;
pub mod types;

pub use http::HttpRemoteStore;
pub use traits::RemoteStore;
pub use types::{NewMessage, RemoteError};
