//! # Helpdesk Security
//! 
//! Client-side credential handling: token payload decoding, durable token
//! storage, and the stored session record.

pub mod token;
pub mod storage;
pub mod session;

pub use token::{TokenError, TokenPayload};
pub use storage::{FileTokenStore, MemoryTokenStore, StorageError, TokenStore};
pub use session::{SessionStorage, StoredSession};
