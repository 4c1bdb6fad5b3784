//! Stored session record
//!
//! The three storage keys are written and cleared together. A partial set of
//! keys is never returned as a session.

use std::sync::Arc;
use tracing::warn;

use helpdesk_shared::constants::{ACCESS_TOKEN_KEY, CURRENT_USER_KEY, REFRESH_TOKEN_KEY};
use helpdesk_shared::UserRecord;

use crate::storage::{StorageError, TokenStore};

#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserRecord,
}

#[derive(Clone)]
pub struct SessionStorage {
    store: Arc<dyn TokenStore>,
}

impl SessionStorage {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        let user = serde_json::to_string(&session.user)?;
        self.store.set(ACCESS_TOKEN_KEY, &session.access_token)?;
        self.store.set(REFRESH_TOKEN_KEY, &session.refresh_token)?;
        self.store.set(CURRENT_USER_KEY, &user)?;
        Ok(())
    }

    /// Loads the stored session. Keys that do not form a whole session are
    /// cleared and `None` is returned.
    pub fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        let access_token = self.store.get(ACCESS_TOKEN_KEY)?;
        let refresh_token = self.store.get(REFRESH_TOKEN_KEY)?;
        let user = self.store.get(CURRENT_USER_KEY)?;

        match (access_token, refresh_token, user) {
            (None, None, None) => Ok(None),
            (Some(access_token), Some(refresh_token), Some(user)) => {
                match serde_json::from_str::<UserRecord>(&user) {
                    Ok(user) => Ok(Some(StoredSession {
                        access_token,
                        refresh_token,
                        user,
                    })),
                    Err(e) => {
                        warn!("Discarding stored session with unreadable user record: {}", e);
                        self.clear()?;
                        Ok(None)
                    }
                }
            }
            _ => {
                warn!("Discarding partial stored session");
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        self.store.remove(CURRENT_USER_KEY)?;
        Ok(())
    }

    pub fn access_token(&self) -> Result<Option<String>, StorageError> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Result<Option<String>, StorageError> {
        self.store.get(REFRESH_TOKEN_KEY)
    }
}
