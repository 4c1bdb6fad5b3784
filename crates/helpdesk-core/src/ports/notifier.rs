//! Side channels used by the HTTP error normalizer

use crate::domain::Notification;

#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Receives 401 responses. The session context is the only implementor in
/// the application; it tears the session down.
#[cfg_attr(test, mockall::automock)]
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self);
}
