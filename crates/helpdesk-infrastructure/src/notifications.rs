//! Toast notifications.
//!
//! Published notifications are fanned out to subscribers and kept in an
//! active list until their duration elapses or they are dismissed.

use parking_lot::Mutex;
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use helpdesk_core::ports::Notifier;
use helpdesk_core::{Notification, Severity};

pub struct ToastNotifier {
    tx: broadcast::Sender<Notification>,
    active: Mutex<Vec<(Notification, Instant)>>,
}

impl ToastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            active: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Notifications that have not expired yet, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut active = self.active.lock();
        active.retain(|(n, shown_at)| now.duration_since(*shown_at) < n.duration);
        active.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut active = self.active.lock();
        let before = active.len();
        active.retain(|(n, _)| n.id != id);
        active.len() != before
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Error | Severity::Warning => warn!("Toast: {}", notification.message),
            Severity::Info | Severity::Success => info!("Toast: {}", notification.message),
        }

        self.active.lock().push((notification.clone(), Instant::now()));
        if self.tx.send(notification).is_err() {
            debug!("Toast published with no subscribers");
        }
    }
}
