//! In-process navigation history

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::ports::Navigator;

/// Records navigations and publishes the current route.
pub struct NavigationHistory {
    current: watch::Sender<String>,
    entries: Mutex<Vec<String>>,
}

impl NavigationHistory {
    pub fn new(initial: &str) -> Self {
        let (current, _) = watch::channel(initial.to_string());
        Self {
            current,
            entries: Mutex::new(vec![initial.to_string()]),
        }
    }

    pub fn current(&self) -> String {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

impl Navigator for NavigationHistory {
    fn navigate(&self, route: &str) {
        debug!("Navigating to {}", route);
        self.entries.lock().push(route.to_string());
        self.current.send_replace(route.to_string());
    }
}
