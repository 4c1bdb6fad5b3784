//! Navigation port

/// Moves the UI to another route. Must not block.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}
