//! Ports implemented by the infrastructure and presentation layers

pub mod auth_api;
pub mod navigator;
pub mod notifier;

pub use auth_api::AuthApi;
pub use navigator::Navigator;
pub use notifier::{Notifier, UnauthorizedHandler};
