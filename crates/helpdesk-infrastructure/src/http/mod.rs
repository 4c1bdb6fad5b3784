//! REST adapters

pub mod client;
pub mod auth_api;
pub mod resources;

pub use client::ApiClient;
pub use auth_api::HttpAuthApi;
pub use resources::{AnalyticsApi, TicketsApi};
