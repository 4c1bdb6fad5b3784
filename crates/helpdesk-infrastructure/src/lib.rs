//! # Helpdesk Infrastructure
//! 
//! Adapters for the core ports: the REST client, the realtime channel and
//! the toast notifier.

pub mod http;
pub mod realtime;
pub mod notifications;

pub use http::{AnalyticsApi, ApiClient, HttpAuthApi, TicketsApi};
pub use notifications::ToastNotifier;
pub use realtime::{Connector, RealtimeChannel, RealtimeError, RealtimeHandle, WsConnector};
