//! Realtime channel over a pluggable transport

pub mod channel;
pub mod connector;

pub use channel::{RealtimeChannel, RealtimeError, RealtimeHandle};
pub use connector::{Connector, Link, WsConnector};
