//! # Helpdesk Core
//! 
//! Session lifecycle, HTTP error normalization, route guards and the ports
//! the infrastructure layer implements.

pub mod domain;
pub mod services;
pub mod ports;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{ApiError, HttpErrorKind, SessionError};
pub use services::{
    AuthGuard, ErrorNormalizer, GuardDecision, NavigationHistory, RequestFailure, RoleGuard,
    RouteGuard, RouteTable, SessionContext, SessionManager,
};
