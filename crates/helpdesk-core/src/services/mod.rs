//! Client services (session lifecycle, error handling, navigation)

pub mod session_service;
pub mod error_normalizer;
pub mod guards;
pub mod navigation;

pub use session_service::{SessionContext, SessionManager, AttemptTicket};
pub use error_normalizer::{normalize, ErrorNormalizer, RequestFailure};
pub use guards::{can_activate, AuthGuard, GuardDecision, RoleGuard, RouteGuard, RouteTable};
pub use navigation::NavigationHistory;
