// ============================================================================
// Helpdesk Core - HTTP Error Normalizer
// File: crates/helpdesk-core/src/services/error_normalizer.rs
// ============================================================================
//! Turns failed backend calls into [`ApiError`]s with a user-facing message.
//!
//! This is the single owner of 401 handling: a 401 tears the session down
//! through [`UnauthorizedHandler`] and is never shown as a notification.
//! Every other failure produces exactly one transient notification. A 403
//! also navigates to the unauthorized route. The error is always returned
//! to the caller.

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

use helpdesk_shared::constants::UNAUTHORIZED_ROUTE;

use crate::domain::Notification;
use crate::error::{ApiError, HttpErrorKind};
use crate::ports::{Navigator, Notifier, UnauthorizedHandler};

/// A backend call that did not succeed.
#[derive(Debug, Clone)]
pub enum RequestFailure {
    /// No response was received (connect error, timeout, aborted).
    Transport(String),
    /// The server answered with a non-success status.
    Status {
        status: u16,
        body: Option<serde_json::Value>,
    },
}

/// Maps a failure to its error without any side effects.
pub fn normalize(failure: &RequestFailure) -> ApiError {
    match failure {
        RequestFailure::Transport(_) => ApiError::Http {
            kind: HttpErrorKind::Network,
            status: None,
            message: HttpErrorKind::Network.default_message().to_string(),
        },
        RequestFailure::Status { status: 401, .. } => ApiError::Unauthorized,
        RequestFailure::Status { status, body } => {
            let kind = HttpErrorKind::from_status(*status);
            let message = body
                .as_ref()
                .filter(|_| kind.prefers_server_message())
                .and_then(server_message)
                .unwrap_or_else(|| kind.default_message().to_string());
            ApiError::Http {
                kind,
                status: Some(*status),
                message,
            }
        }
    }
}

// `message` may be a string or, for field validation errors, a list of strings.
fn server_message(body: &serde_json::Value) -> Option<String> {
    match body.get("message")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}

pub struct ErrorNormalizer {
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    unauthorized: Arc<dyn UnauthorizedHandler>,
    notification_duration: Duration,
}

impl ErrorNormalizer {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        unauthorized: Arc<dyn UnauthorizedHandler>,
        notification_duration: Duration,
    ) -> Self {
        Self {
            notifier,
            navigator,
            unauthorized,
            notification_duration,
        }
    }

    /// Classifies the failure, runs its side effects and returns the error
    /// for the caller to propagate.
    pub fn handle(&self, method: &str, url: &str, failure: RequestFailure) -> ApiError {
        let err = normalize(&failure);

        match &err {
            ApiError::Unauthorized => {
                warn!(method, url, "Request rejected with 401");
                self.unauthorized.on_unauthorized();
            }
            ApiError::Http { kind, status, message } => {
                match &failure {
                    RequestFailure::Transport(cause) => {
                        error!(method, url, cause = %cause, "Request failed without a response")
                    }
                    RequestFailure::Status { .. } if *kind == HttpErrorKind::Server
                        || *kind == HttpErrorKind::Unavailable =>
                    {
                        error!(method, url, status = ?status, "Server error: {}", message)
                    }
                    RequestFailure::Status { .. } => {
                        warn!(method, url, status = ?status, "Request failed: {}", message)
                    }
                }

                self.notifier
                    .notify(Notification::error(message.clone(), self.notification_duration));

                if *kind == HttpErrorKind::Forbidden {
                    self.navigator.navigate(UNAUTHORIZED_ROUTE);
                }
            }
            ApiError::Decode(_) | ApiError::Request(_) => {}
        }

        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::navigator::MockNavigator;
    use crate::ports::notifier::{MockNotifier, MockUnauthorizedHandler};
    use serde_json::json;

    fn status(status: u16, body: Option<serde_json::Value>) -> RequestFailure {
        RequestFailure::Status { status, body }
    }

    fn message_of(err: ApiError) -> String {
        match err {
            ApiError::Http { message, .. } => message,
            other => panic!("expected an HTTP error, got {:?}", other),
        }
    }

    fn normalizer(
        notifier: MockNotifier,
        navigator: MockNavigator,
        unauthorized: MockUnauthorizedHandler,
    ) -> ErrorNormalizer {
        ErrorNormalizer::new(
            Arc::new(notifier),
            Arc::new(navigator),
            Arc::new(unauthorized),
            Duration::from_millis(5000),
        )
    }

    #[test]
    fn test_not_found_uses_server_message() {
        let err = normalize(&status(404, Some(json!({ "message": "Ticket not found" }))));
        assert_eq!(message_of(err), "Ticket not found");
    }

    #[test]
    fn test_not_found_falls_back_to_generic_text() {
        let err = normalize(&status(404, None));
        assert_eq!(message_of(err), HttpErrorKind::NotFound.default_message());

        let err = normalize(&status(404, Some(json!({ "error": "nope" }))));
        assert_eq!(message_of(err), HttpErrorKind::NotFound.default_message());
    }

    #[test]
    fn test_validation_message_list_is_joined() {
        let body = json!({ "message": ["email must be an email", "password is too short"] });
        let err = normalize(&status(422, Some(body)));
        assert_eq!(message_of(err), "email must be an email; password is too short");
    }

    #[test]
    fn test_server_errors_ignore_body() {
        let err = normalize(&status(500, Some(json!({ "message": "NullPointerException" }))));
        assert_eq!(message_of(err), HttpErrorKind::Server.default_message());

        let err = normalize(&status(503, None));
        assert_eq!(err.kind(), HttpErrorKind::Unavailable);
    }

    #[test]
    fn test_transport_failure_is_network() {
        let err = normalize(&RequestFailure::Transport("connection refused".to_string()));
        assert_eq!(err.kind(), HttpErrorKind::Network);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_unauthorized_logs_out_without_notification() {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(0);
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().times(0);
        let mut unauthorized = MockUnauthorizedHandler::new();
        unauthorized.expect_on_unauthorized().times(1).return_const(());

        let err = normalizer(notifier, navigator, unauthorized).handle(
            "GET",
            "/tickets",
            status(401, Some(json!({ "message": "jwt expired" }))),
        );
        assert_eq!(err, ApiError::Unauthorized);
    }

    #[test]
    fn test_forbidden_notifies_and_redirects() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.message == "Agents only")
            .times(1)
            .return_const(());
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .withf(|route| route == UNAUTHORIZED_ROUTE)
            .times(1)
            .return_const(());
        let mut unauthorized = MockUnauthorizedHandler::new();
        unauthorized.expect_on_unauthorized().times(0);

        let err = normalizer(notifier, navigator, unauthorized).handle(
            "DELETE",
            "/tickets/1",
            status(403, Some(json!({ "message": "Agents only" }))),
        );
        assert_eq!(err.kind(), HttpErrorKind::Forbidden);
    }

    #[test]
    fn test_every_other_failure_notifies_once() {
        let failures = vec![
            RequestFailure::Transport("timeout".to_string()),
            status(400, None),
            status(404, None),
            status(409, None),
            status(422, None),
            status(429, None),
            status(500, None),
            status(502, None),
            status(418, None),
        ];

        for failure in failures {
            let mut notifier = MockNotifier::new();
            notifier.expect_notify().times(1).return_const(());
            let mut navigator = MockNavigator::new();
            navigator.expect_navigate().times(0);
            let mut unauthorized = MockUnauthorizedHandler::new();
            unauthorized.expect_on_unauthorized().times(0);

            let err = normalizer(notifier, navigator, unauthorized).handle("GET", "/x", failure);
            assert_ne!(err, ApiError::Unauthorized);
        }
    }
}
