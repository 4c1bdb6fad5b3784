//! Client-side error taxonomy

use helpdesk_security::StorageError;
use thiserror::Error;

/// Class of a failed backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpErrorKind {
    /// No response reached the client.
    Network,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Validation,
    RateLimited,
    Server,
    Unavailable,
    Unknown,
}

impl HttpErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            0 => HttpErrorKind::Network,
            400 => HttpErrorKind::BadRequest,
            401 => HttpErrorKind::Unauthorized,
            403 => HttpErrorKind::Forbidden,
            404 => HttpErrorKind::NotFound,
            409 => HttpErrorKind::Conflict,
            422 => HttpErrorKind::Validation,
            429 => HttpErrorKind::RateLimited,
            500 => HttpErrorKind::Server,
            502..=504 => HttpErrorKind::Unavailable,
            _ => HttpErrorKind::Unknown,
        }
    }

    /// Text shown when the response carries no message of its own.
    pub fn default_message(&self) -> &'static str {
        match self {
            HttpErrorKind::Network => {
                "Unable to connect to the server. Please check your internet connection."
            }
            HttpErrorKind::BadRequest => "Invalid request. Please check your input.",
            HttpErrorKind::Unauthorized => "Your session has expired. Please sign in again.",
            HttpErrorKind::Forbidden => "You do not have permission to perform this action.",
            HttpErrorKind::NotFound => "The requested resource was not found.",
            HttpErrorKind::Conflict => {
                "This operation conflicts with the current state of the resource."
            }
            HttpErrorKind::Validation => "Validation failed. Please review the highlighted fields.",
            HttpErrorKind::RateLimited => "Too many requests. Please slow down and try again shortly.",
            HttpErrorKind::Server => "An internal server error occurred. Please try again later.",
            HttpErrorKind::Unavailable => {
                "The service is temporarily unavailable. Please try again later."
            }
            HttpErrorKind::Unknown => "An unexpected error occurred.",
        }
    }

    /// Whether a message from the response body replaces the default text.
    pub fn prefers_server_message(&self) -> bool {
        matches!(
            self,
            HttpErrorKind::BadRequest
                | HttpErrorKind::Forbidden
                | HttpErrorKind::NotFound
                | HttpErrorKind::Conflict
                | HttpErrorKind::Validation
                | HttpErrorKind::Unknown
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 401. Never shown to the user; the session is torn down instead.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{message}")]
    Http {
        kind: HttpErrorKind,
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    Request(String),
}

impl ApiError {
    pub fn kind(&self) -> HttpErrorKind {
        match self {
            ApiError::Unauthorized => HttpErrorKind::Unauthorized,
            ApiError::Http { kind, .. } => *kind,
            ApiError::Decode(_) | ApiError::Request(_) => HttpErrorKind::Unknown,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Http { status, .. } => *status,
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Session change superseded by a newer one")]
    Superseded,

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(HttpErrorKind::from_status(0), HttpErrorKind::Network);
        assert_eq!(HttpErrorKind::from_status(404), HttpErrorKind::NotFound);
        assert_eq!(HttpErrorKind::from_status(422), HttpErrorKind::Validation);
        assert_eq!(HttpErrorKind::from_status(503), HttpErrorKind::Unavailable);
        assert_eq!(HttpErrorKind::from_status(501), HttpErrorKind::Unknown);
        assert_eq!(HttpErrorKind::from_status(418), HttpErrorKind::Unknown);
    }

    #[test]
    fn test_unauthorized_status() {
        assert_eq!(ApiError::Unauthorized.status(), Some(401));
        assert_eq!(ApiError::Unauthorized.kind(), HttpErrorKind::Unauthorized);
    }
}
