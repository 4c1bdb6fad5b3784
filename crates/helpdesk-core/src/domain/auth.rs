// ============================================================================
// Helpdesk Core - Auth DTOs
// File: crates/helpdesk-core/src/domain/auth.rs
// Description: Payloads for the /auth endpoints
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use helpdesk_shared::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use helpdesk_shared::UserRecord;

/// Login payload
#[derive(Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Registration payload
#[derive(Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(
        min = MIN_PASSWORD_LENGTH,
        max = MAX_PASSWORD_LENGTH,
        message = "Password must be between 8 and 128 characters"
    ))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: String,
}

impl fmt::Debug for RegisterData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterData")
            .field("email", &self.email)
            .field("password", &"***")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response of login, register and refresh.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        assert!(Credentials::new(" agent@example.com ", "secret").validate().is_ok());
        assert!(Credentials::new("agent", "secret").validate().is_err());
        assert!(Credentials::new("agent@example.com", "").validate().is_err());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("agent@example.com", "hunter22"));
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_register_data_wire_format() {
        let data = RegisterData {
            email: "new@example.com".to_string(),
            password: "long-enough".to_string(),
            first_name: "New".to_string(),
            last_name: "Customer".to_string(),
        };
        assert!(data.validate().is_ok());

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["firstName"], "New");
        assert_eq!(json["lastName"], "Customer");
    }

    #[test]
    fn test_short_password_rejected() {
        let data = RegisterData {
            email: "new@example.com".to_string(),
            password: "short".to_string(),
            first_name: "New".to_string(),
            last_name: "Customer".to_string(),
        };
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_password_length_bounds() {
        let with_password = |len: u64| RegisterData {
            email: "new@example.com".to_string(),
            password: "x".repeat(len as usize),
            first_name: "New".to_string(),
            last_name: "Customer".to_string(),
        };

        assert!(with_password(MIN_PASSWORD_LENGTH).validate().is_ok());
        assert!(with_password(MAX_PASSWORD_LENGTH).validate().is_ok());
        assert!(with_password(MIN_PASSWORD_LENGTH - 1).validate().is_err());
        assert!(with_password(MAX_PASSWORD_LENGTH + 1).validate().is_err());
    }

    #[test]
    fn test_auth_response_wire_format() {
        let response: AuthResponse = serde_json::from_value(serde_json::json!({
            "accessToken": "a",
            "refreshToken": "b",
            "user": { "id": 1, "email": "c@example.com", "role": "customer" }
        }))
        .unwrap();
        assert_eq!(response.access_token, "a");
        assert_eq!(response.user.id, 1);
    }
}
