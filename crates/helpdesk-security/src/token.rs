//! Access token payload decoding
//!
//! The client never verifies signatures; it only reads the `exp` claim to
//! decide whether a stored token is still worth sending. Any decode failure
//! is treated as an expired token.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token is not a three-part JWT")]
    Malformed,
    #[error("Token payload is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("Token claims are invalid: {0}")]
    Claims(#[from] serde_json::Error),
}

/// Claims read from the access token. Only `exp` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPayload {
    #[serde(deserialize_with = "timestamp")]
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<serde_json::Value>,
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    #[serde(default)]
    pub role: Option<serde_json::Value>,
}

impl TokenPayload {
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
            _ => return Err(TokenError::Malformed),
        };

        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

/// True unless the token decodes and its expiry is strictly in the future.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now().timestamp())
}

pub fn is_expired_at(token: &str, now: i64) -> bool {
    match TokenPayload::decode(token) {
        Ok(payload) => payload.is_expired_at(now),
        Err(e) => {
            tracing::debug!("Treating undecodable token as expired: {}", e);
            true
        }
    }
}

// Some issuers emit `exp` as a float.
fn timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    number
        .as_i64()
        .or_else(|| number.as_f64().map(|f| f.floor() as i64))
        .ok_or_else(|| serde::de::Error::custom("exp is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn mint(claims: serde_json::Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret")).unwrap()
    }

    #[test]
    fn test_future_exp_is_valid() {
        let token = mint(json!({ "sub": 1, "exp": Utc::now().timestamp() + 3600 }));
        assert!(!is_expired(&token));
    }

    #[test]
    fn test_non_string_role_claim_is_accepted() {
        let token = mint(json!({ "sub": 1, "role": ["agent"], "exp": Utc::now().timestamp() + 3600 }));
        let claims = TokenPayload::decode(&token).unwrap();
        assert_eq!(claims.role, Some(json!(["agent"])));
        assert!(!is_expired(&token));
    }

    #[test]
    fn test_past_exp_is_expired() {
        let token = mint(json!({ "sub": "1", "exp": Utc::now().timestamp() - 1 }));
        assert!(is_expired(&token));
    }

    #[test]
    fn test_exp_equal_to_now_is_expired() {
        let token = mint(json!({ "exp": 1_700_000_000 }));
        assert!(is_expired_at(&token, 1_700_000_000));
        assert!(!is_expired_at(&token, 1_699_999_999));
    }

    #[test]
    fn test_missing_exp_is_expired() {
        let token = mint(json!({ "sub": "1", "role": "agent" }));
        assert!(matches!(TokenPayload::decode(&token), Err(TokenError::Claims(_))));
        assert!(is_expired(&token));
    }

    #[test]
    fn test_garbage_is_expired() {
        for token in ["", "a", "a.b", "a.!!!.c", "a.b.c.d", "header..sig"] {
            assert!(is_expired(token), "expected {:?} to be treated as expired", token);
        }
    }

    #[test]
    fn test_float_exp_and_padding() {
        let payload = URL_SAFE_NO_PAD.encode(br#"{"exp": 4102444800.5}"#);
        let token = format!("eyJhbGciOiJIUzI1NiJ9.{}==.sig", payload);
        let claims = TokenPayload::decode(&token).unwrap();
        assert_eq!(claims.exp, 4_102_444_800);
    }
}
