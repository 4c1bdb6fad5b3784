//! Auth backend port

use async_trait::async_trait;

use crate::domain::{AuthResponse, Credentials, RegisterData};
use crate::error::ApiError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;
    async fn register(&self, data: &RegisterData) -> Result<AuthResponse, ApiError>;
    async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, ApiError>;
}
