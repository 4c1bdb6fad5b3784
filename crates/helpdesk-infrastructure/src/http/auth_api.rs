//! [`AuthApi`] over the REST client.

use async_trait::async_trait;
use std::sync::Arc;

use helpdesk_core::ports::AuthApi;
use helpdesk_core::{ApiError, AuthResponse, Credentials, RefreshRequest, RegisterData};
use helpdesk_shared::constants::{AUTH_LOGIN_PATH, AUTH_REFRESH_PATH, AUTH_REGISTER_PATH};

use super::ApiClient;

pub struct HttpAuthApi {
    client: Arc<ApiClient>,
}

impl HttpAuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.client.post(AUTH_LOGIN_PATH, credentials).await
    }

    async fn register(&self, data: &RegisterData) -> Result<AuthResponse, ApiError> {
        self.client.post(AUTH_REGISTER_PATH, data).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, ApiError> {
        let request = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.client.post(AUTH_REFRESH_PATH, &request).await
    }
}
