// ============================================================================
// Helpdesk Infrastructure - REST Client
// File: crates/helpdesk-infrastructure/src/http/client.rs
// ============================================================================
//! Generic verb methods against the configured API base URL.
//!
//! Every request carries the stored access token when one exists, and every
//! failure goes through the [`ErrorNormalizer`] before it is returned.

use reqwest::{header::ACCEPT_LANGUAGE, multipart, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use helpdesk_core::{ApiError, ErrorNormalizer, RequestFailure, SessionContext};
use helpdesk_shared::config::ApiSettings;
use helpdesk_shared::utils::join_url;

pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<SessionContext>,
    normalizer: ErrorNormalizer,
    locale: Option<String>,
}

impl ApiClient {
    pub fn new(
        settings: &ApiSettings,
        session: Arc<SessionContext>,
        normalizer: ErrorNormalizer,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| ApiError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            session,
            normalizer,
            locale: None,
        })
    }

    /// Sent as `Accept-Language` on every request.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, path, |req| req).await?;
        Self::decode(response).await
    }

    pub async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::GET, path, |req| req.query(query)).await?;
        Self::decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::POST, path, |req| req.json(body)).await?;
        Self::decode(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::PUT, path, |req| req.json(body)).await?;
        Self::decode(response).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::PATCH, path, |req| req.json(body)).await?;
        Self::decode(response).await
    }

    /// The response body, if any, is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, |req| req).await?;
        Ok(())
    }

    /// Sends `bytes` as the multipart field `file`.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<T, ApiError> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        let response = self.execute(Method::POST, path, |req| req.multipart(form)).await?;
        Self::decode(response).await
    }

    /// Raw response body.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.execute(Method::GET, path, |req| req).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn execute<F>(&self, method: Method, path: &str, build: F) -> Result<Response, ApiError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = join_url(&self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = self.session.access_token() {
            request = request.bearer_auth(token);
        }
        if let Some(locale) = &self.locale {
            request = request.header(ACCEPT_LANGUAGE, locale.as_str());
        }

        debug!("{} {}", method, url);
        let response = match build(request).send().await {
            Ok(response) => response,
            Err(e) => {
                return Err(self.normalizer.handle(
                    method.as_str(),
                    &url,
                    RequestFailure::Transport(e.to_string()),
                ))
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are not always JSON.
        let body = response.json::<serde_json::Value>().await.ok();
        Err(self.normalizer.handle(
            method.as_str(),
            &url,
            RequestFailure::Status {
                status: status.as_u16(),
                body,
            },
        ))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
