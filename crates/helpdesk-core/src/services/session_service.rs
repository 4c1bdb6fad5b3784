// ============================================================================
// Helpdesk Core - Session Service
// File: crates/helpdesk-core/src/services/session_service.rs
// ============================================================================
//! Session lifecycle: login, register, refresh, logout
//!
//! [`SessionContext`] owns the current user and the stored tokens. It is
//! built once at startup and shared as `Arc` with every consumer.
//! [`SessionManager`] adds the backend calls on top of it.
//!
//! Every session-mutating call takes a ticket from a monotonic counter. A
//! completion is applied only if its ticket is newer than the last applied
//! one, so a slow login or refresh can never overwrite a newer session or
//! resurrect one that was logged out in the meantime.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use validator::Validate;

use helpdesk_security::{token, SessionStorage, StoredSession};
use helpdesk_shared::constants::LOGIN_ROUTE;
use helpdesk_shared::utils::mask_email;
use helpdesk_shared::UserRecord;

use crate::domain::{AuthResponse, Credentials, RegisterData};
use crate::error::SessionError;
use crate::ports::{AuthApi, Navigator, UnauthorizedHandler};

/// Ordering ticket for a session-mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AttemptTicket(u64);

pub struct SessionContext {
    storage: SessionStorage,
    navigator: Arc<dyn Navigator>,
    current_user: watch::Sender<Option<UserRecord>>,
    issued: AtomicU64,
    applied: Mutex<u64>,
}

impl SessionContext {
    /// Builds the context and restores a previously stored session.
    pub fn new(storage: SessionStorage, navigator: Arc<dyn Navigator>) -> Self {
        let restored = match storage.load() {
            Ok(Some(session)) => {
                info!("Restored session for user {}", session.user.id);
                Some(session.user)
            }
            Ok(None) => None,
            Err(e) => {
                error!("Failed to read stored session: {}", e);
                None
            }
        };

        let (current_user, _) = watch::channel(restored);
        Self {
            storage,
            navigator,
            current_user,
            issued: AtomicU64::new(0),
            applied: Mutex::new(0),
        }
    }

    pub fn begin(&self) -> AttemptTicket {
        AttemptTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Persists and publishes a completed auth response, unless a newer
    /// session change has already been applied.
    pub fn commit(&self, ticket: AttemptTicket, response: AuthResponse) -> Result<UserRecord, SessionError> {
        let mut applied = self.applied.lock();
        if ticket.0 <= *applied {
            warn!(
                "Discarding stale session completion (ticket {}, applied {})",
                ticket.0, *applied
            );
            return Err(SessionError::Superseded);
        }

        let session = StoredSession {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            user: response.user,
        };

        if let Err(e) = self.storage.save(&session) {
            error!("Failed to persist session: {}", e);
            if let Err(e) = self.storage.clear() {
                error!("Failed to clear partial session: {}", e);
            }
            // Storage no longer holds a session, so neither does the snapshot.
            *applied = ticket.0;
            self.current_user.send_replace(None);
            return Err(e.into());
        }

        *applied = ticket.0;
        self.current_user.send_replace(Some(session.user.clone()));
        debug!("Session ticket {} applied for user {}", ticket.0, session.user.id);
        Ok(session.user)
    }

    /// Discards every in-flight session change without touching the
    /// current session.
    pub fn cancel_pending(&self) {
        let ticket = self.begin();
        *self.applied.lock() = ticket.0;
    }

    /// Clears the stored session, publishes `None` and navigates to login.
    /// Local and unconditional.
    pub fn logout(&self) {
        {
            let ticket = self.begin();
            let mut applied = self.applied.lock();
            *applied = ticket.0;

            if let Err(e) = self.storage.clear() {
                error!("Failed to clear stored session on logout: {}", e);
            }
            self.current_user.send_replace(None);
        }

        info!("Session cleared");
        self.navigator.navigate(LOGIN_ROUTE);
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        self.current_user.borrow().clone()
    }

    /// Emits on every login, register, refresh and logout.
    pub fn subscribe(&self) -> watch::Receiver<Option<UserRecord>> {
        self.current_user.subscribe()
    }

    /// True iff an access token is stored and its `exp` is in the future.
    pub fn is_authenticated(&self) -> bool {
        match self.access_token() {
            Some(token) => !token::is_expired(&token),
            None => false,
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.storage.access_token().unwrap_or_else(|e| {
            error!("Failed to read access token: {}", e);
            None
        })
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.storage.refresh_token().unwrap_or_else(|e| {
            error!("Failed to read refresh token: {}", e);
            None
        })
    }
}

impl UnauthorizedHandler for SessionContext {
    fn on_unauthorized(&self) {
        warn!("Received 401, ending session");
        self.logout();
    }
}

/// Session operations backed by the auth API.
pub struct SessionManager<A: AuthApi> {
    context: Arc<SessionContext>,
    api: Arc<A>,
}

impl<A: AuthApi> SessionManager<A> {
    pub fn new(context: Arc<SessionContext>, api: Arc<A>) -> Self {
        Self { context, api }
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    /// Login with email and password
    pub async fn login(&self, credentials: Credentials) -> Result<UserRecord, SessionError> {
        credentials.validate()?;
        info!("Login attempt for {}", mask_email(&credentials.email));

        let ticket = self.context.begin();
        let response = self.api.login(&credentials).await.map_err(|e| {
            warn!("Login failed for {}: {}", mask_email(&credentials.email), e);
            e
        })?;

        let user = self.context.commit(ticket, response)?;
        info!("Login successful for user {}", user.id);
        Ok(user)
    }

    /// Register a new account and sign in with it
    pub async fn register(&self, data: RegisterData) -> Result<UserRecord, SessionError> {
        data.validate()?;
        info!("Registration attempt for {}", mask_email(&data.email));

        let ticket = self.context.begin();
        let response = self.api.register(&data).await.map_err(|e| {
            warn!("Registration failed for {}: {}", mask_email(&data.email), e);
            e
        })?;

        let user = self.context.commit(ticket, response)?;
        info!("Registration successful for user {}", user.id);
        Ok(user)
    }

    /// Exchange the stored refresh token for a new token pair
    pub async fn refresh(&self) -> Result<UserRecord, SessionError> {
        let refresh_token = self
            .context
            .refresh_token()
            .ok_or(SessionError::MissingRefreshToken)?;

        let ticket = self.context.begin();
        let response = self.api.refresh(&refresh_token).await.map_err(|e| {
            warn!("Token refresh failed: {}", e);
            e
        })?;

        let user = self.context.commit(ticket, response)?;
        debug!("Tokens refreshed for user {}", user.id);
        Ok(user)
    }

    pub fn logout(&self) {
        self.context.logout();
    }

    pub fn cancel_pending(&self) {
        self.context.cancel_pending();
    }

    pub fn is_authenticated(&self) -> bool {
        self.context.is_authenticated()
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        self.context.current_user()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<UserRecord>> {
        self.context.subscribe()
    }
}
