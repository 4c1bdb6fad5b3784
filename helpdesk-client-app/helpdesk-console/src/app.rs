//! Wiring for the console: one session, one API client, one realtime channel.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

use helpdesk_core::{
    AuthGuard, ErrorNormalizer, NavigationHistory, RoleGuard, RouteGuard, RouteTable,
    SessionContext, SessionManager,
};
use helpdesk_infrastructure::{
    AnalyticsApi, ApiClient, HttpAuthApi, RealtimeChannel, TicketsApi, ToastNotifier, WsConnector,
};
use helpdesk_security::{FileTokenStore, SessionStorage, TokenStore};
use helpdesk_shared::config::AppConfig;
use helpdesk_shared::Role;

const TOAST_CAPACITY: usize = 64;

pub struct App {
    pub config: AppConfig,
    pub context: Arc<SessionContext>,
    pub session: SessionManager<HttpAuthApi>,
    pub tickets: TicketsApi,
    pub analytics: AnalyticsApi,
    pub realtime: RealtimeChannel,
    pub routes: RouteTable,
    pub history: Arc<NavigationHistory>,
    pub toasts: Arc<ToastNotifier>,
}

impl App {
    pub fn build(config: AppConfig, locale: Option<&str>) -> anyhow::Result<Self> {
        let store = FileTokenStore::open(&config.storage.path)
            .with_context(|| format!("Failed to open session store at {}", config.storage.path))?;
        Self::with_store(config, Arc::new(store), locale)
    }

    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn TokenStore>,
        locale: Option<&str>,
    ) -> anyhow::Result<Self> {
        let history = Arc::new(NavigationHistory::new("/"));
        let toasts = Arc::new(ToastNotifier::new(TOAST_CAPACITY));

        let context = Arc::new(SessionContext::new(SessionStorage::new(store), history.clone()));

        let normalizer = ErrorNormalizer::new(
            toasts.clone(),
            history.clone(),
            context.clone(),
            Duration::from_millis(config.notifications.duration_ms),
        );
        let locale = config.resolve_locale(locale).to_string();
        let client = Arc::new(ApiClient::new(&config.api, context.clone(), normalizer)?.with_locale(locale));

        let session = SessionManager::new(context.clone(), Arc::new(HttpAuthApi::new(client.clone())));
        let realtime = RealtimeChannel::new(
            config.realtime.url.clone(),
            context.clone(),
            Arc::new(WsConnector),
        );
        let routes = route_table(context.clone(), history.clone());

        Ok(Self {
            tickets: TicketsApi::new(client.clone()),
            analytics: AnalyticsApi::new(client),
            config,
            context,
            session,
            realtime,
            routes,
            history,
            toasts,
        })
    }
}

/// Portal routes: `/portal` for any signed-in user, `/agent` for agents and
/// admins, `/admin` for admins.
pub fn route_table(context: Arc<SessionContext>, history: Arc<NavigationHistory>) -> RouteTable {
    let signed_in: Arc<dyn RouteGuard> = Arc::new(AuthGuard);

    RouteTable::new(context, history)
        .route("/portal", vec![signed_in.clone()])
        .route(
            "/agent",
            vec![signed_in.clone(), Arc::new(RoleGuard::new([Role::Agent, Role::Admin]))],
        )
        .route("/admin", vec![signed_in, Arc::new(RoleGuard::new([Role::Admin]))])
}
