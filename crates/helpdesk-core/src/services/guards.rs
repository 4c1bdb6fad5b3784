// ============================================================================
// Helpdesk Core - Route Guards
// File: crates/helpdesk-core/src/services/guards.rs
// ============================================================================
//! Navigation guards and the route table that applies them.
//!
//! Guards only read the in-memory session snapshot. They never touch the
//! network.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use helpdesk_shared::constants::{LOGIN_ROUTE, UNAUTHORIZED_ROUTE};
use helpdesk_shared::{Role, UserRecord};

use crate::ports::Navigator;
use crate::services::session_service::SessionContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

pub trait RouteGuard: Send + Sync {
    fn evaluate(&self, user: Option<&UserRecord>) -> GuardDecision;
}

/// Runs one guard against the current session. A denial navigates to the
/// guard's redirect target exactly once.
pub fn can_activate(guard: &dyn RouteGuard, session: &SessionContext, navigator: &dyn Navigator) -> bool {
    let user = session.current_user();
    match guard.evaluate(user.as_ref()) {
        GuardDecision::Allow => true,
        GuardDecision::Redirect(target) => {
            navigator.navigate(target);
            false
        }
    }
}

/// Permits any signed-in user.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGuard;

impl RouteGuard for AuthGuard {
    fn evaluate(&self, user: Option<&UserRecord>) -> GuardDecision {
        match user {
            Some(_) => GuardDecision::Allow,
            None => GuardDecision::Redirect(LOGIN_ROUTE),
        }
    }
}

/// Permits users whose role is in the allowed set.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    allowed: HashSet<Role>,
}

impl RoleGuard {
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl RouteGuard for RoleGuard {
    fn evaluate(&self, user: Option<&UserRecord>) -> GuardDecision {
        match user {
            None => GuardDecision::Redirect(UNAUTHORIZED_ROUTE),
            Some(user) if !self.allowed.contains(&user.role) => {
                warn!("Role {} denied for user {}", user.role, user.id);
                GuardDecision::Redirect(UNAUTHORIZED_ROUTE)
            }
            Some(_) => GuardDecision::Allow,
        }
    }
}

struct RouteEntry {
    prefix: String,
    guards: Vec<Arc<dyn RouteGuard>>,
}

/// Maps route prefixes to guards. The longest matching prefix wins; routes
/// without an entry are public.
pub struct RouteTable {
    session: Arc<SessionContext>,
    navigator: Arc<dyn Navigator>,
    routes: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new(session: Arc<SessionContext>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            session,
            navigator,
            routes: Vec::new(),
        }
    }

    pub fn route(mut self, prefix: &str, guards: Vec<Arc<dyn RouteGuard>>) -> Self {
        self.routes.push(RouteEntry {
            prefix: prefix.trim_end_matches('/').to_string(),
            guards,
        });
        self
    }

    fn entry_for(&self, path: &str) -> Option<&RouteEntry> {
        self.routes
            .iter()
            .filter(|entry| {
                path == entry.prefix
                    || path
                        .strip_prefix(entry.prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .max_by_key(|entry| entry.prefix.len())
    }

    /// Evaluates the guards for `path` in order. The first denial redirects;
    /// if all pass, navigates to `path`.
    pub fn navigate(&self, path: &str) -> bool {
        let user = self.session.current_user();

        if let Some(entry) = self.entry_for(path) {
            for guard in &entry.guards {
                if let GuardDecision::Redirect(target) = guard.evaluate(user.as_ref()) {
                    debug!("Navigation to {} redirected to {}", path, target);
                    self.navigator.navigate(target);
                    return false;
                }
            }
        }

        self.navigator.navigate(path);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AuthResponse;
    use crate::ports::navigator::MockNavigator;
    use helpdesk_security::{MemoryTokenStore, SessionStorage};

    fn user(role: Role) -> UserRecord {
        UserRecord {
            id: 1,
            email: "someone@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role,
            avatar_url: None,
        }
    }

    fn session_with(role: Option<Role>) -> Arc<SessionContext> {
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().return_const(());
        let context = SessionContext::new(
            SessionStorage::new(Arc::new(MemoryTokenStore::new())),
            Arc::new(navigator),
        );
        if let Some(role) = role {
            context
                .commit(
                    context.begin(),
                    AuthResponse {
                        access_token: "a".to_string(),
                        refresh_token: "b".to_string(),
                        user: user(role),
                    },
                )
                .unwrap();
        }
        Arc::new(context)
    }

    fn expect_redirect(target: &'static str, times: usize) -> MockNavigator {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .withf(move |route| route == target)
            .times(times)
            .return_const(());
        navigator
    }

    #[test]
    fn test_auth_guard() {
        assert_eq!(AuthGuard.evaluate(Some(&user(Role::Customer))), GuardDecision::Allow);
        assert_eq!(AuthGuard.evaluate(None), GuardDecision::Redirect(LOGIN_ROUTE));
    }

    #[test]
    fn test_auth_guard_redirects_to_login() {
        let session = session_with(None);
        let navigator = expect_redirect(LOGIN_ROUTE, 1);
        assert!(!can_activate(&AuthGuard, &session, &navigator));
    }

    #[test]
    fn test_role_guard_denies_agent_for_admin_route() {
        let session = session_with(Some(Role::Agent));
        let navigator = expect_redirect(UNAUTHORIZED_ROUTE, 1);
        let guard = RoleGuard::new([Role::Admin]);
        assert!(!can_activate(&guard, &session, &navigator));
    }

    #[test]
    fn test_role_guard_without_user_redirects_to_unauthorized() {
        let session = session_with(None);
        let navigator = expect_redirect(UNAUTHORIZED_ROUTE, 1);
        assert!(!can_activate(&RoleGuard::new([Role::Admin]), &session, &navigator));
    }

    #[test]
    fn test_role_guard_allows_member_role() {
        let session = session_with(Some(Role::Agent));
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().times(0);
        let guard = RoleGuard::new([Role::Agent, Role::Admin]);
        assert!(can_activate(&guard, &session, &navigator));
    }

    #[test]
    fn test_route_table_resolution() {
        let session = session_with(Some(Role::Customer));
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .withf(|route| route == "/portal/tickets")
            .times(1)
            .return_const(());
        navigator
            .expect_navigate()
            .withf(|route| route == UNAUTHORIZED_ROUTE)
            .times(1)
            .return_const(());

        let table = RouteTable::new(session, Arc::new(navigator))
            .route("/portal", vec![Arc::new(AuthGuard) as Arc<dyn RouteGuard>])
            .route(
                "/agent",
                vec![
                    Arc::new(AuthGuard) as Arc<dyn RouteGuard>,
                    Arc::new(RoleGuard::new([Role::Agent, Role::Admin])),
                ],
            );

        assert!(table.navigate("/portal/tickets"));
        assert!(!table.navigate("/agent/queue"));
    }

    #[test]
    fn test_route_prefix_matches_whole_segments() {
        let session = session_with(None);
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .withf(|route| route == "/agentless")
            .times(1)
            .return_const(());

        let table = RouteTable::new(session, Arc::new(navigator))
            .route("/agent", vec![Arc::new(AuthGuard) as Arc<dyn RouteGuard>]);
        assert!(table.navigate("/agentless"));
    }
}
