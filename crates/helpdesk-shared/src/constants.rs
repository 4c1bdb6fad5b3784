//! Application-wide constants

// Durable storage keys. Versionless, there is no migration path for renames.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const CURRENT_USER_KEY: &str = "current_user";

// Backend auth endpoints
pub const AUTH_LOGIN_PATH: &str = "/auth/login";
pub const AUTH_REGISTER_PATH: &str = "/auth/register";
pub const AUTH_REFRESH_PATH: &str = "/auth/refresh";

// Client routes
pub const LOGIN_ROUTE: &str = "/auth/login";
pub const UNAUTHORIZED_ROUTE: &str = "/unauthorized";
pub const HOME_ROUTE: &str = "/portal/dashboard";

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_NOTIFICATION_MS: u64 = 5000;
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;
pub const MIN_PASSWORD_LENGTH: u64 = 8;
pub const MAX_PASSWORD_LENGTH: u64 = 128;
