//! Configuration management
//!
//! Sources are layered: code defaults, `config/default`, `config/{APP_ENV}`,
//! then `HELPDESK__*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECONDS, DEFAULT_NOTIFICATION_MS};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ApiSettings,
    pub realtime: RealtimeSettings,
    #[serde(default)]
    pub features: HashMap<String, bool>,
    pub i18n: LocaleSettings,
    pub notifications: NotificationSettings,
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RealtimeSettings {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocaleSettings {
    pub supported_locales: Vec<String>,
    pub default_locale: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationSettings {
    pub duration_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingSettings {
    /// Directory for the rolling log file. Stdout only when unset.
    pub directory: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        Self::load_from("config", &env)
    }

    pub fn load_from(config_dir: &str, env: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("app.env", env)?
            .set_default("app.name", "helpdesk-console")?
            .set_default("api.base_url", "http://localhost:3000/api")?
            .set_default("api.timeout_seconds", DEFAULT_HTTP_TIMEOUT_SECONDS)?
            .set_default("realtime.url", "ws://localhost:3000/realtime")?
            .set_default("features.chat", true)?
            .set_default("features.knowledge_base", true)?
            .set_default("features.analytics", true)?
            .set_default("i18n.supported_locales", vec!["en", "es", "fr"])?
            .set_default("i18n.default_locale", "en")?
            .set_default("notifications.duration_ms", DEFAULT_NOTIFICATION_MS)?
            .set_default("storage.path", ".helpdesk/session.json")?
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", config_dir, env)).required(false))
            .add_source(
                Environment::with_prefix("HELPDESK")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("i18n.supported_locales")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        debug!(config_dir, env, api = %loaded.api.base_url, "Configuration loaded");
        Ok(loaded)
    }

    /// Unknown flags are disabled.
    pub fn is_feature_enabled(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }

    pub fn is_locale_supported(&self, locale: &str) -> bool {
        self.i18n.supported_locales.iter().any(|l| l.eq_ignore_ascii_case(locale))
    }

    /// The requested locale when supported, otherwise the default locale.
    pub fn resolve_locale<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(locale) if self.is_locale_supported(locale) => locale,
            Some(locale) => {
                debug!("Locale {} is not supported, using {}", locale, self.i18n.default_locale);
                &self.i18n.default_locale
            }
            None => &self.i18n.default_locale,
        }
    }
}
