use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub disk: DiskSettings,
    pub cache: CacheSettings,
    pub session: SessionSettings,
    pub oauth: OAuthSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
}

/// Yandex.Disk public resources API.
#[derive(Debug, Deserialize, Clone)]
pub struct DiskSettings {
    pub api_base_url: String,
    pub list_limit: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    pub ttl_secs: u64,
    pub capacity: usize,
}

/// Sessions idle longer than `idle_ttl_secs` are dropped; past `capacity`
/// the least recently used one goes.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub idle_ttl_secs: u64,
    pub capacity: usize,
}

/// Client credentials have no defaults: the OAuth routes stay disabled
/// until all three are provided.
#[derive(Debug, Deserialize, Clone)]
pub struct OAuthSettings {
    pub authorize_url: String,
    pub token_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

impl OAuthSettings {
    /// Returns `(client_id, client_secret, redirect_uri)` when every one of
    /// them is set to a non-empty value.
    pub fn credentials(&self) -> Option<(&str, &str, &str)> {
        fn non_empty(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.trim().is_empty())
        }

        Some((
            non_empty(&self.client_id)?,
            non_empty(&self.client_secret)?,
            non_empty(&self.redirect_uri)?,
        ))
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("DISKVIEW"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 8000)?
            .set_default(
                "disk.api_base_url",
                "https://cloud-api.yandex.net/v1/disk/public/resources",
            )?
            .set_default("disk.list_limit", 1000)?
            .set_default("disk.request_timeout_secs", 30)?
            .set_default("cache.ttl_secs", 300)?
            .set_default("cache.capacity", 1024)?
            .set_default("session.idle_ttl_secs", 86400)?
            .set_default("session.capacity", 10000)?
            .set_default("oauth.authorize_url", "https://oauth.yandex.ru/authorize")?
            .set_default("oauth.token_url", "https://oauth.yandex.ru/token")?
            .set_default("oauth.client_id", None::<String>)?
            .set_default("oauth.client_secret", None::<String>)?
            .set_default("oauth.redirect_uri", None::<String>)?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::load().expect("Failed to load default settings")
    }
}
