use portal_core::config::load_settings;
use portal_core::error::AppError;
use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub directory_service: DirectorySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub session_secret: Secret<String>,
    /// OTLP collector endpoint; absent means fmt-only logging.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Clone)]
pub struct DirectorySettings {
    /// Base URL of the facility backend that persists the location forest
    /// (e.g. https://api.example.com).
    pub url: String,
}

pub fn get_configuration() -> Result<Settings, AppError> {
    load_settings::<Settings>("admin-portal")
}
