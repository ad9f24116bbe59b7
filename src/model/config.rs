use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the reporting backend.
    #[serde(default = "default_url")]
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { url: default_url() }
    }
}

fn default_url() -> String {
    "http://localhost:8000".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The single administrator identity. The privilege check is a binary
    /// branch on this name, not an access-control list.
    #[serde(default = "default_admin")]
    pub admin_user: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            admin_user: default_admin(),
        }
    }
}

fn default_admin() -> String {
    "Maclean".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Hex color overrides keyed by theme slot name (e.g. `highlight = "#FB4196"`).
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
