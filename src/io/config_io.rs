use std::env;
use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::model::config::ClientConfig;

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Directory holding config.toml and session.json:
/// `$REPORTDESK_CONFIG` if set, else `~/.config/reportdesk`.
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = env::var("REPORTDESK_CONFIG") {
        return PathBuf::from(dir);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config").join("reportdesk")
}

/// Load the client config. A missing file means defaults; a present but
/// invalid file is an error (silently ignoring a typo'd server URL would
/// just surface later as a confusing connection failure).
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    let path = config_dir().join("config.toml");
    let mut config = if path.exists() {
        let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        toml::from_str(&text)?
    } else {
        ClientConfig::default()
    };

    // Env var beats the file, the --server flag beats both (applied by the
    // caller).
    if let Ok(url) = env::var("REPORTDESK_URL") {
        if url.is_empty() {
            warn!("REPORTDESK_URL is set but empty, ignoring");
        } else {
            config.server.url = url;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // Env-var driven tests share process environment; keep them in one test
    // so they cannot race each other.
    #[test]
    fn test_load_config_file_and_env_override() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[server]\nurl = \"https://reports.example.com\"\n",
        )
        .unwrap();

        unsafe {
            env::set_var("REPORTDESK_CONFIG", dir.path());
            env::remove_var("REPORTDESK_URL");
        }
        let config = load_config().unwrap();
        assert_eq!(config.server.url, "https://reports.example.com");
        assert_eq!(config.auth.admin_user, "Maclean");

        unsafe {
            env::set_var("REPORTDESK_URL", "http://127.0.0.1:9999");
        }
        let config = load_config().unwrap();
        assert_eq!(config.server.url, "http://127.0.0.1:9999");

        // Missing file falls back to defaults
        unsafe {
            env::remove_var("REPORTDESK_URL");
            env::set_var("REPORTDESK_CONFIG", dir.path().join("nowhere"));
        }
        let config = load_config().unwrap();
        assert_eq!(config.server.url, "http://localhost:8000");

        // Invalid file is an error, not a silent default
        let bad = TempDir::new().unwrap();
        fs::write(bad.path().join("config.toml"), "not toml [[[").unwrap();
        unsafe {
            env::set_var("REPORTDESK_CONFIG", bad.path());
        }
        assert!(load_config().is_err());

        unsafe {
            env::remove_var("REPORTDESK_CONFIG");
        }
    }
}
