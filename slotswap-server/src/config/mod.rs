//! Configuration module for slotswap-server.
//!
//! Handles loading configuration from TOML files and CLI arguments.

pub mod file;

use crate::config::file::FileConfig;
use slotswap_core::config::{AuthConfig, EngineConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Shortest accepted `token_secret`, in bytes.
pub const MIN_SECRET_LEN: usize = 16;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Validated configuration, split into the parts each component needs.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub auth: AuthConfig,
    pub engine: EngineConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Read the TOML file, apply CLI overrides and validate.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        self.load_str(&config_content)
    }

    /// Same as [`load`](Self::load); used on SIGHUP.
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn load_str(&self, content: &str) -> Result<LoadedConfig, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        validate(&file_config)?;
        Ok(build_loaded_config(file_config))
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if config.auth.token_secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::ValidationError(format!(
            "auth.token_secret must be at least {MIN_SECRET_LEN} bytes"
        )));
    }
    if config.auth.token_ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "auth.token_ttl_secs must be positive".to_string(),
        ));
    }
    if config.notifications.channel_buffer == 0 || config.notifications.event_buffer == 0 {
        return Err(ConfigError::ValidationError(
            "notification buffers must be positive".to_string(),
        ));
    }
    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    LoadedConfig {
        listen: file_config.server.listen,
        auth: AuthConfig::new(
            file_config.auth.token_secret.into_bytes(),
            Duration::from_secs(file_config.auth.token_ttl_secs),
        ),
        engine: EngineConfig {
            notification_buffer: file_config.notifications.channel_buffer,
            event_buffer: file_config.notifications.event_buffer,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[server]
listen = "127.0.0.1:3000"

[auth]
token_secret = "0123456789abcdef0123456789abcdef"
"#;

    #[test]
    fn listen_override_wins() {
        let override_addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let loader = ConfigLoader::new("unused.toml", Some(override_addr));
        let loaded = loader.load_str(CONFIG).unwrap();
        assert_eq!(loaded.listen, override_addr);
        assert_eq!(loaded.auth.token_ttl, Duration::from_secs(86_400));
        assert_eq!(loaded.engine, EngineConfig::default());
    }

    #[test]
    fn short_secret_is_rejected() {
        let loader = ConfigLoader::new("unused.toml", None);
        let err = loader
            .load_str("[auth]\ntoken_secret = \"short\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let loader = ConfigLoader::new("/nonexistent/slotswap-config.toml", None);
        assert!(matches!(loader.load(), Err(ConfigError::IoError(_))));
    }
}
