//! TOML file configuration structures.
//!
//! These structs directly map to the `slotswap-config.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

/// Session token section. Reloaded on SIGHUP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify session tokens.
    pub token_secret: String,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

fn default_token_ttl_secs() -> u64 {
    24 * 60 * 60
}

/// Sizing of the notification pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Buffered notifications per WebSocket session before messages are dropped.
    #[serde(default = "default_buffer")]
    pub channel_buffer: usize,
    /// Buffered swap events between the coordinator and the notifier.
    #[serde(default = "default_buffer")]
    pub event_buffer: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            channel_buffer: default_buffer(),
            event_buffer: default_buffer(),
        }
    }
}

fn default_buffer() -> usize {
    slotswap_core::events::DEFAULT_CHANNEL_BUFFER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[auth]
token_secret = "0123456789abcdef0123456789abcdef"
token_ttl_secs = 600

[notifications]
channel_buffer = 32
event_buffer = 1024
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.auth.token_ttl_secs, 600);
        assert_eq!(config.notifications.channel_buffer, 32);
        assert_eq!(config.notifications.event_buffer, 1024);
    }

    #[test]
    fn test_defaults_apply() {
        let toml_str = r#"
[auth]
token_secret = "0123456789abcdef0123456789abcdef"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen, default_listen_addr());
        assert_eq!(config.auth.token_ttl_secs, 86_400);
        assert_eq!(config.notifications.channel_buffer, 256);
    }

    #[test]
    fn test_missing_auth_section_fails() {
        assert!(toml::from_str::<FileConfig>("[server]\nlisten = \"127.0.0.1:1\"\n").is_err());
    }
}
