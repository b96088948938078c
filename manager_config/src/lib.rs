//! Environment-based configuration for the Minecraft stack manager.
//!
//! All settings come from process environment variables; nothing is
//! persisted. The Portainer password is wrapped in [`SecretString`] so it
//! never appears in debug output or logs.

use std::net::SocketAddr;
use std::path::PathBuf;

use secrecy::SecretString;
use tracing::debug;
use url::Url;

/// Base URL of the Portainer instance, e.g. `https://portainer.local:9443`.
pub const PORTAINER_URL: &str = "PORTAINER_URL";
/// Portainer account username.
pub const PORTAINER_USER: &str = "PORTAINER_USER";
/// Portainer account password.
pub const PORTAINER_PASSWORD: &str = "PORTAINER_PASSWORD";
/// Host directory under which per-stack data volumes are created.
pub const PORTAINER_VOLUME_PATH: &str = "PORTAINER_VOLUME_PATH";
/// Listen address for the inbound REST server (optional).
pub const MANAGER_LISTEN_ADDR: &str = "MANAGER_LISTEN_ADDR";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("environment variable {name} is not a valid socket address: {value}")]
    InvalidListenAddr { name: &'static str, value: String },
}

/// Runtime configuration for the manager.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Portainer base URL; API paths are joined onto it.
    pub base_url: Url,
    pub username: String,
    pub password: SecretString,
    /// Host path under which per-stack `/data` directories live.
    pub volume_root: PathBuf,
    /// Address the REST server binds to.
    pub listen_addr: SocketAddr,
}

impl ManagerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup. The
    /// environment-backed path goes through here; tests supply a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let raw_url = lookup(PORTAINER_URL).ok_or(ConfigError::MissingVar(PORTAINER_URL))?;
        let base_url = Url::parse(&raw_url).map_err(|source| ConfigError::InvalidUrl {
            name: PORTAINER_URL,
            source,
        })?;

        let username = lookup(PORTAINER_USER).ok_or(ConfigError::MissingVar(PORTAINER_USER))?;
        let password = SecretString::new(
            lookup(PORTAINER_PASSWORD).ok_or(ConfigError::MissingVar(PORTAINER_PASSWORD))?,
        );
        let volume_root = lookup(PORTAINER_VOLUME_PATH)
            .ok_or(ConfigError::MissingVar(PORTAINER_VOLUME_PATH))?
            .into();

        let raw_listen = lookup(MANAGER_LISTEN_ADDR)
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = raw_listen
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr {
                name: MANAGER_LISTEN_ADDR,
                value: raw_listen,
            })?;

        debug!(%base_url, ?volume_root, %listen_addr, "loaded manager configuration");

        Ok(Self {
            base_url,
            username,
            password,
            volume_root,
            listen_addr,
        })
    }
}
