//! Process configuration, read from the environment.
//!
//! | variable | default |
//! |---|---|
//! | `STOREFRONT_BIND_ADDR` | `0.0.0.0:8080` |
//! | `STOREFRONT_LOG_FORMAT` | `json` (`json` or `pretty`) |
//! | `STOREFRONT_STORAGE` | `memory` (`memory` or `postgres`) |
//! | `DATABASE_URL` | required when storage is `postgres` |
//! | `STOREFRONT_ACCOUNTS_URL` | unset: orders look accounts up in-process |
//! | `STOREFRONT_INVENTORY_URL` | unset: orders reserve items in-process |
//! | `STOREFRONT_COLLABORATOR_TIMEOUT_MS` | `5000` |

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use storefront_observability::{LogFormat, ParseLogFormatError};

pub const BIND_ADDR_VAR: &str = "STOREFRONT_BIND_ADDR";
pub const LOG_FORMAT_VAR: &str = "STOREFRONT_LOG_FORMAT";
pub const STORAGE_VAR: &str = "STOREFRONT_STORAGE";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const ACCOUNTS_URL_VAR: &str = "STOREFRONT_ACCOUNTS_URL";
pub const INVENTORY_URL_VAR: &str = "STOREFRONT_INVENTORY_URL";
pub const COLLABORATOR_TIMEOUT_VAR: &str = "STOREFRONT_COLLABORATOR_TIMEOUT_MS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

/// Base URLs of remote accounts and inventory services used by order placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorConfig {
    pub accounts_url: Option<Url>,
    pub inventory_url: Option<Url>,
    pub timeout: Duration,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            accounts_url: None,
            inventory_url: None,
            timeout: DEFAULT_COLLABORATOR_TIMEOUT,
        }
    }
}

impl CollaboratorConfig {
    pub fn is_remote(&self) -> bool {
        self.accounts_url.is_some() || self.inventory_url.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
    pub storage: StorageConfig,
    pub collaborators: CollaboratorConfig,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("STOREFRONT_BIND_ADDR: invalid socket address `{value}`: {source}")]
    InvalidBindAddr {
        value: String,
        source: AddrParseError,
    },

    #[error("STOREFRONT_LOG_FORMAT: {0}")]
    InvalidLogFormat(#[from] ParseLogFormatError),

    #[error("STOREFRONT_STORAGE: unknown storage `{0}` (expected `memory` or `postgres`)")]
    UnknownStorage(String),

    #[error("DATABASE_URL must be set when STOREFRONT_STORAGE=postgres")]
    MissingDatabaseUrl,

    #[error("{var}: invalid base URL `{value}`: {reason}")]
    InvalidCollaboratorUrl {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("STOREFRONT_COLLABORATOR_TIMEOUT_MS: expected milliseconds, got `{0}`")]
    InvalidCollaboratorTimeout(String),
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_format: LogFormat::default(),
            storage: StorageConfig::Memory,
            collaborators: CollaboratorConfig::default(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_addr = var(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: raw_addr.clone(),
                source,
            })?;

        let log_format = match var(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        let storage = match var(STORAGE_VAR).map(|s| s.trim().to_ascii_lowercase()) {
            None => StorageConfig::Memory,
            Some(kind) if kind == "memory" => StorageConfig::Memory,
            Some(kind) if kind == "postgres" => StorageConfig::Postgres {
                database_url: var(DATABASE_URL_VAR).ok_or(ConfigError::MissingDatabaseUrl)?,
                max_connections: DEFAULT_MAX_CONNECTIONS,
            },
            Some(other) => return Err(ConfigError::UnknownStorage(other)),
        };

        let collaborators = CollaboratorConfig {
            accounts_url: var(ACCOUNTS_URL_VAR)
                .map(|raw| parse_base_url(ACCOUNTS_URL_VAR, &raw))
                .transpose()?,
            inventory_url: var(INVENTORY_URL_VAR)
                .map(|raw| parse_base_url(INVENTORY_URL_VAR, &raw))
                .transpose()?,
            timeout: match var(COLLABORATOR_TIMEOUT_VAR) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|ms| *ms > 0)
                    .map(Duration::from_millis)
                    .ok_or(ConfigError::InvalidCollaboratorTimeout(raw))?,
                None => DEFAULT_COLLABORATOR_TIMEOUT,
            },
        };

        Ok(Self {
            bind_addr,
            log_format,
            storage,
            collaborators,
        })
    }
}

fn parse_base_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidCollaboratorUrl {
        var,
        value: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected an http(s) URL".to_string()));
    }
    Ok(url)
}
