use crate::auth::password::{DEFAULT_COST, MAX_COST, MIN_COST};
use crate::model::App;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
/// Upper bound on session lifetime: 30 days.
pub const MAX_TOKEN_TTL_SECS: u64 = 30 * 24 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Dev,
    Prod,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "local" => Ok(Self::Local),
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => bail!("unknown environment: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "memory" => Ok(Self::Memory),
            "postgres" => Ok(Self::Postgres),
            other => bail!("unknown storage backend: {other}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_ms: u64,
    pub acquire_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct InternalApiConfig {
    pub enabled: bool,
    pub bind_addr: SocketAddr,
}

// Service configuration sourced from environment variables, then an optional
// YAML file named by SSO_CONFIG.
#[derive(Debug, Clone)]
pub struct SsoConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub token_ttl: Duration,
    pub request_timeout: Duration,
    pub password_hash_cost: u32,
    pub storage: StorageBackend,
    pub postgres: Option<PostgresConfig>,
    pub internal: InternalApiConfig,
    pub apps: Vec<App>,
}

#[derive(Debug, Deserialize)]
struct SsoConfigOverride {
    env: Option<Environment>,
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    token_ttl_secs: Option<u64>,
    request_timeout_ms: Option<u64>,
    password_hash_cost: Option<u32>,
    storage: Option<StorageBackend>,
    postgres: Option<PostgresConfig>,
    internal_enabled: Option<bool>,
    internal_bind: Option<String>,
    #[serde(default)]
    apps: Vec<App>,
}

impl SsoConfig {
    pub fn from_env() -> Result<Self> {
        let env: Environment = env_or("SSO_ENV", "local")
            .parse()
            .with_context(|| "parse SSO_ENV")?;
        let bind_addr: SocketAddr = env_or("SSO_BIND", "0.0.0.0:44044")
            .parse()
            .with_context(|| "parse SSO_BIND")?;
        let metrics_bind: SocketAddr = env_or("SSO_METRICS_BIND", "0.0.0.0:9090")
            .parse()
            .with_context(|| "parse SSO_METRICS_BIND")?;
        let token_ttl_secs: u64 = env_or("SSO_TOKEN_TTL_SECS", &DEFAULT_TOKEN_TTL_SECS.to_string())
            .parse()
            .with_context(|| "parse SSO_TOKEN_TTL_SECS")?;
        let request_timeout_ms: u64 = env_or(
            "SSO_REQUEST_TIMEOUT_MS",
            &DEFAULT_REQUEST_TIMEOUT_MS.to_string(),
        )
        .parse()
        .with_context(|| "parse SSO_REQUEST_TIMEOUT_MS")?;
        let password_hash_cost: u32 = env_or("SSO_PASSWORD_HASH_COST", &DEFAULT_COST.to_string())
            .parse()
            .with_context(|| "parse SSO_PASSWORD_HASH_COST")?;
        let storage: StorageBackend = env_or("SSO_STORAGE", "memory")
            .parse()
            .with_context(|| "parse SSO_STORAGE")?;
        let postgres = match std::env::var("SSO_POSTGRES_URL") {
            Ok(url) => Some(PostgresConfig {
                url,
                max_connections: env_or("SSO_POSTGRES_MAX_CONNECTIONS", "10")
                    .parse()
                    .with_context(|| "parse SSO_POSTGRES_MAX_CONNECTIONS")?,
                connect_timeout_ms: env_or("SSO_POSTGRES_CONNECT_TIMEOUT_MS", "5000")
                    .parse()
                    .with_context(|| "parse SSO_POSTGRES_CONNECT_TIMEOUT_MS")?,
                acquire_timeout_ms: env_or("SSO_POSTGRES_ACQUIRE_TIMEOUT_MS", "5000")
                    .parse()
                    .with_context(|| "parse SSO_POSTGRES_ACQUIRE_TIMEOUT_MS")?,
            }),
            Err(_) => None,
        };
        let internal = InternalApiConfig {
            enabled: env_or("SSO_INTERNAL_ENABLED", "false")
                .parse()
                .with_context(|| "parse SSO_INTERNAL_ENABLED")?,
            bind_addr: env_or("SSO_INTERNAL_BIND", "127.0.0.1:44045")
                .parse()
                .with_context(|| "parse SSO_INTERNAL_BIND")?,
        };
        Ok(Self {
            env,
            bind_addr,
            metrics_bind,
            token_ttl: Duration::from_secs(token_ttl_secs),
            request_timeout: Duration::from_millis(request_timeout_ms),
            password_hash_cost,
            storage,
            postgres,
            internal,
            apps: Vec::new(),
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("SSO_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read SSO_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        config.validate()?;
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: SsoConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse sso config yaml")?;
        if let Some(value) = override_cfg.env {
            self.env = value;
        }
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.token_ttl_secs {
            self.token_ttl = Duration::from_secs(value);
        }
        if let Some(value) = override_cfg.request_timeout_ms {
            self.request_timeout = Duration::from_millis(value);
        }
        if let Some(value) = override_cfg.password_hash_cost {
            self.password_hash_cost = value;
        }
        if let Some(value) = override_cfg.storage {
            self.storage = value;
        }
        if let Some(value) = override_cfg.postgres {
            self.postgres = Some(value);
        }
        if let Some(value) = override_cfg.internal_enabled {
            self.internal.enabled = value;
        }
        if let Some(value) = override_cfg.internal_bind {
            self.internal.bind_addr = value.parse().with_context(|| "parse internal_bind")?;
        }
        self.apps.extend(override_cfg.apps);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.token_ttl.is_zero() {
            bail!("token ttl must be greater than zero");
        }
        if self.token_ttl.as_secs() > MAX_TOKEN_TTL_SECS {
            bail!(
                "token ttl {}s exceeds the maximum of {MAX_TOKEN_TTL_SECS}s",
                self.token_ttl.as_secs()
            );
        }
        if self.request_timeout.is_zero() {
            bail!("request timeout must be greater than zero");
        }
        if !(MIN_COST..=MAX_COST).contains(&self.password_hash_cost) {
            bail!(
                "password hash cost {} outside {MIN_COST}..={MAX_COST}",
                self.password_hash_cost
            );
        }
        if self.env == Environment::Prod && self.storage == StorageBackend::Memory {
            bail!("prod environment requires durable storage; set SSO_STORAGE=postgres");
        }
        if self.storage == StorageBackend::Postgres && self.postgres.is_none() {
            bail!("postgres storage selected but SSO_POSTGRES_URL is not set");
        }
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
