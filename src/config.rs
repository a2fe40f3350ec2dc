/*
 * Responsibility
 * - 環境変数や設定の読み込み (JWT secret, TTL, storage backend など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::auth::TokenConfig;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;
const MAX_ACCESS_TOKEN_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_REQUEST_BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub jwt_secret: String,
    pub access_token_ttl: chrono::Duration,

    pub storage: StorageBackend,
    pub bcrypt_cost: u32,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let storage = match &self.storage {
            StorageBackend::Memory => "memory",
            StorageBackend::Postgres { .. } => "postgres",
        };

        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("storage", &storage)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("request_timeout", &self.request_timeout)
            .field("request_body_limit_bytes", &self.request_body_limit_bytes)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let access_token_ttl_seconds: i64 = parse_or(
            &lookup,
            "ACCESS_TOKEN_TTL_SECONDS",
            DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
        )?;
        if !(1..=MAX_ACCESS_TOKEN_TTL_SECONDS).contains(&access_token_ttl_seconds) {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
        }
        let access_token_ttl = chrono::Duration::try_seconds(access_token_ttl_seconds)
            .ok_or(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))?;

        let storage = match lookup("STORAGE_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            "postgres" => StorageBackend::Postgres {
                database_url: lookup("DATABASE_URL")
                    .filter(|s| !s.is_empty())
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?,
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                )?,
            },
            _ => return Err(ConfigError::Invalid("STORAGE_BACKEND")),
        };

        let bcrypt_cost: u32 = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid("BCRYPT_COST"));
        }

        let request_timeout = Duration::from_secs(parse_or(
            &lookup,
            "REQUEST_TIMEOUT_SECONDS",
            DEFAULT_REQUEST_TIMEOUT_SECONDS,
        )?);

        let request_body_limit_bytes = parse_or(
            &lookup,
            "REQUEST_BODY_LIMIT_BYTES",
            DEFAULT_REQUEST_BODY_LIMIT_BYTES,
        )?;

        Ok(Self {
            addr,
            app_env,
            jwt_secret,
            access_token_ttl,
            storage,
            bcrypt_cost,
            request_timeout,
            request_body_limit_bytes,
        })
    }

    pub fn token_config(&self) -> TokenConfig {
        TokenConfig::new(self.jwt_secret.clone(), self.access_token_ttl)
    }
}

/// Unset means default; set but unparsable is an error.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_only_secret() {
        let cfg = config(&[("JWT_SECRET", "s3cret")]).unwrap();

        assert_eq!(cfg.addr.port(), 8080);
        assert_eq!(cfg.app_env, AppEnv::Development);
        assert_eq!(cfg.access_token_ttl, chrono::Duration::hours(1));
        assert_eq!(cfg.storage, StorageBackend::Memory);
        assert_eq!(cfg.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.request_body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn secret_is_required() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::Missing("JWT_SECRET"));
        assert_eq!(
            config(&[("JWT_SECRET", "")]).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(
            config(&[("JWT_SECRET", "s"), ("PORT", "http")]).unwrap_err(),
            ConfigError::Invalid("PORT")
        );
        assert_eq!(
            config(&[("JWT_SECRET", "s"), ("ACCESS_TOKEN_TTL_SECONDS", "0")]).unwrap_err(),
            ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS")
        );
        assert_eq!(
            config(&[("JWT_SECRET", "s"), ("BCRYPT_COST", "2")]).unwrap_err(),
            ConfigError::Invalid("BCRYPT_COST")
        );
        assert_eq!(
            config(&[("JWT_SECRET", "s"), ("STORAGE_BACKEND", "redis")]).unwrap_err(),
            ConfigError::Invalid("STORAGE_BACKEND")
        );
    }

    #[test]
    fn access_token_ttl_is_bounded() {
        for raw in ["-5", "31536001", "10000000000000", "9223372036854775807"] {
            assert_eq!(
                config(&[("JWT_SECRET", "s"), ("ACCESS_TOKEN_TTL_SECONDS", raw)]).unwrap_err(),
                ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"),
                "ttl {raw}"
            );
        }

        let cfg = config(&[("JWT_SECRET", "s"), ("ACCESS_TOKEN_TTL_SECONDS", "31536000")]).unwrap();
        let codec = crate::services::auth::TokenCodec::new(&cfg.token_config()).unwrap();
        assert!(codec.issue_access_token("alice", "user-123").is_ok());
    }

    #[test]
    fn postgres_requires_database_url() {
        assert_eq!(
            config(&[("JWT_SECRET", "s"), ("STORAGE_BACKEND", "postgres")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );

        let cfg = config(&[
            ("JWT_SECRET", "s"),
            ("STORAGE_BACKEND", "Postgres"),
            ("DATABASE_URL", "postgres://localhost/chat"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("APP_ENV", "prod"),
        ])
        .unwrap();

        assert!(cfg.app_env.is_production());
        assert_eq!(
            cfg.storage,
            StorageBackend::Postgres {
                database_url: "postgres://localhost/chat".to_string(),
                max_connections: 12,
            }
        );
    }

    #[test]
    fn debug_redacts_secret() {
        let cfg = config(&[("JWT_SECRET", "top-secret-value")]).unwrap();
        let out = format!("{cfg:?}");

        assert!(!out.contains("top-secret-value"));
        assert!(out.contains("<redacted>"));
    }
}
