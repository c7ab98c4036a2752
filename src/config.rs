use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
}

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_JWT_TTL_MINUTES: u32 = 60;
/// One year; longer lifetimes fall back to the default.
const MAX_JWT_TTL_MINUTES: u32 = 60 * 24 * 365;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => compose_database_url(&lookup)?,
        };

        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "orgfunnel".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "orgfunnel-users".into()),
            ttl_minutes: parsed("JWT_TTL_MINUTES")
                .and_then(|v| u32::try_from(v).ok())
                .filter(|m| (1..=MAX_JWT_TTL_MINUTES).contains(m))
                .unwrap_or(DEFAULT_JWT_TTL_MINUTES),
        };

        let cors_allowed_origins = parse_origins(
            &lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into()),
        );

        Ok(Self {
            database_url,
            db_max_connections: parsed("DB_MAX_CONNECTIONS")
                .and_then(|v| u32::try_from(v).ok())
                .filter(|&n| n > 0)
                .unwrap_or(10),
            db_acquire_timeout: Duration::from_secs(parsed("DB_ACQUIRE_TIMEOUT_SECS").unwrap_or(5)),
            jwt,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("APP_PORT")
                .and_then(|v| v.trim().parse::<u16>().ok())
                .unwrap_or(8080),
            cors_allowed_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn compose_database_url<F>(lookup: &F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let user = lookup("DB_USERNAME").context("neither DATABASE_URL nor DB_USERNAME is set")?;
    let password = lookup("DB_PASSWORD").unwrap_or_default();
    let host = lookup("DB_HOST").context("DB_HOST is not set")?;
    let port = lookup("DB_PORT").unwrap_or_else(|| "5432".into());
    let name = lookup("DB_DATABASE").context("DB_DATABASE is not set")?;
    Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
}

fn parse_origins(raw: &str) -> Vec<String> {
    if raw.trim() == "*" {
        return Vec::new();
    }
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
