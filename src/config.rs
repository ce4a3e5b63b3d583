use std::ops::RangeInclusive;

use anyhow::Context;
use serde::Deserialize;

/// One minute up to one year.
const JWT_TTL_MINUTES: RangeInclusive<i64> = 1..=525_600;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DB_CONNECTION_STRING")
            .or_else(|| lookup("DATABASE_URL"))
            .context("DB_CONNECTION_STRING (or DATABASE_URL) must be set")?;

        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET_KEY")
                .or_else(|| lookup("JWT_SECRET"))
                .context("JWT_SECRET_KEY (or JWT_SECRET) must be set")?,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "auth-api".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "auth-api-users".into()),
            ttl_minutes: parse_in(&lookup, "JWT_TTL_MINUTES", 15, JWT_TTL_MINUTES)?,
        };

        Ok(Self {
            database_url,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "PORT", 3000)?,
            jwt,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

fn parse_in<F>(
    lookup: &F,
    key: &str,
    default: i64,
    range: RangeInclusive<i64>,
) -> anyhow::Result<i64>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    anyhow::ensure!(
        range.contains(&value),
        "{key} must be within {}..={}, got {value}",
        range.start(),
        range.end()
    );
    Ok(value)
}
