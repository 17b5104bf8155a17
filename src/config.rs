use anyhow::Context;
use serde::Deserialize;

/// One year. Longer lifetimes are rejected at startup.
pub const MAX_JWT_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// `None` means a random secret is generated at startup.
    pub secret: Option<String>,
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

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => match v.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => anyhow::bail!("DATABASE_MAX_CONNECTIONS must be a positive integer"),
            },
            None => 10,
        };
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("APP_PORT") {
            Some(v) => v.parse::<u16>().context("APP_PORT must be a port number")?,
            None => 8080,
        };
        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").filter(|s| !s.is_empty()),
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "accounts".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "accounts-users".into()),
            ttl_minutes: match lookup("JWT_TTL_MINUTES") {
                Some(v) => match v.parse::<i64>() {
                    Ok(n) if (1..=MAX_JWT_TTL_MINUTES).contains(&n) => n,
                    _ => anyhow::bail!(
                        "JWT_TTL_MINUTES must be between 1 and {MAX_JWT_TTL_MINUTES}"
                    ),
                },
                None => 60,
            },
        };
        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            jwt,
        })
    }
}
