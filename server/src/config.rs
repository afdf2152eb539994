use anyhow::{Context, Result, bail};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use std::env;

/// Process-wide settings, read once at startup and handed to the app state.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// `ENVIRONMENT=dev` turns on per-request tracing.
    pub dev_mode: bool,
    pub security: SecurityConfig,
    pub page_limits: PageLimits,
}

/// Signing settings for bearer tokens.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    pub algorithm: Algorithm,
    pub token_ttl: Duration,
}

impl SecurityConfig {
    /// HS256 with the 72 hour lifetime tokens have always had.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl: Duration::hours(72),
        }
    }
}

/// Bounds for `limit`/`offset` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 25,
            max_limit: 100,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` is this over the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // DB_URL is the older name, still honoured.
        let database_url = lookup("DATABASE_URL")
            .or_else(|| lookup("DB_URL"))
            .context("DATABASE_URL must be set")?;

        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let port = match lookup("PORT") {
            Some(p) => p
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port: {p}"))?,
            None => 3000,
        };

        let mut page_limits = PageLimits::default();
        if let Some(max) = lookup("MAX_PAGE_LIMIT") {
            let max: i64 = max
                .parse()
                .with_context(|| format!("MAX_PAGE_LIMIT is not a number: {max}"))?;
            if max < 1 {
                bail!("MAX_PAGE_LIMIT must be at least 1");
            }
            page_limits.max_limit = max;
            page_limits.default_limit = page_limits.default_limit.min(max);
        }

        Ok(Self {
            database_url,
            port,
            dev_mode: lookup("ENVIRONMENT").as_deref() == Some("dev"),
            security: SecurityConfig::new(jwt_secret),
            page_limits,
        })
    }
}
