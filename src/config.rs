use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    /// Memory store is used when unset
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub max_page_size: u32,

    pub log_dir: String,
    pub log_level: String,
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").context("SERVER_ADDR must be set")?,
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,

            rate_protected_per_min: parse_or("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
            max_page_size: parse_or("MAX_PAGE_SIZE", 100)?,

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            jwt_secret: "test-secret".to_string(),
            server_addr: "127.0.0.1:0".to_string(),
            rate_protected_per_min: 0,
            api_prefix: "/api/v1".to_string(),
            max_page_size: 100,
            log_dir: "logs".to_string(),
            log_level: "debug".to_string(),
        }
    }
}
