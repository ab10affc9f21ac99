use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    pub tmdb_language: String,
    pub tmdb_timeout: Duration,
    pub tmdb_connect_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `TMDB_API_KEY` is the
    /// only required key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;

        let tmdb_api_key = lookup("TMDB_API_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .context("TMDB_API_KEY must be set")?;

        let tmdb_timeout_secs: u64 = parse_or(&lookup, "TMDB_TIMEOUT_SECS", 30)?;
        let tmdb_connect_timeout_secs: u64 = parse_or(&lookup, "TMDB_CONNECT_TIMEOUT_SECS", 5)?;

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url: var("DATABASE_URL", "sqlite://movies.db?mode=rwc"),
            tmdb_api_key,
            tmdb_base_url: var("TMDB_BASE_URL", "https://api.themoviedb.org/3"),
            tmdb_image_base_url: var("TMDB_IMAGE_BASE_URL", "https://image.tmdb.org/t/p/w500"),
            tmdb_language: var("TMDB_LANGUAGE", "en-US"),
            tmdb_timeout: Duration::from_secs(tmdb_timeout_secs),
            tmdb_connect_timeout: Duration::from_secs(tmdb_connect_timeout_secs),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("{key}={raw:?}")),
        None => Ok(default),
    }
}
