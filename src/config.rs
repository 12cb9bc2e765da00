use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:4173";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub db_name: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Read settings from the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("JWT_SECRET not set"))?;

        let cors_origins = or_default(&lookup, "CORS_ORIGINS", DEFAULT_CORS_ORIGINS)
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Ok(Self {
            host: or_default(&lookup, "HOST", "127.0.0.1"),
            port: parse_or_default(&lookup, "PORT", "8080")?,
            mongodb_uri: or_default(&lookup, "MONGODB_URI", "mongodb://localhost:27017"),
            db_name: or_default(&lookup, "DB_NAME", "notesdesk"),
            jwt_secret,
            cors_origins,
        })
    }
}

fn or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = or_default(lookup, key, default);
    raw.parse::<T>()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            anyhow!("{key} must be valid, got '{raw}': {e}")
        })
        .with_context(|| format!("reading {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let cfg = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "x")])).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.db_name, "notesdesk");
        assert_eq!(cfg.cors_origins.len(), 2);
    }

    #[test]
    fn secret_is_required() {
        assert!(AppConfig::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn bad_port_is_an_error() {
        let result = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "x"), ("PORT", "http")]));
        assert!(result.is_err());
    }

    #[test]
    fn cors_list_is_split() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "x"),
            ("CORS_ORIGINS", "https://admin.example.com, https://example.com,"),
        ]))
        .unwrap();
        assert_eq!(cfg.cors_origins, vec!["https://admin.example.com", "https://example.com"]);
    }
}
