use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct CveConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub pagination: PaginationConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    /// Bound on the startup connection attempt, in milliseconds.
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    pub default_limit: u64,
    /// `None` leaves `limit` unbounded.
    pub max_limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Empty means every origin is allowed.
    pub allowed_origins: Vec<String>,
}

impl CveConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(CveConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017/"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("nvd_cve_data"), false)?,
                collection: get_env("MONGODB_COLLECTION", Some("cves"), false)?,
                connect_timeout_ms: parse_env("MONGODB_CONNECT_TIMEOUT_MS", 5000)?,
            },
            pagination: PaginationConfig {
                default_limit: parse_env("CVE_DEFAULT_PAGE_SIZE", 10)?,
                max_limit: env::var("CVE_MAX_PAGE_SIZE")
                    .ok()
                    .map(|v| parse_value("CVE_MAX_PAGE_SIZE", &v))
                    .transpose()?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|v| split_origins(&v))
                    .unwrap_or_default(),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env(key: &str, default: u64) -> Result<u64, AppError> {
    match env::var(key) {
        Ok(val) => parse_value(key, &val),
        Err(_) => Ok(default),
    }
}

fn parse_value(key: &str, value: &str) -> Result<u64, AppError> {
    value.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "{} must be a non-negative integer, got '{}': {}",
            key,
            value,
            e
        ))
    })
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_origins_drops_blanks_and_whitespace() {
        assert_eq!(
            split_origins(" http://localhost:3000 , ,https://cve.example.org"),
            vec![
                "http://localhost:3000".to_string(),
                "https://cve.example.org".to_string()
            ]
        );
        assert!(split_origins("").is_empty());
    }

    #[test]
    fn parse_value_rejects_negative_and_garbage() {
        assert_eq!(parse_value("X", " 25 ").unwrap(), 25);
        assert!(matches!(
            parse_value("X", "-1"),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            parse_value("X", "ten"),
            Err(AppError::ConfigError(_))
        ));
    }
}
