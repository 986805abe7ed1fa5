use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Which key/value backend holds the profile collection.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Memory,
    File,
    Postgres { database_url: String },
    Redis { redis_url: String },
}

/// Application configuration loaded from environment variables.
/// Fails at startup if the selected backend is missing its connection URL.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub storage_dir: PathBuf,
    pub export_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "file".to_string());

        Ok(Config {
            storage: parse_backend(&backend)?,
            storage_dir: std::env::var("STORAGE_DIR")
                .unwrap_or_else(|_| "./data".to_string())
                .into(),
            export_dir: std::env::var("EXPORT_DIR")
                .unwrap_or_else(|_| "./exports".to_string())
                .into(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn parse_backend(name: &str) -> Result<StorageBackend> {
    Ok(match name.trim().to_ascii_lowercase().as_str() {
        "memory" => StorageBackend::Memory,
        "file" => StorageBackend::File,
        "postgres" => StorageBackend::Postgres {
            database_url: require_env("DATABASE_URL")?,
        },
        "redis" => StorageBackend::Redis {
            redis_url: require_env("REDIS_URL")?,
        },
        other => bail!("Unknown STORAGE_BACKEND '{other}' (expected memory, file, postgres or redis)"),
    })
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_backends() {
        assert_eq!(parse_backend("memory").unwrap(), StorageBackend::Memory);
        assert_eq!(parse_backend(" FILE ").unwrap(), StorageBackend::File);
    }

    #[test]
    fn test_parse_unknown_backend_fails() {
        assert!(parse_backend("sqlite").is_err());
    }
}
