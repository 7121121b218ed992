use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

use crate::screening::ReplaceMode;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub model_timeout: Duration,
    pub storage_timeout: Duration,
    pub replace_mode: ReplaceMode,
    /// Empty means permissive CORS.
    pub cors_allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            run_migrations: parse_bool("RUN_MIGRATIONS", optional_env("RUN_MIGRATIONS"))?
                .unwrap_or(false),
            s3_bucket: optional_env("S3_BUCKET").unwrap_or_else(|| "resumes".to_string()),
            s3_endpoint: require_env("S3_ENDPOINT")?,
            s3_region: optional_env("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            google_api_key: require_env("GOOGLE_API_KEY")?,
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            model_timeout: parse_secs("MODEL_TIMEOUT_SECS", optional_env("MODEL_TIMEOUT_SECS"), 60)?,
            storage_timeout: parse_secs(
                "STORAGE_TIMEOUT_SECS",
                optional_env("STORAGE_TIMEOUT_SECS"),
                30,
            )?,
            replace_mode: optional_env("SCREENING_REPLACE_MODE")
                .map(|v| v.parse::<ReplaceMode>())
                .transpose()
                .map_err(|e| anyhow!("SCREENING_REPLACE_MODE: {e}"))?
                .unwrap_or_default(),
            cors_allowed_origins: optional_env("CORS_ALLOWED_ORIGINS")
                .map(|v| split_origins(&v))
                .unwrap_or_default(),
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_secs(key: &str, raw: Option<String>, default: u64) -> Result<Duration> {
    let secs = match raw {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds"))?,
        None => default,
    };
    if secs == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

fn parse_bool(key: &str, raw: Option<String>) -> Result<Option<bool>> {
    let Some(v) = raw else {
        return Ok(None);
    };
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        other => bail!("{key} must be a boolean, got '{other}'"),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
