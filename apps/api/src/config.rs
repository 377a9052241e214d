use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_COMPLETION_API_URL;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Application configuration loaded from environment variables.
///
/// The completion API key is not part of the snapshot. It is looked up from
/// `api_key_var` on every request, so a key set or rotated after startup is
/// picked up without a restart.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key_var: String,
    pub completion_api_url: String,
    pub cors_allowed_origin: String,
    pub completion_timeout: Duration,
    pub meal_plan_max_attempts: u32,
    pub port: u16,
    pub rust_log: String,
    pub json_logs: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_key_var: API_KEY_VAR.to_string(),
            completion_api_url: optional_env("COMPLETION_API_URL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_API_URL.to_string()),
            cors_allowed_origin: optional_env("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            completion_timeout: Duration::from_secs(
                parse_env("COMPLETION_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
                    .context("COMPLETION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            meal_plan_max_attempts: parse_env("MEAL_PLAN_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)
                .context("MEAL_PLAN_MAX_ATTEMPTS must be a positive integer")?
                .max(1),
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v == "json")
                .unwrap_or(false),
        })
    }

    /// Current value of the completion API key, read from the process
    /// environment at call time.
    pub fn api_key(&self) -> Option<String> {
        optional_env(&self.api_key_var)
    }
}

/// Treats an empty variable the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for '{key}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Config pointing the completion client at a local stub server.
    pub fn for_tests(completion_api_url: String, api_key_var: &str) -> Self {
        Config {
            api_key_var: api_key_var.to_string(),
            completion_api_url,
            cors_allowed_origin: DEFAULT_CORS_ORIGIN.to_string(),
            completion_timeout: Duration::from_secs(5),
            meal_plan_max_attempts: DEFAULT_MAX_ATTEMPTS,
            port: 0,
            rust_log: "debug".to_string(),
            json_logs: false,
        }
    }
}
