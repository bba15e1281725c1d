//! Environment-driven bot configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

const DEFAULT_DATABASE_PATH: &str = "subscriptions.db";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 60;
const DEFAULT_DISPATCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ADD_FLOW_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// Register commands for this guild only (instant updates during development)
    pub discord_guild_id: Option<String>,
    pub database_path: String,
    pub log_level: String,
    /// Time between two reminder passes
    pub reminder_interval: Duration,
    /// Upper bound for a single reminder DM
    pub dispatch_timeout: Duration,
    /// Idle time after which an unfinished /add conversation is dropped
    pub add_flow_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let discord_token = env::var("DISCORD_TOKEN")
            .context("DISCORD_TOKEN must be set in the environment or .env file")?;

        let discord_guild_id = env::var("DISCORD_GUILD_ID")
            .ok()
            .filter(|id| !id.trim().is_empty());

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        Ok(Config {
            discord_token,
            discord_guild_id,
            database_path,
            log_level,
            reminder_interval: secs_from_env(
                "REMINDER_INTERVAL_SECS",
                DEFAULT_REMINDER_INTERVAL_SECS,
            )?,
            dispatch_timeout: secs_from_env(
                "DISPATCH_TIMEOUT_SECS",
                DEFAULT_DISPATCH_TIMEOUT_SECS,
            )?,
            add_flow_timeout: secs_from_env(
                "ADD_FLOW_TIMEOUT_SECS",
                DEFAULT_ADD_FLOW_TIMEOUT_SECS,
            )?,
        })
    }
}

/// Read a positive number of seconds, falling back to `default` when unset
fn secs_from_env(key: &str, default: u64) -> Result<Duration> {
    match env::var(key) {
        Ok(raw) => parse_secs(key, &raw),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a whole number of seconds, got {raw:?}"))?;
    if secs == 0 {
        anyhow::bail!("{key} must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_secs_accepts_whole_numbers() {
        assert_eq!(
            parse_secs("REMINDER_INTERVAL_SECS", "90").unwrap(),
            Duration::from_secs(90)
        );
        assert_eq!(
            parse_secs("REMINDER_INTERVAL_SECS", " 5 ").unwrap(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_parse_secs_rejects_garbage_and_zero() {
        assert!(parse_secs("DISPATCH_TIMEOUT_SECS", "ten").is_err());
        assert!(parse_secs("DISPATCH_TIMEOUT_SECS", "-1").is_err());

        let err = parse_secs("DISPATCH_TIMEOUT_SECS", "0").unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }
}
