use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_METROLINX_BASE_URL: &str = "https://api.openmetrolinx.com/OpenDataAPI/api/V1";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(secs)
    };

    let metrolinx_api_key = require("METROLINX_API_KEY")?;
    let env = parse_environment(or_default("GOTRANSIT_ENV", "development").trim())?;

    let bind_addr = parse_addr("GOTRANSIT_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("GOTRANSIT_LOG_LEVEL", "info");
    let metrolinx_base_url = or_default("METROLINX_BASE_URL", DEFAULT_METROLINX_BASE_URL)
        .trim()
        .to_string();
    let metrolinx_timeout_secs = parse_secs("METROLINX_TIMEOUT_SECS", "10")?;
    let metrolinx_connect_timeout_secs = parse_secs("METROLINX_CONNECT_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("GOTRANSIT_USER_AGENT", "gotransit/0.1 (transit-proxy)");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        metrolinx_api_key,
        metrolinx_base_url,
        metrolinx_timeout_secs,
        metrolinx_connect_timeout_secs,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GOTRANSIT_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
