use crate::config::types::{Config, HttpConfig, ProbingConfig, ServerConfig};
use crate::ConfigError;
use url::Url;

/// Smallest accepted deadline for any outbound request (milliseconds)
const MIN_TIMEOUT_MS: u64 = 100;

/// Largest accepted deadline for any outbound request (milliseconds)
const MAX_TIMEOUT_MS: u64 = 300_000;

const MAX_CONCURRENT_PROBES: usize = 1024;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_http_config(&config.http)?;
    validate_probing_config(&config.probing)?;
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.host.trim().is_empty() {
        return Err(ConfigError::Validation("host cannot be empty".to_string()));
    }

    for origin in &config.allowed_origins {
        let is_origin = Url::parse(origin).is_ok_and(|url| {
            matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
        });
        if !is_origin {
            return Err(ConfigError::Validation(format!(
                "allowed_origins entry {:?} is not an http(s) origin",
                origin
            )));
        }
    }

    Ok(())
}

/// Validates outbound HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    validate_timeout("fetch_timeout_ms", config.fetch_timeout_ms)?;
    validate_timeout("probe_timeout_ms", config.probe_timeout_ms)?;
    validate_timeout("connect_timeout_ms", config.connect_timeout_ms)?;

    Ok(())
}

/// Validates probing configuration
fn validate_probing_config(config: &ProbingConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_probes < 1 || config.max_concurrent_probes > MAX_CONCURRENT_PROBES {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_probes must be between 1 and {}, got {}",
            MAX_CONCURRENT_PROBES, config.max_concurrent_probes
        )));
    }

    Ok(())
}

fn validate_timeout(name: &str, value_ms: u64) -> Result<(), ConfigError> {
    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&value_ms) {
        return Err(ConfigError::Validation(format!(
            "{} must be between {}ms and {}ms, got {}ms",
            name, MIN_TIMEOUT_MS, MAX_TIMEOUT_MS, value_ms
        )));
    }

    Ok(())
}
