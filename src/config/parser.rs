use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Environment variable that overrides `server.port`
pub const SERVER_PORT_ENV: &str = "SERVER_PORT";

/// Environment variable that replaces `server.allowed_origins`
///
/// Holds one origin or a comma-separated list.
pub const FRONTEND_URL_ENV: &str = "FRONTEND_URL";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use web_analyzer::config::load_config;
///
/// let config = load_config(Path::new("web-analyzer.toml")).unwrap();
/// println!("Listening on {}", config.server.bind_address());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Loads the configuration used by the binary
///
/// Reads `path` when given (falling back to defaults otherwise), then
/// applies environment overrides and validates the result.
pub fn load_runtime_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;

    Ok(config)
}

/// Applies environment overrides using `lookup` to read variables
///
/// Recognizes [`SERVER_PORT_ENV`] and [`FRONTEND_URL_ENV`].
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(SERVER_PORT_ENV) {
        config.server.port = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidOverride {
                key: SERVER_PORT_ENV.to_string(),
                value: value.clone(),
            })?;
        tracing::debug!(port = config.server.port, "Server port overridden from environment");
    }

    if let Some(value) = lookup(FRONTEND_URL_ENV) {
        config.server.allowed_origins = value
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        tracing::debug!(
            origins = ?config.server.allowed_origins,
            "Allowed origins overridden from environment"
        );
    }

    Ok(())
}
