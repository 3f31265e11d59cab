//! Configuration module for web-analyzer
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. All settings have defaults, so the file is optional.
//!
//! # Example
//!
//! ```no_run
//! use web_analyzer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("web-analyzer.toml")).unwrap();
//! println!("Probing at most {} links at once", config.probing.max_concurrent_probes);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, ProbingConfig, ServerConfig};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, load_config, load_runtime_config, FRONTEND_URL_ENV, SERVER_PORT_ENV,
};
pub use validation::validate;
