//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Dotenv(dotenvy::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Dotenv(e) => write!(f, ".env error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Environment variables that override the file configuration.
pub const ENV_EMAIL: &str = "EMAIL_ADDRESS";
pub const ENV_NAME: &str = "FULLNAME";
pub const ENV_STACK: &str = "STACK";
pub const ENV_PORT: &str = "PORT";
pub const ENV_FACT_URL: &str = "FACT_URL";

/// Parse a TOML file into a config without validating it.
pub fn read_config_file(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Overlay environment values onto `config`.
///
/// `lookup` abstracts over the process environment. Empty values are treated
/// as unset so the file or built-in default stays in effect.
pub fn apply_env<F>(config: &mut ServerConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(email) = get(ENV_EMAIL) {
        config.profile.email = email;
    }
    if let Some(name) = get(ENV_NAME) {
        config.profile.name = name;
    }
    if let Some(stack) = get(ENV_STACK) {
        config.profile.stack = stack;
    }
    if let Some(url) = get(ENV_FACT_URL) {
        config.facts.url = url;
    }
    if let Some(port) = get(ENV_PORT) {
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{}:{}", host, port.trim());
    }
}

/// Load configuration: defaults, then the optional file, then the process
/// environment (including a `.env` file if present). The result is validated.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => ServerConfig::default(),
    };

    check_dotenv(dotenvy::dotenv())?;
    apply_env(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Accept a missing `.env`; reject one that exists but does not parse.
///
/// Runs before logging is initialised, so failures are returned rather than
/// logged.
fn check_dotenv<T>(result: dotenvy::Result<T>) -> Result<(), ConfigError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::Dotenv(e)),
    }
}
