//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid config.

use serde::{Deserialize, Serialize};

/// Root configuration for the profile server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Request deadline enforced by the lifecycle guard.
    pub timeouts: TimeoutConfig,

    /// Per-route behaviour.
    pub routes: RoutesConfig,

    /// Profile returned by `/me`.
    pub profile: ProfileConfig,

    /// Outbound fact provider.
    pub facts: FactsConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request deadline in milliseconds. Once elapsed, the request is
    /// answered with 504 and any later handler result is discarded.
    pub request_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_ms: 5_000 }
    }
}

/// Route behaviour configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Delay before `GET /` answers, in milliseconds.
    ///
    /// Longer than the default request deadline, so the root route times out
    /// unless one of the two values is changed.
    pub root_delay_ms: u64,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self { root_delay_ms: 6_000 }
    }
}

/// Profile data exposed on `/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub email: String,
    pub name: String,
    pub stack: String,
}

pub const DEFAULT_EMAIL: &str = "emailexample@gmail.com";
pub const DEFAULT_NAME: &str = "Your fullname";
pub const DEFAULT_STACK: &str = "Your stack eg. Node.js/Express";

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL.to_string(),
            name: DEFAULT_NAME.to_string(),
            stack: DEFAULT_STACK.to_string(),
        }
    }
}

/// Fact provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FactsConfig {
    /// Endpoint returning a JSON object with a `fact` string.
    pub url: String,
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            url: "https://catfact.ninja/fact".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,

    /// Output format of the fmt layer.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "profile_server=debug,tower_http=debug".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.timeouts.request_ms, 5_000);
        assert_eq!(config.routes.root_delay_ms, 6_000);
        assert_eq!(config.profile, ProfileConfig::default());
        assert_eq!(config.facts.url, "https://catfact.ninja/fact");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [profile]
            name = "Ada Lovelace"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.profile.name, "Ada Lovelace");
        assert_eq!(config.profile.email, DEFAULT_EMAIL);
        assert_eq!(config.profile.stack, DEFAULT_STACK);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
