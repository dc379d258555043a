//! Configuration validation.
//!
//! Serde handles syntax; this module checks the values make sense together.
//! All problems are collected so a bad config reports everything at once.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("timeouts.request_ms must be greater than zero")]
    ZeroDeadline,

    #[error("facts.url `{url}` is invalid: {reason}")]
    FactUrl { url: String, reason: String },
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_ms == 0 {
        errors.push(ValidationError::ZeroDeadline);
    }

    match url::Url::parse(&config.facts.url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => errors.push(ValidationError::FactUrl {
            url: config.facts.url.clone(),
            reason: format!("unsupported scheme `{}`", parsed.scheme()),
        }),
        Err(e) => errors.push(ValidationError::FactUrl {
            url: config.facts.url.clone(),
            reason: e.to_string(),
        }),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
