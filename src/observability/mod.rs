//! Observability subsystem.
//!
//! Structured logging only. Every log line about a request carries its
//! `request_id`; HTTP-level spans come from `tower_http::trace`.

pub mod logging;

pub use logging::init_logging;
