//! Outbound fact provider integration.
//!
//! # Data Flow
//! ```text
//! GET /me handler
//!     → client.rs (single GET to the configured provider)
//!     → types.rs (decode `{ "fact": ... }`, classify failures)
//! ```
//!
//! # Constraints
//! - One attempt per request: no retries, no caching
//! - No client-side timeout; the lifecycle guard's deadline bounds the wait
//! - Any failure surfaces as `FactError` and becomes a 500 upstream

pub mod client;
pub mod types;

pub use client::FactClient;
pub use types::{FactError, FactPayload, FactResult};
