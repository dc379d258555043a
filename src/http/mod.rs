//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layer stack)
//!     → request.rs (assign x-request-id)
//!     → response.rs (CORS headers on the way out)
//!     → guard.rs (deadline + single-response rule, error mapping)
//!     → handlers.rs (`/`, `/me`, 404 fallback)
//!     → Send to client
//! ```

pub mod context;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use context::RequestContext;
pub use error::ApiError;
pub use guard::LifecycleGuard;
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
