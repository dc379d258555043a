//! Route handlers.
//!
//! Handlers only produce a result or fail. Deadlines, duplicate-write
//! suppression and failure logging belong to the lifecycle guard.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;

pub const ROOT_BODY: &str = "Hello World!";

/// `GET /` answers after the configured delay.
pub async fn root(State(state): State<AppState>, headers: HeaderMap) -> &'static str {
    tokio::time::sleep(state.root_delay).await;
    tracing::debug!(
        request_id = %headers.request_id(),
        delay_ms = state.root_delay.as_millis() as u64,
        "Root handler finished"
    );
    ROOT_BODY
}

/// Profile fields as returned on `/me`.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub stack: String,
}

/// Body of a successful `/me` response.
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub status: &'static str,
    pub user: UserProfile,
    pub timestamp: String,
    pub fact: String,
}

/// `GET /me` combines the configured profile with one fetched fact.
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, ApiError> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let fact = state.facts.fetch().await?;

    tracing::debug!(request_id = %headers.request_id(), "Profile assembled");

    Ok(Json(MeResponse {
        status: "success",
        user: UserProfile {
            email: state.profile.email.clone(),
            name: state.profile.name.clone(),
            stack: state.profile.stack.clone(),
        },
        timestamp,
        fact,
    }))
}

#[derive(Debug, Serialize)]
pub struct NotFoundBody {
    pub status: &'static str,
    pub error: &'static str,
}

/// Fallback for any path no route claimed.
pub async fn not_found() -> (StatusCode, Json<NotFoundBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            status: "Fail",
            error: "Route not found",
        }),
    )
}
