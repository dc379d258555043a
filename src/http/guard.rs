//! Request lifecycle guard.
//!
//! Wraps every route with a fixed deadline. The handler runs in its own task
//! and hands its response to the per-request [`RequestContext`]; the guard
//! waits for that response or for the deadline, whichever comes first.
//!
//! On deadline the handler is *not* cancelled. Its task keeps running and its
//! eventual response is discarded by [`RequestContext::safe_send`]. Handler
//! failures (error responses and panics) are routed through the error mapper
//! here, so each request logs at most one failure and writes exactly one
//! response.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::oneshot;
use tokio::task::JoinError;

use crate::http::context::RequestContext;
use crate::http::error::{report, ApiError, MappedError};
use crate::http::request::RequestIdExt;

/// Guard settings shared by all requests.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleGuard {
    deadline: Duration,
}

impl LifecycleGuard {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

/// Middleware enforcing the deadline and the single-response rule.
pub async fn lifecycle_guard(
    State(guard): State<LifecycleGuard>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = request.request_id().to_string();
    let (ctx, mut delivered) = RequestContext::new();

    let handler_ctx = Arc::clone(&ctx);
    let handler_request_id = request_id.clone();
    tokio::spawn(async move {
        let response = match tokio::spawn(next.run(request)).await {
            Ok(response) => response,
            Err(e) => ApiError::Handler(describe_join_error(e)).into_response(),
        };
        deliver(&handler_ctx, response, &handler_request_id);
    });

    let deadline = tokio::time::sleep(guard.deadline());
    tokio::select! {
        biased;
        result = &mut delivered => return settle(result, &request_id),
        _ = deadline => {}
    }

    if ctx.expire() {
        tracing::warn!(
            request_id = %request_id,
            deadline_ms = guard.deadline().as_millis() as u64,
            "Request deadline elapsed; handler result will be discarded"
        );
        let err = ApiError::Timeout;
        report(
            &request_id,
            &MappedError {
                kind: err.kind(),
                message: err.to_string(),
            },
        );
        return err.into_response();
    }

    // The handler committed its response just before the deadline fired.
    settle(delivered.await, &request_id)
}

/// Hand a finished handler response to the context, logging failures once.
fn deliver(ctx: &RequestContext, response: Response, request_id: &str) {
    let failure = response.extensions().get::<MappedError>().cloned();
    let status = response.status();

    if ctx.safe_send(response) {
        if let Some(failure) = failure {
            report(request_id, &failure);
        }
        return;
    }

    match failure {
        Some(failure) => tracing::debug!(
            request_id = %request_id,
            error = %failure.message,
            "Suppressed handler failure; response already finalized"
        ),
        None => tracing::debug!(
            request_id = %request_id,
            status = status.as_u16(),
            "Suppressed handler response; response already finalized"
        ),
    }
}

fn settle(result: Result<Response, oneshot::error::RecvError>, request_id: &str) -> Response {
    match result {
        Ok(response) => response,
        Err(_) => {
            let err = ApiError::Handler("response channel closed".to_string());
            report(
                request_id,
                &MappedError {
                    kind: err.kind(),
                    message: err.to_string(),
                },
            );
            err.into_response()
        }
    }
}

fn describe_join_error(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        format!("panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {}", msg)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tower::ServiceExt;

    const DEADLINE: Duration = Duration::from_secs(5);

    fn guarded(router: Router) -> Router {
        router.layer(middleware::from_fn_with_state(
            LifecycleGuard::new(DEADLINE),
            lifecycle_guard,
        ))
    }

    async fn call(app: Router, path: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn fast_handler_passes_through() {
        let app = guarded(Router::new().route("/", get(|| async { "ok" })));

        let (status, body) = call(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_handler_times_out_but_keeps_running() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let app = guarded(Router::new().route(
            "/",
            get(move || {
                let flag = flag.clone();
                async move {
                    tokio::time::sleep(Duration::from_secs(6)).await;
                    flag.store(true, Ordering::SeqCst);
                    "late"
                }
            }),
        ));

        let (status, body) = call(app, "/").await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body, r#"{"error":"Request timed out"}"#);
        assert!(!finished.load(Ordering::SeqCst));

        // Fire-and-suppress: the handler is still running after the 504.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn handler_error_is_mapped_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let app = guarded(Router::new().route(
            "/",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<&'static str, _>(ApiError::Handler("db down".into()))
                }
            }),
        ));

        let (status, body) = call(app, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"error":"Internal server error"}"#);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn handler_panic_becomes_500() {
        async fn explode() -> &'static str {
            panic!("handler exploded")
        }
        let app = guarded(Router::new().route("/", get(explode)));

        let (status, body) = call(app, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"error":"Internal server error"}"#);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_failure_after_deadline_is_suppressed() {
        let app = guarded(Router::new().route(
            "/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Err::<&'static str, _>(ApiError::Handler("too late".into()))
            }),
        ));

        let (status, body) = call(app, "/").await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body, r#"{"error":"Request timed out"}"#);
    }

    #[test]
    fn panic_payloads_are_described() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let err = rt
            .block_on(rt.spawn(async { panic!("bad {}", 42) }))
            .unwrap_err();
        assert_eq!(describe_join_error(err), "panicked: bad 42");
    }
}
