//! Per-request lifecycle state.
//!
//! A [`RequestContext`] is shared between the lifecycle guard and the task
//! running the handler. It owns two flags that only ever go from `false` to
//! `true`, plus the single-use channel the winning response travels through.
//!
//! ```text
//!   handler task ──safe_send──┐
//!                             ├──▶ response_sent (CAS false → true) ──▶ oneshot ──▶ guard
//!   deadline timer ──expire───┘
//! ```
//!
//! Whichever side flips `response_sent` first owns the response. The loser's
//! write is dropped without error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use tokio::sync::oneshot;

/// Transient state for a single inbound request.
#[derive(Debug)]
pub struct RequestContext {
    deadline_expired: AtomicBool,
    response_sent: AtomicBool,
    responder: Mutex<Option<oneshot::Sender<Response>>>,
}

impl RequestContext {
    /// Create a context and the receiver on which the handler's response
    /// arrives, if it is allowed through.
    pub fn new() -> (Arc<Self>, oneshot::Receiver<Response>) {
        let (tx, rx) = oneshot::channel();
        let ctx = Arc::new(Self {
            deadline_expired: AtomicBool::new(false),
            response_sent: AtomicBool::new(false),
            responder: Mutex::new(Some(tx)),
        });
        (ctx, rx)
    }

    /// Whether the deadline has fired for this request.
    pub fn deadline_expired(&self) -> bool {
        self.deadline_expired.load(Ordering::Acquire)
    }

    /// Whether a response has already been committed for this request.
    pub fn response_sent(&self) -> bool {
        self.response_sent.load(Ordering::Acquire)
    }

    /// Forward `response` to the caller unless the request is already
    /// finalized.
    ///
    /// A no-op once the deadline has expired or a response has been sent.
    /// Returns `true` only for the call that committed the response.
    pub fn safe_send(&self, response: Response) -> bool {
        if self.deadline_expired() || !self.claim() {
            return false;
        }

        let sender = self
            .responder
            .lock()
            .ok()
            .and_then(|mut slot| slot.take());

        match sender {
            // The receiver is gone when the client disconnected first.
            Some(tx) => tx.send(response).is_ok(),
            None => false,
        }
    }

    /// Mark the deadline as expired.
    ///
    /// Returns `true` if the timeout now owns the response, `false` if a
    /// handler response was committed before the deadline fired.
    pub fn expire(&self) -> bool {
        self.deadline_expired.store(true, Ordering::Release);
        self.claim()
    }

    fn claim(&self) -> bool {
        self.response_sent
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
