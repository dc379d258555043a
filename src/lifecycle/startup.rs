//! Process-wide failure supervision.
//!
//! A panic inside a request task is caught by the runtime and turned into a
//! 500 by the lifecycle guard; the process keeps serving. This hook makes
//! sure every such panic, and any panic outside a request, is logged with its
//! location instead of going to raw stderr.

use std::panic;
use std::sync::Once;

static INSTALL: Once = Once::new();

/// Install the panic-logging hook. Later calls are no-ops.
pub fn install_failure_supervisor() {
    INSTALL.call_once(|| {
        panic::set_hook(Box::new(|info| {
            let payload = info.payload();
            let message = payload
                .downcast_ref::<&'static str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("<non-string panic payload>");
            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "<unknown>".to_string());
            let thread = std::thread::current();

            tracing::error!(
                panic.message = %message,
                panic.location = %location,
                thread = thread.name().unwrap_or("<unnamed>"),
                "Uncaught panic; process continues"
            );
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supervisor_logs_and_unwinding_continues() {
        install_failure_supervisor();
        install_failure_supervisor();

        let result = panic::catch_unwind(|| panic!("supervised"));
        assert!(result.is_err());
    }
}
