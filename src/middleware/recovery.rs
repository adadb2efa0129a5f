//! Panic recovery.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use axum::http::StatusCode;

use crate::dispatch::Handler;

/// Run the rest of the chain, turning a panic into a 500 response.
///
/// The panic message is logged and the chain is aborted.
pub fn recovery() -> Handler {
    Handler::new(|c| {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| c.next())) {
            tracing::error!(
                method = %c.method(),
                path = %c.path(),
                panic = %panic_message(payload.as_ref()),
                "Recovered from handler panic"
            );
            c.abort();
            c.string(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
