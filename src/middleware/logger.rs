//! Request logging.

use std::time::Instant;

use axum::http::StatusCode;

use crate::dispatch::Handler;

/// Log status, URI and latency of every request once the rest of the chain
/// has run.
pub fn logger() -> Handler {
    Handler::new(|c| {
        let start = Instant::now();
        c.next();
        let status = c.writer().status().unwrap_or(StatusCode::OK);
        tracing::info!(
            status = status.as_u16(),
            method = %c.method(),
            uri = %c.request().uri(),
            elapsed = ?start.elapsed(),
            "Request completed"
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Engine;
    use crate::http::ResponseWriter;
    use axum::body::Bytes;
    use axum::http::Request;

    #[test]
    fn test_logger_passes_control() {
        let mut engine = Engine::new();
        engine.use_middleware([logger()]);
        engine.get("/", |c| c.string(StatusCode::OK, "home"));

        let request = Request::builder().uri("/").body(Bytes::new()).unwrap();
        let mut writer = ResponseWriter::new();
        engine.serve_http(&request, &mut writer);

        assert_eq!(writer.status(), Some(StatusCode::OK));
        assert_eq!(writer.body(), b"home");
    }
}
