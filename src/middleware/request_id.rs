//! Request ID propagation.

use uuid::Uuid;

use crate::dispatch::Handler;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Echo the caller's `x-request-id`, or a fresh UUID v4, on the response.
pub fn request_id() -> Handler {
    Handler::new(|c| {
        let id = c
            .request()
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        c.set_header(X_REQUEST_ID, &id);
        c.next();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Engine;
    use crate::http::ResponseWriter;
    use axum::body::Bytes;
    use axum::http::{Request, StatusCode};

    fn engine() -> Engine {
        let mut engine = Engine::new();
        engine.use_middleware([request_id()]);
        engine.get("/", |c| c.string(StatusCode::OK, "ok"));
        engine
    }

    #[test]
    fn test_propagates_incoming_id() {
        let request = Request::builder()
            .uri("/")
            .header(X_REQUEST_ID, "abc-123")
            .body(Bytes::new())
            .unwrap();
        let mut writer = ResponseWriter::new();
        engine().serve_http(&request, &mut writer);

        assert_eq!(writer.headers().get(X_REQUEST_ID).unwrap(), "abc-123");
    }

    #[test]
    fn test_generates_id() {
        let request = Request::builder().uri("/").body(Bytes::new()).unwrap();
        let mut writer = ResponseWriter::new();
        engine().serve_http(&request, &mut writer);

        let id = writer.headers().get(X_REQUEST_ID).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }
}
