//! Buffered response writer.
//!
//! # Responsibilities
//! - Stage headers until the status line is committed
//! - Commit status exactly once (first write wins)
//! - Accumulate the body and hand it to the host as a `Response`
//!
//! # Design Decisions
//! - Writing a body before any status commits 200, like a socket would
//! - Header edits after the commit are dropped, the status line and
//!   headers are considered sent at that point

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode};

/// The response side of one request.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    headers: HeaderMap,
    status: Option<StatusCode>,
    body: Vec<u8>,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a header. Ignored once the status has been committed.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if self.is_committed() {
            tracing::debug!(header = %name, "Header set after status was written, ignoring");
            return;
        }
        self.headers.insert(name, value);
    }

    /// Commit the status line and staged headers.
    pub fn write_header(&mut self, status: StatusCode) {
        if let Some(current) = self.status {
            tracing::debug!(
                current = %current,
                attempted = %status,
                "Superfluous write_header call"
            );
            return;
        }
        self.status = Some(status);
    }

    /// Append to the body, committing 200 if no status was written yet.
    pub fn write(&mut self, bytes: &[u8]) {
        if !self.is_committed() {
            self.write_header(StatusCode::OK);
        }
        self.body.extend_from_slice(bytes);
    }

    pub fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    /// Committed status, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Convert into a host response. An untouched writer yields an empty 200.
    pub fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}
