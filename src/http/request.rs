//! Inbound request preparation.
//!
//! # Responsibilities
//! - Buffer the request body up to the configured limit
//! - Hand the engine a plain `Request<Bytes>` so dispatch never awaits
//!
//! # Design Decisions
//! - Bodies over the limit are rejected before any handler runs (413);
//!   bodies that fail to arrive at all are a client error (400)
//! - Request parts (method, URI, headers, extensions) pass through as-is

use std::error::Error as _;

use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use http_body_util::LengthLimitError;

/// Collect the body of `request`, failing if it exceeds `limit` bytes.
pub async fn buffer_request(
    request: Request<Body>,
    limit: usize,
) -> Result<Request<Bytes>, axum::Error> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, limit).await?;
    Ok(Request::from_parts(parts, bytes))
}

/// Status answering a body [`buffer_request`] could not collect.
pub fn rejection_status(err: &axum::Error) -> StatusCode {
    let over_limit = err
        .source()
        .is_some_and(|source| source.is::<LengthLimitError>());
    if over_limit {
        StatusCode::PAYLOAD_TOO_LARGE
    } else {
        StatusCode::BAD_REQUEST
    }
}
