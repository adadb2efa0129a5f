//! Middleware library.
//!
//! Each constructor returns a [`Handler`](crate::Handler) meant for
//! `use_middleware`. They all wrap [`Context::next`](crate::Context::next)
//! and never stop the chain on their own, except recovery after a panic.

pub mod logger;
pub mod recovery;
pub mod request_id;

pub use logger::logger;
pub use recovery::recovery;
pub use request_id::{request_id, X_REQUEST_ID};
