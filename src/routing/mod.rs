//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     RouteGroup (prefix + relative pattern, e.g. "/v1" + "/hello/:name")
//!     → matcher.rs (Matcher::register)
//!     → router.rs (pattern → radix tree per method)
//!
//! Dispatch:
//!     Context (method, path, middleware chain)
//!     → Matcher::resolve
//!         matched   → params written, route handler appended, chain started
//!         unmatched → caller answers 404
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - One radix tree per method, lookup is O(path length)
//! - `:name` captures one segment, `*name` captures the rest of the path
//! - Conflicting routes are rejected at registration, never shadowed

pub mod matcher;
pub mod router;

pub use matcher::{Matcher, Resolution};
pub use router::Router;
