//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (Request<Bytes>, ResponseWriter)
//!     → engine.rs (build Context, collect middleware of every group
//!       whose prefix matches the path, in group creation order)
//!     → routing (Matcher resolves method + path)
//!         matched   → append route handler, fill params, Context::next()
//!         unmatched → 404, no handler runs
//!     → context.rs (onion execution: pre-work, next(), post-work)
//!     → ResponseWriter
//!
//! Registration (at startup):
//!     Engine (root group, prefix "")
//!     → group.rs (child groups, middleware, routes)
//!     → GroupRegistry (flat, creation-ordered, frozen once serving)
//! ```
//!
//! # Design Decisions
//! - Scope resolution is a linear scan over the flat registry; parent
//!   links are never walked at dispatch time
//! - Prefix matching is a literal string prefix test
//! - The Engine is shared read-only across concurrent requests
//! - A Context belongs to exactly one request and never outlives it

pub mod context;
pub mod engine;
pub mod group;
pub mod handler;

pub use context::Context;
pub use engine::Engine;
pub use group::{GroupEntry, GroupId, GroupRegistry, RouteGroup};
pub use handler::Handler;
