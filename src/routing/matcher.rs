//! The seam between dispatch and route lookup.

use axum::http::Method;

use crate::dispatch::{Context, Handler};
use crate::error::Error;

/// Outcome of [`Matcher::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A route was found and the chain has been executed.
    Matched,
    /// No route for this method and path; nothing was executed.
    Unmatched,
}

/// Maps `(method, path)` to a registered handler.
pub trait Matcher: Send + Sync {
    /// Register `handler` for `method` and an absolute `pattern`.
    fn register(&mut self, method: Method, pattern: &str, handler: Handler) -> Result<(), Error>;

    /// Look up the context's method and path.
    ///
    /// On a match, implementations write the captured path parameters into
    /// the context, append the route handler to its chain and start the
    /// chain with [`Context::next`]. On a miss they leave the context
    /// untouched.
    fn resolve(&self, c: &mut Context<'_>) -> Resolution;
}
