//! The single handler capability shared by routes and middleware.

use std::fmt;
use std::sync::Arc;

use crate::dispatch::Context;

/// A route handler, middleware or recovery hook.
///
/// All of them are the same thing: a function over the request
/// [`Context`] that acts only through side effects on it. Middleware
/// calls [`Context::next`] to run the rest of the chain; a handler that
/// returns without calling it ends the chain.
#[derive(Clone)]
pub struct Handler(Arc<dyn Fn(&mut Context<'_>) + Send + Sync>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the handler on a context.
    pub fn call(&self, c: &mut Context<'_>) {
        (self.0)(c)
    }

    /// Whether both values wrap the same function instance.
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler")
            .field(&Arc::as_ptr(&self.0))
            .finish()
    }
}
