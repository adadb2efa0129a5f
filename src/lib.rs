//! Minimal HTTP request-dispatch layer.
//!
//! Routes are registered on prefix-scoped groups, each group carrying its
//! own middleware. Every request runs the middleware of all groups whose
//! prefix matches its path, followed by the matched route handler, in a
//! single onion-shaped pass driven by [`Context::next`].

pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod middleware;
pub mod observability;
pub mod render;
pub mod routing;

pub use config::ServerConfig;
pub use dispatch::{Context, Engine, Handler, RouteGroup};
pub use error::Error;
pub use http::{HttpServer, ResponseWriter};
pub use lifecycle::Shutdown;
