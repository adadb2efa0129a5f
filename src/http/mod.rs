//! HTTP host subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum/hyper, tracing + timeout layers)
//!     → request.rs (buffer body up to the configured limit)
//!     → blocking pool: Engine::serve_http (synchronous chain)
//!     → response.rs (ResponseWriter → Response<Body>)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use request::{buffer_request, rejection_status};
pub use response::ResponseWriter;
pub use server::HttpServer;
