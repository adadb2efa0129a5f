//! Template rendering subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     template files (glob) → templates.rs (HtmlTemplates::load_glob)
//!     → Engine::set_template_service
//!
//! Dispatch:
//!     Context::html(status, name, data)
//!     → Engine::render (data → JSON value)
//!     → TemplateService::render
//!         Ok(markup) → text/html response
//!         Err(_)     → 500 Internal Server Error
//! ```
//!
//! # Design Decisions
//! - Rendering finishes before the response is committed
//! - Template data crosses the seam as `serde_json::Value`, any
//!   `Serialize` type can be rendered

pub mod templates;

pub use templates::{HtmlTemplates, TemplateService};
