//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (registration at info, dispatch at debug,
//!       render failures and recovered panics at error)
//!     → tower-http request spans (host layer)
//!
//! Consumers:
//!     → logging.rs (fmt subscriber to stdout)
//! ```

pub mod logging;
