//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main):
//!     Load config → Init logging → Build engine → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → Shutdown::trigger → server stops accepting → drain → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
