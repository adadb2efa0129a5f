//! Crate-wide error type.
//!
//! Only start-up operations (route registration, template loading,
//! configuration) return these. Failures during request dispatch are
//! converted into responses and never escape as `Error`.

use thiserror::Error;

use crate::config::loader::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    /// A route pattern was malformed or conflicts with an existing route.
    #[error("invalid route `{method} {pattern}`: {source}")]
    Route {
        method: String,
        pattern: String,
        #[source]
        source: matchit::InsertError,
    },

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("no template service configured")]
    TemplatesNotLoaded,

    #[error("failed to serialize response data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid glob pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("pattern `{0}` matches no files")]
    EmptyGlob(String),

    #[error("failed to read glob entry: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
