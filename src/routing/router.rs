//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store registered routes, one radix tree per method
//! - Translate `:name` / `*name` patterns into tree syntax
//! - Resolve a request to its handler and path parameters
//!
//! # Design Decisions
//! - Immutable after startup (thread-safe without locks)
//! - Trees come from `matchit`, the same radix tree axum routes with
//! - Explicit `Unmatched` rather than a silent default route

use std::collections::HashMap;

use axum::http::Method;

use crate::dispatch::{Context, Handler};
use crate::error::Error;
use crate::routing::{Matcher, Resolution};

/// Name given to a bare `*` catch-all.
const DEFAULT_WILDCARD: &str = "wildcard";

/// Default [`Matcher`]: per-method radix trees.
#[derive(Default)]
pub struct Router {
    trees: HashMap<Method, matchit::Router<Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the handler and captured parameters for `method` and `path`.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<(Handler, Vec<(String, String)>)> {
        let matched = self.trees.get(method)?.at(path).ok()?;
        let params = matched
            .params
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Some((matched.value.clone(), params))
    }
}

impl Matcher for Router {
    fn register(&mut self, method: Method, pattern: &str, handler: Handler) -> Result<(), Error> {
        let tree = self.trees.entry(method.clone()).or_insert_with(matchit::Router::new);
        tree.insert(tree_pattern(pattern), handler)
            .map_err(|source| Error::Route {
                method: method.to_string(),
                pattern: pattern.to_string(),
                source,
            })
    }

    fn resolve(&self, c: &mut Context<'_>) -> Resolution {
        let Some((handler, params)) = self.lookup(c.method(), c.path()) else {
            return Resolution::Unmatched;
        };
        for (key, value) in params {
            c.set_param(key, value);
        }
        c.push_handler(handler);
        c.next();
        Resolution::Matched
    }
}

/// Rewrite `/users/:id/*rest` as `/users/{id}/{*rest}`.
///
/// Literal braces are escaped. Nothing after a catch-all segment is kept.
fn tree_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 4);
    for (i, segment) in pattern.split('/').enumerate() {
        if i > 0 {
            out.push('/');
        }
        if let Some(name) = segment.strip_prefix(':') {
            out.push('{');
            out.push_str(name);
            out.push('}');
        } else if let Some(name) = segment.strip_prefix('*') {
            let name = if name.is_empty() { DEFAULT_WILDCARD } else { name };
            out.push_str("{*");
            out.push_str(name);
            out.push('}');
            break;
        } else {
            for ch in segment.chars() {
                match ch {
                    '{' => out.push_str("{{"),
                    '}' => out.push_str("}}"),
                    _ => out.push(ch),
                }
            }
        }
    }
    out
}
