//! Static file serving.
//!
//! # Responsibilities
//! - Build the `relative/*filepath` route for a mounted directory
//! - Map the captured path onto the root, refusing to escape it
//! - Serve files (and `index.html` for directories) with a content type
//!
//! # Design Decisions
//! - Missing files answer a bare 404, like the route-level not found
//! - No directory listings

use std::fs;
use std::path::{Component, Path, PathBuf};

use axum::http::StatusCode;

use crate::dispatch::{Context, Handler};

/// Route parameter holding the requested file.
pub const FILEPATH_PARAM: &str = "filepath";

const INDEX_FILE: &str = "index.html";

/// Route pattern serving everything below `relative_path`.
pub fn route_pattern(relative_path: &str) -> String {
    format!("{}/*{}", relative_path.trim_end_matches('/'), FILEPATH_PARAM)
}

/// Handler serving files below `root`.
pub fn handler(root: PathBuf) -> Handler {
    Handler::new(move |c| serve(c, &root))
}

fn serve(c: &mut Context<'_>, root: &Path) {
    let Some(path) = resolve(root, c.param(FILEPATH_PARAM)) else {
        c.status(StatusCode::NOT_FOUND);
        return;
    };

    match fs::read(&path) {
        Ok(contents) => {
            c.set_header("content-type", content_type(&path));
            c.data(StatusCode::OK, contents);
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Failed to read static file");
            c.status(StatusCode::NOT_FOUND);
        }
    }
}

/// File under `root` for a request path, if it exists and stays inside.
fn resolve(root: &Path, requested: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for component in Path::new(requested).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if path.is_dir() {
        path.push(INDEX_FILE);
    }
    path.is_file().then_some(path)
}

fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("wasm") => "application/wasm",
        Some("pdf") => "application/pdf",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
