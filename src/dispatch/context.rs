//! Per-request state and chain execution.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::{header, HeaderName, HeaderValue, Method, Request, StatusCode};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use url::form_urlencoded;

use crate::dispatch::{Engine, Handler};
use crate::http::ResponseWriter;

/// State of one request while its handler chain executes.
///
/// The context borrows the raw request, the response writer and the
/// [`Engine`] for as long as the request is being dispatched. It is never
/// shared with another request.
pub struct Context<'a> {
    request: &'a Request<Bytes>,
    writer: &'a mut ResponseWriter,
    method: Method,
    /// Percent-decoded request path.
    path: String,

    params: HashMap<String, String>,

    handlers: Vec<Handler>,
    /// Number of handlers entered so far. Only ever grows.
    cursor: usize,

    engine: &'a Engine,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        request: &'a Request<Bytes>,
        writer: &'a mut ResponseWriter,
        engine: &'a Engine,
    ) -> Self {
        Self {
            method: request.method().clone(),
            path: decode_path(request.uri().path()),
            request,
            writer,
            params: HashMap::new(),
            handlers: Vec::new(),
            cursor: 0,
            engine,
        }
    }

    /// Run the next handler of the chain.
    ///
    /// Work a handler does before calling `next` happens before every later
    /// handler; work after it happens once all of them have returned. A
    /// handler that returns without calling `next` ends the chain: nothing
    /// after it runs for this request. Once the chain is finished, calling
    /// `next` again does nothing.
    pub fn next(&mut self) {
        let index = self.cursor;
        let Some(handler) = self.handlers.get(index).cloned() else {
            return;
        };
        self.cursor += 1;
        handler.call(self);
        if self.cursor == index + 1 {
            // The handler did not pass control on.
            self.abort();
        }
    }

    /// Finish the chain now. Handlers that have not started will not run.
    pub fn abort(&mut self) {
        self.cursor = self.cursor.max(self.handlers.len());
    }

    /// Whether every handler of the chain has been entered or the chain was
    /// cut short.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.handlers.len()
    }

    /// Append a handler to the end of the chain.
    pub fn push_handler(&mut self, handler: Handler) {
        self.handlers.push(handler);
    }

    pub(crate) fn extend_handlers(&mut self, handlers: impl IntoIterator<Item = Handler>) {
        self.handlers.extend(handlers);
    }

    pub(crate) fn clear_handlers(&mut self) {
        self.handlers.clear();
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn request(&self) -> &Request<Bytes> {
        self.request
    }

    pub fn writer(&self) -> &ResponseWriter {
        &*self.writer
    }

    pub fn writer_mut(&mut self) -> &mut ResponseWriter {
        &mut *self.writer
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path with percent-escapes decoded. Routing, group scoping
    /// and path parameters all see this form; `request().uri()` keeps
    /// the raw one.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn engine(&self) -> &Engine {
        self.engine
    }

    /// Status committed to the response, if any.
    pub fn status_code(&self) -> Option<StatusCode> {
        self.writer.status()
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Path parameter captured by the matched route; empty when absent.
    pub fn param(&self, key: &str) -> &str {
        self.params.get(key).map(String::as_str).unwrap_or_default()
    }

    /// First value of a query-string key; empty when absent.
    pub fn query(&self, key: &str) -> String {
        self.request
            .uri()
            .query()
            .and_then(|query| lookup_form(query.as_bytes(), key))
            .unwrap_or_default()
    }

    /// Form value from a url-encoded request body, falling back to the
    /// query string. Empty when absent.
    pub fn post_form(&self, key: &str) -> String {
        let is_form = self
            .request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            if let Some(value) = lookup_form(self.request.body(), key) {
                return value;
            }
        }
        self.query(key)
    }

    /// Commit the response status. Only the first status sticks.
    pub fn status(&mut self, status: StatusCode) {
        self.writer.write_header(status);
    }

    pub fn set_header(&mut self, key: &str, value: &str) {
        let name = match HeaderName::from_bytes(key.as_bytes()) {
            Ok(name) => name,
            Err(_) => {
                tracing::warn!(header = %key, "Ignoring invalid header name");
                return;
            }
        };
        match HeaderValue::from_str(value) {
            Ok(value) => self.writer.set_header(name, value),
            Err(_) => tracing::warn!(header = %key, "Ignoring invalid header value"),
        }
    }

    /// Write a plain-text response.
    pub fn string(&mut self, status: StatusCode, body: impl AsRef<str>) {
        self.set_header("content-type", "text/plain");
        self.status(status);
        self.writer.write(body.as_ref().as_bytes());
    }

    /// Write `obj` as a newline-terminated JSON document.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, obj: &T) {
        match serde_json::to_vec(obj) {
            Ok(mut body) => {
                body.push(b'\n');
                self.set_header("content-type", "application/json");
                self.status(status);
                self.writer.write(&body);
            }
            Err(err) => {
                tracing::error!(path = %self.path, error = %err, "JSON encoding failed");
                self.string(StatusCode::INTERNAL_SERVER_ERROR, err.to_string());
            }
        }
    }

    /// Write raw bytes.
    pub fn data(&mut self, status: StatusCode, data: impl AsRef<[u8]>) {
        self.status(status);
        self.writer.write(data.as_ref());
    }

    /// Render a template through the engine's template service.
    ///
    /// Rendering completes before anything is written, so a failure turns
    /// into a plain 500 response instead of a half-written page.
    pub fn html<T: Serialize + ?Sized>(&mut self, status: StatusCode, name: &str, data: &T) {
        match self.engine.render(name, data) {
            Ok(markup) => {
                self.set_header("content-type", "text/html");
                self.status(status);
                self.writer.write(markup.as_bytes());
            }
            Err(err) => {
                tracing::error!(template = %name, error = %err, "Template rendering failed");
                self.string(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
            }
        }
    }
}

/// Invalid UTF-8 after decoding is replaced rather than rejected.
fn decode_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

fn lookup_form(input: &[u8], key: &str) -> Option<String> {
    form_urlencoded::parse(input)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
