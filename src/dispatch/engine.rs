//! Engine: registration root and per-request dispatch.

use std::path::PathBuf;

use axum::body::{Body, Bytes};
use axum::http::{Method, Request, Response, StatusCode};
use minijinja::Environment;
use serde::Serialize;

use crate::dispatch::{Context, GroupId, GroupRegistry, Handler, RouteGroup};
use crate::error::Error;
use crate::http::ResponseWriter;
use crate::middleware::{logger, recovery};
use crate::render::{HtmlTemplates, TemplateService};
use crate::routing::{Matcher, Resolution, Router};

/// Owns every route group, the route matcher and the template service.
///
/// Set it up first (groups, middleware, routes, templates), then share it
/// read-only between concurrently handled requests, e.g. behind an `Arc`.
/// The engine itself acts as the root group with prefix `""`.
pub struct Engine {
    groups: GroupRegistry,
    matcher: Box<dyn Matcher>,
    templates: Option<Box<dyn TemplateService>>,
    template_setup: Option<Box<TemplateSetup>>,
}

type TemplateSetup = dyn Fn(&mut Environment<'static>) + Send + Sync;

impl Engine {
    pub fn new() -> Self {
        Self::with_matcher(Box::new(Router::new()))
    }

    /// An engine routing through a custom [`Matcher`].
    pub fn with_matcher(matcher: Box<dyn Matcher>) -> Self {
        Self {
            groups: GroupRegistry::new(),
            matcher,
            templates: None,
            template_setup: None,
        }
    }

    /// An engine with request logging and panic recovery installed on the
    /// root group.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.use_middleware([logger(), recovery()]);
        engine
    }

    pub fn root(&mut self) -> RouteGroup<'_> {
        RouteGroup::new(self, GroupId::ROOT)
    }

    /// Create a top-level group.
    pub fn group(&mut self, prefix: &str) -> RouteGroup<'_> {
        let id = self.groups.create(GroupId::ROOT, prefix);
        RouteGroup::new(self, id)
    }

    /// Middleware applying to every request.
    pub fn use_middleware(&mut self, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.root().use_middleware(handlers);
        self
    }

    /// # Panics
    ///
    /// If the pattern is malformed or conflicts with an existing route.
    pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.root().add_route(method, pattern, handler);
        self
    }

    pub fn try_add_route(&mut self, method: Method, pattern: &str, handler: Handler) -> Result<(), Error> {
        self.root().try_add_route(method, pattern, handler)
    }

    pub fn get<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::GET, pattern, handler)
    }

    pub fn post<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(Method::POST, pattern, handler)
    }

    pub fn static_files(&mut self, relative_path: &str, root: impl Into<PathBuf>) -> &mut Self {
        self.root().static_files(relative_path, root);
        self
    }

    /// All groups, root first, in creation order.
    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    pub(crate) fn groups_mut(&mut self) -> &mut GroupRegistry {
        &mut self.groups
    }

    pub(crate) fn matcher_mut(&mut self) -> &mut dyn Matcher {
        self.matcher.as_mut()
    }

    pub fn set_template_service(&mut self, service: impl TemplateService + 'static) {
        self.templates = Some(Box::new(service));
    }

    /// Register functions and filters for templates loaded afterwards with
    /// [`Engine::load_html_glob`].
    pub fn set_template_functions<F>(&mut self, setup: F)
    where
        F: Fn(&mut Environment<'static>) + Send + Sync + 'static,
    {
        self.template_setup = Some(Box::new(setup));
    }

    /// Load every template matching a glob pattern, replacing the current
    /// template service. Functions from
    /// [`Engine::set_template_functions`] are available to them.
    pub fn load_html_glob(&mut self, pattern: &str) -> Result<(), Error> {
        let mut templates = HtmlTemplates::new();
        if let Some(setup) = &self.template_setup {
            setup(templates.env_mut());
        }
        let count = templates.load_glob(pattern)?;
        tracing::info!(pattern = %pattern, templates = count, "HTML templates loaded");
        self.set_template_service(templates);
        Ok(())
    }

    /// Render a template with the configured template service.
    pub fn render<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Result<String, Error> {
        let service = self.templates.as_deref().ok_or(Error::TemplatesNotLoaded)?;
        let data = serde_json::to_value(data)?;
        service.render(name, &data)
    }

    /// Dispatch one request, writing the outcome to `writer`.
    ///
    /// Middleware of every group whose prefix starts the request path runs
    /// outer-to-inner, then the route handler. When no route matches, the
    /// answer is a plain 404 and no middleware runs.
    pub fn serve_http(&self, request: &Request<Bytes>, writer: &mut ResponseWriter) {
        let mut c = Context::new(request, writer, self);
        let chain = self.groups.middleware_for(c.path());
        c.extend_handlers(chain);

        tracing::debug!(
            method = %c.method(),
            path = %c.path(),
            middleware = c.handler_count(),
            "Dispatching request"
        );

        if self.matcher.resolve(&mut c) == Resolution::Unmatched {
            c.clear_handlers();
            let body = format!("404 NOT FOUND: {}\n", c.path());
            c.string(StatusCode::NOT_FOUND, body);
        }
    }

    /// Dispatch one request and return the buffered response.
    pub fn handle(&self, request: Request<Bytes>) -> Response<Body> {
        let mut writer = ResponseWriter::new();
        self.serve_http(&request, &mut writer);
        writer.into_response()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
