//! Prefix-scoped route groups.

use std::path::PathBuf;

use axum::http::Method;

use crate::dispatch::{Context, Engine, Handler};
use crate::error::Error;
use crate::http::static_files;

/// Index of a group inside its engine's [`GroupRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

impl GroupId {
    /// The engine's own group, prefix `""`.
    pub const ROOT: GroupId = GroupId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// One registered group: an absolute prefix and its middleware.
#[derive(Debug)]
pub struct GroupEntry {
    prefix: String,
    middlewares: Vec<Handler>,
    parent: Option<GroupId>,
}

impl GroupEntry {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn middlewares(&self) -> &[Handler] {
        &self.middlewares
    }

    /// Group this one was created from. Kept for inspection only.
    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }
}

/// Every group an engine ever created, in creation order.
///
/// Append-only while the application is being set up; read-only while
/// requests are served.
#[derive(Debug)]
pub struct GroupRegistry {
    groups: Vec<GroupEntry>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self {
            groups: vec![GroupEntry {
                prefix: String::new(),
                middlewares: Vec::new(),
                parent: None,
            }],
        }
    }

    /// Create a group whose prefix is `parent`'s prefix followed by
    /// `relative_prefix`. Duplicate and overlapping prefixes are allowed.
    pub fn create(&mut self, parent: GroupId, relative_prefix: &str) -> GroupId {
        let prefix = format!("{}{}", self.groups[parent.0].prefix, relative_prefix);
        let id = GroupId(self.groups.len());
        self.groups.push(GroupEntry {
            prefix,
            middlewares: Vec::new(),
            parent: Some(parent),
        });
        id
    }

    pub fn get(&self, id: GroupId) -> Option<&GroupEntry> {
        self.groups.get(id.0)
    }

    pub(crate) fn add_middleware(&mut self, id: GroupId, handlers: impl IntoIterator<Item = Handler>) {
        self.groups[id.0].middlewares.extend(handlers);
    }

    pub fn as_slice(&self) -> &[GroupEntry] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Middleware applying to `path`: the lists of all groups whose prefix
    /// is a literal prefix of the path, concatenated in creation order.
    pub fn middleware_for(&self, path: &str) -> Vec<Handler> {
        self.groups
            .iter()
            .filter(|group| path.starts_with(&group.prefix))
            .flat_map(|group| group.middlewares.iter().cloned())
            .collect()
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration handle for one group of an [`Engine`].
///
/// Routes registered here get the group's prefix prepended; middleware
/// registered here applies to every request whose path starts with it.
pub struct RouteGroup<'e> {
    engine: &'e mut Engine,
    id: GroupId,
}

impl<'e> RouteGroup<'e> {
    pub(crate) fn new(engine: &'e mut Engine, id: GroupId) -> Self {
        Self { engine, id }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn prefix(&self) -> &str {
        self.engine.groups().as_slice()[self.id.0].prefix()
    }

    /// Create a child group extending this group's prefix.
    pub fn group(&mut self, prefix: &str) -> RouteGroup<'_> {
        let id = self.engine.groups_mut().create(self.id, prefix);
        RouteGroup::new(&mut *self.engine, id)
    }

    /// Append middleware, keeping call order across calls.
    pub fn use_middleware(&mut self, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.engine.groups_mut().add_middleware(self.id, handlers);
        self
    }

    /// Register a route under this group's prefix.
    pub fn try_add_route(&mut self, method: Method, pattern: &str, handler: Handler) -> Result<(), Error> {
        let pattern = format!("{}{}", self.prefix(), pattern);
        self.engine.matcher_mut().register(method.clone(), &pattern, handler)?;
        tracing::info!(method = %method, pattern = %pattern, "Route registered");
        Ok(())
    }

    /// Register a route under this group's prefix.
    ///
    /// # Panics
    ///
    /// If the pattern is malformed or conflicts with an existing route.
    pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(method, pattern, Handler::new(handler))
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

    /// Serve files below `root` at `relative_path/*filepath`.
    pub fn static_files(&mut self, relative_path: &str, root: impl Into<PathBuf>) -> &mut Self {
        let pattern = static_files::route_pattern(relative_path);
        self.route(Method::GET, &pattern, static_files::handler(root.into()))
    }

    fn route(&mut self, method: Method, pattern: &str, handler: Handler) -> &mut Self {
        if let Err(err) = self.try_add_route(method, pattern, handler) {
            panic!("{err}");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_concatenation() {
        let mut registry = GroupRegistry::new();
        let v1 = registry.create(GroupId::ROOT, "/v1");
        let admin = registry.create(v1, "/admin");

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(v1).unwrap().prefix(), "/v1");
        assert_eq!(registry.get(admin).unwrap().prefix(), "/v1/admin");
        assert_eq!(registry.get(admin).unwrap().parent(), Some(v1));
        assert_eq!(registry.get(GroupId::ROOT).unwrap().parent(), None);
    }

    #[test]
    fn test_middleware_collected_in_creation_order() {
        let mut registry = GroupRegistry::new();
        let outer = registry.create(GroupId::ROOT, "/a");
        let inner = registry.create(outer, "/b");
        let other = registry.create(GroupId::ROOT, "/z");

        let m_inner = Handler::new(|_| {});
        let m_outer = Handler::new(|_| {});
        let m_other = Handler::new(|_| {});
        // Registration order across groups does not matter, creation order does.
        registry.add_middleware(inner, [m_inner.clone()]);
        registry.add_middleware(outer, [m_outer.clone()]);
        registry.add_middleware(other, [m_other]);

        let chain = registry.middleware_for("/a/b/x");
        assert_eq!(chain.len(), 2);
        assert!(chain[0].ptr_eq(&m_outer));
        assert!(chain[1].ptr_eq(&m_inner));
    }

    #[test]
    fn test_prefix_is_textual() {
        let mut registry = GroupRegistry::new();
        let api = registry.create(GroupId::ROOT, "/api");
        registry.add_middleware(api, [Handler::new(|_| {})]);

        assert_eq!(registry.middleware_for("/apiary").len(), 1);
        assert_eq!(registry.middleware_for("/ap").len(), 0);
        assert_eq!(registry.middleware_for("/").len(), 0);
    }

    #[test]
    fn test_duplicate_prefixes_both_apply() {
        let mut registry = GroupRegistry::new();
        let first = registry.create(GroupId::ROOT, "/v1");
        let second = registry.create(GroupId::ROOT, "/v1");
        registry.add_middleware(first, [Handler::new(|_| {})]);
        registry.add_middleware(second, [Handler::new(|_| {}), Handler::new(|_| {})]);

        assert_eq!(registry.middleware_for("/v1/ping").len(), 3);
    }
}
