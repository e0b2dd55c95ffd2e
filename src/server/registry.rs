//! The route registry: URI prefix to handler kind, configuration and hit counter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;
use tokio::sync::RwLock;

use crate::server::handler::{HandlerFactory, Properties};

/// Compute the routing key of a URI: everything before the second `/`.
///
/// `/abc/anything` routes under `/abc`; `/abc` and `/` are their own keys.
pub fn routing_key(uri: &str) -> &str {
    match uri.char_indices().skip(1).find(|&(_, c)| c == '/') {
        Some((pos, _)) => &uri[..pos],
        None => uri,
    }
}

struct RouteEntry {
    kind: String,
    factory: HandlerFactory,
    config: Arc<Properties>,
    hits: AtomicU64,
}

/// The outcome of a successful [`RouteRegistry::resolve`].
#[derive(Clone)]
pub struct ResolvedRoute {
    /// The registered prefix that matched (possibly the default prefix)
    pub prefix: String,
    /// The name of the handler kind
    pub kind: String,
    /// The route's static configuration
    pub config: Arc<Properties>,
    /// Constructor for the handler kind
    pub factory: HandlerFactory,
}

/// A point-in-time copy of one route, for introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSnapshot {
    /// The registered prefix
    pub prefix: String,
    /// The name of the handler kind
    pub kind: String,
    /// Successful lookups that resolved to this route
    pub hits: u64,
}

/// Process-wide table of routes.
///
/// Registration is expected to happen before the server starts accepting;
/// resolution happens concurrently from every session and bumps the hit
/// counter of the entry it returns.
pub struct RouteRegistry {
    kinds: RwLock<HashMap<String, HandlerFactory>>,
    routes: RwLock<HashMap<String, RouteEntry>>,
    default_prefix: RwLock<Option<String>>,
}

impl RouteRegistry {
    /// Create a registry that knows no handler kinds.
    pub fn new() -> Self {
        Self::with_kinds(HashMap::new())
    }

    /// Create a registry that knows the given handler kinds.
    pub fn with_kinds(kinds: HashMap<String, HandlerFactory>) -> Self {
        Self {
            kinds: RwLock::new(kinds),
            routes: RwLock::new(HashMap::new()),
            default_prefix: RwLock::new(None),
        }
    }

    /// Make a handler kind available to [`register`](Self::register).
    pub async fn register_kind(&self, name: impl Into<String>, factory: HandlerFactory) {
        self.kinds.write().await.insert(name.into(), factory);
    }

    /// Names of the handler kinds this registry can construct.
    pub async fn kinds(&self) -> Vec<String> {
        let mut names: Vec<String> = self.kinds.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Route `prefix` to the handler kind named `kind`.
    ///
    /// A later registration for the same prefix replaces the earlier one and
    /// resets its hit counter. An unknown kind is ignored.
    pub async fn register(&self, prefix: impl Into<String>, kind: &str, config: Properties) {
        let prefix = prefix.into();
        let factory = match self.kinds.read().await.get(kind) {
            Some(factory) => factory.clone(),
            None => {
                debug!("Ignoring registration of '{prefix}': unknown handler kind '{kind}'");
                return;
            }
        };

        let entry = RouteEntry {
            kind: kind.to_string(),
            factory,
            config: Arc::new(config),
            hits: AtomicU64::new(0),
        };
        self.routes.write().await.insert(prefix, entry);
    }

    /// Set the prefix used when no registered prefix matches.
    pub async fn set_default(&self, prefix: impl Into<String>) {
        *self.default_prefix.write().await = Some(prefix.into());
    }

    /// The fallback prefix, if one was set.
    pub async fn default_prefix(&self) -> Option<String> {
        self.default_prefix.read().await.clone()
    }

    /// Find the route for `uri`, falling back to the default prefix.
    ///
    /// A successful lookup increments the hit counter of the returned entry.
    pub async fn resolve(&self, uri: &str) -> Option<ResolvedRoute> {
        let routes = self.routes.read().await;

        let key = routing_key(uri);
        let (prefix, entry) = match routes.get_key_value(key) {
            Some(found) => found,
            None => {
                let default = self.default_prefix.read().await;
                routes.get_key_value(default.as_deref()?)?
            }
        };

        entry.hits.fetch_add(1, Ordering::Relaxed);
        Some(ResolvedRoute {
            prefix: prefix.clone(),
            kind: entry.kind.clone(),
            config: entry.config.clone(),
            factory: entry.factory.clone(),
        })
    }

    /// Snapshot every route, sorted by prefix.
    pub async fn entries(&self) -> Vec<RouteSnapshot> {
        let routes = self.routes.read().await;
        let mut entries: Vec<RouteSnapshot> = routes
            .iter()
            .map(|(prefix, entry)| RouteSnapshot {
                prefix: prefix.clone(),
                kind: entry.kind.clone(),
                hits: entry.hits.load(Ordering::Relaxed),
            })
            .collect();
        entries.sort_by(|a, b| a.prefix.cmp(&b.prefix));
        entries
    }

    /// Number of registered routes.
    pub async fn len(&self) -> usize {
        self.routes.read().await.len()
    }

    /// Whether no route has been registered.
    pub async fn is_empty(&self) -> bool {
        self.routes.read().await.is_empty()
    }
}

impl Default for RouteRegistry {
    /// A registry that knows the built-in handler kinds.
    fn default() -> Self {
        Self::with_kinds(crate::handlers::builtin_kinds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::HttpRequest;
    use crate::server::handler::{factory, Handler, HandlerFuture};
    use crate::server::response::HttpResponse;

    struct Noop(HttpResponse);

    impl Handler for Noop {
        fn execute<'a>(&'a mut self, _request: &'a HttpRequest) -> HandlerFuture<'a> {
            Box::pin(async { Ok(()) })
        }

        fn response(&self) -> &HttpResponse {
            &self.0
        }

        fn into_response(self: Box<Self>) -> HttpResponse {
            self.0
        }
    }

    fn build_noop(
        _context: crate::server::ServerContext,
        _prefix: String,
        _config: Arc<Properties>,
    ) -> Result<Box<dyn Handler>, crate::server::Error> {
        Ok(Box::new(Noop(HttpResponse::new())))
    }

    async fn registry_with(prefixes: &[&str]) -> RouteRegistry {
        let registry = RouteRegistry::new();
        registry.register_kind("noop", factory(build_noop)).await;
        for prefix in prefixes {
            registry.register(*prefix, "noop", Properties::new()).await;
        }
        registry
    }

    async fn hits(registry: &RouteRegistry, prefix: &str) -> u64 {
        registry
            .entries()
            .await
            .into_iter()
            .find(|e| e.prefix == prefix)
            .map(|e| e.hits)
            .unwrap()
    }

    #[test]
    fn test_routing_key() {
        assert_eq!(routing_key("/abc/anything/else"), "/abc");
        assert_eq!(routing_key("/abc"), "/abc");
        assert_eq!(routing_key("/"), "/");
        assert_eq!(routing_key("//x"), "/");
        assert_eq!(routing_key(""), "");
        assert_eq!(routing_key("abc/def"), "abc");
        assert_eq!(routing_key("é/x"), "é");
        assert_eq!(routing_key("/café/menu"), "/café");
    }

    #[tokio::test]
    async fn test_resolve_truncates_at_second_slash() {
        let registry = registry_with(&["/Echo", "/abc"]).await;
        for uri in ["/abc", "/abc/", "/abc/x/y.html"] {
            let route = registry.resolve(uri).await.unwrap();
            assert_eq!(route.prefix, "/abc");
            assert_eq!(route.kind, "noop");
        }
        assert!(registry.resolve("/abcd").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_default() {
        let registry = registry_with(&["/", "/Echo"]).await;
        assert!(registry.resolve("/unknown").await.is_none());

        registry.set_default("/").await;
        let route = registry.resolve("/unknown/page").await.unwrap();
        assert_eq!(route.prefix, "/");
    }

    #[tokio::test]
    async fn test_default_must_be_registered() {
        let registry = registry_with(&["/Echo"]).await;
        registry.set_default("/missing").await;
        assert_eq!(registry.default_prefix().await.as_deref(), Some("/missing"));
        assert!(registry.resolve("/other").await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_kind_is_ignored() {
        let registry = registry_with(&[]).await;
        registry.register("/x", "does-not-exist", Properties::new()).await;
        assert!(registry.is_empty().await);
        assert!(registry.resolve("/x").await.is_none());
    }

    #[tokio::test]
    async fn test_hits_count_lookups() {
        let registry = registry_with(&["/a", "/b"]).await;
        registry.set_default("/b").await;

        registry.resolve("/a").await;
        registry.resolve("/a/1").await;
        registry.resolve("/nowhere").await;

        assert_eq!(hits(&registry, "/a").await, 2);
        assert_eq!(hits(&registry, "/b").await, 1);
    }

    #[tokio::test]
    async fn test_reregistration_overwrites_and_resets() {
        let registry = registry_with(&["/a"]).await;
        registry.resolve("/a").await;
        assert_eq!(hits(&registry, "/a").await, 1);

        let mut config = Properties::new();
        config.insert("key".to_string(), "value".to_string());
        registry.register("/a", "noop", config).await;

        assert_eq!(registry.len().await, 1);
        assert_eq!(hits(&registry, "/a").await, 0);
        let route = registry.resolve("/a").await.unwrap();
        assert_eq!(route.config.get("key").unwrap(), "value");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resolutions_are_all_counted() {
        let registry = Arc::new(registry_with(&["/hot"]).await);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..250 {
                    assert!(registry.resolve("/hot/item").await.is_some());
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(hits(&registry, "/hot").await, 16 * 250);
    }

    #[tokio::test]
    async fn test_builtin_kinds() {
        let registry = RouteRegistry::default();
        assert_eq!(registry.kinds().await, vec!["echo", "file", "status"]);
    }
}
