//! The routing configuration: routers, route definitions and apps.
//!
//! A [`Router`] is an ordered stack of [`Layer`]s. Order is execution order:
//! a request walks the stack top to bottom, running every middleware it
//! passes and descending into nested routers whose mount path matches.
//! Build it once at startup; each method returns `self` so registrations
//! chain naturally.
//!
//! ```rust
//! use routestack::{App, Request, Response, RouteDef, Router};
//!
//! async fn auth(_: Request) -> Response { Response::text("") }
//! async fn list_users(_: Request) -> Response { Response::text("") }
//! async fn create_user(_: Request) -> Response { Response::text("") }
//! async fn load_user(_: Request) -> Response { Response::text("") }
//!
//! let api = Router::new()
//!     .param("id", load_user)
//!     .route("/users", RouteDef::new().get(list_users).post(create_user));
//!
//! let app = App::new()
//!     .middleware(auth)
//!     .nest("/api", api);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Error;
use crate::handler::Handler;
use crate::layer::{HandlerRef, Layer};
use crate::method::Method;

/// Process-unique identity of an [`App`] or [`Router`].
///
/// Assigned at construction and carried along when the value moves, so it
/// identifies "the same configuration" across builder calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RootId(u64);

impl RootId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// An ordered stack of middleware, nested routers and routes.
#[derive(Debug)]
pub struct Router {
    id: RootId,
    stack: Vec<Layer>,
    params: Vec<(String, Vec<HandlerRef>)>,
}

impl Router {
    pub fn new() -> Self {
        Self { id: RootId::next(), stack: Vec::new(), params: Vec::new() }
    }

    /// Mounts `handler` as middleware at `/`.
    pub fn middleware(self, handler: impl Handler) -> Self {
        self.middleware_at("/", handler)
    }

    /// Mounts `handler` as middleware under `path`.
    pub fn middleware_at(mut self, path: &str, handler: impl Handler) -> Self {
        self.stack.push(Layer::middleware(path, HandlerRef::new(handler)));
        self
    }

    /// Mounts `router` under `path`.
    pub fn nest(mut self, path: &str, router: Router) -> Self {
        self.stack.push(Layer::sub_router(path, Arc::new(router)));
        self
    }

    /// Mounts an already shared router under `path`. The same router may be
    /// mounted in several places.
    pub fn nest_shared(mut self, path: &str, router: Arc<Router>) -> Self {
        self.stack.push(Layer::sub_router(path, router));
        self
    }

    /// Registers a route at `path` with all of its method handlers.
    pub fn route(mut self, path: &str, route: RouteDef) -> Self {
        self.stack.push(Layer::route(Arc::new(route.at(path))));
        self
    }

    /// Registers a single-handler route for a method + path pair.
    ///
    /// Each call adds a new route layer, even for a path that already has
    /// one, the same way `router.get(path, handler)` does in Express.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.route(path, RouteDef::new().on(method, handler))
    }

    /// Registers a handler that runs when a request matched in this router
    /// carries the path parameter `name`.
    pub fn param(mut self, name: &str, handler: impl Handler) -> Self {
        let handler = HandlerRef::new(handler);
        match self.params.iter_mut().find(|(n, _)| n == name) {
            Some((_, handlers)) => handlers.push(handler),
            None => self.params.push((name.to_owned(), vec![handler])),
        }
        self
    }

    pub fn id(&self) -> RootId {
        self.id
    }

    pub fn stack(&self) -> &[Layer] {
        &self.stack
    }

    /// Parameter handler groups, in the order their names were first registered.
    pub fn params(&self) -> &[(String, Vec<HandlerRef>)] {
        &self.params
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

// ── RouteDef ──────────────────────────────────────────────────────────────────

/// One route: a path, the methods it answers and a handler list per method.
///
/// ```rust
/// # use routestack::{Request, Response, RouteDef};
/// # async fn validate(_: Request) -> Response { Response::text("") }
/// # async fn create_user(_: Request) -> Response { Response::text("") }
/// # async fn get_user(_: Request) -> Response { Response::text("") }
/// RouteDef::new()
///     .get(get_user)
///     .post(validate)
///     .post(create_user);
/// ```
#[derive(Debug, Default)]
pub struct RouteDef {
    path: String,
    methods: Vec<Method>,
    stack: Vec<(Method, HandlerRef)>,
}

impl RouteDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` for `method`. The method becomes registered on its
    /// first handler.
    pub fn on(mut self, method: Method, handler: impl Handler) -> Self {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
        self.stack.push((method, HandlerRef::new(handler)));
        self
    }

    /// Like [`on`](Self::on) with the method given by name, in any case
    /// (`"get"`, `"GET"`). Fails on a name that is not an HTTP method.
    pub fn try_on(self, method: &str, handler: impl Handler) -> Result<Self, Error> {
        Ok(self.on(method.parse()?, handler))
    }

    pub fn get(self, handler: impl Handler) -> Self { self.on(Method::Get, handler) }
    pub fn post(self, handler: impl Handler) -> Self { self.on(Method::Post, handler) }
    pub fn put(self, handler: impl Handler) -> Self { self.on(Method::Put, handler) }
    pub fn patch(self, handler: impl Handler) -> Self { self.on(Method::Patch, handler) }
    pub fn delete(self, handler: impl Handler) -> Self { self.on(Method::Delete, handler) }
    pub fn head(self, handler: impl Handler) -> Self { self.on(Method::Head, handler) }
    pub fn options(self, handler: impl Handler) -> Self { self.on(Method::Options, handler) }

    fn at(mut self, path: &str) -> Self {
        self.path = path.to_owned();
        self
    }

    /// The path suffix this route was registered with.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Registered methods, in registration order.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn is_registered(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }

    /// Every handler entry, each tagged with the method it applies to.
    pub fn stack(&self) -> &[(Method, HandlerRef)] {
        &self.stack
    }

    /// Handlers for `method`, in registration order.
    pub fn handlers_for(&self, method: Method) -> impl Iterator<Item = &HandlerRef> + '_ {
        self.stack.iter()
            .filter(move |(m, _)| *m == method)
            .map(|(_, h)| h)
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// An application: a thin owner of one lazily created [`Router`].
///
/// The router comes into existence on the first registration. Until then
/// there is nothing to inspect and [`RouteIndex::build`](crate::RouteIndex::build)
/// rejects the app.
#[derive(Debug)]
pub struct App {
    id: RootId,
    router: Option<Router>,
}

impl App {
    pub fn new() -> Self {
        Self { id: RootId::next(), router: None }
    }

    pub fn middleware(self, handler: impl Handler) -> Self {
        self.with_router(|r| r.middleware(handler))
    }

    pub fn middleware_at(self, path: &str, handler: impl Handler) -> Self {
        self.with_router(|r| r.middleware_at(path, handler))
    }

    pub fn nest(self, path: &str, router: Router) -> Self {
        self.with_router(|r| r.nest(path, router))
    }

    pub fn nest_shared(self, path: &str, router: Arc<Router>) -> Self {
        self.with_router(|r| r.nest_shared(path, router))
    }

    pub fn route(self, path: &str, route: RouteDef) -> Self {
        self.with_router(|r| r.route(path, route))
    }

    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.with_router(|r| r.on(method, path, handler))
    }

    pub fn param(self, name: &str, handler: impl Handler) -> Self {
        self.with_router(|r| r.param(name, handler))
    }

    pub fn id(&self) -> RootId {
        self.id
    }

    /// The internal router, if anything has been registered yet.
    pub fn router(&self) -> Option<&Router> {
        self.router.as_ref()
    }

    fn with_router(mut self, f: impl FnOnce(Router) -> Router) -> Self {
        let router = self.router.take().unwrap_or_default();
        self.router = Some(f(router));
        self
    }
}

impl Default for App {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::RoutingNode;
    use crate::request::Request;
    use crate::response::Response;

    async fn show(_: Request) -> Response { Response::text("show") }
    async fn update(_: Request) -> Response { Response::text("update") }
    async fn check(_: Request) -> Response { Response::text("check") }

    #[test]
    fn app_creates_its_router_lazily() {
        let app = App::new();
        assert!(app.router().is_none());

        let app = app.on(Method::Get, "/", show);
        assert_eq!(app.router().map(|r| r.stack().len()), Some(1));
    }

    #[test]
    fn identity_survives_builder_calls() {
        let router = Router::new();
        let id = router.id();
        let router = router.middleware(check).on(Method::Get, "/", show);
        assert_eq!(router.id(), id);
        assert_ne!(Router::new().id(), id);
    }

    #[test]
    fn route_def_keeps_methods_and_handlers_in_order() {
        let def = RouteDef::new().put(check).get(show).put(update);
        assert_eq!(def.methods(), &[Method::Put, Method::Get]);
        let puts: Vec<_> = def.handlers_for(Method::Put).map(HandlerRef::name).collect();
        assert_eq!(puts, ["check", "update"]);
        assert!(!def.is_registered(Method::Delete));
    }

    #[test]
    fn methods_can_be_named_in_any_case() {
        let def = RouteDef::new().try_on("get", show).unwrap().try_on("Post", update).unwrap();
        assert_eq!(def.methods(), &[Method::Get, Method::Post]);

        let err = RouteDef::new().try_on("brew", show).unwrap_err();
        assert_eq!(err, Error::UnknownMethod("brew".to_owned()));
    }

    #[test]
    fn params_group_by_name() {
        let router = Router::new().param("id", check).param("slug", show).param("id", update);
        let groups: Vec<(&str, Vec<&str>)> = router.params().iter()
            .map(|(n, hs)| (n.as_str(), hs.iter().map(HandlerRef::name).collect()))
            .collect();
        assert_eq!(groups, [("id", vec!["check", "update"]), ("slug", vec!["show"])]);
    }

    #[test]
    fn layers_record_their_shape() {
        let router = Router::new()
            .middleware(check)
            .nest("/v1", Router::new())
            .on(Method::Get, "/items", show);

        let shapes: Vec<&str> = router.stack().iter()
            .map(|l| match l.node() {
                RoutingNode::Middleware(_) => "middleware",
                RoutingNode::SubRouter(_) => "router",
                RoutingNode::Route(_) => "route",
            })
            .collect();
        assert_eq!(shapes, ["middleware", "router", "route"]);
        assert_eq!(router.stack()[0].name(), "check");
    }
}
