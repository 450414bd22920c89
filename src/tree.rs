//! Flattening a router into a [`RouteIndex`].
//!
//! The walk is depth-first and pre-order, in stack order, which is the order
//! a request would meet the layers in. It carries three things down:
//!
//! - the path **prefix** built from the mount paths of enclosing routers,
//! - the **branch**: middleware inherited so far, outer to inner,
//! - the output list of routes.
//!
//! Each level owns its branch. Middleware extends it for everything that
//! follows at that level and below. A nested router gets its own copy,
//! extended with that router's param handlers, so nothing registered inside
//! it leaks back out to later siblings.

use std::fmt;

use regex::Regex;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::Error;
use crate::layer::{HandlerRef, Layer, RoutingNode};
use crate::path::{literal_prefix_from, normalize};
use crate::route::Route;
use crate::router::{App, RootId, Router};

// ── Root ──────────────────────────────────────────────────────────────────────

/// What an index can be built from: an app with a router, or a router.
#[derive(Clone, Copy, Debug)]
pub enum Root<'a> {
    App(&'a App),
    Router(&'a Router),
}

impl<'a> Root<'a> {
    pub fn id(&self) -> RootId {
        match self {
            Self::App(app) => app.id(),
            Self::Router(router) => router.id(),
        }
    }

    /// The top-level stack to walk.
    pub fn stack(&self) -> Result<&'a [Layer], Error> {
        match *self {
            Self::App(app) => app.router().map(Router::stack).ok_or(Error::InvalidInput),
            Self::Router(router) => Ok(router.stack()),
        }
    }
}

impl<'a> From<&'a App> for Root<'a> {
    fn from(app: &'a App) -> Self { Self::App(app) }
}

impl<'a> From<&'a Router> for Root<'a> {
    fn from(router: &'a Router) -> Self { Self::Router(router) }
}

// ── Lookup ────────────────────────────────────────────────────────────────────

/// A way of picking routes by id: a string is an exact id, a [`Regex`] is
/// searched for anywhere in the id.
pub trait Lookup {
    fn matches(&self, id: &str) -> bool;
}

impl Lookup for str {
    fn matches(&self, id: &str) -> bool { self == id }
}

impl Lookup for String {
    fn matches(&self, id: &str) -> bool { self == id }
}

impl Lookup for Regex {
    fn matches(&self, id: &str) -> bool { self.is_match(id) }
}

// ── RouteIndex ────────────────────────────────────────────────────────────────

/// Every route reachable from a root, in the order the router considers them.
///
/// Built eagerly in one pass and never changed afterwards; build a new index
/// to pick up configuration changes. The structure is a snapshot, the
/// handlers are not: see [`HandlerRef`].
#[derive(Clone, Debug, Default)]
pub struct RouteIndex {
    routes: Vec<Route>,
}

impl RouteIndex {
    /// Walks `root` and collects its routes.
    ///
    /// Fails with [`Error::InvalidInput`] for an [`App`] that has no router yet.
    pub fn build<'a>(root: impl Into<Root<'a>>) -> Result<Self, Error> {
        let root = root.into();
        let stack = root.stack()?;

        let mut routes = Vec::new();
        walk(stack, "/", Vec::new(), &mut routes);

        debug!(root = ?root.id(), routes = routes.len(), "route index built");
        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First route whose id matches `identifier`.
    ///
    /// ```rust
    /// # use routestack::{Method, Request, Response, RouteIndex, Router};
    /// # async fn list_users(_: Request) -> Response { Response::text("") }
    /// let router = Router::new().on(Method::Get, "/users", list_users);
    /// let index = RouteIndex::build(&router).unwrap();
    ///
    /// assert!(index.find("getusers").is_some());
    /// assert!(index.find(&regex::Regex::new("^get").unwrap()).is_some());
    /// ```
    pub fn find<L: Lookup + ?Sized>(&self, identifier: &L) -> Option<&Route> {
        self.routes.iter().find(|r| identifier.matches(r.id()))
    }

    /// Every route whose id matches `identifier`, in index order.
    pub fn find_all<L: Lookup + ?Sized>(&self, identifier: &L) -> Vec<&Route> {
        self.routes.iter().filter(|r| identifier.matches(r.id())).collect()
    }

    /// One `"METHOD /path"` line per route.
    pub fn summaries(&self) -> Vec<String> {
        self.routes.iter().map(|r| format!("{} {}", r.method(), r.path())).collect()
    }

    /// The JSON projection of every route, in order.
    pub fn to_json(&self) -> Value {
        Value::Array(self.routes.iter().map(Route::to_json).collect())
    }
}

impl<'a> IntoIterator for &'a RouteIndex {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

impl Serialize for RouteIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.routes.len()))?;
        for route in &self.routes {
            seq.serialize_element(route)?;
        }
        seq.end()
    }
}

impl fmt::Display for RouteIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RouteIndex[")?;
        for route in &self.routes {
            writeln!(f, "  {} {}", route.method(), route.path())?;
        }
        f.write_str("]")
    }
}

// ── Walk ──────────────────────────────────────────────────────────────────────

fn walk(stack: &[Layer], prefix: &str, mut branch: Vec<HandlerRef>, out: &mut Vec<Route>) {
    for layer in stack {
        match layer.node() {
            RoutingNode::Middleware(handler) => {
                branch.push(handler.tagged(layer.matcher()));
            }

            RoutingNode::SubRouter(router) => {
                let nested = normalize(&format!(
                    "{prefix}{}",
                    literal_prefix_from(layer.matcher().source())
                ));

                let mut scope = branch.clone();
                scope.extend(
                    router.params().iter()
                        .flat_map(|(_, handlers)| handlers)
                        .map(|h| h.tagged(layer.matcher())),
                );

                trace!(prefix = %nested, inherited = scope.len(), "entering nested router");
                walk(router.stack(), &nested, scope, out);
            }

            RoutingNode::Route(route) => {
                let path = normalize(&format!("{prefix}{}", route.path()));
                for &method in route.methods() {
                    let mut stack = branch.clone();
                    stack.extend(route.handlers_for(method).map(|h| h.tagged(layer.matcher())));

                    let entry = Route::new(method, path.clone(), stack);
                    trace!(id = entry.id(), %method, path = entry.path(), "route materialized");
                    out.push(entry);
                }
            }
        }
    }
}
