//! Layers: the entries of a router's stack.
//!
//! A [`Layer`] pairs a [`Matcher`] with one of three node shapes
//! ([`RoutingNode`]): a bare middleware function, a nested router, or a route
//! definition. The shape is fixed when the layer is registered.
//!
//! Handler functions inside layers live in [`HandlerRef`] slots. A slot is
//! shared, never copied: the same slot is reachable from the router and
//! from every [`Route`](crate::Route) whose stack includes it, so swapping
//! the function in one place swaps it everywhere.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler, private};
use crate::request::Request;
use crate::router::{RouteDef, Router};

// ── HandlerRef ────────────────────────────────────────────────────────────────

struct Slot(BoxedHandler);

/// A named, live reference to a handler mounted somewhere in a router.
///
/// Cloning a `HandlerRef` shares the underlying slot. Use
/// [`replace`](Self::replace) to stub a mounted handler from test code and
/// [`restore`](Self::restore) to undo it. Forgetting to restore leaves the
/// stub in the real router.
#[derive(Clone)]
pub struct HandlerRef {
    name: Arc<str>,
    slot: Arc<ArcSwap<Slot>>,
    pattern: Option<Arc<str>>,
}

impl HandlerRef {
    /// Wraps `handler` in a fresh slot, named after the handler.
    pub fn new(handler: impl Handler) -> Self {
        let name: Arc<str> = match handler.name() {
            Cow::Borrowed(s) => Arc::from(s),
            Cow::Owned(s) => Arc::from(s),
        };
        Self {
            name,
            slot: Arc::new(ArcSwap::from_pointee(Slot(handler.into_boxed_handler()))),
            pattern: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Matcher source of the layer this entry was collected from, if any.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Calls whatever function the slot holds right now.
    pub fn call(&self, req: Request) -> BoxFuture {
        self.slot.load().0.call(req)
    }

    /// Swaps the live function for `handler`.
    ///
    /// Every clone of this reference, the mounting router included, sees the
    /// new function. The name is kept. Returns a detached reference holding
    /// the previous function, suitable for [`restore`](Self::restore).
    pub fn replace(&self, handler: impl Handler) -> HandlerRef {
        let previous = self.slot.swap(Arc::new(Slot(handler.into_boxed_handler())));
        Self {
            name: Arc::clone(&self.name),
            slot: Arc::new(ArcSwap::new(previous)),
            pattern: None,
        }
    }

    /// Puts the function currently held by `previous` back into this slot.
    pub fn restore(&self, previous: &HandlerRef) {
        self.slot.store(previous.slot.load_full());
    }

    /// A reference with its own slot, holding the function this one holds now.
    ///
    /// Later swaps on either side are not seen by the other. Wrap the
    /// detached copy when replacing a handler with a wrapper around itself:
    /// `h.replace(timed(h.detach()))`.
    pub fn detach(&self) -> HandlerRef {
        Self {
            name: Arc::clone(&self.name),
            slot: Arc::new(ArcSwap::new(self.slot.load_full())),
            pattern: self.pattern.clone(),
        }
    }

    /// True if both references share one slot.
    pub fn ptr_eq(&self, other: &HandlerRef) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }

    /// Same slot, tagged with the matcher of the layer it is collected from.
    pub(crate) fn tagged(&self, matcher: &Matcher) -> HandlerRef {
        Self {
            name: Arc::clone(&self.name),
            slot: Arc::clone(&self.slot),
            pattern: Some(Arc::clone(&matcher.source)),
        }
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRef")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

// A HandlerRef mounted as a handler calls through its slot, so it follows
// later swaps of the original.
impl private::Sealed for HandlerRef {}

impl Handler for HandlerRef {
    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(self.name.to_string())
    }

    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(LiveHandler(self.slot))
    }
}

struct LiveHandler(Arc<ArcSwap<Slot>>);

impl ErasedHandler for LiveHandler {
    fn call(&self, req: Request) -> BoxFuture {
        self.0.load().0.call(req)
    }
}

// ── Matcher ───────────────────────────────────────────────────────────────────

/// The pattern a layer matches request paths with.
///
/// Generated from a mount path the way Express's path-to-regexp does it:
/// `/` and `.` are escaped, `:name` becomes a capture group, `*` becomes
/// `(.*)`. Prefix matchers (middleware, nested routers) end with
/// `\/?(?=\/|$)`; exact matchers (routes) end with `\/?$`.
///
/// Only the pattern source is kept, not the path it came from. Recovering a
/// nested router's mount path means going back through
/// [`literal_prefix_from`](crate::path::literal_prefix_from).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matcher {
    source: Arc<str>,
}

impl Matcher {
    /// Matches `path` and anything below it.
    pub fn prefix(path: &str) -> Self {
        Self { source: Arc::from(compile(path, false)) }
    }

    /// Matches `path` only (a trailing slash is tolerated).
    pub fn exact(path: &str) -> Self {
        Self { source: Arc::from(compile(path, true)) }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

fn compile(path: &str, end: bool) -> String {
    let mut src = String::with_capacity(path.len() * 2 + 12);
    src.push('^');

    let mut chars = path.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '/' | '.' => {
                src.push('\\');
                src.push(c);
            }
            ':' => {
                let mut named = false;
                while let Some(&n) = chars.peek() {
                    if !(n.is_ascii_alphanumeric() || n == '_') {
                        break;
                    }
                    named = true;
                    chars.next();
                }
                if named {
                    src.push_str(r"(?:([^\/]+?))");
                } else {
                    src.push(':');
                }
            }
            '*' => src.push_str("(.*)"),
            _ => src.push(c),
        }
    }

    // A mount path's own trailing slash becomes optional; otherwise one is allowed.
    src.push_str(if path.ends_with('/') { "?" } else { r"\/?" });
    src.push_str(if end { "$" } else { r"(?=\/|$)" });
    src
}

// ── Layer ─────────────────────────────────────────────────────────────────────

/// The three shapes a stack entry can take.
#[derive(Debug, Clone)]
pub enum RoutingNode {
    /// A bare handler with no nesting and no route. Applies to everything
    /// registered after it at the same level and below.
    Middleware(HandlerRef),
    /// A nested router mounted under the layer's matcher.
    SubRouter(Arc<Router>),
    /// A leaf route definition.
    Route(Arc<RouteDef>),
}

/// One entry in a router's stack.
#[derive(Debug, Clone)]
pub struct Layer {
    name: Arc<str>,
    matcher: Matcher,
    node: RoutingNode,
}

impl Layer {
    pub(crate) fn middleware(path: &str, handler: HandlerRef) -> Self {
        Self {
            name: Arc::clone(&handler.name),
            matcher: Matcher::prefix(path),
            node: RoutingNode::Middleware(handler),
        }
    }

    pub(crate) fn sub_router(path: &str, router: Arc<Router>) -> Self {
        Self {
            name: Arc::from("router"),
            matcher: Matcher::prefix(path),
            node: RoutingNode::SubRouter(router),
        }
    }

    pub(crate) fn route(route: Arc<RouteDef>) -> Self {
        Self {
            name: Arc::from("route"),
            matcher: Matcher::exact(route.path()),
            node: RoutingNode::Route(route),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn node(&self) -> &RoutingNode {
        &self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Response;

    #[test]
    fn prefix_matcher_follows_path_to_regexp() {
        assert_eq!(Matcher::prefix("/api").source(), r"^\/api\/?(?=\/|$)");
        assert_eq!(Matcher::prefix("/api/").source(), r"^\/api\/?(?=\/|$)");
        assert_eq!(Matcher::prefix("/").source(), r"^\/?(?=\/|$)");
    }

    #[test]
    fn exact_matcher_is_anchored() {
        assert_eq!(Matcher::exact("/users").source(), r"^\/users\/?$");
        assert_eq!(Matcher::exact("/v1.0").source(), r"^\/v1\.0\/?$");
    }

    #[test]
    fn params_and_wildcards_become_groups() {
        assert_eq!(
            Matcher::prefix("/users/:id").source(),
            r"^\/users\/(?:([^\/]+?))\/?(?=\/|$)"
        );
        assert_eq!(Matcher::exact("/files/*").source(), r"^\/files\/(.*)\/?$");
    }

    #[test]
    fn clones_share_the_slot() {
        let a = HandlerRef::new(|_req: Request| async { Response::text("a") });
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&a.detach()));
    }

    #[test]
    fn tagging_keeps_the_slot_and_sets_the_pattern() {
        let a = HandlerRef::new(|_req: Request| async { Response::text("a") });
        let tagged = a.tagged(&Matcher::prefix("/api"));
        assert!(a.ptr_eq(&tagged));
        assert_eq!(a.pattern(), None);
        assert_eq!(tagged.pattern(), Some(r"^\/api\/?(?=\/|$)"));
    }
}
