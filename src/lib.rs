//! # routestack
//!
//! Answers one question about a router: *what actually runs for this method
//! and path?*
//!
//! A router is a stack of middleware, nested routers and routes. At request
//! time it walks that stack and assembles a handler chain on the fly, so
//! the chain for `GET /api/users` never exists as an object you can look at.
//! routestack walks the stack the same way, once, and writes every chain
//! down as a [`Route`] in a [`RouteIndex`].
//!
//! ## Quick look
//!
//! ```rust
//! use routestack::{App, Method, Request, Response, RouteIndex, Router};
//!
//! async fn auth(_: Request) -> Response { Response::text("") }
//! async fn list_users(_: Request) -> Response { Response::text("") }
//!
//! let app = App::new()
//!     .middleware(auth)
//!     .nest("/api", Router::new().on(Method::Get, "/users", list_users));
//!
//! let index = RouteIndex::build(&app).unwrap();
//! let route = index.find("getapiusers").unwrap();
//!
//! assert_eq!(route.path(), "/api/users");
//! assert_eq!(route.handler_names().collect::<Vec<_>>(), ["auth", "list_users"]);
//! ```
//!
//! ## Live references
//!
//! Route stacks hold [`HandlerRef`]s, which point into the router rather
//! than copying from it. Test code can pull a middleware out of a route,
//! call it as a plain function, or [`replace`](HandlerRef::replace) it with
//! a stub, and the real router sees the stub too. Restore what you replace.
//!
//! The index is a snapshot of the router's *structure* only. Rebuild it
//! (or use [`index`] with `force_rebuild`) after changing the router.

mod cache;
mod error;
mod handler;
mod layer;
mod method;
mod request;
mod response;
mod route;
mod router;
mod tree;

pub mod middleware;
pub mod path;

pub use cache::{RouteCache, index};
pub use error::Error;
pub use handler::{ANONYMOUS, BoxFuture, Handler, Named, named};
pub use layer::{HandlerRef, Layer, Matcher, RoutingNode};
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use route::Route;
pub use router::{App, RootId, RouteDef, Router};
pub use tree::{Lookup, Root, RouteIndex};
