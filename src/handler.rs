//! Handler trait, type erasure and handler naming.
//!
//! # How handlers are stored
//!
//! A router holds handlers of *different* types in one stack, so each one is
//! erased behind `dyn ErasedHandler` and shared through an `Arc`:
//!
//! ```text
//! async fn auth(req: Request) -> Response { … }   ← user writes this
//!        ↓ router.middleware(auth)
//! auth.into_boxed_handler()                      ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(auth))                      ← stored as BoxedHandler
//!        ↓ wrapped in a HandlerRef slot
//! route.handler("auth")?.call(req)               ← one vtable dispatch
//! ```
//!
//! # Names
//!
//! Routes are inspected by handler name, so every handler gets one. A named
//! `fn` item is called by its own name (`my_app::auth` → `auth`). Closures
//! have no name and become [`ANONYMOUS`]. Use [`named`] to pick one.

use std::any::type_name;
use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// Display name of a handler that has none of its own.
pub const ANONYMOUS: &str = "<anonymous>";

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`].
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared by every layer and route that references it.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid handler.
///
/// You never implement this yourself. It is satisfied for any `async fn`
/// (or closure) with the signature:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// plus the wrappers this crate hands out ([`Named`],
/// [`Timed`](crate::middleware::timing::Timed), [`HandlerRef`](crate::HandlerRef)).
/// The trait is sealed so those stay the only implementations.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn name(&self) -> Cow<'static, str>;

    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

pub(crate) mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(fn_name::<F>())
    }

    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Bridges a concrete handler `F` to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

// ── Naming ────────────────────────────────────────────────────────────────────

/// A handler with an explicit display name. Built by [`named`].
pub struct Named<H> {
    name: Cow<'static, str>,
    inner: H,
}

/// Gives `handler` the display name `name`.
///
/// ```rust
/// use routestack::{Request, Response, Router, named};
///
/// let router = Router::new()
///     .middleware(named("auth", |_req: Request| async { Response::text("ok") }));
/// ```
pub fn named<H: Handler>(name: impl Into<Cow<'static, str>>, handler: H) -> Named<H> {
    Named { name: name.into(), inner: handler }
}

impl<H: Handler> private::Sealed for Named<H> {}

impl<H: Handler> Handler for Named<H> {
    fn name(&self) -> Cow<'static, str> {
        self.name.clone()
    }

    fn into_boxed_handler(self) -> BoxedHandler {
        self.inner.into_boxed_handler()
    }
}

/// Short name of a function item type, or [`ANONYMOUS`] for closures.
///
/// `type_name` is best-effort by definition; for `fn` items it yields the
/// full path, so the last segment is the function's own name.
fn fn_name<F>() -> &'static str {
    let full = type_name::<F>();
    if full.contains("{{closure}}") {
        return ANONYMOUS;
    }
    let base = full.split('<').next().unwrap_or(full);
    match base.rsplit("::").next() {
        Some(short) if !short.is_empty() => short,
        _ => ANONYMOUS,
    }
}
