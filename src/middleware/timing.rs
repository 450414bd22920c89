//! Per-stage request timing.
//!
//! Wrap any handler with [`timed`] and every call marks a stage on the
//! request's [`Timings`]: the previous stage is closed with its elapsed time
//! and a new one, named after the handler, is opened. The first mark on a
//! request also opens an [`ENTER`] stage, so the first recorded duration is
//! the time spent before the first timed handler.
//!
//! A [`Timings`] list is a shared handle. Hand clones of one list to every
//! request of a chain ([`Request::with_timings`]) and read it afterwards.
//!
//! ```rust
//! use routestack::middleware::timing::timed;
//! use routestack::{Request, Response, Router};
//!
//! async fn auth(_: Request) -> Response { Response::text("") }
//!
//! let router = Router::new().middleware(timed(auth));
//! assert_eq!(router.stack()[0].name(), "auth");
//! ```

use std::borrow::Cow;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::trace;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler, private};
use crate::request::Request;

/// Name of the stage opened by the first mark on a request.
pub const ENTER: &str = "<Enter>";

/// One stage of a request.
#[derive(Clone, Debug)]
pub struct Stage {
    name: Cow<'static, str>,
    started: Instant,
    elapsed: Option<Duration>,
}

impl Stage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    /// `None` while the stage is still open.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}

/// The stages a request has gone through, in order.
///
/// Clones share one list: a mark made through any clone is seen by all.
#[derive(Clone, Debug, Default)]
pub struct Timings {
    stages: Arc<Mutex<Vec<Stage>>>,
}

impl Timings {
    /// Closes the current stage and opens one called `name`.
    pub fn mark(&self, name: impl Into<Cow<'static, str>>) {
        let now = Instant::now();
        let mut stages = self.stages.lock();
        if stages.is_empty() {
            stages.push(Stage { name: Cow::Borrowed(ENTER), started: now, elapsed: None });
        }
        if let Some(last) = stages.last_mut() {
            last.elapsed = Some(now.duration_since(last.started));
        }
        stages.push(Stage { name: name.into(), started: now, elapsed: None });
    }

    /// A copy of the stages recorded so far.
    pub fn stages(&self) -> Vec<Stage> {
        self.stages.lock().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.stages.lock().iter().map(|s| s.name().to_owned()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.lock().is_empty()
    }

    /// True if both handles share one list.
    pub fn ptr_eq(&self, other: &Timings) -> bool {
        Arc::ptr_eq(&self.stages, &other.stages)
    }
}

/// A handler that marks a stage before running. Built by [`timed`].
pub struct Timed {
    name: Cow<'static, str>,
    inner: BoxedHandler,
}

/// Wraps `handler` so each call is recorded on the request's [`Timings`].
/// The wrapper keeps the handler's name.
pub fn timed(handler: impl Handler) -> Timed {
    Timed { name: handler.name(), inner: handler.into_boxed_handler() }
}

impl private::Sealed for Timed {}

impl Handler for Timed {
    fn name(&self) -> Cow<'static, str> {
        self.name.clone()
    }

    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(self)
    }
}

impl ErasedHandler for Timed {
    fn call(&self, req: Request) -> BoxFuture {
        req.timings.mark(self.name.clone());
        trace!(handler = %self.name, stage = req.timings.len(), "timed handler entered");
        self.inner.call(req)
    }
}
