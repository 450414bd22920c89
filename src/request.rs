//! Request type handed to handlers.
//!
//! routestack never dispatches requests itself. A `Request` exists so that
//! test code can call a handler it pulled out of a [`Route`](crate::Route)
//! and so that [`timed`](crate::middleware::timing::timed) has somewhere to
//! record stage timings.

use std::collections::HashMap;

use bytes::Bytes;

use crate::method::Method;
use crate::middleware::timing::Timings;

/// A request as seen by a handler.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) params: HashMap<String, String>,
    pub(crate) body: Bytes,
    pub(crate) timings: Timings,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: HashMap::new(),
            body: Bytes::new(),
            timings: Timings::default(),
        }
    }

    /// Sets a named path parameter. Returns `self` for chaining.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Records stages on `timings` instead of a list of its own. Pass clones
    /// of one list to each request of a chain to time the whole chain.
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/:id`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Stage timings recorded by timed handlers, in call order.
    pub fn timings(&self) -> &Timings { &self.timings }
}
