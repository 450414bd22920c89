//! Unified error type.

use thiserror::Error;

/// The error type returned by routestack's fallible operations.
///
/// Lookup misses are not errors: [`RouteIndex::find`](crate::RouteIndex::find)
/// returns `None` and [`RouteIndex::find_all`](crate::RouteIndex::find_all)
/// returns an empty list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The root handed to the index is neither an app with a router nor a
    /// router. An [`App`](crate::App) only owns a router after its first
    /// registration.
    #[error("input must be an app or router")]
    InvalidInput,

    /// A method string that is not one of the known HTTP methods.
    #[error("unknown HTTP method `{0}`")]
    UnknownMethod(String),
}
