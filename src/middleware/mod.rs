//! Handler wrappers for diagnostics.
//!
//! - [`timing`]: records how long a request spends in each handler

pub mod timing;
