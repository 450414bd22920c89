//! Memoized indexes, one per root.
//!
//! Building an index walks the whole router, and test suites tend to ask for
//! the same one over and over. [`RouteCache`] keeps one index per root
//! identity ([`RootId`]) until asked to rebuild it.
//!
//! An index is a snapshot of structure. If a router changes after its index
//! was cached, pass `force_rebuild = true` to pick the change up.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::Error;
use crate::router::RootId;
use crate::tree::{Root, RouteIndex};

static GLOBAL: Lazy<RouteCache> = Lazy::new(RouteCache::new);

/// A thread-safe map of root identity to built index.
#[derive(Debug, Default)]
pub struct RouteCache {
    memo: DashMap<RootId, Arc<RouteIndex>>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by [`index`].
    pub fn global() -> &'static RouteCache {
        &GLOBAL
    }

    /// The index for `root`, building it on first use or when
    /// `force_rebuild` is set. A failed build leaves the cache untouched.
    pub fn get<'a>(&self, root: impl Into<Root<'a>>, force_rebuild: bool) -> Result<Arc<RouteIndex>, Error> {
        let root = root.into();
        let id = root.id();

        if !force_rebuild {
            if let Some(hit) = self.memo.get(&id) {
                debug!(root = ?id, "route index served from cache");
                return Ok(Arc::clone(hit.value()));
            }
        }

        let index = Arc::new(RouteIndex::build(root)?);
        self.memo.insert(id, Arc::clone(&index));
        Ok(index)
    }

    /// Drops the cached index for `root`, if any.
    pub fn forget<'a>(&self, root: impl Into<Root<'a>>) -> Option<Arc<RouteIndex>> {
        self.memo.remove(&root.into().id()).map(|(_, index)| index)
    }

    pub fn clear(&self) {
        self.memo.clear();
    }

    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

/// The index for `root` from the process-wide [`RouteCache`].
///
/// Entries are never evicted on their own. An index for a router that has
/// since been dropped stays cached, along with every handler it references,
/// until [`RouteCache::forget`] or [`RouteCache::clear`] is called on
/// [`RouteCache::global`].
///
/// ```rust
/// # use routestack::{Method, Request, Response, Router};
/// # async fn ping(_: Request) -> Response { Response::text("pong") }
/// let router = Router::new().on(Method::Get, "/ping", ping);
///
/// let first = routestack::index(&router, false).unwrap();
/// let again = routestack::index(&router, false).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &again));
/// ```
pub fn index<'a>(root: impl Into<Root<'a>>, force_rebuild: bool) -> Result<Arc<RouteIndex>, Error> {
    RouteCache::global().get(root, force_rebuild)
}
