//! A single flattened route.
//!
//! A router has no notion of a "route" as a finished object: at request time
//! it walks its stack, testing each layer's matcher, and builds one chain of
//! handlers on the fly. A [`Route`] is that chain written down ahead of time
//! for one method + path pair.
//!
//! The stack holds [`HandlerRef`]s into the live router, not copies. The
//! same middleware entry sits in the stack of every route below it, and
//! [`HandlerRef::replace`] on any of them changes what the real router runs.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;

use crate::layer::HandlerRef;
use crate::method::Method;
use crate::path::route_id;

/// One method + path pair and every handler that runs for it, in order.
#[derive(Clone, Debug)]
pub struct Route {
    id: String,
    method: Method,
    path: String,
    stack: Vec<HandlerRef>,
}

impl Route {
    pub(crate) fn new(method: Method, path: String, stack: Vec<HandlerRef>) -> Self {
        Self {
            id: route_id(method.as_str(), &path),
            method,
            path,
            stack,
        }
    }

    /// Lowercased method + path with non-word characters removed
    /// (`GET /api/users` → `getapiusers`). Not guaranteed unique.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Fully resolved, normalized path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Inherited middleware, outer to inner, then the route's own handlers
    /// for this method.
    pub fn stack(&self) -> &[HandlerRef] {
        &self.stack
    }

    /// First handler in the stack called `name`.
    ///
    /// The returned reference points into the live router: call it as a
    /// plain function, or [`replace`](HandlerRef::replace) it to intercept it.
    pub fn handler(&self, name: &str) -> Option<&HandlerRef> {
        self.stack.iter().find(|h| h.name() == name)
    }

    /// Handler names in stack order. The iterator can be cloned to restart it.
    pub fn handler_names(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.stack.iter().map(HandlerRef::name)
    }

    /// `{id, path, method, stack}` with the stack reduced to handler names.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "path": self.path,
            "method": self.method.as_str(),
            "stack": self.handler_names().collect::<Vec<_>>(),
        })
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names: Vec<&str> = self.handler_names().collect();
        let mut state = serializer.serialize_struct("Route", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("method", &self.method)?;
        state.serialize_field("stack", &names)?;
        state.end()
    }
}

/// `GET /api/users [auth, list_users]`
impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [", self.method, self.path)?;
        for (i, name) in self.handler_names().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
        }
        f.write_str("]")
    }
}
