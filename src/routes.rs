//! Route table: the ordered mapping of route paths to backend addresses.

use indexmap::IndexMap;
use log::{debug, warn};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Ordered mapping from route path template to backend base address.
///
/// Routes are unique by path and keep insertion order, which is also the order the
/// generated document lists them in. Inserting a path that is already present replaces
/// its backend address (last wins) while keeping the path's original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: IndexMap<String, String>,
}

impl RouteTable {
    /// Create an empty route table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route, returning the backend address it replaced, if any.
    pub fn insert(&mut self, path: impl Into<String>, backend_address: impl Into<String>) -> Option<String> {
        let path = path.into();
        let backend_address = backend_address.into();
        debug!("Registering route {} -> {}", path, backend_address);

        let previous = self.routes.insert(path.clone(), backend_address);
        if let Some(ref old) = previous {
            warn!(
                "Duplicate route {}: replacing backend {} with {}",
                path, old, self.routes[&path]
            );
        }
        previous
    }

    /// Backend address registered for `path`
    pub fn get(&self, path: &str) -> Option<&str> {
        self.routes.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate over `(path, backend_address)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|(path, addr)| (path.as_str(), addr.as_str()))
    }
}

impl<P: Into<String>, A: Into<String>> Extend<(P, A)> for RouteTable {
    fn extend<I: IntoIterator<Item = (P, A)>>(&mut self, iter: I) {
        for (path, backend_address) in iter {
            self.insert(path, backend_address);
        }
    }
}

impl<P: Into<String>, A: Into<String>> FromIterator<(P, A)> for RouteTable {
    fn from_iter<I: IntoIterator<Item = (P, A)>>(iter: I) -> Self {
        let mut table = RouteTable::new();
        table.extend(iter);
        table
    }
}

// Deserialized through `insert` so repeated keys follow the same policy and warning.
impl<'de> Deserialize<'de> for RouteTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RouteTableVisitor;

        impl<'de> Visitor<'de> for RouteTableVisitor {
            type Value = RouteTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of route paths to backend addresses")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<RouteTable, M::Error> {
                let mut table = RouteTable::new();
                while let Some((path, backend_address)) = map.next_entry::<String, String>()? {
                    table.insert(path, backend_address);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(RouteTableVisitor)
    }
}
