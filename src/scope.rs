//! Positions in the cell/node/server hierarchy
//!
//! A [`Scope`] is written as a containment path, the same notation the
//! administrative console uses:
//!
//! ```text
//! /Cell:Cell01/                               cell scope
//! /Cell:Cell01/Node:Node01/                   node scope
//! /Cell:Cell01/Node:Node01/Server:server1/    server scope
//! ```
//!
//! An empty name at any level is a wildcard, so `/Cell:/` (or just `/`)
//! selects the whole hierarchy. Used as a query, a scope contains every
//! location whose named levels agree with it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A location or query in the cell/node/server hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scope {
    cell: Option<String>,
    node: Option<String>,
    server: Option<String>,
}

impl Scope {
    /// The whole hierarchy.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn cell(name: &str) -> Self {
        Self {
            cell: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn node(cell: &str, node: &str) -> Self {
        Self {
            cell: Some(cell.to_string()),
            node: Some(node.to_string()),
            server: None,
        }
    }

    pub fn server(cell: &str, node: &str, server: &str) -> Self {
        Self {
            cell: Some(cell.to_string()),
            node: Some(node.to_string()),
            server: Some(server.to_string()),
        }
    }

    pub fn node_name(&self) -> Option<&str> {
        self.node.as_deref()
    }

    pub fn server_name(&self) -> Option<&str> {
        self.server.as_deref()
    }

    /// This scope with its cell level filled in, if it was a wildcard.
    pub fn in_cell(&self, cell: &str) -> Scope {
        Scope {
            cell: Some(self.cell.clone().unwrap_or_else(|| cell.to_string())),
            ..self.clone()
        }
    }

    /// Whether `location` lies at or beneath this scope.
    pub fn contains(&self, location: &Scope) -> bool {
        fn level(query: &Option<String>, location: &Option<String>) -> bool {
            match query {
                None => true,
                Some(name) => location.as_deref() == Some(name.as_str()),
            }
        }

        level(&self.cell, &location.cell)
            && level(&self.node, &location.node)
            && level(&self.server, &location.server)
    }

    /// Parse a containment path such as `/Cell:c/Node:n/`.
    pub fn parse(path: &str) -> Result<Self> {
        let mut scope = Scope::default();
        let mut depth = 0;

        for segment in path.trim().split('/').filter(|s| !s.is_empty()) {
            let (kind, name) = segment.split_once(':').ok_or_else(|| Error::ConfigParse {
                message: format!("invalid scope segment '{}' in '{}'", segment, path),
                hint: Some(
                    "segments look like Cell:<name>, Node:<name> or Server:<name>".to_string(),
                ),
            })?;

            let rank = match kind {
                "Cell" => 1,
                "Node" => 2,
                "Server" => 3,
                other => {
                    return Err(Error::config(format!(
                        "unknown scope level '{}' in '{}'",
                        other, path
                    )))
                }
            };
            if rank <= depth {
                return Err(Error::config(format!(
                    "scope levels out of order in '{}' (expected Cell, Node, Server)",
                    path
                )));
            }
            depth = rank;

            let name = (!name.is_empty()).then(|| name.to_string());
            match rank {
                1 => scope.cell = name,
                2 => scope.node = name,
                _ => scope.server = name,
            }
        }

        Ok(scope)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/Cell:{}/", self.cell.as_deref().unwrap_or(""))?;
        if let Some(node) = &self.node {
            write!(f, "Node:{}/", node)?;
        }
        if let Some(server) = &self.server {
            write!(f, "Server:{}/", server)?;
        }
        Ok(())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Scope::parse(s)
    }
}

impl TryFrom<String> for Scope {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Scope::parse(&value)
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.to_string()
    }
}
