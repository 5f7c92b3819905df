//! Detached graph elements returned by the remote server
//!
//! Elements are references: they carry the identifier and label the server
//! reported plus whatever properties it chose to include. Nothing here is
//! stored locally.

use super::value::GValue;
use std::fmt;

/// A vertex reported by the remote graph
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Server-assigned identifier
    pub id: GValue,
    /// Vertex label
    pub label: String,
    /// Properties included in the response (often empty)
    pub properties: Vec<VertexProperty>,
}

impl Vertex {
    pub fn new(id: impl Into<GValue>, label: impl Into<String>) -> Self {
        Vertex {
            id: id.into(),
            label: label.into(),
            properties: Vec::new(),
        }
    }

    /// First value reported for the given property key
    pub fn property(&self, key: &str) -> Option<&GValue> {
        self.properties
            .iter()
            .find(|p| p.label == key)
            .map(|p| &p.value)
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v[{}]", self.id)
    }
}

/// An edge reported by the remote graph
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: GValue,
    pub label: String,
    /// Tail vertex
    pub out_v: Vertex,
    /// Head vertex
    pub in_v: Vertex,
    pub properties: Vec<Property>,
}

impl Edge {
    pub fn property(&self, key: &str) -> Option<&GValue> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| &p.value)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "e[{}][{}-{}->{}]",
            self.id, self.out_v.id, self.label, self.in_v.id
        )
    }
}

/// A property attached to a vertex, which carries its own identifier
#[derive(Debug, Clone, PartialEq)]
pub struct VertexProperty {
    pub id: GValue,
    /// Property key
    pub label: String,
    pub value: GValue,
}

impl fmt::Display for VertexProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vp[{}->{}]", self.label, self.value)
    }
}

/// A plain key/value property, as found on edges
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: GValue,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p[{}->{}]", self.key, self.value)
    }
}
