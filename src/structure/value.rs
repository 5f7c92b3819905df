//! Typed values exchanged with the remote server
//!
//! Covers the value types a GraphSON response can carry: scalars,
//! collections, tokens and detached graph elements.

use super::element::{Edge, Property, Vertex, VertexProperty};
use std::fmt;
use uuid::Uuid;

/// Traversal tokens addressing the structural parts of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum T {
    Id,
    Label,
    Key,
    Value,
}

impl T {
    /// Accessor name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            T::Id => "id",
            T::Label => "label",
            T::Key => "key",
            T::Value => "value",
        }
    }

    /// Resolve a token from its accessor name
    pub fn from_accessor(name: &str) -> Option<T> {
        match name {
            "id" => Some(T::Id),
            "label" => Some(T::Label),
            "key" => Some(T::Key),
            "value" => Some(T::Value),
            _ => None,
        }
    }
}

impl fmt::Display for T {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value returned by, or sent to, the remote graph
#[derive(Debug, Clone, PartialEq)]
pub enum GValue {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    String(String),
    Uuid(Uuid),
    Date(i64), // Unix timestamp in milliseconds
    List(Vec<GValue>),
    Set(Vec<GValue>),
    Map(Vec<(GValue, GValue)>),
    Token(T),
    Vertex(Box<Vertex>),
    Edge(Box<Edge>),
    VertexProperty(Box<VertexProperty>),
    Property(Box<Property>),
}

impl GValue {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, GValue::Null)
    }

    /// Get string value if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            GValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get an integer value, widening 32-bit integers
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GValue::Int32(i) => Some(*i as i64),
            GValue::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Get a floating point value, widening 32-bit floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GValue::Float(f) => Some(*f as f64),
            GValue::Double(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            GValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the items of a list or set
    pub fn as_list(&self) -> Option<&[GValue]> {
        match self {
            GValue::List(items) | GValue::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_vertex(&self) -> Option<&Vertex> {
        match self {
            GValue::Vertex(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            GValue::Edge(e) => Some(e),
            _ => None,
        }
    }

    /// Look up an entry of a map value by key
    pub fn get(&self, key: &GValue) -> Option<&GValue> {
        match self {
            GValue::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            GValue::Null => "Null",
            GValue::Boolean(_) => "Boolean",
            GValue::Int32(_) => "Int32",
            GValue::Int64(_) => "Int64",
            GValue::Float(_) => "Float",
            GValue::Double(_) => "Double",
            GValue::String(_) => "String",
            GValue::Uuid(_) => "UUID",
            GValue::Date(_) => "Date",
            GValue::List(_) => "List",
            GValue::Set(_) => "Set",
            GValue::Map(_) => "Map",
            GValue::Token(_) => "T",
            GValue::Vertex(_) => "Vertex",
            GValue::Edge(_) => "Edge",
            GValue::VertexProperty(_) => "VertexProperty",
            GValue::Property(_) => "Property",
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[GValue]) -> fmt::Result {
    for (i, val) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", val)?;
    }
    Ok(())
}

impl fmt::Display for GValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GValue::Null => write!(f, "null"),
            GValue::Boolean(b) => write!(f, "{}", b),
            GValue::Int32(i) => write!(f, "{}", i),
            GValue::Int64(i) => write!(f, "{}", i),
            GValue::Float(fl) => write!(f, "{}", fl),
            GValue::Double(fl) => write!(f, "{}", fl),
            GValue::String(s) => write!(f, "{}", s),
            GValue::Uuid(u) => write!(f, "{}", u),
            GValue::Date(ms) => write!(f, "Date({})", ms),
            GValue::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            GValue::Set(items) => {
                write!(f, "{{")?;
                write_items(f, items)?;
                write!(f, "}}")
            }
            GValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, val)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", key, val)?;
                }
                write!(f, "}}")
            }
            GValue::Token(t) => write!(f, "T.{}", t),
            GValue::Vertex(v) => write!(f, "{}", v),
            GValue::Edge(e) => write!(f, "{}", e),
            GValue::VertexProperty(vp) => write!(f, "{}", vp),
            GValue::Property(p) => write!(f, "{}", p),
        }
    }
}

// Convenience conversions
impl From<String> for GValue {
    fn from(s: String) -> Self {
        GValue::String(s)
    }
}

impl From<&str> for GValue {
    fn from(s: &str) -> Self {
        GValue::String(s.to_string())
    }
}

impl From<i64> for GValue {
    fn from(i: i64) -> Self {
        GValue::Int64(i)
    }
}

impl From<i32> for GValue {
    fn from(i: i32) -> Self {
        GValue::Int32(i)
    }
}

impl From<f64> for GValue {
    fn from(f: f64) -> Self {
        GValue::Double(f)
    }
}

impl From<f32> for GValue {
    fn from(f: f32) -> Self {
        GValue::Float(f)
    }
}

impl From<bool> for GValue {
    fn from(b: bool) -> Self {
        GValue::Boolean(b)
    }
}

impl From<Uuid> for GValue {
    fn from(u: Uuid) -> Self {
        GValue::Uuid(u)
    }
}

impl From<T> for GValue {
    fn from(t: T) -> Self {
        GValue::Token(t)
    }
}

impl From<Vec<GValue>> for GValue {
    fn from(items: Vec<GValue>) -> Self {
        GValue::List(items)
    }
}

impl From<Vertex> for GValue {
    fn from(v: Vertex) -> Self {
        GValue::Vertex(Box::new(v))
    }
}

impl From<Edge> for GValue {
    fn from(e: Edge) -> Self {
        GValue::Edge(Box::new(e))
    }
}
