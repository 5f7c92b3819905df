//! Capability descriptor
//!
//! Conformance harnesses query these flags to skip tests for behaviour the
//! graph does not offer. Every capability of the remote adapter is reported
//! as unsupported: there is no local engine behind it, and anything the
//! server can do is reached through the traversal source instead.

use serde::Serialize;
use std::fmt;

/// Capability groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FeatureCategory {
    Graph,
    Vertex,
    Edge,
    VertexProperty,
}

impl FeatureCategory {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureCategory::Graph => "GraphFeatures",
            FeatureCategory::Vertex => "VertexFeatures",
            FeatureCategory::Edge => "EdgeFeatures",
            FeatureCategory::VertexProperty => "VertexPropertyFeatures",
        }
    }
}

macro_rules! capabilities {
    ($( $variant:ident => ($category:ident, $name:literal) ),+ $(,)?) => {
        /// Every optional behaviour a graph can declare
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum Capability {
            $( $variant, )+
        }

        impl Capability {
            /// All capabilities in listing order
            pub const ALL: &'static [Capability] = &[ $( Capability::$variant, )+ ];

            pub fn category(&self) -> FeatureCategory {
                match self {
                    $( Capability::$variant => FeatureCategory::$category, )+
                }
            }

            /// Display name, e.g. `Transactions`
            pub fn name(&self) -> &'static str {
                match self {
                    $( Capability::$variant => $name, )+
                }
            }
        }
    };
}

capabilities! {
    Transactions => (Graph, "Transactions"),
    ThreadedTransactions => (Graph, "ThreadedTransactions"),
    Computer => (Graph, "Computer"),
    Variables => (Graph, "Variables"),
    VariableBooleanValues => (Graph, "BooleanValues"),
    VariableByteValues => (Graph, "ByteValues"),
    VariableDoubleValues => (Graph, "DoubleValues"),
    VariableFloatValues => (Graph, "FloatValues"),
    VariableIntegerValues => (Graph, "IntegerValues"),
    VariableLongValues => (Graph, "LongValues"),
    VariableMapValues => (Graph, "MapValues"),
    VariableMixedListValues => (Graph, "MixedListValues"),
    VariableBooleanArrayValues => (Graph, "BooleanArrayValues"),
    VariableByteArrayValues => (Graph, "ByteArrayValues"),
    VariableDoubleArrayValues => (Graph, "DoubleArrayValues"),
    VariableFloatArrayValues => (Graph, "FloatArrayValues"),
    VariableIntegerArrayValues => (Graph, "IntegerArrayValues"),
    VariableStringArrayValues => (Graph, "StringArrayValues"),
    VariableLongArrayValues => (Graph, "LongArrayValues"),
    VariableSerializableValues => (Graph, "SerializableValues"),
    VariableStringValues => (Graph, "StringValues"),
    VariableUniformListValues => (Graph, "UniformListValues"),
    AddVertices => (Vertex, "AddVertices"),
    RemoveVertices => (Vertex, "RemoveVertices"),
    VertexAddProperty => (Vertex, "AddProperty"),
    VertexRemoveProperty => (Vertex, "RemoveProperty"),
    VertexCustomIds => (Vertex, "CustomIds"),
    VertexPropertyRemoveProperty => (VertexProperty, "RemoveProperty"),
    VertexPropertyCustomIds => (VertexProperty, "CustomIds"),
    AddEdges => (Edge, "AddEdges"),
    RemoveEdges => (Edge, "RemoveEdges"),
    EdgeAddProperty => (Edge, "AddProperty"),
    EdgeRemoveProperty => (Edge, "RemoveProperty"),
    EdgeCustomIds => (Edge, "CustomIds"),
}

/// Immutable set of supported capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Features {
    supported: &'static [Capability],
}

/// Features of the remote adapter: nothing is supported locally
pub static REMOTE_FEATURES: Features = Features { supported: &[] };

impl Features {
    pub fn supports(&self, capability: Capability) -> bool {
        self.supported.contains(&capability)
    }

    /// Every capability paired with its answer
    pub fn iter(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        Capability::ALL.iter().map(move |c| (*c, self.supports(*c)))
    }

    /// Capabilities of one category
    pub fn category(&self, category: FeatureCategory) -> impl Iterator<Item = (Capability, bool)> + '_ {
        self.iter().filter(move |(c, _)| c.category() == category)
    }
}

impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FEATURES")?;
        for category in [
            FeatureCategory::Graph,
            FeatureCategory::Vertex,
            FeatureCategory::VertexProperty,
            FeatureCategory::Edge,
        ] {
            writeln!(f, "> {}", category.name())?;
            for (capability, supported) in self.category(category) {
                writeln!(f, ">-- {}: {}", capability.name(), supported)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_capabilities_unsupported() {
        for &capability in Capability::ALL {
            assert!(!REMOTE_FEATURES.supports(capability), "{:?}", capability);
        }
        assert!(REMOTE_FEATURES.iter().all(|(_, supported)| !supported));
    }

    #[test]
    fn test_category_sizes() {
        let count = |c| REMOTE_FEATURES.category(c).count();
        assert_eq!(count(FeatureCategory::Graph), 22);
        assert_eq!(count(FeatureCategory::Vertex), 5);
        assert_eq!(count(FeatureCategory::VertexProperty), 2);
        assert_eq!(count(FeatureCategory::Edge), 5);
        assert_eq!(Capability::ALL.len(), 34);
    }

    #[test]
    fn test_display_listing() {
        let listing = REMOTE_FEATURES.to_string();
        assert!(listing.starts_with("FEATURES\n> GraphFeatures\n>-- Transactions: false\n"));
        assert!(listing.contains("> EdgeFeatures\n>-- AddEdges: false"));
        assert!(!listing.contains("true"));
    }

    #[test]
    fn test_serializes_as_data() {
        let json = serde_json::to_value(REMOTE_FEATURES).unwrap();
        assert_eq!(json, serde_json::json!({ "supported": [] }));
        assert_eq!(
            serde_json::to_value(Capability::VertexCustomIds).unwrap(),
            serde_json::json!("VertexCustomIds")
        );
    }
}
