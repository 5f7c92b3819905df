//! Graph configuration
//!
//! A flat, insertion-ordered mapping from string keys to values. Nested
//! YAML documents are flattened into dotted keys, so
//!
//! ```yaml
//! connectionPool:
//!   maxInProcessPerConnection: 16
//! ```
//!
//! becomes `connectionPool.maxInProcessPerConnection = 16`.

use crate::error::{GraphError, GraphResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Graph implementation name
pub const GRAPH: &str = "gremlin.graph";
/// Remote host (or list of hosts; the first one is used)
pub const HOSTS: &str = "hosts";
/// Remote port
pub const PORT: &str = "port";
/// Maximum in-flight requests per connection
pub const MAX_IN_PROCESS_PER_CONNECTION: &str = "connectionPool.maxInProcessPerConnection";
/// Maximum concurrent users of one connection
pub const MAX_SIMULTANEOUS_USAGE_PER_CONNECTION: &str =
    "connectionPool.maxSimultaneousUsagePerConnection";
/// Wire serializer
pub const SERIALIZER: &str = "serializer.className";

/// A configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ConfigValue>),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value, parsing strings when needed
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            ConfigValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            ConfigValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Boolean(b) => write!(f, "{}", b),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Float(fl) => write!(f, "{}", fl),
            ConfigValue::String(s) => write!(f, "{}", s),
            ConfigValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Integer(i)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Boolean(b)
    }
}

/// Flat key/value configuration owned by a graph instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    entries: IndexMap<String, ConfigValue>,
}

impl Configuration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document, flattening nested mappings
    pub fn from_yaml_str(yaml: &str) -> GraphResult<Self> {
        let doc: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let mut config = Configuration::new();
        match doc {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Mapping(_) => flatten(&mut config, None, doc)?,
            _ => {
                return Err(GraphError::Configuration(
                    "configuration document must be a mapping".to_string(),
                ))
            }
        }
        Ok(config)
    }

    /// Read and parse a YAML configuration file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> GraphResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_integer())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.entries.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy every entry of `other` into this configuration
    pub fn copy_from(&mut self, other: &Configuration) {
        for (k, v) in other.iter() {
            self.entries.insert(k.to_string(), v.clone());
        }
    }
}

fn flatten(config: &mut Configuration, prefix: Option<&str>, value: serde_yaml::Value) -> GraphResult<()> {
    let key_of = |k: &str| match prefix {
        Some(p) => format!("{}.{}", p, k),
        None => k.to_string(),
    };

    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let k = match k {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(GraphError::Configuration(format!(
                            "unsupported configuration key: {:?}",
                            other
                        )))
                    }
                };
                flatten(config, Some(&key_of(&k)), v)?;
            }
        }
        serde_yaml::Value::Null => {}
        leaf => {
            let key = prefix
                .ok_or_else(|| GraphError::Configuration("value without a key".to_string()))?;
            let value: ConfigValue = serde_yaml::from_value(leaf)?;
            config.set_property(key, value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut config = Configuration::new();
        config.set_property(GRAPH, "remote");
        config.set_property(PORT, 8182i64);

        assert_eq!(config.get_str(GRAPH), Some("remote"));
        assert_eq!(config.get_integer(PORT), Some(8182));
        assert_eq!(config.len(), 2);
        assert_eq!(config.keys().collect::<Vec<_>>(), vec![GRAPH, PORT]);
    }

    #[test]
    fn test_clear() {
        let mut config = Configuration::new();
        config.set_property("a", true);
        config.clear();
        assert!(config.is_empty());
    }

    #[test]
    fn test_yaml_flattening() {
        let yaml = r#"
hosts: [graph.example.com]
port: 8183
connectionPool:
  maxInProcessPerConnection: 16
  maxSimultaneousUsagePerConnection: 8
serializer:
  className: org.apache.tinkerpop.gremlin.driver.ser.GraphSONMessageSerializerV3d0
"#;
        let config = Configuration::from_yaml_str(yaml).unwrap();

        assert_eq!(config.get_integer(PORT), Some(8183));
        assert_eq!(config.get_integer(MAX_IN_PROCESS_PER_CONNECTION), Some(16));
        assert_eq!(config.get_integer(MAX_SIMULTANEOUS_USAGE_PER_CONNECTION), Some(8));
        assert_eq!(
            config.get(HOSTS),
            Some(&ConfigValue::List(vec!["graph.example.com".into()]))
        );
        assert!(config.get_str(SERIALIZER).unwrap().ends_with("V3d0"));
    }

    #[test]
    fn test_empty_yaml() {
        assert!(Configuration::from_yaml_str("").unwrap().is_empty());
    }

    #[test]
    fn test_non_mapping_yaml_rejected() {
        let err = Configuration::from_yaml_str("- a\n- b\n").unwrap_err();
        assert!(matches!(err, GraphError::Configuration(_)));
    }

    #[test]
    fn test_copy_from() {
        let mut source = Configuration::new();
        source.set_property("x", 1i64);
        let mut target = Configuration::new();
        target.set_property("y", 2i64);
        target.copy_from(&source);
        assert_eq!(target.len(), 2);
        assert_eq!(target.get_integer("x"), Some(1));
    }
}
