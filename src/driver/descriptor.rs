//! Connection descriptor
//!
//! Immutable parameters describing how to reach the remote server.

use crate::config::{self, ConfigValue, Configuration};
use crate::error::{GraphError, GraphResult};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8182;
pub const DEFAULT_MAX_IN_FLIGHT_PER_CONNECTION: usize = 32;
pub const DEFAULT_MAX_CONCURRENT_USERS_PER_CONNECTION: usize = 32;

/// Upper bound for either connection limit; both back a tokio semaphore
pub const MAX_CONNECTION_LIMIT: usize = tokio::sync::Semaphore::MAX_PERMITS;

/// WebSocket path served by Gremlin servers
const GREMLIN_PATH: &str = "/gremlin";

/// Serialization format negotiated with the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WireEncoding {
    GraphSonV2,
    #[default]
    GraphSonV3,
}

impl WireEncoding {
    /// MIME type announced in every request frame
    pub fn mime_type(&self) -> &'static str {
        match self {
            WireEncoding::GraphSonV2 => "application/vnd.gremlin-v2.0+json",
            WireEncoding::GraphSonV3 => "application/vnd.gremlin-v3.0+json",
        }
    }
}

impl fmt::Display for WireEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireEncoding::GraphSonV2 => write!(f, "graphson-v2"),
            WireEncoding::GraphSonV3 => write!(f, "graphson-v3"),
        }
    }
}

impl FromStr for WireEncoding {
    type Err = GraphError;

    /// Accepts short names, MIME types and serializer class names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let lower = name.to_ascii_lowercase();
        if lower == "graphson-v3" || lower == WireEncoding::GraphSonV3.mime_type() || name.ends_with("GraphSONMessageSerializerV3d0") {
            Ok(WireEncoding::GraphSonV3)
        } else if lower == "graphson-v2" || lower == WireEncoding::GraphSonV2.mime_type() || name.ends_with("GraphSONMessageSerializerV2d0") {
            Ok(WireEncoding::GraphSonV2)
        } else {
            Err(GraphError::InvalidArgument(format!("unknown wire encoding: {}", name)))
        }
    }
}

/// How to reach the remote server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    host: String,
    port: u16,
    max_in_flight_per_connection: usize,
    max_concurrent_users_per_connection: usize,
    wire_encoding: WireEncoding,
}

impl Default for ConnectionDescriptor {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_in_flight_per_connection: DEFAULT_MAX_IN_FLIGHT_PER_CONNECTION,
            max_concurrent_users_per_connection: DEFAULT_MAX_CONCURRENT_USERS_PER_CONNECTION,
            wire_encoding: WireEncoding::default(),
        }
    }
}

impl ConnectionDescriptor {
    /// Start building a descriptor for the given host
    pub fn builder(host: impl Into<String>) -> ConnectionDescriptorBuilder {
        ConnectionDescriptorBuilder {
            inner: ConnectionDescriptor {
                host: host.into(),
                ..Default::default()
            },
        }
    }

    /// Derive a descriptor from configuration keys, defaulting absent ones
    pub fn from_configuration(configuration: &Configuration) -> GraphResult<Self> {
        let host = match configuration.get(config::HOSTS) {
            None => DEFAULT_HOST.to_string(),
            Some(ConfigValue::List(hosts)) => hosts
                .first()
                .map(|h| h.to_string())
                .ok_or_else(|| GraphError::Configuration("empty host list".to_string()))?,
            Some(other) => other.to_string(),
        };

        let mut builder = ConnectionDescriptor::builder(host);

        if let Some(value) = configuration.get(config::PORT) {
            let port = value
                .as_integer()
                .and_then(|p| u16::try_from(p).ok())
                .ok_or_else(|| GraphError::Configuration(format!("invalid port: {}", value)))?;
            builder = builder.port(port);
        }
        if let Some(limit) = usize_key(configuration, config::MAX_IN_PROCESS_PER_CONNECTION)? {
            builder = builder.max_in_flight_per_connection(limit);
        }
        if let Some(limit) = usize_key(configuration, config::MAX_SIMULTANEOUS_USAGE_PER_CONNECTION)? {
            builder = builder.max_concurrent_users_per_connection(limit);
        }
        if let Some(serializer) = configuration.get_str(config::SERIALIZER) {
            builder = builder.wire_encoding(serializer.parse()?);
        }

        builder.build().map_err(|e| match e {
            GraphError::InvalidArgument(msg) => GraphError::Configuration(msg),
            other => other,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn max_in_flight_per_connection(&self) -> usize {
        self.max_in_flight_per_connection
    }

    pub fn max_concurrent_users_per_connection(&self) -> usize {
        self.max_concurrent_users_per_connection
    }

    pub fn wire_encoding(&self) -> WireEncoding {
        self.wire_encoding
    }

    /// WebSocket URL of the server endpoint
    pub fn url(&self) -> String {
        format!("ws://{}:{}{}", self.host, self.port, GREMLIN_PATH)
    }
}

fn usize_key(configuration: &Configuration, key: &str) -> GraphResult<Option<usize>> {
    match configuration.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .and_then(|v| usize::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| GraphError::Configuration(format!("invalid value for {}: {}", key, value))),
    }
}

/// Builder for [`ConnectionDescriptor`]
#[derive(Debug, Clone)]
pub struct ConnectionDescriptorBuilder {
    inner: ConnectionDescriptor,
}

impl ConnectionDescriptorBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.inner.port = port;
        self
    }

    pub fn max_in_flight_per_connection(mut self, limit: usize) -> Self {
        self.inner.max_in_flight_per_connection = limit;
        self
    }

    pub fn max_concurrent_users_per_connection(mut self, limit: usize) -> Self {
        self.inner.max_concurrent_users_per_connection = limit;
        self
    }

    pub fn wire_encoding(mut self, encoding: WireEncoding) -> Self {
        self.inner.wire_encoding = encoding;
        self
    }

    pub fn build(self) -> GraphResult<ConnectionDescriptor> {
        let d = self.inner;
        if d.host.trim().is_empty() {
            return Err(GraphError::InvalidArgument("host must not be empty".to_string()));
        }
        if d.port == 0 {
            return Err(GraphError::InvalidArgument("port must be non-zero".to_string()));
        }
        for limit in [d.max_in_flight_per_connection, d.max_concurrent_users_per_connection] {
            if limit == 0 || limit > MAX_CONNECTION_LIMIT {
                return Err(GraphError::InvalidArgument(format!(
                    "connection limits must be between 1 and {}, got {}",
                    MAX_CONNECTION_LIMIT, limit
                )));
            }
        }
        Ok(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptor() {
        let d = ConnectionDescriptor::default();
        assert_eq!(d.host(), "localhost");
        assert_eq!(d.port(), 8182);
        assert_eq!(d.max_in_flight_per_connection(), 32);
        assert_eq!(d.max_concurrent_users_per_connection(), 32);
        assert_eq!(d.wire_encoding(), WireEncoding::GraphSonV3);
        assert_eq!(d.url(), "ws://localhost:8182/gremlin");
    }

    #[test]
    fn test_builder_validation() {
        assert!(ConnectionDescriptor::builder("h").port(0).build().is_err());
        assert!(ConnectionDescriptor::builder("h").max_in_flight_per_connection(0).build().is_err());
        assert!(ConnectionDescriptor::builder(" ").build().is_err());
        assert!(ConnectionDescriptor::builder("h")
            .max_concurrent_users_per_connection(MAX_CONNECTION_LIMIT + 1)
            .build()
            .is_err());
        assert!(ConnectionDescriptor::builder("h")
            .max_in_flight_per_connection(MAX_CONNECTION_LIMIT)
            .build()
            .is_ok());

        let d = ConnectionDescriptor::builder("10.0.0.1")
            .port(9000)
            .max_concurrent_users_per_connection(4)
            .wire_encoding(WireEncoding::GraphSonV2)
            .build()
            .unwrap();
        assert_eq!(d.url(), "ws://10.0.0.1:9000/gremlin");
        assert_eq!(d.max_concurrent_users_per_connection(), 4);
        assert_eq!(d.wire_encoding().mime_type(), "application/vnd.gremlin-v2.0+json");
    }

    #[test]
    fn test_wire_encoding_parsing() {
        assert_eq!("graphson-v2".parse::<WireEncoding>().unwrap(), WireEncoding::GraphSonV2);
        assert_eq!(
            "application/vnd.gremlin-v3.0+json".parse::<WireEncoding>().unwrap(),
            WireEncoding::GraphSonV3
        );
        assert_eq!(
            "org.apache.tinkerpop.gremlin.driver.ser.GraphSONMessageSerializerV3d0"
                .parse::<WireEncoding>()
                .unwrap(),
            WireEncoding::GraphSonV3
        );
        assert!("gryo".parse::<WireEncoding>().is_err());
    }

    #[test]
    fn test_from_configuration() {
        let mut conf = Configuration::new();
        assert_eq!(ConnectionDescriptor::from_configuration(&conf).unwrap(), ConnectionDescriptor::default());

        conf.set_property(config::HOSTS, ConfigValue::List(vec!["db1".into(), "db2".into()]));
        conf.set_property(config::PORT, "8190");
        conf.set_property(config::MAX_IN_PROCESS_PER_CONNECTION, 4i64);
        conf.set_property(config::SERIALIZER, "graphson-v2");
        let d = ConnectionDescriptor::from_configuration(&conf).unwrap();
        assert_eq!(d.host(), "db1");
        assert_eq!(d.port(), 8190);
        assert_eq!(d.max_in_flight_per_connection(), 4);
        assert_eq!(d.wire_encoding(), WireEncoding::GraphSonV2);
    }

    #[test]
    fn test_from_configuration_rejects_oversized_limit() {
        let mut conf = Configuration::new();
        conf.set_property(config::MAX_IN_PROCESS_PER_CONNECTION, i64::MAX);
        let err = ConnectionDescriptor::from_configuration(&conf).unwrap_err();
        assert!(matches!(err, GraphError::Configuration(msg) if msg.contains("connection limits")));
    }

    #[test]
    fn test_from_configuration_rejects_bad_port() {
        let mut conf = Configuration::new();
        conf.set_property(config::PORT, 70000i64);
        let err = ConnectionDescriptor::from_configuration(&conf).unwrap_err();
        assert!(matches!(err, GraphError::Configuration(_)));
    }
}
