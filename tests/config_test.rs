//! Opening a graph from a YAML configuration file

mod common;

use common::MockServer;
use remote_graph::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_graph_from_yaml_file() {
    let server = MockServer::start().await;
    let file = write_config(&format!(
        "gremlin:\n  graph: remote_graph::RemoteGraph\nhosts: [127.0.0.1]\nport: {}\nconnectionPool:\n  maxInProcessPerConnection: 4\n",
        server.port
    ));

    let configuration = Configuration::from_yaml_file(file.path()).unwrap();
    assert_eq!(configuration.get_str("gremlin.graph"), Some("remote_graph::RemoteGraph"));

    let graph = RemoteGraph::from_configuration(&configuration).unwrap();
    assert_eq!(graph.descriptor().port(), server.port);
    assert_eq!(graph.descriptor().max_in_flight_per_connection(), 4);

    let ctx = ExecutionContext::new();
    let g = graph.traversal(&ctx).await.unwrap();
    assert_eq!(g.v(vec![]).count().next().await.unwrap(), Some(GValue::Int64(2)));
    assert_eq!(server.connections(), 1);
}

#[tokio::test]
async fn test_serializer_selects_wire_encoding() {
    let server = MockServer::start().await;
    let file = write_config(&format!(
        "hosts: [127.0.0.1]\nport: {}\nserializer:\n  className: org.apache.tinkerpop.gremlin.driver.ser.GraphSONMessageSerializerV2d0\n",
        server.port
    ));

    let configuration = Configuration::from_yaml_file(file.path()).unwrap();
    let graph = RemoteGraph::from_configuration(&configuration).unwrap();
    assert_eq!(graph.descriptor().wire_encoding(), WireEncoding::GraphSonV2);

    let ctx = ExecutionContext::new();
    let g = graph.traversal(&ctx).await.unwrap();
    g.e(vec![]).iterate().await.unwrap();
    assert_eq!(server.mime_types(), vec!["application/vnd.gremlin-v2.0+json".to_string()]);
}

#[test]
fn test_invalid_port_is_a_configuration_error() {
    let file = write_config("hosts: [127.0.0.1]\nport: 0\n");
    let configuration = Configuration::from_yaml_file(file.path()).unwrap();

    let err = RemoteGraph::from_configuration(&configuration).err().unwrap();
    assert!(matches!(err, GraphError::Configuration(_)));
}

#[test]
fn test_oversized_connection_limit_is_a_configuration_error() {
    let file = write_config(&format!(
        "hosts: [127.0.0.1]\nconnectionPool:\n  maxInProcessPerConnection: {}\n",
        i64::MAX
    ));
    let configuration = Configuration::from_yaml_file(file.path()).unwrap();

    let err = RemoteGraph::from_configuration(&configuration).err().unwrap();
    assert!(matches!(err, GraphError::Configuration(_)));
}

#[test]
fn test_missing_file() {
    let err = Configuration::from_yaml_file("/nonexistent/remote-graph.yaml").unwrap_err();
    assert!(matches!(err, GraphError::Configuration(_)));
}
