//! remote-graph: command-line client for a Gremlin server
//!
//! Opens a [`RemoteGraph`] against the given server and runs one command.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use remote_graph::protocol::graphson;
use remote_graph::{
    Configuration, ConnectionDescriptor, ExecutionContext, GValue, Graph, RemoteGraph, WireEncoding,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "remote-graph", version, about = "Query a Gremlin server through the remote graph adapter")]
struct Cli {
    /// Server host
    #[arg(long, global = true, env = "REMOTE_GRAPH_HOST")]
    host: Option<String>,

    /// Server port
    #[arg(long, global = true, env = "REMOTE_GRAPH_PORT")]
    port: Option<u16>,

    /// Wire encoding (graphson-v2, graphson-v3, or a MIME type)
    #[arg(long, global = true)]
    encoding: Option<WireEncoding>,

    /// YAML configuration file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List the capabilities the adapter reports
    Features,
    /// Round-trip a trivial traversal
    Ping,
    /// Count vertices and edges on the server
    Count,
    /// Send literal values through the server and print what comes back
    Inject {
        /// Values; integers, floats and booleans are typed, the rest are strings
        #[arg(required = true)]
        values: Vec<String>,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match open_graph(&cli) {
        Ok(graph) => run(graph, &cli).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn open_graph(cli: &Cli) -> CliResult<RemoteGraph> {
    let configuration = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)?,
        None => Configuration::new(),
    };
    let base = ConnectionDescriptor::from_configuration(&configuration)?;

    let descriptor = ConnectionDescriptor::builder(cli.host.clone().unwrap_or_else(|| base.host().to_string()))
        .port(cli.port.unwrap_or(base.port()))
        .wire_encoding(cli.encoding.unwrap_or(base.wire_encoding()))
        .max_in_flight_per_connection(base.max_in_flight_per_connection())
        .max_concurrent_users_per_connection(base.max_concurrent_users_per_connection())
        .build()?;

    Ok(RemoteGraph::open(&configuration, descriptor))
}

async fn run(mut graph: RemoteGraph, cli: &Cli) -> CliResult<()> {
    let ctx = ExecutionContext::new();

    let result = match &cli.command {
        Commands::Features => run_features(&graph, &cli.format),
        Commands::Ping => run_ping(&graph, &ctx).await,
        Commands::Count => run_count(&graph, &ctx, &cli.format).await,
        Commands::Inject { values } => run_inject(&graph, &ctx, values, &cli.format).await,
    };

    graph.close(&ctx).await?;
    result
}

fn run_features(graph: &RemoteGraph, format: &OutputFormat) -> CliResult<()> {
    let features = graph.features();

    match format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = features
                .iter()
                .map(|(capability, supported)| {
                    serde_json::json!({
                        "category": capability.category().name(),
                        "capability": capability.name(),
                        "supported": supported,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Category", "Capability", "Supported"]);
            for (capability, supported) in features.iter() {
                table.add_row(vec![
                    capability.category().name().to_string(),
                    capability.name().to_string(),
                    supported.to_string(),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}

async fn run_ping(graph: &RemoteGraph, ctx: &ExecutionContext) -> CliResult<()> {
    let started = Instant::now();
    let g = graph.traversal(ctx).await?;
    g.inject(vec![GValue::from("ping")]).iterate().await?;
    println!("PONG from {} in {} ms", graph.descriptor().url(), started.elapsed().as_millis());
    Ok(())
}

async fn run_count(graph: &RemoteGraph, ctx: &ExecutionContext, format: &OutputFormat) -> CliResult<()> {
    let g = graph.traversal(ctx).await?;
    let vertices = g.v(vec![]).count().next().await?.unwrap_or(GValue::Int64(0));
    let edges = g.e(vec![]).count().next().await?.unwrap_or(GValue::Int64(0));

    match format {
        OutputFormat::Json => {
            let encoding = graph.descriptor().wire_encoding();
            let out = serde_json::json!({
                "vertices": graphson::encode_value(&vertices, encoding),
                "edges": graphson::encode_value(&edges, encoding),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            println!("Vertices: {}", vertices);
            println!("Edges:    {}", edges);
        }
    }

    Ok(())
}

async fn run_inject(
    graph: &RemoteGraph,
    ctx: &ExecutionContext,
    values: &[String],
    format: &OutputFormat,
) -> CliResult<()> {
    let g = graph.traversal(ctx).await?;
    let results = g.inject(values.iter().map(|v| parse_value(v)).collect()).to_list().await?;

    match format {
        OutputFormat::Json => {
            let encoding = graph.descriptor().wire_encoding();
            let out: Vec<serde_json::Value> = results.iter().map(|v| graphson::encode_value(v, encoding)).collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            if results.is_empty() {
                println!("(no results)");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Type", "Value"]);
            for value in &results {
                table.add_row(vec![value.type_name().to_string(), value.to_string()]);
            }
            println!("{}", table);
            println!("{} result(s)", results.len());
        }
    }

    Ok(())
}

fn parse_value(raw: &str) -> GValue {
    if let Ok(i) = raw.parse::<i64>() {
        return GValue::Int64(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return GValue::Double(f);
    }
    match raw {
        "true" => GValue::Boolean(true),
        "false" => GValue::Boolean(false),
        _ => GValue::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), GValue::Int64(42));
        assert_eq!(parse_value("1.5"), GValue::Double(1.5));
        assert_eq!(parse_value("true"), GValue::Boolean(true));
        assert_eq!(parse_value("marko"), GValue::from("marko"));
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from(["remote-graph", "--host", "db1", "--port", "8190", "--encoding", "graphson-v2", "count"]);
        let graph = open_graph(&cli).unwrap();
        assert_eq!(graph.descriptor().url(), "ws://db1:8190/gremlin");
        assert_eq!(graph.descriptor().wire_encoding(), WireEncoding::GraphSonV2);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["remote-graph", "features"]);
        let graph = open_graph(&cli).unwrap();
        assert_eq!(graph.descriptor(), &ConnectionDescriptor::default());
    }
}
