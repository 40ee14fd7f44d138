//! Dispatch a JSON batch of streaming control messages through the standard
//! processors and print the acknowledgments written to the coordination
//! store, one JSON document per line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use strata_core::decode_batch;
use strata_server::logging::{init_tracing, LogFormat};
use strata_server::service::ack::CoordinationSink;
use strata_server::service::config::{EngineConfig, DEFAULT_COORDINATION_ROOT};
use strata_server::service::domain::{insert_processor, stream_definition_processor};
use strata_server::service::registry::ProcessorRegistry;
use strata_server::storage::{AckRecord, CoordinationStore, HashMapCoordinationStore};
use strata_server::streams::InMemoryStreamService;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "dispatch-batch", version, about = "Dispatch a batch of streaming control messages")]
struct Args {
    /// JSON file holding an array of messages.
    batch: PathBuf,

    /// Identifier of this engine node.
    #[arg(long, env = "STRATA_NODE_ID", default_value = "local")]
    node_id: String,

    /// Root path for acknowledgment nodes.
    #[arg(long, env = "STRATA_COORDINATION_ROOT", default_value = DEFAULT_COORDINATION_ROOT)]
    coordination_root: String,

    /// Store acknowledgments for rejected inserts instead of only logging them.
    #[arg(long, env = "STRATA_ACKNOWLEDGE_INSERTS")]
    acknowledge_inserts: bool,

    /// Comma-separated engine-owned streams. Defaults to the built-in stats streams.
    #[arg(long, env = "STRATA_INTERNAL_STREAMS", value_delimiter = ',')]
    internal_streams: Option<Vec<String>>,

    #[arg(long, env = "STRATA_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// `EnvFilter` directives; overrides `RUST_LOG`.
    #[arg(long, env = "STRATA_LOG")]
    log_filter: Option<String>,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            node_id: self.node_id.clone(),
            coordination_root: self.coordination_root.clone(),
            acknowledge_inserts: self.acknowledge_inserts,
            internal_streams: self
                .internal_streams
                .clone()
                .unwrap_or(defaults.internal_streams),
            internal_stream_operations: defaults.internal_stream_operations,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format, args.log_filter.as_deref())?;
    let config = args.engine_config();

    let bytes = std::fs::read(&args.batch)
        .with_context(|| format!("failed to read {}", args.batch.display()))?;
    let batch = decode_batch(&bytes)
        .with_context(|| format!("failed to decode batch {}", args.batch.display()))?;

    let service = Arc::new(InMemoryStreamService::from_config(&config));
    let store = Arc::new(HashMapCoordinationStore::new());

    let registry = ProcessorRegistry::new();
    registry.register(stream_definition_processor(
        service.clone(),
        Arc::new(CoordinationSink::new(store.clone(), config.coordination_root.clone())),
    ))?;
    registry.register(insert_processor(service, &config, store.clone()))?;

    info!(
        node_id = %config.node_id,
        messages = batch.len(),
        processors = registry.len(),
        "dispatching batch"
    );
    for (processor, report) in registry.dispatch_all(&batch)? {
        info!(
            processor,
            received = report.received,
            dropped = report.dropped,
            completed = report.completed,
            rejected = report.rejected,
            failed = report.failed,
            acknowledged = report.acknowledged,
            "processor finished"
        );
    }

    for path in store.list(&config.coordination_root) {
        let Some(node) = store.get(&path)? else {
            continue;
        };
        let record: AckRecord = serde_json::from_slice(&node.data)
            .with_context(|| format!("corrupt acknowledgment at {path}"))?;
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}
