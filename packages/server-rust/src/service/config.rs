use strata_core::stream_operations::action;

/// Default root under which acknowledgment nodes are written.
pub const DEFAULT_COORDINATION_ROOT: &str = "/strata/streaming/replies";

/// Engine-level configuration for the dispatch framework.
///
/// Controls where acknowledgments land, whether high-volume inserts are
/// acknowledged, and which streams are reserved for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Unique identifier for this engine node.
    pub node_id: String,
    /// Root path in the coordination store for acknowledgment nodes.
    pub coordination_root: String,
    /// Write one acknowledgment node per inserted record. Off by default:
    /// inserts are high-volume and the insert processor logs instead.
    pub acknowledge_inserts: bool,
    /// Engine-owned streams that users may only observe.
    pub internal_streams: Vec<String>,
    /// Operations allowed on internal streams.
    pub internal_stream_operations: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            node_id: String::new(),
            coordination_root: DEFAULT_COORDINATION_ROOT.to_string(),
            acknowledge_inserts: false,
            internal_streams: vec![
                "strata_stats_base".to_string(),
                "strata_stats_by_operation".to_string(),
            ],
            internal_stream_operations: [
                action::LISTEN,
                action::STOP_LISTEN,
                action::INDEX,
                action::STOP_INDEX,
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.coordination_root, DEFAULT_COORDINATION_ROOT);
        assert!(!config.acknowledge_inserts);
        assert_eq!(config.internal_streams.len(), 2);
        assert!(config
            .internal_stream_operations
            .iter()
            .any(|op| op == "LISTEN"));
    }
}
