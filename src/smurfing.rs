//! Temporal smurfing detection (fan-out and fan-in bursts)

use chrono::{DateTime, Utc};

use crate::accumulator::FlagAccumulator;
use crate::config::EngineConfig;
use crate::graph::{EdgeId, TransactionGraph};

pub const FAN_OUT_SMURFING: &str = "fan_out_smurfing";
pub const FAN_IN_SMURFING: &str = "fan_in_smurfing";

/// Temporal smurfing detection
///
/// A burst is `smurfing_burst_size` same-direction transactions whose
/// sorted timestamps fit inside the rolling window. Each direction
/// carries its own false-positive gate.
pub struct SmurfingDetector;

impl SmurfingDetector {
    /// Flag fan-out and fan-in bursts
    ///
    /// Runs the full fan-out pass before the fan-in pass, nodes in
    /// first-appearance order; the pass order decides first-flagging
    /// order for accounts hit by both.
    pub fn detect(graph: &TransactionGraph, flags: &mut FlagAccumulator<'_>, config: &EngineConfig) {
        for node in graph.nodes() {
            if Self::has_burst(graph, graph.out_edges(node), config)
                && Self::all_receivers_forward(graph, graph.out_edges(node))
            {
                flags.flag(node, FAN_OUT_SMURFING, config.smurfing_bump, None);
            }
        }

        for node in graph.nodes() {
            if Self::has_burst(graph, graph.in_edges(node), config) && graph.out_degree(node) == 1 {
                flags.flag(node, FAN_IN_SMURFING, config.smurfing_bump, None);
            }
        }
    }

    /// Sliding-window test over the edges' sorted timestamps
    fn has_burst(graph: &TransactionGraph, edges: &[EdgeId], config: &EngineConfig) -> bool {
        if edges.len() < config.smurfing_burst_size {
            return false;
        }
        let mut timestamps: Vec<DateTime<Utc>> = edges
            .iter()
            .map(|&edge| graph.edge(edge).timestamp)
            .collect();
        timestamps.sort();

        timestamps
            .windows(config.smurfing_burst_size)
            .any(|window| {
                (window[window.len() - 1] - window[0]).num_seconds() <= config.smurfing_window_secs
            })
    }

    /// Fan-out gate: a burst is only smurfing when every receiver
    /// moves money on; a single pure sink suppresses the flag
    fn all_receivers_forward(graph: &TransactionGraph, edges: &[EdgeId]) -> bool {
        edges
            .iter()
            .all(|&edge| graph.out_degree(graph.edge(edge).to) > 0)
    }
}
