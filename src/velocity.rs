//! Per-account temporal-proximity scoring

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::graph::{NodeId, TransactionGraph};

/// Velocity score for an account
///
/// Returns the configured bump when any two distinct incident
/// transactions (either direction) fall closer than the window,
/// otherwise 0. The score is not additive across multiple close
/// pairs. Accounts absent from the graph, and accounts with fewer
/// than two incident edges, score 0. A self-loop is one incident
/// edge and contributes a single timestamp.
pub fn velocity_score(graph: &TransactionGraph, account_id: &str, config: &EngineConfig) -> u32 {
    match graph.node_id(account_id) {
        Some(node) => velocity_score_node(graph, node, config),
        None => 0,
    }
}

pub(crate) fn velocity_score_node(
    graph: &TransactionGraph,
    node: NodeId,
    config: &EngineConfig,
) -> u32 {
    let mut timestamps: Vec<DateTime<Utc>> = graph
        .out_edges(node)
        .iter()
        .map(|&edge| graph.edge(edge).timestamp)
        .collect();
    for &edge in graph.in_edges(node) {
        // Self-loops already contributed via the out-edge pass.
        if graph.edge(edge).from != node {
            timestamps.push(graph.edge(edge).timestamp);
        }
    }

    if timestamps.len() < 2 {
        return 0;
    }
    timestamps.sort();

    for pair in timestamps.windows(2) {
        if (pair[1] - pair[0]).num_seconds() < config.velocity_window_secs {
            return config.velocity_bump;
        }
    }
    0
}
