//! Shell pass-through detection

use crate::accumulator::FlagAccumulator;
use crate::config::EngineConfig;
use crate::graph::{NodeId, TransactionGraph};

pub const SHELL_PASS_THROUGH: &str = "shell_pass_through";

/// Shell pass-through detection
///
/// A shell is a low-degree intermediary: money enters, money leaves,
/// and the route through it is longer than a one-hop relay.
pub struct ShellDetector;

impl ShellDetector {
    /// Flag shell accounts, nodes in first-appearance order
    pub fn detect(graph: &TransactionGraph, flags: &mut FlagAccumulator<'_>, config: &EngineConfig) {
        for node in graph.nodes() {
            if Self::is_shell(graph, node) {
                flags.flag(node, SHELL_PASS_THROUGH, config.shell_bump, None);
            }
        }
    }

    /// Shell predicate
    ///
    /// The account must carry 2 or 3 incident edges with at least one
    /// in each direction, and sit inside a simple directed path of at
    /// least three edges: some route `p -> n -> s` extends upstream
    /// (`pp -> p -> n -> s`) or downstream (`p -> n -> s -> ss`) with
    /// all four nodes distinct. Bare 3-cycles fail the distinctness
    /// requirement and are left to the cycle detector.
    fn is_shell(graph: &TransactionGraph, node: NodeId) -> bool {
        let in_degree = graph.in_degree(node);
        let out_degree = graph.out_degree(node);
        // With in >= 1 and out >= 1 the degree sum is already >= 2.
        if in_degree == 0 || out_degree == 0 || in_degree + out_degree > 3 {
            return false;
        }

        for &p in graph.in_neighbors(node).iter().filter(|&&p| p != node) {
            for &s in graph
                .out_neighbors(node)
                .iter()
                .filter(|&&s| s != node && s != p)
            {
                let extends_upstream = graph
                    .in_neighbors(p)
                    .iter()
                    .any(|&pp| pp != node && pp != p && pp != s);
                let extends_downstream = graph
                    .out_neighbors(s)
                    .iter()
                    .any(|&ss| ss != node && ss != s && ss != p);
                if extends_upstream || extends_downstream {
                    return true;
                }
            }
        }
        false
    }
}
