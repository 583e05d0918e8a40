//! Bounded simple-cycle enumeration (fraud rings)

use tracing::warn;

use crate::accumulator::FlagAccumulator;
use crate::config::EngineConfig;
use crate::graph::{NodeId, TransactionGraph};
use crate::report::FraudRing;

/// Ring pattern type attached to every ring record
pub const RING_PATTERN_TYPE: &str = "cycle";

/// Bounded cycle detection
///
/// Enumerates every simple directed cycle whose node count falls
/// within the configured bounds, assigns each a `RING_NN` identifier
/// in enumeration order, and flags every member.
pub struct CycleDetector;

impl CycleDetector {
    /// Enumerate rings, flag their members, and return the ring records
    ///
    /// Enumeration is deterministic: the search roots at each node in
    /// first-appearance order, is confined to the root's strongly
    /// connected component and to nodes with index >= the root, and
    /// explores successors in insertion order. Each enumerated cycle
    /// becomes its own ring even when rings share members; a member's
    /// `cycle_length_{L}` tags deduplicate in the accumulator.
    pub fn detect(
        graph: &TransactionGraph,
        flags: &mut FlagAccumulator<'_>,
        config: &EngineConfig,
    ) -> Vec<FraudRing> {
        let (cycles, truncated) = Self::enumerate(graph, config);
        if truncated {
            warn!(
                "cycle enumeration stopped after {} cycles; continuing with partial results",
                config.max_cycles
            );
        }

        let mut rings = Vec::with_capacity(cycles.len());
        for (counter, cycle) in cycles.iter().enumerate() {
            let ring_id = format!("RING_{:02}", counter + 1);
            let tag = format!("cycle_length_{}", cycle.len());
            for &member in cycle {
                flags.flag(member, &tag, config.cycle_bump, Some(&ring_id));
            }
            rings.push(FraudRing {
                ring_id,
                member_accounts: cycle
                    .iter()
                    .map(|&member| graph.account(member).to_string())
                    .collect(),
                pattern_type: RING_PATTERN_TYPE.to_string(),
                risk_score: config.ring_risk_score,
            });
        }
        rings
    }

    /// All simple cycles within the length bounds, plus whether the
    /// enumeration budget cut the search short
    fn enumerate(graph: &TransactionGraph, config: &EngineConfig) -> (Vec<Vec<NodeId>>, bool) {
        let n = graph.node_count();
        let adjacency: Vec<Vec<NodeId>> =
            graph.nodes().map(|node| graph.out_neighbors(node)).collect();
        let component_of = strongly_connected_components(&adjacency);

        let mut component_sizes = vec![0usize; n];
        for &component in &component_of {
            component_sizes[component] += 1;
        }

        let mut cycles = Vec::new();
        let mut on_path = vec![false; n];
        let mut path = Vec::with_capacity(config.max_cycle_len);

        for root in graph.nodes() {
            // A simple cycle of >= 3 nodes lives inside one SCC of
            // size >= 3, so smaller components cannot contribute.
            if component_sizes[component_of[root]] < config.min_cycle_len {
                continue;
            }
            let search = CycleSearch {
                adjacency: &adjacency,
                component_of: &component_of,
                config,
                root,
            };
            path.push(root);
            on_path[root] = true;
            let exhausted = search.extend(root, &mut path, &mut on_path, &mut cycles);
            path.pop();
            on_path[root] = false;
            if exhausted {
                return (cycles, true);
            }
        }
        (cycles, false)
    }
}

/// Rooted depth-first search state for one enumeration root
struct CycleSearch<'a> {
    adjacency: &'a [Vec<NodeId>],
    component_of: &'a [usize],
    config: &'a EngineConfig,
    root: NodeId,
}

impl CycleSearch<'_> {
    /// Extend the current path from `current`; returns true when the
    /// cycle budget is exhausted
    fn extend(
        &self,
        current: NodeId,
        path: &mut Vec<NodeId>,
        on_path: &mut [bool],
        cycles: &mut Vec<Vec<NodeId>>,
    ) -> bool {
        for &next in &self.adjacency[current] {
            if next == self.root {
                if path.len() >= self.config.min_cycle_len {
                    cycles.push(path.clone());
                    if cycles.len() >= self.config.max_cycles {
                        return true;
                    }
                }
            } else if next > self.root
                && path.len() < self.config.max_cycle_len
                && self.component_of[next] == self.component_of[self.root]
                && !on_path[next]
            {
                path.push(next);
                on_path[next] = true;
                let exhausted = self.extend(next, path, on_path, cycles);
                path.pop();
                on_path[next] = false;
                if exhausted {
                    return true;
                }
            }
        }
        false
    }
}

/// Tarjan's algorithm over the distinct-successor adjacency
///
/// Returns the component id of every node. Component discovery order
/// is fixed because successors are visited in insertion order.
fn strongly_connected_components(adjacency: &[Vec<NodeId>]) -> Vec<usize> {
    let n = adjacency.len();
    let mut state = TarjanState {
        next_index: 0,
        next_component: 0,
        index: vec![None; n],
        lowlink: vec![0; n],
        on_stack: vec![false; n],
        stack: Vec::new(),
        component_of: vec![0; n],
    };

    for node in 0..n {
        if state.index[node].is_none() {
            strong_connect(adjacency, node, &mut state);
        }
    }
    state.component_of
}

struct TarjanState {
    next_index: usize,
    next_component: usize,
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<NodeId>,
    component_of: Vec<usize>,
}

fn strong_connect(adjacency: &[Vec<NodeId>], node: NodeId, state: &mut TarjanState) {
    state.index[node] = Some(state.next_index);
    state.lowlink[node] = state.next_index;
    state.next_index += 1;
    state.stack.push(node);
    state.on_stack[node] = true;

    for &next in &adjacency[node] {
        match state.index[next] {
            None => {
                strong_connect(adjacency, next, state);
                state.lowlink[node] = state.lowlink[node].min(state.lowlink[next]);
            }
            Some(index) if state.on_stack[next] => {
                state.lowlink[node] = state.lowlink[node].min(index);
            }
            Some(_) => {}
        }
    }

    if Some(state.lowlink[node]) == state.index[node] {
        while let Some(member) = state.stack.pop() {
            state.on_stack[member] = false;
            state.component_of[member] = state.next_component;
            if member == node {
                break;
            }
        }
        state.next_component += 1;
    }
}
