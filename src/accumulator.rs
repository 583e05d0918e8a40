//! Per-account flag accumulation

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::graph::{NodeId, TransactionGraph};
use crate::velocity;

/// Accumulated detector emissions for one account
#[derive(Debug, Clone)]
pub struct AccountFlag {
    pub account_id: String,
    /// Pattern tags in first-emission order, deduplicated
    pub detected_patterns: Vec<String>,
    /// Sum of score bumps over distinct tags
    pub raw_pattern_score: u32,
    /// Computed once when the account is first flagged
    pub velocity_score: u32,
    /// The first ring to claim the account wins
    pub ring_id: Option<String>,
}

/// Merges detector emissions into per-account records
///
/// Records are kept in first-flagging order; that order becomes the
/// order of the report's `suspicious_accounts` list.
pub struct FlagAccumulator<'a> {
    graph: &'a TransactionGraph,
    config: &'a EngineConfig,
    index: HashMap<NodeId, usize>,
    flags: Vec<AccountFlag>,
}

impl<'a> FlagAccumulator<'a> {
    pub fn new(graph: &'a TransactionGraph, config: &'a EngineConfig) -> Self {
        Self {
            graph,
            config,
            index: HashMap::new(),
            flags: Vec::new(),
        }
    }

    /// Record one detector emission for `node`
    ///
    /// Re-emitting a tag the account already carries is a no-op on the
    /// score, and a ring id never overwrites an earlier one. Velocity
    /// is computed at creation and never recomputed.
    pub fn flag(&mut self, node: NodeId, pattern: &str, score_bump: u32, ring_id: Option<&str>) {
        match self.index.get(&node) {
            Some(&slot) => {
                let flag = &mut self.flags[slot];
                if !flag.detected_patterns.iter().any(|tag| tag == pattern) {
                    flag.detected_patterns.push(pattern.to_string());
                    flag.raw_pattern_score += score_bump;
                }
                if flag.ring_id.is_none() {
                    if let Some(ring) = ring_id {
                        flag.ring_id = Some(ring.to_string());
                    }
                }
            }
            None => {
                self.index.insert(node, self.flags.len());
                self.flags.push(AccountFlag {
                    account_id: self.graph.account(node).to_string(),
                    detected_patterns: vec![pattern.to_string()],
                    raw_pattern_score: score_bump,
                    velocity_score: velocity::velocity_score_node(self.graph, node, self.config),
                    ring_id: ring_id.map(str::to_string),
                });
            }
        }
    }

    /// Number of flagged accounts so far
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Consume the accumulator, yielding flags in first-flagging order
    pub fn into_flags(self) -> Vec<AccountFlag> {
        self.flags
    }
}
