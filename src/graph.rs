//! Directed multigraph induced by a transaction table

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{EngineError, TransactionRecord};

/// Node index, assigned in first-appearance order
pub type NodeId = usize;

/// Edge index into the graph's edge list (table-row order)
pub type EdgeId = usize;

/// A single transaction, kept as a directed edge with its attributes
#[derive(Debug, Clone)]
pub struct EdgeRecord {
    pub transaction_id: String,
    pub from: NodeId,
    pub to: NodeId,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// Immutable directed multigraph over account identifiers
///
/// Accounts are interned to integer indices in first-appearance order
/// and edges keep table-row order. Parallel edges between the same
/// ordered pair stay distinct, and self-loops are allowed. Detectors
/// iterate nodes and edges in these insertion orders, which is what
/// makes reports reproducible.
#[derive(Debug)]
pub struct TransactionGraph {
    account_index: HashMap<String, NodeId>,
    accounts: Vec<String>,
    edges: Vec<EdgeRecord>,
    out_edges: Vec<Vec<EdgeId>>,
    in_edges: Vec<Vec<EdgeId>>,
    timestamps: HashMap<String, DateTime<Utc>>,
}

impl TransactionGraph {
    /// Build the graph from parsed table rows
    ///
    /// Rows without a parseable timestamp are pinned to the minimum
    /// representable instant so they sort before every dated row. A
    /// duplicate `transaction_id` is a fatal input breach.
    pub fn build(records: &[TransactionRecord]) -> Result<Self, EngineError> {
        let mut graph = Self {
            account_index: HashMap::new(),
            accounts: Vec::new(),
            edges: Vec::with_capacity(records.len()),
            out_edges: Vec::new(),
            in_edges: Vec::new(),
            timestamps: HashMap::with_capacity(records.len()),
        };

        for record in records {
            let timestamp = record.timestamp.unwrap_or(DateTime::<Utc>::MIN_UTC);
            if graph
                .timestamps
                .insert(record.transaction_id.clone(), timestamp)
                .is_some()
            {
                return Err(EngineError::DuplicateTransaction(
                    record.transaction_id.clone(),
                ));
            }

            let from = graph.intern(&record.sender_id);
            let to = graph.intern(&record.receiver_id);
            let edge_id = graph.edges.len();
            graph.edges.push(EdgeRecord {
                transaction_id: record.transaction_id.clone(),
                from,
                to,
                amount: record.amount,
                timestamp,
            });
            graph.out_edges[from].push(edge_id);
            graph.in_edges[to].push(edge_id);
        }

        Ok(graph)
    }

    fn intern(&mut self, account_id: &str) -> NodeId {
        if let Some(&node) = self.account_index.get(account_id) {
            return node;
        }
        let node = self.accounts.len();
        self.account_index.insert(account_id.to_string(), node);
        self.accounts.push(account_id.to_string());
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        node
    }

    /// Number of accounts
    pub fn node_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of transactions
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Node indices in first-appearance order
    pub fn nodes(&self) -> std::ops::Range<NodeId> {
        0..self.accounts.len()
    }

    /// Account identifier for a node
    pub fn account(&self, node: NodeId) -> &str {
        &self.accounts[node]
    }

    /// Node index for an account identifier, if present
    pub fn node_id(&self, account_id: &str) -> Option<NodeId> {
        self.account_index.get(account_id).copied()
    }

    /// Edge attributes by edge index
    pub fn edge(&self, edge: EdgeId) -> &EdgeRecord {
        &self.edges[edge]
    }

    /// Outgoing edges of a node, in table-row order
    pub fn out_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.out_edges[node]
    }

    /// Incoming edges of a node, in table-row order
    pub fn in_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.in_edges[node]
    }

    /// Outgoing edge count (parallel edges counted individually)
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_edges[node].len()
    }

    /// Incoming edge count (parallel edges counted individually)
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.in_edges[node].len()
    }

    /// Distinct successors of a node, in first-edge order
    pub fn out_neighbors(&self, node: NodeId) -> Vec<NodeId> {
        let mut neighbors = Vec::new();
        for &edge in &self.out_edges[node] {
            let to = self.edges[edge].to;
            if !neighbors.contains(&to) {
                neighbors.push(to);
            }
        }
        neighbors
    }

    /// Distinct predecessors of a node, in first-edge order
    pub fn in_neighbors(&self, node: NodeId) -> Vec<NodeId> {
        let mut neighbors = Vec::new();
        for &edge in &self.in_edges[node] {
            let from = self.edges[edge].from;
            if !neighbors.contains(&from) {
                neighbors.push(from);
            }
        }
        neighbors
    }

    /// Check if at least one edge connects the ordered account pair
    pub fn has_edge(&self, sender: &str, receiver: &str) -> bool {
        match (self.node_id(sender), self.node_id(receiver)) {
            (Some(from), Some(to)) => self.out_edges[from]
                .iter()
                .any(|&edge| self.edges[edge].to == to),
            _ => false,
        }
    }

    /// Timestamp recorded for a transaction id
    pub fn timestamp_of(&self, transaction_id: &str) -> Option<DateTime<Utc>> {
        self.timestamps.get(transaction_id).copied()
    }
}
