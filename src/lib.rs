//! # Fraud Graph Engine
//!
//! Batch fraud detection over the directed multigraph induced by a
//! financial transaction table.
//!
//! ## Detection patterns
//!
//! - **Bounded cycles**: simple directed cycles of 3-5 accounts become
//!   fraud rings
//! - **Temporal smurfing**: fan-out / fan-in bursts of 10+ transactions
//!   inside a 72-hour window
//! - **Shell pass-throughs**: low-degree intermediaries routing money
//!   along longer directed paths
//! - **Velocity**: binary score bump for two incident transactions
//!   inside one hour
//!
//! The engine consumes parsed rows and returns a report value. Request
//! transport, tabular parsing, and column validation belong to the
//! caller; the engine never performs I/O.

pub mod accumulator;
pub mod config;
pub mod cycles;
pub mod graph;
pub mod report;
pub mod shell;
pub mod smurfing;
pub mod velocity;

pub use config::EngineConfig;
pub use graph::TransactionGraph;
pub use report::{AnalysisReport, AnalysisSummary, FraudRing, SuspiciousAccount};

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::accumulator::FlagAccumulator;
use crate::cycles::CycleDetector;
use crate::shell::ShellDetector;
use crate::smurfing::SmurfingDetector;

/// Fatal analysis errors
///
/// Detector-internal degradation is not an error at this boundary: a
/// successful analysis always returns a complete report, possibly with
/// empty arrays.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Duplicate transaction detected: {0}")]
    DuplicateTransaction(String),
}

/// A parsed transaction table row
///
/// `timestamp` is `None` when the upstream parser could not produce an
/// instant for the row; the graph builder pins such rows to the
/// minimum representable instant so they sort before every dated one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub amount: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Batch fraud detection engine
///
/// One `analyze` call is one shot: build the graph, run the detectors,
/// score, assemble the report. The detector order (cycles, then
/// smurfing, then shells) is fixed and load-bearing: it decides
/// pattern insertion order and which ring first claims an account.
pub struct FraudGraphEngine {
    config: EngineConfig,
}

impl FraudGraphEngine {
    /// Create an engine with default thresholds
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Create an engine with custom thresholds
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Analyze a batch of transactions and produce the report
    pub fn analyze(&self, records: &[TransactionRecord]) -> Result<AnalysisReport, EngineError> {
        let graph = TransactionGraph::build(records)?;
        let started = Instant::now();

        let mut flags = FlagAccumulator::new(&graph, &self.config);
        let fraud_rings = CycleDetector::detect(&graph, &mut flags, &self.config);
        SmurfingDetector::detect(&graph, &mut flags, &self.config);
        ShellDetector::detect(&graph, &mut flags, &self.config);

        let suspicious_accounts: Vec<SuspiciousAccount> = flags
            .into_flags()
            .into_iter()
            .map(|flag| report::score_account(&flag, &self.config))
            .collect();

        let processing_time_seconds =
            report::round_processing_time(started.elapsed().as_secs_f64());

        info!(
            "analyzed {} accounts: {} suspicious, {} rings in {:.4}s",
            graph.node_count(),
            suspicious_accounts.len(),
            fraud_rings.len(),
            processing_time_seconds
        );

        let summary = AnalysisSummary {
            total_accounts_analyzed: graph.node_count(),
            suspicious_accounts_flagged: suspicious_accounts.len(),
            fraud_rings_detected: fraud_rings.len(),
            processing_time_seconds,
        };

        Ok(AnalysisReport {
            suspicious_accounts,
            fraud_rings,
            summary,
        })
    }
}

impl Default for FraudGraphEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tx(id: &str, from: &str, to: &str, secs: i64) -> TransactionRecord {
        TransactionRecord {
            transaction_id: id.to_string(),
            sender_id: from.to_string(),
            receiver_id: to.to_string(),
            amount: 1_200.0,
            timestamp: Some(Utc.timestamp_opt(secs, 0).unwrap()),
        }
    }

    const MIN: i64 = 60;
    const HOUR: i64 = 3_600;

    fn account<'r>(report: &'r AnalysisReport, id: &str) -> &'r SuspiciousAccount {
        report
            .suspicious_accounts
            .iter()
            .find(|account| account.account_id == id)
            .unwrap_or_else(|| panic!("{} not in report", id))
    }

    #[test]
    fn test_three_cycle_forms_ring() {
        // A -> B -> C -> A, every adjacent pair well under an hour.
        let engine = FraudGraphEngine::new();
        let report = engine
            .analyze(&[
                tx("t1", "A", "B", 0),
                tx("t2", "B", "C", 20 * MIN),
                tx("t3", "C", "A", 40 * MIN),
            ])
            .unwrap();

        assert_eq!(report.fraud_rings.len(), 1);
        let ring = &report.fraud_rings[0];
        assert_eq!(ring.ring_id, "RING_01");
        assert_eq!(ring.member_accounts, vec!["A", "B", "C"]);
        assert_eq!(ring.pattern_type, "cycle");
        assert_eq!(ring.risk_score, 95.3);

        assert_eq!(report.suspicious_accounts.len(), 3);
        for id in ["A", "B", "C"] {
            let flagged = account(&report, id);
            assert_eq!(flagged.detected_patterns, vec!["cycle_length_3"]);
            assert_eq!(flagged.suspicion_score, 50.0);
            assert_eq!(flagged.ring_id, Some("RING_01".to_string()));
        }
    }

    #[test]
    fn test_fan_out_smurfing_when_receivers_forward() {
        let mut rows = Vec::new();
        for i in 0..10 {
            rows.push(tx(&format!("h{}", i), "H", &format!("R{}", i), i * 5 * MIN));
            rows.push(tx(
                &format!("f{}", i),
                &format!("R{}", i),
                &format!("Z{}", i),
                200 * HOUR + i,
            ));
        }

        let report = FraudGraphEngine::new().analyze(&rows).unwrap();
        assert_eq!(report.suspicious_accounts.len(), 1);
        let hub = account(&report, "H");
        assert_eq!(hub.detected_patterns, vec!["fan_out_smurfing"]);
        assert_eq!(hub.suspicion_score, 40.0);
        assert_eq!(hub.ring_id, None);
        assert!(report.fraud_rings.is_empty());
    }

    #[test]
    fn test_fan_out_suppressed_by_sink_receiver() {
        let mut rows = Vec::new();
        for i in 0..10 {
            rows.push(tx(&format!("h{}", i), "H", &format!("R{}", i), i * 5 * MIN));
            // R5 keeps the money: no forwarding edge.
            if i != 5 {
                rows.push(tx(
                    &format!("f{}", i),
                    &format!("R{}", i),
                    &format!("Z{}", i),
                    200 * HOUR + i,
                ));
            }
        }

        let report = FraudGraphEngine::new().analyze(&rows).unwrap();
        assert!(report
            .suspicious_accounts
            .iter()
            .all(|account| account.account_id != "H"));
        assert!(report.suspicious_accounts.is_empty());
    }

    #[test]
    fn test_fan_in_smurfing_with_single_forward() {
        let mut rows = Vec::new();
        for i in 0..10 {
            // Two of the sends land half an hour apart for velocity.
            let secs = if i == 9 { 8 * HOUR + 30 * MIN } else { i * HOUR };
            rows.push(tx(&format!("s{}", i), &format!("S{}", i), "X", secs));
        }
        rows.push(tx("out", "X", "Y", 40 * HOUR));

        let report = FraudGraphEngine::new().analyze(&rows).unwrap();
        assert_eq!(report.suspicious_accounts.len(), 1);
        let collector = account(&report, "X");
        assert_eq!(collector.detected_patterns, vec!["fan_in_smurfing"]);
        assert_eq!(collector.suspicion_score, 40.0);
    }

    #[test]
    fn test_cycle_member_that_is_also_shell_gets_multiplier() {
        // Every member of a bare 4-cycle routes a three-edge path, so
        // each carries both the cycle tag and the shell tag.
        let report = FraudGraphEngine::new()
            .analyze(&[
                tx("t1", "M", "N", 0),
                tx("t2", "N", "O", 10 * MIN),
                tx("t3", "O", "P", 20 * MIN),
                tx("t4", "P", "M", 30 * MIN),
            ])
            .unwrap();

        let flagged = account(&report, "M");
        assert_eq!(
            flagged.detected_patterns,
            vec!["cycle_length_4", "shell_pass_through"]
        );
        // (40 + 20 + 10) * 1.2
        assert_eq!(flagged.suspicion_score, 84.0);
        assert_eq!(flagged.ring_id, Some("RING_01".to_string()));
    }

    #[test]
    fn test_score_cap_at_one_hundred() {
        // X sits on two cycles sharing its single out-edge and also
        // collects a fan-in burst: 40 + 40 + 30 + velocity 10, then
        // the multiplier, all clipped at 100.
        let mut rows = vec![
            tx("t1", "X", "Y", 0),
            tx("t2", "Y", "A", MIN),
            tx("t3", "A", "X", 2 * MIN),
            tx("t4", "Y", "B", 3 * MIN),
            tx("t5", "B", "C", 4 * MIN),
            tx("t6", "C", "X", 5 * MIN),
        ];
        for i in 0..8 {
            rows.push(tx(&format!("s{}", i), &format!("S{}", i), "X", 6 * MIN + i));
        }

        let report = FraudGraphEngine::new().analyze(&rows).unwrap();
        let capped = account(&report, "X");
        assert_eq!(
            capped.detected_patterns,
            vec!["cycle_length_3", "cycle_length_4", "fan_in_smurfing"]
        );
        assert_eq!(capped.suspicion_score, 100.0);
        assert_eq!(capped.ring_id, Some("RING_01".to_string()));
    }

    #[test]
    fn test_empty_batch_yields_empty_report() {
        let report = FraudGraphEngine::new().analyze(&[]).unwrap();
        assert!(report.suspicious_accounts.is_empty());
        assert!(report.fraud_rings.is_empty());
        assert_eq!(report.summary.total_accounts_analyzed, 0);
        assert_eq!(report.summary.suspicious_accounts_flagged, 0);
        assert_eq!(report.summary.fraud_rings_detected, 0);
    }

    #[test]
    fn test_duplicate_transaction_id_fails_analysis() {
        let result = FraudGraphEngine::new().analyze(&[
            tx("t1", "A", "B", 0),
            tx("t1", "C", "D", MIN),
        ]);
        assert_eq!(
            result.err(),
            Some(EngineError::DuplicateTransaction("t1".to_string()))
        );
    }

    /// Composite batch: a ring, a fan-in collector, a shell chain.
    fn composite_rows() -> Vec<TransactionRecord> {
        let mut rows = vec![
            tx("c1", "A", "B", 0),
            tx("c2", "B", "C", 10 * MIN),
            tx("c3", "C", "A", 20 * MIN),
            tx("p1", "U", "V", 30 * MIN),
            tx("p2", "V", "W", 40 * MIN),
            tx("p3", "W", "Q", 50 * MIN),
        ];
        for i in 0..10 {
            rows.push(tx(&format!("s{}", i), &format!("S{}", i), "X", HOUR + i * 10 * MIN));
        }
        rows.push(tx("out", "X", "Y", 30 * HOUR));
        rows
    }

    #[test]
    fn test_report_invariants_hold() {
        let rows = composite_rows();
        let report = FraudGraphEngine::new().analyze(&rows).unwrap();
        let graph = TransactionGraph::build(&rows).unwrap();

        assert!(!report.suspicious_accounts.is_empty());
        for account in &report.suspicious_accounts {
            // Flagged accounts exist in the graph.
            assert!(graph.node_id(&account.account_id).is_some());
            // Scores stay inside [0, 100].
            assert!(account.suspicion_score >= 0.0 && account.suspicion_score <= 100.0);
            // Pattern lists are non-empty and duplicate-free.
            assert!(!account.detected_patterns.is_empty());
            let mut seen = account.detected_patterns.clone();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), account.detected_patterns.len());
            // Referenced rings exist.
            if let Some(ring_id) = &account.ring_id {
                assert!(report.fraud_rings.iter().any(|ring| &ring.ring_id == ring_id));
            }
        }

        for ring in &report.fraud_rings {
            // Rings are simple cycles of 3-5 distinct accounts.
            assert!((3..=5).contains(&ring.member_accounts.len()));
            let mut members = ring.member_accounts.clone();
            members.sort();
            members.dedup();
            assert_eq!(members.len(), ring.member_accounts.len());
            for (i, member) in ring.member_accounts.iter().enumerate() {
                let next = &ring.member_accounts[(i + 1) % ring.member_accounts.len()];
                assert!(graph.has_edge(member, next));
            }
        }

        assert_eq!(
            report.summary.suspicious_accounts_flagged,
            report.suspicious_accounts.len()
        );
        assert_eq!(report.summary.fraud_rings_detected, report.fraud_rings.len());
        assert_eq!(report.summary.total_accounts_analyzed, graph.node_count());
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let rows = composite_rows();
        let engine = FraudGraphEngine::new();
        let mut first = engine.analyze(&rows).unwrap();
        let mut second = engine.analyze(&rows).unwrap();
        first.summary.processing_time_seconds = 0.0;
        second.summary.processing_time_seconds = 0.0;
        assert_eq!(first, second);
    }

    #[test]
    fn test_accounts_listed_in_first_flagging_order() {
        // Ring members land before the smurfing collector because the
        // cycle detector runs first.
        let report = FraudGraphEngine::new().analyze(&composite_rows()).unwrap();

        let positions: Vec<&str> = report
            .suspicious_accounts
            .iter()
            .map(|account| account.account_id.as_str())
            .collect();
        let a = positions.iter().position(|&id| id == "A").unwrap();
        let x = positions.iter().position(|&id| id == "X").unwrap();
        assert!(a < x);
    }
}
