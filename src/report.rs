//! Report value types and final scoring

use serde::{Deserialize, Serialize};

use crate::accumulator::AccountFlag;
use crate::config::EngineConfig;

/// One flagged account in the final report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    pub account_id: String,
    pub suspicion_score: f64,
    /// Pattern tags in first-emission order
    pub detected_patterns: Vec<String>,
    /// Ring membership, if any; serializes as `null` otherwise
    pub ring_id: Option<String>,
}

/// A discovered cycle of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRing {
    pub ring_id: String,
    /// Accounts in enumerated cycle order
    pub member_accounts: Vec<String>,
    pub pattern_type: String,
    pub risk_score: f64,
}

/// Run-level counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_accounts_analyzed: usize,
    pub suspicious_accounts_flagged: usize,
    pub fraud_rings_detected: usize,
    pub processing_time_seconds: f64,
}

/// Complete analysis output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    pub fraud_rings: Vec<FraudRing>,
    pub summary: AnalysisSummary,
}

impl AnalysisReport {
    /// Export as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Apply the final scoring formula to one accumulated account
///
/// Pattern bumps and velocity sum into the raw total; matching more
/// than one pattern multiplies it, and the cap clips the result.
pub(crate) fn score_account(flag: &AccountFlag, config: &EngineConfig) -> SuspiciousAccount {
    let mut total = f64::from(flag.raw_pattern_score + flag.velocity_score);
    if flag.detected_patterns.len() > 1 {
        total *= config.multi_pattern_multiplier;
    }
    SuspiciousAccount {
        account_id: flag.account_id.clone(),
        suspicion_score: total.min(config.score_cap),
        detected_patterns: flag.detected_patterns.clone(),
        ring_id: flag.ring_id.clone(),
    }
}

/// Wall-clock seconds rounded to four decimal places
pub(crate) fn round_processing_time(seconds: f64) -> f64 {
    (seconds * 10_000.0).round() / 10_000.0
}
