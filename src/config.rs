//! Engine configuration

/// Detection thresholds and scoring constants
///
/// Defaults carry the values the detectors are calibrated against.
/// Tests occasionally tighten them (e.g. a tiny cycle budget) to
/// exercise degraded paths.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Two incident transactions closer than this many seconds trip
    /// the velocity score
    pub velocity_window_secs: i64,
    /// Score contributed by a velocity hit (binary: all or nothing)
    pub velocity_bump: u32,
    /// Sliding-window span for smurfing bursts, in seconds
    pub smurfing_window_secs: i64,
    /// Number of same-direction transactions that constitutes a burst
    pub smurfing_burst_size: usize,
    /// Smallest cycle length reported, in nodes
    pub min_cycle_len: usize,
    /// Largest cycle length reported, in nodes
    pub max_cycle_len: usize,
    /// Score bump for membership in at least one cycle of a given length
    pub cycle_bump: u32,
    /// Score bump for a fan-out or fan-in smurfing burst
    pub smurfing_bump: u32,
    /// Score bump for a shell pass-through
    pub shell_bump: u32,
    /// Multiplier applied when an account matches more than one pattern
    pub multi_pattern_multiplier: f64,
    /// Ceiling on the final suspicion score
    pub score_cap: f64,
    /// Constant risk score attached to every fraud ring
    pub ring_risk_score: f64,
    /// Upper bound on enumerated cycles before the cycle detector
    /// degrades to partial results
    pub max_cycles: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            velocity_window_secs: 3_600, // 1 hour
            velocity_bump: 10,
            smurfing_window_secs: 259_200, // 72 hours
            smurfing_burst_size: 10,
            min_cycle_len: 3,
            max_cycle_len: 5,
            cycle_bump: 40,
            smurfing_bump: 30,
            shell_bump: 20,
            multi_pattern_multiplier: 1.2,
            score_cap: 100.0,
            ring_risk_score: 95.3,
            max_cycles: 10_000,
        }
    }
}
