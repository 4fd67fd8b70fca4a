//! Serializable snapshots of runtime source statistics.

use serde::{Deserialize, Serialize};

use crate::context::MarketContext;

/// Observable state of one source's circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CircuitState {
    /// Traffic flows normally.
    #[default]
    Closed,
    /// Source is skipped until the cooldown elapses.
    Open,
    /// Cooldown elapsed; probe traffic is allowed through.
    HalfOpen,
}

/// Point-in-time view of one metrics bucket.
///
/// A bucket is either context-specific (`context` set) or global
/// (`context` absent). Snapshots exist so callers can persist learned
/// statistics across process restarts; the orchestrator itself keeps
/// everything in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetricsSnapshot {
    /// Name of the source this bucket belongs to.
    pub source: String,
    /// Context the bucket is keyed by, if context-specific.
    pub context: Option<MarketContext>,
    /// EWMA of success outcomes, in [0, 1].
    pub success_rate: f64,
    /// EWMA of observed quality, in [0, 1].
    pub quality: f64,
    /// Consecutive failures recorded for the bucket.
    pub consecutive_failures: u32,
    /// Selection cycle in which the source was last used.
    pub last_used_cycle: u64,
    /// Total invocations recorded for the bucket.
    pub invocations: u64,
}
