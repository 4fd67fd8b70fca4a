//! Configuration types shared across the orchestrator and its callers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// TTL cache configuration for fetch responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for cached responses. Zero disables caching entirely.
    pub ttl: Duration,
    /// Maximum number of cached entries; least-recently-used entries are
    /// evicted beyond this bound.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            capacity: 1024,
        }
    }
}

/// Per-source circuit-breaker configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BreakerConfig {
    /// Consecutive failures before the circuit opens.
    pub failure_threshold: u32,
    /// How long an open circuit stays closed to traffic before a half-open
    /// probe is allowed.
    pub cooldown: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cooldown: Duration::from_secs(60),
        }
    }
}

/// Adaptive selection-policy configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// EWMA smoothing factor applied to success-rate and quality series.
    pub ewma_alpha: f64,
    /// Expected fraction of each selection cycle reserved for exploration.
    pub exploration_rate: f64,
    /// Cycles a source may go unused before it earns a starvation bonus.
    pub starvation_cycles: u64,
    /// Flat bonus added to starved sources during relevance scoring.
    pub starvation_bonus: f64,
    /// Flat bonus added for context-affine data kinds.
    pub affinity_bonus: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            ewma_alpha: 0.1,
            exploration_rate: 0.2,
            starvation_cycles: 10,
            starvation_bonus: 0.15,
            affinity_bonus: 0.1,
        }
    }
}

/// Global configuration for the `Argus` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgusConfig {
    /// Timeout for individual source requests. Exceeding it counts as a
    /// failure for that source.
    pub source_timeout: Duration,
    /// Response cache configuration.
    pub cache: CacheConfig,
    /// Circuit-breaker configuration, shared by all sources.
    pub breaker: BreakerConfig,
    /// Adaptive selection-policy configuration.
    pub policy: PolicyConfig,
}

impl Default for ArgusConfig {
    fn default() -> Self {
        Self {
            source_timeout: Duration::from_secs(5),
            cache: CacheConfig::default(),
            breaker: BreakerConfig::default(),
            policy: PolicyConfig::default(),
        }
    }
}
