use std::collections::HashSet;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use argus_core::SourceAdapter;
use argus_types::{
    ArgusConfig, ArgusError, CircuitState, DataKind, MarketContext, SourceDescriptor, SourceKey,
    SourceMetricsSnapshot,
};

use crate::fetch::breaker::BreakerTable;
use crate::fetch::cache::ResponseCache;
use crate::policy::metrics::MetricsTable;
use crate::registry::CapabilityRegistry;

/// Orchestrator that routes fetches across registered sources and learns
/// which ones to favor.
pub struct Argus {
    pub(crate) registry: CapabilityRegistry,
    pub(crate) cfg: ArgusConfig,
    pub(crate) cache: ResponseCache,
    pub(crate) breakers: BreakerTable,
    pub(crate) metrics: MetricsTable,
    pub(crate) cycle: AtomicU64,
    pub(crate) rng: Mutex<StdRng>,
    /// Most recently assessed market context; fetch outcomes train its
    /// per-context series in addition to the global one.
    pub(crate) last_context: Mutex<Option<MarketContext>>,
}

impl std::fmt::Debug for Argus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argus").finish_non_exhaustive()
    }
}

/// Builder for constructing an `Argus` orchestrator with custom configuration.
pub struct ArgusBuilder {
    sources: Vec<Arc<dyn SourceAdapter>>,
    cfg: ArgusConfig,
    rng_seed: Option<u64>,
}

impl Default for ArgusBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgusBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Defaults: 5s source timeout, 60s cache TTL, breaker threshold of 5
    /// with a 60s cooldown, EWMA alpha 0.1, exploration rate 0.2. Register
    /// at least one source via [`with_source`](Self::with_source) before
    /// building.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: vec![],
            cfg: ArgusConfig::default(),
            rng_seed: None,
        }
    }

    /// Register a source adapter.
    ///
    /// Registration order is the stable tie-break everywhere ranking or
    /// selection scores compare equal. Duplicate keys are rejected at
    /// build time.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn SourceAdapter>) -> Self {
        self.sources.push(source);
        self
    }

    /// Replace the whole configuration in one call.
    #[must_use]
    pub fn config(mut self, cfg: ArgusConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Set the per-source request timeout.
    #[must_use]
    pub const fn source_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.cfg.source_timeout = timeout;
        self
    }

    /// Set the response-cache TTL. Zero disables caching.
    #[must_use]
    pub const fn cache_ttl(mut self, ttl: std::time::Duration) -> Self {
        self.cfg.cache.ttl = ttl;
        self
    }

    /// Set the response-cache capacity.
    #[must_use]
    pub const fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cfg.cache.capacity = capacity;
        self
    }

    /// Set the consecutive-failure threshold that opens a circuit.
    #[must_use]
    pub const fn breaker_threshold(mut self, threshold: u32) -> Self {
        self.cfg.breaker.failure_threshold = threshold;
        self
    }

    /// Set how long an open circuit blocks traffic before a probe.
    #[must_use]
    pub const fn breaker_cooldown(mut self, cooldown: std::time::Duration) -> Self {
        self.cfg.breaker.cooldown = cooldown;
        self
    }

    /// Set the fraction of each selection cycle reserved for exploration.
    #[must_use]
    pub const fn exploration_rate(mut self, rate: f64) -> Self {
        self.cfg.policy.exploration_rate = rate;
        self
    }

    /// Set the EWMA smoothing factor for success-rate and quality series.
    #[must_use]
    pub const fn ewma_alpha(mut self, alpha: f64) -> Self {
        self.cfg.policy.ewma_alpha = alpha;
        self
    }

    /// Seed the selection RNG for reproducible exploration draws.
    #[must_use]
    pub const fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Build the `Argus` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` when no sources are registered, when two
    /// sources share a key, when a reliability prior leaves [0, 1], or
    /// when a policy rate is out of range.
    pub fn build(self) -> Result<Argus, ArgusError> {
        if self.sources.is_empty() {
            return Err(ArgusError::InvalidArg(
                "no sources registered; add at least one via with_source(...)".to_string(),
            ));
        }

        let mut seen: HashSet<SourceKey> = HashSet::new();
        for source in &self.sources {
            let d = source.descriptor();
            if !seen.insert(d.key) {
                return Err(ArgusError::InvalidArg(format!(
                    "duplicate source key: {}",
                    d.key
                )));
            }
            if !(0.0..=1.0).contains(&d.reliability_prior) {
                return Err(ArgusError::InvalidArg(format!(
                    "reliability prior for {} must be within [0, 1]",
                    d.key
                )));
            }
        }

        let pcfg = self.cfg.policy;
        if !(0.0..=1.0).contains(&pcfg.exploration_rate) {
            return Err(ArgusError::InvalidArg(
                "exploration_rate must be within [0, 1]".to_string(),
            ));
        }
        if !(pcfg.ewma_alpha > 0.0 && pcfg.ewma_alpha <= 1.0) {
            return Err(ArgusError::InvalidArg(
                "ewma_alpha must be within (0, 1]".to_string(),
            ));
        }
        if self.cfg.source_timeout.is_zero() {
            return Err(ArgusError::InvalidArg(
                "source_timeout must be non-zero".to_string(),
            ));
        }

        let rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::rng().next_u64()),
        };

        Ok(Argus {
            registry: CapabilityRegistry::new(self.sources),
            cache: ResponseCache::new(self.cfg.cache),
            breakers: BreakerTable::new(self.cfg.breaker),
            metrics: MetricsTable::new(pcfg.ewma_alpha),
            cycle: AtomicU64::new(0),
            rng: Mutex::new(rng),
            last_context: Mutex::new(None),
            cfg: self.cfg,
        })
    }
}

impl Argus {
    /// Start building a new `Argus` instance.
    #[must_use]
    pub fn builder() -> ArgusBuilder {
        ArgusBuilder::new()
    }

    /// Descriptors of sources advertising `kind`, in registration order.
    ///
    /// An empty result is a lookup outcome, not an error.
    #[must_use]
    pub fn find_sources(&self, kind: DataKind) -> Vec<SourceDescriptor> {
        self.registry
            .find_sources(kind)
            .iter()
            .map(|s| s.descriptor().clone())
            .collect()
    }

    /// Capable sources for a request, ranked by composite score descending.
    #[must_use]
    pub fn rank(&self, request: &argus_core::FetchRequest) -> Vec<(SourceKey, f64)> {
        self.registry
            .rank(request, &self.metrics)
            .into_iter()
            .map(|(s, score)| (s.key(), score))
            .collect()
    }

    /// Current circuit state for `key`; unknown keys report `Closed`.
    #[must_use]
    pub fn circuit_state(&self, key: SourceKey) -> CircuitState {
        self.breakers.state(key)
    }

    /// Serializable view of all learned statistics, for persistence.
    #[must_use]
    pub fn metrics_snapshot(&self) -> Vec<SourceMetricsSnapshot> {
        self.metrics.snapshot()
    }

    /// Operator reset: drop all learned statistics for one source.
    pub fn reset_source_metrics(&self, key: SourceKey) {
        self.metrics.reset(key);
    }
}
