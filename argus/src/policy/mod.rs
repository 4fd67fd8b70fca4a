//! Adaptive source selection driven by market context.
//!
//! Each call to [`Argus::select_sources`] is one decision cycle: relevance
//! scores blend learned per-context statistics with static priors and
//! bonuses, most slots exploit the best-scoring sources, and a configurable
//! fraction explores the remainder weighted toward the least-tried sources.

pub(crate) mod context;
pub(crate) mod metrics;

use std::sync::atomic::Ordering;

use rand::Rng;

use argus_types::{DataKind, MarketContext, MarketSignal, SourceDescriptor, SourceKey, Trend, Volatility};

use crate::core::Argus;

/// How a source earned its slot in a selection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Chosen on relevance score.
    Exploit,
    /// Chosen by the exploration draw.
    Explore,
}

/// One selected source with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// The selected source.
    pub source: SourceKey,
    /// Whether the slot was an exploit or an exploration pick.
    pub provenance: Provenance,
}

/// Weights blending success rate and quality into one relevance base.
const W_SUCCESS: f64 = 0.6;
const W_QUALITY: f64 = 0.4;

fn target_count(volatility: Volatility) -> usize {
    match volatility {
        Volatility::High => 6,
        Volatility::Medium => 4,
        Volatility::Low => 3,
    }
}

fn has_affinity(descriptor: &SourceDescriptor, ctx: MarketContext) -> bool {
    let crash_signal = ctx.volatility == Volatility::High
        && ctx.trend == Trend::Bearish
        && (descriptor.serves(DataKind::Derivatives) || descriptor.serves(DataKind::WhaleActivity));
    let rally_signal = ctx.trend == Trend::Bullish
        && (descriptor.serves(DataKind::Institutional) || descriptor.serves(DataKind::Social));
    crash_signal || rally_signal
}

impl Argus {
    /// Classify a raw market signal into a discrete context using the
    /// current UTC hour.
    ///
    /// The result becomes the current context for fetch bookkeeping: until
    /// the next assessment, every completed fetch attempt records into this
    /// context's series alongside the global one.
    #[must_use]
    pub fn assess_context(&self, signal: MarketSignal) -> MarketContext {
        self.remember_context(context::assess(signal))
    }

    /// Classify a raw market signal at an explicit UTC hour.
    ///
    /// Useful for replaying historical signals and for deterministic tests.
    #[must_use]
    pub fn assess_context_at(&self, signal: MarketSignal, utc_hour: u32) -> MarketContext {
        self.remember_context(context::assess_at(signal, utc_hour))
    }

    fn remember_context(&self, context: MarketContext) -> MarketContext {
        let mut guard = self.last_context.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(context);
        context
    }

    /// Run one selection cycle for `context`.
    ///
    /// Returns up to k sources (6 in high volatility, 4 in medium, 3 in
    /// low, clamped to availability), exploit picks first. Exploration
    /// claims `exploration_rate` of the slots in expectation: the integer
    /// part deterministically, the fractional part by a Bernoulli draw, so
    /// the long-run explored fraction converges to the configured rate.
    pub fn select_sources(&self, context: MarketContext) -> Vec<Selection> {
        // Callers may build a context by hand instead of assessing a
        // signal; selecting under it makes it current either way.
        self.remember_context(context);
        let cycle = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;
        let pcfg = self.cfg.policy;

        let mut scored: Vec<(usize, SourceKey, f64)> = self
            .registry
            .sources()
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let d = s.descriptor();
                (i, d.key, self.relevance(d, context, cycle))
            })
            .collect();
        // Descending relevance, registration order on ties.
        scored.sort_by(|(ai, _, a), (bi, _, b)| {
            b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal).then(ai.cmp(bi))
        });

        let k = target_count(context.volatility).min(scored.len());
        if k == 0 {
            return Vec::new();
        }

        let explore_n = self.draw_exploration_slots(k, pcfg.exploration_rate);
        let exploit_n = k - explore_n;

        let mut picks: Vec<Selection> = scored[..exploit_n]
            .iter()
            .map(|(_, key, _)| Selection {
                source: *key,
                provenance: Provenance::Exploit,
            })
            .collect();

        let mut pool: Vec<SourceKey> = scored[exploit_n..].iter().map(|(_, k, _)| *k).collect();
        for _ in 0..explore_n {
            let Some(choice) = self.sample_least_tried(&mut pool) else {
                break;
            };
            picks.push(Selection {
                source: choice,
                provenance: Provenance::Explore,
            });
        }

        for pick in &picks {
            self.metrics.mark_used(pick.source, cycle);
        }
        picks
    }

    /// Record the outcome of using `source` under `context`.
    ///
    /// The fetch paths already record each completed attempt under the most
    /// recently assessed context; this is the operator hook for attributing
    /// an outcome to an explicit context, for example when replaying
    /// history. `quality` is clamped to [0, 1].
    pub fn record_outcome(
        &self,
        source: SourceKey,
        context: MarketContext,
        success: bool,
        quality: f64,
    ) {
        self.metrics.record(source, Some(context), success, quality);
    }

    fn relevance(&self, descriptor: &SourceDescriptor, context: MarketContext, cycle: u64) -> f64 {
        let base = match self.metrics.stats(descriptor.key, context) {
            Some(stats) => W_SUCCESS * stats.success_rate + W_QUALITY * stats.quality,
            None => descriptor.reliability_prior,
        };
        let pcfg = self.cfg.policy;
        let mut score = base;
        if has_affinity(descriptor, context) {
            score += pcfg.affinity_bonus;
        }
        let idle = cycle.saturating_sub(self.metrics.last_used_cycle(descriptor.key));
        if idle >= pcfg.starvation_cycles {
            score += pcfg.starvation_bonus;
        }
        score
    }

    fn draw_exploration_slots(&self, k: usize, rate: f64) -> usize {
        let target = k as f64 * rate;
        let whole = target.floor() as usize;
        let frac = target - target.floor();
        let extra = if frac > 0.0 {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            usize::from(rng.random_bool(frac))
        } else {
            0
        };
        (whole + extra).min(k)
    }

    /// Remove and return one source from `pool`, weighted toward the fewest
    /// recorded invocations.
    fn sample_least_tried(&self, pool: &mut Vec<SourceKey>) -> Option<SourceKey> {
        if pool.is_empty() {
            return None;
        }
        let weights: Vec<f64> = pool
            .iter()
            .map(|key| 1.0 / (1.0 + self.metrics.invocations(*key) as f64))
            .collect();
        let total: f64 = weights.iter().sum();

        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let mut roll = rng.random_range(0.0..total);
        for (i, w) in weights.iter().enumerate() {
            if roll < *w || i == pool.len() - 1 {
                return Some(pool.swap_remove(i));
            }
            roll -= w;
        }
        None
    }
}
