//! Runtime per-source statistics behind a single lock.
//!
//! Buckets are keyed by `(source, Option<context>)`; the `None` bucket is
//! the source's global series. Every recorded outcome updates both the
//! matching context bucket and the global bucket, so the registry can score
//! on global reliability while the policy reads context-specific series.

use std::collections::HashMap;
use std::sync::Mutex;

use argus_types::{MarketContext, SourceKey, SourceMetricsSnapshot};

#[derive(Debug, Default, Clone)]
struct Bucket {
    success_rate: f64,
    quality: f64,
    consecutive_failures: u32,
    last_used_cycle: u64,
    invocations: u64,
    // First observation seeds the series; EWMA applies from the second on.
    observed: bool,
}

impl Bucket {
    fn observe(&mut self, alpha: f64, success: bool, quality: f64) {
        let success_obs = if success { 1.0 } else { 0.0 };
        let quality_obs = quality.clamp(0.0, 1.0);
        if self.observed {
            self.success_rate = ewma(self.success_rate, success_obs, alpha);
            self.quality = ewma(self.quality, quality_obs, alpha);
        } else {
            self.success_rate = success_obs;
            self.quality = quality_obs;
            self.observed = true;
        }
        if success {
            self.consecutive_failures = 0;
        } else {
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        }
        self.invocations = self.invocations.saturating_add(1);
    }
}

fn ewma(old: f64, obs: f64, alpha: f64) -> f64 {
    ((1.0 - alpha) * old + alpha * obs).clamp(0.0, 1.0)
}

/// Success/quality statistics the policy reads for one bucket.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BucketStats {
    pub(crate) success_rate: f64,
    pub(crate) quality: f64,
}

/// Lazily populated statistics table.
///
/// One interior lock serializes all updates, which satisfies the
/// single-writer rule per source without per-bucket locking; the table is
/// touched briefly and never across an await point.
pub(crate) struct MetricsTable {
    inner: Mutex<HashMap<(SourceKey, Option<MarketContext>), Bucket>>,
    alpha: f64,
}

impl MetricsTable {
    pub(crate) fn new(alpha: f64) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            alpha,
        }
    }

    /// Record one outcome into the context bucket (when given) and always
    /// into the global bucket.
    pub(crate) fn record(
        &self,
        source: SourceKey,
        context: Option<MarketContext>,
        success: bool,
        quality: f64,
    ) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ctx) = context {
            guard
                .entry((source, Some(ctx)))
                .or_default()
                .observe(self.alpha, success, quality);
        }
        guard
            .entry((source, None))
            .or_default()
            .observe(self.alpha, success, quality);
    }

    /// Global EWMA success rate, if any outcome has been recorded.
    pub(crate) fn reliability(&self, source: SourceKey) -> Option<f64> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .get(&(source, None))
            .filter(|b| b.observed)
            .map(|b| b.success_rate)
    }

    /// Stats for the context bucket, falling back to the global bucket.
    /// `None` when the source has no runtime history at all.
    pub(crate) fn stats(
        &self,
        source: SourceKey,
        context: MarketContext,
    ) -> Option<BucketStats> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .get(&(source, Some(context)))
            .filter(|b| b.observed)
            .or_else(|| guard.get(&(source, None)).filter(|b| b.observed))
            .map(|b| BucketStats {
                success_rate: b.success_rate,
                quality: b.quality,
            })
    }

    /// Cycle in which the source was last selected (global bucket).
    pub(crate) fn last_used_cycle(&self, source: SourceKey) -> u64 {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .get(&(source, None))
            .map(|b| b.last_used_cycle)
            .unwrap_or(0)
    }

    /// Total invocations recorded for the source (global bucket).
    pub(crate) fn invocations(&self, source: SourceKey) -> u64 {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .get(&(source, None))
            .map(|b| b.invocations)
            .unwrap_or(0)
    }

    /// Stamp the source as used in `cycle` (global bucket only; selection
    /// is not an outcome).
    pub(crate) fn mark_used(&self, source: SourceKey, cycle: u64) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.entry((source, None)).or_default().last_used_cycle = cycle;
    }

    /// Serializable view of every bucket, for persistence callers.
    pub(crate) fn snapshot(&self) -> Vec<SourceMetricsSnapshot> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<SourceMetricsSnapshot> = guard
            .iter()
            .map(|((source, context), b)| SourceMetricsSnapshot {
                source: source.as_str().to_string(),
                context: *context,
                success_rate: b.success_rate,
                quality: b.quality,
                consecutive_failures: b.consecutive_failures,
                last_used_cycle: b.last_used_cycle,
                invocations: b.invocations,
            })
            .collect();
        out.sort_by(|a, b| (&a.source, format_ctx(&a.context)).cmp(&(&b.source, format_ctx(&b.context))));
        out
    }

    /// Drop every bucket belonging to `source`.
    pub(crate) fn reset(&self, source: SourceKey) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.retain(|(key, _), _| *key != source);
    }
}

fn format_ctx(ctx: &Option<MarketContext>) -> String {
    ctx.map(|c| format!("{c:?}")).unwrap_or_default()
}
