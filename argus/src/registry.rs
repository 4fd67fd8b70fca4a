//! Capability registry: descriptor index, lookup, and quality scoring.

use std::sync::Arc;

use argus_core::{FetchRequest, SourceAdapter};
use argus_types::{DataKind, SourceDescriptor};

use crate::policy::metrics::MetricsTable;

/// Weight applied to the reliability component of a score.
const W_RELIABILITY: f64 = 0.4;
/// Weight applied to the capability-match component.
const W_CAPABILITY: f64 = 0.3;
/// Weight applied to the latency-tier component.
const W_SPEED: f64 = 0.2;
/// Weight applied to the cost-tier component.
const W_COST: f64 = 0.1;

/// Index of registered sources, kept in registration order.
///
/// The registry is immutable after build: sources are registered through
/// the builder and never change at runtime. Scoring reads live reliability
/// from the metrics table, so rank order adapts while the index does not.
pub(crate) struct CapabilityRegistry {
    sources: Vec<Arc<dyn SourceAdapter>>,
}

impl CapabilityRegistry {
    pub(crate) fn new(sources: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self { sources }
    }

    /// All registered sources, registration order.
    pub(crate) fn sources(&self) -> &[Arc<dyn SourceAdapter>] {
        &self.sources
    }

    /// Sources advertising `kind`, registration order. Empty when none do;
    /// a miss is a lookup result, not an error.
    pub(crate) fn find_sources(&self, kind: DataKind) -> Vec<Arc<dyn SourceAdapter>> {
        self.sources
            .iter()
            .filter(|s| s.descriptor().serves(kind))
            .cloned()
            .collect()
    }

    /// Capable sources ranked by score, descending.
    ///
    /// Ties break on registration order, so equal inputs always produce the
    /// same ranking.
    pub(crate) fn rank(
        &self,
        request: &FetchRequest,
        metrics: &MetricsTable,
    ) -> Vec<(Arc<dyn SourceAdapter>, f64)> {
        let mut ranked: Vec<(usize, Arc<dyn SourceAdapter>, f64)> = self
            .sources
            .iter()
            .enumerate()
            .filter(|(_, s)| s.descriptor().serves(request.kind))
            .map(|(i, s)| {
                let score = score_source(s.descriptor(), request, metrics);
                (i, Arc::clone(s), score)
            })
            .collect();

        // Descending score; the registration index is a total order, so the
        // sort key never compares equal and f64 comparison stays safe.
        ranked.sort_by(|(ai, _, a), (bi, _, b)| {
            b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal).then(ai.cmp(bi))
        });
        ranked.into_iter().map(|(_, s, score)| (s, score)).collect()
    }
}

/// Composite quality score in [0, 1].
///
/// Reliability prefers the live global EWMA over the static prior as soon as
/// runtime history exists.
pub(crate) fn score_source(
    descriptor: &SourceDescriptor,
    request: &FetchRequest,
    metrics: &MetricsTable,
) -> f64 {
    let reliability = metrics
        .reliability(descriptor.key)
        .unwrap_or(descriptor.reliability_prior)
        .clamp(0.0, 1.0);
    let capability = capability_match(descriptor, request);
    let speed = descriptor.latency.score();
    let cost = descriptor.cost.score();

    W_RELIABILITY * reliability + W_CAPABILITY * capability + W_SPEED * speed + W_COST * cost
}

/// Fraction of the request's required tags the source advertises; 1.0 when
/// nothing extra is required.
fn capability_match(descriptor: &SourceDescriptor, request: &FetchRequest) -> f64 {
    if request.required_tags.is_empty() {
        return 1.0;
    }
    let matched = request
        .required_tags
        .iter()
        .filter(|tag| descriptor.serves(**tag))
        .count();
    matched as f64 / request.required_tags.len() as f64
}
