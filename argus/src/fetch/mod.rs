//! Resilient fetch paths: cache fast path, circuit gating, sequential
//! fallback, and the optional parallel race.

pub(crate) mod breaker;
pub(crate) mod cache;

use std::time::Instant;

use argus_core::{FetchRequest, FetchResponse, SourceAdapter};
use argus_types::{ArgusError, SourceKey};

use crate::core::Argus;

/// Floor for latency-derived quality so a slow success never scores like a
/// failure.
const MIN_SUCCESS_QUALITY: f64 = 0.1;

/// Wrap errors a source surfaced without tagging itself.
fn tag_err(source: SourceKey, e: ArgusError) -> ArgusError {
    match e {
        e @ (ArgusError::Source { .. }
        | ArgusError::Auth { .. }
        | ArgusError::RateLimited { .. }
        | ArgusError::SourceTimeout { .. }
        | ArgusError::CircuitOpen { .. }
        | ArgusError::AllSourcesFailed(_)) => e,
        other => ArgusError::source(source.as_str(), other.to_string()),
    }
}

impl Argus {
    /// Fetch with sequential fallback.
    ///
    /// Checks the response cache first, then walks capable sources in rank
    /// order, skipping open circuits and bounding every attempt by the
    /// configured source timeout. The first success is cached and returned;
    /// if every source fails the individual errors come back aggregated in
    /// [`ArgusError::AllSourcesFailed`].
    ///
    /// # Errors
    /// `NoCapableSource` when nothing advertises the requested kind;
    /// `AllSourcesFailed` when every eligible source failed or was skipped.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "argus::fetch",
            skip(self, request),
            fields(kind = %request.kind, symbol = %request.symbol),
        )
    )]
    pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, ArgusError> {
        let cache_key = request.cache_key();
        if let Some(hit) = self.cache.get(&cache_key).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(source = %hit.source, "cache hit");
            return Ok(hit);
        }

        let ranked = self.registry.rank(request, &self.metrics);
        if ranked.is_empty() {
            return Err(ArgusError::no_capable_source(request.kind.as_str()));
        }

        let mut errors: Vec<ArgusError> = Vec::new();
        for (adapter, _score) in ranked {
            let key = adapter.key();
            if !self.breakers.acquire(key) {
                errors.push(ArgusError::circuit_open(key.as_str()));
                continue;
            }
            match self.attempt(adapter.as_ref(), request).await {
                Ok(resp) => {
                    self.cache.put(cache_key, resp.clone()).await;
                    return Ok(resp);
                }
                Err(e) => errors.push(e),
            }
        }
        Err(ArgusError::AllSourcesFailed(errors))
    }

    /// Fetch by racing the top `fanout` eligible sources concurrently.
    ///
    /// The first success wins and is cached; the losing attempts are
    /// cancelled by drop and record neither failures nor statistics.
    /// Attempts that already completed before the winner record normally.
    ///
    /// # Errors
    /// Same surface as [`Argus::fetch`]; a `fanout` of zero is an
    /// `InvalidArg`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "argus::fetch_parallel",
            skip(self, request),
            fields(kind = %request.kind, symbol = %request.symbol, fanout),
        )
    )]
    pub async fn fetch_parallel(
        &self,
        request: &FetchRequest,
        fanout: usize,
    ) -> Result<FetchResponse, ArgusError> {
        use futures::stream::{FuturesUnordered, StreamExt};

        if fanout == 0 {
            return Err(ArgusError::InvalidArg(
                "fetch_parallel requires a fanout of at least 1".to_string(),
            ));
        }

        let cache_key = request.cache_key();
        if let Some(hit) = self.cache.get(&cache_key).await {
            return Ok(hit);
        }

        let ranked = self.registry.rank(request, &self.metrics);
        if ranked.is_empty() {
            return Err(ArgusError::no_capable_source(request.kind.as_str()));
        }

        let mut errors: Vec<ArgusError> = Vec::new();
        let mut racers = FuturesUnordered::new();
        for (adapter, _score) in ranked {
            if racers.len() >= fanout {
                break;
            }
            let key = adapter.key();
            if !self.breakers.acquire(key) {
                errors.push(ArgusError::circuit_open(key.as_str()));
                continue;
            }
            racers.push(async move { self.attempt(adapter.as_ref(), request).await });
        }

        while let Some(res) = racers.next().await {
            match res {
                Ok(resp) => {
                    // Dropping the stream cancels the stragglers.
                    drop(racers);
                    self.cache.put(cache_key, resp.clone()).await;
                    return Ok(resp);
                }
                Err(e) => errors.push(e),
            }
        }
        Err(ArgusError::AllSourcesFailed(errors))
    }

    /// One bounded attempt against one source, with all bookkeeping.
    ///
    /// Success closes the breaker and records a latency-derived quality
    /// observation. Timeouts and source errors trip the breaker and record
    /// a zero-quality failure; rate limiting records nothing, it is an
    /// expected operating condition. Observations land in the global series
    /// and, once a context has been assessed, in that context's series too.
    async fn attempt(
        &self,
        adapter: &dyn SourceAdapter,
        request: &FetchRequest,
    ) -> Result<FetchResponse, ArgusError> {
        let key = adapter.key();
        let timeout = self.cfg.source_timeout;
        let context = *self
            .last_context
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let started = Instant::now();

        let outcome = match tokio::time::timeout(timeout, adapter.fetch(request)).await {
            Ok(res) => res.map_err(|e| tag_err(key, e)),
            Err(_) => Err(ArgusError::source_timeout(key.as_str(), request.kind.as_str())),
        };

        match outcome {
            Ok(payload) => {
                let latency = started.elapsed();
                let quality = (1.0 - latency.as_secs_f64() / timeout.as_secs_f64())
                    .clamp(MIN_SUCCESS_QUALITY, 1.0);
                self.breakers.record_success(key);
                self.metrics.record(key, context, true, quality);
                Ok(FetchResponse {
                    payload,
                    source: key,
                    latency,
                    quality,
                    cached: false,
                })
            }
            Err(e) => {
                if e.counts_as_failure() {
                    self.breakers.record_failure(key);
                    self.metrics.record(key, context, false, 0.0);
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(source = %key, error = %e, "attempt failed");
                Err(e)
            }
        }
    }
}
