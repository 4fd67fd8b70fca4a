//! Argus orchestrates market-intelligence fetches across many unreliable
//! external sources.
//!
//! Overview
//! - A capability registry indexes registered sources by the data kinds
//!   they advertise and ranks them with a composite quality score.
//! - A resilient fetch manager serves requests through a TTL response
//!   cache, per-source circuit breakers, sequential fallback, and an
//!   optional parallel race.
//! - An adaptive selection policy classifies market conditions into
//!   discrete contexts and learns per-(source, context) statistics online,
//!   balancing exploitation of proven sources against exploration of
//!   neglected ones.
//!
//! Key behaviors and trade-offs
//! - Fetch paths:
//!   - [`Argus::fetch`]: deterministic rank order, per-source timeout,
//!     aggregates errors; fewer concurrent requests but potentially higher
//!     latency.
//!   - [`Argus::fetch_parallel`]: races the top candidates; lowest tail
//!     latency but higher request fanout. Losers are cancelled and record
//!     no statistics.
//! - Circuit breakers keep failing sources out of rotation for a cooldown
//!   instead of hammering them; rate-limited responses never trip them.
//! - All learned state is in-memory and owned by the orchestrator; callers
//!   that want persistence read [`Argus::metrics_snapshot`] and re-seed
//!   priors on restart.
//!
//! Building an orchestrator and fetching:
//! ```rust,ignore
//! use std::sync::Arc;
//! use argus::{Argus, DataKind, FetchRequest};
//!
//! let argus = Argus::builder()
//!     .with_source(Arc::new(coingecko))
//!     .with_source(Arc::new(glassnode))
//!     .cache_ttl(std::time::Duration::from_secs(30))
//!     .build()?;
//!
//! let price = argus.fetch(&FetchRequest::new(DataKind::Price, "BTC")).await?;
//! ```
//!
//! Running a selection cycle:
//! ```rust,ignore
//! use argus::MarketSignal;
//!
//! let ctx = argus.assess_context(MarketSignal::new(-6.5));
//! for pick in argus.select_sources(ctx) {
//!     // fetch from pick.source, then:
//!     argus.record_outcome(pick.source, ctx, true, 0.9);
//! }
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod fetch;
mod policy;
mod registry;

pub use core::{Argus, ArgusBuilder};
pub use policy::{Provenance, Selection};

// Re-export the contract crates for convenience.
pub use argus_core::{
    CacheKey, FetchRequest, FetchResponse, Payload, Priority, SourceAdapter,
};
pub use argus_types::{
    ArgusConfig, ArgusError, BreakerConfig, CacheConfig, CircuitState, CostTier, DataKind,
    LatencyTier, MarketContext, MarketSignal, PolicyConfig, RateLimit, Session, SourceDescriptor,
    SourceKey, SourceMetricsSnapshot, Trend, Volatility,
};
