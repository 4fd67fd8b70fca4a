//! argus-core
//!
//! Core contracts shared across the argus ecosystem.
//!
//! - `adapter`: the [`SourceAdapter`] trait every data source implements.
//! - `request`: fetch request/response types and the normalized cache key.
//!
//! The orchestrator in the `argus` crate consumes these contracts; adapters
//! and mocks implement them. This crate assumes the Tokio ecosystem as the
//! async runtime: adapter futures are driven under per-attempt
//! `tokio::time::timeout` deadlines and may be dropped mid-poll when a
//! parallel race resolves.
#![warn(missing_docs)]

/// The `SourceAdapter` trait.
pub mod adapter;
/// Fetch request/response DTOs.
pub mod request;

pub use adapter::SourceAdapter;
pub use request::{CacheKey, FetchRequest, FetchResponse, Payload, Priority};

// Re-export the shared DTO crate for convenience.
pub use argus_types::{
    ArgusConfig, ArgusError, BreakerConfig, CacheConfig, CircuitState, CostTier, DataKind,
    LatencyTier,
    MarketContext, MarketSignal, PolicyConfig, RateLimit, Session, SourceDescriptor, SourceKey,
    SourceMetricsSnapshot, Trend, Volatility,
};
