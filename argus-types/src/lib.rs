//! Argus-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod capability;
mod config;
mod context;
mod error;
mod metrics;

pub use capability::{CostTier, DataKind, LatencyTier, RateLimit, SourceDescriptor, SourceKey};
pub use config::{ArgusConfig, BreakerConfig, CacheConfig, PolicyConfig};
pub use context::{MarketContext, MarketSignal, Session, Trend, Volatility};
pub use error::ArgusError;
pub use metrics::{CircuitState, SourceMetricsSnapshot};
