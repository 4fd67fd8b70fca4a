//! Fetch request/response types and the normalized cache key.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use argus_types::{DataKind, SourceKey};

/// Opaque payload returned by a source.
///
/// Payload correctness and schema validation are the caller's concern; the
/// orchestrator moves values through untouched.
pub type Payload = serde_json::Value;

/// Caller-declared urgency for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Priority {
    /// Background refresh; no special treatment.
    Low,
    /// Default interactive priority.
    #[default]
    Normal,
    /// Latency-sensitive request.
    High,
}

/// A single data request routed through the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Data kind being requested.
    pub kind: DataKind,
    /// Instrument symbol, e.g. "BTC".
    pub symbol: String,
    /// Optional timeframe qualifier, e.g. "1h".
    pub timeframe: Option<String>,
    /// Caller-declared urgency.
    pub priority: Priority,
    /// Kinds the serving source must additionally advertise; used for
    /// capability-match scoring.
    pub required_tags: Vec<DataKind>,
    /// Free-form source parameters. Ordered map so cache keys are stable.
    pub params: BTreeMap<String, String>,
}

impl FetchRequest {
    /// Build a request for `kind`/`symbol` with default priority and no
    /// extra parameters.
    #[must_use]
    pub fn new(kind: DataKind, symbol: impl Into<String>) -> Self {
        Self {
            kind,
            symbol: symbol.into(),
            timeframe: None,
            priority: Priority::default(),
            required_tags: Vec::new(),
            params: BTreeMap::new(),
        }
    }

    /// Set the timeframe qualifier.
    #[must_use]
    pub fn with_timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = Some(timeframe.into());
        self
    }

    /// Set the request priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Require the serving source to advertise additional kinds.
    #[must_use]
    pub fn with_required_tags(mut self, tags: Vec<DataKind>) -> Self {
        self.required_tags = tags;
        self
    }

    /// Add a free-form source parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Normalized cache key for this request.
    ///
    /// Symbols are upper-cased and params are already ordered, so two
    /// requests that differ only in symbol casing or param insertion order
    /// share a key. Priority is deliberately excluded: it shapes routing,
    /// not the data returned.
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            kind: self.kind,
            symbol: self.symbol.to_uppercase(),
            timeframe: self.timeframe.clone(),
            params: self.params.clone(),
        }
    }
}

/// Normalized identity of a fetch for cache lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Data kind.
    pub kind: DataKind,
    /// Upper-cased symbol.
    pub symbol: String,
    /// Timeframe qualifier, if any.
    pub timeframe: Option<String>,
    /// Ordered request parameters.
    pub params: BTreeMap<String, String>,
}

/// A successful fetch, tagged with where it came from and how it performed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResponse {
    /// Opaque payload returned by the source.
    pub payload: Payload,
    /// Source that served the request.
    pub source: SourceKey,
    /// Observed attempt latency. Zero for cache hits.
    pub latency: Duration,
    /// Quality observation in [0, 1] derived from the attempt.
    pub quality: f64,
    /// True when served from the response cache.
    pub cached: bool,
}
