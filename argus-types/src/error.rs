use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the argus workspace.
///
/// This wraps capability mismatches, argument validation errors,
/// source-tagged failures, rate limiting, and an aggregate for
/// multi-source attempts.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArgusError {
    /// No registered source advertises the requested data kind.
    #[error("no capable source: {kind}")]
    NoCapableSource {
        /// Kind label describing what was requested (e.g. "on-chain").
        kind: String,
    },

    /// Invalid input argument or builder configuration.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An individual source returned an error.
    #[error("{provider} failed: {msg}")]
    Source {
        /// Source name that failed.
        provider: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A source rejected the request for authentication reasons.
    #[error("{provider} auth failure: {msg}")]
    Auth {
        /// Source name that rejected the request.
        provider: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A source reported rate limiting; retry after `retry_in_ms`.
    ///
    /// Rate limiting is an expected operating condition and does not count
    /// toward a source's failure threshold.
    #[error("{provider} rate limited: retry_in_ms={retry_in_ms}")]
    RateLimited {
        /// Source name that applied the limit.
        provider: String,
        /// Milliseconds until the limit window resets, if advertised.
        retry_in_ms: u64,
    },

    /// An individual source call exceeded the configured timeout.
    #[error("source timed out: {kind} via {provider}")]
    SourceTimeout {
        /// Source name that timed out.
        provider: String,
        /// Kind label for which the call timed out.
        kind: String,
    },

    /// A source was skipped because its circuit breaker is open.
    ///
    /// Appears only inside [`ArgusError::AllSourcesFailed`] aggregates; the
    /// manager never surfaces it as a standalone failure.
    #[error("circuit open: {provider}")]
    CircuitOpen {
        /// Source name whose circuit is open.
        provider: String,
    },

    /// All eligible sources failed; contains the individual failures.
    #[error("all sources failed: {0:?}")]
    AllSourcesFailed(Vec<ArgusError>),
}

impl ArgusError {
    /// Helper: build a `NoCapableSource` error for a kind string.
    #[must_use]
    pub fn no_capable_source(kind: impl Into<String>) -> Self {
        Self::NoCapableSource { kind: kind.into() }
    }

    /// Helper: build a `Source` error with the source name and message.
    pub fn source(source: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Source {
            provider: source.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `Auth` error with the source name and message.
    pub fn auth(source: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Auth {
            provider: source.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `RateLimited` error.
    pub fn rate_limited(source: impl Into<String>, retry_in_ms: u64) -> Self {
        Self::RateLimited {
            provider: source.into(),
            retry_in_ms,
        }
    }

    /// Helper: build a `SourceTimeout` error.
    pub fn source_timeout(source: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::SourceTimeout {
            provider: source.into(),
            kind: kind.into(),
        }
    }

    /// Helper: build a `CircuitOpen` bookkeeping entry.
    #[must_use]
    pub fn circuit_open(source: impl Into<String>) -> Self {
        Self::CircuitOpen {
            provider: source.into(),
        }
    }

    /// Returns true if this error counts toward a source's consecutive
    /// failure threshold.
    ///
    /// Rate limiting and open-circuit skips are expected conditions, not
    /// evidence of source malfunction. Aggregates are classified based on
    /// their contents.
    #[must_use]
    pub fn counts_as_failure(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::CircuitOpen { .. } => false,
            Self::AllSourcesFailed(inner) => inner.iter().any(Self::counts_as_failure),
            _ => true,
        }
    }

    /// Flatten nested `AllSourcesFailed` structures into a plain vector.
    ///
    /// This preserves other error variants as-is and unwraps recursively.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllSourcesFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}
