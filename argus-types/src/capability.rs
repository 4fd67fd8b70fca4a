use core::fmt;
use serde::{Deserialize, Serialize};

/// Signal categories a source can serve.
///
/// These map one-to-one with fetchable data families and allow consistent
/// Display formatting and match-exhaustive handling when adding new kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DataKind {
    /// Spot price snapshots.
    Price,
    /// Historical OHLCV candles.
    Ohlcv,
    /// On-chain activity (transfers, active addresses, exchange flows).
    OnChain,
    /// Aggregated social or market sentiment scores.
    Sentiment,
    /// News articles and headlines.
    News,
    /// Derivatives data: funding rates, open interest, liquidations.
    Derivatives,
    /// Large-holder transfer tracking.
    WhaleActivity,
    /// Institutional positioning and fund flows.
    Institutional,
    /// Social-platform activity and influencer signals.
    Social,
    /// Macroeconomic indicators.
    Macro,
}

impl DataKind {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Ohlcv => "ohlcv",
            Self::OnChain => "on-chain",
            Self::Sentiment => "sentiment",
            Self::News => "news",
            Self::Derivatives => "derivatives",
            Self::WhaleActivity => "whale-activity",
            Self::Institutional => "institutional",
            Self::Social => "social",
            Self::Macro => "macro",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pricing model a source operates under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CostTier {
    /// No cost, no account required.
    #[default]
    Free,
    /// Free tier with paid upgrades; free quota applies.
    Freemium,
    /// Metered paid access.
    Paid,
    /// Flat-rate subscription.
    Subscription,
}

impl CostTier {
    /// Normalized score in [0, 1]; cheaper is better.
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Self::Free => 1.0,
            Self::Freemium => 0.8,
            Self::Paid => 0.5,
            Self::Subscription => 0.4,
        }
    }
}

/// Expected response-latency class for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LatencyTier {
    /// Sub-second, typically websocket-backed.
    RealTime,
    /// Low single-digit seconds.
    #[default]
    Fast,
    /// Several seconds.
    Moderate,
    /// Tens of seconds or batch-oriented.
    Slow,
}

impl LatencyTier {
    /// Normalized score in [0, 1]; faster is better.
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Self::RealTime => 1.0,
            Self::Fast => 0.8,
            Self::Moderate => 0.5,
            Self::Slow => 0.3,
        }
    }
}

/// Typed key identifying a registered source.
///
/// Serializes as its name; keys are static so there is deliberately no
/// deserialization path back into the typed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceKey(pub &'static str);

impl SourceKey {
    /// Construct a new typed source key from a static name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the inner static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl From<SourceKey> for &'static str {
    fn from(k: SourceKey) -> Self {
        k.0
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Advertised request budget for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    /// Maximum requests allowed per window.
    pub max_requests: u32,
    /// Window length in seconds.
    pub window_secs: u32,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window_secs: 60,
        }
    }
}

/// Static capability advertisement for one source.
///
/// Descriptors are immutable after registration; runtime learning lives in
/// the metrics table, never here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceDescriptor {
    /// Unique key for the source.
    pub key: SourceKey,
    /// Data kinds this source can serve.
    pub kinds: Vec<DataKind>,
    /// Pricing model.
    pub cost: CostTier,
    /// Expected latency class.
    pub latency: LatencyTier,
    /// Static reliability prior in [0, 1], used until runtime history exists.
    pub reliability_prior: f64,
    /// Advertised request budget.
    pub rate_limit: RateLimit,
}

impl SourceDescriptor {
    /// Build a descriptor with defaults for cost, latency, and rate limit.
    #[must_use]
    pub fn new(key: SourceKey, kinds: Vec<DataKind>) -> Self {
        Self {
            key,
            kinds,
            cost: CostTier::default(),
            latency: LatencyTier::default(),
            reliability_prior: 0.5,
            rate_limit: RateLimit::default(),
        }
    }

    /// True if the source advertises the given kind.
    #[must_use]
    pub fn serves(&self, kind: DataKind) -> bool {
        self.kinds.contains(&kind)
    }
}
