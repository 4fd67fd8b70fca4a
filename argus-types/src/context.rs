//! Market-context classification types.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Volatility regime derived from the magnitude of recent price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Volatility {
    /// |change| below 2%.
    Low,
    /// |change| in [2%, 5%).
    #[default]
    Medium,
    /// |change| at or above 5%.
    High,
}

/// Directional bias derived from signed recent price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Trend {
    /// Change at or above +2%.
    Bullish,
    /// Change within (-2%, +2%).
    #[default]
    Sideways,
    /// Change at or below -2%.
    Bearish,
}

/// Trading-session bucket by UTC hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Session {
    /// 00:00–07:59 UTC.
    Asian,
    /// 08:00–12:59 UTC.
    #[default]
    European,
    /// 13:00–15:59 UTC, European/American overlap.
    Overlap,
    /// 16:00–23:59 UTC.
    American,
}

impl Session {
    /// Stable identifier for logs and metric keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asian => "asian",
            Self::European => "european",
            Self::Overlap => "overlap",
            Self::American => "american",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete market regime used to bucket per-source statistics.
///
/// The full space is small (3 × 3 × 4 = 36 buckets), so contexts are used
/// directly as map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MarketContext {
    /// Volatility regime.
    pub volatility: Volatility,
    /// Directional bias.
    pub trend: Trend,
    /// Trading-session bucket.
    pub session: Session,
}

/// Raw observation a context is assessed from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketSignal {
    /// Recent percent price change, signed (e.g. -6.5 for a 6.5% drop).
    pub percent_change: f64,
}

impl MarketSignal {
    /// Build a signal from a signed percent change.
    #[must_use]
    pub const fn new(percent_change: f64) -> Self {
        Self { percent_change }
    }
}
