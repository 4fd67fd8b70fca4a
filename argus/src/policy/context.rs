//! Market-context assessment from raw signals.

use argus_types::{MarketContext, MarketSignal, Session, Trend, Volatility};
use chrono::Timelike;

const HIGH_VOLATILITY_PCT: f64 = 5.0;
const LOW_VOLATILITY_PCT: f64 = 2.0;
const TREND_PCT: f64 = 2.0;

/// Classify a signal against the current UTC wall clock.
pub(crate) fn assess(signal: MarketSignal) -> MarketContext {
    assess_at(signal, chrono::Utc::now().hour())
}

/// Classify a signal at an explicit UTC hour. Used directly by tests and by
/// callers replaying historical signals.
pub(crate) fn assess_at(signal: MarketSignal, utc_hour: u32) -> MarketContext {
    MarketContext {
        volatility: volatility(signal.percent_change),
        trend: trend(signal.percent_change),
        session: session(utc_hour),
    }
}

fn volatility(percent_change: f64) -> Volatility {
    let magnitude = percent_change.abs();
    if magnitude >= HIGH_VOLATILITY_PCT {
        Volatility::High
    } else if magnitude < LOW_VOLATILITY_PCT {
        Volatility::Low
    } else {
        Volatility::Medium
    }
}

fn trend(percent_change: f64) -> Trend {
    if percent_change >= TREND_PCT {
        Trend::Bullish
    } else if percent_change <= -TREND_PCT {
        Trend::Bearish
    } else {
        Trend::Sideways
    }
}

fn session(utc_hour: u32) -> Session {
    match utc_hour % 24 {
        0..=7 => Session::Asian,
        8..=12 => Session::European,
        13..=15 => Session::Overlap,
        _ => Session::American,
    }
}
