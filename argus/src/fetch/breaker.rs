//! Per-source circuit breakers.
//!
//! Each source gets an independent three-state breaker. The fetch manager
//! consults it before every attempt and reports outcomes back; nothing else
//! mutates breaker state.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use argus_types::{BreakerConfig, CircuitState, SourceKey};

#[derive(Debug, Default)]
struct Breaker {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    probe_started: Option<Instant>,
}

/// Breaker table shared by all fetch paths.
pub(crate) struct BreakerTable {
    inner: Mutex<HashMap<SourceKey, Breaker>>,
    cfg: BreakerConfig,
}

impl BreakerTable {
    pub(crate) fn new(cfg: BreakerConfig) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            cfg,
        }
    }

    /// Whether an attempt against `key` may proceed right now.
    ///
    /// An open breaker whose cooldown has elapsed transitions to half-open
    /// here, so the decision and the transition stay atomic under one lock.
    /// Half-open admits one probe at a time; further requests are refused
    /// until the probe reports back or goes stale for a full cooldown (a
    /// probe cancelled mid-race never reports, and must not wedge the
    /// breaker).
    pub(crate) fn acquire(&self, key: SourceKey) -> bool {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let breaker = guard.entry(key).or_default();
        match breaker.state {
            CircuitState::Closed => true,
            CircuitState::HalfOpen => {
                let stale = breaker
                    .probe_started
                    .map(|at| at.elapsed() >= self.cfg.cooldown)
                    .unwrap_or(true);
                if stale {
                    breaker.probe_started = Some(Instant::now());
                }
                stale
            }
            CircuitState::Open => {
                let elapsed = breaker
                    .opened_at
                    .map(|at| at.elapsed() >= self.cfg.cooldown)
                    .unwrap_or(true);
                if elapsed {
                    breaker.state = CircuitState::HalfOpen;
                    breaker.probe_started = Some(Instant::now());
                    true
                } else {
                    false
                }
            }
        }
    }

    /// A successful attempt closes the circuit and clears the failure run.
    pub(crate) fn record_success(&self, key: SourceKey) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let breaker = guard.entry(key).or_default();
        breaker.state = CircuitState::Closed;
        breaker.consecutive_failures = 0;
        breaker.opened_at = None;
        breaker.probe_started = None;
    }

    /// A counted failure. A half-open probe failure reopens immediately; a
    /// closed breaker opens once the run reaches the threshold.
    pub(crate) fn record_failure(&self, key: SourceKey) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let breaker = guard.entry(key).or_default();
        breaker.consecutive_failures = breaker.consecutive_failures.saturating_add(1);
        match breaker.state {
            CircuitState::HalfOpen => {
                breaker.state = CircuitState::Open;
                breaker.opened_at = Some(Instant::now());
                breaker.probe_started = None;
            }
            CircuitState::Closed => {
                if breaker.consecutive_failures >= self.cfg.failure_threshold {
                    breaker.state = CircuitState::Open;
                    breaker.opened_at = Some(Instant::now());
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Current state for `key`; sources without history report `Closed`.
    pub(crate) fn state(&self, key: SourceKey) -> CircuitState {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.get(&key).map(|b| b.state).unwrap_or_default()
    }
}
