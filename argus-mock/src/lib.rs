//! Scripted mock source adapter for tests and examples.
//!
//! `MockAdapter` plays back a per-call behavior script and then repeats a
//! fallback behavior, counting every call it receives. Tests use the script
//! to stage failure sequences (trip a breaker, exhaust a fallback chain) and
//! the call counter to assert how often the orchestrator actually reached
//! the source.
#![warn(missing_docs)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use argus_core::{
    ArgusError, CostTier, DataKind, FetchRequest, LatencyTier, Payload, RateLimit, SourceAdapter,
    SourceDescriptor, SourceKey,
};

/// Instruction for how one `fetch` call should behave.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the provided payload immediately.
    Return(Payload),
    /// Fail immediately with the provided error.
    Fail(ArgusError),
    /// Hang indefinitely (simulate a stalled provider).
    Hang,
    /// Sleep for the given duration, then return the payload.
    Delay(Duration, Payload),
}

/// A source adapter that plays back scripted behaviors.
pub struct MockAdapter {
    descriptor: SourceDescriptor,
    script: Mutex<VecDeque<MockBehavior>>,
    fallback: MockBehavior,
    calls: AtomicUsize,
}

impl MockAdapter {
    /// Start building a mock for `key` advertising the given kinds.
    #[must_use]
    pub fn builder(key: SourceKey, kinds: Vec<DataKind>) -> MockAdapterBuilder {
        MockAdapterBuilder {
            descriptor: SourceDescriptor::new(key, kinds),
            script: VecDeque::new(),
            fallback: MockBehavior::Return(Payload::Null),
        }
    }

    /// Shorthand: a mock that always succeeds with a null payload.
    #[must_use]
    pub fn succeeding(key: SourceKey, kinds: Vec<DataKind>) -> Self {
        Self::builder(key, kinds).build()
    }

    /// Shorthand: a mock that always fails with a source error.
    #[must_use]
    pub fn failing(key: SourceKey, kinds: Vec<DataKind>) -> Self {
        let err = ArgusError::source(key.as_str(), "mock failure");
        Self::builder(key, kinds)
            .fallback(MockBehavior::Fail(err))
            .build()
    }

    /// Number of `fetch` calls that reached this adapter.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_behavior(&self) -> MockBehavior {
        let mut script = self.script.lock().unwrap_or_else(|e| e.into_inner());
        script.pop_front().unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl SourceAdapter for MockAdapter {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    async fn fetch(&self, _request: &FetchRequest) -> Result<Payload, ArgusError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.next_behavior() {
            MockBehavior::Return(payload) => Ok(payload),
            MockBehavior::Fail(err) => Err(err),
            MockBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            MockBehavior::Delay(dur, payload) => {
                tokio::time::sleep(dur).await;
                Ok(payload)
            }
        }
    }
}

/// Builder for [`MockAdapter`].
pub struct MockAdapterBuilder {
    descriptor: SourceDescriptor,
    script: VecDeque<MockBehavior>,
    fallback: MockBehavior,
}

impl MockAdapterBuilder {
    /// Set the advertised cost tier.
    #[must_use]
    pub fn cost(mut self, cost: CostTier) -> Self {
        self.descriptor.cost = cost;
        self
    }

    /// Set the advertised latency tier.
    #[must_use]
    pub fn latency(mut self, latency: LatencyTier) -> Self {
        self.descriptor.latency = latency;
        self
    }

    /// Set the static reliability prior.
    #[must_use]
    pub fn reliability_prior(mut self, prior: f64) -> Self {
        self.descriptor.reliability_prior = prior;
        self
    }

    /// Set the advertised rate limit.
    #[must_use]
    pub fn rate_limit(mut self, limit: RateLimit) -> Self {
        self.descriptor.rate_limit = limit;
        self
    }

    /// Append one scripted behavior; scripted entries are consumed in order
    /// before the fallback applies.
    #[must_use]
    pub fn behavior(mut self, behavior: MockBehavior) -> Self {
        self.script.push_back(behavior);
        self
    }

    /// Append `n` copies of a scripted behavior.
    #[must_use]
    pub fn behaviors(mut self, behavior: MockBehavior, n: usize) -> Self {
        for _ in 0..n {
            self.script.push_back(behavior.clone());
        }
        self
    }

    /// Behavior applied once the script is exhausted.
    #[must_use]
    pub fn fallback(mut self, behavior: MockBehavior) -> Self {
        self.fallback = behavior;
        self
    }

    /// Finish building the adapter.
    #[must_use]
    pub fn build(self) -> MockAdapter {
        MockAdapter {
            descriptor: self.descriptor,
            script: Mutex::new(self.script),
            fallback: self.fallback,
            calls: AtomicUsize::new(0),
        }
    }
}
