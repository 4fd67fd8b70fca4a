//! The `SourceAdapter` trait implemented by every data source.

use async_trait::async_trait;

use argus_types::{ArgusError, SourceDescriptor, SourceKey};

use crate::request::{FetchRequest, Payload};

/// A single external data source.
///
/// Implementations wrap one provider (an HTTP API, a websocket bridge, a
/// mock) and advertise what they can serve through a static
/// [`SourceDescriptor`]. The orchestrator owns all resilience concerns:
/// adapters should surface provider failures as [`ArgusError`] values and
/// must tolerate being cancelled mid-flight when a parallel race is won
/// elsewhere.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Static capability advertisement for this source.
    fn descriptor(&self) -> &SourceDescriptor;

    /// Fetch the payload for a request.
    ///
    /// Calls are bounded by the orchestrator's per-attempt timeout; an
    /// adapter that never resolves is recorded as a timeout failure.
    async fn fetch(&self, request: &FetchRequest) -> Result<Payload, ArgusError>;

    /// Convenience accessor for the descriptor key.
    fn key(&self) -> SourceKey {
        self.descriptor().key
    }
}
