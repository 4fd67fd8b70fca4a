// Shared fixtures for the orchestrator integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use argus::{DataKind, FetchRequest, Payload, SourceKey};
use argus_mock::{MockAdapter, MockAdapterBuilder};

/// Common symbol constants used across tests.
pub const BTC: &str = "BTC";
pub const ETH: &str = "ETH";
pub const SOL: &str = "SOL";

pub fn price_payload(value: f64) -> Payload {
    serde_json::json!({ "price": value })
}

pub fn price_request(symbol: &str) -> FetchRequest {
    FetchRequest::new(DataKind::Price, symbol)
}

/// A mock serving price data, ready for further scripting.
pub fn price_mock(name: &'static str) -> MockAdapterBuilder {
    MockAdapter::builder(SourceKey::new(name), vec![DataKind::Price])
}

pub fn key(name: &'static str) -> SourceKey {
    SourceKey::new(name)
}

pub fn arc(adapter: MockAdapter) -> Arc<MockAdapter> {
    Arc::new(adapter)
}
