use std::sync::Arc;
use std::time::Duration;

use argus::{Argus, ArgusError, CircuitState};
use argus_mock::MockBehavior;

use crate::helpers::{key, price_mock, price_payload, price_request};

#[tokio::test]
async fn breaker_opens_at_the_threshold_and_skips_the_source() {
    let broken = Arc::new(
        price_mock("broken")
            .fallback(MockBehavior::Fail(ArgusError::source("broken", "boom")))
            .build(),
    );

    let argus = Argus::builder()
        .with_source(broken.clone())
        .breaker_threshold(3)
        .cache_ttl(Duration::ZERO)
        .build()
        .unwrap();

    for _ in 0..3 {
        let _ = argus.fetch(&price_request("BTC")).await;
    }
    assert_eq!(argus.circuit_state(key("broken")), CircuitState::Open);
    assert_eq!(broken.calls(), 3);

    // While open the source is skipped entirely.
    let err = argus.fetch(&price_request("BTC")).await.unwrap_err();
    assert_eq!(broken.calls(), 3);
    assert!(matches!(
        err.flatten().as_slice(),
        [ArgusError::CircuitOpen { provider }] if provider == "broken"
    ));
}

#[tokio::test]
async fn rate_limited_responses_leave_the_circuit_closed() {
    let limited = Arc::new(
        price_mock("limited")
            .fallback(MockBehavior::Fail(ArgusError::rate_limited("limited", 500)))
            .build(),
    );

    let argus = Argus::builder()
        .with_source(limited.clone())
        .breaker_threshold(2)
        .cache_ttl(Duration::ZERO)
        .build()
        .unwrap();

    for _ in 0..10 {
        let _ = argus.fetch(&price_request("BTC")).await;
    }
    assert_eq!(argus.circuit_state(key("limited")), CircuitState::Closed);
    // Every attempt went through; nothing was gated.
    assert_eq!(limited.calls(), 10);
}

#[tokio::test]
async fn cooldown_allows_a_probe_and_success_closes() {
    let recovering = Arc::new(
        price_mock("recovering")
            .behavior(MockBehavior::Fail(ArgusError::source("recovering", "down")))
            .behavior(MockBehavior::Fail(ArgusError::source("recovering", "down")))
            .fallback(MockBehavior::Return(price_payload(2.0)))
            .build(),
    );

    let argus = Argus::builder()
        .with_source(recovering.clone())
        .breaker_threshold(2)
        .breaker_cooldown(Duration::from_millis(50))
        .cache_ttl(Duration::ZERO)
        .build()
        .unwrap();

    let _ = argus.fetch(&price_request("BTC")).await;
    let _ = argus.fetch(&price_request("BTC")).await;
    assert_eq!(argus.circuit_state(key("recovering")), CircuitState::Open);

    tokio::time::sleep(Duration::from_millis(70)).await;
    let resp = argus.fetch(&price_request("BTC")).await.unwrap();
    assert_eq!(resp.source, key("recovering"));
    assert_eq!(argus.circuit_state(key("recovering")), CircuitState::Closed);
}

#[tokio::test]
async fn failed_probe_reopens_the_circuit() {
    let down = Arc::new(
        price_mock("down")
            .fallback(MockBehavior::Fail(ArgusError::source("down", "still down")))
            .build(),
    );

    let argus = Argus::builder()
        .with_source(down.clone())
        .breaker_threshold(1)
        .breaker_cooldown(Duration::from_millis(40))
        .cache_ttl(Duration::ZERO)
        .build()
        .unwrap();

    let _ = argus.fetch(&price_request("BTC")).await;
    assert_eq!(argus.circuit_state(key("down")), CircuitState::Open);

    tokio::time::sleep(Duration::from_millis(60)).await;
    let _ = argus.fetch(&price_request("BTC")).await;
    assert_eq!(argus.circuit_state(key("down")), CircuitState::Open);
    // One original failure plus exactly one probe.
    assert_eq!(down.calls(), 2);
}

#[tokio::test]
async fn timeouts_count_toward_the_threshold() {
    let stalled = Arc::new(price_mock("stalled").fallback(MockBehavior::Hang).build());

    let argus = Argus::builder()
        .with_source(stalled)
        .breaker_threshold(2)
        .source_timeout(Duration::from_millis(30))
        .cache_ttl(Duration::ZERO)
        .build()
        .unwrap();

    let _ = argus.fetch(&price_request("BTC")).await;
    let _ = argus.fetch(&price_request("BTC")).await;
    assert_eq!(argus.circuit_state(key("stalled")), CircuitState::Open);
}
