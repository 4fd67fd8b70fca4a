use std::sync::Arc;
use std::time::Duration;

use argus::{Argus, ArgusError, CircuitState};
use argus_mock::MockBehavior;

use crate::helpers::{key, price_mock, price_payload, price_request};

#[tokio::test]
async fn first_success_wins_the_race() {
    let slow = Arc::new(
        price_mock("slow")
            .reliability_prior(0.9)
            .fallback(MockBehavior::Delay(
                Duration::from_millis(150),
                price_payload(1.0),
            ))
            .build(),
    );
    let quick = Arc::new(
        price_mock("quick")
            .reliability_prior(0.5)
            .fallback(MockBehavior::Return(price_payload(2.0)))
            .build(),
    );

    let argus = Argus::builder()
        .with_source(slow)
        .with_source(quick)
        .cache_ttl(Duration::ZERO)
        .build()
        .unwrap();

    let resp = argus.fetch_parallel(&price_request("BTC"), 2).await.unwrap();
    assert_eq!(resp.source, key("quick"));
}

#[tokio::test]
async fn cancelled_attempts_record_no_failures() {
    let hung = Arc::new(
        price_mock("hung")
            .reliability_prior(0.9)
            .fallback(MockBehavior::Hang)
            .build(),
    );
    let quick = Arc::new(
        price_mock("quick")
            .reliability_prior(0.5)
            .fallback(MockBehavior::Return(price_payload(2.0)))
            .build(),
    );

    let argus = Argus::builder()
        .with_source(hung.clone())
        .with_source(quick)
        .breaker_threshold(1)
        .cache_ttl(Duration::ZERO)
        .build()
        .unwrap();

    let resp = argus.fetch_parallel(&price_request("BTC"), 2).await.unwrap();
    assert_eq!(resp.source, key("quick"));

    // The hung attempt was dropped, not failed: circuit stays closed and
    // no statistics bucket exists for it.
    assert_eq!(argus.circuit_state(key("hung")), CircuitState::Closed);
    assert!(
        argus
            .metrics_snapshot()
            .iter()
            .all(|snap| snap.source != "hung")
    );
}

#[tokio::test]
async fn fanout_bounds_the_race_width() {
    let a = Arc::new(
        price_mock("a")
            .reliability_prior(0.9)
            .fallback(MockBehavior::Return(price_payload(1.0)))
            .build(),
    );
    let b = Arc::new(
        price_mock("b")
            .reliability_prior(0.8)
            .fallback(MockBehavior::Return(price_payload(2.0)))
            .build(),
    );
    let spare = Arc::new(
        price_mock("spare")
            .reliability_prior(0.1)
            .fallback(MockBehavior::Return(price_payload(3.0)))
            .build(),
    );

    let argus = Argus::builder()
        .with_source(a)
        .with_source(b)
        .with_source(spare.clone())
        .cache_ttl(Duration::ZERO)
        .build()
        .unwrap();

    argus.fetch_parallel(&price_request("BTC"), 2).await.unwrap();
    assert_eq!(spare.calls(), 0);
}

#[tokio::test]
async fn losers_that_finished_before_the_win_still_count() {
    let instant_fail = Arc::new(
        price_mock("instant-fail")
            .reliability_prior(0.9)
            .fallback(MockBehavior::Fail(ArgusError::source("instant-fail", "500")))
            .build(),
    );
    let delayed_win = Arc::new(
        price_mock("delayed-win")
            .reliability_prior(0.5)
            .fallback(MockBehavior::Delay(
                Duration::from_millis(60),
                price_payload(9.0),
            ))
            .build(),
    );

    let argus = Argus::builder()
        .with_source(instant_fail)
        .with_source(delayed_win)
        .cache_ttl(Duration::ZERO)
        .build()
        .unwrap();

    let resp = argus.fetch_parallel(&price_request("BTC"), 2).await.unwrap();
    assert_eq!(resp.source, key("delayed-win"));
    // The completed failure was recorded normally.
    let snap = argus.metrics_snapshot();
    let failed = snap
        .iter()
        .find(|s| s.source == "instant-fail" && s.context.is_none())
        .expect("failure bucket");
    assert_eq!(failed.consecutive_failures, 1);
}

#[tokio::test]
async fn open_circuits_are_gated_out_of_the_race() {
    let gated = Arc::new(
        price_mock("gated")
            .fallback(MockBehavior::Fail(ArgusError::source("gated", "boom")))
            .build(),
    );

    let argus = Argus::builder()
        .with_source(gated.clone())
        .breaker_threshold(1)
        .cache_ttl(Duration::ZERO)
        .build()
        .unwrap();

    let _ = argus.fetch(&price_request("BTC")).await;
    assert_eq!(argus.circuit_state(key("gated")), CircuitState::Open);

    let err = argus
        .fetch_parallel(&price_request("BTC"), 2)
        .await
        .unwrap_err();
    assert!(matches!(
        err.flatten().as_slice(),
        [ArgusError::CircuitOpen { provider }] if provider == "gated"
    ));
    assert_eq!(gated.calls(), 1);
}

#[tokio::test]
async fn winner_is_written_through_to_the_cache() {
    let quick = Arc::new(
        price_mock("quick")
            .fallback(MockBehavior::Return(price_payload(5.0)))
            .build(),
    );

    let argus = Argus::builder()
        .with_source(quick.clone())
        .cache_ttl(Duration::from_secs(60))
        .build()
        .unwrap();

    let _ = argus.fetch_parallel(&price_request("BTC"), 1).await.unwrap();
    let hit = argus.fetch(&price_request("BTC")).await.unwrap();
    assert!(hit.cached);
    assert_eq!(quick.calls(), 1);
}

#[tokio::test]
async fn zero_fanout_is_rejected() {
    let argus = Argus::builder()
        .with_source(Arc::new(price_mock("any").build()))
        .build()
        .unwrap();

    let err = argus
        .fetch_parallel(&price_request("BTC"), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, ArgusError::InvalidArg(_)));
}
