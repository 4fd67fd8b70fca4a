use std::sync::Arc;
use std::time::Duration;

use argus::{Argus, ArgusError};

use crate::helpers::price_mock;

#[test]
fn at_least_one_source_is_required() {
    let err = Argus::builder().build().unwrap_err();
    assert!(matches!(err, ArgusError::InvalidArg(msg) if msg.contains("no sources")));
}

#[test]
fn duplicate_keys_are_rejected() {
    let err = Argus::builder()
        .with_source(Arc::new(price_mock("twin").build()))
        .with_source(Arc::new(price_mock("twin").build()))
        .build()
        .unwrap_err();
    assert!(matches!(err, ArgusError::InvalidArg(msg) if msg.contains("duplicate")));
}

#[test]
fn out_of_range_priors_and_rates_are_rejected() {
    let err = Argus::builder()
        .with_source(Arc::new(price_mock("over").reliability_prior(1.5).build()))
        .build()
        .unwrap_err();
    assert!(matches!(err, ArgusError::InvalidArg(_)));

    let err = Argus::builder()
        .with_source(Arc::new(price_mock("fine").build()))
        .exploration_rate(1.2)
        .build()
        .unwrap_err();
    assert!(matches!(err, ArgusError::InvalidArg(_)));

    let err = Argus::builder()
        .with_source(Arc::new(price_mock("fine").build()))
        .ewma_alpha(0.0)
        .build()
        .unwrap_err();
    assert!(matches!(err, ArgusError::InvalidArg(_)));
}

#[test]
fn zero_source_timeout_is_rejected() {
    let err = Argus::builder()
        .with_source(Arc::new(price_mock("fine").build()))
        .source_timeout(Duration::ZERO)
        .build()
        .unwrap_err();
    assert!(matches!(err, ArgusError::InvalidArg(msg) if msg.contains("source_timeout")));
}
