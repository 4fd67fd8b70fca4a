use std::sync::Arc;

use argus::{
    Argus, DataKind, MarketSignal, Provenance, Session, SourceKey, Trend, Volatility,
};

use crate::helpers::key;

fn mock(name: &'static str, kinds: Vec<DataKind>, prior: f64) -> Arc<argus_mock::MockAdapter> {
    Arc::new(
        argus_mock::MockAdapter::builder(SourceKey::new(name), kinds)
            .reliability_prior(prior)
            .build(),
    )
}

fn fleet(n: usize) -> Vec<Arc<argus_mock::MockAdapter>> {
    const NAMES: [&str; 8] = ["s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7"];
    NAMES[..n]
        .iter()
        .map(|&name| mock(name, vec![DataKind::Price], 0.5))
        .collect()
}

fn context(volatility: Volatility, trend: Trend) -> argus::MarketContext {
    argus::MarketContext {
        volatility,
        trend,
        session: Session::European,
    }
}

#[tokio::test]
async fn subset_size_follows_volatility() {
    let mut builder = Argus::builder().exploration_rate(0.0);
    for source in fleet(8) {
        builder = builder.with_source(source);
    }
    let argus = builder.build().unwrap();

    let high = argus.select_sources(context(Volatility::High, Trend::Sideways));
    let medium = argus.select_sources(context(Volatility::Medium, Trend::Sideways));
    let low = argus.select_sources(context(Volatility::Low, Trend::Sideways));
    assert_eq!(high.len(), 6);
    assert_eq!(medium.len(), 4);
    assert_eq!(low.len(), 3);
}

#[tokio::test]
async fn subset_is_clamped_to_availability() {
    let mut builder = Argus::builder().exploration_rate(0.0);
    for source in fleet(2) {
        builder = builder.with_source(source);
    }
    let argus = builder.build().unwrap();

    let picks = argus.select_sources(context(Volatility::High, Trend::Sideways));
    assert_eq!(picks.len(), 2);
}

#[tokio::test]
async fn derivatives_and_whale_sources_surge_in_a_crash() {
    let derivatives = mock("derivs", vec![DataKind::Derivatives], 0.45);
    let whale = mock("whales", vec![DataKind::WhaleActivity], 0.45);
    let plain = mock("plain", vec![DataKind::Price], 0.5);

    let argus = Argus::builder()
        .with_source(plain)
        .with_source(derivatives)
        .with_source(whale)
        .exploration_rate(0.0)
        .build()
        .unwrap();

    let crash = context(Volatility::High, Trend::Bearish);
    let picks = argus.select_sources(crash);
    // Affinity bonus lifts both specialists over the plain source.
    assert_eq!(picks[0].source, key("derivs"));
    assert_eq!(picks[1].source, key("whales"));
}

#[tokio::test]
async fn institutional_and_social_sources_surge_in_a_rally() {
    let institutional = mock("institutional", vec![DataKind::Institutional], 0.45);
    let social = mock("social", vec![DataKind::Social], 0.45);
    let plain = mock("plain", vec![DataKind::Price], 0.5);

    let argus = Argus::builder()
        .with_source(plain)
        .with_source(institutional)
        .with_source(social)
        .exploration_rate(0.0)
        .build()
        .unwrap();

    let rally = context(Volatility::Medium, Trend::Bullish);
    let picks = argus.select_sources(rally);
    assert_eq!(picks[0].source, key("institutional"));
    assert_eq!(picks[1].source, key("social"));
}

#[tokio::test]
async fn starved_sources_earn_their_way_back_in() {
    let favored = [
        mock("fav-a", vec![DataKind::Price], 0.5),
        mock("fav-b", vec![DataKind::Price], 0.5),
        mock("fav-c", vec![DataKind::Price], 0.5),
    ];
    let neglected = mock("neglected", vec![DataKind::Price], 0.4);

    let mut builder = Argus::builder().exploration_rate(0.0);
    for source in favored {
        builder = builder.with_source(source);
    }
    let argus = builder.with_source(neglected).build().unwrap();

    let calm = context(Volatility::Low, Trend::Sideways);
    // Default starvation window is 10 cycles.
    for cycle in 1..=9u64 {
        let picks = argus.select_sources(calm);
        assert!(
            picks.iter().all(|p| p.source != key("neglected")),
            "unexpectedly selected on cycle {cycle}"
        );
    }
    let picks = argus.select_sources(calm);
    assert!(picks.iter().any(|p| p.source == key("neglected")));
}

#[tokio::test]
async fn seeded_runs_are_reproducible() {
    let build = || {
        let mut builder = Argus::builder().rng_seed(7).exploration_rate(0.5);
        for source in fleet(8) {
            builder = builder.with_source(source);
        }
        builder.build().unwrap()
    };
    let first = build();
    let second = build();

    let ctx = context(Volatility::High, Trend::Sideways);
    for _ in 0..20 {
        assert_eq!(first.select_sources(ctx), second.select_sources(ctx));
    }
}

#[tokio::test]
async fn exploration_fraction_converges_to_the_configured_rate() {
    let mut builder = Argus::builder().rng_seed(42);
    for source in fleet(8) {
        builder = builder.with_source(source);
    }
    let argus = builder.build().unwrap();

    let ctx = context(Volatility::High, Trend::Sideways);
    let mut explored = 0usize;
    let mut total = 0usize;
    for _ in 0..500 {
        for pick in argus.select_sources(ctx) {
            total += 1;
            if pick.provenance == Provenance::Explore {
                explored += 1;
            }
        }
    }
    let fraction = explored as f64 / total as f64;
    assert!(
        (0.17..=0.23).contains(&fraction),
        "explored fraction {fraction} strayed from 0.2"
    );
}

#[tokio::test]
async fn context_assessment_feeds_selection() {
    let mut builder = Argus::builder().exploration_rate(0.0);
    for source in fleet(8) {
        builder = builder.with_source(source);
    }
    let argus = builder.build().unwrap();

    let ctx = argus.assess_context_at(MarketSignal::new(-6.5), 3);
    assert_eq!(ctx.volatility, Volatility::High);
    assert_eq!(ctx.trend, Trend::Bearish);
    assert_eq!(ctx.session, Session::Asian);
    assert_eq!(argus.select_sources(ctx).len(), 6);
}
