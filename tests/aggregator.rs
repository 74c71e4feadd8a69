mod common;

use common::{
    bundled_resource_dir, closed_port_addr, spawn_mc_server, spawn_roster_server, status_json, Behavior,
};
use mccard::client::StatusClient;
use mccard::icon::IconSource;
use mccard::roster::RosterOverride;
use mccard::StatusAggregator;
use std::time::Duration;

const PIXEL_PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

fn aggregator(roster: RosterOverride) -> StatusAggregator {
    StatusAggregator::new(
        StatusClient::new(Duration::from_secs(2)),
        roster,
        IconSource::new(bundled_resource_dir()),
    )
}

#[tokio::test]
async fn players_are_sorted_ordinally() {
    let json = status_json(&["steve", "Zed", "Alex", "_x"], 4, None);
    let (addr, _server) = spawn_mc_server(Behavior::Reply(json)).await;

    let status = aggregator(RosterOverride::disabled()).query_status(&addr).await.unwrap();
    assert_eq!(status.players(), ["Alex", "Zed", "_x", "steve"]);
    assert_eq!(status.online_players(), 4);
    assert_eq!(status.max_players(), 20);
    assert_eq!(status.version_label(), "Paper 1.20.4");
}

#[tokio::test]
async fn favicon_is_decoded_and_missing_one_uses_default() {
    let favicon = format!("data:image/png;base64,{}", PIXEL_PNG_B64);
    let (with_icon, _a) = spawn_mc_server(Behavior::Reply(status_json(&[], 0, Some(&favicon)))).await;
    let (without_icon, _b) = spawn_mc_server(Behavior::Reply(status_json(&[], 0, None))).await;
    let aggregator = aggregator(RosterOverride::disabled());

    let status = aggregator.query_status(&with_icon).await.unwrap();
    assert!(status.icon_bytes().starts_with(b"\x89PNG"));
    assert_eq!(image::load_from_memory(status.icon_bytes()).unwrap().width(), 1);

    let status = aggregator.query_status(&without_icon).await.unwrap();
    let bundled = std::fs::read(bundled_resource_dir().join("default_icon.png")).unwrap();
    assert_eq!(status.icon_bytes(), bundled.as_slice());
}

#[tokio::test]
async fn override_host_uses_external_roster_only() {
    let json = status_json(&["Steve", "bot_x"], 2, None);
    let (addr, _server) = spawn_mc_server(Behavior::Reply(json)).await;
    let (url, _roster) =
        spawn_roster_server(200, r#"{"players":[{"name":"bot_y"},{"name":"Alice"}]}"#).await;

    let roster = RosterOverride::new(Some(addr.clone()), Some(url), Duration::from_secs(2));
    let status = aggregator(roster).query_status(&addr).await.unwrap();
    assert_eq!(status.players(), ["Alice"]);
    // Counts still come from the protocol reply.
    assert_eq!(status.online_players(), 2);
}

#[tokio::test]
async fn failed_override_fetch_gives_empty_roster() {
    let (addr, _server) = spawn_mc_server(Behavior::Reply(status_json(&["Steve"], 1, None))).await;
    let (url, _roster) = spawn_roster_server(500, "oops").await;

    let roster = RosterOverride::new(Some(addr.clone()), Some(url), Duration::from_secs(2));
    let status = aggregator(roster).query_status(&addr).await.unwrap();
    assert!(status.players().is_empty());
}

#[tokio::test]
async fn unreachable_server_yields_none() {
    let addr = closed_port_addr().await;
    assert!(aggregator(RosterOverride::disabled()).get_status(&addr).await.is_none());
}

#[tokio::test]
async fn overall_deadline_bounds_the_query() {
    let (addr, _server) = spawn_mc_server(Behavior::Silent).await;
    let started = std::time::Instant::now();

    let err = aggregator(RosterOverride::disabled())
        .get_status_within(&addr, Duration::from_millis(300))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "timeout");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn configured_deadline_applies_to_get_status() {
    let (addr, _server) = spawn_mc_server(Behavior::Silent).await;
    let started = std::time::Instant::now();

    let bounded = aggregator(RosterOverride::disabled()).with_deadline(Duration::from_millis(300));
    assert!(bounded.get_status(&addr).await.is_none());
    assert_eq!(bounded.query_status(&addr).await.unwrap_err().kind(), "timeout");
    assert!(started.elapsed() < Duration::from_secs(2));
}
