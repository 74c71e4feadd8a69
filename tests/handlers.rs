mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::{bundled_resource_dir, closed_port_addr, spawn_mc_server, status_json, Behavior};
use governor::{Quota, RateLimiter};
use mccard::client::StatusClient;
use mccard::handlers::{self, IpRateLimiter};
use mccard::icon::IconSource;
use mccard::render::font::FontSource;
use mccard::render::{Renderer, Theme};
use mccard::roster::RosterOverride;
use mccard::{CardService, StatusAggregator};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;

fn service() -> CardService {
    let aggregator = StatusAggregator::new(
        StatusClient::new(Duration::from_secs(2)),
        RosterOverride::disabled(),
        IconSource::new(bundled_resource_dir()),
    );
    let renderer = Renderer::new(Theme::default(), FontSource::bitmap_only());
    CardService::new(aggregator, renderer, Duration::from_secs(5))
}

fn limiter(burst: u32) -> web::Data<IpRateLimiter> {
    let burst = NonZeroU32::new(burst).unwrap();
    web::Data::new(RateLimiter::keyed(Quota::per_minute(burst)))
}

fn peer() -> SocketAddr {
    "10.0.0.7:40000".parse().unwrap()
}

macro_rules! app {
    ($limiter:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(service()))
                .app_data($limiter)
                .route("/", web::get().to(handlers::index::index))
                .route("/status", web::get().to(handlers::status::get_card))
                .route("/status/json", web::get().to(handlers::status::get_status_json)),
        )
        .await
    };
}

#[actix_web::test]
async fn index_reports_ok() {
    let app = app!(limiter(10));
    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body.as_ref(), br#"{"status":"ok"}"#);
}

#[actix_web::test]
async fn invalid_host_is_rejected() {
    let app = app!(limiter(10));
    let req = test::TestRequest::get()
        .uri("/status?name=x&host=evil%2Fhost")
        .peer_addr(peer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn rate_limit_applies_per_client() {
    let app = app!(limiter(1));
    let first = test::TestRequest::get()
        .uri("/status/json?host=bad_host")
        .peer_addr(peer())
        .to_request();
    assert_eq!(test::call_service(&app, first).await.status(), StatusCode::BAD_REQUEST);

    let second = test::TestRequest::get()
        .uri("/status/json?host=bad_host")
        .peer_addr(peer())
        .to_request();
    assert_eq!(test::call_service(&app, second).await.status(), StatusCode::TOO_MANY_REQUESTS);

    let other_client = test::TestRequest::get()
        .uri("/status/json?host=bad_host")
        .peer_addr("10.0.0.8:40000".parse().unwrap())
        .to_request();
    assert_eq!(test::call_service(&app, other_client).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unreachable_server_is_bad_gateway() {
    let addr = closed_port_addr().await;
    let app = app!(limiter(10));
    let req = test::TestRequest::get()
        .uri(&format!("/status?name=Lobby&host={}", addr))
        .peer_addr(peer())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn card_is_served_as_png_and_base64() {
    let (addr, _server) = spawn_mc_server(Behavior::Reply(status_json(&["Steve", "Alex"], 2, None))).await;
    let app = app!(limiter(10));

    let req = test::TestRequest::get()
        .uri(&format!("/status?name=Lobby&host={}", addr))
        .peer_addr(peer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");
    let png = test::read_body(resp).await;
    let card = image::load_from_memory(&png).unwrap();
    assert_eq!((card.width(), card.height()), (700, 315));

    let req = test::TestRequest::get()
        .uri(&format!("/status?name=Lobby&host={}&format=base64", addr))
        .peer_addr(peer())
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let decoded = STANDARD.decode(body.as_ref()).unwrap();
    assert!(decoded.starts_with(b"\x89PNG"));
}

#[actix_web::test]
async fn json_status_has_sorted_players() {
    let (addr, _server) = spawn_mc_server(Behavior::Reply(status_json(&["Steve", "Alex"], 2, None))).await;
    let app = app!(limiter(10));

    let req = test::TestRequest::get()
        .uri(&format!("/status/json?host={}", addr))
        .peer_addr(peer())
        .to_request();
    let summary: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["players"], serde_json::json!(["Alex", "Steve"]));
    assert_eq!(summary["online_players"], 2);
    assert_eq!(summary["has_icon"], true);
}
