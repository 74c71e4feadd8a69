// src/handlers/status.rs
use crate::handlers::IpRateLimiter;
use crate::service::CardService;
use crate::utils::{extract_peer_ip, is_valid_host, RequestError};
use actix_web::{web, HttpRequest, HttpResponse};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, error, warn};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardFormat {
    #[default]
    Png,
    Base64,
}

#[derive(Deserialize)]
pub struct CardQuery {
    /// Shown as the card title; defaults to the host.
    name: Option<String>,
    host: String,
    #[serde(default)]
    format: CardFormat,
}

#[derive(Deserialize)]
pub struct HostQuery {
    host: String,
}

fn check_request(
    req: &HttpRequest,
    host: &str,
    rate_limiter: &IpRateLimiter,
) -> Result<(), RequestError> {
    let peer_ip = extract_peer_ip(req)?;

    if rate_limiter.check_key(&peer_ip).is_err() {
        error!("Rate limit exceeded for status card for ip: {}", peer_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    if !is_valid_host(host) {
        warn!("Rejected host {:?} from {}", host, peer_ip);
        return Err(RequestError::InvalidHost(host.to_string()));
    }
    Ok(())
}

pub async fn get_card(
    req: HttpRequest,
    query: web::Query<CardQuery>,
    service: web::Data<CardService>,
    rate_limiter: web::Data<IpRateLimiter>,
) -> Result<HttpResponse, RequestError> {
    let query = query.into_inner();
    check_request(&req, &query.host, &rate_limiter)?;

    let name = query
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| query.host.clone());
    debug!("Card requested for '{}' at {} as {:?}", name, query.host, query.format);

    let png = service.try_card(&name, &query.host).await.map_err(|e| {
        error!("Card for {} failed ({}): {}", query.host, e.kind(), e);
        RequestError::from(e)
    })?;

    Ok(match query.format {
        CardFormat::Png => HttpResponse::Ok().content_type("image/png").body(png),
        CardFormat::Base64 => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(STANDARD.encode(png)),
    })
}

pub async fn get_status_json(
    req: HttpRequest,
    query: web::Query<HostQuery>,
    service: web::Data<CardService>,
    rate_limiter: web::Data<IpRateLimiter>,
) -> Result<HttpResponse, RequestError> {
    check_request(&req, &query.host, &rate_limiter)?;

    let status = service.status(&query.host).await.map_err(|e| {
        error!("Status for {} failed ({}): {}", query.host, e.kind(), e);
        RequestError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(status.summary()))
}
