// src/utils.rs
use crate::error::QueryError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use std::fmt;
use std::net::IpAddr;

#[derive(Debug)]
pub enum RequestError {
    MissingPeerIP,
    InvalidHost(String),
    RateLimitExceeded,
    Query(QueryError),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPeerIP => write!(f, "Failed to extract client IP"),
            Self::InvalidHost(host) => write!(f, "Invalid server address: {:?}", host),
            Self::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            Self::Query(QueryError::Resolution { .. }) => write!(f, "Bad address"),
            Self::Query(e) => write!(f, "{}", e),
        }
    }
}

impl From<QueryError> for RequestError {
    fn from(e: QueryError) -> Self {
        Self::Query(e)
    }
}

impl ResponseError for RequestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingPeerIP | Self::InvalidHost(_) => StatusCode::BAD_REQUEST,
            Self::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::Query(e) => match e {
                QueryError::Resolution { .. } => StatusCode::BAD_REQUEST,
                QueryError::Unreachable { .. } | QueryError::Protocol { .. } => StatusCode::BAD_GATEWAY,
                QueryError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                QueryError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

pub fn extract_peer_ip(req: &HttpRequest) -> Result<IpAddr, RequestError> {
    req.peer_addr()
        .map(|addr| addr.ip())
        .ok_or(RequestError::MissingPeerIP)
}

/// Accepts `host`, `host:port`, and IP literals; nothing with spaces,
/// slashes or other punctuation.
pub fn is_valid_host(host: &str) -> bool {
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | ',' | ':'))
}
