// src/client/status.rs
use crate::client::resolver::{resolve, Endpoint};
use crate::error::QueryError;
use crate::protocol::codec::{
    decode_status_response, handshake_packet, read_frame, status_request_packet, CodecError,
};
use crate::protocol::StatusReply;
use log::debug;
use std::io::ErrorKind;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Parsed status reply plus the measured round trip.
#[derive(Debug, Clone)]
pub struct RawStatus {
    pub reply: StatusReply,
    pub latency_ms: u64,
}

/// Server List Ping client. Holds no connection between calls.
#[derive(Debug, Clone)]
pub struct StatusClient {
    timeout: Duration,
}

impl StatusClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn query(&self, host: &str) -> Result<RawStatus, QueryError> {
        query(host, self.timeout).await
    }
}

/// Resolves `host`, performs the handshake and reads one status reply.
///
/// Each of resolve, connect and the exchange gets its own `limit`.
pub async fn query(host: &str, limit: Duration) -> Result<RawStatus, QueryError> {
    let endpoint = match timeout(limit, resolve(host)).await {
        Ok(result) => result?,
        Err(_) => return Err(QueryError::timeout(host, "resolve")),
    };

    let mut stream = match timeout(limit, TcpStream::connect(endpoint.addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            debug!("Failed to connect to {} ({}): {}", host, endpoint.addr, e);
            return Err(QueryError::Unreachable { host: host.to_string(), source: e });
        }
        Err(_) => return Err(QueryError::timeout(host, "connect")),
    };
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Could not set TCP_NODELAY for {}: {}", host, e);
    }

    let (json, latency_ms) = match timeout(limit, exchange(&mut stream, &endpoint)).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => return Err(map_codec_error(host, e)),
        Err(_) => return Err(QueryError::timeout(host, "status exchange")),
    };

    let reply = StatusReply::parse(&json)
        .map_err(|e| QueryError::protocol(host, format!("malformed status JSON: {}", e)))?;

    debug!(
        "Status from {}: version '{}', {}/{} players, {}ms",
        host, reply.version.name, reply.players.online, reply.players.max, latency_ms
    );
    Ok(RawStatus { reply, latency_ms })
}

async fn exchange(stream: &mut TcpStream, endpoint: &Endpoint) -> Result<(String, u64), CodecError> {
    let handshake = handshake_packet(&endpoint.host, endpoint.port)?;
    stream.write_all(&handshake).await?;

    let started = Instant::now();
    stream.write_all(&status_request_packet()).await?;
    let frame = read_frame(stream).await?;
    // Truncated, not rounded.
    let latency_ms = started.elapsed().as_millis() as u64;

    let json = decode_status_response(&frame)?;
    Ok((json, latency_ms))
}

fn map_codec_error(host: &str, e: CodecError) -> QueryError {
    match e {
        CodecError::Io(io) => match io.kind() {
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::NotConnected => QueryError::Unreachable { host: host.to_string(), source: io },
            ErrorKind::UnexpectedEof => QueryError::protocol(host, "connection closed mid-reply"),
            _ => QueryError::protocol(host, io.to_string()),
        },
        other => QueryError::protocol(host, other.to_string()),
    }
}
