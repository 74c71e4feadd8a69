// src/client/resolver.rs
use crate::error::QueryError;
use crate::protocol::DEFAULT_PORT;
use hickory_resolver::TokioAsyncResolver;
use log::debug;
use std::net::{IpAddr, SocketAddr};
use tokio::net::lookup_host;

const SRV_PREFIX: &str = "_minecraft._tcp.";

/// A `hostname[:port]` string split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: Option<u16>,
}

/// Where the status query actually connects to.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Host name sent in the handshake (the SRV target when one was used).
    pub host: String,
    pub port: u16,
    pub addr: SocketAddr,
}

pub fn parse_address(input: &str) -> Result<ServerAddress, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty address".to_string());
    }

    match input.rsplit_once(':') {
        Some((host, port)) => {
            if host.is_empty() {
                return Err("missing host name".to_string());
            }
            let port = port
                .parse::<u16>()
                .map_err(|_| format!("invalid port '{}'", port))?;
            Ok(ServerAddress { host: host.to_string(), port: Some(port) })
        }
        None => Ok(ServerAddress { host: input.to_string(), port: None }),
    }
}

/// Resolves a user supplied address to a socket address.
///
/// An explicit port is used as-is. Without one, the `_minecraft._tcp` SRV
/// record is consulted first and the default port is the fallback.
pub async fn resolve(input: &str) -> Result<Endpoint, QueryError> {
    let address = parse_address(input).map_err(|reason| QueryError::resolution(input, reason))?;

    let (host, port) = match address.port {
        Some(port) => (address.host, port),
        None => match lookup_srv(&address.host).await {
            Some(target) => target,
            None => (address.host, DEFAULT_PORT),
        },
    };

    let addr = lookup_host((host.as_str(), port))
        .await
        .map_err(|e| QueryError::resolution(input, e.to_string()))?
        .next()
        .ok_or_else(|| QueryError::resolution(input, "no addresses found"))?;

    debug!("Resolved {} to {} (handshake host {}:{})", input, addr, host, port);
    Ok(Endpoint { host, port, addr })
}

async fn lookup_srv(hostname: &str) -> Option<(String, u16)> {
    if hostname.parse::<IpAddr>().is_ok() {
        return None;
    }

    let resolver = match TokioAsyncResolver::tokio_from_system_conf() {
        Ok(resolver) => resolver,
        Err(e) => {
            debug!("System resolver unavailable, skipping SRV lookup: {}", e);
            return None;
        }
    };

    let name = format!("{}{}", SRV_PREFIX, hostname);
    match resolver.srv_lookup(name.as_str()).await {
        Ok(lookup) => lookup.iter().next().map(|srv| {
            let target = srv.target().to_utf8();
            let target = target.trim_end_matches('.').to_string();
            debug!("SRV {} -> {}:{}", name, target, srv.port());
            (target, srv.port())
        }),
        Err(e) => {
            debug!("No SRV record for {}: {}", name, e);
            None
        }
    }
}
