// src/roster.rs
use crate::protocol::reply::clip_label;
use log::{debug, error, info};
use serde::Deserialize;
use std::time::Duration;

const BOT_PREFIX: &str = "bot_";

#[derive(Debug, Deserialize)]
struct RosterResponse {
    players: Vec<RosterEntry>,
}

#[derive(Debug, Deserialize)]
struct RosterEntry {
    name: String,
}

/// Replaces the protocol player sample for one known host with a roster
/// fetched from a separate HTTP source.
#[derive(Debug, Clone)]
pub struct RosterOverride {
    target: Option<OverrideTarget>,
    timeout: Duration,
}

#[derive(Debug, Clone)]
struct OverrideTarget {
    host: String,
    endpoint: String,
}

impl RosterOverride {
    /// The override is active only when both the host and the endpoint are set.
    pub fn new(host: Option<String>, endpoint: Option<String>, timeout: Duration) -> Self {
        let target = match (host, endpoint) {
            (Some(host), Some(endpoint)) => Some(OverrideTarget { host, endpoint }),
            _ => None,
        };
        Self { target, timeout }
    }

    pub fn disabled() -> Self {
        Self { target: None, timeout: Duration::from_secs(10) }
    }

    /// Returns the external roster for the override host and `fallback` for
    /// every other host.
    ///
    /// A failed fetch yields an empty roster, not `fallback`.
    pub async fn override_roster(&self, host: &str, fallback: Vec<String>) -> Vec<String> {
        let target = match &self.target {
            Some(target) if target.host == host => target,
            _ => return fallback,
        };

        info!("Fetching roster override for {} from {}", host, target.endpoint);
        match fetch_roster(&target.endpoint, self.timeout).await {
            Ok(names) => {
                debug!("Roster override for {} returned {} players", host, names.len());
                names
            }
            Err(e) => {
                error!("Roster override for {} failed, using empty roster: {}", host, e);
                Vec::new()
            }
        }
    }
}

async fn fetch_roster(
    endpoint: &str,
    timeout: Duration,
) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.get(endpoint).send().await?;

    if response.status() != reqwest::StatusCode::OK {
        return Err(format!("unexpected status {}", response.status()).into());
    }

    let roster = response.json::<RosterResponse>().await?;
    Ok(filter_bots(roster.players.into_iter().map(|entry| clip_label(entry.name))))
}

/// Drops names starting with `bot_`, keeping source order.
pub fn filter_bots(names: impl IntoIterator<Item = String>) -> Vec<String> {
    names.into_iter().filter(|name| !name.starts_with(BOT_PREFIX)).collect()
}
