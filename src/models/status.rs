// src/models/status.rs
use serde::Serialize;

/// Normalized result of one status query.
///
/// Built once per query by the aggregator and never mutated afterwards. The
/// player list is kept in ordinal (byte-wise) order so that the rendered grid
/// is deterministic for a given roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatus {
    players: Vec<String>,
    latency_ms: u64,
    max_players: u32,
    online_players: u32,
    version_label: String,
    icon_bytes: Vec<u8>,
}

impl ServerStatus {
    pub fn new(
        mut players: Vec<String>,
        latency_ms: u64,
        max_players: u32,
        online_players: u32,
        version_label: String,
        icon_bytes: Vec<u8>,
    ) -> Self {
        players.sort();
        Self {
            players,
            latency_ms,
            max_players,
            online_players,
            version_label,
            icon_bytes,
        }
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn latency_ms(&self) -> u64 {
        self.latency_ms
    }

    pub fn max_players(&self) -> u32 {
        self.max_players
    }

    pub fn online_players(&self) -> u32 {
        self.online_players
    }

    pub fn version_label(&self) -> &str {
        &self.version_label
    }

    /// Decoded icon image bytes, empty when the server has no usable icon.
    pub fn icon_bytes(&self) -> &[u8] {
        &self.icon_bytes
    }

    pub fn summary(&self) -> StatusSummary<'_> {
        StatusSummary {
            players: &self.players,
            latency_ms: self.latency_ms,
            max_players: self.max_players,
            online_players: self.online_players,
            version_label: &self.version_label,
            has_icon: !self.icon_bytes.is_empty(),
        }
    }
}

/// JSON view of a [`ServerStatus`] without the raw icon payload.
#[derive(Debug, Serialize)]
pub struct StatusSummary<'a> {
    pub players: &'a [String],
    pub latency_ms: u64,
    pub max_players: u32,
    pub online_players: u32,
    pub version_label: &'a str,
    pub has_icon: bool,
}

/// One card to draw. Lives only for the duration of a render call.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub display_name: String,
    pub status: ServerStatus,
}
