// src/protocol/reply.rs
use serde::{Deserialize, Deserializer};

/// Longest version label or player name kept from a reply, in chars.
pub const MAX_LABEL_CHARS: usize = 256;

/// JSON document carried by the status response packet.
///
/// Only the fields the card needs are modelled; anything else the server
/// sends (description, mod info, chat previews) is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusReply {
    pub version: VersionInfo,
    pub players: PlayersInfo,
    #[serde(default)]
    pub favicon: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    #[serde(deserialize_with = "clipped")]
    pub name: String,
    #[serde(default)]
    pub protocol: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayersInfo {
    pub max: u32,
    pub online: u32,
    #[serde(default)]
    pub sample: Option<Vec<PlayerSample>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSample {
    #[serde(deserialize_with = "clipped")]
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
}

/// Cuts `label` to at most [`MAX_LABEL_CHARS`] chars.
pub fn clip_label(mut label: String) -> String {
    if let Some((end, _)) = label.char_indices().nth(MAX_LABEL_CHARS) {
        label.truncate(end);
    }
    label
}

fn clipped<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(clip_label)
}

impl StatusReply {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Names from the player sample; an absent and an empty sample look the same.
    pub fn sample_names(&self) -> Vec<String> {
        self.players
            .sample
            .as_ref()
            .map(|sample| sample.iter().map(|p| p.name.clone()).collect())
            .unwrap_or_default()
    }
}
