// src/aggregator.rs
use crate::client::StatusClient;
use crate::error::QueryError;
use crate::icon::IconSource;
use crate::models::ServerStatus;
use crate::roster::RosterOverride;
use log::{debug, error};
use std::time::Duration;

/// Turns a host string into a finished [`ServerStatus`].
///
/// Stateless between calls: every call queries the live server again.
#[derive(Debug, Clone)]
pub struct StatusAggregator {
    client: StatusClient,
    roster: RosterOverride,
    icons: IconSource,
    deadline: Option<Duration>,
}

impl StatusAggregator {
    pub fn new(client: StatusClient, roster: RosterOverride, icons: IconSource) -> Self {
        Self { client, roster, icons, deadline: None }
    }

    /// Bounds every [`query_status`](Self::query_status) and
    /// [`get_status`](Self::get_status) call by `deadline`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Query, roster override, icon, sort. All or nothing.
    pub async fn query_status(&self, host: &str) -> Result<ServerStatus, QueryError> {
        match self.deadline {
            Some(deadline) => self.get_status_within(host, deadline).await,
            None => self.assemble(host).await,
        }
    }

    async fn assemble(&self, host: &str) -> Result<ServerStatus, QueryError> {
        let raw = self.client.query(host).await?;

        let sample = raw.reply.sample_names();
        let players = self.roster.override_roster(host, sample).await;
        let icon_bytes = self.icons.resolve_icon(raw.reply.favicon.as_deref());

        let status = ServerStatus::new(
            players,
            raw.latency_ms,
            raw.reply.players.max,
            raw.reply.players.online,
            raw.reply.version.name,
            icon_bytes,
        );
        debug!(
            "Assembled status for {}: {} players listed, icon {} bytes",
            host,
            status.players().len(),
            status.icon_bytes().len()
        );
        Ok(status)
    }

    /// Same as [`query_status`](Self::query_status) under an overall deadline
    /// that covers the protocol query and the roster fetch together.
    pub async fn get_status_within(
        &self,
        host: &str,
        deadline: Duration,
    ) -> Result<ServerStatus, QueryError> {
        match tokio::time::timeout(deadline, self.assemble(host)).await {
            Ok(result) => result,
            Err(_) => Err(QueryError::timeout(host, "overall deadline")),
        }
    }

    /// Failure details are logged and collapsed to `None`.
    pub async fn get_status(&self, host: &str) -> Option<ServerStatus> {
        match self.query_status(host).await {
            Ok(status) => Some(status),
            Err(e) => {
                error!("Status query for {} failed at {} stage: {}", host, e.kind(), e);
                None
            }
        }
    }
}
