// src/service.rs
use crate::aggregator::StatusAggregator;
use crate::client::StatusClient;
use crate::config::Config;
use crate::error::QueryError;
use crate::icon::IconSource;
use crate::models::{RenderRequest, ServerStatus};
use crate::render::font::FontSource;
use crate::render::Renderer;
use crate::roster::RosterOverride;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;

/// What an outside caller (chat bot, HTTP front) talks to: a `(name, host)`
/// pair in, a PNG card out.
#[derive(Debug, Clone)]
pub struct CardService {
    aggregator: StatusAggregator,
    renderer: Arc<Renderer>,
}

impl CardService {
    /// `deadline` bounds each status assembly, roster fetch included.
    pub fn new(aggregator: StatusAggregator, renderer: Renderer, deadline: Duration) -> Self {
        Self { aggregator: aggregator.with_deadline(deadline), renderer: Arc::new(renderer) }
    }

    pub fn from_config(config: &Config) -> Self {
        let aggregator = StatusAggregator::new(
            StatusClient::new(config.query_timeout()),
            RosterOverride::new(
                config.roster_override_host.clone(),
                config.roster_endpoint.clone(),
                config.roster_timeout(),
            ),
            IconSource::new(config.resource_dir.clone()),
        );
        let fonts = FontSource::standard(&config.resource_dir, config.font_path.clone());
        Self::new(aggregator, Renderer::new(config.theme(), fonts), config.request_deadline())
    }

    pub fn renderer(&self) -> Arc<Renderer> {
        Arc::clone(&self.renderer)
    }

    /// Live status under the service's overall deadline.
    pub async fn status(&self, host: &str) -> Result<ServerStatus, QueryError> {
        self.aggregator.query_status(host).await
    }

    /// Whether `host` answers a status query right now. Callers use this
    /// before accepting a new address.
    pub async fn probe(&self, host: &str) -> bool {
        self.aggregator.get_status(host).await.is_some()
    }

    /// Queries and renders, keeping the failure kind.
    pub async fn try_card(&self, display_name: &str, host: &str) -> Result<Vec<u8>, QueryError> {
        let status = self.status(host).await?;
        let request = RenderRequest { display_name: display_name.to_string(), status };
        let renderer = self.renderer();

        match tokio::task::spawn_blocking(move || renderer.render_request(&request)).await {
            Ok(Ok(png)) => {
                info!("Rendered card for {} ({} bytes)", host, png.len());
                Ok(png)
            }
            Ok(Err(e)) => Err(QueryError::internal(host, e.to_string())),
            Err(e) => Err(QueryError::internal(host, format!("render task failed: {}", e))),
        }
    }

    /// PNG card for `(display_name, host)`, or `None` when no card could be
    /// produced. `None` is never a placeholder image.
    pub async fn card(&self, display_name: &str, host: &str) -> Option<Vec<u8>> {
        match self.try_card(display_name, host).await {
            Ok(png) => Some(png),
            Err(e) => {
                error!("No card for '{}' at {} ({}): {}", display_name, host, e.kind(), e);
                None
            }
        }
    }
}
