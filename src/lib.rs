// src/lib.rs
pub mod aggregator;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod icon;
pub mod models;
pub mod protocol;
pub mod render;
pub mod roster;
pub mod service;
pub mod utils;

pub use aggregator::StatusAggregator;
pub use config::Config;
pub use error::{QueryError, RenderError};
pub use models::ServerStatus;
pub use service::CardService;
