// src/handlers/mod.rs
pub mod index;
pub mod status;

use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::RateLimiter;
use std::net::IpAddr;

/// Per-client limiter shared by the card routes.
pub type IpRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;
