// src/main.rs
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use mccard::handlers::{self, IpRateLimiter};
use mccard::{CardService, Config};
use governor::RateLimiter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger only once at the start
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    dotenv::dotenv().ok();

    // Load configuration
    let config = Config::from_env();
    let bind = config.bind();

    info!("Using resources from {}", config.resource_dir.display());
    if let (Some(host), Some(endpoint)) = (&config.roster_override_host, &config.roster_endpoint) {
        info!("Roster for {} comes from {}", host, endpoint);
    }

    let service = web::Data::new(CardService::from_config(&config));
    let status_rate_limiter: web::Data<IpRateLimiter> =
        web::Data::new(RateLimiter::keyed(config.status_quota()));

    info!("Starting server on {}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(status_rate_limiter.clone())
            .route("/", web::get().to(handlers::index::index))
            .route("/status", web::get().to(handlers::status::get_card))
            .route("/status/json", web::get().to(handlers::status::get_status_json))
    })
        .bind(&bind)?
        .run().await
}
