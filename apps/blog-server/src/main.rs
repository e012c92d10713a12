//! # Blogicum API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Blogicum API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::from_config(&config).await;

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .configure(handlers::configure_app(state.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
