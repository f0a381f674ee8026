use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use fairway_backend::config::draft::DraftRules;
use fairway_backend::gateway::InMemoryGateway;
use fairway_backend::middleware::cors::cors_middleware;
use fairway_backend::routes;
use fairway_backend::state::app_state::AppState;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("FAIRWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("FAIRWAY_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ FAIRWAY_PORT must be a valid port number");
            std::process::exit(1);
        });

    println!("🚀 Starting Fairway Draft Backend on http://{}:{}", host, port);

    let defaults = DraftRules::from_env();

    // The in-process gateway backs local development; production deployments
    // swap in a client for the external data service behind the same trait.
    let gateway = Arc::new(InMemoryGateway::new());
    let app_state = AppState::new(gateway, defaults);

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
