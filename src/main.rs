use anyhow::Result;
use axum::{routing::get, Json, Router};
use dotenvy::dotenv;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use staffserver::api_router::configure_api_routes;
use staffserver::config::AppConfig;
use staffserver::shared::state::AppState;
use staffserver::shared::utils::create_conn;

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": "staffserver" }))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env()?;
    let conn = create_conn(&config.database_url())?;
    let state = Arc::new(AppState {
        config: config.clone(),
        conn,
    });

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(configure_api_routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
