//! Axum-based JSON adapter over a running driver

use crate::api::Category;
use crate::config::Config;
use crate::driver::MyPvDriver;
use crate::error::{MyPvError, Result};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub driver: Arc<MyPvDriver>,
    pub config: Arc<Config>,
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn sensors(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.driver.sensors())
}

async fn sensors_for(State(state): State<AppState>, Path(category): Path<String>) -> Response {
    match category.parse::<Category>() {
        Ok(category) => Json(state.driver.sensors_for(category)).into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": format!("unknown category '{}'", category)})),
        )
            .into_response(),
    }
}

async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "device": state.driver.device_info(),
        "pollers": state.driver.statuses(),
    }))
}

async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    let json = serde_json::to_value(state.config.redacted())
        .unwrap_or(serde_json::json!({"error":"serialization"}));
    Json(json)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/sensors", get(sensors))
        .route("/api/sensors/{category}", get(sensors_for))
        .route("/api/status", get(status))
        .route("/api/config", get(get_config))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let router = build_router(state);
    let logger = crate::logging::get_logger("web");
    logger.info(&format!(
        "Starting web server; requested host={}, port={}",
        host, port
    ));

    let addr = match host.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, port),
        Err(_) => {
            logger.warn(&format!("Invalid host '{}'; falling back to 127.0.0.1", host));
            ([127, 0, 0, 1], port).into()
        }
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| MyPvError::web(format!("Failed to bind {}: {}", addr, e)))?;
    let local_addr = listener.local_addr()?;
    logger.info(&format!(
        "Web server listening at http://{}:{} (API /api)",
        local_addr.ip(),
        local_addr.port()
    ));

    axum::serve(listener, router)
        .await
        .map_err(|e| MyPvError::web(e.to_string()))
}
