use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use canteen_catalog::{MenuItemSnapshot, Recommendation};
use canteen_engine::RecommendStrategy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::signal;

const DEFAULT_LIMIT: i64 = 5;

/// Shared across all request handlers. The strategy and menu snapshot are
/// read-only after startup, so no locking is needed.
pub struct AppState {
    pub strategy: Box<dyn RecommendStrategy>,
    pub menu: Vec<MenuItemSnapshot>,
    pub knowledge_items: usize,
}

#[derive(Deserialize)]
pub struct RecommendationParams {
    /// Comma-separated cart item names, e.g. `cart_items=Tea,Coffee`
    #[serde(default)]
    cart_items: String,
    limit: Option<i64>,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    code: String,
    message: String,
}

/// Split the comma-separated cart parameter, dropping empty segments.
fn parse_cart_items(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Negative or missing limits normalize rather than reject: the
/// recommendation surface must never block the shopping flow.
fn normalize_limit(limit: Option<i64>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).max(0) as usize
}

async fn recommendations_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecommendationParams>,
) -> Json<Vec<Recommendation>> {
    let cart = parse_cart_items(&params.cart_items);
    let limit = normalize_limit(params.limit);

    log::debug!("GET /recommendations: {} cart items, limit {limit}", cart.len());
    Json(state.strategy.recommend(&cart, &state.menu, limit))
}

async fn association_handler(
    State(state): State<Arc<AppState>>,
    Path(item): Path<String>,
) -> Response {
    match state.strategy.association_info(&item) {
        Some(info) => Json(info).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorEnvelope {
                code: "not_found".to_string(),
                message: format!("No association data for '{item}'"),
            }),
        )
            .into_response(),
    }
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "menu_items": state.menu.len(),
        "knowledge_items": state.knowledge_items,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/recommendations", get(recommendations_handler))
        .route("/associations/:item", get(association_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

pub async fn serve(bind: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let local_addr = listener.local_addr()?;
    log::info!("Serving recommendations on http://{local_addr}");
    log::info!("Try: curl 'http://{local_addr}/recommendations?cart_items=Tea&limit=5'");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
        log::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        log::info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
