//! Dashboard — Axum web server exposing the sportsbook as JSON.
//!
//! The front-end renders match and slip snapshots from here and posts user
//! actions back. CORS enabled for local development.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use routes::AppState;

/// Bind the dashboard port and serve in a background task.
pub async fn spawn_dashboard(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard port {port}"))?;

    info!(port, "Dashboard server starting on http://localhost:{port}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Dashboard server error");
        }
    });

    Ok(())
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("*"))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/matches", get(routes::get_matches))
        .route("/api/slip", get(routes::get_slip).delete(routes::clear_slip))
        .route("/api/slip/selections", post(routes::post_selection))
        .route("/api/slip/raw", post(routes::post_raw_selection))
        .route("/api/slip/place", post(routes::post_place_all))
        .route("/api/slip/:index", axum::routing::delete(routes::delete_selection))
        .route("/api/slip/:index/stake", put(routes::put_stake))
        .route(
            "/api/slip/:index/cash-out",
            get(routes::get_cash_out).post(routes::post_cash_out),
        )
        .route("/api/settlements", get(routes::get_settlements))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
