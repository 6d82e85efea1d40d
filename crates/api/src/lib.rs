pub mod error;
pub mod extractors;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};
use state::AppState;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    // Pages
    let page_routes = Router::new()
        .route("/", get(routes::files::index))
        .route(
            "/files/",
            get(routes::files::list).post(routes::files::list_submitted),
        );

    // Downloads
    let download_routes = Router::new()
        .route("/download/", get(routes::download::download_file))
        .route(
            "/download_multiple/",
            post(routes::download::download_multiple),
        );

    // OAuth routes
    let oauth_routes = Router::new()
        .route("/start/", get(routes::oauth::start))
        .route("/callback/", get(routes::oauth::callback));

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(page_routes)
        .merge(download_routes)
        .nest("/oauth", oauth_routes)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
