// rest/mod.rs — public HTTP surface.
//
// Axum server bound to the configured address (default 127.0.0.1:5000).
//
// Endpoints:
//   GET    /                      navigation page
//   GET    /health                daemon health JSON
//   GET    /admin                 editable configuration page
//   GET    /api/config            configuration document (404 if absent)
//   POST   /api/config            wholesale configuration replace
//   GET    /api/forms             form summaries, newest first
//   DELETE /api/forms/{id}        remove one form
//   GET    /form/{id}             submission page
//   POST   /submit_form/{id}      form-encoded answers
//   POST   /webhook/{form_type}   board webhook intake

pub mod html;
pub mod routes;

use anyhow::Result;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let router = build_router(ctx);

    info!("HTTP server listening on http://{}", bind);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(routes::pages::index))
        .route("/health", get(routes::health::health))
        .route("/admin", get(routes::pages::admin))
        .route(
            "/api/config",
            get(routes::config::get_config).post(routes::config::save_config),
        )
        .route("/api/forms", get(routes::forms::list_forms))
        .route("/api/forms/{id}", delete(routes::forms::delete_form))
        .route("/form/{id}", get(routes::pages::show_form))
        .route("/submit_form/{id}", post(routes::submit::submit_form))
        .route("/webhook/{form_type}", post(routes::webhook::receive_webhook))
        .fallback(routes::pages::not_found)
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
