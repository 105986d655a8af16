// rest/routes/webhook.rs — board webhook intake.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

use crate::forms::{intake, webhook_pulse_id};
use crate::AppContext;

/// Create a form instance from a board webhook.
///
/// Monday.com verifies webhook endpoints by POSTing a `challenge` document
/// that must be echoed back before any event is delivered.
pub async fn receive_webhook(
    State(ctx): State<Arc<AppContext>>,
    Path(form_type): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if let Some(challenge) = payload.get("challenge") {
        return Ok(Json(json!({ "challenge": challenge })));
    }

    let config = ctx.form_config.load().await.map_err(|e| {
        error!(err = %e, "failed to load configuration for webhook");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to load configuration" })),
        )
    })?;
    let Some(type_config) = config.get(&form_type) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Unknown form type" })),
        ));
    };

    let new_form = intake::build_form(&form_type, type_config, &payload, &*ctx.board).await;
    let form = ctx.form_store.create(new_form).await.map_err(|e| {
        error!(err = %e, form_type = %form_type, "failed to persist form instance");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to create form" })),
        )
    })?;

    let form_url = ctx.config.form_url(&form.id);
    info!(form_id = %form.id, %form_type, "form created from webhook");

    // Hand the form link back to the source item, detached from this
    // response.
    let board_a = type_config.board_a.trim();
    let link_column = type_config.link_column.trim();
    if !board_a.is_empty() && !link_column.is_empty() {
        if let Some(item_id) = webhook_pulse_id(&payload) {
            intake::spawn_link_writeback(
                ctx.board.clone(),
                board_a.to_string(),
                item_id,
                link_column.to_string(),
                form_url.clone(),
            );
        }
    }

    Ok(Json(json!({ "form_id": form.id, "form_url": form_url })))
}
