// rest/routes/config.rs — configuration document API.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::forms::config::FormConfig;
use crate::AppContext;

pub async fn get_config(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<FormConfig>, (StatusCode, Json<Value>)> {
    match ctx.form_config.read().await {
        Ok(Some(config)) => Ok(Json(config)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Configuration file not found" })),
        )),
        Err(e) => {
            error!(err = %e, "failed to read configuration");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to read configuration" })),
            ))
        }
    }
}

/// Whole-document replace — there is no partial patch.
pub async fn save_config(
    State(ctx): State<Arc<AppContext>>,
    Json(config): Json<FormConfig>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx.form_config.save(&config).await {
        Ok(()) => Ok(Json(
            json!({ "message": "Configuration saved successfully" }),
        )),
        Err(e) => {
            error!(err = %e, "failed to save configuration");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to save configuration" })),
            ))
        }
    }
}
