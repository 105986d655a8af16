// rest/routes/forms.rs — form instance listing and deletion.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::forms::FormSummary;
use crate::AppContext;

pub async fn list_forms(State(ctx): State<Arc<AppContext>>) -> Json<Vec<FormSummary>> {
    Json(ctx.form_store.list().await)
}

pub async fn delete_form(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if ctx.form_store.delete(&id).await {
        Ok(Json(json!({ "message": "Form deleted successfully" })))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Form not found" })),
        ))
    }
}
