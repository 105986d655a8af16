// rest/routes/pages.rs — server-rendered HTML pages.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use std::sync::Arc;
use tracing::error;

use crate::render;
use crate::rest::html;
use crate::AppContext;

pub async fn index() -> Html<String> {
    Html(html::base_page())
}

/// Admin page. Loading the configuration synthesizes the default document
/// when the file is absent.
pub async fn admin(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Html<String>, (StatusCode, &'static str)> {
    match ctx.form_config.load().await {
        Ok(config) => Ok(Html(html::admin_page(&config))),
        Err(e) => {
            error!(err = %e, "failed to load configuration for admin page");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))
        }
    }
}

pub async fn show_form(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Html<String>, (StatusCode, &'static str)> {
    let Some(form) = ctx.form_store.get(&id).await else {
        return Err((StatusCode::NOT_FOUND, "Form not found"));
    };
    let widgets = render::render(&form);
    Ok(Html(html::form_page(&form, &widgets)))
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(html::base_page()))
}
