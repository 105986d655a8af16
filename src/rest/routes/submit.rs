// rest/routes/submit.rs — form submission handling.
//
// The HTTP contract never waits on remote board results: the sync worker is
// scheduled fire-and-forget and the success page goes out immediately.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Form,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::rest::html;
use crate::sync::{self, Answers};
use crate::AppContext;

pub async fn submit_form(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Form(answers): Form<Answers>,
) -> Result<Html<String>, (StatusCode, &'static str)> {
    let Some(form) = ctx.form_store.get(&id).await else {
        return Err((StatusCode::NOT_FOUND, "Form not found"));
    };

    info!(
        form_id = %form.id,
        form_type = %form.form_type,
        answers = answers.len(),
        questions = form.questions.len(),
        "form submitted"
    );
    // Observability only — a submission is never rejected over missing
    // required answers.
    for question in form.missing_required(&answers) {
        warn!(form_id = %form.id, question_id = %question.id, "required question left unanswered");
    }

    sync::spawn(
        ctx.form_config.clone(),
        ctx.board.clone(),
        form,
        answers,
    );

    Ok(Html(html::success_page()))
}
