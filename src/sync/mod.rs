//! Board sync worker — forwards one submission into the destination board.
//!
//! One detached task per submission, never joined and never observed by the
//! HTTP caller: the success response has already gone out when the first
//! remote call is attempted. Each run reloads the configuration fresh and
//! owns its form snapshot, so concurrent runs share no mutable state.
//!
//! Best-effort throughout: no retry, no rollback, no timeout. A failed
//! column update is logged and counted; the rest of the batch still runs.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::forms::config::FormConfigStore;
use crate::forms::{
    is_sentinel_value, webhook_pulse_id, webhook_pulse_name, FormInstance, QuestionKind,
};
use crate::monday::BoardClient;

/// Fixed destination columns for the header fields.
const HEADER_COLUMNS: [(&str, &str); 3] = [
    ("Destino", "text_mkrb17ct"),
    ("Data", "text_mksq2j87"),
    ("Cliente", "text_mkrjdnry"),
];

/// Item name used when neither the header nor the webhook carries one.
pub const FALLBACK_ITEM_NAME: &str = "Resposta do Formulário";

/// One pending column update. Built in memory, issued sequentially, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnUpdate {
    pub column_id: String,
    pub value: String,
    /// Log-only context for the operator.
    pub description: String,
}

/// Submitted answers keyed by question id. Unknown ids are ignored.
pub type Answers = BTreeMap<String, String>;

/// Schedule a sync run for one submission. Fire-and-forget: scheduling
/// failures are indistinguishable from success for the caller.
pub fn spawn(
    config_store: Arc<FormConfigStore>,
    board: Arc<dyn BoardClient>,
    form: FormInstance,
    answers: Answers,
) {
    tokio::spawn(async move {
        run(&*config_store, &*board, &form, &answers).await;
    });
}

/// One full sync pass. Every early exit is terminal and logged; none of
/// them is an error for the submission that triggered the run.
pub async fn run(
    config_store: &FormConfigStore,
    board: &dyn BoardClient,
    form: &FormInstance,
    answers: &Answers,
) {
    // 1. Reload configuration fresh — never cached across submissions.
    let config = match config_store.load().await {
        Ok(c) => c,
        Err(e) => {
            error!(form_id = %form.id, err = %e, "sync aborted: failed to load configuration");
            return;
        }
    };
    let Some(type_config) = config.get(&form.form_type) else {
        warn!(form_id = %form.id, form_type = %form.form_type, "sync skipped: unknown form type");
        return;
    };
    let board_b = type_config.board_b.trim();
    if board_b.is_empty() {
        warn!(form_id = %form.id, form_type = %form.form_type, "sync skipped: no destination board configured");
        return;
    }

    // 2. The originating item id comes from the stored webhook payload.
    let Some(source_item) = webhook_pulse_id(&form.webhook_data) else {
        error!(form_id = %form.id, "sync aborted: webhook payload carries no item id");
        return;
    };

    // 3. Exactly one new item per submission.
    let item_name = resolve_item_name(form);
    let item_id = match board.create_item(board_b, &item_name).await {
        Ok(id) => id,
        Err(e) => {
            error!(form_id = %form.id, %board_b, err = %e, "sync aborted: failed to create destination item");
            return;
        }
    };
    info!(form_id = %form.id, %board_b, %item_id, %source_item, %item_name, "created destination item");

    // 4-5. Issue the batch sequentially; failures never abort the rest.
    let updates = build_updates(form, answers);
    let mut succeeded = 0usize;
    let mut failed = 0usize;
    for update in &updates {
        match board
            .update_item_column(board_b, &item_id, &update.column_id, &update.value)
            .await
        {
            Ok(()) => succeeded += 1,
            Err(e) => {
                failed += 1;
                error!(
                    form_id = %form.id,
                    column_id = %update.column_id,
                    context = %update.description,
                    err = %e,
                    "column update failed"
                );
            }
        }
    }

    info!(
        form_id = %form.id,
        %item_id,
        total = updates.len(),
        succeeded,
        failed,
        "sync completed"
    );
}

/// Destination item name: header trip field, else the webhook's item name,
/// else a fixed fallback.
pub fn resolve_item_name(form: &FormInstance) -> String {
    form.header_data
        .get(crate::forms::intake::HEADER_TRIP)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| webhook_pulse_name(&form.webhook_data))
        .unwrap_or_else(|| FALLBACK_ITEM_NAME.to_string())
}

/// Build the full update batch for one submission, in issue order:
/// header fields first, then one entry per answered, mapped question, then
/// the `monday_column` display-value pass-throughs.
pub fn build_updates(form: &FormInstance, answers: &Answers) -> Vec<ColumnUpdate> {
    let mut updates = Vec::new();

    for (field, column_id) in HEADER_COLUMNS {
        if let Some(value) = form.header_data.get(field).filter(|v| !v.trim().is_empty()) {
            updates.push(ColumnUpdate {
                column_id: column_id.to_string(),
                value: value.clone(),
                description: format!("header field {field}"),
            });
        }
    }

    for question in &form.questions {
        // Dividers carry no answerable id.
        if question.kind == QuestionKind::Divider {
            continue;
        }

        if let Some(raw) = answers.get(&question.id) {
            let trimmed = raw.trim();
            let destination = question
                .destination_column
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty());
            if let (false, Some(column_id)) = (trimmed.is_empty(), destination) {
                // Canonical yes/no answers land in the board's display language.
                let value = match trimmed {
                    "yes" => "Sim".to_string(),
                    "no" => "Não".to_string(),
                    _ => raw.clone(),
                };
                updates.push(ColumnUpdate {
                    column_id: column_id.to_string(),
                    value,
                    description: format!("answer to question {}", question.id),
                });
            }
        }

        // A monday_column question also forwards its display value, answered
        // or not — as long as a usable value was baked in at intake.
        if question.kind == QuestionKind::MondayColumn {
            let secondary = question
                .question_destination_column
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty());
            if let (Some(column_id), Some(value)) = (secondary, question.column_value.as_deref()) {
                if !is_sentinel_value(value) {
                    updates.push(ColumnUpdate {
                        column_id: column_id.to_string(),
                        value: value.to_string(),
                        description: format!("display value of question {}", question.id),
                    });
                }
            }
        }
    }

    updates
}
