//! Webhook intake — turns a board webhook payload into a persistable form
//! instance: snapshots the configured questions, resolves `monday_column`
//! display values and header fields from the source board, and (optionally)
//! writes the generated form link back into the originating item.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::config::FormTypeConfig;
use super::{
    webhook_pulse_id, webhook_pulse_name, NewForm, QuestionKind, VALUE_ERROR_LOADING,
    VALUE_INCOMPLETE_CONFIG, VALUE_NOT_FOUND, VALUE_UNAVAILABLE,
};
use crate::monday::BoardClient;

/// Header field that doubles as the destination item name. Falls back to the
/// webhook's item name when not resolvable from the source board.
pub const HEADER_TRIP: &str = "Viagem";

/// Build a new form instance from a webhook payload.
///
/// Board reads are best-effort: failures bake sentinel display values into
/// the snapshot instead of failing intake, so the form always gets created.
pub async fn build_form(
    form_type: &str,
    type_config: &FormTypeConfig,
    payload: &Value,
    board: &dyn BoardClient,
) -> NewForm {
    let board_a = type_config.board_a.trim();
    let pulse_id = webhook_pulse_id(payload);
    let pulse_name = webhook_pulse_name(payload);

    let header_data =
        resolve_header_data(type_config, board_a, pulse_id.as_deref(), &pulse_name, board).await;

    let mut questions = type_config.questions.clone();
    for question in &mut questions {
        if question.kind != QuestionKind::MondayColumn {
            continue;
        }
        question.column_value = Some(
            resolve_column_value(question.source_column.as_deref(), board_a, pulse_id.as_deref(), board)
                .await,
        );
    }

    NewForm {
        form_type: form_type.to_string(),
        title: Some(default_title(form_type)),
        subtitle: None,
        item_name: pulse_name,
        header_data,
        questions,
        webhook_data: payload.clone(),
    }
}

async fn resolve_header_data(
    type_config: &FormTypeConfig,
    board_a: &str,
    pulse_id: Option<&str>,
    pulse_name: &Option<String>,
    board: &dyn BoardClient,
) -> BTreeMap<String, String> {
    let mut header_data = BTreeMap::new();

    if let (false, Some(item_id)) = (board_a.is_empty(), pulse_id) {
        for (name, column_id) in &type_config.header_columns {
            if column_id.trim().is_empty() {
                continue;
            }
            match board.column_text(board_a, item_id, column_id).await {
                Ok(Some(text)) if !text.trim().is_empty() => {
                    header_data.insert(name.clone(), text);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(header = %name, %column_id, err = %e, "failed to resolve header field");
                }
            }
        }
    }

    // The trip name always has a value when the webhook carried one.
    if !header_data.contains_key(HEADER_TRIP) {
        if let Some(name) = pulse_name {
            header_data.insert(HEADER_TRIP.to_string(), name.clone());
        }
    }

    header_data
}

/// Display value for a `monday_column` question, with sentinel substitution
/// on every failure path.
async fn resolve_column_value(
    source_column: Option<&str>,
    board_a: &str,
    pulse_id: Option<&str>,
    board: &dyn BoardClient,
) -> String {
    let Some(column_id) = source_column.map(str::trim).filter(|c| !c.is_empty()) else {
        return VALUE_INCOMPLETE_CONFIG.to_string();
    };
    let (false, Some(item_id)) = (board_a.is_empty(), pulse_id) else {
        return VALUE_INCOMPLETE_CONFIG.to_string();
    };

    match board.column_text(board_a, item_id, column_id).await {
        Ok(Some(text)) if text.trim().is_empty() => VALUE_UNAVAILABLE.to_string(),
        Ok(Some(text)) => text,
        Ok(None) => VALUE_NOT_FOUND.to_string(),
        Err(e) => {
            warn!(%column_id, err = %e, "failed to load column value");
            VALUE_ERROR_LOADING.to_string()
        }
    }
}

fn default_title(form_type: &str) -> String {
    let label = match form_type {
        "guias" => "Guias",
        "clientes" => "Clientes",
        "fornecedores" => "Fornecedores",
        other => return format!("Formulário de {other}"),
    };
    format!("Formulário de {label}")
}

/// Write the generated form URL into the source item's link column,
/// detached from the webhook response. Failures are logged and dropped.
pub fn spawn_link_writeback(
    board: Arc<dyn BoardClient>,
    board_a: String,
    item_id: String,
    link_column: String,
    form_url: String,
) {
    tokio::spawn(async move {
        match board
            .update_item_column(&board_a, &item_id, &link_column, &form_url)
            .await
        {
            Ok(()) => info!(%item_id, %link_column, "form link written to source item"),
            Err(e) => error!(%item_id, %link_column, err = %e, "failed to write form link"),
        }
    });
}
