//! Form domain model — question specs, form instances, webhook payloads.
//!
//! Wire names (`monday_column`, `question_destination_column`,
//! `dropdown_options`) match the JSON documents the admin page writes, so
//! existing configuration files keep loading.

pub mod config;
pub mod intake;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ─── Sentinel display values ──────────────────────────────────────────────────

/// Baked into a `monday_column` question when the board query errors out.
pub const VALUE_ERROR_LOADING: &str = "Erro ao carregar dados";
/// Baked in when the source item or column does not exist.
pub const VALUE_NOT_FOUND: &str = "Dados não encontrados";
/// Baked in when the column exists but holds no text.
pub const VALUE_UNAVAILABLE: &str = "Dados não disponíveis";
/// Baked in when the form type has no source board or column configured.
pub const VALUE_INCOMPLETE_CONFIG: &str = "Configuração incompleta";

const SENTINEL_VALUES: [&str; 4] = [
    VALUE_ERROR_LOADING,
    VALUE_NOT_FOUND,
    VALUE_UNAVAILABLE,
    VALUE_INCOMPLETE_CONFIG,
];

/// True when a `monday_column` display value must be treated as absent:
/// empty after trimming, or one of the sentinel error strings.
pub fn is_sentinel_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || SENTINEL_VALUES.contains(&trimmed)
}

// ─── Questions ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QuestionKind {
    #[serde(rename = "longtext")]
    LongText,
    #[serde(rename = "dropdown")]
    Dropdown,
    #[serde(rename = "yesno")]
    YesNo,
    #[serde(rename = "rating")]
    Rating,
    /// Read-only display value sourced from a board column at intake time,
    /// presented as a 1-10 rating question.
    #[serde(rename = "monday_column")]
    MondayColumn,
    /// Visual section break; carries no answerable id.
    #[serde(rename = "divider")]
    Divider,
    /// Free-text single-line input. Unknown kinds fall back here.
    /// `#[serde(other)]` requires this to be the last variant.
    #[default]
    #[serde(rename = "text", other)]
    Text,
}

/// One question definition inside a form type's ordered question list.
///
/// Most fields only apply to some kinds; absent fields serialize away so the
/// persisted documents stay close to what the admin page produces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionSpec {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// `dropdown` only: option list as a ";"-separated string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropdown_options: Option<String>,
    /// Destination board column receiving the submitted answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_column: Option<String>,
    /// `monday_column` only: secondary destination column receiving the
    /// display value itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_destination_column: Option<String>,
    /// `monday_column` only: source board column the display value is read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_column: Option<String>,
    /// `monday_column` only: display value resolved at intake time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_value: Option<String>,
}

// ─── Form instances ───────────────────────────────────────────────────────────

/// Everything needed to persist a new form instance. The store stamps the
/// id, creation timestamp, and initial status.
#[derive(Debug, Clone, Default)]
pub struct NewForm {
    pub form_type: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub item_name: Option<String>,
    pub header_data: BTreeMap<String, String>,
    pub questions: Vec<QuestionSpec>,
    pub webhook_data: Value,
}

/// A persisted form instance. Immutable after creation except `status`;
/// deleted only by an explicit admin action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormInstance {
    pub id: String,
    #[serde(rename = "type")]
    pub form_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(default)]
    pub header_data: BTreeMap<String, String>,
    #[serde(default)]
    pub questions: Vec<QuestionSpec>,
    /// Original triggering payload, kept verbatim.
    #[serde(default)]
    pub webhook_data: Value,
}

/// Listing shape returned by `GET /api/forms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub form_type: String,
    pub created_at: DateTime<Utc>,
    pub item_name: String,
    pub webhook_data: Value,
}

impl FormInstance {
    pub fn summary(&self) -> FormSummary {
        FormSummary {
            id: self.id.clone(),
            title: self
                .title
                .clone()
                .unwrap_or_else(|| "Formulário sem título".to_string()),
            form_type: self.form_type.clone(),
            created_at: self.created_at,
            item_name: self.item_name.clone().unwrap_or_default(),
            webhook_data: self.webhook_data.clone(),
        }
    }

    /// Required questions that have no non-empty answer. Checked for
    /// observability only — a submission is never rejected over these.
    pub fn missing_required<'a>(
        &'a self,
        answers: &BTreeMap<String, String>,
    ) -> Vec<&'a QuestionSpec> {
        self.questions
            .iter()
            .filter(|q| q.kind != QuestionKind::Divider && q.required)
            .filter(|q| {
                answers
                    .get(&q.id)
                    .map(|v| v.trim().is_empty())
                    .unwrap_or(true)
            })
            .collect()
    }
}

// ─── Webhook payloads ─────────────────────────────────────────────────────────

/// The item id of the originating board event, as a string.
///
/// Monday.com sends `pulseId` as a number; configs written by hand sometimes
/// carry it as a string. Both forms are accepted.
pub fn webhook_pulse_id(webhook_data: &Value) -> Option<String> {
    let id = webhook_data.get("event")?.get("pulseId")?;
    match id {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// The item name of the originating board event, if present and non-empty.
pub fn webhook_pulse_name(webhook_data: &Value) -> Option<String> {
    webhook_data
        .get("event")?
        .get("pulseName")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
