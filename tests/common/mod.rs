//! Shared test fixtures — a recording board client standing in for the
//! Monday.com API.

use async_trait::async_trait;
use formd::monday::{BoardApiError, BoardClient};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateItem {
        board_id: String,
        name: String,
    },
    UpdateColumn {
        board_id: String,
        item_id: String,
        column_id: String,
        value: String,
    },
}

/// Records every call; `update_item_column` fails for column ids listed in
/// `fail_columns` (after recording, like a remote rejection would).
#[derive(Default)]
pub struct RecordingBoard {
    pub calls: Mutex<Vec<Call>>,
    pub fail_columns: Vec<String>,
    /// column id → display text served by `column_text`.
    pub column_texts: BTreeMap<String, String>,
}

impl RecordingBoard {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BoardClient for RecordingBoard {
    async fn create_item(&self, board_id: &str, name: &str) -> Result<String, BoardApiError> {
        self.calls.lock().unwrap().push(Call::CreateItem {
            board_id: board_id.to_string(),
            name: name.to_string(),
        });
        Ok("item-1".to_string())
    }

    async fn update_item_column(
        &self,
        board_id: &str,
        item_id: &str,
        column_id: &str,
        value: &str,
    ) -> Result<(), BoardApiError> {
        self.calls.lock().unwrap().push(Call::UpdateColumn {
            board_id: board_id.to_string(),
            item_id: item_id.to_string(),
            column_id: column_id.to_string(),
            value: value.to_string(),
        });
        if self.fail_columns.iter().any(|c| c == column_id) {
            return Err(BoardApiError::Api(format!("column {column_id} rejected")));
        }
        Ok(())
    }

    async fn column_text(
        &self,
        _board_id: &str,
        _item_id: &str,
        column_id: &str,
    ) -> Result<Option<String>, BoardApiError> {
        Ok(self.column_texts.get(column_id).cloned())
    }
}
