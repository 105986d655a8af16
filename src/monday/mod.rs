//! Monday.com board client — thin GraphQL wrapper behind the `BoardClient`
//! trait so workers and tests can swap the transport.
//!
//! Every call is independently failable. There is deliberately no request
//! timeout, retry, or backoff: a hung remote call parks the calling worker
//! and nothing else.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BoardApiError {
    #[error("monday.com request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("monday.com returned errors: {0}")]
    Api(String),
    #[error("monday.com API token is not configured")]
    MissingToken,
}

/// Remote board operations the pipeline depends on.
#[async_trait]
pub trait BoardClient: Send + Sync {
    /// Create a new item on a board; returns the new item's id.
    async fn create_item(&self, board_id: &str, name: &str) -> Result<String, BoardApiError>;

    /// Set a single column of an item to a plain text value.
    async fn update_item_column(
        &self,
        board_id: &str,
        item_id: &str,
        column_id: &str,
        value: &str,
    ) -> Result<(), BoardApiError>;

    /// Display text of one column of one item. `Ok(None)` when the item or
    /// column does not exist.
    async fn column_text(
        &self,
        board_id: &str,
        item_id: &str,
        column_id: &str,
    ) -> Result<Option<String>, BoardApiError>;
}

// ─── GraphQL client ───────────────────────────────────────────────────────────

pub struct MondayClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl MondayClient {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            token,
        }
    }

    /// POST one GraphQL document and return its `data` field.
    /// A response carrying an `errors` array maps to `BoardApiError::Api`.
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, BoardApiError> {
        let token = self.token.as_deref().ok_or(BoardApiError::MissingToken)?;

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect();
            return Err(BoardApiError::Api(messages.join("; ")));
        }
        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl BoardClient for MondayClient {
    async fn create_item(&self, board_id: &str, name: &str) -> Result<String, BoardApiError> {
        let query = "mutation ($board: ID!, $name: String!) {\
                       create_item (board_id: $board, item_name: $name) { id } }";
        let data = self
            .execute(query, json!({ "board": board_id, "name": name }))
            .await?;

        match data.pointer("/create_item/id") {
            Some(Value::String(id)) => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(BoardApiError::Api(
                "create_item returned no item id".to_string(),
            )),
        }
    }

    async fn update_item_column(
        &self,
        board_id: &str,
        item_id: &str,
        column_id: &str,
        value: &str,
    ) -> Result<(), BoardApiError> {
        let query = "mutation ($board: ID!, $item: ID!, $column: String!, $value: String!) {\
                       change_simple_column_value\
                         (board_id: $board, item_id: $item, column_id: $column, value: $value)\
                         { id } }";
        let data = self
            .execute(
                query,
                json!({
                    "board": board_id,
                    "item": item_id,
                    "column": column_id,
                    "value": value,
                }),
            )
            .await?;

        debug!(%board_id, %item_id, %column_id, "column updated");
        if data.pointer("/change_simple_column_value/id").is_none() {
            return Err(BoardApiError::Api(
                "change_simple_column_value returned no item".to_string(),
            ));
        }
        Ok(())
    }

    async fn column_text(
        &self,
        board_id: &str,
        item_id: &str,
        column_id: &str,
    ) -> Result<Option<String>, BoardApiError> {
        // board_id is implicit in the item lookup; kept in the signature so
        // transports that need it (and mocks) see the full address.
        let _ = board_id;
        let query = "query ($item: [ID!], $column: [String!]) {\
                       items (ids: $item) { column_values (ids: $column) { text } } }";
        let data = self
            .execute(query, json!({ "item": [item_id], "column": [column_id] }))
            .await?;

        let text = data
            .pointer("/items/0/column_values/0/text")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(text)
    }
}
