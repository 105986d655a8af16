//! Form instance store — one JSON file per form under `{data_dir}/forms/`.

use chrono::Utc;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{FormInstance, FormSummary, NewForm};

#[derive(Debug, Error)]
pub enum FormStoreError {
    #[error("failed to write form {id}: {source}")]
    Write {
        id: String,
        #[source]
        source: std::io::Error,
    },
}

pub struct FormStore {
    dir: PathBuf,
}

impl FormStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the file path for an id. Rejects ids that would escape the
    /// forms directory; generated ids are UUIDs, anything else came from a
    /// request path.
    fn form_path(&self, id: &str) -> Option<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return None;
        }
        Some(self.dir.join(format!("{id}.json")))
    }

    /// Persist a new form instance, stamping id, creation time, and the
    /// initial "active" status. Write failures propagate so the webhook
    /// caller can react.
    pub async fn create(&self, new: NewForm) -> Result<FormInstance, FormStoreError> {
        let form = FormInstance {
            id: Uuid::new_v4().to_string(),
            form_type: new.form_type,
            title: new.title,
            subtitle: new.subtitle,
            created_at: Utc::now(),
            status: "active".to_string(),
            item_name: new.item_name,
            header_data: new.header_data,
            questions: new.questions,
            webhook_data: new.webhook_data,
        };

        let write_err = |source| FormStoreError::Write {
            id: form.id.clone(),
            source,
        };
        tokio::fs::create_dir_all(&self.dir).await.map_err(write_err)?;

        let path = self.dir.join(format!("{}.json", form.id));
        let contents = serde_json::to_string_pretty(&form).expect("form serializes");
        tokio::fs::write(&path, contents).await.map_err(write_err)?;

        info!(form_id = %form.id, form_type = %form.form_type, "generated and saved form");
        Ok(form)
    }

    /// Fetch a form by id. Absent and unreadable records both return `None`;
    /// read failures are logged, never surfaced.
    pub async fn get(&self, id: &str) -> Option<FormInstance> {
        let path = self.form_path(id)?;
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                error!(form_id = %id, err = %e, "failed to read form");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(form) => Some(form),
            Err(e) => {
                error!(form_id = %id, err = %e, "form record is not valid JSON");
                None
            }
        }
    }

    /// Summaries of all persisted forms, newest first. Unreadable records
    /// are skipped with a log line; they never fail the listing.
    pub async fn list(&self) -> Vec<FormSummary> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                error!(dir = %self.dir.display(), err = %e, "failed to list forms directory");
                return Vec::new();
            }
        };

        let mut forms = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name();
            let Some(id) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            match self.get(id).await {
                Some(form) => forms.push(form.summary()),
                None => warn!(form_id = %id, "skipping unreadable form record"),
            }
        }

        forms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        forms
    }

    /// Remove a form if present. Returns whether a record was removed;
    /// deleting an absent form is not an error.
    pub async fn delete(&self, id: &str) -> bool {
        let Some(path) = self.form_path(id) else {
            return false;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(form_id = %id, "deleted form");
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                error!(form_id = %id, err = %e, "failed to delete form");
                false
            }
        }
    }
}
