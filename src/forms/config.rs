//! Form-type configuration store — `{data_dir}/setup/config.json`.
//!
//! One `FormTypeConfig` per form type, keyed by type name. The document is
//! read fresh on every operation and overwritten wholesale on save; there is
//! no caching and no cross-process locking (last writer wins).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use super::QuestionSpec;

/// Form types seeded into a fresh configuration document.
pub const DEFAULT_FORM_TYPES: [&str; 3] = ["guias", "clientes", "fornecedores"];

/// Board mapping and question set for one form type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormTypeConfig {
    /// Source board — webhooks originate here.
    #[serde(default)]
    pub board_a: String,
    /// Destination board — submissions are forwarded here.
    #[serde(default)]
    pub board_b: String,
    /// Column on the source board that receives the generated form link.
    #[serde(default)]
    pub link_column: String,
    /// Header field name → source board column id, resolved at intake time.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub header_columns: BTreeMap<String, String>,
    #[serde(default)]
    pub questions: Vec<QuestionSpec>,
}

/// The whole configuration document: form type name → config.
pub type FormConfig = BTreeMap<String, FormTypeConfig>;

#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A configuration document with the default form types, all empty.
pub fn default_config() -> FormConfig {
    DEFAULT_FORM_TYPES
        .iter()
        .map(|name| (name.to_string(), FormTypeConfig::default()))
        .collect()
}

pub struct FormConfigStore {
    path: PathBuf,
}

impl FormConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document without synthesizing a default.
    ///
    /// `Ok(None)` when the file does not exist; a file that exists but is
    /// not valid JSON surfaces as `Parse` (never retried).
    pub async fn read(&self) -> Result<Option<FormConfig>, ConfigStoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigStoreError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        let config = serde_json::from_str(&contents).map_err(|e| ConfigStoreError::Parse {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(config))
    }

    /// Read the document, synthesizing and persisting the default when absent.
    pub async fn load(&self) -> Result<FormConfig, ConfigStoreError> {
        if let Some(config) = self.read().await? {
            return Ok(config);
        }
        let config = default_config();
        self.save(&config).await?;
        info!(path = %self.path.display(), "created default form configuration");
        Ok(config)
    }

    /// Whole-document overwrite. Not atomic — a crash mid-write can leave a
    /// truncated file (known open risk).
    pub async fn save(&self, config: &FormConfig) -> Result<(), ConfigStoreError> {
        let write_err = |source| ConfigStoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        let contents = serde_json::to_string_pretty(config).expect("config serializes");
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(write_err)
    }
}
