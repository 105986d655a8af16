pub mod config;
pub mod forms;
pub mod monday;
pub mod render;
pub mod rest;
pub mod sync;

use std::sync::Arc;

use config::ServerConfig;
use forms::config::FormConfigStore;
use forms::store::FormStore;
use monday::BoardClient;

/// Shared application state passed to every HTTP handler and background task.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    /// Form-type configuration document store — read fresh per operation.
    pub form_config: Arc<FormConfigStore>,
    /// One JSON record per generated form instance.
    pub form_store: Arc<FormStore>,
    /// Remote board API. Swapped for a recording stub in tests.
    pub board: Arc<dyn BoardClient>,
    pub started_at: std::time::Instant,
}

impl AppContext {
    /// Wire up stores and the board client from a server configuration.
    pub fn new(config: ServerConfig, board: Arc<dyn BoardClient>) -> Self {
        let form_config = Arc::new(FormConfigStore::new(config.form_config_path()));
        let form_store = Arc::new(FormStore::new(config.forms_dir()));
        Self {
            config: Arc::new(config),
            form_config,
            form_store,
            board,
            started_at: std::time::Instant::now(),
        }
    }
}
