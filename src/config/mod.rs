use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MONDAY_API_URL: &str = "https://api.monday.com/v2";

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// HTTP server port (default: 5000).
    port: Option<u16>,
    /// Log level filter string, e.g. "debug", "info,formd=trace" (default: "info").
    log: Option<String>,
    /// Bind address for the HTTP server (default: "127.0.0.1"; use "0.0.0.0" for LAN access).
    bind_address: Option<String>,
    /// Base URL used when handing out form links (default: http://{bind}:{port}).
    public_base_url: Option<String>,
    /// Override the Monday.com GraphQL endpoint (default: https://api.monday.com/v2).
    monday_api_url: Option<String>,
    /// Monday.com API token. Omit to run without board synchronization.
    monday_api_token: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured for log aggregators).
    log_format: Option<String>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── ServerConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub log: String,
    /// Bind address for the HTTP server (FORMD_BIND env var, default: "127.0.0.1").
    pub bind_address: String,
    /// Base URL written into link columns and shown on the admin page.
    pub public_base_url: String,
    /// Monday.com GraphQL endpoint (FORMD_MONDAY_API_URL env var).
    pub monday_api_url: String,
    /// Monday.com API token (FORMD_MONDAY_API_TOKEN env var).
    /// None means every remote board call fails with a configuration error.
    pub monday_api_token: Option<String>,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
}

impl ServerConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let bind_address = bind_address
            .or(std::env::var("FORMD_BIND").ok().filter(|s| !s.is_empty()))
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let public_base_url = std::env::var("FORMD_PUBLIC_BASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.public_base_url)
            .unwrap_or_else(|| format!("http://{bind_address}:{port}"));

        let monday_api_url = std::env::var("FORMD_MONDAY_API_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.monday_api_url)
            .unwrap_or_else(|| DEFAULT_MONDAY_API_URL.to_string());

        let monday_api_token = std::env::var("FORMD_MONDAY_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or(toml.monday_api_token);

        let log_format = std::env::var("FORMD_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        Self {
            port,
            data_dir,
            log,
            bind_address,
            public_base_url,
            monday_api_url,
            monday_api_token,
            log_format,
        }
    }

    /// Path of the form-type configuration document.
    pub fn form_config_path(&self) -> PathBuf {
        self.data_dir.join("setup").join("config.json")
    }

    /// Directory holding one JSON file per generated form instance.
    pub fn forms_dir(&self) -> PathBuf {
        self.data_dir.join("forms")
    }

    /// Public URL of a form instance's submission page.
    pub fn form_url(&self, form_id: &str) -> String {
        format!("{}/form/{form_id}", self.public_base_url.trim_end_matches('/'))
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/formd
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("formd");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/formd or ~/.local/share/formd
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("formd");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("formd");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\formd
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("formd");
        }
    }
    // Fallback
    PathBuf::from(".formd")
}
