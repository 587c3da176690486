use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use culturevault_core::search::SearchOptions;

/// Top-level configuration. Every section and every field is optional; a
/// missing config file yields the full defaults, so the CLI works against
/// the bundled catalog with no setup.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Path to a catalog JSON file (an array of place records). When unset,
    /// the catalog bundled into the binary is used.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_local_cap")]
    pub local_cap: usize,
    #[serde(default = "default_default_slice")]
    pub default_slice: usize,
    #[serde(default = "default_sparse_threshold")]
    pub sparse_threshold: usize,
    #[serde(default = "default_min_remote_len")]
    pub min_remote_len: usize,
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            local_cap: default_local_cap(),
            default_slice: default_default_slice(),
            sparse_threshold: default_sparse_threshold(),
            min_remote_len: default_min_remote_len(),
            history_cap: default_history_cap(),
        }
    }
}

impl SearchConfig {
    pub fn to_options(&self) -> SearchOptions {
        SearchOptions {
            debounce: Duration::from_millis(self.debounce_ms),
            local_cap: self.local_cap,
            default_slice: self.default_slice,
            sparse_threshold: self.sparse_threshold,
            min_remote_len: self.min_remote_len,
            history_cap: self.history_cap,
        }
    }
}

fn default_debounce_ms() -> u64 {
    800
}
fn default_local_cap() -> usize {
    20
}
fn default_default_slice() -> usize {
    24
}
fn default_sparse_threshold() -> usize {
    5
}
fn default_min_remote_len() -> usize {
    3
}
fn default_history_cap() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// "lovable" for the hosted AI gateway, "disabled" to run local-only.
    #[serde(default = "default_gateway_provider")]
    pub provider: String,
    #[serde(default = "default_gateway_base_url")]
    pub base_url: String,
    #[serde(default = "default_gateway_model")]
    pub model: String,
    /// Environment variable that carries the API key. The key itself never
    /// lives in the config file.
    #[serde(default = "default_gateway_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_gateway_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            provider: default_gateway_provider(),
            base_url: default_gateway_base_url(),
            model: default_gateway_model(),
            api_key_env: default_gateway_api_key_env(),
            timeout_secs: default_gateway_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

fn default_gateway_provider() -> String {
    "lovable".to_string()
}
fn default_gateway_base_url() -> String {
    "https://ai.gateway.lovable.dev/v1/chat/completions".to_string()
}
fn default_gateway_model() -> String {
    "google/gemini-3-flash-preview".to_string()
}
fn default_gateway_api_key_env() -> String {
    "LOVABLE_API_KEY".to_string()
}
fn default_gateway_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory for the history file and the stash.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}
fn default_server_port() -> u16 {
    8787
}

/// Load configuration from `path`. A missing file is not an error; it means
/// run with defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate search tuning
    if config.search.debounce_ms == 0 {
        anyhow::bail!("search.debounce_ms must be > 0");
    }
    if config.search.local_cap == 0 {
        anyhow::bail!("search.local_cap must be > 0");
    }
    if config.search.min_remote_len == 0 {
        anyhow::bail!("search.min_remote_len must be > 0");
    }
    if config.search.history_cap == 0 {
        anyhow::bail!("search.history_cap must be > 0");
    }

    // Validate gateway
    match config.gateway.provider.as_str() {
        "lovable" | "disabled" => {}
        other => anyhow::bail!(
            "Unknown gateway provider: '{}'. Must be lovable or disabled.",
            other
        ),
    }
    if config.gateway.is_enabled() && config.gateway.base_url.trim().is_empty() {
        anyhow::bail!("gateway.base_url must not be empty");
    }
    if config.gateway.timeout_secs == 0 {
        anyhow::bail!("gateway.timeout_secs must be > 0");
    }

    // Validate server
    if config.server.port == 0 {
        anyhow::bail!("server.port must be > 0");
    }

    Ok(config)
}

/// Starter config written by `cv init`, with every default spelled out.
const CONFIG_TEMPLATE: &str = r#"# CultureVault configuration.
# Every field is optional; these are the defaults.

[catalog]
# Path to a catalog JSON file. Leave unset to use the bundled catalog.
# path = "./data/catalog.json"

[search]
debounce_ms = 800
local_cap = 20
default_slice = 24
sparse_threshold = 5
min_remote_len = 3
history_cap = 10

[gateway]
# "lovable" queries the hosted AI gateway; "disabled" runs local-only.
provider = "lovable"
base_url = "https://ai.gateway.lovable.dev/v1/chat/completions"
model = "google/gemini-3-flash-preview"
# The API key is read from this environment variable, never from this file.
api_key_env = "LOVABLE_API_KEY"
timeout_secs = 30

[storage]
data_dir = "./data"

[server]
host = "127.0.0.1"
port = 8787
"#;

/// Write the starter config and create the data directory.
pub fn run_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    let defaults = Config::default();
    std::fs::create_dir_all(&defaults.storage.data_dir)
        .with_context(|| format!("Failed to create {}", defaults.storage.data_dir.display()))?;
    println!("Wrote config to {}", path.display());
    println!("Created data directory {}", defaults.storage.data_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/culturevault.toml")).unwrap();
        assert_eq!(config.search.debounce_ms, 800);
        assert_eq!(config.search.history_cap, 10);
        assert_eq!(config.gateway.provider, "lovable");
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [search]
            debounce_ms = 50

            [gateway]
            provider = "disabled"
            "#,
        )
        .unwrap();
        assert_eq!(config.search.debounce_ms, 50);
        assert_eq!(config.search.local_cap, 20);
        assert!(!config.gateway.is_enabled());
        assert_eq!(config.server.port, 8787);
    }

    #[test]
    fn template_parses_and_matches_defaults() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.search.debounce_ms, 800);
        assert_eq!(config.gateway.model, "google/gemini-3-flash-preview");
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
        assert_eq!(config.server.port, 8787);
    }

    #[test]
    fn config_converts_to_search_options() {
        let options = SearchConfig::default().to_options();
        assert_eq!(options.debounce, Duration::from_millis(800));
        assert_eq!(options.default_slice, 24);
    }
}
