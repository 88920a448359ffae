use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

static APP_CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Directory of the config file, used to resolve relative paths
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Sales export in CSV format
    pub csv_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Length of best/worst seller lists when the request does not say
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_n() -> usize {
    5
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[data]
csv_path = "data/pizza_sales.csv"

[server]
host = "0.0.0.0"
port = 3000

[dashboard]
top_n = 5
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Current working directory
/// 3. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    let mut candidates = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("config.toml"));
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join("config.toml"));
    }

    for config_path in candidates {
        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            return load_config_from(&config_path);
        }
        tracing::warn!("config.toml not found at: {}", config_path.display());
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Parse a config file; relative paths inside it resolve against its directory
pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&contents)?;
    config.base_dir = path.parent().map(Path::to_path_buf);
    Ok(config)
}

/// Make the loaded configuration visible to request handlers
pub fn install(config: Config) {
    if APP_CONFIG.set(config).is_err() {
        tracing::warn!("Configuration already installed, ignoring the new one");
    }
}

/// Best/worst seller list length used when a request omits `top_n`
pub fn configured_top_n() -> usize {
    APP_CONFIG
        .get()
        .map(|c| c.dashboard.top_n)
        .unwrap_or_else(default_top_n)
}

/// Get the CSV file path from configuration
pub fn get_csv_path(config: &Config) -> PathBuf {
    let csv_path = Path::new(&config.data.csv_path);

    if csv_path.is_absolute() {
        return csv_path.to_path_buf();
    }

    match &config.base_dir {
        Some(dir) => dir.join(csv_path),
        None => csv_path.to_path_buf(),
    }
}
