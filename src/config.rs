use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub export: ExportConfig,

    /// Classifications offered in the Collect tab.
    #[serde(default = "default_classifications")]
    pub classifications: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_endpoint")]
    pub endpoint: String,

    /// API key for the museum API. Can also be supplied via the
    /// HARVARD_API_KEY environment variable or the in-app key dialog.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Records to fetch per classification before stopping.
    #[serde(default = "default_target_records")]
    pub target_records: usize,

    /// Polite delay between page requests, in milliseconds.
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per page request before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_api_endpoint() -> String {
    "https://api.harvardartmuseums.org/object".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_target_records() -> usize {
    2500
}

fn default_rate_limit_ms() -> u64 {
    150
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_api_endpoint(),
            api_key: None,
            page_size: default_page_size(),
            target_records: default_target_records(),
            rate_limit_ms: default_rate_limit_ms(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl ApiConfig {
    /// Resolve the API key: environment variable wins over the config file.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var("HARVARD_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub output_dir: PathBuf,
}

fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_export_dir(),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("curio")
        .join("curio.db")
}

fn default_classifications() -> Vec<String> {
    vec![
        "Coins".to_string(),
        "Drawings".to_string(),
        "Prints".to_string(),
        "Fragments".to_string(),
        "Photographs".to_string(),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            api: ApiConfig::default(),
            export: ExportConfig::default(),
            classifications: default_classifications(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            // Create default config
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("curio")
    }

    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("CURIO_CONFIG") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }
}
