use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "mlregistry.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Research YAML to ingest (default: "data/research.yaml")
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Directory the registry outputs are written to (default: "data")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Identifier store (default: "data/mlr_registry.json")
    #[serde(default = "default_id_store")]
    pub id_store: PathBuf,

    /// Optional README section that receives a copy of the Markdown report
    #[serde(default)]
    pub readme_section: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output_dir: default_output_dir(),
            id_store: default_id_store(),
            readme_section: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// File name of the YAML registry inside `output_dir`
    #[serde(default = "default_registry_file")]
    pub registry_file: String,

    /// File name of the Markdown report inside `output_dir`
    #[serde(default = "default_markdown_file")]
    pub markdown_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            registry_file: default_registry_file(),
            markdown_file: default_markdown_file(),
        }
    }
}

fn default_input() -> PathBuf {
    PathBuf::from("data/research.yaml")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_id_store() -> PathBuf {
    PathBuf::from("data/mlr_registry.json")
}

fn default_registry_file() -> String {
    "registry.yaml".to_string()
}

fn default_markdown_file() -> String {
    "REGISTRY.md".to_string()
}

impl Config {
    /// Load config from the working directory or user config directory
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        // An explicit path must load
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path)
                .with_context(|| format!("Failed to load config from {}", config_path));
        }

        if let Ok(config) = Self::load_from_path(CONFIG_FILE_NAME) {
            debug!("Loaded config from ./{}", CONFIG_FILE_NAME);
            return Ok(config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("mlregistry").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn registry_path(&self) -> PathBuf {
        self.paths.output_dir.join(&self.export.registry_file)
    }

    pub fn markdown_path(&self) -> PathBuf {
        self.paths.output_dir.join(&self.export.markdown_file)
    }
}
