use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `model.tokenizer_path`
pub const TOKENIZER_PATH_ENV: &str = "TEXTSUM_TOKENIZER_PATH";
/// Environment variable overriding `model.model_path`
pub const MODEL_PATH_ENV: &str = "TEXTSUM_MODEL_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Locations of the two pretrained artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Tokenizer directory (holding tokenizer.json) or the tokenizer.json file itself
    #[serde(default = "default_tokenizer_path")]
    pub tokenizer_path: PathBuf,
    /// Model directory holding config.json and the converted weights
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            tokenizer_path: default_tokenizer_path(),
            model_path: default_model_path(),
        }
    }
}

impl ModelConfig {
    pub fn new(tokenizer_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            tokenizer_path: tokenizer_path.into(),
            model_path: model_path.into(),
        }
    }

    /// Tokenizer path with tilde expansion
    pub fn tokenizer_path(&self) -> PathBuf {
        expand_tilde(&self.tokenizer_path)
    }

    /// Model path with tilde expansion
    pub fn model_path(&self) -> PathBuf {
        expand_tilde(&self.model_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Inference device: "auto", "cpu", "cuda" or "cuda:<index>"
    #[serde(default = "default_device")]
    pub device: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
        }
    }
}

/// Parsed form of `runtime.device`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSelection {
    /// CUDA when available, otherwise CPU
    Auto,
    Cpu,
    Cuda(usize),
}

impl RuntimeConfig {
    pub fn device(&self) -> crate::Result<DeviceSelection> {
        let value = self.device.trim().to_ascii_lowercase();
        match value.as_str() {
            "" | "auto" => Ok(DeviceSelection::Auto),
            "cpu" => Ok(DeviceSelection::Cpu),
            "cuda" | "gpu" => Ok(DeviceSelection::Cuda(0)),
            other => other
                .strip_prefix("cuda:")
                .and_then(|index| index.parse().ok())
                .map(DeviceSelection::Cuda)
                .ok_or_else(|| crate::Error::Config(format!("Unknown device '{}'", self.device))),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_device() -> String {
    "auto".to_string()
}

fn default_artifact_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("textsum")
}

fn default_tokenizer_path() -> PathBuf {
    default_artifact_dir().join("tokenizer")
}

fn default_model_path() -> PathBuf {
    default_artifact_dir().join("model")
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when it is absent.
    /// Environment overrides are applied either way.
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.runtime.device()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(TOKENIZER_PATH_ENV).filter(|v| !v.is_empty()) {
            self.model.tokenizer_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(MODEL_PATH_ENV).filter(|v| !v.is_empty()) {
            self.model.model_path = PathBuf::from(path);
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/textsum/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("textsum")
            .join("config.toml")
    }
}
