use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::EstanteError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub matching: MatchingConfig,
    pub recommend: RecommendConfig,
    pub services: ServicesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// CSV file the catalog is loaded from at startup.
    pub path: PathBuf,
}

/// Per-path fuzzy-match cutoffs, in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub transcript_cutoff: f64,
    pub cover_cutoff: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    pub top_n: usize,
}

/// Language hints forwarded to the external capture services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    pub transcription_language: String,
    pub ocr_language: String,
}

impl AppConfig {
    /// Load config: the user file when present, otherwise the built-in
    /// defaults.
    pub fn load() -> Result<Self, EstanteError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            let user_str = std::fs::read_to_string(&user_path)
                .map_err(|e| EstanteError::Config(e.to_string()))?;
            toml::from_str(&user_str).map_err(|e| EstanteError::Config(e.to_string()))
        } else {
            toml::from_str(DEFAULT_CONFIG).map_err(|e| EstanteError::Config(e.to_string()))
        }
    }

    /// Path to the user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "estante")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
