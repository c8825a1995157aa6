use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::consts::APP_NAME;
use crate::knowledge::KnowledgeEntry;
use crate::model::{DEFAULT_ENDPOINT, GenerationParams};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigSortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

/// `[model]` table: where and how the fallback generator is called
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct ModelConfig {
    pub(crate) endpoint: String,
    pub(crate) api_token: Option<String>,
    pub(crate) max_length: u32,
    pub(crate) pad_token_id: u32,
    pub(crate) timeout_secs: u64,
    pub(crate) retries: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_token: None,
            max_length: params.max_length,
            pad_token_id: params.pad_token_id,
            timeout_secs: 60,
            retries: 2,
        }
    }
}

impl ModelConfig {
    pub(crate) fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            max_length: self.max_length,
            pad_token_id: self.pad_token_id,
            ..GenerationParams::default()
        }
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) offline: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) session_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) order: Option<ConfigSortOrder>,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) model: ModelConfig,
    /// Extra knowledge entries, appended after the built-in ones
    #[serde(default)]
    pub(crate) knowledge: Vec<KnowledgeEntry>,
}

impl Config {
    pub(crate) fn load() -> Self {
        Self::load_internal(false)
    }

    pub(crate) fn load_quiet() -> Self {
        Self::load_internal(true)
    }

    fn load_internal(quiet: bool) -> Self {
        // Try config locations in order of priority
        let config_paths = Self::get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        if !quiet {
                            eprintln!("Loaded config from {}", path.display());
                        }
                        return config;
                    }
                    Err(e) => {
                        if !quiet {
                            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                        }
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/rulebot/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join(APP_NAME).join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join(APP_NAME).join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.rulebot.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(format!(".{APP_NAME}.toml")));
        }

        paths
    }
}
