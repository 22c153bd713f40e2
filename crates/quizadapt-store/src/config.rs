//! Store configuration and factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizadapt_core::engine::EngineConfig;
use quizadapt_core::model::DifficultyLevel;
use quizadapt_core::traits::PerformanceStore;

use crate::json_file::JsonFileStore;
use crate::memory::InMemoryStore;

/// Which persistence backend to use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    Memory,
    Json {
        #[serde(default = "default_store_path")]
        path: PathBuf,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Memory
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./quizadapt-data/performance.json")
}

/// Top-level quizadapt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizadaptConfig {
    /// Persistence backend.
    #[serde(default)]
    pub store: StoreConfig,
    /// Level assumed for users with no stored difficulty.
    #[serde(default = "default_difficulty")]
    pub default_difficulty: DifficultyLevel,
    /// Deadline for each persistence call in milliseconds. 0 disables it.
    #[serde(default = "default_persistence_timeout")]
    pub persistence_timeout_ms: u64,
}

fn default_difficulty() -> DifficultyLevel {
    DifficultyLevel::Beginner
}
fn default_persistence_timeout() -> u64 {
    5000
}

impl Default for QuizadaptConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            default_difficulty: default_difficulty(),
            persistence_timeout_ms: default_persistence_timeout(),
        }
    }
}

impl QuizadaptConfig {
    /// Engine settings derived from this config.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            default_difficulty: self.default_difficulty,
            persistence_timeout: match self.persistence_timeout_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_store_config(config: &StoreConfig) -> StoreConfig {
    match config {
        StoreConfig::Memory => StoreConfig::Memory,
        StoreConfig::Json { path } => StoreConfig::Json {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizadapt.toml` in the current directory
/// 2. `~/.config/quizadapt/config.toml`
///
/// `QUIZADAPT_STORE_PATH` overrides the store location (and selects the JSON
/// backend).
pub fn load_config() -> Result<QuizadaptConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizadaptConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizadapt.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            parse_config(
                &std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config: {}", path.display()))?,
            )
            .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizadaptConfig::default(),
    };

    if let Ok(path) = std::env::var("QUIZADAPT_STORE_PATH") {
        config.store = StoreConfig::Json {
            path: PathBuf::from(path),
        };
    }

    config.store = resolve_store_config(&config.store);
    Ok(config)
}

fn parse_config(content: &str) -> Result<QuizadaptConfig> {
    Ok(toml::from_str::<QuizadaptConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizadapt"))
}

/// Create a store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn PerformanceStore>> {
    match config {
        StoreConfig::Memory => Ok(Arc::new(InMemoryStore::new())),
        StoreConfig::Json { path } => {
            let store = JsonFileStore::open(path)
                .with_context(|| format!("failed to open store: {}", path.display()))?;
            Ok(Arc::new(store))
        }
    }
}
