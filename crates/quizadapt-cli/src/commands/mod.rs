pub mod analytics;
pub mod evaluate;
pub mod init;
pub mod questions;
pub mod replay;
pub mod submit;
pub mod teach_back;

use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;

use quizadapt_core::controller::DifficultyController;
use quizadapt_core::engine::AdaptiveEngine;
use quizadapt_store::config::load_config_from;
use quizadapt_store::create_store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Build an engine over the configured store.
pub fn build_engine(config_path: Option<&Path>) -> Result<AdaptiveEngine> {
    let config = load_config_from(config_path)?;
    let store = create_store(&config.store)?;
    tracing::debug!(store = store.name(), "store ready");
    let controller = DifficultyController::new()?;
    Ok(AdaptiveEngine::new(store, controller, config.engine_config()))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
