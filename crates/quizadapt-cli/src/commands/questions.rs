//! The `quizadapt questions` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{ContentArrangement, Table};

use quizadapt_core::model::DifficultyLevel;

use super::{build_engine, print_json, OutputFormat};

pub async fn execute(
    config_path: Option<PathBuf>,
    user: String,
    topic: u64,
    base: Option<DifficultyLevel>,
    count: usize,
    format: OutputFormat,
) -> Result<()> {
    let engine = build_engine(config_path.as_deref())?;
    let slots = engine.questions(&user, topic, base, count).await?;

    match format {
        OutputFormat::Json => print_json(&slots)?,
        OutputFormat::Text => {
            if slots.is_empty() {
                println!("No questions requested.");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Id", "Level", "Difficulty", "Points"]);
            for slot in &slots {
                table.add_row(vec![
                    slot.id.clone(),
                    slot.difficulty_level.level().to_string(),
                    slot.difficulty_text.clone(),
                    slot.points.to_string(),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}
