//! The `quizadapt submit` command.

use std::path::PathBuf;

use anyhow::Result;

use quizadapt_core::model::AnswerSubmission;

use super::{build_engine, print_json, yes_no, OutputFormat};

pub async fn execute(
    config_path: Option<PathBuf>,
    user: String,
    user_answer: String,
    correct_answer: String,
    time_taken: f64,
    confidence: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let engine = build_engine(config_path.as_deref())?;
    let submission = AnswerSubmission {
        user_answer,
        correct_answer,
        time_taken,
        confidence,
    };
    let outcome = engine.submit(&user, &submission).await?;

    match format {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Text => {
            println!("Correct:    {}", yes_no(outcome.is_correct));
            println!("Score:      {}", outcome.score);
            println!("Feedback:   {}", outcome.feedback);
            println!(
                "Difficulty: {} -> {}",
                outcome.previous_difficulty, outcome.new_difficulty
            );
        }
    }
    Ok(())
}
