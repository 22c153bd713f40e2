//! The `quizadapt evaluate` command.

use anyhow::Result;

use quizadapt_core::scoring::evaluate;

use super::{print_json, yes_no, OutputFormat};

pub fn execute(
    user_answer: &str,
    correct_answer: &str,
    time_taken: f64,
    confidence: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let evaluation = evaluate(user_answer, correct_answer, time_taken, confidence);

    match format {
        OutputFormat::Json => print_json(&evaluation)?,
        OutputFormat::Text => {
            println!("Correct:  {}", yes_no(evaluation.is_correct));
            println!("Score:    {}", evaluation.score);
            println!("Category: {}", evaluation.category);
            println!("Feedback: {}", evaluation.feedback);
        }
    }
    Ok(())
}
