//! The `quizadapt teach-back` command.

use std::io::Read;

use anyhow::{Context, Result};

use quizadapt_core::teach_back::assess_explanation;

use super::{print_json, OutputFormat};

pub fn execute(topic: String, explanation: Option<String>, format: OutputFormat) -> Result<()> {
    let explanation = match explanation {
        Some(text) => text,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read explanation from stdin")?;
            text
        }
    };

    let assessment = assess_explanation(&explanation, &topic);

    match format {
        OutputFormat::Json => print_json(&assessment)?,
        OutputFormat::Text => {
            println!("Correctness: {:.2}", assessment.correctness);
            println!("Feedback:    {}", assessment.feedback);
            if !assessment.matched_terms.is_empty() {
                println!("Key terms:   {}", assessment.matched_terms.join(", "));
            }
            println!("Suggestions:");
            for suggestion in &assessment.suggestions {
                println!("  - {suggestion}");
            }
        }
    }
    Ok(())
}
