//! The `quizadapt init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizadapt.toml").exists() {
        println!("quizadapt.toml already exists, skipping.");
        return Ok(());
    }

    std::fs::write("quizadapt.toml", SAMPLE_CONFIG)?;
    println!("Created quizadapt.toml");

    println!("\nNext steps:");
    println!("  1. Adjust the store path in quizadapt.toml");
    println!("  2. Run: quizadapt submit --user alice --user-answer A --correct-answer A --time-taken 30");
    println!("  3. Run: quizadapt analytics --user alice");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizadapt configuration

# Level assumed for users with no recorded difficulty (1-3)
default_difficulty = 1

# Deadline for each store call in milliseconds (0 disables)
persistence_timeout_ms = 5000

[store]
type = "json"
path = "./quizadapt-data/performance.json"
"#;
