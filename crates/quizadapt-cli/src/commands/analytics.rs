//! The `quizadapt analytics` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use super::{build_engine, print_json, OutputFormat};

pub async fn execute(
    config_path: Option<PathBuf>,
    user: String,
    format: OutputFormat,
) -> Result<()> {
    let engine = build_engine(config_path.as_deref())?;
    let analytics = engine.analytics(&user).await?;

    if format == OutputFormat::Json {
        return print_json(&analytics);
    }

    if analytics.total_attempts == 0 {
        println!("No answers recorded for {user}.");
        return Ok(());
    }

    let recent = analytics
        .recent_performance
        .iter()
        .map(|s| format!("{s:.2}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Attempts".to_string(), analytics.total_attempts.to_string()]);
    table.add_row(vec!["Average".to_string(), format!("{:.3}", analytics.average_score)]);
    table.add_row(vec!["Trend".to_string(), analytics.improvement_trend.to_string()]);
    table.add_row(vec!["Strengths".to_string(), analytics.strengths.join("; ")]);
    table.add_row(vec!["Weaknesses".to_string(), analytics.weaknesses.join("; ")]);
    table.add_row(vec!["Recent".to_string(), recent]);
    println!("Analytics for {user}");
    println!("{table}");
    Ok(())
}
