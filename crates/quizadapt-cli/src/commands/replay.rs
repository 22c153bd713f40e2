//! The `quizadapt replay` command.
//!
//! Feeds a JSON-lines answer log through the engine. Users are replayed
//! concurrently; each user's answers are submitted strictly in file order.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::{ContentArrangement, Table};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizadapt_core::controller::Decision;
use quizadapt_core::engine::AdaptiveEngine;
use quizadapt_core::model::{AnswerSubmission, DifficultyLevel, Trend};
use quizadapt_core::traits::DecisionObserver;

use super::{build_engine, print_json, OutputFormat};

/// One line of the answer log.
#[derive(Debug, Deserialize)]
struct ReplayRecord {
    user_id: String,
    #[serde(flatten)]
    submission: AnswerSubmission,
}

#[derive(Debug, Serialize)]
struct ReplaySummary {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    total_answers: usize,
    users: Vec<UserReplay>,
}

#[derive(Debug, Serialize)]
struct UserReplay {
    user_id: String,
    answers: usize,
    correct: usize,
    points: u32,
    final_difficulty: DifficultyLevel,
    average_score: f64,
    trend: Trend,
}

/// Prints every decision to stderr as it happens.
struct ConsoleObserver;

impl DecisionObserver for ConsoleObserver {
    fn on_decision(&self, user_id: &str, decision: &Decision) {
        eprintln!(
            "  {user_id}: {} -> {} ({:?}, p={:.3}, perf={:.3})",
            decision.previous,
            decision.next,
            decision.adjustment,
            decision.probability,
            decision.performance_score,
        );
    }
}

pub async fn execute(
    config_path: Option<PathBuf>,
    input: PathBuf,
    trace_decisions: bool,
    format: OutputFormat,
) -> Result<()> {
    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read answer log: {}", input.display()))?;
    let by_user = parse_log(&content)
        .with_context(|| format!("failed to parse answer log: {}", input.display()))?;

    let mut engine = build_engine(config_path.as_deref())?;
    if trace_decisions {
        engine = engine.with_observer(Arc::new(ConsoleObserver));
    }

    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let total_answers = by_user.values().map(Vec::len).sum();
    tracing::info!(%run_id, users = by_user.len(), total_answers, "replay started");

    let engine = &engine;
    let mut pending: FuturesUnordered<_> = by_user
        .into_iter()
        .map(|(user_id, submissions)| replay_user(engine, user_id, submissions))
        .collect();

    let mut users = Vec::new();
    while let Some(result) = pending.next().await {
        users.push(result?);
    }
    users.sort_by(|a, b| a.user_id.cmp(&b.user_id));

    let summary = ReplaySummary {
        run_id,
        started_at,
        total_answers,
        users,
    };
    tracing::info!(%run_id, "replay finished");

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => print_summary(&summary),
    }
    Ok(())
}

/// Group records by user, keeping each user's answers in file order.
fn parse_log(content: &str) -> Result<BTreeMap<String, Vec<AnswerSubmission>>> {
    let mut by_user: BTreeMap<String, Vec<AnswerSubmission>> = BTreeMap::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: ReplayRecord =
            serde_json::from_str(line).with_context(|| format!("line {}", idx + 1))?;
        by_user
            .entry(record.user_id)
            .or_default()
            .push(record.submission);
    }
    Ok(by_user)
}

async fn replay_user(
    engine: &AdaptiveEngine,
    user_id: String,
    submissions: Vec<AnswerSubmission>,
) -> Result<UserReplay> {
    let mut correct = 0;
    let mut points = 0;
    for submission in &submissions {
        let outcome = engine.submit(&user_id, submission).await?;
        if outcome.is_correct {
            correct += 1;
        }
        points += outcome.score;
    }

    let analytics = engine.analytics(&user_id).await?;
    let final_difficulty = engine.current_difficulty(&user_id).await?;
    Ok(UserReplay {
        answers: submissions.len(),
        correct,
        points,
        final_difficulty,
        average_score: analytics.average_score,
        trend: analytics.improvement_trend,
        user_id,
    })
}

fn print_summary(summary: &ReplaySummary) {
    println!("Replay {}", summary.run_id);
    println!(
        "{} answers from {} users",
        summary.total_answers,
        summary.users.len()
    );

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "User", "Answers", "Correct", "Points", "Level", "Average", "Trend",
    ]);
    for user in &summary.users {
        table.add_row(vec![
            user.user_id.clone(),
            user.answers.to_string(),
            user.correct.to_string(),
            user.points.to_string(),
            user.final_difficulty.to_string(),
            format!("{:.3}", user.average_score),
            user.trend.to_string(),
        ]);
    }
    println!("{table}");
}
