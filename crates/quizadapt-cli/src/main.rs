//! quizadapt CLI — score answers and adapt question difficulty per learner.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use quizadapt_core::model::DifficultyLevel;

mod commands;

use commands::OutputFormat;

#[derive(Parser)]
#[command(name = "quizadapt", version, about = "Adaptive quiz difficulty engine")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single answer without recording it
    Evaluate {
        #[arg(long)]
        user_answer: String,

        #[arg(long)]
        correct_answer: String,

        /// Seconds spent answering
        #[arg(long, default_value = "0")]
        time_taken: f64,

        /// Self-reported confidence in [0, 1] (default 0.5)
        #[arg(long)]
        confidence: Option<f64>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Record an answer and adapt the user's difficulty
    Submit {
        #[arg(long)]
        user: String,

        #[arg(long)]
        user_answer: String,

        #[arg(long)]
        correct_answer: String,

        #[arg(long, default_value = "0")]
        time_taken: f64,

        #[arg(long)]
        confidence: Option<f64>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Label a batch of questions for a topic
    Questions {
        #[arg(long)]
        user: String,

        #[arg(long)]
        topic: u64,

        /// Base difficulty (1-3 or name); defaults to the user's current level
        #[arg(long)]
        base: Option<DifficultyLevel>,

        #[arg(long, default_value = "5")]
        count: usize,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show performance analytics for a user
    Analytics {
        #[arg(long)]
        user: String,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Assess a free-text explanation of a topic
    TeachBack {
        #[arg(long)]
        topic: String,

        /// Explanation text; read from stdin when omitted
        #[arg(long)]
        explanation: Option<String>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Replay a JSON-lines file of answers through the engine
    Replay {
        /// Path to the .jsonl answer log
        #[arg(long)]
        input: PathBuf,

        /// Print every difficulty decision to stderr
        #[arg(long)]
        trace_decisions: bool,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizadapt=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Evaluate {
            user_answer,
            correct_answer,
            time_taken,
            confidence,
            format,
        } => commands::evaluate::execute(
            &user_answer,
            &correct_answer,
            time_taken,
            confidence,
            format,
        ),
        Commands::Submit {
            user,
            user_answer,
            correct_answer,
            time_taken,
            confidence,
            format,
        } => {
            commands::submit::execute(
                config,
                user,
                user_answer,
                correct_answer,
                time_taken,
                confidence,
                format,
            )
            .await
        }
        Commands::Questions {
            user,
            topic,
            base,
            count,
            format,
        } => commands::questions::execute(config, user, topic, base, count, format).await,
        Commands::Analytics { user, format } => {
            commands::analytics::execute(config, user, format).await
        }
        Commands::TeachBack {
            topic,
            explanation,
            format,
        } => commands::teach_back::execute(topic, explanation, format),
        Commands::Replay {
            input,
            trace_decisions,
            format,
        } => commands::replay::execute(config, input, trace_decisions, format).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
