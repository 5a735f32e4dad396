use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use startup_risk::config::AppConfig;
use startup_risk::error::AppError;
use startup_risk::{telemetry, ScoringEngine};
use tracing::debug;

use crate::commands;

#[derive(Parser, Debug)]
#[command(
    name = "startup-risk",
    about = "Score startup assessment questionnaires and compare risk breakdowns",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score an answer file and print the risk breakdown as JSON
    Score(ScoreArgs),
    /// Submit an answer file for a startup and print the stored submission
    Submit(SubmitArgs),
    /// Print the standard questionnaire as JSON
    Questions,
    /// Write a CSV table of KPI scores, one row per breakdown file
    Kpis(KpiArgs),
    /// Show how each KPI moved between two breakdowns
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// JSON object mapping question labels to answers
    #[arg(long)]
    answers: PathBuf,
    /// JSON array of question definitions (defaults to the standard questionnaire)
    #[arg(long)]
    questions: Option<PathBuf>,
    /// Include the per-question contributions
    #[arg(long)]
    explain: bool,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    /// Startup identifier the submission is recorded against
    #[arg(long)]
    startup: String,
    /// JSON object with the final answers
    #[arg(long)]
    answers: PathBuf,
    /// Earlier draft answers to save before submitting
    #[arg(long)]
    draft: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct KpiArgs {
    /// Breakdown JSON files produced by `score`
    #[arg(required = true)]
    breakdowns: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Earlier breakdown
    before: PathBuf,
    /// Later breakdown
    after: PathBuf,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Score(args) => {
            let engine = ScoringEngine::new(config.risk);
            commands::score(
                &engine,
                &args.answers,
                args.questions.as_deref(),
                args.explain,
                &mut out,
            )
        }
        Command::Submit(args) => commands::submit(
            &config.risk,
            &args.startup,
            &args.answers,
            args.draft.as_deref(),
            &mut out,
        ),
        Command::Questions => commands::questions(&mut out),
        Command::Kpis(args) => commands::kpi_table(&args.breakdowns, &mut out),
        Command::Compare(args) => commands::compare(&args.before, &args.after, &mut out),
    }
}
