use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use startup_risk::error::AppError;
use startup_risk::scoring::{
    standard_questionnaire, AnswerSet, KpiScores, QuestionContribution, QuestionDefinition,
    RiskBreakdown, RiskConfig, ScoringEngine,
};
use startup_risk::submissions::{
    InMemorySubmissionRepository, StartupId, StartupStatus, SubmissionError, SubmissionRecord,
    SubmissionRepository, SubmissionService, SurveyVersion,
};
use tracing::info;

#[derive(Serialize)]
struct ExplainedBreakdown<'a> {
    breakdown: &'a RiskBreakdown,
    contributions: Vec<QuestionContribution>,
}

pub fn score(
    engine: &ScoringEngine,
    answers: &Path,
    questions: Option<&Path>,
    explain: bool,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let answers: AnswerSet = read_json(answers)?;
    let questions: Vec<QuestionDefinition> = match questions {
        Some(path) => read_json(path)?,
        None => standard_questionnaire(),
    };

    let breakdown = engine.score(&answers, &questions);
    info!(
        answered = answers.len(),
        questions = questions.len(),
        total_risk_score = breakdown.total_risk_score,
        "scored answers"
    );

    if explain {
        let explained = ExplainedBreakdown {
            breakdown: &breakdown,
            contributions: engine.contributions(&answers, &questions),
        };
        write_json(out, &explained)
    } else {
        write_json(out, &breakdown)
    }
}

#[derive(Serialize)]
struct SubmissionReport<'a> {
    status: &'static str,
    submission: &'a SubmissionRecord,
}

/// Runs one startup through draft, final submission and lock against an
/// in-memory store whose active version carries `config`.
pub fn submit(
    config: &RiskConfig,
    startup: &str,
    answers: &Path,
    draft: Option<&Path>,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let answers: AnswerSet = read_json(answers)?;
    let mut version = SurveyVersion::standard("standard");
    version.risk_config = config.clone();

    let repository = Arc::new(InMemorySubmissionRepository::with_version(version));
    let service = SubmissionService::new(Arc::clone(&repository));
    let startup = StartupId(startup.to_string());

    if let Some(path) = draft {
        service.save_draft(&startup, read_json(path)?)?;
    }
    let record = service.submit(&startup, answers)?;
    let status = repository
        .status(&startup)
        .map_err(SubmissionError::from)?
        .unwrap_or(StartupStatus::Invited);

    write_json(
        out,
        &SubmissionReport {
            status: status.label(),
            submission: &record,
        },
    )
}

pub fn questions(out: &mut impl Write) -> Result<(), AppError> {
    write_json(out, &standard_questionnaire())
}

/// One CSV row per breakdown: file, total, band, then every KPI.
pub fn kpi_table(breakdowns: &[PathBuf], out: &mut impl Write) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["source", "total_risk_score", "risk_band"];
    header.extend(KpiScores::KEYS);
    writer.write_record(&header)?;

    for path in breakdowns {
        let breakdown: RiskBreakdown = read_json(path)?;
        let mut row = vec![
            path.display().to_string(),
            format!("{:.2}", breakdown.total_risk_score),
            breakdown.risk_band.label().to_string(),
        ];
        row.extend(
            breakdown
                .kpi_scores
                .entries()
                .iter()
                .map(|(_, value)| format!("{value:.2}")),
        );
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn compare(before: &Path, after: &Path, out: &mut impl Write) -> Result<(), AppError> {
    let before: RiskBreakdown = read_json(before)?;
    let after: RiskBreakdown = read_json(after)?;

    writeln!(
        out,
        "total_risk_score: {:.2} -> {:.2} ({:+.2})",
        before.total_risk_score,
        after.total_risk_score,
        after.total_risk_score - before.total_risk_score
    )?;
    writeln!(
        out,
        "risk_band: {} -> {}",
        before.risk_band.label(),
        after.risk_band.label()
    )?;
    for delta in before.kpi_scores.compare(&after.kpi_scores) {
        writeln!(
            out,
            "{}: {:.2} -> {:.2} ({:+.2})",
            delta.kpi, delta.before, delta.after, delta.change
        )?;
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
