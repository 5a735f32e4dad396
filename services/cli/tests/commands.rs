use std::env;
use std::fs;
use std::path::PathBuf;

use serde_json::{json, Value};
use startup_risk::error::AppError;
use startup_risk::scoring::{
    standard_questionnaire, AnswerSet, RiskBand, RiskBreakdown, RiskConfig, ScoringEngine,
};
use startup_risk::submissions::{SubmissionError, SubmissionRecord};
use startup_risk_cli::commands;

fn write_temp(name: &str, value: &Value) -> PathBuf {
    let path = env::temp_dir().join(format!("startup-risk-cli-{}-{name}", std::process::id()));
    fs::write(&path, serde_json::to_string(value).expect("serializes")).expect("temp file writes");
    path
}

fn answers() -> Value {
    json!({
        "Startup Stage": "Scale-up",
        "Primary Geographic Markets": ["USA"],
        "Regulatory Bodies": ["None"],
        "Compliance Readiness": "Fully Compliant",
        "Expected CAC (Customer Acquisition Cost)": "100",
        "Expected LTV (Lifetime Value)": "900",
        "Revenue Status": "Recurring",
        "Exit Type": "Acquisition",
        "Exit Timeline": "3-5 years"
    })
}

fn score_to_breakdown(name: &str, answers: &Value) -> (PathBuf, RiskBreakdown) {
    let answers_path = write_temp(&format!("{name}-answers.json"), answers);
    let mut out = Vec::new();
    commands::score(
        &ScoringEngine::default(),
        &answers_path,
        None,
        false,
        &mut out,
    )
    .expect("score succeeds");
    fs::remove_file(&answers_path).ok();

    let breakdown: RiskBreakdown = serde_json::from_slice(&out).expect("breakdown json");
    let breakdown_path = env::temp_dir().join(format!(
        "startup-risk-cli-{}-{name}-breakdown.json",
        std::process::id()
    ));
    fs::write(&breakdown_path, &out).expect("breakdown writes");
    (breakdown_path, breakdown)
}

#[test]
fn score_prints_breakdown_json() {
    let (path, breakdown) = score_to_breakdown("score", &answers());
    fs::remove_file(&path).ok();

    assert_eq!(breakdown.kpi_scores.unit_economics, 20.0);
    assert_eq!(breakdown.section_scores.len(), 12);
    assert!(matches!(
        breakdown.risk_band,
        RiskBand::Low | RiskBand::Medium
    ));
}

#[test]
fn explain_includes_contributions() {
    let answers_path = write_temp("explain-answers.json", &answers());
    let questions_path = write_temp(
        "explain-questions.json",
        &json!([
            {"label": "Startup Stage", "section": "B", "weight": 2.0, "required": true,
             "scoring": {"type": "stage_risk", "map": {"Scale-up": 10}}},
            {"label": "Team Experience", "section": "B", "weight": 1.0,
             "scoring": {"type": "team_experience"}}
        ]),
    );

    let mut out = Vec::new();
    commands::score(
        &ScoringEngine::default(),
        &answers_path,
        Some(&questions_path),
        true,
        &mut out,
    )
    .expect("score succeeds");
    fs::remove_file(&answers_path).ok();
    fs::remove_file(&questions_path).ok();

    let json: Value = serde_json::from_slice(&out).expect("json output");
    let contributions = json["contributions"].as_array().expect("contributions");
    assert_eq!(contributions.len(), 2);
    assert_eq!(contributions[0]["risk"], 10.0);
    assert_eq!(contributions[1]["rule"], "unknown");
    assert_eq!(contributions[1]["risk"], 50.0);
    let section_b = json["breakdown"]["sectionScores"]["B"]
        .as_f64()
        .expect("section B scored");
    assert!((section_b - 70.0 / 3.0).abs() < 1e-9, "section B was {section_b}");
}

#[test]
fn missing_answers_file_is_an_io_error() {
    let mut out = Vec::new();
    let error = commands::score(
        &ScoringEngine::default(),
        &env::temp_dir().join("startup-risk-cli-no-such-answers.json"),
        None,
        false,
        &mut out,
    )
    .expect_err("file is missing");
    assert!(error.to_string().starts_with("io error"));
}

#[test]
fn questions_lists_standard_questionnaire() {
    let mut out = Vec::new();
    commands::questions(&mut out).expect("questions print");

    let json: Value = serde_json::from_slice(&out).expect("json output");
    let questions = json.as_array().expect("array of questions");
    assert!(questions
        .iter()
        .any(|question| question["label"] == "Description of Offering(s)"));
}

#[test]
fn kpi_table_writes_one_row_per_breakdown() {
    let (first, _) = score_to_breakdown("kpi-first", &answers());
    let mut riskier = answers();
    riskier["Expected LTV (Lifetime Value)"] = json!("50");
    let (second, _) = score_to_breakdown("kpi-second", &riskier);

    let mut out = Vec::new();
    commands::kpi_table(&[first.clone(), second.clone()], &mut out).expect("table writes");
    fs::remove_file(&first).ok();
    fs::remove_file(&second).ok();

    let table = String::from_utf8(out).expect("utf8 csv");
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("source,total_risk_score,risk_band,kpi_regulatory"));
    assert!(lines[1].contains(",20.00,"));
    assert!(lines[2].contains(",90.00,"));
}

#[test]
fn compare_reports_kpi_movement() {
    let (before, _) = score_to_breakdown("compare-before", &answers());
    let mut riskier = answers();
    riskier["Expected LTV (Lifetime Value)"] = json!("50");
    let (after, _) = score_to_breakdown("compare-after", &riskier);

    let mut out = Vec::new();
    commands::compare(&before, &after, &mut out).expect("compare succeeds");
    fs::remove_file(&before).ok();
    fs::remove_file(&after).ok();

    let report = String::from_utf8(out).expect("utf8 report");
    assert!(report.contains("kpi_unit_economics: 20.00 -> 90.00 (+70.00)"));
    assert!(report.contains("kpi_exit_clarity: "));
    assert!(report.contains("(+0.00)"));
}

#[test]
fn submit_scores_and_locks_the_startup() {
    let answers_path = write_temp("submit-answers.json", &answers());
    let draft_path = write_temp("submit-draft.json", &json!({"Startup Stage": "MVP"}));

    let mut out = Vec::new();
    commands::submit(
        &RiskConfig::default(),
        "acme",
        &answers_path,
        Some(&draft_path),
        &mut out,
    )
    .expect("submission succeeds");
    fs::remove_file(&answers_path).ok();
    fs::remove_file(&draft_path).ok();

    let json: Value = serde_json::from_slice(&out).expect("json output");
    assert_eq!(json["status"], "locked");
    let record: SubmissionRecord =
        serde_json::from_value(json["submission"].clone()).expect("submission record");
    assert_eq!(record.startup.0, "acme");
    assert_eq!(record.version.0, "standard");

    let answers: AnswerSet = serde_json::from_value(answers()).expect("answers parse");
    let expected = ScoringEngine::default().score(&answers, &standard_questionnaire());
    assert_eq!(record.breakdown, expected);
}

#[test]
fn submission_errors_surface_as_app_errors() {
    let error = AppError::from(SubmissionError::NoActiveVersion);
    assert_eq!(
        error.to_string(),
        "submission error: no active survey version is published"
    );
    assert!(std::error::Error::source(&error).is_some());
}
