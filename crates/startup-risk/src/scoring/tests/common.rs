use crate::scoring::answers::{AnswerSet, AnswerValue};
use crate::scoring::schema::{labels, standard_questionnaire, QuestionDefinition};
use crate::scoring::ScoringEngine;

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::default()
}

pub(super) fn questions() -> Vec<QuestionDefinition> {
    standard_questionnaire()
}

pub(super) fn question(label: &str) -> QuestionDefinition {
    questions()
        .into_iter()
        .find(|question| question.label == label)
        .expect("question is part of the standard questionnaire")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn growth_table(rates: &[&str]) -> AnswerValue {
    AnswerValue::List(
        rates
            .iter()
            .enumerate()
            .map(|(month, rate)| {
                AnswerValue::record([
                    ("month", AnswerValue::from(format!("M{}", month + 1))),
                    ("rate", AnswerValue::from(*rate)),
                ])
            })
            .collect(),
    )
}

pub(super) fn contract_table(durations: &[&str]) -> AnswerValue {
    AnswerValue::List(
        durations
            .iter()
            .enumerate()
            .map(|(index, duration)| {
                AnswerValue::record([
                    ("customer", AnswerValue::from(format!("Customer {}", index + 1))),
                    ("duration", AnswerValue::from(*duration)),
                ])
            })
            .collect(),
    )
}

pub(super) fn expense(tech: f64, marketing: f64, sales: f64, management: f64) -> AnswerValue {
    AnswerValue::record([
        ("tech", tech),
        ("marketing", marketing),
        ("sales", sales),
        ("management", management),
    ])
}

/// 720 characters.
pub(super) fn long_description() -> String {
    "Route-planning and dock scheduling software for mid-market logistics operators. "
        .repeat(9)
}

/// A complete submission from an early-revenue SaaS company. Scores 40.05.
pub(super) fn established_answers() -> AnswerSet {
    AnswerSet::new()
        .with("Startup Name", "Dockline")
        .with("Industry/Sector", "Logistics software")
        .with("Year Founded", "2021")
        .with("Number of Employees", "18")
        .with(labels::DESCRIPTION, long_description())
        .with(labels::STARTUP_STAGE, "Early Revenue")
        .with(labels::PRIMARY_MARKETS, vec!["USA", "Canada"])
        .with(labels::OTHER_MARKETS, vec!["UK"])
        .with("Go-to-Market Motion", "Sales-led")
        .with(labels::REGULATORY_BODIES, vec!["GDPR", "ISO 27001"])
        .with(labels::COMPLIANCE_READINESS, "In Progress")
        .with(labels::IP_APPLICABLE, "Yes")
        .with(labels::IP_TYPE, "Both")
        .with(labels::IP_STATUS, "Granted")
        .with("Revenue Model", "Subscription")
        .with(labels::CAC, "1200")
        .with(labels::LTV, "7200")
        .with("Currency", "USD")
        .with(labels::TAM, "5000000000")
        .with(labels::SAM, "800000000")
        .with(labels::SOM, "40000000")
        .with("Market Size Currency", "USD")
        .with(labels::DATA_SOURCES, "Gartner 2024 logistics software forecast")
        .with(labels::SOURCE_TYPE, "Analyst Report")
        .with(labels::REVENUE_STATUS, "Recurring")
        .with("Current MRR/ARR", "85000")
        .with(
            labels::GROWTH_RATES,
            growth_table(&["8", "10", "12", "9", "11", "10"]),
        )
        .with(labels::CUSTOMER_CONTRACTS, contract_table(&["24", "12"]))
        .with(labels::TOP3_SHARE, "35")
        .with(labels::EXPENSE_ALLOCATION, expense(40.0, 25.0, 20.0, 15.0))
        .with(labels::EXIT_TYPE, "Acquisition")
        .with(labels::EXIT_TIMELINE, "5-7 years")
        .with(labels::TARGET_VALUATION, "250000000")
        .with(
            labels::TARGET_BUYER,
            "Strategic acquirer in supply chain software",
        )
        .with(
            labels::SELF_RISKS[0],
            "Inventory forecasting depends on two enterprise pilots converting this year.",
        )
        .with(labels::SELF_RISK_CATEGORIES[0], "Market")
        .with(
            labels::SELF_RISKS[1],
            "Key engineering knowledge is concentrated in the two founding developers.",
        )
        .with(labels::SELF_RISK_CATEGORIES[1], "Execution")
        .with(
            labels::SELF_RISKS[2],
            "EU data residency rules could delay rollout to German logistics customers.",
        )
        .with(labels::SELF_RISK_CATEGORIES[2], "Regulatory")
}

/// A sparse, idea-stage submission that lands in the high band.
pub(super) fn idea_stage_answers() -> AnswerSet {
    AnswerSet::new()
        .with("Startup Name", "Pillwise")
        .with(labels::DESCRIPTION, "An app for medication reminders.")
        .with(labels::STARTUP_STAGE, "Idea")
        .with(labels::PRIMARY_MARKETS, vec!["USA", "EU", "India"])
        .with(labels::OTHER_MARKETS, vec!["Brazil", "Japan", "Kenya"])
        .with(labels::REGULATORY_BODIES, vec!["HIPAA", "FDA"])
        .with(labels::COMPLIANCE_READINESS, "Not Started")
        .with(labels::IP_APPLICABLE, "No")
        .with(labels::CAC, "500")
        .with(labels::LTV, "400")
        .with(labels::TAM, "1000000000")
        .with(labels::REVENUE_STATUS, "Pre-revenue")
        .with(labels::EXIT_TYPE, "Undecided")
        .with(labels::SELF_RISKS[0], "Competition")
}
