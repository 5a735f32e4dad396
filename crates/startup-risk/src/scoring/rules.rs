//! One pure function per scoring heuristic.
//!
//! Every heuristic returns a risk value on a 0-100 scale where lower is
//! better. Clamps and tie-breaks are part of the contract; the section and
//! overall aggregates depend on them.

use super::answers::{AnswerSet, AnswerValue};
use super::schema::{labels, tables, QuestionDefinition, ScoreTable, ScoringRule};

pub(crate) const NEUTRAL_RISK: f64 = 50.0;

/// Failure of a single question's rule. The engine substitutes the neutral
/// value and carries on with the rest of the breakdown.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("answer for '{label}' is not {expected}")]
    MalformedAnswer {
        label: String,
        expected: &'static str,
    },
    #[error("rule {rule} produced a non-finite risk value")]
    NonFinite { rule: &'static str },
}

/// Lookup tables for one scoring run, taken from the survey's rule payloads
/// with the built-in tables filling any gap. The first question carrying a
/// non-empty table for a concern wins.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RuleTables {
    pub stage: ScoreTable,
    pub burden: ScoreTable,
    pub readiness: ScoreTable,
    pub ip_status: ScoreTable,
    pub source: ScoreTable,
    pub exit_type: ScoreTable,
    pub exit_timeline: ScoreTable,
}

impl Default for RuleTables {
    fn default() -> Self {
        Self {
            stage: tables::stage_risk(),
            burden: tables::regulatory_burden(),
            readiness: tables::compliance_multiplier(),
            ip_status: tables::ip_status(),
            source: tables::source_quality(),
            exit_type: tables::exit_type(),
            exit_timeline: tables::exit_timeline(),
        }
    }
}

impl RuleTables {
    pub(crate) fn resolve(questions: &[QuestionDefinition]) -> Self {
        let mut stage = None;
        let mut burden = None;
        let mut readiness = None;
        let mut ip_status = None;
        let mut source = None;
        let mut exit_type = None;
        let mut exit_timeline = None;

        for rule in questions.iter().filter_map(|question| question.scoring.as_ref()) {
            let (slot, table) = match rule {
                ScoringRule::StageRisk { map } => (&mut stage, map),
                ScoringRule::RegulatoryBurden { burden: table } => (&mut burden, table),
                ScoringRule::ComplianceMultiplier { map } => (&mut readiness, map),
                ScoringRule::IpRisk { map } => (&mut ip_status, map),
                ScoringRule::SourceQuality { map } => (&mut source, map),
                ScoringRule::ExitClarity { map } => (&mut exit_type, map),
                ScoringRule::ExitTimeline { map } => (&mut exit_timeline, map),
                _ => continue,
            };
            if slot.is_none() && !table.is_empty() {
                *slot = Some(table.clone());
            }
        }

        let defaults = Self::default();
        Self {
            stage: stage.unwrap_or(defaults.stage),
            burden: burden.unwrap_or(defaults.burden),
            readiness: readiness.unwrap_or(defaults.readiness),
            ip_status: ip_status.unwrap_or(defaults.ip_status),
            source: source.unwrap_or(defaults.source),
            exit_type: exit_type.unwrap_or(defaults.exit_type),
            exit_timeline: exit_timeline.unwrap_or(defaults.exit_timeline),
        }
    }
}

/// Dispatches a question to its heuristic. `answer` is the question's own
/// answer; cross-question heuristics read their inputs from `answers`.
pub(crate) fn evaluate(
    rule: &ScoringRule,
    question: &QuestionDefinition,
    answers: &AnswerSet,
    tables: &RuleTables,
) -> Result<f64, RuleError> {
    let answer = answers.answered(&question.label);
    let risk = match rule {
        ScoringRule::DescriptionCompleteness => {
            description_completeness(&question.label, answer)?
        }
        ScoringRule::StageRisk { .. } => lookup(&tables.stage, answer, NEUTRAL_RISK),
        ScoringRule::GeographyComplexity => geography_complexity(answers),
        ScoringRule::RegulatoryBurden { .. } => regulatory_burden(answers, tables),
        ScoringRule::ComplianceMultiplier { .. } => NEUTRAL_RISK,
        ScoringRule::IpRisk { .. } => ip_risk(answers, tables),
        ScoringRule::UnitEconomics => unit_economics(answers),
        ScoringRule::MarketSizing => market_sizing(answers, tables),
        ScoringRule::SourceQuality { .. } => lookup(&tables.source, answer, 65.0),
        ScoringRule::RevenueStage => revenue_stage(answer),
        ScoringRule::GrowthConsistency => growth_consistency(&question.label, answer, answers)?,
        ScoringRule::ContractConcentration | ScoringRule::CustomerConcentration => {
            customer_concentration(answers)?
        }
        ScoringRule::ExpenseBalance => expense_balance(answer, answers),
        ScoringRule::ExitClarity { .. } | ScoringRule::ExitTimeline { .. } => {
            exit_strategy(answers, tables)
        }
        ScoringRule::SelfRiskCompleteness => self_risk_completeness(answers),
        ScoringRule::Unknown => NEUTRAL_RISK,
    };

    // payload tables are unchecked, so keep lookups on the risk scale
    ensure_finite(rule.name(), risk).map(|risk| clamp(risk, 0.0, 100.0))
}

pub(crate) fn ensure_finite(rule: &'static str, risk: f64) -> Result<f64, RuleError> {
    if risk.is_finite() {
        Ok(risk)
    } else {
        Err(RuleError::NonFinite { rule })
    }
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Table entries of 0 read as absent and take the fallback.
fn lookup(table: &ScoreTable, answer: Option<&AnswerValue>, fallback: f64) -> f64 {
    answer
        .and_then(AnswerValue::as_text)
        .and_then(|key| table.get(key))
        .copied()
        .filter(|value| *value != 0.0)
        .unwrap_or(fallback)
}

/// Longer descriptions lower risk from 60 down to a floor of 20.
pub(crate) fn description_completeness(
    label: &str,
    answer: Option<&AnswerValue>,
) -> Result<f64, RuleError> {
    let Some(answer) = answer else {
        return Ok(60.0);
    };
    let text = answer.as_text().ok_or_else(|| RuleError::MalformedAnswer {
        label: label.to_string(),
        expected: "text",
    })?;

    let length = text.chars().count() as f64;
    if length < 300.0 {
        return Ok(60.0);
    }
    Ok(clamp(60.0 - (length - 300.0) / 20.0, 20.0, 60.0))
}

/// The first market is free; each additional market adds 8, capped at 90.
pub(crate) fn geography_complexity(answers: &AnswerSet) -> f64 {
    let total = answers.selection_count(labels::PRIMARY_MARKETS)
        + answers.selection_count(labels::OTHER_MARKETS);
    let additional = total.saturating_sub(1) as f64;
    clamp(20.0 + 8.0 * additional, 20.0, 90.0)
}

pub(crate) fn regulatory_burden(answers: &AnswerSet, tables: &RuleTables) -> f64 {
    let burden_sum: f64 = answers
        .get(labels::REGULATORY_BODIES)
        .and_then(AnswerValue::as_list)
        .unwrap_or_default()
        .iter()
        .map(|body| lookup(&tables.burden, Some(body), 15.0))
        .sum();
    let burden_risk = clamp(10.0 + burden_sum, 10.0, 90.0);

    let multiplier = lookup(
        &tables.readiness,
        answers.get(labels::COMPLIANCE_READINESS),
        1.0,
    );
    clamp(burden_risk * multiplier, 5.0, 95.0)
}

pub(crate) fn ip_risk(answers: &AnswerSet, tables: &RuleTables) -> f64 {
    if answers.text(labels::IP_APPLICABLE) == Some("No") {
        return 55.0;
    }

    let status_risk = lookup(&tables.ip_status, answers.get(labels::IP_STATUS), 55.0);
    if answers.text(labels::IP_TYPE) == Some("Both") {
        (status_risk - 5.0).max(15.0)
    } else {
        status_risk
    }
}

/// LTV/CAC ratio bucketed into fixed risk values.
pub(crate) fn unit_economics(answers: &AnswerSet) -> f64 {
    let cac = answers.number(labels::CAC).filter(|cac| *cac > 0.0);
    let ltv = answers.number(labels::LTV).filter(|ltv| *ltv != 0.0);
    let (Some(cac), Some(ltv)) = (cac, ltv) else {
        return 70.0;
    };

    let ratio = ltv / cac;
    if ratio >= 5.0 {
        20.0
    } else if ratio >= 3.0 {
        35.0
    } else if ratio >= 2.0 {
        55.0
    } else if ratio >= 1.0 {
        75.0
    } else {
        90.0
    }
}

pub(crate) fn market_sizing(answers: &AnswerSet, tables: &RuleTables) -> f64 {
    let base_risk = if answers.is_answered(labels::DATA_SOURCES) {
        lookup(&tables.source, answers.get(labels::SOURCE_TYPE), 65.0)
    } else {
        80.0
    };

    let hierarchy_holds = matches!(
        (
            answers.number(labels::TAM),
            answers.number(labels::SAM),
            answers.number(labels::SOM),
        ),
        (Some(tam), Some(sam), Some(som)) if tam >= sam && sam >= som
    );
    let penalty = if hierarchy_holds { 0.0 } else { 20.0 };

    clamp(base_risk + penalty, 20.0, 95.0)
}

pub(crate) fn revenue_stage(answer: Option<&AnswerValue>) -> f64 {
    if is_pre_revenue(answer) {
        80.0
    } else {
        NEUTRAL_RISK
    }
}

fn is_pre_revenue(status: Option<&AnswerValue>) -> bool {
    status.and_then(AnswerValue::as_text) == Some("Pre-revenue")
}

/// Blends a neutral revenue base with the trend of the monthly growth series.
pub(crate) fn growth_consistency(
    label: &str,
    answer: Option<&AnswerValue>,
    answers: &AnswerSet,
) -> Result<f64, RuleError> {
    if is_pre_revenue(answers.get(labels::REVENUE_STATUS)) {
        return Ok(80.0);
    }

    let base_risk = NEUTRAL_RISK;
    let Some(answer) = answer else {
        return Ok(base_risk);
    };
    let rates = answer
        .growth_rates()
        .ok_or_else(|| RuleError::MalformedAnswer {
            label: label.to_string(),
            expected: "a growth-rate table",
        })?;
    let Some((mean, std_dev)) = mean_and_std_dev(&rates) else {
        return Ok(base_risk);
    };

    let trend_risk = clamp(60.0 - 2.0 * mean + 1.5 * std_dev, 20.0, 95.0);
    Ok(clamp(0.4 * base_risk + 0.6 * trend_risk, 20.0, 95.0))
}

/// Volatility of the growth series on the KPI scale; no series reads as 20.
pub(crate) fn growth_stability(answers: &AnswerSet) -> f64 {
    let std_dev = answers
        .get(labels::GROWTH_RATES)
        .and_then(AnswerValue::growth_rates)
        .and_then(|rates| mean_and_std_dev(&rates))
        .map_or(0.0, |(_, std_dev)| std_dev);
    clamp(20.0 + 2.0 * std_dev, 20.0, 95.0)
}

/// Mean and population standard deviation; `None` for an empty series.
pub(crate) fn mean_and_std_dev(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / count;
    Some((mean, variance.sqrt()))
}

pub(crate) fn customer_concentration(answers: &AnswerSet) -> Result<f64, RuleError> {
    let durations = match answers.answered(labels::CUSTOMER_CONTRACTS) {
        None => Vec::new(),
        Some(contracts) => {
            contracts
                .contract_durations()
                .ok_or_else(|| RuleError::MalformedAnswer {
                    label: labels::CUSTOMER_CONTRACTS.to_string(),
                    expected: "a contract table",
                })?
        }
    };

    if !is_pre_revenue(answers.get(labels::REVENUE_STATUS)) && durations.is_empty() {
        return Ok(75.0);
    }

    let top3_share = answers.number(labels::TOP3_SHARE).unwrap_or(0.0);
    let mut concentration_risk: f64 = if top3_share <= 30.0 {
        25.0
    } else if top3_share <= 50.0 {
        45.0
    } else if top3_share <= 70.0 {
        65.0
    } else {
        85.0
    };

    if let Some((average_duration, _)) = mean_and_std_dev(&durations) {
        if average_duration < 6.0 {
            concentration_risk += 10.0;
        }
    }

    Ok(concentration_risk.min(95.0))
}

/// An answer that is not a record reads as an all-zero allocation.
pub(crate) fn expense_balance(answer: Option<&AnswerValue>, answers: &AnswerSet) -> f64 {
    let Some(answer) = answer else {
        return 40.0;
    };
    let allocation = answer.expense_allocation().unwrap_or_default();

    let stage = answers.text(labels::STARTUP_STAGE).unwrap_or_default();
    let mut penalties = 0.0;

    if allocation.marketing + allocation.sales < 25.0
        && matches!(stage, "Beta" | "Early Revenue" | "Scale-up")
    {
        penalties += 15.0;
    }
    if allocation.tech < 15.0 && matches!(stage, "Idea" | "MVP") {
        penalties += 15.0;
    }
    if allocation.management > 30.0 {
        penalties += 15.0;
    }

    clamp(40.0 + penalties, 20.0, 90.0)
}

pub(crate) fn exit_strategy(answers: &AnswerSet, tables: &RuleTables) -> f64 {
    let type_risk = lookup(&tables.exit_type, answers.get(labels::EXIT_TYPE), 70.0);
    let timeline_risk = lookup(
        &tables.exit_timeline,
        answers.get(labels::EXIT_TIMELINE),
        60.0,
    );

    let mut penalties = 0.0;
    if !answers.is_answered(labels::TARGET_VALUATION) {
        penalties += 10.0;
    }
    if !answers.is_answered(labels::TARGET_BUYER) {
        penalties += 10.0;
    }

    clamp(0.5 * type_risk + 0.5 * timeline_risk + penalties, 25.0, 95.0)
}

/// Rewards three substantive self-reported risks spread across categories.
pub(crate) fn self_risk_completeness(answers: &AnswerSet) -> f64 {
    let filled = labels::SELF_RISKS
        .iter()
        .filter(|label| {
            answers
                .text(label)
                .is_some_and(|text| text.chars().count() >= 50)
        })
        .count();

    let base_risk = match filled {
        3 => 35.0,
        2 => 55.0,
        _ => 80.0,
    };

    let [first, second, third] =
        labels::SELF_RISK_CATEGORIES.map(|label| answers.text(label));
    let breadth_penalty = if first == second && second == third {
        10.0
    } else {
        0.0
    };

    clamp(base_risk + breadth_penalty, 25.0, 90.0)
}
