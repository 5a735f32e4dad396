use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::answers::AnswerSet;
use super::config::RiskConfig;
use super::kpi::{round_to_cents, KpiScores};
use super::policy::{band_for, decision_for, RiskBand};
use super::rules::{self, RuleError, RuleTables, NEUTRAL_RISK};
use super::schema::QuestionDefinition;

/// Stateless scorer that applies a [`RiskConfig`] to a set of answers.
///
/// Scoring never fails: a question whose rule cannot be evaluated is logged
/// and contributes the neutral risk of 50 instead.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: RiskConfig,
}

impl ScoringEngine {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn score(&self, answers: &AnswerSet, questions: &[QuestionDefinition]) -> RiskBreakdown {
        let tables = RuleTables::resolve(questions);
        let section_scores = self.sections_with(answers, questions, &tables);
        let kpi_scores = kpis_with(answers, &tables);

        let total_risk_score = round_to_cents(self.overall_score(&section_scores));
        let risk_band = self.band(total_risk_score);
        debug!(
            total_risk_score,
            band = risk_band.label(),
            "computed risk breakdown"
        );

        RiskBreakdown {
            total_risk_score,
            risk_band,
            decision: self.decision(risk_band).to_string(),
            section_scores,
            kpi_scores,
        }
    }

    /// Risk value (0-100) of a single question. Lookup tables come from the
    /// question's own rule payload, or the built-in tables when it has none.
    pub fn question_risk(&self, question: &QuestionDefinition, answers: &AnswerSet) -> f64 {
        let tables = RuleTables::resolve(std::slice::from_ref(question));
        question_risk_with(question, answers, &tables)
    }

    /// Weighted mean risk of the scored questions in `section`, or 50 when the
    /// section has none.
    pub fn section_score(
        &self,
        section: &str,
        answers: &AnswerSet,
        questions: &[QuestionDefinition],
    ) -> f64 {
        let tables = RuleTables::resolve(questions);
        section_score_with(section, answers, questions, &tables)
    }

    /// Scores every configured section followed by the combined pseudo-sections.
    pub fn section_scores(
        &self,
        answers: &AnswerSet,
        questions: &[QuestionDefinition],
    ) -> BTreeMap<String, f64> {
        let tables = RuleTables::resolve(questions);
        self.sections_with(answers, questions, &tables)
    }

    /// Weighted mean of the section scores named in the weight table.
    /// Sections missing from either side are skipped; no usable weight at all
    /// yields 50.
    pub fn overall_score(&self, section_scores: &BTreeMap<String, f64>) -> f64 {
        let weighted: Vec<(f64, f64)> = self
            .config
            .section_weights
            .iter()
            .filter(|(_, weight)| weight.is_finite() && **weight > 0.0)
            .filter_map(|(section, weight)| {
                section_scores.get(section).map(|score| (*score, *weight))
            })
            .collect();

        weighted_mean(&weighted).unwrap_or(NEUTRAL_RISK)
    }

    pub fn band(&self, score: f64) -> RiskBand {
        band_for(score, &self.config.bands)
    }

    pub fn decision(&self, band: RiskBand) -> &str {
        decision_for(band, &self.config.decisions)
    }

    pub fn kpi_scores(&self, answers: &AnswerSet, questions: &[QuestionDefinition]) -> KpiScores {
        kpis_with(answers, &RuleTables::resolve(questions))
    }

    /// Per-question audit trail of every weighted question, in schema order.
    pub fn contributions(
        &self,
        answers: &AnswerSet,
        questions: &[QuestionDefinition],
    ) -> Vec<QuestionContribution> {
        let tables = RuleTables::resolve(questions);
        questions
            .iter()
            .filter(|question| question.is_scored())
            .map(|question| QuestionContribution {
                section: question.section.clone(),
                label: question.label.clone(),
                rule: question.scoring.as_ref().map(|rule| rule.name()),
                weight: question.weight,
                risk: question_risk_with(question, answers, &tables),
                answered: answers.is_answered(&question.label),
            })
            .collect()
    }

    fn sections_with(
        &self,
        answers: &AnswerSet,
        questions: &[QuestionDefinition],
        tables: &RuleTables,
    ) -> BTreeMap<String, f64> {
        let mut scores: BTreeMap<String, f64> = self
            .config
            .sections
            .iter()
            .map(|section| {
                let score = section_score_with(section, answers, questions, tables);
                debug!(section = %section, score, "scored section");
                (section.clone(), score)
            })
            .collect();

        for (combined, members) in &self.config.combined_sections {
            let member_scores: Vec<f64> = members
                .iter()
                .filter_map(|member| scores.get(member).copied())
                .collect();
            let score = if member_scores.is_empty() {
                NEUTRAL_RISK
            } else {
                member_scores.iter().sum::<f64>() / member_scores.len() as f64
            };
            scores.insert(combined.clone(), score);
        }

        scores
    }
}

/// Scores `answers` against `questions` with the built-in configuration.
pub fn compute_risk_breakdown(
    answers: &AnswerSet,
    questions: &[QuestionDefinition],
) -> RiskBreakdown {
    ScoringEngine::default().score(answers, questions)
}

fn section_score_with(
    section: &str,
    answers: &AnswerSet,
    questions: &[QuestionDefinition],
    tables: &RuleTables,
) -> f64 {
    let weighted: Vec<(f64, f64)> = questions
        .iter()
        .filter(|question| question.section == section && question.is_scored())
        .map(|question| (question_risk_with(question, answers, tables), question.weight))
        .collect();

    weighted_mean(&weighted).unwrap_or(NEUTRAL_RISK)
}

/// Mean of `(value, weight)` pairs with positive, finite weights. Weights are
/// scaled by the largest one first so huge weights cannot overflow the sums.
fn weighted_mean(pairs: &[(f64, f64)]) -> Option<f64> {
    let max_weight = pairs
        .iter()
        .map(|(_, weight)| *weight)
        .fold(0.0_f64, f64::max);
    if max_weight <= 0.0 {
        return None;
    }

    let (weighted, total_weight) = pairs
        .iter()
        .fold((0.0, 0.0), |(weighted, total), (value, weight)| {
            let scaled = weight / max_weight;
            (weighted + value * scaled, total + scaled)
        });
    Some(weighted / total_weight)
}

fn question_risk_with(
    question: &QuestionDefinition,
    answers: &AnswerSet,
    tables: &RuleTables,
) -> f64 {
    if !question.required && !answers.is_answered(&question.label) {
        return NEUTRAL_RISK;
    }
    let Some(rule) = question.scoring.as_ref() else {
        return NEUTRAL_RISK;
    };

    rules::evaluate(rule, question, answers, tables).unwrap_or_else(|error| {
        warn!(
            question = %question.label,
            rule = rule.name(),
            %error,
            "scoring rule failed; using neutral risk"
        );
        NEUTRAL_RISK
    })
}

fn kpis_with(answers: &AnswerSet, tables: &RuleTables) -> KpiScores {
    let customer_concentration = rules::customer_concentration(answers)
        .unwrap_or_else(|error| neutral_kpi("kpi_customer_concentration", &error));

    KpiScores {
        regulatory: rules::regulatory_burden(answers, tables),
        unit_economics: rules::unit_economics(answers),
        growth_stability: rules::growth_stability(answers),
        customer_concentration,
        execution_complexity: rules::geography_complexity(answers),
        exit_clarity: rules::exit_strategy(answers, tables),
    }
}

fn neutral_kpi(kpi: &'static str, error: &RuleError) -> f64 {
    warn!(kpi, %error, "kpi input malformed; using neutral risk");
    NEUTRAL_RISK
}

/// Outcome of one scoring run, persisted verbatim with the submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBreakdown {
    pub total_risk_score: f64,
    pub risk_band: RiskBand,
    pub decision: String,
    pub section_scores: BTreeMap<String, f64>,
    pub kpi_scores: KpiScores,
}

/// One weighted question's share of its section score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionContribution {
    pub section: String,
    pub label: String,
    pub rule: Option<&'static str>,
    pub weight: f64,
    pub risk: f64,
    pub answered: bool,
}
