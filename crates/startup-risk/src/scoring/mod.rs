//! Deterministic risk scoring for startup-assessment questionnaires.
//!
//! The engine is a pure function of the answers, the question schema and the
//! [`RiskConfig`] it was built with. It performs no I/O.

pub mod answers;
pub mod config;
mod engine;
pub mod kpi;
mod policy;
mod rules;
pub mod schema;

#[cfg(test)]
mod tests;

pub use answers::{AnswerSet, AnswerValue, ExpenseAllocation};
pub use config::{BandThresholds, DecisionText, RiskConfig};
pub use engine::{compute_risk_breakdown, QuestionContribution, RiskBreakdown, ScoringEngine};
pub use kpi::{KpiDelta, KpiScores};
pub use policy::{decision_for_label, RiskBand};
pub use rules::RuleError;
pub use schema::{labels, standard_questionnaire, QuestionDefinition, ScoreTable, ScoringRule};
