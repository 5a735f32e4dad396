//! Risk scoring for startup-assessment questionnaires.
//!
//! [`scoring`] holds the pure engine; [`submissions`] wraps it in the draft,
//! submit and recompute lifecycle.

pub mod config;
pub mod error;
pub mod scoring;
pub mod submissions;
pub mod telemetry;

pub use error::AppError;
pub use scoring::{compute_risk_breakdown, AnswerSet, RiskBreakdown, ScoringEngine};
