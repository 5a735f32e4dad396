//! Submission lifecycle around the scoring engine: drafts, one-shot final
//! submission, and administrative recomputes.

pub mod domain;
pub mod repository;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Draft, StartupId, StartupStatus, SubmissionId, SubmissionRecord, SurveyVersion,
    SurveyVersionId,
};
pub use repository::{InMemorySubmissionRepository, RepositoryError, SubmissionRepository};
pub use service::{SubmissionError, SubmissionService};
