use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::domain::{
    Draft, StartupId, StartupStatus, SubmissionId, SubmissionRecord, SurveyVersion,
    SurveyVersionId,
};

/// Storage abstraction so the submission service can run against any store.
pub trait SubmissionRepository: Send + Sync {
    fn active_version(&self) -> Result<Option<SurveyVersion>, RepositoryError>;
    fn version(&self, id: &SurveyVersionId) -> Result<Option<SurveyVersion>, RepositoryError>;
    fn save_draft(&self, draft: Draft) -> Result<(), RepositoryError>;
    fn latest_draft(&self, startup: &StartupId) -> Result<Option<Draft>, RepositoryError>;
    fn status(&self, startup: &StartupId) -> Result<Option<StartupStatus>, RepositoryError>;
    fn set_status(&self, startup: &StartupId, status: StartupStatus)
        -> Result<(), RepositoryError>;
    fn insert_submission(
        &self,
        record: SubmissionRecord,
    ) -> Result<SubmissionRecord, RepositoryError>;
    fn update_submission(&self, record: SubmissionRecord) -> Result<(), RepositoryError>;
    fn fetch_submission(
        &self,
        id: &SubmissionId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError>;
    fn latest_submission(
        &self,
        startup: &StartupId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError>;
    /// Every submission of `startup`, oldest first.
    fn submissions(&self, startup: &StartupId) -> Result<Vec<SubmissionRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
struct MemoryState {
    versions: Vec<SurveyVersion>,
    drafts: HashMap<StartupId, Draft>,
    statuses: HashMap<StartupId, StartupStatus>,
    submissions: Vec<SubmissionRecord>,
}

/// Process-local repository used by the CLI and the test suites.
#[derive(Debug, Default)]
pub struct InMemorySubmissionRepository {
    state: Mutex<MemoryState>,
}

impl InMemorySubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository seeded with a single active version.
    pub fn with_version(version: SurveyVersion) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                versions: vec![version],
                ..MemoryState::default()
            }),
        }
    }

    /// Adds `version`; publishing an active version retires the previous one.
    pub fn publish_version(&self, version: SurveyVersion) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        if state.versions.iter().any(|existing| existing.id == version.id) {
            return Err(RepositoryError::Conflict);
        }
        if version.active {
            for existing in &mut state.versions {
                existing.active = false;
            }
        }
        state.versions.push(version);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))
    }
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn active_version(&self) -> Result<Option<SurveyVersion>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .versions
            .iter()
            .rev()
            .find(|version| version.active)
            .cloned())
    }

    fn version(&self, id: &SurveyVersionId) -> Result<Option<SurveyVersion>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .versions
            .iter()
            .find(|version| &version.id == id)
            .cloned())
    }

    fn save_draft(&self, draft: Draft) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        state.drafts.insert(draft.startup.clone(), draft);
        Ok(())
    }

    fn latest_draft(&self, startup: &StartupId) -> Result<Option<Draft>, RepositoryError> {
        Ok(self.lock()?.drafts.get(startup).cloned())
    }

    fn status(&self, startup: &StartupId) -> Result<Option<StartupStatus>, RepositoryError> {
        Ok(self.lock()?.statuses.get(startup).copied())
    }

    fn set_status(
        &self,
        startup: &StartupId,
        status: StartupStatus,
    ) -> Result<(), RepositoryError> {
        self.lock()?.statuses.insert(startup.clone(), status);
        Ok(())
    }

    fn insert_submission(
        &self,
        record: SubmissionRecord,
    ) -> Result<SubmissionRecord, RepositoryError> {
        let mut state = self.lock()?;
        if state.submissions.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        state.submissions.push(record.clone());
        Ok(record)
    }

    fn update_submission(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let slot = state
            .submissions
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = record;
        Ok(())
    }

    fn fetch_submission(
        &self,
        id: &SubmissionId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .submissions
            .iter()
            .find(|record| &record.id == id)
            .cloned())
    }

    fn latest_submission(
        &self,
        startup: &StartupId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .submissions
            .iter()
            .rev()
            .find(|record| &record.startup == startup)
            .cloned())
    }

    fn submissions(&self, startup: &StartupId) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .submissions
            .iter()
            .filter(|record| &record.startup == startup)
            .cloned()
            .collect())
    }
}
