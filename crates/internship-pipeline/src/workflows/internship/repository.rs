use rand::seq::IndexedRandom;

use super::domain::{Candidate, CandidateId, Department, StaffId, StaffMember};

/// Precondition attached to a whole-record replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteGuard {
    /// Overwrite whatever is stored. Concurrent writers are last-write-wins.
    Unconditional,
    /// Only overwrite when the stored revision still matches.
    Revision(u64),
}

/// Storage contract for candidate records. Updates always replace the full document.
pub trait CandidateRepository: Send + Sync {
    fn insert(&self, record: Candidate) -> Result<Candidate, RepositoryError>;
    fn fetch(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    fn list(&self) -> Result<Vec<Candidate>, RepositoryError>;
    fn list_by_assignee(&self, staff_id: &StaffId) -> Result<Vec<Candidate>, RepositoryError>;
    fn replace(&self, record: Candidate, guard: WriteGuard) -> Result<Candidate, RepositoryError>;
    fn delete(&self, id: &CandidateId) -> Result<(), RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Candidate>, RepositoryError>;
}

/// Storage contract for staff members.
pub trait StaffRepository: Send + Sync {
    fn insert(&self, record: StaffMember) -> Result<StaffMember, RepositoryError>;
    fn fetch(&self, id: &StaffId) -> Result<Option<StaffMember>, RepositoryError>;
    fn list(&self) -> Result<Vec<StaffMember>, RepositoryError>;
    fn list_by_department(
        &self,
        department: Department,
    ) -> Result<Vec<StaffMember>, RepositoryError>;
    fn find_id_by_name(&self, name: &str) -> Result<Option<StaffId>, RepositoryError>;

    /// Sample one member of `department`. Stores with a native sampling query should override this.
    fn pick_one_by_department(
        &self,
        department: Department,
    ) -> Result<Option<StaffMember>, RepositoryError> {
        let members = self.list_by_department(department)?;
        Ok(members.choose(&mut rand::rng()).cloned())
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record was modified since it was read")]
    StaleRevision,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
