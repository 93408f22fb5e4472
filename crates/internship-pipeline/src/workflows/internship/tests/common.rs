use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::internship::domain::{
    Candidate, CandidateId, CandidateIntake, CandidateStatus, Department, StaffId, StaffMember,
};
use crate::workflows::internship::memory::{InMemoryCandidateRepository, InMemoryStaffRepository};
use crate::workflows::internship::repository::{
    CandidateRepository, RepositoryError, StaffRepository, WriteGuard,
};
use crate::workflows::internship::service::{CandidateLifecycleService, StaffDirectory};

pub(super) const DEVELOPMENT_PEER: &str = "staff-dev-1";
pub(super) const SECOND_DEVELOPMENT_PEER: &str = "staff-dev-2";
pub(super) const DESIGN_PEER: &str = "staff-design-1";
pub(super) const TOP_OFFICER: &str = "staff-ceo";

pub(super) fn intake(email: &str) -> CandidateIntake {
    CandidateIntake {
        first_name: "Elif".to_string(),
        last_name: "Kaya".to_string(),
        email: email.to_string(),
        department: Department::Development,
        university: "Bogazici University".to_string(),
        experience: true,
    }
}

pub(super) fn meeting_time(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0)
        .single()
        .expect("valid meeting time")
}

fn staff_member(id: &str, name: &str, department: Department) -> StaffMember {
    StaffMember {
        id: StaffId(id.to_string()),
        name: name.to_string(),
        department,
    }
}

pub(super) fn seed_staff(staff: &InMemoryStaffRepository) {
    for member in [
        staff_member(DEVELOPMENT_PEER, "Burak Demir", Department::Development),
        staff_member(SECOND_DEVELOPMENT_PEER, "Zeynep Arslan", Department::Development),
        staff_member(DESIGN_PEER, "Can Yildiz", Department::Design),
        staff_member(TOP_OFFICER, "Aylin Sahin", Department::Ceo),
    ] {
        staff.insert(member).expect("seed staff member");
    }
}

pub(super) type MemoryService =
    CandidateLifecycleService<InMemoryCandidateRepository, InMemoryStaffRepository>;

pub(super) fn build_service() -> (
    MemoryService,
    Arc<InMemoryCandidateRepository>,
    Arc<InMemoryStaffRepository>,
) {
    let candidates = Arc::new(InMemoryCandidateRepository::default());
    let staff = Arc::new(InMemoryStaffRepository::default());
    seed_staff(&staff);
    let service = CandidateLifecycleService::new(candidates.clone(), staff.clone());
    (service, candidates, staff)
}

pub(super) fn build_directory(
    staff: Arc<InMemoryStaffRepository>,
) -> StaffDirectory<InMemoryStaffRepository> {
    StaffDirectory::new(staff)
}

/// Store a candidate that has already progressed through `meeting_count` meetings.
pub(super) fn seed_candidate(
    candidates: &InMemoryCandidateRepository,
    email: &str,
    meeting_count: u8,
    status: CandidateStatus,
) -> Candidate {
    let mut record = Candidate::from_intake(intake(email), meeting_time(1));
    record.meeting_count = meeting_count;
    record.status = status;
    candidates.insert(record).expect("seed candidate")
}

pub(super) fn missing_id() -> CandidateId {
    CandidateId("missing".to_string())
}

/// Store whose reads succeed but every write fails.
pub(super) struct ReadOnlyRepository {
    pub(super) inner: InMemoryCandidateRepository,
}

impl CandidateRepository for ReadOnlyRepository {
    fn insert(&self, _record: Candidate) -> Result<Candidate, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self) -> Result<Vec<Candidate>, RepositoryError> {
        self.inner.list()
    }

    fn list_by_assignee(&self, staff_id: &StaffId) -> Result<Vec<Candidate>, RepositoryError> {
        self.inner.list_by_assignee(staff_id)
    }

    fn replace(&self, _record: Candidate, _guard: WriteGuard) -> Result<Candidate, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn delete(&self, _id: &CandidateId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Candidate>, RepositoryError> {
        self.inner.find_by_email(email)
    }
}

/// Store where another writer replaces the record right after every read.
pub(super) struct InterleavedWriter {
    pub(super) inner: InMemoryCandidateRepository,
}

impl CandidateRepository for InterleavedWriter {
    fn insert(&self, record: Candidate) -> Result<Candidate, RepositoryError> {
        self.inner.insert(record)
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        let loaded = self.inner.fetch(id)?;
        if let Some(record) = &loaded {
            self.inner
                .replace(record.clone(), WriteGuard::Unconditional)?;
        }
        Ok(loaded)
    }

    fn list(&self) -> Result<Vec<Candidate>, RepositoryError> {
        self.inner.list()
    }

    fn list_by_assignee(&self, staff_id: &StaffId) -> Result<Vec<Candidate>, RepositoryError> {
        self.inner.list_by_assignee(staff_id)
    }

    fn replace(&self, record: Candidate, guard: WriteGuard) -> Result<Candidate, RepositoryError> {
        self.inner.replace(record, guard)
    }

    fn delete(&self, id: &CandidateId) -> Result<(), RepositoryError> {
        self.inner.delete(id)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Candidate>, RepositoryError> {
        self.inner.find_by_email(email)
    }
}

pub(super) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn insert(&self, _record: Candidate) -> Result<Candidate, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_by_assignee(&self, _staff_id: &StaffId) -> Result<Vec<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn replace(&self, _record: Candidate, _guard: WriteGuard) -> Result<Candidate, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &CandidateId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_email(&self, _email: &str) -> Result<Option<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
