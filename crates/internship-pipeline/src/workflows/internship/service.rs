use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::assignment::{AssignmentPolicy, SelectionStrategy};
use super::domain::{
    Candidate, CandidateId, CandidateIntake, CandidateStatus, Department, NewStaffMember, StaffId,
    StaffMember,
};
use super::repository::{CandidateRepository, RepositoryError, StaffRepository, WriteGuard};

/// Whether replacements are checked against the revision that was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteConcurrency {
    #[default]
    LastWriteWins,
    Optimistic,
}

impl WriteConcurrency {
    pub const fn label(self) -> &'static str {
        match self {
            WriteConcurrency::LastWriteWins => "last_write_wins",
            WriteConcurrency::Optimistic => "optimistic",
        }
    }

    fn guard_for(self, record: &Candidate) -> WriteGuard {
        match self {
            WriteConcurrency::LastWriteWins => WriteGuard::Unconditional,
            WriteConcurrency::Optimistic => WriteGuard::Revision(record.revision),
        }
    }
}

impl fmt::Display for WriteConcurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WriteConcurrency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "last_write_wins" | "last-write-wins" => Ok(Self::LastWriteWins),
            "optimistic" => Ok(Self::Optimistic),
            other => Err(format!("unknown write concurrency mode '{other}'")),
        }
    }
}

/// Service driving candidates through intake, meetings, and the final decision.
pub struct CandidateLifecycleService<C, S> {
    candidates: Arc<C>,
    staff: Arc<S>,
    assignment: AssignmentPolicy<S>,
    concurrency: WriteConcurrency,
}

impl<C, S> CandidateLifecycleService<C, S>
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    pub fn new(candidates: Arc<C>, staff: Arc<S>) -> Self {
        Self::with_options(
            candidates,
            staff,
            SelectionStrategy::default(),
            WriteConcurrency::default(),
        )
    }

    pub fn with_options(
        candidates: Arc<C>,
        staff: Arc<S>,
        strategy: SelectionStrategy,
        concurrency: WriteConcurrency,
    ) -> Self {
        let assignment = AssignmentPolicy::new(staff.clone(), strategy);
        Self {
            candidates,
            staff,
            assignment,
            concurrency,
        }
    }

    pub fn assignment(&self) -> &AssignmentPolicy<S> {
        &self.assignment
    }

    /// Register a new candidate. Emails are unique across the pipeline.
    pub fn intake(&self, intake: CandidateIntake) -> Result<Candidate, PipelineError> {
        if self.candidates.find_by_email(&intake.email)?.is_some() {
            warn!(email = %intake.email, "candidate already exists");
            return Err(PipelineError::AlreadyExists);
        }

        let record = Candidate::from_intake(intake, Utc::now());
        let stored = self.candidates.insert(record).map_err(|err| match err {
            RepositoryError::Conflict => PipelineError::AlreadyExists,
            other => PipelineError::Storage(other),
        })?;

        info!(candidate_id = %stored.id, department = %stored.department, "candidate created");
        Ok(stored)
    }

    pub fn get(&self, id: &CandidateId) -> Result<Candidate, PipelineError> {
        self.load(id)
    }

    pub fn list(&self) -> Result<Vec<Candidate>, PipelineError> {
        Ok(self.candidates.list()?)
    }

    /// Candidates whose next meeting is assigned to `staff_id`.
    pub fn list_for_staff(&self, staff_id: &StaffId) -> Result<Vec<Candidate>, PipelineError> {
        if self.staff.fetch(staff_id)?.is_none() {
            warn!(%staff_id, "staff member does not exist");
            return Err(PipelineError::StaffNotFound);
        }
        Ok(self.candidates.list_by_assignee(staff_id)?)
    }

    pub fn delete(&self, id: &CandidateId) -> Result<(), PipelineError> {
        self.load(id)?;
        self.candidates.delete(id).map_err(|err| match err {
            RepositoryError::NotFound => PipelineError::NotFound,
            other => PipelineError::Storage(other),
        })?;
        info!(candidate_id = %id, "candidate deleted");
        Ok(())
    }

    pub fn deny(&self, id: &CandidateId) -> Result<Candidate, PipelineError> {
        let mut record = self.load(id)?;
        self.decide(&mut record, CandidateStatus::Denied)?;
        let stored = self.persist(record)?;
        info!(candidate_id = %id, "candidate denied");
        Ok(stored)
    }

    /// Accept a candidate once every required meeting has been completed.
    pub fn accept(&self, id: &CandidateId) -> Result<Candidate, PipelineError> {
        let mut record = self.load(id)?;
        if !record.meetings_complete() {
            warn!(
                candidate_id = %id,
                meeting_count = record.meeting_count,
                "candidate cannot be accepted before completing all meetings"
            );
            return Err(PipelineError::InsufficientMeetings {
                meeting_count: record.meeting_count,
            });
        }
        self.decide(&mut record, CandidateStatus::Accepted)?;
        let stored = self.persist(record)?;
        info!(candidate_id = %id, "candidate accepted");
        Ok(stored)
    }

    /// Schedule the next meeting and pick its interviewer.
    ///
    /// The first three meetings go to a member of the candidate's department, the fourth to the
    /// top officer. Once all meetings are complete only the time is recorded.
    pub fn arrange_meeting(
        &self,
        id: &CandidateId,
        when: DateTime<Utc>,
    ) -> Result<Candidate, PipelineError> {
        let mut record = self.load(id)?;

        let department_staff = self
            .assignment
            .pick_department_staff(record.department)?
            .ok_or_else(|| {
                warn!(candidate_id = %id, department = %record.department, "no staff in department");
                PipelineError::StaffNotFound
            })?;

        record.next_meeting = Some(when);

        if record.next_meeting_is_final() {
            let officer = self.assignment.pick_top_officer()?.ok_or_else(|| {
                warn!(candidate_id = %id, "no top officer available for final meeting");
                PipelineError::StaffNotFound
            })?;
            record.assignee = Some(officer.id);
        } else if !record.meetings_complete() {
            record.assignee = Some(department_staff.id);
        }

        let stored = self.persist(record)?;
        info!(
            candidate_id = %id,
            assignee = stored.assignee.as_ref().map(|staff| staff.0.as_str()),
            next_meeting = %when,
            "meeting arranged"
        );
        Ok(stored)
    }

    /// Mark the arranged meeting as held.
    pub fn complete_meeting(&self, id: &CandidateId) -> Result<Candidate, PipelineError> {
        let mut record = self.load(id)?;
        if !record.has_arranged_meeting() {
            warn!(candidate_id = %id, "candidate has no arranged meeting");
            return Err(PipelineError::NoArrangedMeeting);
        }

        record.next_meeting = None;
        if !record.meetings_complete() {
            record.meeting_count += 1;
            if !record.status.is_terminal() {
                record.status = CandidateStatus::InProgress;
            }
        }

        let stored = self.persist(record)?;
        info!(
            candidate_id = %id,
            meeting_count = stored.meeting_count,
            "meeting completed"
        );
        Ok(stored)
    }

    fn load(&self, id: &CandidateId) -> Result<Candidate, PipelineError> {
        self.candidates.fetch(id)?.ok_or_else(|| {
            warn!(candidate_id = %id, "candidate does not exist");
            PipelineError::NotFound
        })
    }

    fn decide(&self, record: &mut Candidate, decision: CandidateStatus) -> Result<(), PipelineError> {
        if record.status.is_terminal() && record.status != decision {
            warn!(
                candidate_id = %record.id,
                status = %record.status,
                "candidate already has a final decision"
            );
            return Err(PipelineError::AlreadyDecided {
                status: record.status,
            });
        }
        record.status = decision;
        Ok(())
    }

    fn persist(&self, record: Candidate) -> Result<Candidate, PipelineError> {
        let guard = self.concurrency.guard_for(&record);
        self.candidates
            .replace(record, guard)
            .map_err(|err| match err {
                RepositoryError::StaleRevision => PipelineError::ConcurrentModification,
                RepositoryError::NotFound => PipelineError::NotFound,
                other => PipelineError::Storage(other),
            })
    }
}

/// Staff intake and lookups.
pub struct StaffDirectory<S> {
    staff: Arc<S>,
}

impl<S> StaffDirectory<S>
where
    S: StaffRepository + 'static,
{
    pub fn new(staff: Arc<S>) -> Self {
        Self { staff }
    }

    pub fn create(&self, member: NewStaffMember) -> Result<StaffMember, PipelineError> {
        if self.staff.find_id_by_name(&member.name)?.is_some() {
            warn!(staff_name = %member.name, "staff member already exists");
            return Err(PipelineError::StaffAlreadyExists);
        }

        let record = StaffMember {
            id: StaffId::generate(),
            name: member.name,
            department: member.department,
        };
        let stored = self.staff.insert(record).map_err(|err| match err {
            RepositoryError::Conflict => PipelineError::StaffAlreadyExists,
            other => PipelineError::Storage(other),
        })?;

        info!(staff_id = %stored.id, department = %stored.department, "staff member created");
        Ok(stored)
    }

    pub fn list(&self) -> Result<Vec<StaffMember>, PipelineError> {
        Ok(self.staff.list()?)
    }

    pub fn list_by_department(
        &self,
        department: Department,
    ) -> Result<Vec<StaffMember>, PipelineError> {
        Ok(self.staff.list_by_department(department)?)
    }

    pub fn find_id_by_name(&self, name: &str) -> Result<StaffId, PipelineError> {
        self.staff.find_id_by_name(name)?.ok_or_else(|| {
            warn!(staff_name = %name, "staff member does not exist");
            PipelineError::StaffNotFound
        })
    }
}

/// Error raised by the pipeline services.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("candidate does not exist")]
    NotFound,
    #[error("candidate already exists")]
    AlreadyExists,
    #[error("staff member does not exist")]
    StaffNotFound,
    #[error("staff member already exists")]
    StaffAlreadyExists,
    #[error("candidates cannot be accepted before the completion of 4 meetings (completed {meeting_count})")]
    InsufficientMeetings { meeting_count: u8 },
    #[error("candidate does not have any arranged meetings")]
    NoArrangedMeeting,
    #[error("candidate already has a final decision: {status}")]
    AlreadyDecided { status: CandidateStatus },
    #[error("candidate was modified concurrently, reload and retry")]
    ConcurrentModification,
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}
