//! Internship candidate pipeline: intake, interviewer assignment, meetings, and decisions.
//!
//! Candidates move `Pending -> In Progress -> Accepted | Denied`. Four meetings are held before a
//! candidate can be accepted; the first three with staff from the candidate's department and the
//! last with the top officer.

pub mod assignment;
pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use assignment::{AssignmentPolicy, SelectionStrategy};
pub use domain::{
    Candidate, CandidateId, CandidateIntake, CandidateStatus, Department, MeetingRequest,
    NewStaffMember, RequestViolation, StaffId, StaffMember, UnknownDepartment, REQUIRED_MEETINGS,
};
pub use memory::{InMemoryCandidateRepository, InMemoryStaffRepository};
pub use repository::{CandidateRepository, RepositoryError, StaffRepository, WriteGuard};
pub use router::{pipeline_router, ApiResponse, PipelineState};
pub use service::{CandidateLifecycleService, PipelineError, StaffDirectory, WriteConcurrency};
