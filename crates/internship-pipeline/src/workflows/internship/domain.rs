use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Number of completed meetings required before a candidate can be accepted.
pub const REQUIRED_MEETINGS: u8 = 4;

/// Identifier wrapper for candidates in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for staff members who run interviews.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(pub String);

impl StaffId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of departments candidates apply to and staff belong to.
///
/// Deserialization goes through [`FromStr`], so request bodies, paths, and roster files accept the
/// same spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Department {
    Marketing,
    Design,
    Development,
    #[serde(rename = "CEO")]
    Ceo,
}

impl Department {
    /// Department whose staff act as the top officer for final-stage meetings.
    pub const TOP_TIER: Department = Department::Ceo;

    pub const ALL: [Department; 4] = [
        Department::Marketing,
        Department::Design,
        Department::Development,
        Department::Ceo,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Department::Marketing => "Marketing",
            Department::Design => "Design",
            Department::Development => "Development",
            Department::Ceo => "CEO",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Department {
    type Err = UnknownDepartment;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Department::ALL
            .into_iter()
            .find(|department| department.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownDepartment(trimmed.to_string()))
    }
}

impl<'de> Deserialize<'de> for Department {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Raised at the boundary when a department string is outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("department does not exist: {0}")]
pub struct UnknownDepartment(pub String);

/// Where a candidate currently sits in the interview pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Denied,
    Accepted,
}

impl CandidateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CandidateStatus::Pending => "Pending",
            CandidateStatus::InProgress => "In Progress",
            CandidateStatus::Denied => "Denied",
            CandidateStatus::Accepted => "Accepted",
        }
    }

    /// Accepted and Denied never transition again.
    pub const fn is_terminal(self) -> bool {
        matches!(self, CandidateStatus::Denied | CandidateStatus::Accepted)
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Profile fields supplied at intake. Everything else on [`Candidate`] is owned by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateIntake {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub department: Department,
    pub university: String,
    #[serde(default)]
    pub experience: bool,
}

/// Stored candidate aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: Department,
    pub university: String,
    pub experience: bool,
    pub application_date: DateTime<Utc>,
    pub status: CandidateStatus,
    pub meeting_count: u8,
    pub next_meeting: Option<DateTime<Utc>>,
    pub assignee: Option<StaffId>,
    #[serde(default, skip_serializing)]
    pub revision: u64,
}

impl Candidate {
    /// Build a fresh pending record from intake data.
    pub fn from_intake(intake: CandidateIntake, application_date: DateTime<Utc>) -> Self {
        Self {
            id: CandidateId::generate(),
            first_name: intake.first_name,
            last_name: intake.last_name,
            email: intake.email,
            department: intake.department,
            university: intake.university,
            experience: intake.experience,
            application_date,
            status: CandidateStatus::Pending,
            meeting_count: 0,
            next_meeting: None,
            assignee: None,
            revision: 0,
        }
    }

    pub fn has_arranged_meeting(&self) -> bool {
        self.next_meeting.is_some()
    }

    /// The meeting about to be arranged is the last one and goes to the top officer.
    pub fn next_meeting_is_final(&self) -> bool {
        self.meeting_count == REQUIRED_MEETINGS - 1
    }

    pub fn meetings_complete(&self) -> bool {
        self.meeting_count >= REQUIRED_MEETINGS
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Staff intake payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStaffMember {
    pub name: String,
    pub department: Department,
}

/// Interviewer reference entity. A member of [`Department::TOP_TIER`] is the top officer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub department: Department,
}

/// Request to schedule the next meeting for a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingRequest {
    pub candidate_id: CandidateId,
    pub next_meeting_time: DateTime<Utc>,
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern compiles")
});

/// Malformed request payload, rejected before it reaches the pipeline services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestViolation {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("email is not a valid address: {0}")]
    InvalidEmail(String),
}

fn require(field: &'static str, value: &str) -> Result<(), RequestViolation> {
    if value.trim().is_empty() {
        return Err(RequestViolation::Missing(field));
    }
    Ok(())
}

impl CandidateIntake {
    pub fn validate(&self) -> Result<(), RequestViolation> {
        require("email", &self.email)?;
        if !EMAIL_PATTERN.is_match(&self.email) {
            return Err(RequestViolation::InvalidEmail(self.email.clone()));
        }
        require("university", &self.university)
    }
}

impl NewStaffMember {
    pub fn validate(&self) -> Result<(), RequestViolation> {
        require("name", &self.name)
    }
}

impl MeetingRequest {
    pub fn validate(&self) -> Result<(), RequestViolation> {
        require("candidate_id", &self.candidate_id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_parses_case_insensitively() {
        assert_eq!("development".parse(), Ok(Department::Development));
        assert_eq!(" CEO ".parse(), Ok(Department::Ceo));
        assert_eq!(
            "Finance".parse::<Department>(),
            Err(UnknownDepartment("Finance".to_string()))
        );
    }

    #[test]
    fn status_labels_match_wire_format() {
        let json = serde_json::to_string(&CandidateStatus::InProgress).expect("serialize");
        assert_eq!(json, "\"In Progress\"");
        assert_eq!(CandidateStatus::InProgress.label(), "In Progress");
        assert!(CandidateStatus::Accepted.is_terminal());
        assert!(!CandidateStatus::Pending.is_terminal());
    }

    #[test]
    fn department_deserializes_like_it_parses() {
        let parsed: Department = serde_json::from_str("\"development\"").expect("deserialize");
        assert_eq!(parsed, Department::Development);

        let error = serde_json::from_str::<Department>("\"Finance\"").expect_err("rejected");
        assert!(error.to_string().contains("department does not exist: Finance"));
    }

    #[test]
    fn revision_stays_off_the_wire() {
        let mut record = Candidate::from_intake(intake("a@x.com"), Utc::now());
        record.revision = 7;

        let json = serde_json::to_value(&record).expect("serialize");
        assert!(json.get("revision").is_none());
        assert_eq!(json["status"], "Pending");
    }

    fn intake(email: &str) -> CandidateIntake {
        CandidateIntake {
            first_name: "Elif".to_string(),
            last_name: "Kaya".to_string(),
            email: email.to_string(),
            department: Department::Design,
            university: "METU".to_string(),
            experience: false,
        }
    }

    #[test]
    fn intake_requires_email_shape_and_university() {
        assert_eq!(intake("a@x.com").validate(), Ok(()));
        assert_eq!(
            intake("  ").validate(),
            Err(RequestViolation::Missing("email"))
        );
        for malformed in ["not-an-email", "a@x", "a b@x.com", "@x.com"] {
            assert_eq!(
                intake(malformed).validate(),
                Err(RequestViolation::InvalidEmail(malformed.to_string())),
                "{malformed}"
            );
        }

        let no_university = CandidateIntake {
            university: String::new(),
            ..intake("a@x.com")
        };
        assert_eq!(
            no_university.validate(),
            Err(RequestViolation::Missing("university"))
        );
    }

    #[test]
    fn staff_and_meeting_requests_require_identifiers() {
        let nameless = NewStaffMember {
            name: " ".to_string(),
            department: Department::Marketing,
        };
        assert_eq!(nameless.validate(), Err(RequestViolation::Missing("name")));

        let request = MeetingRequest {
            candidate_id: CandidateId(String::new()),
            next_meeting_time: Utc::now(),
        };
        assert_eq!(
            request.validate(),
            Err(RequestViolation::Missing("candidate_id"))
        );
    }

    #[test]
    fn top_tier_serializes_as_ceo() {
        let json = serde_json::to_string(&Department::TOP_TIER).expect("serialize");
        assert_eq!(json, "\"CEO\"");
    }
}
