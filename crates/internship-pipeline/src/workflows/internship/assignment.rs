//! Interviewer assignment.
//!
//! The policy only guarantees that a picked staff member belongs to the requested department.
//! Which member is returned depends on the configured [`SelectionStrategy`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::domain::{Department, StaffMember};
use super::repository::{RepositoryError, StaffRepository};

/// How a staff member is chosen among the eligible members of a department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionStrategy {
    /// Sample through the store's `pick_one_by_department`.
    #[default]
    Random,
    /// Rotate through members ordered by id, one cursor per department.
    RoundRobin,
}

impl SelectionStrategy {
    pub const fn label(self) -> &'static str {
        match self {
            SelectionStrategy::Random => "random",
            SelectionStrategy::RoundRobin => "round_robin",
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SelectionStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "round_robin" | "round-robin" | "roundrobin" => Ok(Self::RoundRobin),
            other => Err(format!("unknown assignment strategy '{other}'")),
        }
    }
}

/// Chooses interviewers for candidates.
pub struct AssignmentPolicy<S> {
    staff: Arc<S>,
    strategy: SelectionStrategy,
    cursors: Mutex<HashMap<Department, usize>>,
}

impl<S> AssignmentPolicy<S>
where
    S: StaffRepository,
{
    pub fn new(staff: Arc<S>, strategy: SelectionStrategy) -> Self {
        Self {
            staff,
            strategy,
            cursors: Mutex::new(HashMap::new()),
        }
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    /// Pick one member of `department`, or `None` when the department has no staff.
    pub fn pick_department_staff(
        &self,
        department: Department,
    ) -> Result<Option<StaffMember>, RepositoryError> {
        let picked = match self.strategy {
            SelectionStrategy::Random => self.staff.pick_one_by_department(department)?,
            SelectionStrategy::RoundRobin => self.next_in_rotation(department)?,
        };

        debug!(
            %department,
            strategy = %self.strategy,
            staff_id = picked.as_ref().map(|member| member.id.0.as_str()),
            "picked department staff"
        );
        Ok(picked)
    }

    /// Pick a member of the top-tier department for final-stage meetings.
    pub fn pick_top_officer(&self) -> Result<Option<StaffMember>, RepositoryError> {
        self.pick_department_staff(Department::TOP_TIER)
    }

    fn next_in_rotation(
        &self,
        department: Department,
    ) -> Result<Option<StaffMember>, RepositoryError> {
        let mut members = self.staff.list_by_department(department)?;
        if members.is_empty() {
            return Ok(None);
        }
        members.sort_by(|a, b| a.id.cmp(&b.id));

        let mut cursors = self
            .cursors
            .lock()
            .map_err(|_| RepositoryError::Unavailable("rotation state poisoned".to_string()))?;
        let cursor = cursors.entry(department).or_insert(0);
        let index = *cursor % members.len();
        *cursor = index + 1;

        Ok(Some(members.swap_remove(index)))
    }
}
