//! Staff roster import.
//!
//! Rosters are CSV exports with `Name` and `Department` columns. They seed the staff store at
//! startup so arrangements have interviewers to pick from.

mod parser;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::workflows::internship::{
    Department, NewStaffMember, PipelineError, StaffDirectory, StaffMember, StaffRepository,
};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Department { line: u64, value: String },
    MissingField { line: u64, column: &'static str },
    DuplicateName { line: u64, name: String },
    Pipeline(PipelineError),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read staff roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid staff roster CSV: {}", err),
            RosterImportError::Department { line, value } => {
                write!(f, "line {}: department does not exist: {}", line, value)
            }
            RosterImportError::MissingField { line, column } => {
                write!(f, "line {}: {} is empty", line, column)
            }
            RosterImportError::DuplicateName { line, name } => {
                write!(f, "line {}: staff member '{}' listed twice", line, name)
            }
            RosterImportError::Pipeline(err) => {
                write!(f, "could not seed staff directory: {}", err)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Pipeline(err) => Some(err),
            RosterImportError::Department { .. }
            | RosterImportError::MissingField { .. }
            | RosterImportError::DuplicateName { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<PipelineError> for RosterImportError {
    fn from(err: PipelineError) -> Self {
        Self::Pipeline(err)
    }
}

/// Validated roster ready to be written into a staff store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRoster {
    members: Vec<NewStaffMember>,
}

impl StaffRoster {
    pub fn members(&self) -> &[NewStaffMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn count_in(&self, department: Department) -> usize {
        self.members
            .iter()
            .filter(|member| member.department == department)
            .count()
    }

    pub fn has_top_officer(&self) -> bool {
        self.count_in(Department::TOP_TIER) > 0
    }

    /// Create every member that is not already present, skipping names the directory knows.
    pub fn seed<S>(
        &self,
        directory: &StaffDirectory<S>,
    ) -> Result<Vec<StaffMember>, RosterImportError>
    where
        S: StaffRepository + 'static,
    {
        let mut created = Vec::with_capacity(self.members.len());
        for member in &self.members {
            match directory.create(member.clone()) {
                Ok(stored) => created.push(stored),
                Err(PipelineError::StaffAlreadyExists) => continue,
                Err(other) => return Err(other.into()),
            }
        }
        info!(
            created = created.len(),
            listed = self.members.len(),
            "staff roster seeded"
        );
        Ok(created)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<StaffRoster, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<StaffRoster, RosterImportError> {
        let rows = parser::parse_rows(reader)?;
        let mut seen = HashSet::new();
        let mut members = Vec::with_capacity(rows.len());

        for row in rows {
            let department = row
                .department
                .parse::<Department>()
                .map_err(|err| RosterImportError::Department {
                    line: row.line,
                    value: err.0,
                })?;
            if !seen.insert(row.name.clone()) {
                return Err(RosterImportError::DuplicateName {
                    line: row.line,
                    name: row.name,
                });
            }
            members.push(NewStaffMember {
                name: row.name,
                department,
            });
        }

        Ok(StaffRoster { members })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::internship::InMemoryStaffRepository;
    use std::io::Cursor;
    use std::sync::Arc;

    const ROSTER: &str = "Name,Department\n\
        Burak Demir,Development\n\
        Zeynep Arslan, development \n\
        ,\n\
        Aylin Sahin,CEO\n";

    #[test]
    fn parses_roster_and_skips_blank_rows() {
        let roster = RosterImporter::from_reader(Cursor::new(ROSTER)).expect("roster parses");

        assert_eq!(roster.len(), 3);
        assert_eq!(roster.count_in(Department::Development), 2);
        assert!(roster.has_top_officer());
        assert_eq!(roster.members()[1].name, "Zeynep Arslan");
    }

    #[test]
    fn rejects_unknown_department_with_line_number() {
        let csv = "Name,Department\nBurak Demir,Finance\n";

        match RosterImporter::from_reader(Cursor::new(csv)) {
            Err(RosterImportError::Department { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "Finance");
            }
            other => panic!("expected department error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_half_filled_rows_with_line_number() {
        let csv = "Name,Department\nBurak Demir,Development\nAylin Sahin,\n";

        match RosterImporter::from_reader(Cursor::new(csv)) {
            Err(RosterImportError::MissingField { line, column }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "Department");
            }
            other => panic!("expected missing field error, got {other:?}"),
        }

        let nameless = "Name,Department\n , CEO\n";
        assert!(matches!(
            RosterImporter::from_reader(Cursor::new(nameless)),
            Err(RosterImportError::MissingField {
                line: 2,
                column: "Name"
            })
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let csv = "Name,Department\nBurak Demir,Design\nBurak Demir,Marketing\n";

        assert!(matches!(
            RosterImporter::from_reader(Cursor::new(csv)),
            Err(RosterImportError::DuplicateName { line: 3, .. })
        ));
    }

    #[test]
    fn seeding_twice_only_creates_missing_members() {
        let roster = RosterImporter::from_reader(Cursor::new(ROSTER)).expect("roster parses");
        let directory = StaffDirectory::new(Arc::new(InMemoryStaffRepository::default()));

        let first = roster.seed(&directory).expect("first seed");
        let second = roster.seed(&directory).expect("second seed");

        assert_eq!(first.len(), 3);
        assert!(second.is_empty());
        assert_eq!(directory.list().expect("list").len(), 3);
    }
}
