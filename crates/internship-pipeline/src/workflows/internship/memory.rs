use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{Candidate, CandidateId, Department, StaffId, StaffMember};
use super::repository::{CandidateRepository, RepositoryError, StaffRepository, WriteGuard};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
}

/// Process-local candidate store backing the service binary and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCandidateRepository {
    records: Arc<Mutex<HashMap<CandidateId, Candidate>>>,
}

impl InMemoryCandidateRepository {
    fn sorted(mut records: Vec<Candidate>) -> Vec<Candidate> {
        records.sort_by(|a, b| {
            a.application_date
                .cmp(&b.application_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        records
    }
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn insert(&self, record: Candidate) -> Result<Candidate, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&record.id)
            || guard
                .values()
                .any(|existing| existing.email.eq_ignore_ascii_case(&record.email))
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Candidate>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(Self::sorted(guard.values().cloned().collect()))
    }

    fn list_by_assignee(&self, staff_id: &StaffId) -> Result<Vec<Candidate>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(Self::sorted(
            guard
                .values()
                .filter(|record| record.assignee.as_ref() == Some(staff_id))
                .cloned()
                .collect(),
        ))
    }

    fn replace(
        &self,
        mut record: Candidate,
        write_guard: WriteGuard,
    ) -> Result<Candidate, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let stored = guard.get(&record.id).ok_or(RepositoryError::NotFound)?;
        if let WriteGuard::Revision(expected) = write_guard {
            if stored.revision != expected {
                return Err(RepositoryError::StaleRevision);
            }
        }
        record.revision = stored.revision + 1;
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn delete(&self, id: &CandidateId) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Candidate>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .values()
            .find(|record| record.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

/// Process-local staff store. Sampling uses the trait's random default.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStaffRepository {
    records: Arc<Mutex<HashMap<StaffId, StaffMember>>>,
}

impl StaffRepository for InMemoryStaffRepository {
    fn insert(&self, record: StaffMember) -> Result<StaffMember, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&record.id)
            || guard.values().any(|existing| existing.name == record.name)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &StaffId) -> Result<Option<StaffMember>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<StaffMember>, RepositoryError> {
        let guard = lock(&self.records)?;
        let mut members: Vec<_> = guard.values().cloned().collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }

    fn list_by_department(
        &self,
        department: Department,
    ) -> Result<Vec<StaffMember>, RepositoryError> {
        let guard = lock(&self.records)?;
        let mut members: Vec<_> = guard
            .values()
            .filter(|member| member.department == department)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(members)
    }

    fn find_id_by_name(&self, name: &str) -> Result<Option<StaffId>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .values()
            .find(|member| member.name == name)
            .map(|member| member.id.clone()))
    }
}
