//! Storage seam for resume records.
//!
//! The layout engine never touches storage. [`crate::ResumeExporter::export_from`]
//! is the only consumer: it loads a record through [`ResumeRepository`] and then
//! runs the pure pipeline on it.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::model::ResumeRecord;

/// Failures reported by a [`ResumeRepository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no resume stored for user `{0}`")]
    NotFound(String),

    /// The backing store is unavailable or returned malformed data.
    #[error("resume store failure: {0}")]
    Backend(String),
}

/// Persistent store of resume records keyed by user id.
pub trait ResumeRepository {
    /// Loads the record of `user_id`.
    fn get(&self, user_id: &str) -> Result<ResumeRecord, RepositoryError>;

    /// Stores a new record and returns the id assigned to its owner.
    fn create(&self, record: ResumeRecord) -> Result<String, RepositoryError>;

    /// Replaces the record of an existing user.
    fn update(&self, user_id: &str, record: ResumeRecord) -> Result<(), RepositoryError>;
}

/// Process-local repository, useful for tests and the command line tool.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    records: RwLock<BTreeMap<String, ResumeRecord>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl ResumeRepository for InMemoryRepository {
    fn get(&self, user_id: &str) -> Result<ResumeRecord, RepositoryError> {
        self.records
            .read()
            .get(user_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(user_id.to_string()))
    }

    fn create(&self, record: ResumeRecord) -> Result<String, RepositoryError> {
        let id = Uuid::new_v4().to_string();
        self.records.write().insert(id.clone(), record);
        Ok(id)
    }

    fn update(&self, user_id: &str, record: ResumeRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.write();
        let slot = records
            .get_mut(user_id)
            .ok_or_else(|| RepositoryError::NotFound(user_id.to_string()))?;
        *slot = record;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Profile;

    #[test]
    fn create_then_get_round_trips() {
        let repository = InMemoryRepository::new();
        let record = ResumeRecord::new(Profile::new("Jane Doe"));
        let id = repository.create(record.clone()).unwrap();

        assert_eq!(repository.get(&id).unwrap(), record);
        assert_eq!(repository.len(), 1);
    }

    #[test]
    fn ids_are_unique() {
        let repository = InMemoryRepository::new();
        let first = repository.create(ResumeRecord::default()).unwrap();
        let second = repository.create(ResumeRecord::default()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn update_replaces_existing_record() {
        let repository = InMemoryRepository::new();
        let id = repository.create(ResumeRecord::new(Profile::new("Old"))).unwrap();
        repository
            .update(&id, ResumeRecord::new(Profile::new("New")))
            .unwrap();

        let stored = repository.get(&id).unwrap();
        assert_eq!(stored.profile.full_name.as_deref(), Some("New"));
    }

    #[test]
    fn unknown_user_is_not_found() {
        let repository = InMemoryRepository::new();
        assert!(matches!(
            repository.get("missing"),
            Err(RepositoryError::NotFound(id)) if id == "missing"
        ));
        assert!(matches!(
            repository.update("missing", ResumeRecord::default()),
            Err(RepositoryError::NotFound(_))
        ));
        assert!(repository.is_empty());
    }
}
