//! In-memory person store.
//!
//! Backs local-only editing sessions (nothing persisted) and tests.

use crate::model::family::sample_people;
use crate::model::person::{Person, PersonDraft, PersonId};
use crate::repo::person_repo::{PersonStore, RepoError, RepoResult};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Person store kept entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersonStore {
    rows: BTreeMap<PersonId, Person>,
}

impl InMemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given rows, as if fetched from a table.
    pub fn with_rows(rows: impl IntoIterator<Item = Person>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|person| (person.id.clone(), person))
                .collect(),
        }
    }

    /// Creates a store seeded with the sample family.
    pub fn with_sample() -> Self {
        Self::with_rows(sample_people())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl PersonStore for InMemoryPersonStore {
    fn fetch_all(&self) -> RepoResult<Vec<Person>> {
        Ok(self.rows.values().cloned().collect())
    }

    fn insert(&mut self, draft: &PersonDraft) -> RepoResult<PersonId> {
        draft.validate(None)?;
        let id = Uuid::new_v4().to_string();
        self.rows.insert(id.clone(), Person::from_draft(id.as_str(), draft));
        Ok(id)
    }

    fn update(&mut self, id: &str, draft: &PersonDraft) -> RepoResult<()> {
        draft.validate(Some(id))?;
        match self.rows.get_mut(id) {
            Some(row) => {
                *row = Person::from_draft(id, draft);
                Ok(())
            }
            None => Err(RepoError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryPersonStore;
    use crate::model::person::PersonDraft;
    use crate::repo::person_repo::{PersonStore, RepoError};

    #[test]
    fn insert_allocates_distinct_ids() {
        let mut store = InMemoryPersonStore::new();
        let a = store.insert(&PersonDraft::named("A")).expect("insert a");
        let b = store.insert(&PersonDraft::named("A")).expect("insert b");
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = InMemoryPersonStore::with_sample();
        let err = store
            .update("missing", &PersonDraft::named("X"))
            .expect_err("unknown id must fail");
        assert!(matches!(err, RepoError::NotFound(id) if id == "missing"));
    }

    #[test]
    fn update_replaces_the_whole_row() {
        let mut store = InMemoryPersonStore::with_sample();
        store
            .update("2", &PersonDraft::named("Renamed"))
            .expect("update sample row");
        let rows = store.fetch_all().expect("fetch");
        let row = rows.iter().find(|p| p.id == "2").expect("row 2");
        assert_eq!(row.name, "Renamed");
        assert!(row.parents.is_empty());
        assert_eq!(row.birth, None);
    }
}
