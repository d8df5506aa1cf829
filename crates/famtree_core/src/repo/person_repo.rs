//! Person store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide `fetch_all` / `insert` / `update` over the `family_members` table.
//! - Allocate ids for inserted rows.
//!
//! # Invariants
//! - `insert` never reuses an id; ids are UUID v4 text.
//! - `update` replaces every field of the row.
//! - A row with unreadable `parents` is still returned, with no parents,
//!   so one bad row does not hide the rest of the family.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::person::{ids_from_json, Person, PersonDraft, PersonId, PersonValidationError};
use log::warn;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    name,
    birth,
    death,
    image_url,
    spouse,
    parents
FROM family_members";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error for person reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Validation(PersonValidationError),
    Db(DbError),
    NotFound(PersonId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid person data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Bulk-read and write-back interface of the family table.
pub trait PersonStore {
    /// Returns every stored row.
    fn fetch_all(&self) -> RepoResult<Vec<Person>>;
    /// Stores a new person and returns the allocated id.
    fn insert(&mut self, draft: &PersonDraft) -> RepoResult<PersonId>;
    /// Replaces all fields of an existing person.
    fn update(&mut self, id: &str, draft: &PersonDraft) -> RepoResult<()>;
}

impl<S: PersonStore + ?Sized> PersonStore for &mut S {
    fn fetch_all(&self) -> RepoResult<Vec<Person>> {
        (**self).fetch_all()
    }

    fn insert(&mut self, draft: &PersonDraft) -> RepoResult<PersonId> {
        (**self).insert(draft)
    }

    fn update(&mut self, id: &str, draft: &PersonDraft) -> RepoResult<()> {
        (**self).update(id, draft)
    }
}

/// SQLite-backed person store.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    ///
    /// # Errors
    /// - `Db(UnsupportedSchemaVersion)` when the schema is newer than this build.
    /// - `InvalidData` when the schema has not been migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        let latest = latest_version();
        if version > latest {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: version,
                latest_supported: latest,
            }
            .into());
        }
        if version < latest {
            return Err(RepoError::InvalidData(format!(
                "family schema at version {version}, expected {latest}; open it with open_db"
            )));
        }
        Ok(Self { conn })
    }
}

impl PersonStore for SqlitePersonRepository<'_> {
    fn fetch_all(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(&format!("{PERSON_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut people = Vec::new();

        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        Ok(people)
    }

    fn insert(&mut self, draft: &PersonDraft) -> RepoResult<PersonId> {
        draft.validate(None)?;

        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO family_members (
                id,
                name,
                birth,
                death,
                image_url,
                spouse,
                parents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                id.as_str(),
                draft.name.as_str(),
                draft.birth.as_deref(),
                draft.death.as_deref(),
                draft.image_url.as_deref(),
                draft.spouse.as_deref(),
                parents_to_db(&draft.parents)?,
            ],
        )?;

        Ok(id)
    }

    fn update(&mut self, id: &str, draft: &PersonDraft) -> RepoResult<()> {
        draft.validate(Some(id))?;

        let changed = self.conn.execute(
            "UPDATE family_members
             SET
                name = ?1,
                birth = ?2,
                death = ?3,
                image_url = ?4,
                spouse = ?5,
                parents = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?7;",
            params![
                draft.name.as_str(),
                draft.birth.as_deref(),
                draft.death.as_deref(),
                draft.image_url.as_deref(),
                draft.spouse.as_deref(),
                parents_to_db(&draft.parents)?,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let id: String = row.get("id")?;
    let parents_text: String = row.get("parents")?;
    let parents = match ids_from_json(&parents_text) {
        Ok(parents) => parents,
        Err(err) => {
            warn!(
                "event=person_read module=repo status=degraded id={} field=parents error={}",
                id, err
            );
            Vec::new()
        }
    };

    Ok(Person {
        id,
        name: row.get("name")?,
        birth: row.get("birth")?,
        death: row.get("death")?,
        image_url: row.get("image_url")?,
        spouse: row.get("spouse")?,
        parents,
    })
}

fn parents_to_db(parents: &[PersonId]) -> RepoResult<String> {
    serde_json::to_string(parents)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode parents: {err}")))
}
