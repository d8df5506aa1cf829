//! Id-keyed person index.
//!
//! # Responsibility
//! - Turn a flat fetch result into the map consumed by synthesis.
//! - Read JSON exports of the family table row by row.
//! - Provide the seed family used by local-only sessions.
//!
//! # Invariants
//! - Rows with a blank id are dropped.
//! - A malformed export row is dropped; the other rows still load.
//! - When two rows share an id, the later row wins.
//! - Map iteration is sorted by id, which keeps synthesis deterministic.

use crate::model::person::{Person, PersonId};
use log::warn;
use serde_json::Value;
use std::collections::BTreeMap;

/// Person records keyed by id.
pub type PersonMap = BTreeMap<PersonId, Person>;

/// Indexes fetched rows by id, skipping malformed rows.
pub fn index_people(rows: impl IntoIterator<Item = Person>) -> PersonMap {
    let mut people = PersonMap::new();
    let mut skipped = 0usize;

    for row in rows {
        if !row.has_valid_id() {
            skipped += 1;
            continue;
        }
        people.insert(row.id.clone(), row);
    }

    if skipped > 0 {
        warn!(
            "event=people_index module=model status=partial skipped_rows={} indexed={}",
            skipped,
            people.len()
        );
    }

    people
}

/// Reads a JSON array of person rows.
///
/// Rows that do not match the person shape are logged and skipped.
///
/// # Errors
/// - The text is not JSON, or not an array.
pub fn people_from_json(text: &str) -> Result<Vec<Person>, serde_json::Error> {
    let rows: Vec<Value> = serde_json::from_str(text)?;
    let total = rows.len();
    let mut people = Vec::with_capacity(total);

    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<Person>(row) {
            Ok(person) => people.push(person),
            Err(err) => warn!(
                "event=person_read module=model status=degraded row={} error={}",
                index, err
            ),
        }
    }

    if people.len() < total {
        warn!(
            "event=people_import module=model status=partial rows={} loaded={}",
            total,
            people.len()
        );
    }

    Ok(people)
}

/// Seed family shown before anything has been saved.
pub fn sample_people() -> Vec<Person> {
    let mut grandparent = Person::new("1", "Grandparent");
    grandparent.birth = Some("1950".to_string());

    let mut you = Person::new("2", "You");
    you.birth = Some("1980".to_string());
    you.parents = vec!["1".to_string()];

    vec![grandparent, you]
}
