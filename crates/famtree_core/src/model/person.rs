//! Person domain model.
//!
//! # Responsibility
//! - Define the canonical person record read from the family store.
//! - Define the write-side draft shape and its validation rules.
//!
//! # Invariants
//! - `id` is opaque, stable and unique within one store.
//! - A blank `id` marks a malformed row; such rows are never rendered.
//! - `spouse` and `parents` are references by id and may dangle.
//!
//! # See also
//! - `crate::graph::synth` for how references are resolved.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque person identifier as stored in the family table.
pub type PersonId = String;

/// One row of the family table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Person {
    /// Stable key; numeric ids from JSON exports are read as their decimal text.
    #[serde(default, deserialize_with = "de_id")]
    pub id: PersonId,
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    /// Free-text birth year.
    #[serde(default, deserialize_with = "de_opt_text")]
    pub birth: Option<String>,
    /// Free-text death year. `None` or empty means living.
    #[serde(default, deserialize_with = "de_opt_text")]
    pub death: Option<String>,
    #[serde(default, alias = "img", deserialize_with = "de_opt_text")]
    pub image_url: Option<String>,
    /// Spouse reference. One side of a marriage is enough.
    #[serde(default, deserialize_with = "de_opt_id")]
    pub spouse: Option<PersonId>,
    /// Ordered parent references. Usually zero to two entries.
    #[serde(default, deserialize_with = "de_ids")]
    pub parents: Vec<PersonId>,
}

impl Person {
    /// Creates a person with only identity and display name set.
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds a full record from a stored id and a draft.
    pub fn from_draft(id: impl Into<PersonId>, draft: &PersonDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name.clone(),
            birth: draft.birth.clone(),
            death: draft.death.clone(),
            image_url: draft.image_url.clone(),
            spouse: draft.spouse.clone(),
            parents: draft.parents.clone(),
        }
    }

    /// Returns the write-side view of this record.
    pub fn to_draft(&self) -> PersonDraft {
        PersonDraft {
            name: self.name.clone(),
            birth: self.birth.clone(),
            death: self.death.clone(),
            image_url: self.image_url.clone(),
            spouse: self.spouse.clone(),
            parents: self.parents.clone(),
        }
    }

    /// Returns whether the row carries a usable id.
    pub fn has_valid_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Returns whether no death year is recorded.
    pub fn is_living(&self) -> bool {
        self.death
            .as_deref()
            .map_or(true, |value| value.trim().is_empty())
    }
}

/// Person fields without identity, used for insert and full replace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonDraft {
    pub name: String,
    pub birth: Option<String>,
    pub death: Option<String>,
    pub image_url: Option<String>,
    pub spouse: Option<PersonId>,
    pub parents: Vec<PersonId>,
}

impl PersonDraft {
    /// Creates a draft with a display name and no relations.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Validates write invariants.
    ///
    /// `own_id` is the id the draft will be stored under, when already known
    /// (updates). Inserts pass `None` and skip self-reference checks.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is blank.
    /// - `SelfSpouse` / `SelfParent` when the draft references `own_id`.
    pub fn validate(&self, own_id: Option<&str>) -> Result<(), PersonValidationError> {
        if self.name.trim().is_empty() {
            return Err(PersonValidationError::EmptyName);
        }

        if let Some(own_id) = own_id {
            if self.spouse.as_deref() == Some(own_id) {
                return Err(PersonValidationError::SelfSpouse(own_id.to_string()));
            }
            if self.parents.iter().any(|parent| parent == own_id) {
                return Err(PersonValidationError::SelfParent(own_id.to_string()));
            }
        }

        Ok(())
    }
}

/// Write-path validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    EmptyName,
    SelfSpouse(PersonId),
    SelfParent(PersonId),
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be blank"),
            Self::SelfSpouse(id) => write!(f, "person {id} cannot be their own spouse"),
            Self::SelfParent(id) => write!(f, "person {id} cannot be their own parent"),
        }
    }
}

impl Error for PersonValidationError {}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

impl RawId {
    fn into_text(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Int(value) => value.to_string(),
        }
    }
}

/// Reads a stored JSON id array, accepting numeric and string entries.
/// `null` reads as no ids.
pub(crate) fn ids_from_json(text: &str) -> Result<Vec<PersonId>, serde_json::Error> {
    let raw: Option<Vec<RawId>> = serde_json::from_str(text)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(RawId::into_text)
        .collect())
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PersonId, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?
        .map(RawId::into_text)
        .unwrap_or_default())
}

fn de_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PersonId>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?
        .map(RawId::into_text)
        .filter(|value| !value.trim().is_empty()))
}

fn de_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<PersonId>, D::Error> {
    Ok(Option::<Vec<RawId>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(RawId::into_text)
        .collect())
}

fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Empty strings are how the hosted table spells "unset".
fn de_opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.is_empty()))
}
