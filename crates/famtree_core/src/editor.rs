//! Person editor form state machine.
//!
//! # Responsibility
//! - Hold add/edit form state explicitly instead of in UI globals.
//! - Turn form text into a validated draft and write it to the store.
//!
//! # Invariants
//! - A failed save leaves the editor open with the form untouched.
//! - A successful save closes the editor and clears the form.
//! - `parent_ids` is parsed as a comma-separated list; blanks and repeats
//!   are dropped, order is kept.

use crate::model::person::{Person, PersonDraft, PersonId};
use crate::repo::person_repo::{PersonStore, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// What the editor is currently doing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Closed,
    Adding,
    Editing(PersonId),
}

/// Editable form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Birth,
    Death,
    ImageUrl,
    SpouseId,
    ParentIds,
}

/// Raw text of the person form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonForm {
    pub name: String,
    pub birth: String,
    pub death: String,
    pub image_url: String,
    pub spouse_id: String,
    /// Comma-separated parent ids, e.g. `"1, 2"`.
    pub parent_ids: String,
}

impl PersonForm {
    /// Prefills the form from a stored person.
    pub fn from_person(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            birth: person.birth.clone().unwrap_or_default(),
            death: person.death.clone().unwrap_or_default(),
            image_url: person.image_url.clone().unwrap_or_default(),
            spouse_id: person.spouse.clone().unwrap_or_default(),
            parent_ids: person.parents.join(", "),
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Birth => &mut self.birth,
            FormField::Death => &mut self.death,
            FormField::ImageUrl => &mut self.image_url,
            FormField::SpouseId => &mut self.spouse_id,
            FormField::ParentIds => &mut self.parent_ids,
        };
        *slot = value;
    }

    /// Converts form text to a draft. Blank optional fields become `None`.
    pub fn to_draft(&self) -> PersonDraft {
        PersonDraft {
            name: self.name.trim().to_string(),
            birth: optional_text(&self.birth),
            death: optional_text(&self.death),
            image_url: optional_text(&self.image_url),
            spouse: optional_text(&self.spouse_id),
            parents: parse_id_list(&self.parent_ids),
        }
    }
}

/// Splits a comma-separated id list.
pub fn parse_id_list(text: &str) -> Vec<PersonId> {
    let mut ids: Vec<PersonId> = Vec::new();
    for id in text.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        if !ids.iter().any(|known| known == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Editor input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    OpenAdd,
    OpenEdit(Person),
    SetField(FormField, String),
    Cancel,
}

/// Save failures surfaced to the user.
#[derive(Debug)]
pub enum EditorError {
    /// Save requested while the editor is closed.
    NotOpen,
    Repo(RepoError),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOpen => write!(f, "editor is not open"),
            Self::Repo(err) => write!(f, "could not save person: {err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotOpen => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for EditorError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Add/edit modal state.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    mode: EditorMode,
    form: PersonForm,
    last_error: Option<String>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one UI event. Field edits while closed are ignored.
    pub fn apply(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::OpenAdd => {
                self.mode = EditorMode::Adding;
                self.form = PersonForm::default();
                self.last_error = None;
            }
            EditorEvent::OpenEdit(person) => {
                self.form = PersonForm::from_person(&person);
                self.mode = EditorMode::Editing(person.id);
                self.last_error = None;
            }
            EditorEvent::SetField(field, value) => {
                if self.is_open() {
                    self.form.set(field, value);
                }
            }
            EditorEvent::Cancel => self.close(),
        }
    }

    /// Writes the form to the store.
    ///
    /// Inserts in `Adding` mode, replaces the row in `Editing` mode.
    /// On failure the editor stays open, keeps its form and records the
    /// message in `last_error`.
    pub fn save<S: PersonStore>(&mut self, store: &mut S) -> Result<PersonId, EditorError> {
        let draft = self.form.to_draft();
        let result = match &self.mode {
            EditorMode::Closed => return Err(EditorError::NotOpen),
            EditorMode::Adding => store.insert(&draft),
            EditorMode::Editing(id) => store.update(id, &draft).map(|()| id.clone()),
        };

        match result {
            Ok(id) => {
                info!("event=person_save module=editor status=ok id={}", id);
                self.close();
                Ok(id)
            }
            Err(err) => {
                warn!("event=person_save module=editor status=error error={}", err);
                let err = EditorError::from(err);
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn form(&self) -> &PersonForm {
        &self.form
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    /// Modal heading.
    pub fn title(&self) -> &'static str {
        match self.mode {
            EditorMode::Editing(_) => "Edit Person",
            _ => "Add Person",
        }
    }

    /// Message of the last failed save, cleared on open and on success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn close(&mut self) {
        self.mode = EditorMode::Closed;
        self.form = PersonForm::default();
        self.last_error = None;
    }
}
