//! Family tree use-case service.
//!
//! # Responsibility
//! - Fetch the family, index it and keep the current person map.
//! - Synthesize the description and hand it to a renderer.
//! - Route editor saves to the store and refetch afterwards.
//!
//! # Invariants
//! - The person map is replaced in one assignment, only after a successful
//!   fetch; a failed fetch leaves the previous map in place.
//! - `loading` is set by `begin_fetch` and cleared by `complete_fetch`,
//!   whatever the outcome.

use crate::editor::{Editor, EditorError};
use crate::graph::{synthesize_with_report, ChartOptions, Synthesis};
use crate::model::family::{index_people, PersonMap};
use crate::model::person::{Person, PersonId};
use crate::render::DiagramRenderer;
use crate::repo::person_repo::{PersonStore, RepoResult};
use crate::service::tree_view::TreeView;
use log::{error, info, warn};
use std::time::Instant;

/// Service facade over one person store.
pub struct FamilyTreeService<S: PersonStore> {
    store: S,
    people: PersonMap,
    options: ChartOptions,
    loading: bool,
    fetch_started_at: Option<Instant>,
}

impl<S: PersonStore> FamilyTreeService<S> {
    /// Creates a service with an empty person map. Call `refresh` to load.
    pub fn new(store: S, options: ChartOptions) -> Self {
        Self {
            store,
            people: PersonMap::new(),
            options,
            loading: false,
            fetch_started_at: None,
        }
    }

    /// Refetches every row and rebuilds the person map.
    ///
    /// Returns the number of indexed people.
    pub fn refresh(&mut self) -> RepoResult<usize> {
        self.begin_fetch();
        let fetched = self.store.fetch_all();
        self.complete_fetch(fetched)
    }

    /// Marks a fetch as in flight.
    ///
    /// Shells that fetch off the UI thread call this, run the fetch, then
    /// hand the result to `complete_fetch`. `refresh` does both in one call.
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.fetch_started_at = Some(Instant::now());
    }

    /// Applies a finished fetch and clears `loading`.
    ///
    /// On success the person map is replaced; on failure the previous map
    /// stays and the error is returned.
    pub fn complete_fetch(&mut self, fetched: RepoResult<Vec<Person>>) -> RepoResult<usize> {
        let duration_ms = self
            .fetch_started_at
            .take()
            .map_or(0, |started_at| started_at.elapsed().as_millis());
        self.loading = false;

        match fetched {
            Ok(rows) => {
                self.people = index_people(rows);
                info!(
                    "event=family_fetch module=service status=ok people={} duration_ms={}",
                    self.people.len(),
                    duration_ms
                );
                Ok(self.people.len())
            }
            Err(err) => {
                error!(
                    "event=family_fetch module=service status=error kept_people={} duration_ms={} error={}",
                    self.people.len(),
                    duration_ms,
                    err
                );
                Err(err)
            }
        }
    }

    /// Saves the editor form, then refetches.
    ///
    /// A refetch failure after a successful write is logged, not returned:
    /// the write itself went through.
    pub fn save(&mut self, editor: &mut Editor) -> Result<PersonId, EditorError> {
        let id = editor.save(&mut self.store)?;
        if let Err(err) = self.refresh() {
            warn!(
                "event=family_refetch module=service status=error saved_id={} error={}",
                id, err
            );
        }
        Ok(id)
    }

    /// Synthesizes the current map.
    pub fn synthesis(&self) -> Synthesis {
        synthesize_with_report(&self.people, &self.options)
    }

    pub fn description(&self) -> String {
        self.synthesis().description
    }

    /// Renders the current map into `view`.
    ///
    /// Returns `None` while the map is empty. Renderer failures keep the
    /// previously shown surface.
    pub fn render<'v, R: DiagramRenderer>(
        &self,
        view: &'v mut TreeView<R>,
    ) -> Option<&'v R::Surface> {
        if self.people.is_empty() {
            return None;
        }
        view.show(&self.description())
    }

    pub fn people(&self) -> &PersonMap {
        &self.people
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.get(id)
    }

    /// True between `begin_fetch` and `complete_fetch`.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
