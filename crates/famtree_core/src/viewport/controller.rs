//! Viewport controller: reducer plus transform application and persistence.
//!
//! # Invariants
//! - Every applied transform is persisted under `config.storage_key`.
//! - Storage failures are logged and swallowed; the view keeps working.
//! - Restore never fails: unreadable state means identity.

use crate::viewport::storage::ViewportStorage;
use crate::viewport::{reduce, Rect, ViewState, Viewport, ViewportConfig, ViewportEvent};
use log::{debug, warn};

/// Owns viewport state and writes it through to storage.
pub struct ViewportController<S: ViewportStorage> {
    config: ViewportConfig,
    storage: S,
    viewport: Viewport,
    transform: String,
}

impl<S: ViewportStorage> ViewportController<S> {
    /// Seeds state from storage before first render.
    pub fn restore(config: ViewportConfig, storage: S) -> Self {
        let view = load_view(&storage, &config);
        let transform = view.transform_css(config.transform_mode);
        Self {
            config,
            storage,
            viewport: Viewport {
                view,
                ..Viewport::default()
            },
            transform,
        }
    }

    /// Handles one input event.
    ///
    /// Returns the new surface transform when the event changed it.
    pub fn handle(&mut self, event: ViewportEvent) -> Option<&str> {
        let step = reduce(self.viewport, &event, &self.config);
        self.viewport = step.viewport;
        if !step.apply_transform {
            return None;
        }
        self.apply_transform();
        Some(self.transform.as_str())
    }

    pub fn pan_start(&mut self, x: f64, y: f64) {
        self.handle(ViewportEvent::PanStart { x, y });
    }

    pub fn pan_move(&mut self, x: f64, y: f64) -> Option<&str> {
        self.handle(ViewportEvent::PanMove { x, y })
    }

    pub fn pan_end(&mut self) {
        self.handle(ViewportEvent::PanEnd);
    }

    pub fn zoom(&mut self, delta_y: f64) -> Option<&str> {
        self.handle(ViewportEvent::Zoom { delta_y })
    }

    pub fn center_on(&mut self, node: Rect, viewport: Rect) -> Option<&str> {
        self.handle(ViewportEvent::CenterOn { node, viewport })
    }

    /// Rewrites and persists the current transform, e.g. after a re-render.
    pub fn apply_transform(&mut self) -> &str {
        self.transform = self.viewport.view.transform_css(self.config.transform_mode);
        self.persist();
        self.transform.as_str()
    }

    pub fn view(&self) -> ViewState {
        self.viewport.view
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn transform(&self) -> &str {
        &self.transform
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.viewport.view) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    "event=viewport_persist module=viewport status=error error={}",
                    err
                );
                return;
            }
        };
        if let Err(err) = self.storage.save(&self.config.storage_key, &payload) {
            warn!(
                "event=viewport_persist module=viewport status=error key={} error={}",
                self.config.storage_key, err
            );
        }
    }
}

fn load_view<S: ViewportStorage>(storage: &S, config: &ViewportConfig) -> ViewState {
    let raw = match storage.load(&config.storage_key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return ViewState::IDENTITY,
        Err(err) => {
            warn!(
                "event=viewport_restore module=viewport status=error key={} error={}",
                config.storage_key, err
            );
            return ViewState::IDENTITY;
        }
    };

    match serde_json::from_str::<ViewState>(&raw) {
        Ok(view) => {
            debug!("event=viewport_restore module=viewport status=ok");
            view.normalized(config)
        }
        Err(err) => {
            warn!(
                "event=viewport_restore module=viewport status=degraded key={} error={}",
                config.storage_key, err
            );
            ViewState::IDENTITY
        }
    }
}
