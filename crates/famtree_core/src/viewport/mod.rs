//! Pan/zoom state for the rendered diagram surface.
//!
//! # Responsibility
//! - Model the affine view state and drag bookkeeping explicitly.
//! - Apply pointer and wheel events as a pure `(state, event) -> state` step.
//! - Persist and restore the view state across sessions.
//!
//! # Invariants
//! - `scale` always lies within `[min_scale, max_scale]`.
//! - Pan moves compute the absolute offset from the drag anchor, so repeated
//!   moves never accumulate drift.
//! - Pan moves outside a drag are no-ops.

pub mod controller;
pub mod storage;

use serde::{Deserialize, Serialize};

/// Default storage key of the persisted view state.
pub const DEFAULT_STORAGE_KEY: &str = "familyTreeViewport";

/// How the view state is written onto the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    #[default]
    TranslateScale,
    TranslateOnly,
}

/// Pan/zoom tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale change per wheel delta unit.
    pub zoom_sensitivity: f64,
    pub storage_key: String,
    pub transform_mode: TransformMode,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.3,
            max_scale: 2.0,
            zoom_sensitivity: 0.001,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            transform_mode: TransformMode::TranslateScale,
        }
    }
}

impl ViewportConfig {
    /// Checks bounds and key; returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_scale.is_finite() || self.min_scale <= 0.0 {
            return Err(format!("min_scale must be positive, got {}", self.min_scale));
        }
        if !self.max_scale.is_finite() || self.max_scale < self.min_scale {
            return Err(format!(
                "max_scale must be >= min_scale ({}), got {}",
                self.min_scale, self.max_scale
            ));
        }
        if !self.zoom_sensitivity.is_finite() || self.zoom_sensitivity <= 0.0 {
            return Err(format!(
                "zoom_sensitivity must be positive, got {}",
                self.zoom_sensitivity
            ));
        }
        if self.storage_key.trim().is_empty() {
            return Err("storage_key must not be empty".to_string());
        }
        Ok(())
    }

    // Unlike `f64::clamp`, never panics on inverted bounds.
    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min_scale).min(self.max_scale)
    }
}

/// Persisted affine view state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    #[serde(alias = "x")]
    pub offset_x: f64,
    #[serde(alias = "y")]
    pub offset_y: f64,
    pub scale: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewState {
    pub const IDENTITY: Self = Self {
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
    };

    /// Makes a restored state safe to use: non-finite values reset to
    /// identity and the scale is clamped.
    pub fn normalized(self, config: &ViewportConfig) -> Self {
        if !(self.offset_x.is_finite() && self.offset_y.is_finite() && self.scale.is_finite()) {
            return Self::IDENTITY;
        }
        Self {
            scale: config.clamp_scale(self.scale),
            ..self
        }
    }

    /// CSS transform for the surface.
    pub fn transform_css(&self, mode: TransformMode) -> String {
        match mode {
            TransformMode::TranslateScale => format!(
                "translate({}px, {}px) scale({})",
                self.offset_x, self.offset_y, self.scale
            ),
            TransformMode::TranslateOnly => {
                format!("translate({}px, {}px)", self.offset_x, self.offset_y)
            }
        }
    }
}

/// Transient drag bookkeeping. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    pub is_dragging: bool,
    /// Pointer position minus offset at pan start.
    pub drag_start_x: f64,
    pub drag_start_y: f64,
}

/// Full viewport state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub view: ViewState,
    pub drag: DragState,
}

/// Axis-aligned on-screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Input events understood by the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    /// Pointer down at `(x, y)`.
    PanStart { x: f64, y: f64 },
    /// Pointer moved to `(x, y)`.
    PanMove { x: f64, y: f64 },
    /// Pointer up or left the viewport.
    PanEnd,
    /// Wheel with vertical delta.
    Zoom { delta_y: f64 },
    /// Recenter once so `node` sits in the middle of `viewport`.
    CenterOn { node: Rect, viewport: Rect },
}

/// Result of one reducer step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub viewport: Viewport,
    /// Whether the surface transform must be rewritten (and persisted).
    pub apply_transform: bool,
}

/// Applies one event to the viewport.
pub fn reduce(current: Viewport, event: &ViewportEvent, config: &ViewportConfig) -> Step {
    let mut next = current;
    let apply_transform = match *event {
        ViewportEvent::PanStart { x, y } => {
            next.drag = DragState {
                is_dragging: true,
                drag_start_x: x - current.view.offset_x,
                drag_start_y: y - current.view.offset_y,
            };
            false
        }
        ViewportEvent::PanMove { x, y } => {
            if !current.drag.is_dragging {
                return Step {
                    viewport: current,
                    apply_transform: false,
                };
            }
            next.view.offset_x = x - current.drag.drag_start_x;
            next.view.offset_y = y - current.drag.drag_start_y;
            true
        }
        ViewportEvent::PanEnd => {
            next.drag.is_dragging = false;
            false
        }
        ViewportEvent::Zoom { delta_y } => {
            if delta_y.is_finite() {
                next.view.scale =
                    config.clamp_scale(current.view.scale - delta_y * config.zoom_sensitivity);
            }
            true
        }
        ViewportEvent::CenterOn { node, viewport } => {
            let (node_x, node_y) = node.center();
            let (view_x, view_y) = viewport.center();
            next.view.offset_x += view_x - node_x;
            next.view.offset_y += view_y - node_y;
            true
        }
    };

    Step {
        viewport: next,
        apply_transform,
    }
}
