//! Holder of the last successfully rendered surface.

use crate::render::DiagramRenderer;
use log::error;

/// Renderer plus the frame currently on screen.
pub struct TreeView<R: DiagramRenderer> {
    renderer: R,
    current: Option<R::Surface>,
    failures: usize,
}

impl<R: DiagramRenderer> TreeView<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            current: None,
            failures: 0,
        }
    }

    /// Renders `description`; on failure logs and keeps the prior frame.
    pub fn show(&mut self, description: &str) -> Option<&R::Surface> {
        match self.renderer.render(description) {
            Ok(surface) => self.current = Some(surface),
            Err(err) => {
                self.failures += 1;
                error!(
                    "event=tree_render module=service status=error bytes={} kept_prior_frame={} error={}",
                    description.len(),
                    self.current.is_some(),
                    err
                );
            }
        }
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&R::Surface> {
        self.current.as_ref()
    }

    /// Number of renders that failed since creation.
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
