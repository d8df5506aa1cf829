//! Diagram renderer seam.
//!
//! # Responsibility
//! - Abstract "description text in, drawable surface out" behind a trait so
//!   synthesis and its tests never depend on a painting library.
//!
//! # Invariants
//! - Renderers report failures as `RenderError`; callers decide whether to
//!   keep the prior frame.

pub mod html;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use html::{HtmlPage, HtmlPageRenderer};

/// Turns description text into a surface.
pub trait DiagramRenderer {
    type Surface;

    fn render(&self, description: &str) -> Result<Self::Surface, RenderError>;
}

/// Renderer failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    Empty,
    TooLarge { bytes: usize, limit: usize },
    InvalidDescription(String),
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "diagram description is empty"),
            Self::TooLarge { bytes, limit } => write!(
                f,
                "diagram description is {bytes} bytes, over the {limit} byte limit"
            ),
            Self::InvalidDescription(reason) => write!(f, "invalid diagram description: {reason}"),
        }
    }
}

impl Error for RenderError {}
