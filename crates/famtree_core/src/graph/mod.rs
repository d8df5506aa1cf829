//! Flowchart description synthesis.
//!
//! # Responsibility
//! - Turn the id-keyed person index into flowchart description text.
//! - Own the node token and label sanitization rules.
//!
//! # Invariants
//! - Synthesis is pure: no I/O, no panics on malformed input.
//! - Emitted text only contains statements of the flowchart grammar.

pub mod sanitize;
pub mod synth;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Layout direction of the flowchart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Top down.
    #[default]
    Td,
    /// Left to right.
    Lr,
    /// Bottom to top.
    Bt,
    /// Right to left.
    Rl,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Td => "TD",
            Self::Lr => "LR",
            Self::Bt => "BT",
            Self::Rl => "RL",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TD" | "TB" => Ok(Self::Td),
            "LR" => Ok(Self::Lr),
            "BT" => Ok(Self::Bt),
            "RL" => Ok(Self::Rl),
            other => Err(format!(
                "unsupported direction `{other}`; expected TD|LR|BT|RL"
            )),
        }
    }
}

/// Style knobs for the synthesized chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub direction: Direction,
    /// Body of the `classDef person` directive.
    pub person_style: String,
    /// Body of the `classDef marriage` directive. Merge-nodes stay invisible.
    pub marriage_style: String,
    /// Embed `image_url` thumbnails in node labels.
    pub show_images: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            direction: Direction::Td,
            person_style: "fill:#fff,stroke:#b91c1c,stroke-width:2px".to_string(),
            marriage_style: "fill:none,stroke:none,width:1px,height:1px".to_string(),
            show_images: true,
        }
    }
}

pub use synth::{synthesize, synthesize_with, synthesize_with_report, Synthesis, SynthesisReport};
