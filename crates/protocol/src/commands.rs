use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The view transform emits a `Vec<RenderCommand>` per slide section, in
/// section-local coordinates within the 1920×1080 design space. Renderers
/// consume the list sequentially — each command carries all the data it
/// needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally with a border.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        reveal: RevealStage,
    },

    /// Draw a text string at a position.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
        reveal: RevealStage,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Begin a logical group (a section, a list, a panel). Renderers may use
    /// this for layer separation; tests use it to assert structure.
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

impl RenderCommand {
    /// The reveal stage gating this command, if it participates in the
    /// entrance stagger. Lines and group markers are structural and always
    /// visible.
    pub fn reveal(&self) -> RevealStage {
        match self {
            Self::DrawRect { reveal, .. } | Self::DrawText { reveal, .. } => *reveal,
            _ => RevealStage::Lead,
        }
    }
}

/// Entrance-stagger marker for a command within its section.
///
/// When a section activates, renderers reveal `Lead` content first, then
/// `Second`, then `Trail` — headline, subheadline, body. The export
/// pipeline captures sections with every stage settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RevealStage {
    Lead,
    Second,
    Trail,
}

impl RevealStage {
    /// Position of this stage in the entrance order (0-based).
    pub fn order(self) -> u8 {
        match self {
            Self::Lead => 0,
            Self::Second => 1,
            Self::Trail => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}
