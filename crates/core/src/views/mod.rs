pub mod section;

use flowpitch_protocol::{Deck, LayoutTag, Rect, RenderCommand};
use serde::{Deserialize, Serialize};

pub use section::render_section;

/// Width of the slide design space. Every slide is laid out on this canvas
/// and scaled by the renderer; it also fixes the export page size.
pub const SLIDE_WIDTH: f64 = 1920.0;
/// Height of the slide design space.
pub const SLIDE_HEIGHT: f64 = 1080.0;

/// One rendered slide: the retained output of the view transform.
///
/// `commands` are in section-local coordinates (origin at the section's
/// top-left); `bounds` places the section on the vertically scrolling deck
/// canvas at `y = index * SLIDE_HEIGHT`. The index doubles as the join key
/// between navigation and export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideSection {
    /// 0-based position in deck order.
    pub index: usize,
    /// Deterministic identifier, derived from the index alone.
    pub id: String,
    pub layout: LayoutTag,
    /// Placement on the scroll canvas.
    pub bounds: Rect,
    pub commands: Vec<RenderCommand>,
}

impl SlideSection {
    /// Whether this section contains a group with the given id.
    pub fn has_group(&self, group_id: &str) -> bool {
        self.commands.iter().any(|c| {
            matches!(c, RenderCommand::BeginGroup { id, .. } if id == group_id)
        })
    }
}

/// Render every slide of a deck into its section, in deck order.
///
/// Pure function of its input: output length equals input length, and ids
/// are stable across re-renders given the same deck.
pub fn render_deck(deck: &Deck) -> Vec<SlideSection> {
    deck.slides
        .iter()
        .enumerate()
        .map(|(index, slide)| render_section(slide, index))
        .collect()
}
