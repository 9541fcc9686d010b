use flowpitch_protocol::{RenderCommand, RevealStage};

use crate::views::SlideSection;

/// A deep copy of a section staged for capture, with its entrance reveal
/// forced settled: every command is rewritten to the lead stage so the
/// rasterizer captures the final, fully-visible appearance rather than a
/// mid-transition one.
#[derive(Debug, Clone)]
pub struct StagedSection {
    section: SlideSection,
}

impl StagedSection {
    fn settled_copy(section: &SlideSection) -> Self {
        let mut copy = section.clone();
        for cmd in &mut copy.commands {
            match cmd {
                RenderCommand::DrawRect { reveal, .. }
                | RenderCommand::DrawText { reveal, .. } => *reveal = RevealStage::Lead,
                _ => {}
            }
        }
        Self { section: copy }
    }

    pub fn section(&self) -> &SlideSection {
        &self.section
    }

    /// Whether every command is in its settled (lead) stage. True by
    /// construction; exposed so capture backends can assert it.
    pub fn is_settled(&self) -> bool {
        self.section
            .commands
            .iter()
            .all(|c| c.reveal() == RevealStage::Lead)
    }
}

/// The off-screen staging area: a single slot, cleared and repopulated once
/// per export iteration.
///
/// The slot is a shared mutable resource — rasterization of slide `i + 1`
/// must not begin until slide `i`'s bitmap has been taken, which the
/// pipeline guarantees by driving `clear`/`place`/capture strictly in
/// sequence. Holding the `&StagedSection` returned by [`Stage::place`]
/// borrows the stage, so repopulating it mid-capture is rejected at
/// compile time.
#[derive(Debug, Default)]
pub struct Stage {
    slot: Option<StagedSection>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn is_clear(&self) -> bool {
        self.slot.is_none()
    }

    /// Clear the stage and place a settled copy of the section on it.
    pub fn place(&mut self, section: &SlideSection) -> &StagedSection {
        self.slot.insert(StagedSection::settled_copy(section))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::render_section;
    use flowpitch_protocol::{Slide, SlideBody};

    fn section() -> SlideSection {
        render_section(
            &Slide {
                headline: "H".into(),
                subheadline: Some("S".into()),
                body: SlideBody::Bulleted {
                    bullets: vec!["a".into()],
                },
            },
            0,
        )
    }

    #[test]
    fn placing_settles_every_stage() {
        let section = section();
        // The source section has staggered stages...
        assert!(
            section
                .commands
                .iter()
                .any(|c| c.reveal() != RevealStage::Lead)
        );

        let mut stage = Stage::new();
        let staged = stage.place(&section);
        assert!(staged.is_settled());
        // ...and is left untouched by the copy.
        assert!(
            section
                .commands
                .iter()
                .any(|c| c.reveal() != RevealStage::Lead)
        );
    }

    #[test]
    fn clear_empties_the_slot() {
        let mut stage = Stage::new();
        assert!(stage.is_clear());
        stage.place(&section());
        assert!(!stage.is_clear());
        stage.clear();
        assert!(stage.is_clear());
    }

    #[test]
    fn replacing_discards_previous_occupant() {
        let mut stage = Stage::new();
        stage.place(&section());
        let second = render_section(
            &Slide {
                headline: "Other".into(),
                subheadline: None,
                body: SlideBody::Plain,
            },
            1,
        );
        let staged = stage.place(&second);
        assert_eq!(staged.section().id, "slide-1");
    }
}
