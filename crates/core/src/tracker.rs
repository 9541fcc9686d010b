use flowpitch_protocol::Viewport;

use crate::views::SlideSection;

/// Default fraction of a section that must be visible before it activates.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Observes section visibility and marks sections active once they cross
/// the visibility threshold.
///
/// Activation is append-only: a section that has activated stays active
/// even after it scrolls out of view. This is an entrance-animation
/// trigger, not a current-slide indicator — during fast scrolling several
/// sections may activate in one observation, and none are ever unmarked.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    threshold: f64,
    active: Vec<bool>,
}

impl ScrollTracker {
    pub fn new(section_count: usize) -> Self {
        Self::with_threshold(section_count, DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(section_count: usize, threshold: f64) -> Self {
        Self {
            threshold,
            active: vec![false; section_count],
        }
    }

    /// Observe the current viewport and mark any section whose visible
    /// ratio has reached the threshold. Returns the indices newly activated
    /// by this observation, in section order.
    ///
    /// Re-observing an already-active section is a no-op.
    pub fn observe(&mut self, viewport: &Viewport, sections: &[SlideSection]) -> Vec<usize> {
        let mut newly = Vec::new();
        for section in sections {
            let Some(slot) = self.active.get_mut(section.index) else {
                continue;
            };
            if *slot {
                continue;
            }
            if section.bounds.h <= 0.0 {
                continue;
            }
            let visible = section
                .bounds
                .vertical_overlap(viewport.scroll_top, viewport.height);
            if visible / section.bounds.h >= self.threshold {
                *slot = true;
                newly.push(section.index);
            }
        }
        newly
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }
}
