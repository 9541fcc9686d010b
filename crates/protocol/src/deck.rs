use serde::{Deserialize, Serialize};

/// The canonical deck IR that the content document parses into.
///
/// This is the single representation shared by the view transforms, the
/// navigation state, and the export pipeline:
///
/// ```text
///   content.json ──▶ Deck ──▶ View Transform ──▶ RenderCommand[] ──▶ Renderer
///                   (this)     (one section        (DrawRect,         (TUI,
///                               per slide)          DrawText…)         SVG,
///                                                                     PDF)
/// ```
///
/// # Design principles
///
/// 1. **Loaded once, immutable after** — nothing mutates a deck post-parse.
/// 2. **One layout tag per slide** — the body is an internally tagged enum,
///    so exactly one layout's fields can be present.
/// 3. **Tolerant of unknown layouts** — an unrecognized tag deserializes to
///    [`SlideBody::Unknown`] instead of failing the whole deck; such slides
///    render headline/subheadline only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub meta: DeckMeta,
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Number of slides in deck order.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// Deck-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckMeta {
    /// Presentation title, shown in the viewer chrome.
    pub title: String,
}

/// One logical unit of content: a headline, an optional subheadline, and a
/// layout-tagged body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<String>,
    #[serde(flatten)]
    pub body: SlideBody,
}

impl Slide {
    pub fn layout(&self) -> LayoutTag {
        self.body.tag()
    }
}

/// The layout-discriminated body of a slide.
///
/// The discriminator lives in the content document's `"type"` field,
/// alongside the common fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SlideBody {
    /// No body beyond headline/subheadline.
    #[serde(rename = "plain")]
    Plain,
    /// A single bulleted list.
    #[serde(rename = "bulleted")]
    Bulleted {
        #[serde(default)]
        bullets: Vec<String>,
    },
    /// Two side-by-side panels, each a titled bulleted list.
    #[serde(rename = "beforeAfter")]
    BeforeAfter { left: Panel, right: Panel },
    /// Any tag this version does not recognize. Renders headline only.
    #[serde(other, rename = "unknown")]
    Unknown,
}

impl SlideBody {
    pub fn tag(&self) -> LayoutTag {
        match self {
            Self::Plain => LayoutTag::Plain,
            Self::Bulleted { .. } => LayoutTag::Bulleted,
            Self::BeforeAfter { .. } => LayoutTag::BeforeAfter,
            Self::Unknown => LayoutTag::Unknown,
        }
    }
}

/// One panel of a before/after comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// The layout discriminator, detached from the body payload — used for
/// section class names and dispatch without borrowing the slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutTag {
    Plain,
    Bulleted,
    BeforeAfter,
    Unknown,
}

impl LayoutTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Bulleted => "bulleted",
            Self::BeforeAfter => "beforeAfter",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for LayoutTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_slide() {
        let json = r#"{"type": "plain", "headline": "Hi"}"#;
        let slide: Slide = serde_json::from_str(json).expect("parse");
        assert_eq!(slide.headline, "Hi");
        assert!(slide.subheadline.is_none());
        assert_eq!(slide.layout(), LayoutTag::Plain);
    }

    #[test]
    fn parses_bulleted_slide() {
        let json = r#"{
            "type": "bulleted",
            "headline": "Why now",
            "subheadline": "Three reasons",
            "bullets": ["fast", "cheap"]
        }"#;
        let slide: Slide = serde_json::from_str(json).expect("parse");
        assert_eq!(slide.subheadline.as_deref(), Some("Three reasons"));
        match slide.body {
            SlideBody::Bulleted { ref bullets } => assert_eq!(bullets.len(), 2),
            ref other => panic!("wrong layout: {other:?}"),
        }
    }

    #[test]
    fn bulleted_bullets_default_to_empty() {
        let json = r#"{"type": "bulleted", "headline": "Sparse"}"#;
        let slide: Slide = serde_json::from_str(json).expect("parse");
        match slide.body {
            SlideBody::Bulleted { ref bullets } => assert!(bullets.is_empty()),
            ref other => panic!("wrong layout: {other:?}"),
        }
    }

    #[test]
    fn parses_before_after_slide() {
        let json = r#"{
            "type": "beforeAfter",
            "headline": "Old vs new",
            "left": {"title": "Old", "bullets": ["slow"]},
            "right": {"title": "New", "bullets": ["fast", "cheap"]}
        }"#;
        let slide: Slide = serde_json::from_str(json).expect("parse");
        match slide.body {
            SlideBody::BeforeAfter {
                ref left,
                ref right,
            } => {
                assert_eq!(left.title, "Old");
                assert_eq!(left.bullets.len(), 1);
                assert_eq!(right.bullets.len(), 2);
            }
            ref other => panic!("wrong layout: {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_does_not_fail() {
        let json = r#"{"type": "pie-chart", "headline": "Q3"}"#;
        let slide: Slide = serde_json::from_str(json).expect("parse");
        assert_eq!(slide.layout(), LayoutTag::Unknown);
        assert_eq!(slide.headline, "Q3");
    }

    #[test]
    fn deck_roundtrip() {
        let json = r#"{
            "meta": {"title": "Demo"},
            "slides": [
                {"type": "plain", "headline": "Hi"},
                {"type": "bulleted", "headline": "List", "bullets": ["a"]}
            ]
        }"#;
        let deck: Deck = serde_json::from_str(json).expect("parse");
        assert_eq!(deck.meta.title, "Demo");
        assert_eq!(deck.slide_count(), 2);

        let back = serde_json::to_string(&deck).expect("serialize");
        let deck2: Deck = serde_json::from_str(&back).expect("reparse");
        assert_eq!(deck2.slide_count(), 2);
        assert_eq!(deck2.slides[1].layout(), LayoutTag::Bulleted);
    }
}
