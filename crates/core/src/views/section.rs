use flowpitch_protocol::{
    Panel, Point, Rect, RenderCommand, RevealStage, Slide, SlideBody, TextAlign, ThemeToken,
};

use super::{SLIDE_HEIGHT, SLIDE_WIDTH, SlideSection};

const MARGIN: f64 = 160.0;

const HEADLINE_BASELINE: f64 = 300.0;
const HEADLINE_SIZE: f64 = 84.0;
const SUBHEADLINE_BASELINE: f64 = 420.0;
const SUBHEADLINE_SIZE: f64 = 44.0;

const LIST_TOP: f64 = 560.0;
const LIST_STEP: f64 = 76.0;
const LIST_TEXT_SIZE: f64 = 36.0;
const LIST_MARKER: f64 = 16.0;

const CARD_TOP: f64 = 500.0;
const CARD_HEIGHT: f64 = 460.0;
const CARD_WIDTH: f64 = 760.0;
const CARD_GAP: f64 = 80.0;
const CARD_PAD: f64 = 48.0;
const CARD_TITLE_SIZE: f64 = 40.0;
const CARD_TEXT_SIZE: f64 = 30.0;
const CARD_LIST_STEP: f64 = 60.0;

/// Render one slide into its section.
///
/// Emission order: headline, subheadline (if present), then the
/// layout-specific body. The whole section is wrapped in a group tagged
/// with the deterministic `slide-{index}` id.
pub fn render_section(slide: &Slide, index: usize) -> SlideSection {
    let id = format!("slide-{index}");
    let mut commands = Vec::new();

    commands.push(RenderCommand::BeginGroup {
        id: id.clone(),
        label: Some(slide.headline.clone()),
    });

    commands.push(RenderCommand::DrawText {
        position: Point::new(MARGIN, HEADLINE_BASELINE),
        text: slide.headline.clone(),
        color: ThemeToken::TextPrimary,
        font_size: HEADLINE_SIZE,
        align: TextAlign::Left,
        reveal: RevealStage::Lead,
    });
    commands.push(RenderCommand::DrawLine {
        from: Point::new(MARGIN, HEADLINE_BASELINE + 48.0),
        to: Point::new(MARGIN + 320.0, HEADLINE_BASELINE + 48.0),
        color: ThemeToken::Accent,
        width: 6.0,
    });

    if let Some(sub) = &slide.subheadline {
        commands.push(RenderCommand::DrawText {
            position: Point::new(MARGIN, SUBHEADLINE_BASELINE),
            text: sub.clone(),
            color: ThemeToken::TextSecondary,
            font_size: SUBHEADLINE_SIZE,
            align: TextAlign::Left,
            reveal: RevealStage::Second,
        });
    }

    match &slide.body {
        SlideBody::Bulleted { bullets } => {
            // The list group is emitted even when it has no items.
            commands.push(RenderCommand::BeginGroup {
                id: format!("{id}-list"),
                label: None,
            });
            for (j, bullet) in bullets.iter().enumerate() {
                push_list_item(
                    &mut commands,
                    bullet,
                    MARGIN,
                    LIST_TOP + j as f64 * LIST_STEP,
                    LIST_MARKER,
                    LIST_TEXT_SIZE,
                );
            }
            commands.push(RenderCommand::EndGroup);
        }
        SlideBody::BeforeAfter { left, right } => {
            push_panel(&mut commands, &id, "left", left, MARGIN);
            push_panel(&mut commands, &id, "right", right, MARGIN + CARD_WIDTH + CARD_GAP);
        }
        // Plain slides have no body; unknown layouts fall back to the same.
        SlideBody::Plain | SlideBody::Unknown => {}
    }

    commands.push(RenderCommand::EndGroup);

    SlideSection {
        index,
        id,
        layout: slide.layout(),
        bounds: Rect::new(0.0, index as f64 * SLIDE_HEIGHT, SLIDE_WIDTH, SLIDE_HEIGHT),
        commands,
    }
}

/// A bullet marker plus its text, both revealed with the body stage.
fn push_list_item(
    commands: &mut Vec<RenderCommand>,
    text: &str,
    x: f64,
    baseline: f64,
    marker: f64,
    font_size: f64,
) {
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(x, baseline - marker * 1.4, marker, marker),
        color: ThemeToken::BulletMarker,
        border_color: None,
        reveal: RevealStage::Trail,
    });
    commands.push(RenderCommand::DrawText {
        position: Point::new(x + marker * 3.0, baseline),
        text: text.to_string(),
        color: ThemeToken::TextPrimary,
        font_size,
        align: TextAlign::Left,
        reveal: RevealStage::Trail,
    });
}

/// One before/after panel: card, title, bullets. Emitted even when the
/// panel's bullet list is empty.
fn push_panel(
    commands: &mut Vec<RenderCommand>,
    section_id: &str,
    slot: &str,
    panel: &Panel,
    x: f64,
) {
    commands.push(RenderCommand::BeginGroup {
        id: format!("{section_id}-{slot}"),
        label: Some(panel.title.clone()),
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(x, CARD_TOP, CARD_WIDTH, CARD_HEIGHT),
        color: ThemeToken::CardBackground,
        border_color: Some(ThemeToken::CardBorder),
        reveal: RevealStage::Trail,
    });
    commands.push(RenderCommand::DrawText {
        position: Point::new(x + CARD_PAD, CARD_TOP + CARD_PAD * 2.0),
        text: panel.title.clone(),
        color: ThemeToken::CardTitle,
        font_size: CARD_TITLE_SIZE,
        align: TextAlign::Left,
        reveal: RevealStage::Trail,
    });
    for (j, bullet) in panel.bullets.iter().enumerate() {
        push_list_item(
            commands,
            bullet,
            x + CARD_PAD,
            CARD_TOP + CARD_PAD * 2.0 + 80.0 + j as f64 * CARD_LIST_STEP,
            LIST_MARKER * 0.75,
            CARD_TEXT_SIZE,
        );
    }
    commands.push(RenderCommand::EndGroup);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(body: SlideBody) -> Slide {
        Slide {
            headline: "Headline".into(),
            subheadline: None,
            body,
        }
    }

    fn texts(section: &SlideSection) -> Vec<&str> {
        section
            .commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn markers(section: &SlideSection) -> usize {
        section
            .commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    RenderCommand::DrawRect {
                        color: ThemeToken::BulletMarker,
                        ..
                    }
                )
            })
            .count()
    }

    #[test]
    fn plain_slide_has_headline_and_no_list() {
        let section = render_section(&slide(SlideBody::Plain), 0);
        assert_eq!(section.id, "slide-0");
        assert_eq!(texts(&section), vec!["Headline"]);
        assert!(!section.has_group("slide-0-list"));
    }

    #[test]
    fn headline_leads_the_reveal() {
        let section = render_section(&slide(SlideBody::Plain), 0);
        let headline = section
            .commands
            .iter()
            .find(|c| matches!(c, RenderCommand::DrawText { .. }))
            .expect("headline command");
        assert_eq!(headline.reveal(), RevealStage::Lead);
    }

    #[test]
    fn subheadline_is_second_stage() {
        let mut s = slide(SlideBody::Plain);
        s.subheadline = Some("Sub".into());
        let section = render_section(&s, 2);
        let stages: Vec<_> = section
            .commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { reveal, .. } => Some(*reveal),
                _ => None,
            })
            .collect();
        assert_eq!(stages, vec![RevealStage::Lead, RevealStage::Second]);
    }

    #[test]
    fn bulleted_list_renders_each_bullet() {
        let section = render_section(
            &slide(SlideBody::Bulleted {
                bullets: vec!["one".into(), "two".into(), "three".into()],
            }),
            1,
        );
        assert!(section.has_group("slide-1-list"));
        assert_eq!(markers(&section), 3);
        assert!(texts(&section).contains(&"two"));
        // Body content reveals last.
        let trailing = section
            .commands
            .iter()
            .filter(|c| c.reveal() == RevealStage::Trail)
            .count();
        assert_eq!(trailing, 6); // marker + text per bullet
    }

    #[test]
    fn empty_bullet_list_is_present_not_omitted() {
        let section = render_section(&slide(SlideBody::Bulleted { bullets: vec![] }), 0);
        assert!(section.has_group("slide-0-list"));
        assert_eq!(markers(&section), 0);
    }

    #[test]
    fn before_after_renders_both_panels() {
        let section = render_section(
            &slide(SlideBody::BeforeAfter {
                left: Panel {
                    title: "Old".into(),
                    bullets: vec!["slow".into()],
                },
                right: Panel {
                    title: "New".into(),
                    bullets: vec!["fast".into(), "cheap".into()],
                },
            }),
            0,
        );
        assert!(section.has_group("slide-0-left"));
        assert!(section.has_group("slide-0-right"));
        assert_eq!(markers(&section), 3);
        assert!(texts(&section).contains(&"Old"));
        assert!(texts(&section).contains(&"cheap"));
    }

    #[test]
    fn panels_are_present_even_with_empty_bullets() {
        let section = render_section(
            &slide(SlideBody::BeforeAfter {
                left: Panel {
                    title: "Old".into(),
                    bullets: vec![],
                },
                right: Panel {
                    title: "New".into(),
                    bullets: vec!["fast".into()],
                },
            }),
            3,
        );
        assert!(section.has_group("slide-3-left"));
        assert!(section.has_group("slide-3-right"));
        assert_eq!(markers(&section), 1);
    }

    #[test]
    fn unknown_layout_renders_headline_only() {
        let section = render_section(&slide(SlideBody::Unknown), 0);
        assert_eq!(texts(&section), vec!["Headline"]);
        assert_eq!(markers(&section), 0);
    }

    #[test]
    fn groups_are_balanced() {
        let section = render_section(
            &slide(SlideBody::BeforeAfter {
                left: Panel {
                    title: "L".into(),
                    bullets: vec![],
                },
                right: Panel {
                    title: "R".into(),
                    bullets: vec![],
                },
            }),
            0,
        );
        let mut depth: i32 = 0;
        for cmd in &section.commands {
            match cmd {
                RenderCommand::BeginGroup { .. } => depth += 1,
                RenderCommand::EndGroup => depth -= 1,
                _ => {}
            }
            assert!(depth >= 0);
        }
        assert_eq!(depth, 0);
    }
}
