//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.
//!
//! Feeds the raster export backend and doubles as a debugging artifact.

use flowpitch_protocol::{RenderCommand, TextAlign, ThemeToken};

/// Render a list of section-local commands as an SVG document string.
///
/// `width` and `height` define the viewBox dimensions (the 1920×1080 slide
/// design space for a full section). `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    ));

    let bg = resolve_color(ThemeToken::Background, dark);
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#,
    ));

    let mut open_groups: u32 = 0;
    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                ..
            } => {
                let fill = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" rx="6""#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                if let Some(border) = border_color {
                    let stroke = resolve_color(*border, dark);
                    svg.push_str(&format!(r#" stroke="{stroke}" stroke-width="2""#));
                }
                svg.push_str("/>");
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
                ..
            } => {
                let fill = resolve_color(*color, dark);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let weight = if *font_size >= 60.0 { "700" } else { "400" };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" font-weight="{weight}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                ));
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                ));
            }
            RenderCommand::BeginGroup { id, .. } => {
                open_groups += 1;
                svg.push_str(&format!(r#"<g id="{}">"#, escape_xml(id)));
            }
            RenderCommand::EndGroup => {
                if open_groups > 0 {
                    open_groups -= 1;
                    svg.push_str("</g>");
                }
            }
        }
    }

    // Unbalanced input still yields well-formed XML.
    for _ in 0..open_groups {
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Background => "#0a0b14",
            ThemeToken::Surface | ThemeToken::CardBackground => "#141627",
            ThemeToken::Border | ThemeToken::CardBorder => "#262a45",
            ThemeToken::TextPrimary | ThemeToken::HeaderText => "#ececf1",
            ThemeToken::TextSecondary | ThemeToken::StatusText => "#9aa0b5",
            ThemeToken::TextMuted => "#5d6277",
            ThemeToken::Accent | ThemeToken::BulletMarker => "#5468ff",
            ThemeToken::CardTitle => "#8f9bff",
            ThemeToken::HeaderBackground => "#10121f",
        }
    } else {
        match token {
            ThemeToken::Background => "#f8f9fb",
            ThemeToken::Surface | ThemeToken::CardBackground => "#ffffff",
            ThemeToken::Border | ThemeToken::CardBorder => "#d9dce6",
            ThemeToken::TextPrimary | ThemeToken::HeaderText => "#16182b",
            ThemeToken::TextSecondary | ThemeToken::StatusText => "#5a5f75",
            ThemeToken::TextMuted => "#9aa0b5",
            ThemeToken::Accent | ThemeToken::BulletMarker => "#3240c4",
            ThemeToken::CardTitle => "#3240c4",
            ThemeToken::HeaderBackground => "#e8eaf2",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{SLIDE_HEIGHT, SLIDE_WIDTH, render_section};
    use flowpitch_protocol::{Slide, SlideBody};

    #[test]
    fn basic_svg_output() {
        let section = render_section(
            &Slide {
                headline: "Launch plan".into(),
                subheadline: None,
                body: SlideBody::Plain,
            },
            0,
        );
        let svg = render_svg(&section.commands, SLIDE_WIDTH, SLIDE_HEIGHT, true);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Launch plan"));
        assert!(svg.contains("#0a0b14"));
        assert!(svg.contains(r#"<g id="slide-0">"#));
    }

    #[test]
    fn escapes_xml_entities() {
        let section = render_section(
            &Slide {
                headline: "Vec<T> & friends".into(),
                subheadline: None,
                body: SlideBody::Plain,
            },
            0,
        );
        let svg = render_svg(&section.commands, SLIDE_WIDTH, SLIDE_HEIGHT, false);
        assert!(svg.contains("Vec&lt;T&gt; &amp; friends"));
    }

    #[test]
    fn light_palette_swaps_background() {
        let svg = render_svg(&[], 100.0, 100.0, false);
        assert!(svg.contains("#f8f9fb"));
        assert!(!svg.contains("#0a0b14"));
    }

    #[test]
    fn groups_are_closed() {
        let section = render_section(
            &Slide {
                headline: "H".into(),
                subheadline: None,
                body: SlideBody::Bulleted {
                    bullets: vec!["a".into()],
                },
            },
            0,
        );
        let svg = render_svg(&section.commands, SLIDE_WIDTH, SLIDE_HEIGHT, true);
        assert_eq!(svg.matches("<g ").count(), svg.matches("</g>").count());
    }
}
