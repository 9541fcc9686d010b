use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use flowpitch_core::export::{ExportOptions, ExportPipeline};
use flowpitch_core::navigator::{NavDirection, Navigator};
use flowpitch_core::tracker::ScrollTracker;
use flowpitch_core::views::{SLIDE_HEIGHT, SLIDE_WIDTH, SlideSection};
use flowpitch_export::{PdfAssembler, SvgRasterizer};
use flowpitch_protocol::{Deck, RenderCommand, ThemeToken, Viewport};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Block,
};

/// Ticks between entrance-reveal stages of an activated section.
const REVEAL_DELAY_TICKS: u64 = 3;
/// Fraction of the remaining distance covered per tick while easing toward
/// a scroll target.
const SCROLL_EASE: f64 = 0.25;
/// Design units scrolled per mouse wheel notch.
const WHEEL_STEP: f64 = 180.0;

fn theme_to_color(token: ThemeToken, dark: bool) -> Color {
    if dark {
        match token {
            ThemeToken::Background => Color::Rgb(0x0a, 0x0b, 0x14),
            ThemeToken::Surface | ThemeToken::CardBackground => Color::Rgb(0x14, 0x16, 0x27),
            ThemeToken::Border | ThemeToken::CardBorder => Color::Rgb(0x26, 0x2a, 0x45),
            ThemeToken::TextPrimary | ThemeToken::HeaderText => Color::Rgb(0xec, 0xec, 0xf1),
            ThemeToken::TextSecondary | ThemeToken::StatusText => Color::Rgb(0x9a, 0xa0, 0xb5),
            ThemeToken::TextMuted => Color::Rgb(0x5d, 0x62, 0x77),
            ThemeToken::Accent | ThemeToken::BulletMarker => Color::Rgb(0x54, 0x68, 0xff),
            ThemeToken::CardTitle => Color::Rgb(0x8f, 0x9b, 0xff),
            ThemeToken::HeaderBackground => Color::Rgb(0x10, 0x12, 0x1f),
        }
    } else {
        match token {
            ThemeToken::Background => Color::Rgb(0xf8, 0xf9, 0xfb),
            ThemeToken::Surface | ThemeToken::CardBackground => Color::White,
            ThemeToken::Border | ThemeToken::CardBorder => Color::Rgb(0xd9, 0xdc, 0xe6),
            ThemeToken::TextPrimary | ThemeToken::HeaderText => Color::Rgb(0x16, 0x18, 0x2b),
            ThemeToken::TextSecondary | ThemeToken::StatusText => Color::Rgb(0x5a, 0x5f, 0x75),
            ThemeToken::TextMuted => Color::Rgb(0x9a, 0xa0, 0xb5),
            ThemeToken::Accent | ThemeToken::BulletMarker => Color::Rgb(0x32, 0x40, 0xc4),
            ThemeToken::CardTitle => Color::Rgb(0x32, 0x40, 0xc4),
            ThemeToken::HeaderBackground => Color::Rgb(0xe8, 0xea, 0xf2),
        }
    }
}

struct ViewerState {
    scroll_top: f64,
    scroll_target: Option<f64>,
    tracker: ScrollTracker,
    /// Tick at which each section activated, for staging its reveal.
    activated_at: Vec<Option<u64>>,
    tick: u64,
    /// Status line content; export outcomes land here.
    status: Option<String>,
}

impl ViewerState {
    fn new(section_count: usize) -> Self {
        Self {
            scroll_top: 0.0,
            scroll_target: None,
            tracker: ScrollTracker::new(section_count),
            activated_at: vec![None; section_count],
            tick: 0,
            status: None,
        }
    }

    /// Ease toward the scroll target, snapping when close.
    fn step_scroll(&mut self) {
        if let Some(target) = self.scroll_target {
            let delta = target - self.scroll_top;
            if delta.abs() < 4.0 {
                self.scroll_top = target;
                self.scroll_target = None;
            } else {
                self.scroll_top += delta * SCROLL_EASE;
            }
        }
    }

    fn observe(&mut self, sections: &[SlideSection]) {
        let viewport = Viewport::new(self.scroll_top, SLIDE_WIDTH, SLIDE_HEIGHT);
        for index in self.tracker.observe(&viewport, sections) {
            if let Some(slot) = self.activated_at.get_mut(index) {
                *slot = Some(self.tick);
            }
        }
    }

    /// Whether a command's reveal stage has elapsed for this section.
    fn stage_visible(&self, section_index: usize, cmd: &RenderCommand) -> bool {
        match self.activated_at.get(section_index).copied().flatten() {
            Some(at) => {
                let delay = u64::from(cmd.reveal().order()) * REVEAL_DELAY_TICKS;
                self.tick.saturating_sub(at) >= delay
            }
            None => false,
        }
    }
}

/// Run the interactive viewer until the user quits.
pub fn run_viewer(
    deck: &Deck,
    sections: &[SlideSection],
    dark: bool,
    export_filename: &str,
) -> Result<()> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let navigator = Navigator::new(sections.len(), SLIDE_HEIGHT);
    let max_scroll = navigator.scroll_offset_for(sections.len().saturating_sub(1));
    let mut state = ViewerState::new(sections.len());

    loop {
        state.tick += 1;
        state.step_scroll();
        state.observe(sections);

        draw_frame(&mut terminal, deck, sections, &state, navigator, dark, false)?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Down | KeyCode::Right | KeyCode::Char(' ') => {
                        if let Some(next) = navigator.target(state.scroll_top, NavDirection::Next)
                        {
                            state.scroll_target = Some(navigator.scroll_offset_for(next));
                        }
                    }
                    KeyCode::Up | KeyCode::Left => {
                        if let Some(prev) =
                            navigator.target(state.scroll_top, NavDirection::Previous)
                        {
                            state.scroll_target = Some(navigator.scroll_offset_for(prev));
                        }
                    }
                    KeyCode::Char('e') => {
                        // Busy frame first: the trigger is unavailable for
                        // the duration of the blocking export.
                        draw_frame(&mut terminal, deck, sections, &state, navigator, dark, true)?;
                        state.status = Some(run_export(deck, sections, dark, export_filename));
                    }
                    // Every other key keeps its native (no-op) behavior.
                    _ => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => {
                        let base = state.scroll_target.unwrap_or(state.scroll_top);
                        state.scroll_target = Some((base + WHEEL_STEP).min(max_scroll));
                    }
                    MouseEventKind::ScrollUp => {
                        let base = state.scroll_target.unwrap_or(state.scroll_top);
                        state.scroll_target = Some((base - WHEEL_STEP).max(0.0));
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

/// Run one export, returning the status-line notice. Failures surface as a
/// single generic notice; the detail goes to the log only.
fn run_export(deck: &Deck, sections: &[SlideSection], dark: bool, filename: &str) -> String {
    let mut pipeline = ExportPipeline::new(SvgRasterizer::new(dark), PdfAssembler::new());
    let options = ExportOptions::deck(deck.meta.title.clone()).with_filename(filename);
    match pipeline.export(sections, &options) {
        Ok(receipt) => format!("Saved {} ({} page(s))", receipt.filename, receipt.pages),
        Err(err) => {
            log::error!("export failed: {err}");
            format!("Export failed — could not produce {filename}")
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_frame(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    deck: &Deck,
    sections: &[SlideSection],
    state: &ViewerState,
    navigator: Navigator,
    dark: bool,
    exporting: bool,
) -> Result<()> {
    let current = navigator.current_index(state.scroll_top);
    terminal.draw(|frame| {
        let area = frame.area();

        // Header
        let export_label = if exporting { "Exporting…" } else { "e export" };
        let header_area = Rect::new(0, 0, area.width, 1);
        let header = Block::default()
            .title(format!(
                " {} — {}/{} | ↑↓ space navigate | {} | q quit ",
                deck.meta.title,
                current + 1,
                sections.len().max(1),
                export_label,
            ))
            .style(
                Style::default()
                    .fg(theme_to_color(ThemeToken::HeaderText, dark))
                    .bg(theme_to_color(ThemeToken::HeaderBackground, dark)),
            );
        frame.render_widget(header, header_area);

        // Content
        let content = Rect::new(0, 1, area.width, area.height.saturating_sub(2));
        let backdrop = Block::default().style(
            Style::default().bg(theme_to_color(ThemeToken::Background, dark)),
        );
        frame.render_widget(backdrop, content);

        let buf = frame.buffer_mut();
        for section in sections {
            draw_section(buf, content, section, state, dark);
        }

        // Status line
        let status_area = Rect::new(0, area.height.saturating_sub(1), area.width, 1);
        let status_text = state.status.as_deref().unwrap_or("");
        let status = Block::default()
            .title(format!(" {status_text} "))
            .style(
                Style::default()
                    .fg(theme_to_color(ThemeToken::StatusText, dark))
                    .bg(theme_to_color(ThemeToken::HeaderBackground, dark)),
            );
        frame.render_widget(status, status_area);
    })?;
    Ok(())
}

fn draw_section(
    buf: &mut Buffer,
    content: Rect,
    section: &SlideSection,
    state: &ViewerState,
    dark: bool,
) {
    // Skip sections fully outside the viewport.
    let view_bottom = state.scroll_top + SLIDE_HEIGHT;
    if section.bounds.bottom() <= state.scroll_top || section.bounds.y >= view_bottom {
        return;
    }
    // Inactive sections hold their content back until activation.
    if !state.tracker.is_active(section.index) {
        return;
    }

    for cmd in &section.commands {
        if !state.stage_visible(section.index, cmd) {
            continue;
        }
        match cmd {
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                ..
            } => {
                let Some((col, row)) = to_cell(content, section, state, position.x, position.y)
                else {
                    continue;
                };
                let mut style = Style::default().fg(theme_to_color(*color, dark));
                if *font_size >= 60.0 {
                    style = style.add_modifier(Modifier::BOLD);
                }
                for (i, ch) in text.chars().enumerate() {
                    let x = col + i as u16;
                    if x >= content.x + content.width {
                        break;
                    }
                    buf[(x, row)].set_char(ch).set_style(style);
                }
            }
            RenderCommand::DrawRect { rect, color, .. } => {
                // Small rects (bullet markers) become a single glyph;
                // larger ones fill their cell region as a surface.
                if rect.w < 60.0 {
                    if let Some((col, row)) =
                        to_cell(content, section, state, rect.x, rect.y + rect.h)
                    {
                        buf[(col, row)]
                            .set_char('▪')
                            .set_fg(theme_to_color(*color, dark));
                    }
                } else {
                    fill_region(buf, content, section, state, rect, *color, dark);
                }
            }
            RenderCommand::DrawLine { from, to, color, .. } => {
                let Some((col, row)) = to_cell(content, section, state, from.x, from.y) else {
                    continue;
                };
                let span = ((to.x - from.x) / SLIDE_WIDTH * f64::from(content.width)) as u16;
                for i in 0..span.max(1) {
                    let x = col + i;
                    if x >= content.x + content.width {
                        break;
                    }
                    buf[(x, row)]
                        .set_char('─')
                        .set_fg(theme_to_color(*color, dark));
                }
            }
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

/// Map a section-local design coordinate to a terminal cell, or `None`
/// when it falls outside the content area.
fn to_cell(
    content: Rect,
    section: &SlideSection,
    state: &ViewerState,
    x: f64,
    y: f64,
) -> Option<(u16, u16)> {
    let rel_y = section.bounds.y + y - state.scroll_top;
    if rel_y < 0.0 || rel_y >= SLIDE_HEIGHT {
        return None;
    }
    let col = content.x + ((x / SLIDE_WIDTH) * f64::from(content.width)) as u16;
    let row = content.y + ((rel_y / SLIDE_HEIGHT) * f64::from(content.height)) as u16;
    if col >= content.x + content.width || row >= content.y + content.height {
        return None;
    }
    Some((col, row))
}

fn fill_region(
    buf: &mut Buffer,
    content: Rect,
    section: &SlideSection,
    state: &ViewerState,
    rect: &flowpitch_protocol::Rect,
    color: ThemeToken,
    dark: bool,
) {
    let bg = theme_to_color(color, dark);
    let col0 = ((rect.x / SLIDE_WIDTH) * f64::from(content.width)) as u16;
    let col1 = (((rect.x + rect.w) / SLIDE_WIDTH) * f64::from(content.width)) as u16;
    let mut y = rect.y;
    while y < rect.y + rect.h {
        if let Some((_, row)) = to_cell(content, section, state, rect.x, y) {
            for col in col0..col1.min(content.width) {
                buf[(content.x + col, row)].set_bg(bg);
            }
        }
        // One design row per terminal row.
        y += SLIDE_HEIGHT / f64::from(content.height.max(1));
    }
}
