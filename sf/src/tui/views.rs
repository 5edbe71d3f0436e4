//! TUI views and rendering
//!
//! All rendering logic is contained here. The views module draws the UI
//! from AppState and records where the clickable things ended up; it never
//! changes anything else.
//!
//! The page is drawn offscreen at full height and the rows under the current
//! scroll offset are copied into the frame.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge as GaugeBar, Paragraph, Widget, Wrap};
use tracing::trace;

use super::state::{AppState, HitRegion, HitTarget, InteractionMode, indicator_area, page_area};
use crate::cards::Card;
use crate::fx::GlowStyle;
use crate::gauge::{MAX_VALUE, Slider};
use crate::page;

/// Palette
mod colors {
    use ratatui::style::Color;

    pub const BG: Color = Color::Rgb(14, 14, 22);
    pub const GLOW: (u8, u8, u8) = (124, 92, 255); // Violet
    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const ACCENT: Color = Color::Rgb(0, 255, 127); // Spring green
    pub const CTA: Color = Color::Rgb(255, 215, 0); // Gold
    pub const BACKDROP: Color = Color::Rgb(48, 48, 72);
    pub const SELECTED: Color = Color::Rgb(100, 149, 237); // Cornflower blue
    pub const DIM: Color = Color::DarkGray;
}

/// Glow radius in columns at scale 1.0
const GLOW_RADIUS: f64 = 6.0;

/// Preferred card width; the grid fits as many as the width allows
const CARD_WIDTH: u16 = 28;
const CARD_HEIGHT: u16 = 6;
const MAX_CARD_COLUMNS: u16 = 3;

/// Width of the slider label column
const SLIDER_LABEL_WIDTH: u16 = 14;

/// Offscreen page plus the clickable regions drawn into it
struct Canvas {
    buf: Buffer,
    regions: Vec<HitRegion>,
}

impl Canvas {
    fn new(area: Rect) -> Self {
        let mut buf = Buffer::empty(area);
        buf.set_style(area, Style::default().bg(colors::BG));
        Self {
            buf,
            regions: Vec::new(),
        }
    }

    fn region(&mut self, area: Rect, target: HitTarget) {
        if !area.is_empty() {
            self.regions.push(HitRegion { area, target });
        }
    }
}

/// Main render function
pub fn render(state: &mut AppState, frame: &mut Frame) {
    let area = frame.area();
    trace!(?area, active = ?state.active_section(), "render: called");
    let mut regions = Vec::new();

    let page_rect = page_area(area);
    let footer_rect = Rect::new(area.x, page_rect.bottom(), area.width, area.height.saturating_sub(page_rect.height));

    render_page(state, frame, page_rect, &mut regions);
    render_indicators(state, frame, indicator_area(area), &mut regions);
    render_footer(state, frame, footer_rect);
    render_glow(state, frame.buffer_mut(), area);

    if state.interaction_mode == InteractionMode::Help {
        render_help_overlay(frame, area);
        regions.clear();
    }

    state.hit_regions = regions;
}

/// Draw every section offscreen, then copy the visible rows
fn render_page(state: &AppState, frame: &mut Frame, area: Rect, regions: &mut Vec<HitRegion>) {
    let total = state.layout.total_height().min(f64::from(u16::MAX)) as u16;
    trace!(total, ?area, "render_page: called");
    if area.is_empty() || total == 0 {
        return;
    }

    let mut canvas = Canvas::new(Rect::new(0, 0, area.width, total));
    for section in state.layout.sections() {
        let rect = Rect::new(0, section.top as u16, area.width, section.height as u16);
        match section.id.as_str() {
            page::HERO => render_hero(state, &mut canvas, rect),
            page::ABOUT => render_about(state, &mut canvas, rect),
            page::SKILLS => render_skills(state, &mut canvas, rect),
            page::INDEX => render_index(state, &mut canvas, rect),
            _ => {}
        }
    }

    let top = state.scroll.row();
    let buf = frame.buffer_mut();
    for y in 0..area.height {
        let src_y = top.saturating_add(y);
        if src_y >= total {
            break;
        }
        for x in 0..area.width {
            if let (Some(src), Some(dst)) = (canvas.buf.cell((x, src_y)), buf.cell_mut((area.x + x, area.y + y))) {
                *dst = src.clone();
            }
        }
    }

    let visible = Rect::new(0, top, area.width, area.height);
    for region in canvas.regions {
        let clipped = region.area.intersection(visible);
        if clipped.is_empty() {
            continue;
        }
        regions.push(HitRegion {
            area: Rect::new(area.x + clipped.x, area.y + (clipped.y - top), clipped.width, clipped.height),
            target: region.target,
        });
    }
}

/// Hero screen: backdrop, name, tagline and the call-to-action
fn render_hero(state: &AppState, canvas: &mut Canvas, area: Rect) {
    trace!(?area, "render_hero: called");
    let (dx, dy) = state.shift_cells();

    // Dotted backdrop, tilted by the parallax shift
    for y in (area.y..area.bottom()).step_by(2) {
        let stagger = if (y - area.y) % 4 == 0 { 0 } else { 2 };
        for x in (area.x + stagger..area.right()).step_by(4) {
            let (sx, sy) = (i32::from(x) + dx, i32::from(y) + dy);
            if !within(area, sx, sy) {
                continue;
            }
            if let Some(cell) = canvas.buf.cell_mut((sx as u16, sy as u16)) {
                cell.set_symbol("·").set_fg(colors::BACKDROP);
            }
        }
    }

    let profile = &state.profile;
    let cta = Line::from(Span::styled(
        format!("[ {} ↓ ]", profile.cta_label),
        Style::default().fg(colors::CTA).add_modifier(Modifier::BOLD),
    ));
    let content_height = 5;
    let content_top = area.y + area.height.saturating_sub(content_height) / 2;

    let name_rect = nudge(Rect::new(area.x, content_top, area.width, 1), dx, dy, area);
    Paragraph::new(Line::from(Span::styled(
        profile.name.as_str(),
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .render(name_rect, &mut canvas.buf);

    let tagline_rect = nudge(Rect::new(area.x, content_top + 2, area.width, 1), dx, dy, area);
    Paragraph::new(profile.tagline.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .render(tagline_rect, &mut canvas.buf);

    let cta_width = (cta.width() as u16).min(area.width);
    let cta_rect = nudge(
        Rect::new(area.x + (area.width - cta_width) / 2, content_top + 4, cta_width, 1),
        dx,
        dy,
        area,
    );
    Paragraph::new(cta).render(cta_rect, &mut canvas.buf);
    canvas.region(cta_rect, HitTarget::HeroCta);

    if area.height > content_height + 4 {
        let hint = Rect::new(area.x, area.bottom() - 2, area.width, 1);
        Paragraph::new("scroll, press 1-4, or click the dots on the right")
            .alignment(Alignment::Center)
            .style(Style::default().fg(colors::DIM))
            .render(hint, &mut canvas.buf);
    }
}

/// About screen
fn render_about(state: &AppState, canvas: &mut Canvas, area: Rect) {
    trace!(?area, "render_about: called");
    let inner = area.inner(Margin {
        horizontal: 4,
        vertical: 2,
    });
    Paragraph::new(state.profile.about.as_str())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::DIM))
                .title(Span::styled(
                    format!(" {} ", page::section_title(page::ABOUT)),
                    Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
                )),
        )
        .render(inner, &mut canvas.buf);
}

/// Skills screen: card grid and the add button
fn render_skills(state: &AppState, canvas: &mut Canvas, area: Rect) {
    trace!(?area, cards = state.deck.len(), "render_skills: called");
    let inner = area.inner(Margin {
        horizontal: 2,
        vertical: 1,
    });
    if inner.height < 3 {
        return;
    }

    let header = Line::from(vec![
        Span::styled(
            page::section_title(page::SKILLS),
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  ({})", state.deck.len()), Style::default().fg(colors::DIM)),
    ]);
    Paragraph::new(header).render(Rect::new(inner.x, inner.y, inner.width, 1), &mut canvas.buf);

    let add_label = Line::from(Span::styled(
        "[ + Add skill ]",
        Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD),
    ));
    let add_rect = Rect::new(inner.x, inner.bottom() - 1, (add_label.width() as u16).min(inner.width), 1);
    Paragraph::new(add_label).render(add_rect, &mut canvas.buf);
    canvas.region(add_rect, HitTarget::AddSkill);

    let grid = Rect::new(inner.x, inner.y + 2, inner.width, inner.height.saturating_sub(4));
    let columns = (grid.width / CARD_WIDTH).clamp(1, MAX_CARD_COLUMNS);
    let card_width = grid.width / columns;
    let visible_rows = (grid.height / CARD_HEIGHT).max(1);

    // Keep the selected card's row on screen
    let selected_row = state.deck.selected() as u16 / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    for (i, card) in state.deck.cards().iter().enumerate() {
        let (row, column) = (i as u16 / columns, i as u16 % columns);
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let rect = Rect::new(
            grid.x + column * card_width,
            grid.y + (row - first_row) * CARD_HEIGHT,
            card_width.saturating_sub(1),
            CARD_HEIGHT.min(grid.height),
        );
        render_card(card, i == state.deck.selected(), &mut canvas.buf, rect);
        canvas.region(rect, HitTarget::Card(i));
    }
}

fn render_card(card: &Card, selected: bool, buf: &mut Buffer, area: Rect) {
    let border = if selected { colors::SELECTED } else { colors::DIM };
    let body = if card.expanded {
        Paragraph::new(card.description.as_str()).style(Style::default().fg(Color::White))
    } else {
        Paragraph::new("▸ expand").style(Style::default().fg(colors::DIM))
    };
    body.wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(Span::styled(
                    format!(" {} ", card.title),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
        )
        .render(area, buf);
}

/// Index screen: sliders, the average and the level
fn render_index(state: &AppState, canvas: &mut Canvas, area: Rect) {
    trace!(?area, "render_index: called");
    let inner = area.inner(Margin {
        horizontal: 4,
        vertical: 1,
    });
    if inner.height < 2 {
        return;
    }

    Paragraph::new(Span::styled(
        page::section_title(page::INDEX),
        Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
    ))
    .render(Rect::new(inner.x, inner.y, inner.width, 1), &mut canvas.buf);

    let mut y = inner.y + 2;
    for (i, slider) in state.gauge.sliders().iter().enumerate() {
        if y >= inner.bottom() {
            break;
        }
        let selected = i == state.gauge.selected();
        let track = render_slider(slider, selected, &mut canvas.buf, Rect::new(inner.x, y, inner.width, 1));
        canvas.region(track, HitTarget::SliderTrack(i));
        y += 2;
    }

    let readout = state.gauge.readout();
    if y < inner.bottom() {
        let average = Line::from(vec![
            Span::raw("Average  "),
            Span::styled(
                readout.fill_width.as_str(),
                Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(average).render(Rect::new(inner.x, y, inner.width, 1), &mut canvas.buf);
        y += 1;
    }

    // The bar needs its own row plus one for the level below it
    if y + 2 < inner.bottom() {
        GaugeBar::default()
            .gauge_style(Style::default().fg(colors::ACCENT).bg(colors::BACKDROP))
            .ratio(readout.fill_ratio())
            .label(readout.fill_width.as_str())
            .render(Rect::new(inner.x, y, inner.width, 1), &mut canvas.buf);
        y += 2;
    }

    if y < inner.bottom() {
        Paragraph::new(Span::styled(
            readout.level,
            Style::default().fg(colors::CTA).add_modifier(Modifier::ITALIC),
        ))
        .render(Rect::new(inner.x, y, inner.width, 1), &mut canvas.buf);
    }
}

/// Draw one slider row, returning the track area
fn render_slider(slider: &Slider, selected: bool, buf: &mut Buffer, area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SLIDER_LABEL_WIDTH),
            Constraint::Min(0),
            Constraint::Length(6),
        ])
        .split(area);

    let label_style = if selected {
        Style::default().fg(colors::SELECTED).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let marker = if selected { "▸ " } else { "  " };
    Paragraph::new(Span::styled(format!("{}{}", marker, slider.label), label_style)).render(chunks[0], buf);

    let track = chunks[1];
    let span = track.width.saturating_sub(1);
    let knob = (f64::from(slider.value) * f64::from(span) / f64::from(MAX_VALUE)).round() as u16;
    let spans: Vec<Span> = (0..track.width)
        .map(|c| match c.cmp(&knob) {
            std::cmp::Ordering::Less => Span::styled("━", Style::default().fg(colors::ACCENT)),
            std::cmp::Ordering::Equal => Span::styled("●", Style::default().fg(Color::White)),
            std::cmp::Ordering::Greater => Span::styled("─", Style::default().fg(colors::DIM)),
        })
        .collect();
    Paragraph::new(Line::from(spans)).render(track, buf);

    Paragraph::new(slider.output())
        .alignment(Alignment::Right)
        .render(chunks[2], buf);
    track
}

/// Indicator dots, one per navigator control
fn render_indicators(state: &AppState, frame: &mut Frame, area: Rect, regions: &mut Vec<HitRegion>) {
    let markers = state.nav.markers();
    trace!(count = markers.len(), "render_indicators: called");
    if area.is_empty() || markers.is_empty() {
        return;
    }

    let spacing = 2;
    let height = markers.len() as u16 * spacing;
    let top = area.y + area.height.saturating_sub(height) / 2;
    for (i, marker) in markers.iter().enumerate() {
        let y = top + i as u16 * spacing;
        if y >= area.bottom() {
            break;
        }
        let (symbol, style) = if marker.inert {
            ("·", Style::default().fg(colors::DIM))
        } else if marker.active {
            ("●", Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD))
        } else {
            ("○", Style::default().fg(Color::Gray))
        };
        let rect = Rect::new(area.x, y, area.width, 1);
        frame.render_widget(Paragraph::new(symbol).style(style).alignment(Alignment::Center), rect);
        if !marker.inert {
            regions.push(HitRegion {
                area: rect,
                target: HitTarget::Indicator(i),
            });
        }
    }
}

/// Render footer: prompt input or context-sensitive keybinds
fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!(?state.interaction_mode, "render_footer: called");
    if area.is_empty() {
        return;
    }

    if let InteractionMode::Prompt(prompt) = &state.interaction_mode {
        let content = Line::from(vec![
            Span::styled(
                prompt.label(),
                Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD),
            ),
            Span::raw(prompt.input()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            Span::styled("  (Enter to continue, Esc to cancel)", Style::default().fg(colors::DIM)),
        ]);
        frame.render_widget(Paragraph::new(content).block(Block::default().borders(Borders::ALL)), area);
        return;
    }

    let keybinds: Vec<(&str, &str)> = match state.active_section() {
        Some(page::HERO) => vec![("[Enter]", "Explore")],
        Some(page::SKILLS) => vec![("[←→]", "Select"), ("[Enter]", "Expand"), ("[a]", "Add")],
        Some(page::INDEX) => vec![("[Tab]", "Slider"), ("[←→]", "Adjust"), ("[a]", "Add skill")],
        _ => vec![("[j/k]", "Scroll")],
    };

    let mut left_spans = vec![Span::raw(" ")];
    for (key, action) in keybinds {
        left_spans.push(Span::styled(
            key,
            Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD),
        ));
        left_spans.push(Span::raw(format!(" {} ", action)));
    }

    let right_line = Line::from(vec![
        Span::styled("[1-4]", Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD)),
        Span::raw(" Jump "),
        Span::styled("[?]", Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD)),
        Span::raw(" Help "),
        Span::styled("[q]", Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD)),
        Span::raw(" Quit "),
    ]);

    let footer_block = Block::default().borders(Borders::ALL);
    let inner = footer_block.inner(area);
    frame.render_widget(footer_block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_line.width() as u16)])
        .split(inner);

    frame.render_widget(Paragraph::new(Line::from(left_spans)), chunks[0]);
    frame.render_widget(Paragraph::new(right_line), chunks[1]);
}

/// Tint the background around the glow position
fn render_glow(state: &AppState, buf: &mut Buffer, area: Rect) {
    let style = state.glow_style;
    let cell = state.cell;
    if !(cell.width > 0.0 && cell.height > 0.0) || !style.x.is_finite() || !style.y.is_finite() {
        return;
    }
    trace!(?style, "render_glow: called");

    let (cx, cy) = (style.x / cell.width, style.y / cell.height);
    let radius_cols = GLOW_RADIUS * style.scale;
    let radius_rows = radius_cols * cell.width / cell.height;
    if radius_cols <= 0.0 || radius_rows <= 0.0 {
        return;
    }

    let x0 = (cx - radius_cols).floor().max(f64::from(area.x)) as u16;
    let x1 = (cx + radius_cols).ceil().min(f64::from(area.right())) as u16;
    let y0 = (cy - radius_rows).floor().max(f64::from(area.y)) as u16;
    let y1 = (cy + radius_rows).ceil().min(f64::from(area.bottom())) as u16;

    for y in y0..y1 {
        for x in x0..x1 {
            let nx = (f64::from(x) + 0.5 - cx) / radius_cols;
            let ny = (f64::from(y) + 0.5 - cy) / radius_rows;
            let d = nx.hypot(ny);
            if d >= 1.0 {
                continue;
            }
            if let Some(target) = buf.cell_mut((x, y)) {
                let alpha = glow_alpha(&style, d);
                target.set_bg(blend(target.bg, colors::GLOW, alpha));
            }
        }
    }
}

/// Opacity at normalized distance `d` from the glow center
fn glow_alpha(style: &GlowStyle, d: f64) -> f64 {
    (style.opacity * (1.0 - d).powi(2)).clamp(0.0, 1.0)
}

/// Mix `over` onto `base` with the given alpha
fn blend(base: Color, over: (u8, u8, u8), alpha: f64) -> Color {
    let (r, g, b) = match base {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => match colors::BG {
            Color::Rgb(r, g, b) => (r, g, b),
            _ => (0, 0, 0),
        },
    };
    let mix = |from: u8, to: u8| (f64::from(from) + (f64::from(to) - f64::from(from)) * alpha).round() as u8;
    Color::Rgb(mix(r, over.0), mix(g, over.1), mix(b, over.2))
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    trace!("render_help_overlay: called");
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                .fg(colors::HEADER),
        )]),
        Line::from(""),
        section("Navigation"),
        key_line("j/↓ k/↑", "Scroll one row"),
        key_line("Space/PgDn", "Glide one screen down"),
        key_line("PgUp", "Glide one screen up"),
        key_line("g/G", "Glide to top / bottom"),
        key_line("1-4", "Jump to a section"),
        key_line("Enter", "Explore skills (hero)"),
        Line::from(""),
        section("Skills"),
        key_line("←/→", "Select card"),
        key_line("Enter", "Expand or collapse card"),
        key_line("a", "Add a skill"),
        Line::from(""),
        section("Index"),
        key_line("Tab/S-Tab", "Select slider"),
        key_line("←/→ +/-", "Adjust slider by 5"),
        Line::from(""),
        section("Mouse"),
        key_line("move", "Glow and tilt"),
        key_line("wheel", "Scroll"),
        key_line("click", "Dots, cards, buttons, slider tracks"),
        Line::from(""),
        key_line("?", "Toggle help"),
        key_line("q", "Quit"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (any key to close) ")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

/// Helper to create a key binding line
fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", key), Style::default().fg(colors::KEYBIND)),
        Span::raw(desc),
    ])
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    trace!(percent_x, percent_y, "centered_rect: called");
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Move `rect` by a cell offset, keeping it inside `bounds`
fn nudge(rect: Rect, dx: i32, dy: i32, bounds: Rect) -> Rect {
    let max_x = i32::from(bounds.right()) - i32::from(rect.width);
    let max_y = i32::from(bounds.bottom()) - i32::from(rect.height);
    let x = (i32::from(rect.x) + dx).clamp(i32::from(bounds.x), max_x.max(i32::from(bounds.x)));
    let y = (i32::from(rect.y) + dy).clamp(i32::from(bounds.y), max_y.max(i32::from(bounds.y)));
    Rect::new(x as u16, y as u16, rect.width, rect.height)
}

fn within(area: Rect, x: i32, y: i32) -> bool {
    x >= i32::from(area.x) && x < i32::from(area.right()) && y >= i32::from(area.y) && y < i32::from(area.bottom())
}
