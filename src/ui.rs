//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the playlist widget using `ratatui`. Geometry lives in
//! `ui::layout` so mouse clicks can be mapped back onto the same areas.

mod layout;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, InputMode, Toast};
use crate::config::UiSettings;
use crate::player::Severity;

pub use layout::{Gesture, Overlays, hit_test};

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("enter", "play selected"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("H/L", "seek -/+5%"),
    ("d", "remove"),
    ("a", "add path"),
    ("s", "stop"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn status_line(app: &App) -> Line<'static> {
    let count = app.playlist.names.len();
    let tracks = Span::raw(format!("  •  {count} track(s)")).dim();

    let Some(name) = app.now_playing.clone() else {
        return Line::from(vec![Span::raw("■ Idle"), tracks]);
    };
    let (glyph, state) = if app.playing {
        ("▶", "Playing")
    } else {
        ("⏸", "Paused")
    };
    Line::from(vec![
        Span::raw(format!("{glyph} {state}: ")),
        Span::raw(name).bold(),
        tracks,
    ])
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let areas = layout::areas(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" droplist ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, areas.header);

    let status = Paragraph::new(status_line(app)).block(
        Block::bordered()
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            })
            .title(" now playing "),
    );
    frame.render_widget(status, areas.status);

    let gauge = Gauge::default()
        .block(Block::bordered().title(" progress "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(app.progress.ratio().clamp(0.0, 1.0))
        .label(format!("{} / {}", app.progress.elapsed, app.progress.total));
    frame.render_widget(gauge, areas.progress);

    draw_playlist(frame, app, areas.list);

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, areas.footer);

    if app.mode == InputMode::PathPrompt {
        draw_prompt(frame, app, areas.list);
    }
    draw_toasts(frame, app.toasts(), areas.list);
}

fn draw_playlist(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" playlist ");
    frame.render_widget(block, area);

    let (names_area, remove_area) = layout::list_columns(area);
    let total = app.playlist.names.len();
    if total == 0 {
        let hint = Paragraph::new("Drop or paste audio files here, or press [a] to add a path")
            .alignment(Alignment::Center)
            .dim()
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, layout::inner(area));
        return;
    }

    // Only build items for the visible window.
    let (start, end) =
        layout::visible_window(total, usize::from(names_area.height), app.cursor);

    let names: Vec<ListItem> = app.playlist.names[start..end]
        .iter()
        .enumerate()
        .map(|(offset, name)| {
            let index = start + offset;
            if app.playlist.active == Some(index) {
                ListItem::new(format!("▶ {name}")).bold()
            } else {
                ListItem::new(format!("  {name}"))
            }
        })
        .collect();
    let removes: Vec<ListItem> = (start..end)
        .map(|_| ListItem::new(" ✕").fg(Color::Red))
        .collect();

    let list = List::new(names).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if app.cursor >= start && app.cursor < end {
        state.select(Some(app.cursor - start));
    }
    frame.render_stateful_widget(list, names_area, &mut state);
    frame.render_widget(List::new(removes), remove_area);
}

fn draw_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let popup = layout::centered_rect_sized(64, 3, area);
    frame.render_widget(Clear, popup);
    let text = Paragraph::new(format!("{}▏", app.prompt)).block(
        Block::bordered()
            .title(" add path (enter adds, esc cancels) ")
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            }),
    );
    frame.render_widget(text, popup);
}

fn draw_toasts(frame: &mut Frame, toasts: &[Toast], area: Rect) {
    let rects = layout::toast_rects(area, toasts.len());
    for (toast, rect) in toasts.iter().rev().zip(rects) {
        frame.render_widget(Clear, rect);
        let color = severity_color(toast.severity);
        let body = Paragraph::new(toast.message.as_str())
            .block(Block::bordered().border_style(Style::default().fg(color)));
        frame.render_widget(body, rect);
    }
}
