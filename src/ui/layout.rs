//! Screen geometry shared by drawing and mouse hit-testing, so a click always
//! lands on what was drawn under it.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::widgets::Block;

/// Width of the `✕` column at the right edge of the playlist.
pub const REMOVE_COLUMN_WIDTH: u16 = 3;

const TOAST_WIDTH: u16 = 48;
const TOAST_HEIGHT: u16 = 3;

/// What is painted on top of the playlist and swallows clicks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlays {
    /// Number of toasts on screen.
    pub toasts: usize,
    /// The path prompt is open.
    pub prompt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub status: Rect,
    pub progress: Rect,
    pub list: Rect,
    pub footer: Rect,
}

pub fn areas(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);
    Areas {
        header: chunks[0],
        status: chunks[1],
        progress: chunks[2],
        list: chunks[3],
        footer: chunks[4],
    }
}

/// Inside of a bordered block.
pub fn inner(area: Rect) -> Rect {
    Block::bordered().inner(area)
}

/// Split the playlist interior into the name column and the remove column.
pub fn list_columns(list: Rect) -> (Rect, Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(REMOVE_COLUMN_WIDTH),
        ])
        .split(inner(list));
    (cols[0], cols[1])
}

/// Rows `[start, end)` of a `total`-long list shown in `height` rows, keeping
/// `cursor` centered when possible.
pub fn visible_window(total: usize, height: usize, cursor: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = cursor.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Stacked toast boxes in the top-right corner of `list`, newest first.
/// Toasts that would not fit are not given a rect.
pub fn toast_rects(list: Rect, count: usize) -> Vec<Rect> {
    let width = TOAST_WIDTH.min(list.width);
    let fit = usize::from(list.height / TOAST_HEIGHT);
    (0..count.min(fit))
        .map(|i| Rect {
            x: list.x + list.width - width,
            // `i < fit`, so this stays inside `list`.
            y: list.y + TOAST_HEIGHT * i as u16,
            width,
            height: TOAST_HEIGHT,
        })
        .collect()
}

/// What a left click means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Select(usize),
    Remove(usize),
    /// Fraction of the progress bar, 0 to 1.
    Seek(f64),
}

/// Map a click at (`column`, `row`) on a screen of size `area` to a gesture.
///
/// A click in the remove column yields only `Remove`, never `Select`. Clicks
/// on a toast yield nothing, and nothing is clickable while the prompt is open.
pub fn hit_test(
    area: Rect,
    total: usize,
    cursor: usize,
    overlays: Overlays,
    column: u16,
    row: u16,
) -> Option<Gesture> {
    if overlays.prompt {
        return None;
    }
    let at = Position::new(column, row);
    let layout = areas(area);
    if toast_rects(layout.list, overlays.toasts)
        .iter()
        .any(|r| r.contains(at))
    {
        return None;
    }

    let bar = inner(layout.progress);
    if bar.contains(at) {
        let span = f64::from(bar.width.saturating_sub(1).max(1));
        let fraction = f64::from(column - bar.x) / span;
        return Some(Gesture::Seek(fraction.clamp(0.0, 1.0)));
    }

    let (names, remove) = list_columns(layout.list);
    let on_remove = remove.contains(at);
    if !on_remove && !names.contains(at) {
        return None;
    }

    let (start, end) = visible_window(total, usize::from(names.height), cursor);
    let index = start + usize::from(row - names.y);
    if index >= end {
        return None;
    }
    Some(if on_remove {
        Gesture::Remove(index)
    } else {
        Gesture::Select(index)
    })
}

/// Compute a centered rectangle with given size constrained to `r`.
pub fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}
