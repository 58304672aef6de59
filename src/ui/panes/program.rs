//! Program pane rendering
//!
//! Text languages show the normalized instruction stream wrapped to the pane
//! width, with the instruction cursor highlighted. While the user is typing the
//! raw source is shown instead. Grid languages show one cell per
//! [`GRID_CELL_WIDTH`] columns, with the execution cursor and the edit
//! selection highlighted in different colors.

use crate::config::GRID_CELL_WIDTH;
use crate::grid::{GridDims, BLANK};
use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Everything the program pane draws
pub struct ProgramRenderData<'a> {
    pub snapshot: &'a Snapshot,
    /// Raw source being typed (insert mode)
    pub source: Option<&'a str>,
    /// Selected grid cell
    pub selection: Option<usize>,
    pub is_focused: bool,
}

fn block(title: String, is_focused: bool) -> Block<'static> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Area inside the pane border
pub fn inner_area(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Largest grid that fits inside `inner`
pub fn grid_fit(inner: Rect) -> GridDims {
    GridDims::new(
        usize::from(inner.height).max(1),
        usize::from(inner.width / GRID_CELL_WIDTH).max(1),
    )
}

/// Grid cell under a terminal position, if any
pub fn cell_at(inner: Rect, dims: GridDims, column: u16, row: u16) -> Option<usize> {
    if column < inner.x || row < inner.y {
        return None;
    }
    let col = usize::from((column - inner.x) / GRID_CELL_WIDTH);
    let row = usize::from(row - inner.y);
    (col < dims.cols && row < dims.rows).then(|| row * dims.cols + col)
}

/// First visible row so that `target` stays on screen
fn scroll_to(target: usize, visible: usize) -> usize {
    target.saturating_sub(visible.saturating_sub(1))
}

fn cell_style(is_cursor: bool, is_selected: bool, ch: char) -> Style {
    if is_selected {
        Style::default()
            .bg(DEFAULT_THEME.selection_bg)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else if is_cursor {
        Style::default()
            .bg(DEFAULT_THEME.cursor_bg)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else if ch == BLANK {
        Style::default().fg(DEFAULT_THEME.comment)
    } else if ch.is_ascii_digit() {
        Style::default().fg(DEFAULT_THEME.number)
    } else {
        Style::default().fg(DEFAULT_THEME.opcode)
    }
}

fn grid_lines(data: &ProgramRenderData, dims: GridDims) -> Vec<Line<'static>> {
    let code = &data.snapshot.state.code;
    let cursor = data.snapshot.state.cursor;

    (0..dims.rows)
        .map(|r| {
            let spans: Vec<Span> = (0..dims.cols)
                .flat_map(|c| {
                    let index = r * dims.cols + c;
                    let ch = code.get(index).copied().unwrap_or(BLANK);
                    let glyph = if ch == BLANK { '·' } else { ch };
                    let style =
                        cell_style(cursor == Some(index), data.selection == Some(index), ch);
                    [
                        Span::styled(glyph.to_string(), style),
                        Span::raw(" "),
                    ]
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn text_lines(data: &ProgramRenderData, width: usize) -> (Vec<Line<'static>>, usize) {
    let code = &data.snapshot.state.code;
    let cursor = data.snapshot.state.cursor;
    let width = width.max(1);

    // one extra cell so a cursor past the last instruction is still visible
    let cells: Vec<(char, bool)> = code
        .iter()
        .copied()
        .chain(std::iter::once(' '))
        .enumerate()
        .map(|(i, ch)| (ch, cursor == Some(i)))
        .collect();

    let cursor_line = cursor.map(|c| c / width).unwrap_or(0);
    let lines = cells
        .chunks(width)
        .map(|chunk| {
            let spans: Vec<Span> = chunk
                .iter()
                .map(|&(ch, is_cursor)| Span::styled(ch.to_string(), cell_style(is_cursor, false, ch)))
                .collect();
            Line::from(spans)
        })
        .collect();

    (lines, cursor_line)
}

fn source_lines(source: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = source
        .split('\n')
        .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(DEFAULT_THEME.fg))))
        .collect();

    let caret = Span::styled(" ", Style::default().bg(DEFAULT_THEME.fg));
    if let Some(last) = lines.last_mut() {
        last.spans.push(caret);
    }
    lines
}

/// Render the program pane
pub fn render_program_pane(frame: &mut Frame, area: Rect, data: &ProgramRenderData) {
    let inner = inner_area(area);
    let visible = usize::from(inner.height).max(1);
    let snapshot = data.snapshot;

    let (title, lines, focus_line) = match (data.source, snapshot.state.grid) {
        (Some(source), _) => {
            let lines = source_lines(source);
            let last = lines.len().saturating_sub(1);
            (format!(" {} [INSERT] ", snapshot.name), lines, last)
        }
        (None, Some(dims)) => {
            let focus = data
                .selection
                .or(snapshot.state.cursor)
                .map(|index| index / dims.cols.max(1))
                .unwrap_or(0);
            (format!(" {} {} ", snapshot.name, dims), grid_lines(data, dims), focus)
        }
        (None, None) => {
            let (lines, cursor_line) = text_lines(data, usize::from(inner.width));
            (format!(" {} ", snapshot.name), lines, cursor_line)
        }
    };

    let offset = scroll_to(focus_line, visible);
    let paragraph = Paragraph::new(lines)
        .block(block(title, data.is_focused))
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_fit_uses_two_columns_per_cell() {
        let inner = Rect::new(1, 1, 21, 8);
        assert_eq!(grid_fit(inner), GridDims::new(8, 10));
        assert_eq!(grid_fit(Rect::new(0, 0, 1, 0)), GridDims::new(1, 1));
    }

    #[test]
    fn test_cell_at_maps_columns_to_cells() {
        let inner = Rect::new(1, 1, 20, 5);
        let dims = GridDims::new(3, 4);
        assert_eq!(cell_at(inner, dims, 1, 1), Some(0));
        assert_eq!(cell_at(inner, dims, 2, 1), Some(0));
        assert_eq!(cell_at(inner, dims, 3, 2), Some(5));
        assert_eq!(cell_at(inner, dims, 9, 1), None);
        assert_eq!(cell_at(inner, dims, 1, 4), None);
        assert_eq!(cell_at(inner, dims, 0, 1), None);
    }

    #[test]
    fn test_scroll_keeps_target_visible() {
        assert_eq!(scroll_to(3, 10), 0);
        assert_eq!(scroll_to(12, 10), 3);
        assert_eq!(scroll_to(5, 0), 5);
    }
}
