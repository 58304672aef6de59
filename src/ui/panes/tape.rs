//! Memory pane: tape cells around the pointer, plus the register

use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};
use std::ops::Range;

/// Tape cells that fit in `capacity` slots, keeping `pointer` in view.
///
/// The window is centred on the pointer where possible and shifted to stay
/// inside the tape.
pub fn tape_window(len: usize, pointer: usize, capacity: usize) -> Range<usize> {
    if len <= capacity {
        return 0..len;
    }
    let capacity = capacity.max(1);
    let start = pointer
        .saturating_sub(capacity / 2)
        .min(len - capacity);
    start..start + capacity
}

fn cell_width(tape: &[i64]) -> usize {
    tape.iter().map(|v| v.to_string().len()).max().unwrap_or(1) + 2
}

/// Render the memory pane
pub fn render_tape_pane(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default()
        .title(" Memory ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal))
        .padding(Padding::new(1, 1, 0, 0));

    let state = &snapshot.state;
    let mut lines = Vec::new();

    if snapshot.displays.register {
        lines.push(Line::from(vec![
            Span::styled("register ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(
                state.register.to_string(),
                Style::default()
                    .fg(DEFAULT_THEME.number)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    if snapshot.displays.tape {
        let width = cell_width(&state.tape);
        let usable = usize::from(area.width.saturating_sub(4));
        let window = tape_window(state.tape.len(), state.pointer, (usable / width).max(1));

        lines.push(Line::from(vec![
            Span::styled("pointer ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(state.pointer.to_string(), Style::default().fg(DEFAULT_THEME.pointer)),
            Span::styled(
                format!("  cells {}", state.tape.len()),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
        ]));

        let cells: Vec<Span> = window
            .clone()
            .map(|i| {
                let text = format!("{:^width$}", state.tape[i], width = width);
                if i == state.pointer {
                    Span::styled(
                        text,
                        Style::default()
                            .bg(DEFAULT_THEME.pointer)
                            .fg(Color::Black)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(text, Style::default().fg(DEFAULT_THEME.fg))
                }
            })
            .collect();
        lines.push(Line::from(cells));

        if window.start > 0 || window.end < state.tape.len() {
            lines.push(Line::from(Span::styled(
                format!("showing {}..{}", window.start, window.end),
                Style::default().fg(DEFAULT_THEME.comment),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
