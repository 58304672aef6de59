//! Status bar rendering with keybindings and state indicators

use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// What the status bar shows besides the snapshot
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    /// A pending yes/no question replaces the message
    pub prompt: Option<&'a str>,
    pub inserting: bool,
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, snapshot: &Snapshot, data: &StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut step_text = format!(" Step {}", snapshot.step);
    if snapshot.cached_ahead() > 0 {
        step_text.push_str(&format!(" (+{})", snapshot.cached_ahead()));
    }
    if let Some(op) = snapshot.current_op() {
        step_text.push_str(&format!(" · {:?}", op));
    }
    step_text.push(' ');

    let badge_bg = if data.prompt.is_some() {
        DEFAULT_THEME.secondary
    } else if snapshot.terminated {
        DEFAULT_THEME.error
    } else {
        DEFAULT_THEME.primary
    };

    let (message, message_fg) = match data.prompt {
        Some(prompt) => (format!(" {} (y/n) ", prompt), DEFAULT_THEME.secondary),
        None => (format!(" {} ", data.message), DEFAULT_THEME.fg),
    };

    let left_spans = vec![
        Span::styled(
            step_text,
            Style::default()
                .bg(badge_bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            message,
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(message_fg),
        ),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            .alignment(Alignment::Left),
        layout[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut bindings: Vec<(&str, &str)> = if data.inserting {
        vec![("Esc", "done")]
    } else {
        vec![("←/→", "step"), ("⎵", "run")]
    };
    if !data.inserting {
        if snapshot.fast_forward {
            bindings.push(("f", "ff"));
        }
        let edit = if snapshot.state.grid.is_some() { "↵" } else { "i" };
        bindings.extend([("r", "reset"), (edit, "edit"), ("Tab", "lang"), ("q", "quit")]);
    }

    let mut right_spans = Vec::new();
    for (i, (key, desc)) in bindings.iter().enumerate() {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(format!(" {} ", key), key_style));
        right_spans.push(Span::styled(format!(" {} ", desc), desc_style));
    }

    let indicator_bg = match (snapshot.terminated, snapshot.paused) {
        (true, _) => DEFAULT_THEME.error,
        (false, false) => DEFAULT_THEME.secondary,
        (false, true) => DEFAULT_THEME.success,
    };
    let indicator = match snapshot.interval {
        Some(interval) if !snapshot.terminated => {
            format!(" ▶ {} {}ms ", snapshot.run_label(), interval.as_millis())
        }
        _ => format!(" {} ", snapshot.run_label()),
    };
    right_spans.push(Span::styled("│", sep_style));
    right_spans.push(Span::styled(
        indicator,
        Style::default()
            .bg(indicator_bg)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    ));

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            .alignment(Alignment::Right),
        layout[1],
    );
}
