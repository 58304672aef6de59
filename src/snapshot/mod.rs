// Read-only engine snapshot for rendering

use crate::lang::{Displays, StateView};
use std::time::Duration;

/// Everything the UI needs to draw one engine, detached from the engine itself
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub name: &'static str,
    pub displays: Displays,
    pub state: StateView,
    pub paused: bool,
    pub terminated: bool,
    /// Whether the fast-forward control applies to this language
    pub fast_forward: bool,
    /// Steps taken from the seed state
    pub step: usize,
    /// Cached history entries, including steps ahead of `step`
    pub history_len: usize,
    /// Running timer interval, `None` while paused
    pub interval: Option<Duration>,
}

impl Snapshot {
    /// Instruction under the cursor
    pub fn current_op(&self) -> Option<char> {
        self.state
            .cursor
            .and_then(|cursor| self.state.code.get(cursor).copied())
    }

    /// Output split into lines, dropping the empty tail after a final newline
    pub fn output_lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self.state.output.split('\n').collect();
        if lines.last().is_some_and(|s| s.is_empty()) {
            lines.pop();
        }
        lines
    }

    /// Cached steps ahead of the cursor (reachable with `next` without recomputing)
    pub fn cached_ahead(&self) -> usize {
        self.history_len.saturating_sub(self.step + 1)
    }

    /// Short run state label for the status bar
    pub fn run_label(&self) -> &'static str {
        match (self.terminated, self.paused) {
            (true, _) => "ENDED",
            (false, true) => "PAUSED",
            (false, false) => "RUNNING",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(state: StateView) -> Snapshot {
        Snapshot {
            name: "test",
            displays: Displays::default(),
            state,
            paused: true,
            terminated: false,
            fast_forward: false,
            step: 2,
            history_len: 5,
            interval: None,
        }
    }

    #[test]
    fn test_output_lines_drop_trailing_empty() {
        let snap = snapshot(StateView {
            output: "ab\ncd\n".to_string(),
            ..StateView::default()
        });
        assert_eq!(snap.output_lines(), vec!["ab", "cd"]);
        assert_eq!(snapshot(StateView::default()).output_lines(), Vec::<&str>::new());
    }

    #[test]
    fn test_current_op_and_ahead() {
        let snap = snapshot(StateView {
            code: vec!['+', '-'],
            cursor: Some(1),
            ..StateView::default()
        });
        assert_eq!(snap.current_op(), Some('-'));
        assert_eq!(snap.cached_ahead(), 2);
        assert_eq!(snap.run_label(), "PAUSED");
    }
}
