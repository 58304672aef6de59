//! Main TUI application state and logic

use crate::config::MAX_EVENT_WAIT;
use crate::engine::{Action, Session, StaticHost, RESET_PROMPT};
use crate::grid::{Direction as GridDirection, EditOutcome, Grid, GridDims, GridEditor, GridKey};
use crate::lang::{LanguageKind, Program, SessionOptions};
use crate::snapshot::Snapshot;
use crate::ui::panes::{self, program, ProgramRenderData, StatusRenderData};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use rustc_hash::FxHashMap;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// What key presses currently mean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Control bindings (and grid editing while a cell is selected)
    Normal,
    /// Typing into a text program
    Insert,
    /// Waiting for a y/n answer before resetting
    ConfirmReset,
}

/// Source as the user edits it
#[derive(Debug, Clone)]
enum Editor {
    Text(String),
    Grid(GridEditor),
}

impl Editor {
    fn for_program(program: &Program, is_grid: bool) -> Self {
        if is_grid {
            Editor::Grid(GridEditor::new(program.to_grid()))
        } else {
            Editor::Text(program.text().into_owned())
        }
    }

    fn selection(&self) -> Option<usize> {
        match self {
            Editor::Grid(editor) => editor.selection(),
            Editor::Text(_) => None,
        }
    }
}

/// One language: its engine, its editor, and whether its grid should be
/// re-flowed to the pane on the next frame
struct Slot {
    kind: LanguageKind,
    session: Box<dyn Session>,
    editor: Editor,
    needs_fit: bool,
}

/// The main application state
pub struct App {
    slots: Vec<Slot>,
    active: usize,

    /// Current key mode
    pub mode: Mode,

    /// Grid size that fits the program pane, per language, from the last frame
    layout_cache: FxHashMap<LanguageKind, GridDims>,

    /// Program pane interior from the last frame, for mouse hit testing
    program_inner: Rect,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create an app with one slot per language.
    ///
    /// `start` gets `program` when one is given. Grid languages without a
    /// program start blank and are sized to the pane on first draw.
    pub fn new(start: LanguageKind, program: Option<Program>, options: &SessionOptions) -> Self {
        let mut program = program;
        let slots: Vec<Slot> = LanguageKind::ALL
            .into_iter()
            .map(|kind| {
                let given = if kind == start { program.take() } else { None };
                let needs_fit = kind.is_grid() && given.is_none();
                let source = given.unwrap_or_else(|| {
                    if kind.is_grid() {
                        Program::Grid(Grid::blank(1, 1))
                    } else {
                        Program::default()
                    }
                });
                let source = match (kind.is_grid(), source) {
                    (true, Program::Text(text)) => Program::Grid(Grid::fit_text(&text)),
                    (_, source) => source,
                };
                Slot {
                    kind,
                    editor: Editor::for_program(&source, kind.is_grid()),
                    session: kind.session(source, options),
                    needs_fit,
                }
            })
            .collect();

        let active = LanguageKind::ALL
            .iter()
            .position(|&k| k == start)
            .unwrap_or(0);

        App {
            slots,
            active,
            mode: Mode::Normal,
            layout_cache: FxHashMap::default(),
            program_inner: Rect::default(),
            should_quit: false,
            status_message: String::from("Ready!"),
        }
    }

    pub fn active_language(&self) -> LanguageKind {
        self.slots[self.active].kind
    }

    pub fn snapshot(&self) -> Snapshot {
        self.slots[self.active].session.snapshot()
    }

    pub fn program(&self) -> &Program {
        self.slots[self.active].session.program()
    }

    /// Selected grid cell of the active language
    pub fn selection(&self) -> Option<usize> {
        self.slots[self.active].editor.selection()
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;
            self.apply_pending_fit();

            if self.should_quit {
                break;
            }

            // The reset prompt blocks the engine until it is answered
            if self.mode != Mode::ConfirmReset {
                let mut host = StaticHost::new(Instant::now(), false);
                self.slots[self.active].session.poll(&mut host);
            }

            if event::poll(self.event_timeout())? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key_event(key)
                    }
                    Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                    Event::Resize(width, height) => self.handle_resize(width, height),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Wait for input no longer than the next timer tick
    fn event_timeout(&self) -> Duration {
        match self.slots[self.active].session.next_deadline() {
            Some(deadline) if self.mode != Mode::ConfirmReset => deadline
                .saturating_duration_since(Instant::now())
                .min(MAX_EVENT_WAIT),
            _ => MAX_EVENT_WAIT,
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let snapshot = self.snapshot();
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        self.program_inner = program::inner_area(columns[0]);
        let slot = &self.slots[self.active];
        if slot.kind.is_grid() {
            self.layout_cache
                .insert(slot.kind, program::grid_fit(self.program_inner));
        }

        let source = match (&self.mode, &slot.editor) {
            (Mode::Insert, Editor::Text(text)) => Some(text.as_str()),
            _ => None,
        };
        panes::render_program_pane(
            frame,
            columns[0],
            &ProgramRenderData {
                snapshot: &snapshot,
                source,
                selection: slot.editor.selection(),
                is_focused: true,
            },
        );

        let show_memory = snapshot.displays.tape || snapshot.displays.register;
        let show_output = snapshot.displays.output;
        let mut output_scroll = usize::MAX;
        match (show_memory, show_output) {
            (true, true) => {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(columns[1]);
                panes::render_tape_pane(frame, rows[0], &snapshot);
                panes::render_output_pane(frame, rows[1], &snapshot, &mut output_scroll);
            }
            (false, true) => {
                panes::render_output_pane(frame, columns[1], &snapshot, &mut output_scroll)
            }
            _ => panes::render_tape_pane(frame, columns[1], &snapshot),
        }

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &snapshot,
            &StatusRenderData {
                message: &self.status_message,
                prompt: (self.mode == Mode::ConfirmReset).then_some(RESET_PROMPT),
                inserting: self.mode == Mode::Insert,
            },
        );
    }

    /// Send an action to the active engine
    fn dispatch(&mut self, action: Action) {
        let mut host = StaticHost::new(Instant::now(), false);
        self.slots[self.active].session.dispatch(action, &mut host);
    }

    fn edit(&mut self, program: Program) {
        self.dispatch(Action::Edit(program));
        self.status_message = "Edited (history cleared)".to_string();
    }

    /// Re-flow the active grid to the pane if a resize is pending
    fn apply_pending_fit(&mut self) {
        let slot = &mut self.slots[self.active];
        if !slot.needs_fit {
            return;
        }
        let Some(&dims) = self.layout_cache.get(&slot.kind) else {
            return;
        };
        slot.needs_fit = false;

        if let Editor::Grid(editor) = &mut slot.editor {
            if let EditOutcome::Changed(grid) = editor.resize(dims) {
                info!(language = %slot.kind, %dims, "grid re-flowed to fit the pane");
                let mut host = StaticHost::new(Instant::now(), false);
                slot.session
                    .dispatch(Action::Edit(Program::Grid(grid)), &mut host);
            }
        }
    }

    /// Terminal size changed: every grid is re-flowed when next shown
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "terminal resized");
        self.layout_cache.clear();
        for slot in self.slots.iter_mut().filter(|s| s.kind.is_grid()) {
            slot.needs_fit = true;
        }
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::ConfirmReset => self.handle_confirm_key(key),
            Mode::Insert => self.handle_insert_key(key),
            Mode::Normal => {
                if self.selection().is_some() && self.handle_grid_key(key) {
                    return;
                }
                self.handle_control_key(key);
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let answer = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
            _ => return,
        };
        self.mode = Mode::Normal;

        let mut host = StaticHost::new(Instant::now(), answer);
        self.slots[self.active]
            .session
            .dispatch(Action::Reset, &mut host);
        self.status_message = if answer {
            "Reset".to_string()
        } else {
            "Reset cancelled".to_string()
        };
    }

    fn handle_insert_key(&mut self, key: KeyEvent) {
        let Editor::Text(text) = &mut self.slots[self.active].editor else {
            self.mode = Mode::Normal;
            return;
        };

        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.status_message = "Ready!".to_string();
                return;
            }
            KeyCode::Enter => text.push('\n'),
            KeyCode::Backspace => {
                if text.pop().is_none() {
                    return;
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => text.push(c),
            _ => return,
        }

        let program = Program::Text(text.clone());
        self.edit(program);
    }

    /// Keys while a grid cell is selected; returns whether the key was used
    fn handle_grid_key(&mut self, key: KeyEvent) -> bool {
        let grid_key = match key.code {
            KeyCode::Up => GridKey::Arrow(GridDirection::Up),
            KeyCode::Down => GridKey::Arrow(GridDirection::Down),
            KeyCode::Left => GridKey::Arrow(GridDirection::Left),
            KeyCode::Right => GridKey::Arrow(GridDirection::Right),
            KeyCode::Backspace | KeyCode::Delete => GridKey::Erase,
            KeyCode::Esc => GridKey::Escape,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                GridKey::Char(c)
            }
            _ => return false,
        };

        let Editor::Grid(editor) = &mut self.slots[self.active].editor else {
            return false;
        };
        match editor.key(grid_key) {
            EditOutcome::Changed(grid) => self.edit(Program::Grid(grid)),
            EditOutcome::Selection(None) => self.status_message = "Ready!".to_string(),
            EditOutcome::Selection(Some(_)) | EditOutcome::Ignored => {}
        }
        true
    }

    fn handle_control_key(&mut self, key: KeyEvent) {
        let snapshot = self.snapshot();

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                if snapshot.paused {
                    self.dispatch(Action::Run);
                    self.status_message = "Running".to_string();
                } else {
                    self.dispatch(Action::Stop);
                    self.status_message = "Paused".to_string();
                }
            }
            KeyCode::Right => {
                self.dispatch(Action::Next);
                self.status_message = "Stepped forward".to_string();
            }
            KeyCode::Left => {
                self.dispatch(Action::Prev);
                self.status_message = if snapshot.step == 0 {
                    "Already at the first step".to_string()
                } else {
                    "Stepped backward".to_string()
                };
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                let n = c.to_digit(10).unwrap_or(1);
                for _ in 0..n {
                    self.dispatch(Action::Next);
                }
                self.status_message = format!("Stepped forward {} step(s)", n);
            }
            KeyCode::Char('f') | KeyCode::Char('F') => {
                if snapshot.fast_forward {
                    self.dispatch(Action::FastForward);
                    self.status_message = "Fast-forward".to_string();
                } else {
                    self.status_message = format!("{} has no fast-forward", snapshot.name);
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.mode = Mode::ConfirmReset;
            }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                if matches!(self.slots[self.active].editor, Editor::Text(_)) {
                    self.mode = Mode::Insert;
                    self.status_message = "Editing".to_string();
                }
            }
            KeyCode::Enter => {
                if let Editor::Grid(editor) = &mut self.slots[self.active].editor {
                    editor.select(snapshot.state.cursor.unwrap_or(0));
                    self.status_message = "Editing cell".to_string();
                }
            }
            KeyCode::Tab => {
                self.dispatch(Action::Stop);
                self.active = (self.active + 1) % self.slots.len();
                self.status_message = format!("Switched to {}", self.active_language());
            }
            _ => {}
        }
    }

    /// Handle mouse events: a left click selects (or deselects) a grid cell
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if self.mode != Mode::Normal {
            return;
        }
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }

        let inner = self.program_inner;
        let Editor::Grid(editor) = &mut self.slots[self.active].editor else {
            return;
        };
        if let Some(index) = program::cell_at(inner, editor.dims(), mouse.column, mouse.row) {
            editor.click(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app(kind: LanguageKind, program: &str) -> App {
        App::new(
            kind,
            Some(Program::Text(program.to_string())),
            &SessionOptions::default(),
        )
    }

    #[test]
    fn test_digit_steps_forward_n_times() {
        let mut app = app(LanguageKind::StunStep, "++++");
        press(&mut app, KeyCode::Char('3'));
        let snapshot = app.snapshot();
        assert_eq!(snapshot.step, 3);
        assert_eq!(snapshot.state.tape, vec![3]);
    }

    #[test]
    fn test_arrows_step_both_ways() {
        let mut app = app(LanguageKind::StunStep, "++");
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.snapshot().step, 1);
    }

    #[test]
    fn test_space_toggles_run() {
        let mut app = app(LanguageKind::StunStep, "+");
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.snapshot().paused);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.snapshot().paused);
    }

    #[test]
    fn test_reset_waits_for_answer() {
        let mut app = app(LanguageKind::StunStep, "++");
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.mode, Mode::ConfirmReset);

        // unrelated keys are swallowed while the prompt is open
        press(&mut app, KeyCode::Right);
        assert_eq!(app.snapshot().step, 2);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.snapshot().step, 2);

        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.snapshot().step, 0);
        assert_eq!(app.snapshot().history_len, 1);
    }

    #[test]
    fn test_fast_forward_only_where_supported() {
        let mut app = app(LanguageKind::Back, "+");
        press(&mut app, KeyCode::Char('f'));
        assert!(app.snapshot().paused);

        let mut app = self::app(LanguageKind::Suffolk, ">");
        press(&mut app, KeyCode::Char('f'));
        assert!(!app.snapshot().paused);
    }

    #[test]
    fn test_insert_mode_edits_text_program() {
        let mut app = app(LanguageKind::StunStep, "");
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.mode, Mode::Insert);
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('>'));
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.program(), &Program::Text("+>".to_string()));
        assert_eq!(app.snapshot().state.code, vec!['+', '>']);
    }

    #[test]
    fn test_grid_cell_edit_reseeds() {
        // the cursor moves up (wrapping) from the '!' onto the blank below it
        let mut app = app(LanguageKind::Wii2d, "!.\n  ");
        press(&mut app, KeyCode::Right);
        assert_eq!(app.snapshot().step, 1);
        assert_eq!(app.snapshot().state.cursor, Some(2));

        press(&mut app, KeyCode::Enter);
        assert!(app.selection().is_some());
        press(&mut app, KeyCode::Char('v'));

        let snapshot = app.snapshot();
        assert_eq!(snapshot.step, 0);
        assert!(snapshot.paused);
        assert_eq!(app.program().text(), "!.\nv");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.selection(), None);
    }

    #[test]
    fn test_tab_cycles_and_stops_engine() {
        let mut app = app(LanguageKind::StunStep, "+");
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_language(), LanguageKind::Suffolk);

        for _ in 0..3 {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.active_language(), LanguageKind::StunStep);
        assert!(app.snapshot().paused);
    }

    #[test]
    fn test_resize_marks_grids_for_reflow() {
        let mut app = app(LanguageKind::Back, "ab\ncd");
        app.layout_cache.insert(LanguageKind::Back, GridDims::new(2, 1));
        app.apply_pending_fit();
        assert_eq!(app.program().text(), "ab\ncd");

        app.handle_resize(80, 24);
        app.layout_cache.insert(LanguageKind::Back, GridDims::new(2, 1));
        app.apply_pending_fit();
        assert_eq!(app.program().text(), "a\nc");
    }
}
