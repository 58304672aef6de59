// Control reducer: UI actions in, timer and cache operations out

use super::cache::TransitionCache;
use super::timer::{TimerConfig, TimerController};
use crate::config::EngineConfig;
use crate::lang::{Displays, Language, MachineState, Program};
use crate::snapshot::Snapshot;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Prompt shown before a reset discards history
pub const RESET_PROMPT: &str = "Reset the program to its initial state?";

/// Discrete control actions
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start stepping at the default interval
    Run,
    /// Cancel the timer and pause
    Stop,
    /// Discard history and return to the seed state (asks the host first)
    Reset,
    /// Step back one state and pause
    Prev,
    /// Step forward one state
    Next,
    /// Delivered by the timer on every tick
    Timer,
    /// Start or speed up continuous stepping
    FastForward,
    /// Replace the program source
    Edit(Program),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Run => "run",
            Action::Stop => "stop",
            Action::Reset => "reset",
            Action::Prev => "prev",
            Action::Next => "next",
            Action::Timer => "timer",
            Action::FastForward => "ff",
            Action::Edit(_) => "edit",
        }
    }
}

/// The environment an engine runs in
pub trait Host {
    /// Current time, used to schedule timer ticks
    fn now(&self) -> Instant;

    /// Ask the user a yes/no question; blocks until answered
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// A host with a fixed clock reading and a pre-decided confirmation answer.
///
/// The TUI asks its question before dispatching, then hands the answer over
/// through this type.
#[derive(Debug, Clone, Copy)]
pub struct StaticHost {
    pub now: Instant,
    pub confirm: bool,
}

impl StaticHost {
    pub fn new(now: Instant, confirm: bool) -> Self {
        StaticHost { now, confirm }
    }
}

impl Host for StaticHost {
    fn now(&self) -> Instant {
        self.now
    }

    fn confirm(&mut self, _prompt: &str) -> bool {
        self.confirm
    }
}

/// One engine instance: a language, its step history, a timer and the pause flag
pub struct Engine<L: Language> {
    cache: TransitionCache<L>,
    program: Program,
    timer: TimerController<Action>,
    config: EngineConfig,
    paused: bool,
}

impl<L: Language> Engine<L> {
    /// Seed a paused engine from `program`
    pub fn new(language: L, program: Program, config: EngineConfig) -> Self {
        let seed = language.seed(&program);
        debug!(language = L::NAME, "engine created");
        Engine {
            cache: TransitionCache::new(language, seed),
            program,
            timer: TimerController::new(),
            config,
            paused: true,
        }
    }

    /// Apply one action
    pub fn dispatch(&mut self, action: Action, host: &mut dyn Host) {
        debug!(
            language = L::NAME,
            action = action.name(),
            step = self.cache.cursor(),
            "dispatch"
        );

        match action {
            Action::Run => self.start(self.config.interval, host.now()),
            Action::Stop => self.stop(),
            Action::Timer => {
                if self.cache.current().is_end() {
                    info!(language = L::NAME, step = self.cache.cursor(), "program ended");
                    self.stop();
                } else {
                    self.cache.next();
                }
            }
            Action::Reset => {
                if !host.confirm(RESET_PROMPT) {
                    debug!(language = L::NAME, "reset declined");
                    return;
                }
                self.timer.clear();
                self.reseed();
                self.paused = true;
            }
            Action::Prev => {
                self.timer.clear();
                self.cache.prev();
                self.paused = true;
            }
            Action::Next => {
                self.cache.next();
            }
            Action::FastForward => {
                let interval = if self.paused {
                    self.config.fast_forward_paused
                } else {
                    self.config.fast_forward_running
                };
                self.start(self.config.clamp(interval), host.now());
            }
            Action::Edit(program) => {
                self.program = program;
                self.timer.clear();
                self.reseed();
                self.paused = true;
            }
        }
    }

    /// Deliver a due timer tick, if any. Returns whether a tick fired.
    pub fn poll(&mut self, host: &mut dyn Host) -> bool {
        match self.timer.poll(host.now()) {
            Some(action) => {
                self.dispatch(action, host);
                true
            }
            None => false,
        }
    }

    fn start(&mut self, interval: Duration, now: Instant) {
        self.timer.create(
            TimerConfig {
                repeat: Action::Timer,
                interval,
            },
            now,
        );
        self.paused = false;
    }

    fn stop(&mut self) {
        self.timer.clear();
        self.paused = true;
    }

    fn reseed(&mut self) {
        let seed = self.cache.language().seed(&self.program);
        self.cache.clear(seed);
    }

    pub fn state(&self) -> &L::State {
        self.cache.current()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn language(&self) -> &L {
        self.cache.language()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_terminated(&self) -> bool {
        self.cache.current().is_end()
    }

    /// Steps taken from the seed state
    pub fn step_index(&self) -> usize {
        self.cache.cursor()
    }

    pub fn history_len(&self) -> usize {
        self.cache.len()
    }

    pub fn can_step_back(&self) -> bool {
        self.cache.can_step_back()
    }

    /// Interval of the running timer, `None` while paused
    pub fn interval(&self) -> Option<Duration> {
        self.timer.interval()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.next_deadline()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot {
        let state = self.cache.current();
        Snapshot {
            name: L::NAME,
            displays: L::DISPLAYS,
            state: state.view(),
            paused: self.paused,
            terminated: state.is_end(),
            fast_forward: L::DISPLAYS.fast_forward,
            step: self.cache.cursor(),
            history_len: self.cache.len(),
            interval: self.timer.interval(),
        }
    }
}

/// Object-safe engine surface, so the UI can hold any language behind one type
pub trait Session {
    fn name(&self) -> &'static str;
    fn displays(&self) -> Displays;
    fn program(&self) -> &Program;
    fn dispatch(&mut self, action: Action, host: &mut dyn Host);
    fn poll(&mut self, host: &mut dyn Host) -> bool;
    fn next_deadline(&self) -> Option<Instant>;
    fn snapshot(&self) -> Snapshot;
}

impl<L: Language> Session for Engine<L> {
    fn name(&self) -> &'static str {
        L::NAME
    }

    fn displays(&self) -> Displays {
        L::DISPLAYS
    }

    fn program(&self) -> &Program {
        Engine::program(self)
    }

    fn dispatch(&mut self, action: Action, host: &mut dyn Host) {
        Engine::dispatch(self, action, host)
    }

    fn poll(&mut self, host: &mut dyn Host) -> bool {
        Engine::poll(self, host)
    }

    fn next_deadline(&self) -> Option<Instant> {
        Engine::next_deadline(self)
    }

    fn snapshot(&self) -> Snapshot {
        Engine::snapshot(self)
    }
}

/// Step with `next` until the program ends, stops making progress, or reaches
/// `max_steps`. Returns the final snapshot.
pub fn run_until_end(session: &mut dyn Session, host: &mut dyn Host, max_steps: usize) -> Snapshot {
    let mut snapshot = session.snapshot();
    while !snapshot.terminated && snapshot.step < max_steps {
        session.dispatch(Action::Next, host);
        let next = session.snapshot();
        let stalled = next.step == snapshot.step;
        snapshot = next;
        if stalled {
            info!(step = snapshot.step, "program reached a fixpoint");
            break;
        }
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::StunStep;

    fn engine(code: &str) -> Engine<StunStep> {
        Engine::new(
            StunStep,
            Program::Text(code.to_string()),
            EngineConfig::default(),
        )
    }

    #[test]
    fn test_starts_paused_at_seed() {
        let engine = engine("+");
        assert!(engine.is_paused());
        assert_eq!(engine.step_index(), 0);
        assert_eq!(engine.interval(), None);
    }

    #[test]
    fn test_run_then_stop() {
        let mut host = StaticHost::new(Instant::now(), true);
        let mut engine = engine("+");
        engine.dispatch(Action::Run, &mut host);
        assert!(!engine.is_paused());
        assert_eq!(engine.interval(), Some(engine.config().interval));

        engine.dispatch(Action::Stop, &mut host);
        assert!(engine.is_paused());
        assert_eq!(engine.interval(), None);
    }

    #[test]
    fn test_next_keeps_pause_flag() {
        let mut host = StaticHost::new(Instant::now(), true);
        let mut engine = engine("++");
        engine.dispatch(Action::Next, &mut host);
        assert!(engine.is_paused());

        engine.dispatch(Action::Run, &mut host);
        engine.dispatch(Action::Next, &mut host);
        assert!(!engine.is_paused());
        assert_eq!(engine.state().tape, vec![2]);
    }

    #[test]
    fn test_prev_pauses_and_cancels_timer() {
        let mut host = StaticHost::new(Instant::now(), true);
        let mut engine = engine("++");
        engine.dispatch(Action::Next, &mut host);
        engine.dispatch(Action::Run, &mut host);
        engine.dispatch(Action::Prev, &mut host);
        assert!(engine.is_paused());
        assert_eq!(engine.interval(), None);
        assert_eq!(engine.step_index(), 0);
    }

    #[test]
    fn test_fast_forward_tiers() {
        let mut host = StaticHost::new(Instant::now(), true);
        let mut engine = engine("+");
        let config = *engine.config();

        engine.dispatch(Action::FastForward, &mut host);
        assert!(!engine.is_paused());
        assert_eq!(engine.interval(), Some(config.fast_forward_paused));

        engine.dispatch(Action::FastForward, &mut host);
        assert_eq!(engine.interval(), Some(config.fast_forward_running));

        engine.dispatch(Action::FastForward, &mut host);
        assert_eq!(engine.interval(), Some(config.min_interval));
    }

    #[test]
    fn test_reset_declined_changes_nothing() {
        let mut host = StaticHost::new(Instant::now(), true);
        let mut engine = engine("++");
        engine.dispatch(Action::Next, &mut host);
        engine.dispatch(Action::Run, &mut host);

        let mut decline = StaticHost::new(Instant::now(), false);
        engine.dispatch(Action::Reset, &mut decline);
        assert!(!engine.is_paused());
        assert_eq!(engine.step_index(), 1);
        assert!(engine.interval().is_some());
    }

    #[test]
    fn test_reset_accepted_returns_to_seed() {
        let mut host = StaticHost::new(Instant::now(), true);
        let mut engine = engine("++");
        engine.dispatch(Action::Next, &mut host);
        engine.dispatch(Action::Run, &mut host);
        engine.dispatch(Action::Reset, &mut host);

        assert!(engine.is_paused());
        assert_eq!(engine.step_index(), 0);
        assert_eq!(engine.history_len(), 1);
        assert_eq!(engine.state().tape, vec![0]);
    }

    #[test]
    fn test_edit_reseeds_with_normalized_source() {
        let mut host = StaticHost::new(Instant::now(), true);
        let mut engine = engine("+");
        engine.dispatch(Action::Next, &mut host);
        engine.dispatch(Action::Run, &mut host);
        engine.dispatch(Action::Edit(Program::Text("a+b>".to_string())), &mut host);

        assert!(engine.is_paused());
        assert_eq!(engine.step_index(), 0);
        assert_eq!(engine.state().code.iter().collect::<String>(), "+>");
        assert_eq!(engine.program(), &Program::Text("a+b>".to_string()));
    }

    #[test]
    fn test_timer_tick_on_ended_state_stops() {
        let start = Instant::now();
        let mut host = StaticHost::new(start, true);
        let mut engine = engine("");
        engine.dispatch(Action::Next, &mut host);
        assert!(engine.is_terminated());

        engine.dispatch(Action::Run, &mut host);
        host.now = start + engine.config().interval;
        assert!(engine.poll(&mut host));
        assert!(engine.is_paused());
        assert_eq!(engine.interval(), None);
    }

    #[test]
    fn test_poll_steps_when_due() {
        let start = Instant::now();
        let mut host = StaticHost::new(start, true);
        let mut engine = engine("+++");
        engine.dispatch(Action::Run, &mut host);

        assert!(!engine.poll(&mut host));
        host.now = start + engine.config().interval;
        assert!(engine.poll(&mut host));
        assert_eq!(engine.state().tape, vec![1]);
    }

    #[test]
    fn test_run_until_end_stops_at_first_end() {
        let mut host = StaticHost::new(Instant::now(), true);
        let mut engine = engine("+++");
        let snapshot = run_until_end(&mut engine, &mut host, 100);
        assert!(snapshot.terminated);
        assert_eq!(snapshot.step, 4);
        assert_eq!(snapshot.state.tape, vec![3]);

        let mut engine = self::engine("+++");
        assert_eq!(run_until_end(&mut engine, &mut host, 2).step, 2);
    }

    #[test]
    fn test_snapshot_reflects_control_state() {
        let mut host = StaticHost::new(Instant::now(), true);
        let mut engine = engine("+");
        engine.dispatch(Action::Next, &mut host);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.name, "Stun Step");
        assert!(snapshot.paused);
        assert!(!snapshot.terminated);
        assert!(snapshot.fast_forward);
        assert_eq!(snapshot.step, 1);
        assert_eq!(snapshot.state.tape, vec![1]);
    }
}
