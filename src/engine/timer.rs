// Repeating tick source driven by the caller's clock

use std::time::{Duration, Instant};
use tracing::trace;

/// What a running timer emits and how often
#[derive(Debug, Clone, PartialEq)]
pub struct TimerConfig<M> {
    /// Message delivered on every tick
    pub repeat: M,
    pub interval: Duration,
}

/// At most one active interval at a time.
///
/// The controller never reads the system clock itself: every call takes `now`,
/// so tests drive time explicitly. A tick that is polled late fires once and
/// the next deadline is measured from `now`; missed ticks are not replayed.
#[derive(Debug, Clone)]
pub struct TimerController<M> {
    active: Option<Active<M>>,
}

#[derive(Debug, Clone)]
struct Active<M> {
    config: TimerConfig<M>,
    deadline: Instant,
}

impl<M: Clone> TimerController<M> {
    pub fn new() -> Self {
        TimerController { active: None }
    }

    /// Start a new interval, cancelling any that is already running
    pub fn create(&mut self, config: TimerConfig<M>, now: Instant) {
        self.clear();
        trace!(interval_ms = config.interval.as_millis() as u64, "timer started");
        self.active = Some(Active {
            deadline: now + config.interval,
            config,
        });
    }

    /// Cancel the running interval; does nothing when idle
    pub fn clear(&mut self) {
        if self.active.take().is_some() {
            trace!("timer cleared");
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Interval of the running timer
    pub fn interval(&self) -> Option<Duration> {
        self.active.as_ref().map(|a| a.config.interval)
    }

    /// When the next tick is due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.as_ref().map(|a| a.deadline)
    }

    /// Time left until the next tick, zero when it is already due
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Emit the repeat message if a tick is due
    pub fn poll(&mut self, now: Instant) -> Option<M> {
        let active = self.active.as_mut()?;
        if now < active.deadline {
            return None;
        }
        active.deadline = now + active.config.interval;
        Some(active.config.repeat.clone())
    }
}

impl<M: Clone> Default for TimerController<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn config(interval: u64) -> TimerConfig<&'static str> {
        TimerConfig {
            repeat: "tick",
            interval: ms(interval),
        }
    }

    #[test]
    fn test_idle_timer_never_fires() {
        let mut timer: TimerController<&str> = TimerController::new();
        assert!(!timer.is_running());
        assert_eq!(timer.poll(Instant::now()), None);
        assert_eq!(timer.next_deadline(), None);
    }

    #[test]
    fn test_fires_at_deadline() {
        let start = Instant::now();
        let mut timer = TimerController::new();
        timer.create(config(200), start);

        assert_eq!(timer.poll(start + ms(199)), None);
        assert_eq!(timer.poll(start + ms(200)), Some("tick"));
        assert_eq!(timer.next_deadline(), Some(start + ms(400)));
    }

    #[test]
    fn test_late_poll_fires_once() {
        let start = Instant::now();
        let mut timer = TimerController::new();
        timer.create(config(10), start);

        assert_eq!(timer.poll(start + ms(95)), Some("tick"));
        assert_eq!(timer.poll(start + ms(95)), None);
        assert_eq!(timer.next_deadline(), Some(start + ms(105)));
    }

    #[test]
    fn test_create_replaces_running_interval() {
        let start = Instant::now();
        let mut timer = TimerController::new();
        timer.create(config(200), start);
        timer.create(config(10), start + ms(5));

        assert_eq!(timer.interval(), Some(ms(10)));
        assert_eq!(timer.poll(start + ms(15)), Some("tick"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let start = Instant::now();
        let mut timer = TimerController::new();
        timer.create(config(50), start);
        timer.clear();
        timer.clear();

        assert!(!timer.is_running());
        assert_eq!(timer.poll(start + ms(1000)), None);
    }

    #[test]
    fn test_remaining_saturates() {
        let start = Instant::now();
        let mut timer = TimerController::new();
        timer.create(config(50), start);
        assert_eq!(timer.remaining(start + ms(20)), Some(ms(30)));
        assert_eq!(timer.remaining(start + ms(80)), Some(Duration::ZERO));
    }
}
