// Timing and layout constants for the stepping engine

use std::time::Duration;

/// Interval used by `run`
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

/// Fast-forward interval when starting from a paused engine
pub const FAST_FORWARD_FROM_PAUSED: Duration = Duration::from_millis(50);

/// Fast-forward interval when the engine is already running
pub const FAST_FORWARD_FROM_RUNNING: Duration = Duration::from_millis(10);

/// Floor for any timer interval; repeated fast-forward never goes below this
pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Terminal columns used to draw one grid cell (glyph + gap)
pub const GRID_CELL_WIDTH: u16 = 2;

/// Upper bound on how long the event loop blocks waiting for input
pub const MAX_EVENT_WAIT: Duration = Duration::from_millis(50);

/// Seed for the WII2D random source when none is given
pub const DEFAULT_RNG_SEED: u64 = 0x5EED_0F_2D;

/// Timer configuration for one engine instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub interval: Duration,
    pub fast_forward_paused: Duration,
    pub fast_forward_running: Duration,
    pub min_interval: Duration,
}

impl EngineConfig {
    /// Clamp an interval to the configured floor
    pub fn clamp(&self, interval: Duration) -> Duration {
        interval.max(self.min_interval)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            interval: DEFAULT_INTERVAL,
            fast_forward_paused: FAST_FORWARD_FROM_PAUSED,
            fast_forward_running: FAST_FORWARD_FROM_RUNNING,
            min_interval: MIN_INTERVAL,
        }
    }
}
