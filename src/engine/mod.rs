//! Generic stepping engine
//!
//! This module provides everything between a language's transition function and
//! the UI:
//! - [`cache`]: memoized step history with O(1) backward navigation
//! - [`timer`]: cancellable repeating tick source
//! - [`controller`]: the control reducer that turns UI actions into timer and
//!   cache operations
//! - [`errors`]: errors raised while selecting or loading programs
//!
//! # Execution Model
//!
//! Engines are single-threaded. The only asynchronous re-entry is the timer,
//! and the timer never fires on its own: the host calls
//! [`Session::poll`] from its event loop and each tick runs to completion
//! before the next event is handled.

pub mod cache;
pub mod controller;
pub mod errors;
pub mod timer;

pub use cache::{CacheAction, TransitionCache};
pub use controller::{run_until_end, Action, Engine, Host, Session, StaticHost, RESET_PROMPT};
pub use errors::EngineError;
pub use timer::{TimerConfig, TimerController};
