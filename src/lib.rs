//! # Introduction
//!
//! esostep runs four small esoteric languages under one step-by-step control
//! protocol: run, pause, single-step forward and back, fast-forward, and
//! reset-on-edit. Each language is a pure transition function; a generic engine
//! memoizes every state it computes so stepping backward never recomputes.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → normalize → seed State → Action → Transition Cache → Snapshot → TUI
//! ```
//!
//! 1. [`lang`]: the languages (Stun Step, Suffolk, WII2D, Back) and the
//!    [`lang::Language`] contract they implement.
//! 2. [`grid`]: the row-major character grid used by the 2D languages, the
//!    torus movement rule and the per-cell grid editor.
//! 3. [`engine`]: the transition cache, the timer controller and the control
//!    reducer that ties them together behind [`engine::Session`].
//! 4. [`snapshot`]: the read-only [`snapshot::Snapshot`] handed to renderers.
//! 5. [`config`]: timer intervals and other constants.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use esostep::engine::{Action, Session, StaticHost};
//! use esostep::lang::{LanguageKind, Program, SessionOptions};
//! use std::time::Instant;
//!
//! let mut session = LanguageKind::StunStep
//!     .session(Program::Text("++>".into()), &SessionOptions::default());
//! let mut host = StaticHost::new(Instant::now(), true);
//!
//! session.dispatch(Action::Next, &mut host);
//! session.dispatch(Action::Next, &mut host);
//! assert_eq!(session.snapshot().state.tape, vec![2]);
//!
//! session.dispatch(Action::Prev, &mut host);
//! assert_eq!(session.snapshot().state.tape, vec![1]);
//! ```

pub mod config;
pub mod engine;
pub mod grid;
pub mod lang;
pub mod snapshot;
pub mod ui;
