//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`program`]: Program source (text or grid) with cursor and selection
//! - [`tape`]: Tape cells around the pointer, and the register
//! - [`output`]: Characters the program has printed
//! - [`status`]: Status bar with keybindings and run state
//!
//! Each pane module exports a primary `render_*` function taking the engine
//! [`Snapshot`](crate::snapshot::Snapshot) it draws from.

pub mod output;
pub mod program;
pub mod status;
pub mod tape;

pub use output::render_output_pane;
pub use program::{render_program_pane, ProgramRenderData};
pub use status::{render_status_bar, StatusRenderData};
pub use tape::render_tape_pane;
