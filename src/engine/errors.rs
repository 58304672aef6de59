//! Error types for the outer surface of the engine
//!
//! Language semantics never fail: unknown opcodes are inert, missing input reads
//! as zero, and malformed grids terminate the program. [`EngineError`] only covers
//! what can go wrong before a program is loaded (bad names, bad sizes, unreadable
//! files).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while selecting or loading a program
#[derive(Debug, Error)]
pub enum EngineError {
    /// Language name not recognised
    #[error("unknown language '{name}' (expected one of: {expected})")]
    UnknownLanguage { name: String, expected: String },

    /// Grid size string is not of the form `RxC`
    #[error("invalid grid size '{0}', expected ROWSxCOLS (e.g. 12x40)")]
    InvalidGridSize(String),

    /// Grid size has a zero dimension
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    /// Program file could not be read
    #[error("failed to read program '{}': {source}", path.display())]
    ReadProgram {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
