//! Language modules
//!
//! Each language is a pure transition function over an immutable state value,
//! plus a seed function that turns program source into the initial state:
//!
//! - [`stun_step`]: integer tape automaton (`+ - > <`)
//! - [`suffolk`]: register automaton (`> < ! , .`)
//! - [`wii2d`]: 2D grid automaton with a register, output and warps
//! - [`back`]: 2D grid automaton with mirrors and a bit tape
//!
//! The engine never looks inside a state; it only needs the termination flag
//! and a [`StateView`] for display. Everything else is the language's business.

pub mod back;
pub mod stun_step;
pub mod suffolk;
pub mod wii2d;

use crate::config::{EngineConfig, DEFAULT_RNG_SEED};
use crate::engine::errors::EngineError;
use crate::engine::{Engine, Session};
use crate::grid::{Grid, GridDims};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

pub use back::Back;
pub use stun_step::StunStep;
pub use suffolk::Suffolk;
pub use wii2d::Wii2d;

/// Program source as the user edits it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// Free-form text, normalized by the language before seeding
    Text(String),
    /// A fixed-size character grid, used as-is
    Grid(Grid),
}

impl Program {
    /// The source as plain text (grid rows are joined with newlines)
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Program::Text(text) => Cow::Borrowed(text),
            Program::Grid(grid) => Cow::Owned(grid.to_text()),
        }
    }

    /// The source as a grid (text is sized to fit)
    pub fn to_grid(&self) -> Grid {
        match self {
            Program::Text(text) => Grid::fit_text(text),
            Program::Grid(grid) => grid.clone(),
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Program::Text(String::new())
    }
}

/// Which auxiliary displays a language uses, plus the fast-forward capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Displays {
    pub tape: bool,
    pub output: bool,
    pub register: bool,
    pub fast_forward: bool,
}

/// Language-neutral view of one execution state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateView {
    /// Instruction stream (normalized text, or the grid cells row by row)
    pub code: Vec<char>,
    /// Grid dimensions when `code` is a grid
    pub grid: Option<GridDims>,
    /// Instruction index or grid position; `None` when there is no cursor
    pub cursor: Option<usize>,
    pub tape: Vec<i64>,
    pub pointer: usize,
    pub output: String,
    pub register: i64,
    pub end: bool,
}

/// What the engine needs from a state
pub trait MachineState: Clone + PartialEq + fmt::Debug {
    /// Termination flag
    fn is_end(&self) -> bool;

    /// Display view of this state
    fn view(&self) -> StateView;
}

/// A language: source normalization, seeding, and the transition function.
///
/// `step` must be pure: it never mutates its input and always returns the same
/// state for the same input. The history cache relies on this.
pub trait Language {
    type State: MachineState;

    const NAME: &'static str;
    const DISPLAYS: Displays;

    /// Filter raw source down to the instruction stream
    fn normalize(&self, raw: &str) -> String {
        raw.to_string()
    }

    /// Initial state for a program
    fn seed(&self, program: &Program) -> Self::State;

    /// One execution step
    fn step(&self, state: &Self::State) -> Self::State;
}

/// Keep only the characters in `alphabet`
pub(crate) fn filter_alphabet(raw: &str, alphabet: &str) -> String {
    raw.chars().filter(|c| alphabet.contains(*c)).collect()
}

/// Code point to character; values outside the Unicode scalar range become U+FFFD
pub(crate) fn char_from_code(code: i64) -> char {
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// The four built-in languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageKind {
    StunStep,
    Suffolk,
    Wii2d,
    Back,
}

impl LanguageKind {
    pub const ALL: [LanguageKind; 4] = [
        LanguageKind::StunStep,
        LanguageKind::Suffolk,
        LanguageKind::Wii2d,
        LanguageKind::Back,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LanguageKind::StunStep => StunStep::NAME,
            LanguageKind::Suffolk => Suffolk::NAME,
            LanguageKind::Wii2d => Wii2d::NAME,
            LanguageKind::Back => Back::NAME,
        }
    }

    /// Whether programs are edited as a grid
    pub fn is_grid(self) -> bool {
        matches!(self, LanguageKind::Wii2d | LanguageKind::Back)
    }

    /// The next language in [`LanguageKind::ALL`], wrapping around
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Build an engine for this language behind the object-safe [`Session`] surface
    pub fn session(self, program: Program, options: &SessionOptions) -> Box<dyn Session> {
        match self {
            LanguageKind::StunStep => Box::new(Engine::new(StunStep, program, options.config)),
            LanguageKind::Suffolk => Box::new(Engine::new(
                Suffolk::with_input(&options.input),
                program,
                options.config,
            )),
            LanguageKind::Wii2d => Box::new(Engine::new(
                Wii2d::with_seed(options.rng_seed),
                program,
                options.config,
            )),
            LanguageKind::Back => Box::new(Engine::new(Back, program, options.config)),
        }
    }
}

impl fmt::Display for LanguageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LanguageKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        LanguageKind::ALL
            .into_iter()
            .find(|kind| {
                let name: String = kind
                    .name()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .collect();
                name == wanted
            })
            .ok_or_else(|| EngineError::UnknownLanguage {
                name: s.to_string(),
                expected: LanguageKind::ALL
                    .iter()
                    .map(|k| k.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Everything a session needs besides the program
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub config: EngineConfig,
    /// External input queue for Suffolk's `,`
    pub input: String,
    /// Seed for WII2D's `?`
    pub rng_seed: u64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            config: EngineConfig::default(),
            input: String::new(),
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_names_parse_loosely() {
        assert_eq!("stun-step".parse::<LanguageKind>().unwrap(), LanguageKind::StunStep);
        assert_eq!("Stun Step".parse::<LanguageKind>().unwrap(), LanguageKind::StunStep);
        assert_eq!("wii2d".parse::<LanguageKind>().unwrap(), LanguageKind::Wii2d);
        assert_eq!("BACK".parse::<LanguageKind>().unwrap(), LanguageKind::Back);
        assert!("brainfuck".parse::<LanguageKind>().is_err());
    }

    #[test]
    fn test_next_cycles_through_all() {
        let mut kind = LanguageKind::StunStep;
        for _ in 0..LanguageKind::ALL.len() {
            kind = kind.next();
        }
        assert_eq!(kind, LanguageKind::StunStep);
    }

    #[test]
    fn test_char_from_code_handles_invalid_codes() {
        assert_eq!(char_from_code(65), 'A');
        assert_eq!(char_from_code(-1), char::REPLACEMENT_CHARACTER);
        assert_eq!(char_from_code(0xD800), char::REPLACEMENT_CHARACTER);
    }
}
