//! WII2D: a 2D grid automaton with a register and an output stream
//!
//! The cursor starts on the single `!` in the grid and moves one cell per step
//! along its velocity (initially up). Opcodes:
//!
//! - `^ < > v` set the velocity; `|` reverses it
//! - `0`-`9` load the register; `+ - * s /` increment, decrement, double,
//!   square and halve (rounding down) it
//! - `~` appends `char(register)` to the output
//! - `?` picks one of the four velocities at random
//! - `@` warps to the second-closest `@` (see [`warp_distance`]), then one row up
//! - `.` halts and clears the cursor
//!
//! A grid without exactly one `!` is terminated before the first step.
//!
//! `?` draws from a generator whose seed lives in the state, so stepping the
//! same state twice still gives the same result.

use super::{char_from_code, Displays, Language, MachineState, Program, StateView};
use crate::config::DEFAULT_RNG_SEED;
use crate::grid::{grid_move, Direction, Grid, BLANK};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use std::rc::Rc;

/// Start marker
pub const START: char = '!';

/// Warp marker
pub const WARP: char = '@';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wii2dState {
    pub grid: Rc<Grid>,
    pub position: Option<usize>,
    pub velocity: i8,
    pub register: i64,
    pub output: String,
    /// Seed for the next `?`
    pub rng: u64,
    pub end: bool,
}

impl MachineState for Wii2dState {
    fn is_end(&self) -> bool {
        self.end
    }

    fn view(&self) -> StateView {
        StateView {
            code: self.grid.cells().to_vec(),
            grid: Some(self.grid.dims()),
            cursor: self.position,
            output: self.output.clone(),
            register: self.register,
            end: self.end,
            ..StateView::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Wii2d {
    seed: u64,
}

impl Wii2d {
    /// A WII2D interpreter whose `?` sequence starts from `seed`
    pub fn with_seed(seed: u64) -> Self {
        Wii2d { seed }
    }
}

impl Default for Wii2d {
    fn default() -> Self {
        Wii2d::with_seed(DEFAULT_RNG_SEED)
    }
}

/// Distance between two cells for warp selection.
///
/// The sum of how many rows apart the two cells are and how far apart their
/// columns are.
pub fn warp_distance(a: usize, b: usize, cols: usize) -> usize {
    let (a_col, b_col) = (a % cols, b % cols);
    let rows_apart = (a - a_col).abs_diff(b - b_col) / cols;
    rows_apart + a_col.abs_diff(b_col)
}

/// The second-closest warp marker to `position`, or `position` itself when the
/// grid has fewer than two markers. Ties keep row-major order.
fn warp_target(position: usize, grid: &Grid) -> usize {
    let mut warps = grid.positions_of(WARP);
    if warps.len() < 2 {
        return position;
    }
    warps.sort_by_key(|&w| warp_distance(position, w, grid.cols()));
    warps[1]
}

fn arrow(op: char) -> Option<Direction> {
    match op {
        '^' => Some(Direction::Up),
        '<' => Some(Direction::Left),
        '>' => Some(Direction::Right),
        'v' => Some(Direction::Down),
        _ => None,
    }
}

impl Language for Wii2d {
    type State = Wii2dState;

    const NAME: &'static str = "WII2D";
    const DISPLAYS: Displays = Displays {
        tape: false,
        output: true,
        register: true,
        fast_forward: false,
    };

    fn seed(&self, program: &Program) -> Wii2dState {
        let grid = program.to_grid();
        let starts = grid.positions_of(START);
        let position = match starts.as_slice() {
            [only] => Some(*only),
            _ => None,
        };

        Wii2dState {
            grid: Rc::new(grid),
            position,
            velocity: Direction::Up.code(),
            register: 0,
            output: String::new(),
            rng: self.seed,
            end: position.is_none(),
        }
    }

    fn step(&self, state: &Wii2dState) -> Wii2dState {
        let Some(position) = state.position.filter(|_| !state.end) else {
            return state.clone();
        };

        let grid = &state.grid;
        let (rows, cols) = (grid.rows(), grid.cols());
        let op = grid.get(position).unwrap_or(BLANK);
        let mut next = state.clone();

        if let Some(direction) = arrow(op) {
            next.velocity = direction.code();
        } else if let Some(digit) = op.to_digit(10) {
            next.register = i64::from(digit);
        }

        match op {
            '|' => next.velocity = -next.velocity,
            WARP => {
                let target = warp_target(position, grid);
                next.position = Some((target + grid.len() - cols) % grid.len());
                return next;
            }
            '+' => next.register = next.register.saturating_add(1),
            '-' => next.register = next.register.saturating_sub(1),
            '*' => next.register = next.register.saturating_mul(2),
            's' => next.register = next.register.saturating_mul(next.register),
            '/' => next.register = next.register.div_euclid(2),
            '~' => next.output.push(char_from_code(next.register)),
            '?' => {
                let mut rng = SmallRng::seed_from_u64(state.rng);
                next.velocity = Direction::ALL[rng.gen_range(0..Direction::ALL.len())].code();
                next.rng = rng.next_u64();
            }
            '.' => {
                next.position = None;
                next.end = true;
                return next;
            }
            _ => {}
        }

        next.position = Some(grid_move(position, next.velocity, rows, cols));
        next
    }
}
