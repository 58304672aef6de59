//! Back: a 2D grid automaton with mirrors and a bit tape
//!
//! The cursor starts in the top-left corner moving right. Velocity codes are
//! ±1 (horizontal) and ±2 (vertical); the mirrors recombine them with
//! `k = 3` for positive and `k = -3` for negative velocities:
//!
//! - `\`: `v = k - v` (right <-> down, left <-> up)
//! - `/`: `v = v - k` (right <-> up, left <-> down)
//!
//! `<` and `>` move the tape pointer (the tape grows with zeros), `-` flips the
//! current bit, and `+` skips ahead to the next directive when the current bit
//! is zero. Back programs never terminate on their own.

use super::{Displays, Language, MachineState, Program, StateView};
use crate::grid::{grid_move, Direction, Grid, BLANK};
use std::rc::Rc;

/// Characters `+` stops on when skipping
pub const DIRECTIVES: &str = "\\/<>-+*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackState {
    pub grid: Rc<Grid>,
    pub position: Option<usize>,
    pub velocity: i8,
    pub tape: Vec<i64>,
    pub pointer: usize,
    pub end: bool,
}

impl MachineState for BackState {
    fn is_end(&self) -> bool {
        self.end
    }

    fn view(&self) -> StateView {
        StateView {
            code: self.grid.cells().to_vec(),
            grid: Some(self.grid.dims()),
            cursor: self.position,
            tape: self.tape.clone(),
            pointer: self.pointer,
            end: self.end,
            ..StateView::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Back;

impl Language for Back {
    type State = BackState;

    const NAME: &'static str = "Back";
    const DISPLAYS: Displays = Displays {
        tape: true,
        output: false,
        register: false,
        fast_forward: false,
    };

    fn seed(&self, program: &Program) -> BackState {
        let grid = program.to_grid();
        let empty = grid.is_empty();

        BackState {
            grid: Rc::new(grid),
            position: (!empty).then_some(0),
            velocity: Direction::Right.code(),
            tape: vec![0],
            pointer: 0,
            end: empty,
        }
    }

    fn step(&self, state: &BackState) -> BackState {
        let Some(mut position) = state.position.filter(|_| !state.end) else {
            return state.clone();
        };

        let grid = &state.grid;
        let (rows, cols) = (grid.rows(), grid.cols());
        let k: i8 = if state.velocity > 0 { 3 } else { -3 };
        let mut next = state.clone();

        match grid.get(position).unwrap_or(BLANK) {
            '\\' => next.velocity = k - next.velocity,
            '/' => next.velocity -= k,
            '<' => next.pointer = next.pointer.saturating_sub(1),
            '>' => {
                next.pointer += 1;
                if next.pointer == next.tape.len() {
                    next.tape.push(0);
                }
            }
            '-' => next.tape[next.pointer] ^= 1,
            '+' if next.tape[next.pointer] == 0 => {
                // The scan always terminates: moving along a row or column
                // wraps back around to this `+`, which is itself a directive.
                loop {
                    position = grid_move(position, next.velocity, rows, cols);
                    if grid.get(position).is_some_and(|c| DIRECTIVES.contains(c)) {
                        break;
                    }
                }
            }
            _ => {}
        }

        next.position = Some(grid_move(position, next.velocity, rows, cols));
        next
    }
}
