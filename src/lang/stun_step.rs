//! Stun Step: a tape automaton gated by the current cell
//!
//! `+` always increments the current cell. `-`, `>` and `<` only run when the
//! current cell is non-zero. `>` grows the tape with a cell holding 1.
//!
//! Reaching the end of the program sets `end` and rewinds to instruction 0.
//! A terminated program stays put until its current cell is non-zero, then
//! carries on from the top.

use super::{filter_alphabet, Displays, Language, MachineState, Program, StateView};
use std::rc::Rc;

const ALPHABET: &str = "+-><";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StunStepState {
    pub code: Rc<[char]>,
    pub index: usize,
    pub tape: Vec<i64>,
    pub pointer: usize,
    pub end: bool,
}

impl StunStepState {
    fn current(&self) -> i64 {
        self.tape.get(self.pointer).copied().unwrap_or(0)
    }
}

impl MachineState for StunStepState {
    fn is_end(&self) -> bool {
        self.end
    }

    fn view(&self) -> StateView {
        StateView {
            code: self.code.to_vec(),
            cursor: Some(self.index),
            tape: self.tape.clone(),
            pointer: self.pointer,
            end: self.end,
            ..StateView::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StunStep;

impl Language for StunStep {
    type State = StunStepState;

    const NAME: &'static str = "Stun Step";
    const DISPLAYS: Displays = Displays {
        tape: true,
        output: false,
        register: false,
        fast_forward: true,
    };

    fn normalize(&self, raw: &str) -> String {
        filter_alphabet(raw, ALPHABET)
    }

    fn seed(&self, program: &Program) -> StunStepState {
        StunStepState {
            code: self.normalize(&program.text()).chars().collect(),
            index: 0,
            tape: vec![0],
            pointer: 0,
            end: false,
        }
    }

    fn step(&self, state: &StunStepState) -> StunStepState {
        if state.end && state.current() == 0 {
            return state.clone();
        }

        let mut next = state.clone();
        next.end = false;

        let Some(&op) = state.code.get(state.index) else {
            next.index = 0;
            next.end = true;
            return next;
        };
        next.index += 1;

        if op == '+' {
            next.tape[next.pointer] += 1;
        } else if next.current() != 0 {
            match op {
                '-' => next.tape[next.pointer] -= 1,
                '>' => {
                    next.pointer += 1;
                    if next.pointer == next.tape.len() {
                        next.tape.push(1);
                    }
                }
                '<' => next.pointer = next.pointer.saturating_sub(1),
                _ => {}
            }
        }

        next
    }
}
