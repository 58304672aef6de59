//! Suffolk: a register automaton over a growable tape
//!
//! | op  | effect                                                              |
//! |-----|---------------------------------------------------------------------|
//! | `>` | pointer + 1, growing the tape with a 0 cell                         |
//! | `<` | register += current cell, pointer = 0                               |
//! | `!` | current cell = max(0, cell - (register - 1)); register = pointer = 0 |
//! | `,` | register = code point of the next input character, or 0            |
//! | `.` | if register > 0, output char(register - 1)                          |
//!
//! Input is supplied up front and consumed one character per `,`, which keeps
//! the transition function pure. Unlike Stun Step, a terminated Suffolk
//! program always resumes on the next step.

use super::{char_from_code, filter_alphabet, Displays, Language, MachineState, Program, StateView};
use std::rc::Rc;

const ALPHABET: &str = "><!,.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffolkState {
    pub code: Rc<[char]>,
    pub index: usize,
    pub register: i64,
    pub tape: Vec<i64>,
    pub pointer: usize,
    pub output: String,
    pub input: Rc<[char]>,
    /// Characters of `input` already consumed
    pub consumed: usize,
    pub end: bool,
}

impl MachineState for SuffolkState {
    fn is_end(&self) -> bool {
        self.end
    }

    fn view(&self) -> StateView {
        StateView {
            code: self.code.to_vec(),
            cursor: Some(self.index),
            tape: self.tape.clone(),
            pointer: self.pointer,
            output: self.output.clone(),
            register: self.register,
            end: self.end,
            ..StateView::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Suffolk {
    input: Rc<[char]>,
}

impl Default for Suffolk {
    fn default() -> Self {
        Suffolk::with_input("")
    }
}

impl Suffolk {
    /// A Suffolk interpreter whose `,` reads from `input`
    pub fn with_input(input: &str) -> Self {
        Suffolk {
            input: input.chars().collect(),
        }
    }
}

impl Language for Suffolk {
    type State = SuffolkState;

    const NAME: &'static str = "Suffolk";
    const DISPLAYS: Displays = Displays {
        tape: true,
        output: true,
        register: true,
        fast_forward: true,
    };

    fn normalize(&self, raw: &str) -> String {
        filter_alphabet(raw, ALPHABET)
    }

    fn seed(&self, program: &Program) -> SuffolkState {
        SuffolkState {
            code: self.normalize(&program.text()).chars().collect(),
            index: 0,
            register: 0,
            tape: vec![0],
            pointer: 0,
            output: String::new(),
            input: Rc::clone(&self.input),
            consumed: 0,
            end: false,
        }
    }

    fn step(&self, state: &SuffolkState) -> SuffolkState {
        let mut next = state.clone();
        next.end = false;

        let Some(&op) = state.code.get(state.index) else {
            next.index = 0;
            next.end = true;
            return next;
        };
        next.index += 1;

        match op {
            '>' => {
                next.pointer += 1;
                if next.pointer == next.tape.len() {
                    next.tape.push(0);
                }
            }
            '<' => {
                next.register = next.register.saturating_add(next.tape[next.pointer]);
                next.pointer = 0;
            }
            '!' => {
                let cell = next.tape[next.pointer] - (next.register - 1);
                next.tape[next.pointer] = cell.max(0);
                next.register = 0;
                next.pointer = 0;
            }
            ',' => {
                next.register = match next.input.get(next.consumed) {
                    Some(&ch) => {
                        next.consumed += 1;
                        i64::from(u32::from(ch))
                    }
                    None => 0,
                };
            }
            '.' => {
                if next.register > 0 {
                    next.output.push(char_from_code(next.register - 1));
                }
            }
            _ => {}
        }

        next
    }
}
