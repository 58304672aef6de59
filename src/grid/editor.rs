//! Per-cell editing of a grid program
//!
//! The editor owns the grid being edited and the selected cell. It knows
//! nothing about terminals: the application translates key presses into
//! [`GridKey`]s and clicks into cell indices, and forwards any
//! [`EditOutcome::Changed`] grid to the engine as an edit.

use super::{grid_move, Direction, Grid, GridDims, BLANK};

/// A key press relevant to grid editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKey {
    /// Move the selection (row wrap at the edges)
    Arrow(Direction),
    /// Overwrite the selected cell
    Char(char),
    /// Backspace or Delete: blank the selected cell
    Erase,
    /// Drop the selection
    Escape,
}

/// What an editor operation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Nothing happened (no selection, or a key the editor ignores)
    Ignored,
    /// Only the selection changed
    Selection(Option<usize>),
    /// The program changed; the engine must be re-seeded with this grid
    Changed(Grid),
}

/// Grid program plus cell selection
#[derive(Debug, Clone)]
pub struct GridEditor {
    grid: Grid,
    select: Option<usize>,
}

impl GridEditor {
    pub fn new(grid: Grid) -> Self {
        GridEditor { grid, select: None }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn dims(&self) -> GridDims {
        self.grid.dims()
    }

    pub fn selection(&self) -> Option<usize> {
        self.select
    }

    /// Select a cell, or deselect it if it is already selected
    pub fn click(&mut self, index: usize) -> EditOutcome {
        if index >= self.grid.len() {
            return EditOutcome::Ignored;
        }
        self.select = if self.select == Some(index) {
            None
        } else {
            Some(index)
        };
        EditOutcome::Selection(self.select)
    }

    /// Select a cell without toggling
    pub fn select(&mut self, index: usize) -> EditOutcome {
        if index >= self.grid.len() {
            return EditOutcome::Ignored;
        }
        self.select = Some(index);
        EditOutcome::Selection(self.select)
    }

    pub fn deselect(&mut self) -> EditOutcome {
        self.select = None;
        EditOutcome::Selection(None)
    }

    /// Apply a key press to the selected cell
    pub fn key(&mut self, key: GridKey) -> EditOutcome {
        let Some(select) = self.select else {
            return EditOutcome::Ignored;
        };

        match key {
            GridKey::Escape => self.deselect(),
            GridKey::Arrow(direction) => {
                let dims = self.grid.dims();
                self.select = Some(grid_move(select, direction.code(), dims.rows, dims.cols));
                EditOutcome::Selection(self.select)
            }
            GridKey::Char(ch) if ch.is_control() => EditOutcome::Ignored,
            GridKey::Char(ch) => self.write(select, ch),
            GridKey::Erase => self.write(select, BLANK),
        }
    }

    /// Re-flow the grid to new dimensions; a selection that falls outside is dropped
    pub fn resize(&mut self, dims: GridDims) -> EditOutcome {
        if dims == self.grid.dims() {
            return EditOutcome::Ignored;
        }
        self.grid = self.grid.resized(dims.rows, dims.cols);
        if self.select.is_some_and(|s| s >= self.grid.len()) {
            self.select = None;
        }
        EditOutcome::Changed(self.grid.clone())
    }

    /// Replace the whole program
    pub fn load(&mut self, grid: Grid) -> EditOutcome {
        self.grid = grid;
        self.select = None;
        EditOutcome::Changed(self.grid.clone())
    }

    fn write(&mut self, index: usize, ch: char) -> EditOutcome {
        if self.grid.get(index) == Some(ch) {
            return EditOutcome::Ignored;
        }
        self.grid.set(index, ch);
        EditOutcome::Changed(self.grid.clone())
    }
}
