//! Flat character grids for the 2D languages
//!
//! A grid program is a single row-major buffer of `rows * cols` characters.
//! Movement wraps at the edges: horizontal moves wrap within the current row,
//! vertical moves wrap around the whole buffer.
//!
//! - [`Grid`]: the program buffer, plus lossy re-flow on resize
//! - [`grid_move`]: one step of the cursor along a velocity code
//! - [`editor`]: per-cell editing and selection (the input adapter for grids)

pub mod editor;

use std::fmt;
use tracing::warn;

pub use editor::{EditOutcome, GridEditor, GridKey};

/// Character used for blank cells
pub const BLANK: char = ' ';

/// Grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridDims {
    pub rows: usize,
    pub cols: usize,
}

impl GridDims {
    pub fn new(rows: usize, cols: usize) -> Self {
        GridDims { rows, cols }
    }

    pub fn area(&self) -> usize {
        self.rows * self.cols
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Cardinal direction, encoded as a velocity code
///
/// Vertical codes are ±2 and horizontal codes ±1, so negation reverses a
/// direction and the mirror opcodes of Back can recombine codes arithmetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Right,
        Direction::Down,
    ];

    pub fn code(self) -> i8 {
        match self {
            Direction::Up => -2,
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Down => 2,
        }
    }

    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            -2 => Some(Direction::Up),
            -1 => Some(Direction::Left),
            1 => Some(Direction::Right),
            2 => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Move `start` one cell along `velocity` on a `rows x cols` torus.
///
/// Unknown velocity codes leave the position where it is. The grid must not be
/// empty.
pub fn grid_move(start: usize, velocity: i8, rows: usize, cols: usize) -> usize {
    let max = rows * cols;
    debug_assert!(max > 0, "grid_move on an empty grid");
    let last_col = cols - 1;

    let moved = match Direction::from_code(velocity) {
        Some(Direction::Down) => start + cols,
        Some(Direction::Up) => start + max - cols,
        Some(Direction::Right) if start % cols == last_col => start - last_col,
        Some(Direction::Right) => start + 1,
        Some(Direction::Left) if start % cols == 0 => start + last_col,
        Some(Direction::Left) => start - 1,
        None => start,
    };

    moved % max
}

/// A row-major character grid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: Vec<char>,
    dims: GridDims,
}

impl Grid {
    /// A grid filled with blanks
    pub fn blank(rows: usize, cols: usize) -> Self {
        Grid {
            cells: vec![BLANK; rows * cols],
            dims: GridDims::new(rows, cols),
        }
    }

    /// Build a grid from row-major cells; the buffer is padded or cut to fit
    pub fn from_cells(cells: impl IntoIterator<Item = char>, rows: usize, cols: usize) -> Self {
        let mut cells: Vec<char> = cells.into_iter().take(rows * cols).collect();
        cells.resize(rows * cols, BLANK);
        Grid {
            cells,
            dims: GridDims::new(rows, cols),
        }
    }

    /// Lay out text line by line into a `rows x cols` grid.
    ///
    /// Lines and characters that do not fit are dropped.
    pub fn from_text(text: &str, rows: usize, cols: usize) -> Self {
        let mut grid = Grid::blank(rows, cols);
        let mut truncated = false;

        for (r, line) in text.lines().enumerate() {
            if r >= rows {
                truncated |= !line.is_empty();
                continue;
            }
            for (c, ch) in line.chars().enumerate() {
                if c >= cols {
                    truncated = true;
                    break;
                }
                grid.cells[r * cols + c] = ch;
            }
        }

        if truncated {
            warn!(rows, cols, "program text does not fit the grid; extra cells dropped");
        }
        grid
    }

    /// Size a grid to the text it holds (one row per line, widest line wins)
    pub fn fit_text(text: &str) -> Self {
        let rows = text.lines().count().max(1);
        let cols = text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(1);
        Grid::from_text(text, rows, cols)
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn rows(&self) -> usize {
        self.dims.rows
    }

    pub fn cols(&self) -> usize {
        self.dims.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.cells.get(index).copied()
    }

    /// Overwrite one cell; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, ch: char) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = ch;
        }
    }

    /// One row of the grid
    pub fn row(&self, row: usize) -> &[char] {
        let cols = self.dims.cols;
        let start = (row * cols).min(self.cells.len());
        let end = (start + cols).min(self.cells.len());
        &self.cells[start..end]
    }

    /// Indices of every cell holding `ch`, in row-major order
    pub fn positions_of(&self, ch: char) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == ch)
            .map(|(i, _)| i)
            .collect()
    }

    /// Re-flow into new dimensions.
    ///
    /// Each existing row keeps its first `min(cols, new cols)` characters and is
    /// padded with blanks; new rows are blank. Characters beyond the new column
    /// count, and rows beyond the new row count, are lost.
    pub fn resized(&self, rows: usize, cols: usize) -> Grid {
        let keep = cols.min(self.dims.cols);
        let mut cells = Vec::with_capacity(rows * cols);
        let mut dropped = 0usize;

        for r in 0..rows {
            let row = if r < self.dims.rows { self.row(r) } else { &[] };
            cells.extend(row.iter().take(keep));
            dropped += row[keep.min(row.len())..]
                .iter()
                .filter(|&&c| c != BLANK)
                .count();
            cells.resize((r + 1) * cols, BLANK);
        }
        for r in rows..self.dims.rows {
            dropped += self.row(r).iter().filter(|&&c| c != BLANK).count();
        }

        if dropped > 0 {
            warn!(
                from = %self.dims,
                to = %GridDims::new(rows, cols),
                dropped,
                "grid resize dropped program characters"
            );
        }

        Grid {
            cells,
            dims: GridDims::new(rows, cols),
        }
    }

    /// Rows joined with newlines, trailing blanks trimmed
    pub fn to_text(&self) -> String {
        (0..self.dims.rows)
            .map(|r| self.row(r).iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.dims.rows {
            let line: String = self.row(r).iter().collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Parse a `ROWSxCOLS` size string
pub fn parse_dims(s: &str) -> Result<GridDims, crate::engine::errors::EngineError> {
    use crate::engine::errors::EngineError;

    let (rows, cols) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| EngineError::InvalidGridSize(s.to_string()))?;
    let rows: usize = rows
        .trim()
        .parse()
        .map_err(|_| EngineError::InvalidGridSize(s.to_string()))?;
    let cols: usize = cols
        .trim()
        .parse()
        .map_err(|_| EngineError::InvalidGridSize(s.to_string()))?;

    if rows == 0 || cols == 0 {
        return Err(EngineError::EmptyGrid { rows, cols });
    }
    Ok(GridDims::new(rows, cols))
}
