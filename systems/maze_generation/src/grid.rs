//! Dense boolean matrices backing the logical maze.

use ball_maze_core::CellCoord;
use serde::{Deserialize, Serialize};

/// Visited flags for every cell of a `rows × columns` grid.
///
/// Flags only ever change from unvisited to visited; a grid is discarded
/// together with the maze it was built for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    rows: u32,
    columns: u32,
    visited: Vec<bool>,
}

impl Grid {
    /// Creates a grid whose cells are all unvisited.
    #[must_use]
    pub fn new(rows: u32, columns: u32) -> Self {
        Self {
            rows,
            columns,
            visited: vec![false; cell_count(rows, columns)],
        }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether `cell` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Reports whether `cell` was visited. Cells outside the grid never are.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.visited.get(index).copied())
            .unwrap_or(false)
    }

    /// Marks `cell` as visited. Cells outside the grid are ignored.
    pub fn mark_visited(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.visited.get_mut(index) {
                *slot = true;
            }
        }
    }

    /// Number of cells marked as visited.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|visited| **visited).count()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        matrix_index(self.rows, self.columns, cell.row(), cell.column())
    }
}

/// Openness flags for the walls separating adjacent cells.
///
/// Entry `(row, column)` set to `true` means the wall is open. The matrix is
/// used both for vertical walls (`rows × (columns - 1)`, between a cell and
/// its right neighbour) and horizontal walls (`(rows - 1) × columns`, between
/// a cell and the one below it).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallMatrix {
    rows: u32,
    columns: u32,
    open: Vec<bool>,
}

impl WallMatrix {
    /// Creates a matrix in which every wall is closed.
    #[must_use]
    pub fn closed(rows: u32, columns: u32) -> Self {
        Self {
            rows,
            columns,
            open: vec![false; cell_count(rows, columns)],
        }
    }

    /// Number of rows in the matrix.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the matrix.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// Reports whether the matrix has no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Reports whether the wall at `(row, column)` is open.
    #[must_use]
    pub fn is_open(&self, row: u32, column: u32) -> bool {
        matrix_index(self.rows, self.columns, row, column)
            .and_then(|index| self.open.get(index).copied())
            .unwrap_or(false)
    }

    /// Number of open entries.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|open| **open).count()
    }

    /// Iterates over every entry in row-major order as `(row, column, open)`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, bool)> + '_ {
        let columns = self.columns.max(1);
        self.open.iter().enumerate().map(move |(index, open)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (index / columns, index % columns, *open)
        })
    }

    pub(crate) fn open(&mut self, row: u32, column: u32) {
        if let Some(index) = matrix_index(self.rows, self.columns, row, column) {
            if let Some(slot) = self.open.get_mut(index) {
                *slot = true;
            }
        }
    }
}

fn cell_count(rows: u32, columns: u32) -> usize {
    let count = u64::from(rows) * u64::from(columns);
    usize::try_from(count).unwrap_or(0)
}

fn matrix_index(rows: u32, columns: u32, row: u32, column: u32) -> Option<usize> {
    if row < rows && column < columns {
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        let width = usize::try_from(columns).ok()?;
        Some(row * width + column)
    } else {
        None
    }
}
