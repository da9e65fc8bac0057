#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised depth-first maze generation over a rectangular grid.
//!
//! The generator carves a perfect maze: the set of open walls forms a spanning
//! tree over the grid graph, so every cell is reachable from every other cell
//! along exactly one route. Traversal uses an explicit frame stack so grid
//! size never translates into call-stack depth.

pub mod grid;

use std::collections::VecDeque;

use ball_maze_core::{CellCoord, Direction};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use grid::{Grid, WallMatrix};

/// Largest number of cells a single maze may contain.
pub const MAX_CELLS: u64 = 1 << 22;

/// Reasons maze generation refuses to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The grid would contain no cells.
    #[error("maze needs at least one row and one column, got {rows}x{columns}")]
    InvalidDimensions {
        /// Requested number of rows.
        rows: u32,
        /// Requested number of columns.
        columns: u32,
    },
    /// The grid would exceed [`MAX_CELLS`].
    #[error("maze of {rows}x{columns} cells exceeds the limit of {limit} cells")]
    TooManyCells {
        /// Requested number of rows.
        rows: u32,
        /// Requested number of columns.
        columns: u32,
        /// Cell ceiling that was exceeded.
        limit: u64,
    },
    /// The traversal was asked to begin outside the grid.
    #[error("start cell ({row}, {column}) lies outside the {rows}x{columns} grid")]
    StartOutOfBounds {
        /// Row of the rejected start cell.
        row: u32,
        /// Column of the rejected start cell.
        column: u32,
        /// Number of rows in the grid.
        rows: u32,
        /// Number of columns in the grid.
        columns: u32,
    },
}

/// A completed maze. Immutable once generation returns.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Maze {
    grid: Grid,
    verticals: WallMatrix,
    horizontals: WallMatrix,
    start: CellCoord,
}

impl Maze {
    /// Number of rows in the maze.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.grid.rows()
    }

    /// Number of columns in the maze.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.grid.columns()
    }

    /// Cell the traversal started from.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Visited flags left behind by the traversal.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Walls between horizontally adjacent cells, `rows × (columns - 1)`.
    #[must_use]
    pub const fn verticals(&self) -> &WallMatrix {
        &self.verticals
    }

    /// Walls between vertically adjacent cells, `(rows - 1) × columns`.
    #[must_use]
    pub const fn horizontals(&self) -> &WallMatrix {
        &self.horizontals
    }

    /// Total number of open walls across both matrices.
    #[must_use]
    pub fn open_wall_count(&self) -> usize {
        self.verticals.open_count() + self.horizontals.open_count()
    }

    /// Reports whether the ball can pass from `cell` toward `direction`.
    ///
    /// Moving off the grid is never open.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord, direction: Direction) -> bool {
        if !self.grid.contains(cell) {
            return false;
        }
        let Some(neighbor) = cell.step(direction, self.rows(), self.columns()) else {
            return false;
        };

        match direction {
            Direction::Up => self.horizontals.is_open(neighbor.row(), neighbor.column()),
            Direction::Down => self.horizontals.is_open(cell.row(), cell.column()),
            Direction::Left => self.verticals.is_open(neighbor.row(), neighbor.column()),
            Direction::Right => self.verticals.is_open(cell.row(), cell.column()),
        }
    }

    /// Cells reachable from `cell` through a single opening.
    pub fn open_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL.into_iter().filter_map(move |direction| {
            if self.is_open(cell, direction) {
                cell.step(direction, self.rows(), self.columns())
            } else {
                None
            }
        })
    }

    /// Counts the cells reachable from `origin` through openings, origin included.
    #[must_use]
    pub fn reachable_from(&self, origin: CellCoord) -> usize {
        if !self.grid.contains(origin) {
            return 0;
        }

        let mut seen = Grid::new(self.rows(), self.columns());
        let mut queue = VecDeque::new();
        seen.mark_visited(origin);
        queue.push_back(origin);

        while let Some(cell) = queue.pop_front() {
            for neighbor in self.open_neighbors(cell) {
                if !seen.is_visited(neighbor) {
                    seen.mark_visited(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }

        seen.visited_count()
    }

    /// Route through openings from `from` to `to`, both endpoints included.
    ///
    /// Returns `None` when either endpoint lies outside the maze.
    #[must_use]
    pub fn shortest_path(&self, from: CellCoord, to: CellCoord) -> Option<Vec<CellCoord>> {
        if !self.grid.contains(from) || !self.grid.contains(to) {
            return None;
        }

        let columns = usize::try_from(self.columns()).ok()?;
        let index = |cell: CellCoord| -> Option<usize> {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            Some(row * columns + column)
        };

        let mut came_from: Vec<Option<CellCoord>> = vec![None; self.grid_len()];
        let mut seen = Grid::new(self.rows(), self.columns());
        let mut queue = VecDeque::new();
        seen.mark_visited(from);
        queue.push_back(from);

        while let Some(cell) = queue.pop_front() {
            if cell == to {
                break;
            }
            for neighbor in self.open_neighbors(cell) {
                if seen.is_visited(neighbor) {
                    continue;
                }
                seen.mark_visited(neighbor);
                came_from[index(neighbor)?] = Some(cell);
                queue.push_back(neighbor);
            }
        }

        if !seen.is_visited(to) {
            return None;
        }

        let mut path = vec![to];
        let mut cursor = to;
        while cursor != from {
            cursor = came_from[index(cursor)?]?;
            path.push(cursor);
        }
        path.reverse();
        Some(path)
    }

    fn grid_len(&self) -> usize {
        usize::try_from(u64::from(self.rows()) * u64::from(self.columns())).unwrap_or(0)
    }

    fn open_between(&mut self, cell: CellCoord, direction: Direction) {
        match direction {
            Direction::Up => self.horizontals.open(cell.row() - 1, cell.column()),
            Direction::Down => self.horizontals.open(cell.row(), cell.column()),
            Direction::Left => self.verticals.open(cell.row(), cell.column() - 1),
            Direction::Right => self.verticals.open(cell.row(), cell.column()),
        }
    }
}

/// Generates a maze of `rows × columns` cells.
///
/// With a seed the result is fully reproducible, start cell included. Without
/// one the random source is seeded from the operating system.
pub fn generate(rows: u32, columns: u32, seed: Option<u64>) -> Result<Maze, GenerationError> {
    validate_dimensions(rows, columns)?;

    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let start = CellCoord::new(rng.gen_range(0..rows), rng.gen_range(0..columns));

    generate_from(rows, columns, start, &mut rng)
}

/// Generates a maze starting the traversal at `start`, drawing every
/// neighbour ordering from `rng`.
pub fn generate_from<R>(
    rows: u32,
    columns: u32,
    start: CellCoord,
    rng: &mut R,
) -> Result<Maze, GenerationError>
where
    R: Rng + ?Sized,
{
    validate_dimensions(rows, columns)?;

    let mut maze = Maze {
        grid: Grid::new(rows, columns),
        verticals: WallMatrix::closed(rows, columns - 1),
        horizontals: WallMatrix::closed(rows - 1, columns),
        start,
    };

    if !maze.grid.contains(start) {
        return Err(GenerationError::StartOutOfBounds {
            row: start.row(),
            column: start.column(),
            rows,
            columns,
        });
    }

    maze.grid.mark_visited(start);
    let mut stack = vec![Frame::enter(start, &mut *rng)];

    while let Some(frame) = stack.last_mut() {
        let cell = frame.cell;
        let Some(direction) = frame.next_direction() else {
            let _ = stack.pop();
            continue;
        };

        let Some(neighbor) = cell.step(direction, rows, columns) else {
            continue;
        };
        if maze.grid.is_visited(neighbor) {
            continue;
        }

        maze.open_between(cell, direction);
        maze.grid.mark_visited(neighbor);
        stack.push(Frame::enter(neighbor, &mut *rng));
    }

    Ok(maze)
}

fn validate_dimensions(rows: u32, columns: u32) -> Result<(), GenerationError> {
    if rows == 0 || columns == 0 {
        return Err(GenerationError::InvalidDimensions { rows, columns });
    }
    if u64::from(rows) * u64::from(columns) > MAX_CELLS {
        return Err(GenerationError::TooManyCells {
            rows,
            columns,
            limit: MAX_CELLS,
        });
    }
    Ok(())
}

/// One level of the depth-first traversal: a cell and the neighbour
/// directions it has yet to try.
#[derive(Clone, Copy, Debug)]
struct Frame {
    cell: CellCoord,
    directions: [Direction; 4],
    cursor: usize,
}

impl Frame {
    fn enter<R>(cell: CellCoord, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        Self {
            cell,
            directions,
            cursor: 0,
        }
    }

    fn next_direction(&mut self) -> Option<Direction> {
        let direction = self.directions.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_yields_each_direction_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut frame = Frame::enter(CellCoord::new(0, 0), &mut rng);

        let mut seen = Vec::new();
        while let Some(direction) = frame.next_direction() {
            seen.push(direction);
        }

        assert_eq!(seen.len(), 4);
        for direction in Direction::ALL {
            assert!(seen.contains(&direction));
        }
    }

    #[test]
    fn is_open_agrees_from_both_sides() {
        let maze = generate(5, 6, Some(11)).expect("valid dimensions");

        for row in 0..maze.rows() {
            for column in 0..maze.columns() {
                let cell = CellCoord::new(row, column);
                for direction in Direction::ALL {
                    let Some(neighbor) = cell.step(direction, maze.rows(), maze.columns()) else {
                        assert!(!maze.is_open(cell, direction));
                        continue;
                    };
                    assert_eq!(
                        maze.is_open(cell, direction),
                        maze.is_open(neighbor, direction.opposite()),
                    );
                }
            }
        }
    }

    #[test]
    fn start_cell_outside_grid_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = generate_from(2, 2, CellCoord::new(2, 0), &mut rng);
        assert_eq!(
            result,
            Err(GenerationError::StartOutOfBounds {
                row: 2,
                column: 0,
                rows: 2,
                columns: 2,
            })
        );
    }

    #[test]
    fn shortest_path_walks_through_openings() {
        let maze = generate(6, 4, Some(99)).expect("valid dimensions");
        let from = CellCoord::new(0, 0);
        let to = CellCoord::new(5, 3);
        let path = maze.shortest_path(from, to).expect("maze is connected");

        assert_eq!(path.first(), Some(&from));
        assert_eq!(path.last(), Some(&to));
        for pair in path.windows(2) {
            assert!(maze.open_neighbors(pair[0]).any(|cell| cell == pair[1]));
        }
    }

    #[test]
    fn shortest_path_to_self_is_single_cell() {
        let maze = generate(3, 3, Some(5)).expect("valid dimensions");
        let cell = CellCoord::new(1, 1);
        assert_eq!(maze.shortest_path(cell, cell), Some(vec![cell]));
        assert_eq!(maze.shortest_path(cell, CellCoord::new(3, 0)), None);
    }
}
