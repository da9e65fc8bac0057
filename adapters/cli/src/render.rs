//! Plain-text maze drawing.

use std::collections::HashSet;

use ball_maze_core::{CellCoord, Direction};
use ball_maze_system_maze_generation::Maze;

const CORNER: char = '+';

/// Draws `maze` with the ball in the top-left cell, the goal in the
/// bottom-right cell and every other cell of `path` dotted.
pub(crate) fn maze(maze: &Maze, path: &[CellCoord]) -> String {
    let on_path: HashSet<CellCoord> = path.iter().copied().collect();
    let ball = CellCoord::new(0, 0);
    let goal = CellCoord::new(maze.rows().saturating_sub(1), maze.columns().saturating_sub(1));

    let mut out = String::new();
    push_closed_edge(&mut out, maze.columns());

    for row in 0..maze.rows() {
        out.push('|');
        for column in 0..maze.columns() {
            let cell = CellCoord::new(row, column);
            let marker = if cell == goal {
                'G'
            } else if cell == ball {
                'B'
            } else if on_path.contains(&cell) {
                '.'
            } else {
                ' '
            };
            out.push(' ');
            out.push(marker);
            out.push(' ');
            out.push(if maze.is_open(cell, Direction::Right) {
                ' '
            } else {
                '|'
            });
        }
        out.push('\n');

        if row + 1 == maze.rows() {
            push_closed_edge(&mut out, maze.columns());
            continue;
        }
        out.push(CORNER);
        for column in 0..maze.columns() {
            let floor = if maze.is_open(CellCoord::new(row, column), Direction::Down) {
                "   "
            } else {
                "---"
            };
            out.push_str(floor);
            out.push(CORNER);
        }
        out.push('\n');
    }

    out
}

fn push_closed_edge(out: &mut String, columns: u32) {
    out.push(CORNER);
    for _ in 0..columns {
        out.push_str("---");
        out.push(CORNER);
    }
    out.push('\n');
}
