#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure translation of logical mazes into physical body blueprints.
//!
//! Cell `(row, column)` occupies the world-space rectangle
//! `[column * unit_width, (column + 1) * unit_width] × [row * unit_height, (row + 1) * unit_height]`
//! with the y axis growing downward. Every closed wall becomes a thin static
//! rectangle centred on the edge it blocks; open walls produce nothing.

mod layout;

use ball_maze_core::{BodyId, BodyLabel, BodySpec, Shape};
use ball_maze_system_maze_generation::Maze;
use glam::Vec2;
use thiserror::Error;

pub use layout::{borders, ArenaLayout};

/// Thickness of an internal maze wall in world units.
pub const WALL_THICKNESS: f32 = 5.0;
/// Thickness of each border segment in world units.
pub const BORDER_THICKNESS: f32 = 2.0;
/// Goal extent relative to the cell it sits in.
pub const GOAL_SCALE: f32 = 0.7;
/// Ball radius relative to the shorter cell side.
pub const BALL_RADIUS_SCALE: f32 = 0.33;

/// Reasons geometry cannot be derived.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GeometryError {
    /// Cell extents must be positive and finite.
    #[error("unit size {width}x{height} must be positive and finite")]
    InvalidUnitSize {
        /// Requested cell width.
        width: f32,
        /// Requested cell height.
        height: f32,
    },
    /// A level must span at least one column.
    #[error("a level needs at least one column")]
    EmptyLevel,
    /// The arena's aspect ratio would size the level beyond the maze cell limit.
    #[error("level {columns} would need {rows} rows, exceeding the limit of {limit} cells")]
    LevelTooLarge {
        /// Requested number of columns.
        columns: u32,
        /// Rows the arena's aspect ratio asks for.
        rows: u64,
        /// Cell ceiling that was exceeded.
        limit: u64,
    },
}

/// Physical body described independently of the identifier it will receive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyBlueprint {
    /// Role of the body.
    pub label: BodyLabel,
    /// Collision geometry.
    pub shape: Shape,
    /// Centre in world coordinates.
    pub position: Vec2,
    /// Whether the body starts out held in place.
    pub is_static: bool,
}

impl BodyBlueprint {
    /// Creates a static axis-aligned rectangle.
    #[must_use]
    pub const fn static_rectangle(label: BodyLabel, position: Vec2, width: f32, height: f32) -> Self {
        Self {
            label,
            shape: Shape::Rectangle { width, height },
            position,
            is_static: true,
        }
    }

    /// Binds the blueprint to an identifier, producing a body the physics world accepts.
    #[must_use]
    pub const fn into_spec(self, id: BodyId) -> BodySpec {
        BodySpec {
            id,
            label: self.label,
            shape: self.shape,
            position: self.position,
            is_static: self.is_static,
        }
    }
}

/// Bodies derived from a single maze.
#[derive(Clone, Debug, PartialEq)]
pub struct MazeBodies {
    /// One static rectangle per closed wall, horizontal walls first.
    pub walls: Vec<BodyBlueprint>,
    /// Static goal region centred in the last cell.
    pub goal: BodyBlueprint,
    /// Dynamic ball centred in the first cell.
    pub ball: BodyBlueprint,
}

/// Converts `maze` into wall, goal and ball blueprints.
pub fn translate(
    maze: &Maze,
    unit_width: f32,
    unit_height: f32,
) -> Result<MazeBodies, GeometryError> {
    if !(unit_width.is_finite() && unit_height.is_finite() && unit_width > 0.0 && unit_height > 0.0)
    {
        return Err(GeometryError::InvalidUnitSize {
            width: unit_width,
            height: unit_height,
        });
    }

    let capacity = maze.horizontals().len() + maze.verticals().len();
    let mut walls = Vec::with_capacity(capacity.saturating_sub(maze.open_wall_count()));

    for (row, column, open) in maze.horizontals().iter() {
        if open {
            continue;
        }
        walls.push(BodyBlueprint::static_rectangle(
            BodyLabel::Wall,
            Vec2::new(
                column as f32 * unit_width + unit_width / 2.0,
                row as f32 * unit_height + unit_height,
            ),
            unit_width,
            WALL_THICKNESS,
        ));
    }

    for (row, column, open) in maze.verticals().iter() {
        if open {
            continue;
        }
        walls.push(BodyBlueprint::static_rectangle(
            BodyLabel::Wall,
            Vec2::new(
                column as f32 * unit_width + unit_width,
                row as f32 * unit_height + unit_height / 2.0,
            ),
            WALL_THICKNESS,
            unit_height,
        ));
    }

    let last_row = maze.rows().saturating_sub(1);
    let last_column = maze.columns().saturating_sub(1);
    let goal = BodyBlueprint::static_rectangle(
        BodyLabel::Goal,
        cell_centre(last_row, last_column, unit_width, unit_height),
        GOAL_SCALE * unit_width,
        GOAL_SCALE * unit_height,
    );

    let ball = BodyBlueprint {
        label: BodyLabel::Ball,
        shape: Shape::Circle {
            radius: BALL_RADIUS_SCALE * unit_width.min(unit_height),
        },
        position: cell_centre(0, 0, unit_width, unit_height),
        is_static: false,
    };

    Ok(MazeBodies { walls, goal, ball })
}

fn cell_centre(row: u32, column: u32, unit_width: f32, unit_height: f32) -> Vec2 {
    Vec2::new(
        column as f32 * unit_width + unit_width / 2.0,
        row as f32 * unit_height + unit_height / 2.0,
    )
}
