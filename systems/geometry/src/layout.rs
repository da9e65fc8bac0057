//! Arena sizing: how a level maps onto the play area, and the frame around it.

use ball_maze_core::{Arena, BodyLabel, Level};
use ball_maze_system_maze_generation::MAX_CELLS;
use glam::Vec2;

use crate::{BodyBlueprint, GeometryError, BORDER_THICKNESS};

/// Grid dimensions and cell size chosen for a level inside an arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaLayout {
    rows: u32,
    columns: u32,
    unit_width: f32,
    unit_height: f32,
}

impl ArenaLayout {
    /// Sizes a level so cells stay close to square.
    ///
    /// The level fixes the column count; rows follow the arena's aspect ratio
    /// and are always at least one. Layouts whose cell count would exceed
    /// [`MAX_CELLS`] are rejected.
    pub fn for_level(arena: Arena, level: Level) -> Result<Self, GeometryError> {
        let columns = level.get();
        if columns == 0 {
            return Err(GeometryError::EmptyLevel);
        }

        let aspect = f64::from(arena.height()) / f64::from(arena.width());
        let wanted_rows = (aspect * f64::from(columns)).floor() + 1.0;
        if wanted_rows * f64::from(columns) > MAX_CELLS as f64 {
            return Err(GeometryError::LevelTooLarge {
                columns,
                rows: wanted_rows as u64,
                limit: MAX_CELLS,
            });
        }
        let rows = wanted_rows as u32;

        Ok(Self {
            rows,
            columns,
            unit_width: arena.width() / columns as f32,
            unit_height: arena.height() / rows as f32,
        })
    }

    /// Number of maze rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of maze columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Width of a single cell in world units.
    #[must_use]
    pub const fn unit_width(&self) -> f32 {
        self.unit_width
    }

    /// Height of a single cell in world units.
    #[must_use]
    pub const fn unit_height(&self) -> f32 {
        self.unit_height
    }
}

/// Four static segments centred on the arena edges: top, bottom, left, right.
#[must_use]
pub fn borders(arena: Arena) -> [BodyBlueprint; 4] {
    let width = arena.width();
    let height = arena.height();

    [
        BodyBlueprint::static_rectangle(
            BodyLabel::Border,
            Vec2::new(width / 2.0, 0.0),
            width,
            BORDER_THICKNESS,
        ),
        BodyBlueprint::static_rectangle(
            BodyLabel::Border,
            Vec2::new(width / 2.0, height),
            width,
            BORDER_THICKNESS,
        ),
        BodyBlueprint::static_rectangle(
            BodyLabel::Border,
            Vec2::new(0.0, height / 2.0),
            BORDER_THICKNESS,
            height,
        ),
        BodyBlueprint::static_rectangle(
            BodyLabel::Border,
            Vec2::new(width, height / 2.0),
            BORDER_THICKNESS,
            height,
        ),
    ]
}
