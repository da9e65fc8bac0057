#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ball Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative game world, and pure systems. Adapters submit [`Command`]
//! values describing player input and physics notifications, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values describing the side effects the physics world and the
//! user interface must carry out. Systems are pure functions over immutable
//! inputs and never touch adapters directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Ball Maze.";

/// Commands that express every input the game world reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Builds the opening level at the configured start difficulty.
    Begin,
    /// Nudges the ball one impulse step in the provided direction.
    Move {
        /// Direction of the requested impulse.
        direction: Direction,
        /// Ball velocity reported by the physics world before the nudge.
        velocity: Vec2,
    },
    /// Reports pairs of bodies that started touching during the last step.
    CollisionStarted {
        /// Labelled body pairs captured by the physics world.
        pairs: Vec<CollisionPair>,
    },
    /// Requests the next level, or a fresh run after the final level.
    ///
    /// Before any level exists it builds the opening level, like [`Command::Begin`].
    Restart,
}

/// Events broadcast by the world after processing commands.
///
/// Every event is a side effect addressed to the physics world or the user
/// interface. Events are emitted in the order they must be carried out.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Every body was removed from the physics world.
    WorldCleared,
    /// Bodies that must be registered with the physics world.
    BodiesAdded {
        /// Bodies in registration order.
        bodies: Vec<BodySpec>,
    },
    /// The velocity of a body must be replaced.
    VelocityChanged {
        /// Body whose velocity changes.
        body: BodyId,
        /// Velocity the body should move with.
        velocity: Vec2,
    },
    /// A body switched between static and dynamic simulation.
    StaticChanged {
        /// Body whose simulation mode changes.
        body: BodyId,
        /// Whether the body is held in place.
        is_static: bool,
    },
    /// The world-wide gravity vector changed.
    GravityChanged {
        /// Gravity applied to every dynamic body.
        gravity: Vec2,
    },
    /// The interface should display the win overlay.
    WinNoticeShown {
        /// Details that select the message shown to the player.
        notice: WinNotice,
    },
    /// The interface should hide the win overlay.
    WinNoticeHidden,
    /// A freshly generated level is ready for play.
    LevelStarted {
        /// Difficulty of the level, equal to its column count.
        level: Level,
        /// Zero-based count of levels built since the world was created.
        round: u64,
        /// Number of rows in the generated maze.
        rows: u32,
        /// Number of columns in the generated maze.
        columns: u32,
    },
    /// The game moved into a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
}

/// Phase of the progression state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The ball is in play and the goal has not been reached.
    Playing,
    /// The ball reached the goal; the world waits for a restart.
    Won,
}

/// Cardinal directions within the maze grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// All directions in clockwise order starting at [`Direction::Up`].
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Returns the direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// Unit vector in world space, where the y axis grows downward.
    #[must_use]
    pub const fn unit_vector(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
        }
    }
}

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Returns the adjacent cell in `direction` when it lies inside a
    /// `rows × columns` grid.
    #[must_use]
    pub fn step(self, direction: Direction, rows: u32, columns: u32) -> Option<CellCoord> {
        let (row, column) = match direction {
            Direction::Up => (self.row.checked_sub(1)?, self.column),
            Direction::Right => (self.row, self.column.checked_add(1)?),
            Direction::Down => (self.row.checked_add(1)?, self.column),
            Direction::Left => (self.row, self.column.checked_sub(1)?),
        };

        if row < rows && column < columns {
            Some(CellCoord::new(row, column))
        } else {
            None
        }
    }
}

/// Unique identifier assigned to a body handed to the physics world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(u32);

impl BodyId {
    /// Creates a new body identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Role a body plays in the game, used to recognise collisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyLabel {
    /// The player-controlled ball.
    Ball,
    /// The target region the ball must reach.
    Goal,
    /// An internal maze wall.
    Wall,
    /// One of the four segments enclosing the play area.
    Border,
}

impl BodyLabel {
    /// Textual tag used by physics engines that identify bodies by string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ball => "ball",
            Self::Goal => "goal",
            Self::Wall => "wall",
            Self::Border => "border",
        }
    }

    /// Parses a textual tag, yielding `None` for anything unrecognised.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ball" => Some(Self::Ball),
            "goal" => Some(Self::Goal),
            "wall" => Some(Self::Wall),
            "border" => Some(Self::Border),
            _ => None,
        }
    }
}

/// Collision geometry of a body.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned rectangle measured in world units.
    Rectangle {
        /// Extent along the x axis.
        width: f32,
        /// Extent along the y axis.
        height: f32,
    },
    /// Circle measured in world units.
    Circle {
        /// Distance from the centre to the rim.
        radius: f32,
    },
}

/// Complete description of a body handed to the physics world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    /// Identifier allocated by the world.
    pub id: BodyId,
    /// Role of the body.
    pub label: BodyLabel,
    /// Collision geometry.
    pub shape: Shape,
    /// Centre of the body in world coordinates.
    pub position: Vec2,
    /// Whether the body is held in place by the simulation.
    pub is_static: bool,
}

/// Pair of bodies reported by the physics world when they start touching.
///
/// Labels are optional because engines may report bodies without a tag; such
/// pairs never match any rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CollisionPair {
    /// Label of the first body, if present.
    pub first: Option<BodyLabel>,
    /// Label of the second body, if present.
    pub second: Option<BodyLabel>,
}

impl CollisionPair {
    /// Creates a pair from two present labels.
    #[must_use]
    pub const fn new(first: BodyLabel, second: BodyLabel) -> Self {
        Self {
            first: Some(first),
            second: Some(second),
        }
    }

    /// Creates a pair from textual tags, dropping tags that do not parse.
    #[must_use]
    pub fn from_tags(first: Option<&str>, second: Option<&str>) -> Self {
        Self {
            first: first.and_then(BodyLabel::from_tag),
            second: second.and_then(BodyLabel::from_tag),
        }
    }

    /// Reports whether the pair consists of exactly `a` and `b` in any order.
    #[must_use]
    pub fn is_between(&self, a: BodyLabel, b: BodyLabel) -> bool {
        match (self.first, self.second) {
            (Some(first), Some(second)) => {
                (first == a && second == b) || (first == b && second == a)
            }
            _ => false,
        }
    }
}

/// Difficulty of a level, expressed as the number of maze columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(u32);

impl Level {
    /// Creates a new level wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the number of maze columns for the level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Inclusive range of levels a run escalates through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLevelRange", into = "RawLevelRange")]
pub struct LevelRange {
    start: Level,
    max: Level,
}

impl LevelRange {
    /// Creates a level range, rejecting empty ranges and zero-column levels.
    pub fn new(start: u32, max: u32) -> Result<Self, ConfigError> {
        if start == 0 || start > max {
            return Err(ConfigError::InvalidLevelRange { start, max });
        }

        Ok(Self {
            start: Level::new(start),
            max: Level::new(max),
        })
    }

    /// Level every run begins at.
    #[must_use]
    pub const fn start(&self) -> Level {
        self.start
    }

    /// Hardest level of a run.
    #[must_use]
    pub const fn max(&self) -> Level {
        self.max
    }

    /// Reports whether `level` is the last level of the run.
    #[must_use]
    pub fn is_final(&self, level: Level) -> bool {
        level >= self.max
    }

    /// Level that follows `level`, wrapping back to the start after the final one.
    #[must_use]
    pub fn advance(&self, level: Level) -> Level {
        if level < self.max {
            Level::new(level.get() + 1)
        } else {
            self.start
        }
    }
}

impl Default for LevelRange {
    fn default() -> Self {
        Self {
            start: Level::new(3),
            max: Level::new(4),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawLevelRange {
    start: u32,
    max: u32,
}

impl TryFrom<RawLevelRange> for LevelRange {
    type Error = ConfigError;

    fn try_from(raw: RawLevelRange) -> Result<Self, Self::Error> {
        LevelRange::new(raw.start, raw.max)
    }
}

impl From<LevelRange> for RawLevelRange {
    fn from(range: LevelRange) -> Self {
        Self {
            start: range.start.get(),
            max: range.max.get(),
        }
    }
}

/// Dimensions of the rectangular play area in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawArena", into = "RawArena")]
pub struct Arena {
    width: f32,
    height: f32,
}

impl Arena {
    /// Creates a play area, rejecting non-positive or non-finite extents.
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidArena { width, height });
        }

        Ok(Self { width, height })
    }

    /// Extent of the play area along the x axis.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Extent of the play area along the y axis.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawArena {
    width: f32,
    height: f32,
}

impl TryFrom<RawArena> for Arena {
    type Error = ConfigError;

    fn try_from(raw: RawArena) -> Result<Self, Self::Error> {
        Arena::new(raw.width, raw.height)
    }
}

impl From<Arena> for RawArena {
    fn from(arena: Arena) -> Self {
        Self {
            width: arena.width,
            height: arena.height,
        }
    }
}

/// Reasons a game configuration is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The level range is empty or starts at zero columns.
    #[error("level range {start}..={max} must start at 1 or more and not exceed its maximum")]
    InvalidLevelRange {
        /// Requested first level.
        start: u32,
        /// Requested final level.
        max: u32,
    },
    /// The play area has a non-positive or non-finite extent.
    #[error("arena {width}x{height} must have positive finite dimensions")]
    InvalidArena {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}

/// Win details handed to the interface so it can pick the right message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinNotice {
    /// Whether the completed level was the last one of the run.
    pub is_final_level: bool,
}

impl WinNotice {
    /// Message announcing the win.
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        if self.is_final_level {
            "You are a real WINNER!"
        } else {
            "You win this time"
        }
    }

    /// Caption of the button that issues [`Command::Restart`].
    #[must_use]
    pub const fn button_label(&self) -> &'static str {
        if self.is_final_level {
            "New Game"
        } else {
            "Next Stage"
        }
    }
}
