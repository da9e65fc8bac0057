#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Ball Maze.
//!
//! The world owns the progression state machine. It never talks to a physics
//! engine or a user interface directly: [`apply`] consumes one [`Command`] and
//! appends the resulting side effects to an event buffer, in the order the
//! collaborators must carry them out.

mod config;

use ball_maze_core::{
    BodyId, BodyLabel, BodySpec, Command, Direction, Event, Level, Phase, WinNotice,
};
use ball_maze_system_geometry::{borders, translate, ArenaLayout, BodyBlueprint, GeometryError};
use ball_maze_system_maze_generation::{generate, GenerationError, Maze};
use glam::Vec2;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

pub use config::GameConfig;

/// Velocity change applied by a single movement command.
pub const IMPULSE: f32 = 5.0;

/// Gravity switched on once the ball reaches the goal.
pub const RELEASE_GRAVITY: Vec2 = Vec2::new(0.0, 1.0);

/// Failures while building a level.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum WorldError {
    /// The maze could not be generated.
    #[error("maze generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// The maze could not be turned into bodies.
    #[error("geometry translation failed: {0}")]
    Geometry(#[from] GeometryError),
}

/// Represents the authoritative Ball Maze world state.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    phase: Phase,
    level: Level,
    round: u64,
    next_body: u32,
    stage: Option<Stage>,
}

/// Everything known about the level currently in play.
#[derive(Debug)]
struct Stage {
    layout: ArenaLayout,
    maze: Maze,
    borders: Vec<BodyId>,
    walls: Vec<BodyId>,
    goal: BodyId,
    ball: BodyId,
}

impl Game {
    /// Creates a world at the first level of `config`. No bodies exist until
    /// [`Command::Begin`] is applied.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            phase: Phase::Playing,
            level: config.levels.start(),
            round: 0,
            next_body: 0,
            stage: None,
            config,
        }
    }

    fn allocate(&mut self, blueprint: BodyBlueprint) -> BodySpec {
        let id = BodyId::new(self.next_body);
        self.next_body = self.next_body.wrapping_add(1);
        blueprint.into_spec(id)
    }

    fn maze_seed(&self, level: Level) -> Option<u64> {
        self.config
            .seed
            .map(|seed| derive_maze_seed(seed, self.round, level))
    }

    /// Clears the physics world and builds `level` from scratch.
    ///
    /// The maze and its bodies are derived before any state changes so a
    /// failure leaves the world untouched.
    fn start_level(&mut self, level: Level, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
        let layout = ArenaLayout::for_level(self.config.arena, level)?;
        let maze = generate(layout.rows(), layout.columns(), self.maze_seed(level))?;
        let bodies = translate(&maze, layout.unit_width(), layout.unit_height())?;

        out_events.push(Event::WorldCleared);
        if self.phase == Phase::Won {
            out_events.push(Event::WinNoticeHidden);
        }
        out_events.push(Event::GravityChanged { gravity: Vec2::ZERO });

        let frame: Vec<BodySpec> = borders(self.config.arena)
            .into_iter()
            .map(|blueprint| self.allocate(blueprint))
            .collect();
        let border_ids: Vec<BodyId> = frame.iter().map(|spec| spec.id).collect();

        let mut specs: Vec<BodySpec> = bodies
            .walls
            .into_iter()
            .map(|blueprint| self.allocate(blueprint))
            .collect();
        let goal = self.allocate(bodies.goal);
        let ball = self.allocate(bodies.ball);
        let walls = specs.iter().map(|spec| spec.id).collect();
        specs.push(goal);
        specs.push(ball);

        out_events.push(Event::BodiesAdded { bodies: frame });
        out_events.push(Event::BodiesAdded { bodies: specs });

        let previous_phase = self.phase;
        self.level = level;
        self.phase = Phase::Playing;
        self.stage = Some(Stage {
            layout,
            borders: border_ids,
            walls,
            goal: goal.id,
            ball: ball.id,
            maze,
        });

        if previous_phase != Phase::Playing {
            out_events.push(Event::PhaseChanged {
                phase: Phase::Playing,
            });
        }
        out_events.push(Event::LevelStarted {
            level,
            round: self.round,
            rows: layout.rows(),
            columns: layout.columns(),
        });

        info!(
            level = level.get(),
            round = self.round,
            rows = layout.rows(),
            columns = layout.columns(),
            "level started"
        );
        self.round = self.round.wrapping_add(1);
        Ok(())
    }

    fn nudge_ball(&self, direction: Direction, velocity: Vec2, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Playing {
            debug!(?direction, "movement ignored after the goal was reached");
            return;
        }
        let Some(stage) = &self.stage else {
            debug!(?direction, "movement ignored before the first level");
            return;
        };

        out_events.push(Event::VelocityChanged {
            body: stage.ball,
            velocity: velocity + direction.unit_vector() * IMPULSE,
        });
    }

    fn release(&mut self, out_events: &mut Vec<Event>) {
        let Some(stage) = &self.stage else {
            return;
        };

        out_events.push(Event::GravityChanged {
            gravity: RELEASE_GRAVITY,
        });
        for body in stage.walls.iter().chain(std::iter::once(&stage.goal)) {
            out_events.push(Event::StaticChanged {
                body: *body,
                is_static: false,
            });
        }

        let notice = WinNotice {
            is_final_level: self.config.levels.is_final(self.level),
        };
        out_events.push(Event::WinNoticeShown { notice });
        out_events.push(Event::PhaseChanged { phase: Phase::Won });

        info!(
            level = self.level.get(),
            is_final_level = notice.is_final_level,
            "goal reached"
        );
        self.phase = Phase::Won;
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that make no sense in the current phase are ignored without
/// emitting events. An error is only possible while building a level, in
/// which case no events are emitted and the world is unchanged.
pub fn apply(
    game: &mut Game,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    match command {
        Command::Begin => {
            let level = game.level;
            game.start_level(level, out_events)?;
        }
        Command::Move {
            direction,
            velocity,
        } => game.nudge_ball(direction, velocity, out_events),
        Command::CollisionStarted { pairs } => {
            if game.phase != Phase::Playing || game.stage.is_none() {
                return Ok(());
            }
            if pairs
                .iter()
                .any(|pair| pair.is_between(BodyLabel::Ball, BodyLabel::Goal))
            {
                game.release(out_events);
            }
        }
        Command::Restart => {
            if game.stage.is_none() {
                debug!(
                    level = game.level.get(),
                    "restart before the first level acts as begin"
                );
                let level = game.level;
                game.start_level(level, out_events)?;
                return Ok(());
            }
            if game.phase == Phase::Playing {
                debug!(level = game.level.get(), "restart requested mid-level");
            }
            let level = game.config.levels.advance(game.level);
            game.start_level(level, out_events)?;
        }
    }

    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use ball_maze_core::{BodyId, Level, Phase};
    use ball_maze_system_geometry::ArenaLayout;
    use ball_maze_system_maze_generation::Maze;

    use super::{Game, GameConfig};

    /// Current phase of the progression state machine.
    #[must_use]
    pub fn phase(game: &Game) -> Phase {
        game.phase
    }

    /// Level currently in play, or about to be built.
    #[must_use]
    pub fn level(game: &Game) -> Level {
        game.level
    }

    /// Number of levels built so far.
    #[must_use]
    pub fn round(game: &Game) -> u64 {
        game.round
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(game: &Game) -> &GameConfig {
        &game.config
    }

    /// Maze of the level in play.
    #[must_use]
    pub fn maze(game: &Game) -> Option<&Maze> {
        game.stage.as_ref().map(|stage| &stage.maze)
    }

    /// Grid dimensions and cell size of the level in play.
    #[must_use]
    pub fn layout(game: &Game) -> Option<ArenaLayout> {
        game.stage.as_ref().map(|stage| stage.layout)
    }

    /// Identifier of the ball.
    #[must_use]
    pub fn ball(game: &Game) -> Option<BodyId> {
        game.stage.as_ref().map(|stage| stage.ball)
    }

    /// Identifier of the goal.
    #[must_use]
    pub fn goal(game: &Game) -> Option<BodyId> {
        game.stage.as_ref().map(|stage| stage.goal)
    }

    /// Identifiers of the internal maze walls.
    #[must_use]
    pub fn walls(game: &Game) -> &[BodyId] {
        game.stage
            .as_ref()
            .map(|stage| stage.walls.as_slice())
            .unwrap_or(&[])
    }

    /// Identifiers of the four border segments.
    #[must_use]
    pub fn borders(game: &Game) -> &[BodyId] {
        game.stage
            .as_ref()
            .map(|stage| stage.borders.as_slice())
            .unwrap_or(&[])
    }
}

fn derive_maze_seed(global_seed: u64, round: u64, level: Level) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(round.to_le_bytes());
    hasher.update(level.get().to_le_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
