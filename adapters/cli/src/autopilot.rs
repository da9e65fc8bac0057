//! Headless session that steers the ball along the solution of each level.

use anyhow::{Context, Result};
use ball_maze_core::{BodyId, CellCoord, Command, Direction, Event, Level, Phase, WinNotice};
use ball_maze_physics::{dispatch, OverlayState, PhysicsBackend, Sandbox};
use ball_maze_system_geometry::ArenaLayout;
use ball_maze_system_maze_generation::Maze;
use ball_maze_world::{self as world, query, Game, GameConfig};
use glam::Vec2;
use tracing::{debug, info};

/// Outcome of steering the ball through one level.
#[derive(Debug)]
pub(crate) struct Run {
    /// Level that was played.
    pub(crate) level: Level,
    /// Maze of that level.
    pub(crate) maze: Maze,
    /// Cells the ball visited, in order.
    pub(crate) path: Vec<CellCoord>,
    /// Win message on screen when the run ended.
    pub(crate) notice: Option<WinNotice>,
}

/// World, physics sandbox and overlay wired together.
#[derive(Debug)]
pub(crate) struct Session {
    game: Game,
    sandbox: Sandbox,
    overlay: OverlayState,
    touching: Vec<BodyId>,
}

impl Session {
    pub(crate) fn new(config: GameConfig) -> Self {
        Self {
            game: Game::new(config),
            sandbox: Sandbox::new(),
            overlay: OverlayState::default(),
            touching: Vec::new(),
        }
    }

    pub(crate) fn begin(&mut self) -> Result<()> {
        let _ = self.apply(Command::Begin)?;
        Ok(())
    }

    pub(crate) fn restart(&mut self) -> Result<()> {
        let _ = self.apply(Command::Restart)?;
        Ok(())
    }

    /// Walks the ball cell by cell toward the goal until the world reports a win.
    pub(crate) fn solve(&mut self) -> Result<Run> {
        let maze = query::maze(&self.game)
            .context("no level in play")?
            .clone();
        let layout = query::layout(&self.game).context("no level in play")?;
        let ball = query::ball(&self.game).context("no ball in play")?;

        let origin = CellCoord::new(0, 0);
        let goal = CellCoord::new(maze.rows() - 1, maze.columns() - 1);
        let route = maze
            .shortest_path(origin, goal)
            .context("goal is unreachable")?;

        let mut path = vec![origin];
        self.report_contacts(ball)?;
        for step in route.windows(2) {
            if query::phase(&self.game) == Phase::Won {
                break;
            }
            let (from, to) = (step[0], step[1]);
            let direction = direction_between(from, to)
                .with_context(|| format!("cells {from:?} and {to:?} are not adjacent"))?;
            let velocity = self.sandbox.velocity(ball).unwrap_or(Vec2::ZERO);
            let _ = self.apply(Command::Move {
                direction,
                velocity,
            })?;

            self.sandbox.place(ball, cell_centre(&layout, to))?;
            path.push(to);
            self.report_contacts(ball)?;
        }

        info!(
            level = query::level(&self.game).get(),
            steps = path.len() - 1,
            won = query::phase(&self.game) == Phase::Won,
            "autopilot finished"
        );

        Ok(Run {
            level: query::level(&self.game),
            maze,
            path,
            notice: self.overlay.visible(),
        })
    }

    /// Reports only the overlaps that began since the previous check.
    fn report_contacts(&mut self, ball: BodyId) -> Result<()> {
        let current = self.sandbox.overlapping(ball);
        let started = new_contacts(&self.touching, &current);
        self.touching = current;
        if started.is_empty() {
            return Ok(());
        }

        let pairs = self.sandbox.pairs(ball, &started);
        debug!(contacts = pairs.len(), "ball started touching other bodies");
        let _ = self.apply(Command::CollisionStarted { pairs })?;
        Ok(())
    }

    fn apply(&mut self, command: Command) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        world::apply(&mut self.game, command, &mut events)?;
        if events.contains(&Event::WorldCleared) {
            self.touching.clear();
        }
        dispatch(&events, &mut self.sandbox, &mut self.overlay)?;
        Ok(events)
    }
}

fn new_contacts(previous: &[BodyId], current: &[BodyId]) -> Vec<BodyId> {
    current
        .iter()
        .filter(|body| !previous.contains(body))
        .copied()
        .collect()
}

fn direction_between(from: CellCoord, to: CellCoord) -> Option<Direction> {
    Direction::ALL.into_iter().find(|direction| {
        from.step(*direction, u32::MAX, u32::MAX) == Some(to)
    })
}

fn cell_centre(layout: &ArenaLayout, cell: CellCoord) -> Vec2 {
    Vec2::new(
        (cell.column() as f32 + 0.5) * layout.unit_width(),
        (cell.row() as f32 + 0.5) * layout.unit_height(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ball_maze_core::LevelRange;

    #[test]
    fn adjacent_cells_map_to_directions() {
        let centre = CellCoord::new(2, 2);
        assert_eq!(
            direction_between(centre, CellCoord::new(1, 2)),
            Some(Direction::Up)
        );
        assert_eq!(
            direction_between(centre, CellCoord::new(2, 3)),
            Some(Direction::Right)
        );
        assert_eq!(
            direction_between(centre, CellCoord::new(3, 2)),
            Some(Direction::Down)
        );
        assert_eq!(
            direction_between(centre, CellCoord::new(2, 1)),
            Some(Direction::Left)
        );
        assert_eq!(direction_between(centre, CellCoord::new(3, 3)), None);
    }

    #[test]
    fn lasting_contacts_are_reported_once() {
        let (wall, goal) = (BodyId::new(1), BodyId::new(2));

        assert_eq!(new_contacts(&[], &[wall]), vec![wall]);
        assert!(new_contacts(&[wall], &[wall]).is_empty());
        assert_eq!(new_contacts(&[wall], &[wall, goal]), vec![goal]);
        assert!(new_contacts(&[wall, goal], &[]).is_empty());
        assert_eq!(new_contacts(&[goal], &[wall]), vec![wall]);
    }

    #[test]
    fn contact_memory_resets_with_each_level() {
        let mut session = Session::new(GameConfig {
            levels: LevelRange::new(1, 1).expect("valid range"),
            seed: Some(8),
            ..GameConfig::default()
        });
        session.begin().expect("level builds");
        let _ = session.solve().expect("level solvable");
        assert!(!session.touching.is_empty());

        session.restart().expect("level rebuilds");
        assert!(session.touching.is_empty());
        let run = session.solve().expect("level solvable");
        assert!(run.notice.is_some());
    }

    #[test]
    fn autopilot_clears_every_level_of_a_run() {
        let mut session = Session::new(GameConfig {
            levels: LevelRange::new(2, 4).expect("valid range"),
            seed: Some(99),
            ..GameConfig::default()
        });
        session.begin().expect("first level builds");

        for expected in [2, 3, 4, 2] {
            let run = session.solve().expect("level solvable");
            assert_eq!(run.level.get(), expected);
            assert_eq!(run.path.first(), Some(&CellCoord::new(0, 0)));
            assert_eq!(
                run.path.last(),
                Some(&CellCoord::new(run.maze.rows() - 1, run.maze.columns() - 1))
            );
            let notice = run.notice.expect("goal reached");
            assert_eq!(notice.is_final_level, expected == 4);
            session.restart().expect("next level builds");
        }
    }

    #[test]
    fn single_cell_level_is_won_without_moving() {
        let mut session = Session::new(GameConfig {
            levels: LevelRange::new(1, 1).expect("valid range"),
            seed: Some(5),
            ..GameConfig::default()
        });
        session.begin().expect("level builds");

        let run = session.solve().expect("level solvable");
        assert_eq!(run.path, vec![CellCoord::new(0, 0)]);
        assert!(run.notice.is_some());
    }
}
