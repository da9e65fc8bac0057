use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use ball_maze_core::{
    BodyLabel, CollisionPair, Command, Direction, Event, LevelRange, Phase, Shape,
};
use ball_maze_physics::{dispatch, OverlayState, PhysicsBackend, Sandbox};
use ball_maze_world::{self as world, query, Game, GameConfig};
use glam::Vec2;

#[test]
fn deterministic_replay_produces_identical_sessions() {
    let first = replay(scripted_steps());
    let second = replay(scripted_steps());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.levels, vec![3, 4, 5, 3]);
    assert!(matches!(first.final_phase, Phase::Playing));
}

#[test]
fn sandbox_mirrors_the_world_after_replay() {
    let mut game = Game::new(config());
    let mut sandbox = Sandbox::new();
    let mut overlay = OverlayState::default();

    for step in scripted_steps() {
        let _ = drive(&mut game, &mut sandbox, &mut overlay, step);
    }

    assert_eq!(sandbox.count(BodyLabel::Border), 4);
    assert_eq!(sandbox.count(BodyLabel::Goal), 1);
    assert_eq!(sandbox.count(BodyLabel::Ball), 1);
    assert_eq!(sandbox.count(BodyLabel::Wall), query::walls(&game).len());
    assert_eq!(sandbox.gravity(), Vec2::ZERO);
    assert_eq!(overlay.visible(), None);

    let ball = query::ball(&game).expect("level built");
    assert!(sandbox.body(ball).is_some());
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Begin,
    Move(Direction),
    ReachGoal,
    Restart,
}

fn scripted_steps() -> Vec<Step> {
    vec![
        Step::Begin,
        Step::Move(Direction::Right),
        Step::Move(Direction::Right),
        Step::Move(Direction::Down),
        Step::ReachGoal,
        Step::Move(Direction::Left),
        Step::Restart,
        Step::Move(Direction::Up),
        Step::ReachGoal,
        Step::Restart,
        Step::ReachGoal,
        Step::Restart,
        Step::Move(Direction::Left),
    ]
}

fn config() -> GameConfig {
    GameConfig {
        levels: LevelRange::new(3, 5).expect("valid range"),
        seed: Some(0x5eed),
        ..GameConfig::default()
    }
}

fn replay(steps: Vec<Step>) -> ReplayOutcome {
    let mut game = Game::new(config());
    let mut sandbox = Sandbox::new();
    let mut overlay = OverlayState::default();
    let mut log = Vec::new();
    let mut levels = Vec::new();

    for step in steps {
        let events = drive(&mut game, &mut sandbox, &mut overlay, step);
        for event in &events {
            if let Event::LevelStarted { level, .. } = event {
                levels.push(level.get());
            }
        }
        log.extend(events.iter().map(EventRecord::from));
    }

    ReplayOutcome {
        events: log,
        levels,
        final_phase: query::phase(&game),
        maze: query::maze(&game).cloned(),
    }
}

fn drive(
    game: &mut Game,
    sandbox: &mut Sandbox,
    overlay: &mut OverlayState,
    step: Step,
) -> Vec<Event> {
    let command = match step {
        Step::Begin => Command::Begin,
        Step::Restart => Command::Restart,
        Step::ReachGoal => Command::CollisionStarted {
            pairs: vec![
                CollisionPair::new(BodyLabel::Ball, BodyLabel::Wall),
                CollisionPair::new(BodyLabel::Ball, BodyLabel::Goal),
            ],
        },
        Step::Move(direction) => {
            let velocity = query::ball(game)
                .and_then(|ball| sandbox.velocity(ball))
                .unwrap_or(Vec2::ZERO);
            Command::Move {
                direction,
                velocity,
            }
        }
    };

    let mut events = Vec::new();
    world::apply(game, command, &mut events).expect("command applies");
    dispatch(&events, sandbox, overlay).expect("sandbox accepts events");
    events
}

#[derive(Clone, Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<EventRecord>,
    levels: Vec<u32>,
    final_phase: Phase,
    maze: Option<ball_maze_system_maze_generation::Maze>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.events.hash(&mut hasher);
        self.levels.hash(&mut hasher);
        self.maze.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    WorldCleared,
    BodiesAdded(Vec<BodyRecord>),
    VelocityChanged { body: u32, velocity: [u32; 2] },
    StaticChanged { body: u32, is_static: bool },
    GravityChanged([u32; 2]),
    WinNoticeShown { is_final_level: bool },
    WinNoticeHidden,
    LevelStarted { level: u32, rows: u32, columns: u32 },
    PhaseChanged(Phase),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct BodyRecord {
    id: u32,
    label: BodyLabel,
    shape: [u32; 2],
    position: [u32; 2],
    is_static: bool,
}

fn bits(vector: Vec2) -> [u32; 2] {
    [vector.x.to_bits(), vector.y.to_bits()]
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        match event {
            Event::WorldCleared => Self::WorldCleared,
            Event::BodiesAdded { bodies } => Self::BodiesAdded(
                bodies
                    .iter()
                    .map(|body| BodyRecord {
                        id: body.id.get(),
                        label: body.label,
                        shape: match body.shape {
                            Shape::Rectangle { width, height } => {
                                [width.to_bits(), height.to_bits()]
                            }
                            Shape::Circle { radius } => [radius.to_bits(), 0],
                        },
                        position: bits(body.position),
                        is_static: body.is_static,
                    })
                    .collect(),
            ),
            Event::VelocityChanged { body, velocity } => Self::VelocityChanged {
                body: body.get(),
                velocity: bits(*velocity),
            },
            Event::StaticChanged { body, is_static } => Self::StaticChanged {
                body: body.get(),
                is_static: *is_static,
            },
            Event::GravityChanged { gravity } => Self::GravityChanged(bits(*gravity)),
            Event::WinNoticeShown { notice } => Self::WinNoticeShown {
                is_final_level: notice.is_final_level,
            },
            Event::WinNoticeHidden => Self::WinNoticeHidden,
            Event::LevelStarted {
                level,
                rows,
                columns,
                ..
            } => Self::LevelStarted {
                level: level.get(),
                rows: *rows,
                columns: *columns,
            },
            Event::PhaseChanged { phase } => Self::PhaseChanged(*phase),
        }
    }
}
