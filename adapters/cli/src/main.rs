#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that renders mazes and drives headless Ball Maze sessions.

mod autopilot;
mod render;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use ball_maze_core::{Arena, CellCoord, LevelRange, WELCOME_BANNER};
use ball_maze_system_maze_generation::generate;
use ball_maze_world::GameConfig;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::autopilot::Session;

/// Command-line arguments accepted by the `ball-maze` binary.
#[derive(Debug, Parser)]
#[command(name = "ball-maze", version, about = "Procedurally generated ball mazes")]
struct Cli {
    /// TOML file with game settings; flags below override its values.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// First level of a run (maze column count).
    #[arg(long, global = true)]
    start: Option<u32>,
    /// Last level of a run before it wraps back to the start.
    #[arg(long, global = true)]
    max: Option<u32>,
    /// Seed for reproducible mazes.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Arena width in world units.
    #[arg(long, global = true)]
    width: Option<f32>,
    /// Arena height in world units.
    #[arg(long, global = true)]
    height: Option<f32>,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Prints a single maze with its solution.
    Render {
        /// Number of maze rows.
        #[arg(long)]
        rows: u32,
        /// Number of maze columns.
        #[arg(long)]
        columns: u32,
    },
    /// Plays levels automatically, steering the ball along each solution.
    Play {
        /// Number of levels to clear before exiting.
        #[arg(long, default_value_t = 3)]
        rounds: u32,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.mode {
        Mode::Render { rows, columns } => render_one(rows, columns, config.seed),
        Mode::Play { rounds } => play(config, rounds),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if cli.start.is_some() || cli.max.is_some() {
        let start = cli.start.unwrap_or(config.levels.start().get());
        let max = cli.max.unwrap_or(config.levels.max().get());
        config.levels = LevelRange::new(start, max).context("invalid level flags")?;
    }
    if cli.width.is_some() || cli.height.is_some() {
        let width = cli.width.unwrap_or(config.arena.width());
        let height = cli.height.unwrap_or(config.arena.height());
        config.arena = Arena::new(width, height).context("invalid arena flags")?;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    Ok(config)
}

fn render_one(rows: u32, columns: u32, seed: Option<u64>) -> Result<()> {
    let maze = generate(rows, columns, seed).context("failed to generate maze")?;
    let goal = CellCoord::new(rows - 1, columns - 1);
    let path = maze
        .shortest_path(CellCoord::new(0, 0), goal)
        .context("goal is unreachable")?;

    info!(rows, columns, path_len = path.len(), "maze generated");
    print!("{}", render::maze(&maze, &path));
    Ok(())
}

fn play(config: GameConfig, rounds: u32) -> Result<()> {
    println!("{WELCOME_BANNER}");
    let mut session = Session::new(config);
    session.begin()?;

    for round in 0..rounds {
        if round > 0 {
            session.restart()?;
        }
        let run = session.solve()?;
        println!(
            "Level {} ({}x{})",
            run.level.get(),
            run.maze.rows(),
            run.maze.columns()
        );
        print!("{}", render::maze(&run.maze, &run.path));
        match run.notice {
            Some(notice) => println!("{} [{}]", notice.headline(), notice.button_label()),
            None => println!("The ball never reached the goal."),
        }
    }

    Ok(())
}
