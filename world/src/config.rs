//! Tunable parameters of a game session.

use ball_maze_core::{Arena, LevelRange};
use serde::{Deserialize, Serialize};

/// Settings that shape every level of a session.
///
/// Both nested types validate themselves on construction and when
/// deserialised, so a `GameConfig` that exists is always playable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Levels a run escalates through; a level equals its maze column count.
    pub levels: LevelRange,
    /// Play area the maze is fitted into.
    pub arena: Arena,
    /// Seed for reproducible sessions. Without one every maze is drawn from
    /// operating-system entropy.
    pub seed: Option<u64>,
}
