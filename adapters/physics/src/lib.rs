#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Boundary between the Ball Maze world and the engines that act on its events.
//!
//! A physics engine is consumed through [`PhysicsBackend`] and the win overlay
//! through [`WinOverlay`]. [`dispatch`] routes a batch of world events to both.
//! [`Sandbox`] is an in-memory backend that stores bodies without simulating
//! them; it backs headless sessions and tests.

mod sandbox;

use ball_maze_core::{BodyId, BodySpec, Event, WinNotice};
use glam::Vec2;
use thiserror::Error;

pub use sandbox::{Sandbox, SandboxBody};

/// Errors reported by physics backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PhysicsError {
    /// The addressed body is not registered.
    #[error("body #{} is not registered", .0.get())]
    UnknownBody(BodyId),
    /// A body with the same identifier is already registered.
    #[error("body #{} is already registered", .0.get())]
    DuplicateBody(BodyId),
}

/// Capabilities the world requires from a physics engine.
pub trait PhysicsBackend {
    /// Registers bodies with the simulation.
    fn add_bodies(&mut self, bodies: &[BodySpec]) -> Result<(), PhysicsError>;

    /// Removes every body.
    fn clear(&mut self);

    /// Replaces the velocity of a body.
    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) -> Result<(), PhysicsError>;

    /// Holds a body in place or releases it to the simulation.
    fn set_static(&mut self, body: BodyId, is_static: bool) -> Result<(), PhysicsError>;

    /// Replaces the world-wide gravity vector.
    fn set_gravity(&mut self, gravity: Vec2);

    /// Current velocity of a body, used to build movement commands.
    fn velocity(&self, body: BodyId) -> Option<Vec2>;
}

/// Capabilities the world requires from the user interface.
pub trait WinOverlay {
    /// Displays the win message selected by `notice`.
    fn show(&mut self, notice: WinNotice);

    /// Hides the win message.
    fn hide(&mut self);
}

/// Overlay that only remembers what it was last asked to display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayState {
    visible: Option<WinNotice>,
}

impl OverlayState {
    /// Notice currently on screen, if any.
    #[must_use]
    pub const fn visible(&self) -> Option<WinNotice> {
        self.visible
    }
}

impl WinOverlay for OverlayState {
    fn show(&mut self, notice: WinNotice) {
        self.visible = Some(notice);
    }

    fn hide(&mut self) {
        self.visible = None;
    }
}

/// Carries out `events` in order against a physics backend and an overlay.
///
/// Events addressed to neither collaborator are skipped. The first backend
/// error aborts the batch.
pub fn dispatch<B, O>(events: &[Event], backend: &mut B, overlay: &mut O) -> Result<(), PhysicsError>
where
    B: PhysicsBackend + ?Sized,
    O: WinOverlay + ?Sized,
{
    for event in events {
        match event {
            Event::WorldCleared => backend.clear(),
            Event::BodiesAdded { bodies } => backend.add_bodies(bodies)?,
            Event::VelocityChanged { body, velocity } => backend.set_velocity(*body, *velocity)?,
            Event::StaticChanged { body, is_static } => backend.set_static(*body, *is_static)?,
            Event::GravityChanged { gravity } => backend.set_gravity(*gravity),
            Event::WinNoticeShown { notice } => overlay.show(*notice),
            Event::WinNoticeHidden => overlay.hide(),
            Event::LevelStarted { .. } | Event::PhaseChanged { .. } => {}
        }
    }
    Ok(())
}
