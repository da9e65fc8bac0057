//! In-memory physics backend that records state without integrating motion.

use std::collections::BTreeMap;

use ball_maze_core::{BodyId, BodyLabel, BodySpec, CollisionPair, Shape};
use glam::Vec2;

use crate::{PhysicsBackend, PhysicsError};

/// Body state tracked by the [`Sandbox`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SandboxBody {
    /// Description the body was registered with.
    pub spec: BodySpec,
    /// Current centre in world coordinates.
    pub position: Vec2,
    /// Current velocity.
    pub velocity: Vec2,
    /// Whether the body is currently held in place.
    pub is_static: bool,
}

/// Physics world that stores bodies, velocities, static flags and gravity.
///
/// Nothing moves unless a caller repositions a body with [`Sandbox::place`].
/// Overlap queries let headless drivers report contacts the way an engine
/// would.
#[derive(Clone, Debug, Default)]
pub struct Sandbox {
    bodies: BTreeMap<BodyId, SandboxBody>,
    gravity: Vec2,
}

impl Sandbox {
    /// Creates an empty world with zero gravity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Reports whether no bodies are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Looks up a registered body.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&SandboxBody> {
        self.bodies.get(&id)
    }

    /// Iterates over registered bodies in identifier order.
    pub fn bodies(&self) -> impl Iterator<Item = &SandboxBody> {
        self.bodies.values()
    }

    /// Number of registered bodies carrying `label`.
    #[must_use]
    pub fn count(&self, label: BodyLabel) -> usize {
        self.bodies
            .values()
            .filter(|body| body.spec.label == label)
            .count()
    }

    /// Current gravity vector.
    #[must_use]
    pub const fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Moves a body to `position`.
    pub fn place(&mut self, id: BodyId, position: Vec2) -> Result<(), PhysicsError> {
        let body = self
            .bodies
            .get_mut(&id)
            .ok_or(PhysicsError::UnknownBody(id))?;
        body.position = position;
        Ok(())
    }

    /// Identifiers of every body `id` currently overlaps, in identifier order.
    #[must_use]
    pub fn overlapping(&self, id: BodyId) -> Vec<BodyId> {
        let Some(subject) = self.bodies.get(&id) else {
            return Vec::new();
        };

        self.bodies
            .values()
            .filter(|other| other.spec.id != id && overlaps(subject, other))
            .map(|other| other.spec.id)
            .collect()
    }

    /// Pairs formed by `id` and each body in `others`.
    ///
    /// The queried body's label comes first in each pair; unknown bodies are
    /// skipped.
    #[must_use]
    pub fn pairs(&self, id: BodyId, others: &[BodyId]) -> Vec<CollisionPair> {
        let Some(subject) = self.bodies.get(&id) else {
            return Vec::new();
        };

        others
            .iter()
            .filter_map(|other| self.bodies.get(other))
            .map(|other| CollisionPair::new(subject.spec.label, other.spec.label))
            .collect()
    }

    /// Pairs formed by `id` and every body it currently overlaps.
    #[must_use]
    pub fn contacts(&self, id: BodyId) -> Vec<CollisionPair> {
        self.pairs(id, &self.overlapping(id))
    }

    fn body_mut(&mut self, id: BodyId) -> Result<&mut SandboxBody, PhysicsError> {
        self.bodies
            .get_mut(&id)
            .ok_or(PhysicsError::UnknownBody(id))
    }
}

impl PhysicsBackend for Sandbox {
    fn add_bodies(&mut self, bodies: &[BodySpec]) -> Result<(), PhysicsError> {
        for (index, spec) in bodies.iter().enumerate() {
            let repeated = bodies[..index].iter().any(|earlier| earlier.id == spec.id);
            if repeated || self.bodies.contains_key(&spec.id) {
                return Err(PhysicsError::DuplicateBody(spec.id));
            }
        }

        for spec in bodies {
            let _ = self.bodies.insert(
                spec.id,
                SandboxBody {
                    spec: *spec,
                    position: spec.position,
                    velocity: Vec2::ZERO,
                    is_static: spec.is_static,
                },
            );
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.bodies.clear();
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) -> Result<(), PhysicsError> {
        self.body_mut(body)?.velocity = velocity;
        Ok(())
    }

    fn set_static(&mut self, body: BodyId, is_static: bool) -> Result<(), PhysicsError> {
        self.body_mut(body)?.is_static = is_static;
        Ok(())
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn velocity(&self, body: BodyId) -> Option<Vec2> {
        self.bodies.get(&body).map(|body| body.velocity)
    }
}

fn overlaps(a: &SandboxBody, b: &SandboxBody) -> bool {
    match (a.spec.shape, b.spec.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            a.position.distance_squared(b.position) < (ra + rb) * (ra + rb)
        }
        (Shape::Circle { radius }, Shape::Rectangle { width, height }) => {
            circle_touches_rectangle(a.position, radius, b.position, Vec2::new(width, height))
        }
        (Shape::Rectangle { width, height }, Shape::Circle { radius }) => {
            circle_touches_rectangle(b.position, radius, a.position, Vec2::new(width, height))
        }
        (
            Shape::Rectangle {
                width: wa,
                height: ha,
            },
            Shape::Rectangle {
                width: wb,
                height: hb,
            },
        ) => {
            let gap = (a.position - b.position).abs();
            gap.x < (wa + wb) / 2.0 && gap.y < (ha + hb) / 2.0
        }
    }
}

fn circle_touches_rectangle(centre: Vec2, radius: f32, rect_centre: Vec2, size: Vec2) -> bool {
    let half = size / 2.0;
    let nearest = centre.clamp(rect_centre - half, rect_centre + half);
    centre.distance_squared(nearest) < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(id: u32, label: BodyLabel, position: Vec2, radius: f32) -> BodySpec {
        BodySpec {
            id: BodyId::new(id),
            label,
            shape: Shape::Circle { radius },
            position,
            is_static: false,
        }
    }

    fn rectangle(id: u32, label: BodyLabel, position: Vec2, size: Vec2) -> BodySpec {
        BodySpec {
            id: BodyId::new(id),
            label,
            shape: Shape::Rectangle {
                width: size.x,
                height: size.y,
            },
            position,
            is_static: true,
        }
    }

    #[test]
    fn duplicate_ids_are_rejected_atomically() {
        let mut sandbox = Sandbox::new();
        let ball = circle(1, BodyLabel::Ball, Vec2::ZERO, 1.0);

        assert_eq!(
            sandbox.add_bodies(&[ball, ball]),
            Err(PhysicsError::DuplicateBody(BodyId::new(1)))
        );
        assert!(sandbox.is_empty());

        sandbox.add_bodies(&[ball]).expect("first registration");
        assert_eq!(
            sandbox.add_bodies(&[ball]),
            Err(PhysicsError::DuplicateBody(BodyId::new(1)))
        );
        assert_eq!(sandbox.len(), 1);
    }

    #[test]
    fn unknown_bodies_are_reported() {
        let mut sandbox = Sandbox::new();
        let missing = BodyId::new(3);

        assert_eq!(
            sandbox.set_velocity(missing, Vec2::X),
            Err(PhysicsError::UnknownBody(missing))
        );
        assert_eq!(
            sandbox.set_static(missing, false),
            Err(PhysicsError::UnknownBody(missing))
        );
        assert_eq!(
            sandbox.place(missing, Vec2::ZERO),
            Err(PhysicsError::UnknownBody(missing))
        );
        assert_eq!(sandbox.velocity(missing), None);
    }

    #[test]
    fn contacts_report_overlapping_shapes_only() {
        let mut sandbox = Sandbox::new();
        sandbox
            .add_bodies(&[
                circle(0, BodyLabel::Ball, Vec2::new(10.0, 10.0), 3.0),
                rectangle(1, BodyLabel::Goal, Vec2::new(14.0, 10.0), Vec2::new(4.0, 4.0)),
                rectangle(2, BodyLabel::Wall, Vec2::new(30.0, 10.0), Vec2::new(5.0, 20.0)),
            ])
            .expect("distinct ids");

        assert_eq!(
            sandbox.contacts(BodyId::new(0)),
            vec![CollisionPair::new(BodyLabel::Ball, BodyLabel::Goal)]
        );

        sandbox
            .place(BodyId::new(0), Vec2::new(26.0, 10.0))
            .expect("registered body");
        assert_eq!(
            sandbox.contacts(BodyId::new(0)),
            vec![CollisionPair::new(BodyLabel::Ball, BodyLabel::Wall)]
        );
        assert!(sandbox.contacts(BodyId::new(9)).is_empty());
        assert_eq!(sandbox.overlapping(BodyId::new(0)), vec![BodyId::new(2)]);
        assert!(sandbox
            .pairs(BodyId::new(0), &[BodyId::new(7)])
            .is_empty());
    }

    #[test]
    fn clear_removes_everything_but_gravity() {
        let mut sandbox = Sandbox::new();
        sandbox
            .add_bodies(&[circle(0, BodyLabel::Ball, Vec2::ZERO, 1.0)])
            .expect("distinct ids");
        sandbox.set_gravity(Vec2::Y);
        sandbox.clear();

        assert!(sandbox.is_empty());
        assert_eq!(sandbox.gravity(), Vec2::Y);
    }
}
