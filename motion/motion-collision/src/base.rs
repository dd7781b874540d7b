//! Physics collision for a body moved by its planar base pose.

use std::fmt;

use motion_scene::{Scene, SceneResult};
use motion_types::{BodyId, BodyLink, Obstacle, PlanningError, Pose, Result};
use tracing::warn;

use crate::check::CollisionCheck;
use crate::checker::body_links;

/// Collision test that places a body at `(x, y, heading)` and checks it
/// against obstacles, restoring the original pose after every query.
///
/// # Example
///
/// ```
/// use motion_collision::{BaseBodyCollision, CollisionCheck};
/// use motion_scene::{BodyBuilder, KinematicWorld, Scene};
/// use motion_types::Obstacle;
/// use nalgebra::Point3;
///
/// let mut world = KinematicWorld::new();
/// let robot = world
///     .add_body(BodyBuilder::new("robot").with_base_sphere(Point3::origin(), 0.3))
///     .unwrap();
/// let crate_ = world
///     .add_body(BodyBuilder::new("crate").with_base_sphere(Point3::new(2.0, 0.0, 0.0), 0.5))
///     .unwrap();
///
/// let obstacles = [Obstacle::body(crate_)];
/// let mut check = BaseBodyCollision::new(&mut world, robot, &obstacles, 0.0).unwrap();
/// assert!(check.in_collision(&[1.5, 0.0, 0.0]));
/// assert!(!check.in_collision(&[0.0, 1.5, 0.0]));
/// drop(check);
///
/// // The robot is back where it started
/// assert_eq!(world.base_values(robot).unwrap().as_slice(), &[0.0, 0.0, 0.0]);
/// ```
pub struct BaseBodyCollision<'s, S: Scene + ?Sized> {
    scene: &'s mut S,
    body: BodyId,
    start: Pose,
    pairs: Vec<(BodyLink, BodyLink)>,
    max_distance: f64,
}

impl<'s, S: Scene + ?Sized> BaseBodyCollision<'s, S> {
    /// Checks every link of `body` against `obstacles` within
    /// `max_distance`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::InvalidConfig`] for a negative or
    /// non-finite clearance, or a scene error for unknown bodies.
    pub fn new(
        scene: &'s mut S,
        body: BodyId,
        obstacles: &[Obstacle],
        max_distance: f64,
    ) -> Result<Self> {
        if !(max_distance.is_finite() && max_distance >= 0.0) {
            return Err(PlanningError::invalid_config(format!(
                "max_distance must be finite and non-negative, got {max_distance}"
            )));
        }
        let start = scene.body_pose(body)?;
        let robot = body_links(&*scene, body)?;
        let mut targets = Vec::new();
        for obstacle in obstacles.iter().filter(|o| o.body_id() != body) {
            match obstacle.links() {
                Some(links) => targets.extend(
                    links.iter().map(|&link| BodyLink::new(obstacle.body_id(), link)),
                ),
                None => targets.extend(body_links(&*scene, obstacle.body_id())?),
            }
        }
        let pairs = robot
            .iter()
            .flat_map(|&part| targets.iter().map(move |&target| (part, target)))
            .collect();
        Ok(Self {
            scene,
            body,
            start,
            pairs,
            max_distance,
        })
    }

    /// The pose restored after each query.
    #[must_use]
    pub const fn start_pose(&self) -> &Pose {
        &self.start
    }

    fn query(&mut self, q: &[f64]) -> SceneResult<bool> {
        self.scene.set_base_values(self.body, q)?;
        let mut hit = false;
        for &(robot, obstacle) in &self.pairs {
            if self.scene.links_within(robot, obstacle, self.max_distance)? {
                hit = true;
                break;
            }
        }
        self.scene.set_body_pose(self.body, &self.start)?;
        Ok(hit)
    }
}

impl<S: Scene + ?Sized> CollisionCheck for BaseBodyCollision<'_, S> {
    fn in_collision(&mut self, q: &[f64]) -> bool {
        match self.query(q) {
            Ok(hit) => hit,
            Err(error) => {
                warn!(
                    body = %self.body,
                    %error,
                    "Base collision query failed; treating as collision"
                );
                if let Err(error) = self.scene.set_body_pose(self.body, &self.start) {
                    warn!(body = %self.body, %error, "Could not restore base pose");
                }
                true
            }
        }
    }
}

impl<S: Scene + ?Sized> fmt::Debug for BaseBodyCollision<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseBodyCollision")
            .field("body", &self.body)
            .field("start", &self.start)
            .field("pairs", &self.pairs.len())
            .field("max_distance", &self.max_distance)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use motion_scene::{BodyBuilder, KinematicWorld};
    use nalgebra::Point3;

    fn robot_and_wall() -> (KinematicWorld, BodyId, BodyId) {
        let mut world = KinematicWorld::new();
        let robot = world
            .add_body(BodyBuilder::new("robot").with_base_sphere(Point3::origin(), 0.2))
            .unwrap();
        let wall = world
            .add_body(
                BodyBuilder::new("wall").with_base_collider(cf_spatial::Capsule::new(
                    Point3::new(1.0, -1.0, 0.0),
                    Point3::new(1.0, 1.0, 0.0),
                    0.05,
                )),
            )
            .unwrap();
        (world, robot, wall)
    }

    #[test]
    fn test_wall_blocks_base() {
        let (mut world, robot, wall) = robot_and_wall();
        let obstacles = [Obstacle::body(wall)];
        let mut check = BaseBodyCollision::new(&mut world, robot, &obstacles, 0.0).unwrap();
        assert!(!check.in_collision(&[0.5, 0.0, 0.0]));
        assert!(check.in_collision(&[0.9, 0.5, 1.0]));
        assert!(!check.in_collision(&[1.5, 0.0, 0.0]));
    }

    #[test]
    fn test_clearance_margin() {
        let (mut world, robot, wall) = robot_and_wall();
        let obstacles = [Obstacle::body(wall)];
        let mut check = BaseBodyCollision::new(&mut world, robot, &obstacles, 0.2).unwrap();
        // 0.15 m gap to the wall surface
        assert!(check.in_collision(&[0.6, 0.0, 0.0]));
    }

    #[test]
    fn test_pose_restored_after_failure() {
        let (mut world, robot, wall) = robot_and_wall();
        world.set_base_values(robot, &[-1.0, 0.5, 0.2]).unwrap();
        let start = world.body_pose(robot).unwrap();
        let obstacles = [Obstacle::body(wall)];
        let mut check = BaseBodyCollision::new(&mut world, robot, &obstacles, 0.0).unwrap();
        // Wrong dimension is a scene error, reported as collision
        assert!(check.in_collision(&[0.0, 0.0]));
        assert!(!check.in_collision(&[0.0, 0.0, 0.0]));
        drop(check);
        assert!(world.body_pose(robot).unwrap().approx_eq(&start, 1e-12));
    }

    #[test]
    fn test_negative_clearance_rejected() {
        let (mut world, robot, wall) = robot_and_wall();
        assert!(BaseBodyCollision::new(&mut world, robot, &[Obstacle::body(wall)], -0.1).is_err());
    }
}
