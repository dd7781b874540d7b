//! The collision predicate planners consume.

/// A black-box collision test over configurations.
///
/// Every planner sees collision only through this trait, so the physics
/// checker, the occupancy-grid checker and plain closures are
/// interchangeable.
///
/// # Example
///
/// ```
/// use motion_collision::CollisionCheck;
///
/// // Anything left of x = 1 is blocked
/// let mut wall = |q: &[f64]| q[0] < 1.0;
/// assert!(wall.in_collision(&[0.5]));
/// assert!(!wall.in_collision(&[1.5]));
/// ```
pub trait CollisionCheck {
    /// Returns true if `q` is in collision.
    ///
    /// Queries may mutate engine state; implementations leave the scene in
    /// the queried configuration unless documented otherwise.
    fn in_collision(&mut self, q: &[f64]) -> bool;

    /// Returns true if `q` is free.
    fn is_free(&mut self, q: &[f64]) -> bool {
        !self.in_collision(q)
    }
}

impl<F> CollisionCheck for F
where
    F: FnMut(&[f64]) -> bool,
{
    fn in_collision(&mut self, q: &[f64]) -> bool {
        self(q)
    }
}

/// A collision check that never reports a collision.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCollision;

impl CollisionCheck for NoCollision {
    fn in_collision(&mut self, _q: &[f64]) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_blocked<C: CollisionCheck + ?Sized>(check: &mut C, samples: &[[f64; 1]]) -> usize {
        samples.iter().filter(|q| check.in_collision(&q[..])).count()
    }

    #[test]
    fn test_closure_is_a_check() {
        let mut calls = 0;
        let mut check = |q: &[f64]| {
            calls += 1;
            q[0] > 0.0
        };
        assert_eq!(count_blocked(&mut check, &[[1.0], [-1.0], [2.0]]), 2);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_dyn_dispatch() {
        let mut inner = NoCollision;
        let check: &mut dyn CollisionCheck = &mut inner;
        assert!(check.is_free(&[0.0, 1.0]));
        assert_eq!(count_blocked(check, &[[0.0]]), 0);
    }
}
