//! Random shortcut smoothing.

use motion_collision::CollisionCheck;
use motion_space::ConfigurationSpace;
use motion_types::{Configuration, Path};
use rand::Rng;
use tracing::debug;

/// Shortens a path by replacing random sub-paths with direct extensions.
///
/// Each iteration picks two waypoints `i < j` at least two apart and
/// substitutes the extension between them when it has fewer configurations
/// than the sub-path it replaces and is entirely collision-free. Endpoints
/// never change, and a collision-free input stays collision-free.
///
/// # Example
///
/// ```
/// use motion_plan::smooth_path;
/// use motion_space::JointSpace;
/// use motion_types::{JointRange, Path};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let space = JointSpace::new(&[JointRange::bounded(-5.0, 5.0); 2])
///     .unwrap()
///     .with_resolutions(&[1.0, 1.0])
///     .unwrap();
/// // A detour through (0, 2)
/// let path: Path = [
///     [0.0, 0.0],
///     [0.0, 1.0],
///     [0.0, 2.0],
///     [1.0, 2.0],
///     [2.0, 2.0],
///     [2.0, 1.0],
///     [2.0, 0.0],
/// ]
/// .into_iter()
///     .map(Into::into)
///     .collect();
///
/// let mut free = |_: &[f64]| false;
/// let mut rng = StdRng::seed_from_u64(3);
/// let smoothed = smooth_path(&path, &space, &mut free, 50, &mut rng);
/// assert!(smoothed.len() < path.len());
/// assert_eq!(smoothed.last().unwrap().as_slice(), &[2.0, 0.0]);
/// ```
#[must_use]
pub fn smooth_path<S, C, R>(
    path: &Path,
    space: &S,
    collision: &mut C,
    iterations: usize,
    rng: &mut R,
) -> Path
where
    S: ConfigurationSpace,
    C: CollisionCheck + ?Sized,
    R: Rng + ?Sized,
{
    let mut waypoints: Vec<Configuration> = path.waypoints().to_vec();
    let mut accepted = 0usize;

    for _ in 0..iterations {
        if waypoints.len() <= 2 {
            break;
        }
        let mut i = rng.gen_range(0..waypoints.len());
        let mut j = rng.gen_range(0..waypoints.len());
        if i.abs_diff(j) <= 1 {
            continue;
        }
        if j < i {
            std::mem::swap(&mut i, &mut j);
        }

        let shortcut: Vec<Configuration> = space.extend(&waypoints[i], &waypoints[j]).collect();
        if shortcut.len() < j - i && shortcut.iter().all(|q| !collision.in_collision(q)) {
            waypoints.splice(i + 1..=j, shortcut);
            accepted += 1;
        }
    }

    debug!(
        before = path.len(),
        after = waypoints.len(),
        accepted,
        "Path smoothed"
    );
    Path::new(waypoints)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use motion_space::JointSpace;
    use motion_types::JointRange;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn plane() -> JointSpace {
        JointSpace::new(&[JointRange::bounded(-5.0, 5.0); 2])
            .unwrap()
            .with_resolutions(&[0.1, 0.1])
            .unwrap()
    }

    /// A dense detour up and over a wall around x = 1 that blocks y < 1.5.
    fn detour(space: &JointSpace) -> Path {
        let corners = [[0.0, 0.0], [0.0, 2.0], [2.0, 2.0], [2.0, 0.0]];
        let mut path = Path::new(vec![Configuration::from(corners[0])]);
        for pair in corners.windows(2) {
            for q in space.extend(&pair[0], &pair[1]) {
                path.push(q);
            }
        }
        path
    }

    fn wall(q: &[f64]) -> bool {
        (q[0] - 1.0).abs() < 0.3 && q[1] < 1.5
    }

    #[test]
    fn test_smoothing_keeps_endpoints_and_validity() {
        let space = plane();
        let path = detour(&space);
        let mut check = wall;
        let mut rng = StdRng::seed_from_u64(11);
        let smoothed = smooth_path(&path, &space, &mut check, 200, &mut rng);

        assert!(smoothed.len() < path.len());
        assert_eq!(smoothed.first(), path.first());
        assert_eq!(smoothed.last(), path.last());
        for (a, b) in smoothed.segments() {
            for q in space.extend(a, b) {
                assert!(!wall(&q), "smoothed path crosses the wall at {q}");
            }
        }
    }

    #[test]
    fn test_short_paths_untouched() {
        let space = plane();
        let path: Path = [[0.0, 0.0], [1.0, 1.0]].into_iter().map(Configuration::from).collect();
        let mut rng = StdRng::seed_from_u64(0);
        let smoothed = smooth_path(&path, &space, &mut |_: &[f64]| false, 10, &mut rng);
        assert_eq!(smoothed, path);
    }
}
