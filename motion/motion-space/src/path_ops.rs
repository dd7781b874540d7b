//! Post-processing of planned paths.

use motion_types::{Configuration, Path};

use crate::space::ConfigurationSpace;

/// Drops configurations that repeat their predecessor within `tolerance`
/// (largest absolute coordinate difference).
///
/// # Example
///
/// ```
/// use motion_space::remove_redundant;
/// use motion_types::{Configuration, Path};
///
/// let path = Path::new(vec![
///     Configuration::from([0.0]),
///     Configuration::from([0.0005]),
///     Configuration::from([1.0]),
/// ]);
/// assert_eq!(remove_redundant(&path, 1e-3).len(), 2);
/// ```
#[must_use]
pub fn remove_redundant(path: &Path, tolerance: f64) -> Path {
    let mut kept: Vec<Configuration> = Vec::with_capacity(path.len());
    for q in path {
        match kept.last() {
            Some(last) if last.max_abs_diff(q) <= tolerance => {}
            _ => kept.push(q.clone()),
        }
    }
    Path::new(kept)
}

fn unit_direction(to: &[f64], from: &[f64]) -> Configuration {
    let diff: Configuration = to.iter().zip(from).map(|(b, a)| b - a).collect();
    let norm = diff.iter().map(|d| d * d).sum::<f64>().sqrt();
    if norm == 0.0 {
        diff
    } else {
        diff.iter().map(|d| d / norm).collect()
    }
}

/// Collapses runs of configurations moving in the same direction into
/// their endpoints, leaving only the corners of the path.
///
/// Directions are compared coordinate-wise as unit vectors of plain
/// differences, within `tolerance`.
///
/// # Example
///
/// ```
/// use motion_space::waypoints_from_path;
/// use motion_types::{Configuration, Path};
///
/// let path: Path = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [2.0, 1.0]]
///     .into_iter()
///     .map(Configuration::from)
///     .collect();
/// let corners = waypoints_from_path(&path, 1e-3);
/// assert_eq!(corners.len(), 3);
/// assert_eq!(corners[1].as_slice(), &[2.0, 0.0]);
/// ```
#[must_use]
pub fn waypoints_from_path(path: &Path, tolerance: f64) -> Path {
    let path = remove_redundant(path, tolerance);
    let configurations = path.waypoints();
    let (first, second) = match configurations {
        [first, second, ..] => (first, second),
        _ => return path,
    };

    let mut waypoints = vec![first.clone()];
    let mut last_conf = second;
    let mut last_direction = unit_direction(second, first);
    for conf in &configurations[2..] {
        let mut direction = unit_direction(conf, &waypoints[waypoints.len() - 1]);
        if last_direction.max_abs_diff(&direction) > tolerance {
            waypoints.push(last_conf.clone());
            direction = unit_direction(conf, last_conf);
        }
        last_conf = conf;
        last_direction = direction;
    }
    waypoints.push(last_conf.clone());
    Path::new(waypoints)
}

/// Densifies a waypoint path with `steps + 1` configurations per segment.
///
/// The result starts at the first waypoint and passes through every
/// waypoint.
#[must_use]
pub fn refine_path<S: ConfigurationSpace + ?Sized>(
    space: &S,
    waypoints: &Path,
    steps: usize,
) -> Path {
    let mut refined: Vec<Configuration> = waypoints.first().cloned().into_iter().collect();
    for (q1, q2) in waypoints.segments() {
        refined.extend(space.refine(q1, q2, steps));
    }
    Path::new(refined)
}

/// Rebuilds `path` as a continuous sequence starting at `current`.
///
/// Consecutive differences are taken through the space, so circular
/// coordinates are unwrapped: the result never jumps by a full turn
/// between neighbours even if the input does. `current` is assumed equal to
/// the first configuration modulo full turns.
///
/// # Example
///
/// ```
/// use motion_space::{JointSpace, adjust_path};
/// use motion_types::{Configuration, JointRange, Path};
/// use std::f64::consts::PI;
///
/// let space = JointSpace::new(&[JointRange::Circular]).unwrap();
/// let path: Path = [[3.0], [-3.0]].into_iter().map(Configuration::from).collect();
/// let adjusted = adjust_path(&space, &[3.0], &path);
/// assert!((adjusted[1][0] - (2.0 * PI - 3.0)).abs() < 1e-12);
/// ```
#[must_use]
pub fn adjust_path<S: ConfigurationSpace + ?Sized>(
    space: &S,
    current: &[f64],
    path: &Path,
) -> Path {
    let mut adjusted = vec![Configuration::from_slice(current)];
    for (q1, q2) in path.segments() {
        let diff = space.difference(q2, q1);
        let next = adjusted[adjusted.len() - 1]
            .iter()
            .zip(diff.iter())
            .map(|(a, d)| a + d)
            .collect();
        adjusted.push(next);
    }
    Path::new(adjusted)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::JointSpace;
    use motion_types::JointRange;

    fn path(points: &[&[f64]]) -> Path {
        points.iter().map(|p| Configuration::from_slice(p)).collect()
    }

    #[test]
    fn test_remove_redundant_keeps_first_and_distinct() {
        let p = path(&[&[0.0], &[0.0], &[1.0], &[1.0], &[2.0]]);
        let r = remove_redundant(&p, 1e-9);
        assert_eq!(r.len(), 3);
        assert_eq!(r[2][0], 2.0);
    }

    #[test]
    fn test_waypoints_short_paths_unchanged() {
        let p = path(&[&[0.0, 0.0], &[1.0, 1.0]]);
        assert_eq!(waypoints_from_path(&p, 1e-3), p);
        assert!(waypoints_from_path(&Path::default(), 1e-3).is_empty());
    }

    #[test]
    fn test_waypoints_collinear_run_collapses() {
        let p = path(&[&[0.0], &[0.5], &[1.0], &[1.5]]);
        let w = waypoints_from_path(&p, 1e-3);
        assert_eq!(w.len(), 2);
        assert_eq!(w[1][0], 1.5);
    }

    #[test]
    fn test_waypoints_keeps_each_corner() {
        let p = path(&[&[0.0, 0.0], &[1.0, 0.0], &[1.0, 1.0], &[1.0, 2.0], &[0.0, 2.0]]);
        let w = waypoints_from_path(&p, 1e-3);
        assert_eq!(w.len(), 4);
        assert_eq!(w[2].as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn test_refine_path_passes_through_waypoints() {
        let space = JointSpace::new(&[JointRange::bounded(-5.0, 5.0)]).unwrap();
        let w = path(&[&[0.0], &[1.0], &[3.0]]);
        let refined = refine_path(&space, &w, 3);
        assert_eq!(refined.len(), 1 + 4 + 4);
        assert_eq!(refined[4][0], 1.0);
        assert_eq!(refined.last().unwrap()[0], 3.0);
    }

    #[test]
    fn test_adjust_path_linear_is_identity() {
        let space = JointSpace::new(&[JointRange::bounded(-5.0, 5.0)]).unwrap();
        let p = path(&[&[0.0], &[1.0], &[-2.0]]);
        let adjusted = adjust_path(&space, &[0.0], &p);
        assert_eq!(adjusted, p);
    }
}
