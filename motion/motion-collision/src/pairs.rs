//! Self-collision pair selection.

use hashbrown::HashSet;
use motion_types::{CollisionSettings, JointId, LinkId};

use crate::graph::LinkGraph;

/// An unordered set of link pairs excluded from self-collision checks.
///
/// # Example
///
/// ```
/// use motion_collision::DisabledPairs;
/// use motion_types::LinkId;
///
/// let pairs = DisabledPairs::from_iter([(LinkId::new(3), LinkId::new(1))]);
/// assert!(pairs.contains(LinkId::new(1), LinkId::new(3)));
/// assert!(pairs.contains(LinkId::new(3), LinkId::new(1)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DisabledPairs {
    pairs: HashSet<(LinkId, LinkId)>,
}

impl DisabledPairs {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes the pair `(a, b)` in either order.
    pub fn insert(&mut self, a: LinkId, b: LinkId) {
        self.pairs.insert(ordered(a, b));
    }

    /// True if the pair is excluded, in either order.
    #[must_use]
    pub fn contains(&self, a: LinkId, b: LinkId) -> bool {
        self.pairs.contains(&ordered(a, b))
    }

    /// Number of excluded pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True if nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(LinkId, LinkId)> for DisabledPairs {
    fn from_iter<I: IntoIterator<Item = (LinkId, LinkId)>>(iter: I) -> Self {
        let mut pairs = Self::new();
        for (a, b) in iter {
            pairs.insert(a, b);
        }
        pairs
    }
}

const fn ordered(a: LinkId, b: LinkId) -> (LinkId, LinkId) {
    if a.0 <= b.0 { (a, b) } else { (b, a) }
}

/// Pairs of moving links that can change their relative pose.
///
/// Two links whose sets of active ancestor joints are equal move rigidly
/// together and are skipped.
#[must_use]
pub fn moving_pairs(graph: &LinkGraph, joints: &[JointId]) -> Vec<(LinkId, LinkId)> {
    let active: HashSet<JointId> = joints.iter().copied().collect();
    let moving = graph.moving_links(joints);
    let drivers: Vec<HashSet<JointId>> = moving
        .iter()
        .map(|&link| {
            graph
                .joint_ancestors(link)
                .into_iter()
                .filter(|joint| active.contains(joint))
                .collect()
        })
        .collect();

    let mut pairs = Vec::new();
    for i in 0..moving.len() {
        for j in (i + 1)..moving.len() {
            if drivers[i] != drivers[j] {
                pairs.push((moving[i], moving[j]));
            }
        }
    }
    pairs
}

/// Link pairs of one body that a self-collision check must test.
///
/// Moving links are checked against every fixed link, and against each
/// other either under the [`moving_pairs`] rule or exhaustively when
/// `only_moving` is off. Adjacent links and disabled pairs are removed.
///
/// # Example
///
/// ```
/// use motion_collision::{LinkGraph, self_collision_pairs};
/// use motion_scene::{BodyBuilder, KinematicWorld, LinkSpec, Scene};
/// use motion_types::CollisionSettings;
///
/// let mut world = KinematicWorld::new();
/// let arm = world
///     .add_body(
///         BodyBuilder::new("arm")
///             .with_link(LinkSpec::revolute("a", "base", -1.0, 1.0))
///             .with_link(LinkSpec::revolute("b", "a", -1.0, 1.0))
///             .with_link(LinkSpec::revolute("c", "b", -1.0, 1.0)),
///     )
///     .unwrap();
///
/// let graph = LinkGraph::from_scene(&world, arm).unwrap();
/// let joints = world.joints(arm).unwrap();
/// let pairs = self_collision_pairs(&graph, &joints, &CollisionSettings::new());
///
/// // base-b, base-c and a-c; every adjacent pair is excluded
/// assert_eq!(pairs.len(), 3);
/// ```
#[must_use]
pub fn self_collision_pairs(
    graph: &LinkGraph,
    joints: &[JointId],
    settings: &CollisionSettings,
) -> Vec<(LinkId, LinkId)> {
    let moving = graph.moving_links(joints);
    let fixed = graph.fixed_links(joints);

    let mut candidates: Vec<(LinkId, LinkId)> = moving
        .iter()
        .flat_map(|&m| fixed.iter().map(move |&f| (m, f)))
        .collect();
    if settings.only_moving() {
        candidates.extend(moving_pairs(graph, joints));
    } else {
        for (i, &a) in moving.iter().enumerate() {
            candidates.extend(moving[i + 1..].iter().map(|&b| (a, b)));
        }
    }

    let disabled: DisabledPairs = settings.disabled_pairs().iter().copied().collect();
    candidates
        .into_iter()
        .filter(|&(a, b)| !graph.are_adjacent(a, b) && !disabled.contains(a, b))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use motion_scene::{BodyBuilder, KinematicWorld, LinkSpec, Scene};
    use motion_types::BodyId;

    fn chain(links: usize) -> (KinematicWorld, BodyId) {
        let mut builder = BodyBuilder::new("chain");
        let mut parent = "base".to_string();
        for i in 0..links {
            let name = format!("l{i}");
            builder = builder.with_link(LinkSpec::revolute(name.clone(), parent, -1.0, 1.0));
            parent = name;
        }
        let mut world = KinematicWorld::new();
        let body = world.add_body(builder).unwrap();
        (world, body)
    }

    #[test]
    fn test_adjacent_pairs_never_checked() {
        let (world, body) = chain(5);
        let graph = LinkGraph::from_scene(&world, body).unwrap();
        let joints = world.joints(body).unwrap();
        for only_moving in [true, false] {
            let settings = CollisionSettings::new().with_only_moving(only_moving);
            for (a, b) in self_collision_pairs(&graph, &joints, &settings) {
                assert!(!graph.are_adjacent(a, b), "{a} and {b} are adjacent");
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_rigidly_coupled_links_skipped() {
        // base -> l0 (active) -> fixed tool: l0 and tool share drivers
        let mut world = KinematicWorld::new();
        let body = world
            .add_body(
                BodyBuilder::new("tool")
                    .with_link(LinkSpec::revolute("l0", "base", -1.0, 1.0))
                    .with_link(LinkSpec::revolute("l1", "l0", -1.0, 1.0))
                    .with_link(LinkSpec::fixed("tool", "l1")),
            )
            .unwrap();
        let graph = LinkGraph::from_scene(&world, body).unwrap();
        let active = [JointId::new(0), JointId::new(1)];
        let pairs = moving_pairs(&graph, &active);
        // l0 differs from l1 and tool; l1 and tool are driven by the same joints
        assert_eq!(
            pairs,
            vec![(LinkId::new(1), LinkId::new(2)), (LinkId::new(1), LinkId::new(3))]
        );
    }

    #[test]
    fn test_disabled_pairs_removed_in_either_order() {
        let (world, body) = chain(3);
        let graph = LinkGraph::from_scene(&world, body).unwrap();
        let joints = world.joints(body).unwrap();
        let all = self_collision_pairs(&graph, &joints, &CollisionSettings::new());
        assert!(all.contains(&(LinkId::new(2), LinkId::BASE)));

        let settings =
            CollisionSettings::new().with_disabled_pair(LinkId::BASE, LinkId::new(2));
        let pruned = self_collision_pairs(&graph, &joints, &settings);
        assert_eq!(pruned.len(), all.len() - 1);
        assert!(!pruned.contains(&(LinkId::new(2), LinkId::BASE)));
    }

    #[test]
    fn test_partial_joint_set() {
        let (world, body) = chain(3);
        let graph = LinkGraph::from_scene(&world, body).unwrap();
        // Only the last joint moves: l2 against base and l0
        let pairs = self_collision_pairs(&graph, &[JointId::new(2)], &CollisionSettings::new());
        assert_eq!(
            pairs,
            vec![(LinkId::new(3), LinkId::BASE), (LinkId::new(3), LinkId::new(1))]
        );
    }
}
