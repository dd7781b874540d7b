//! Kinematic tree structure of a body, computed once per predicate.

use hashbrown::{HashMap, HashSet};
use motion_scene::{Scene, SceneResult};
use motion_types::{BodyId, JointId, LinkId};

#[derive(Debug, Clone, Copy)]
struct ParentEdge {
    link: LinkId,
    joint: JointId,
}

/// Parent/child relations between the links of one body.
///
/// # Example
///
/// ```
/// use motion_collision::LinkGraph;
/// use motion_scene::{BodyBuilder, KinematicWorld, LinkSpec};
/// use motion_types::LinkId;
///
/// let mut world = KinematicWorld::new();
/// let arm = world
///     .add_body(
///         BodyBuilder::new("arm")
///             .with_link(LinkSpec::revolute("upper", "base", -1.0, 1.0))
///             .with_link(LinkSpec::revolute("fore", "upper", -1.0, 1.0)),
///     )
///     .unwrap();
///
/// let graph = LinkGraph::from_scene(&world, arm).unwrap();
/// assert!(graph.are_adjacent(LinkId::BASE, LinkId::new(1)));
/// assert!(!graph.are_adjacent(LinkId::BASE, LinkId::new(2)));
/// ```
#[derive(Debug, Clone)]
pub struct LinkGraph {
    body: BodyId,
    links: Vec<LinkId>,
    parents: HashMap<LinkId, ParentEdge>,
    children: HashMap<LinkId, Vec<LinkId>>,
    joint_children: HashMap<JointId, LinkId>,
}

impl LinkGraph {
    /// Reads the link tree of `body` from the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the body does not exist or reports a joint it
    /// cannot describe.
    pub fn from_scene<S: Scene + ?Sized>(scene: &S, body: BodyId) -> SceneResult<Self> {
        let links = scene.links(body)?;
        let mut parents = HashMap::new();
        let mut children: HashMap<LinkId, Vec<LinkId>> = HashMap::new();
        let mut joint_children = HashMap::new();

        for &link in &links {
            let Some(joint) = scene.parent_joint(body, link)? else {
                continue;
            };
            let parent = scene.joint_info(body, joint)?.parent_link;
            parents.insert(link, ParentEdge { link: parent, joint });
            children.entry(parent).or_default().push(link);
            joint_children.insert(joint, link);
        }
        for list in children.values_mut() {
            list.sort_unstable();
        }

        Ok(Self {
            body,
            links,
            parents,
            children,
            joint_children,
        })
    }

    /// The body this graph describes.
    #[must_use]
    pub const fn body(&self) -> BodyId {
        self.body
    }

    /// All links, base first.
    #[must_use]
    pub fn links(&self) -> &[LinkId] {
        &self.links
    }

    /// Parent link of `link`, or `None` for the root.
    #[must_use]
    pub fn parent(&self, link: LinkId) -> Option<LinkId> {
        self.parents.get(&link).map(|edge| edge.link)
    }

    /// Joint connecting `link` to its parent.
    #[must_use]
    pub fn parent_joint(&self, link: LinkId) -> Option<JointId> {
        self.parents.get(&link).map(|edge| edge.joint)
    }

    /// Direct children of `link`.
    #[must_use]
    pub fn children(&self, link: LinkId) -> &[LinkId] {
        self.children.get(&link).map(Vec::as_slice).unwrap_or_default()
    }

    /// Child link driven by `joint`.
    #[must_use]
    pub fn child_link(&self, joint: JointId) -> Option<LinkId> {
        self.joint_children.get(&joint).copied()
    }

    /// True if one link is the direct parent of the other.
    #[must_use]
    pub fn are_adjacent(&self, a: LinkId, b: LinkId) -> bool {
        self.parent(a) == Some(b) || self.parent(b) == Some(a)
    }

    /// `link` and every link below it.
    #[must_use]
    pub fn subtree(&self, link: LinkId) -> Vec<LinkId> {
        let mut out = Vec::new();
        let mut stack = vec![link];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Joints on the path from the root down to `link`, root side first.
    #[must_use]
    pub fn joint_ancestors(&self, link: LinkId) -> Vec<JointId> {
        let mut joints = Vec::new();
        let mut current = link;
        while let Some(edge) = self.parents.get(&current) {
            joints.push(edge.joint);
            current = edge.link;
        }
        joints.reverse();
        joints
    }

    /// Links moved by any of `joints`: the union of the subtrees below
    /// each joint's child link, sorted.
    #[must_use]
    pub fn moving_links(&self, joints: &[JointId]) -> Vec<LinkId> {
        let mut moving: HashSet<LinkId> = HashSet::new();
        for link in joints.iter().filter_map(|&joint| self.child_link(joint)) {
            moving.extend(self.subtree(link));
        }
        let mut links: Vec<_> = moving.into_iter().collect();
        links.sort_unstable();
        links
    }

    /// Links not moved by any of `joints`, the base included.
    #[must_use]
    pub fn fixed_links(&self, joints: &[JointId]) -> Vec<LinkId> {
        let moving: HashSet<LinkId> = self.moving_links(joints).into_iter().collect();
        self.links
            .iter()
            .copied()
            .filter(|link| !moving.contains(link))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use motion_scene::{BodyBuilder, KinematicWorld, LinkSpec};

    /// base -> a -> b -> c, with a side branch base -> d.
    fn branched() -> (KinematicWorld, BodyId) {
        let mut world = KinematicWorld::new();
        let body = world
            .add_body(
                BodyBuilder::new("branched")
                    .with_link(LinkSpec::revolute("a", "base", -1.0, 1.0))
                    .with_link(LinkSpec::revolute("b", "a", -1.0, 1.0))
                    .with_link(LinkSpec::fixed("c", "b"))
                    .with_link(LinkSpec::prismatic("d", "base", 0.0, 1.0)),
            )
            .unwrap();
        (world, body)
    }

    #[test]
    fn test_parents_and_children() {
        let (world, body) = branched();
        let graph = LinkGraph::from_scene(&world, body).unwrap();
        assert_eq!(graph.links().len(), 5);
        assert_eq!(graph.parent(LinkId::BASE), None);
        assert_eq!(graph.parent(LinkId::new(3)), Some(LinkId::new(2)));
        assert_eq!(graph.children(LinkId::BASE), &[LinkId::new(1), LinkId::new(4)]);
        assert_eq!(graph.child_link(JointId::new(1)), Some(LinkId::new(2)));
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let (world, body) = branched();
        let graph = LinkGraph::from_scene(&world, body).unwrap();
        assert!(graph.are_adjacent(LinkId::new(1), LinkId::new(2)));
        assert!(graph.are_adjacent(LinkId::new(2), LinkId::new(1)));
        assert!(!graph.are_adjacent(LinkId::new(1), LinkId::new(3)));
        assert!(!graph.are_adjacent(LinkId::new(1), LinkId::new(4)));
    }

    #[test]
    fn test_subtree_and_moving_links() {
        let (world, body) = branched();
        let graph = LinkGraph::from_scene(&world, body).unwrap();
        assert_eq!(
            graph.subtree(LinkId::new(1)),
            vec![LinkId::new(1), LinkId::new(2), LinkId::new(3)]
        );
        assert_eq!(
            graph.moving_links(&[JointId::new(1)]),
            vec![LinkId::new(2), LinkId::new(3)]
        );
        assert_eq!(
            graph.fixed_links(&[JointId::new(1)]),
            vec![LinkId::BASE, LinkId::new(1), LinkId::new(4)]
        );
    }

    #[test]
    fn test_joint_ancestors() {
        let (world, body) = branched();
        let graph = LinkGraph::from_scene(&world, body).unwrap();
        assert_eq!(
            graph.joint_ancestors(LinkId::new(3)),
            vec![JointId::new(0), JointId::new(1), JointId::new(2)]
        );
        assert!(graph.joint_ancestors(LinkId::BASE).is_empty());
    }
}
