//! Arena-backed search trees.

use motion_space::ConfigurationSpace;
use motion_types::{Configuration, Path};

#[derive(Debug, Clone)]
struct Node {
    config: Configuration,
    parent: Option<usize>,
    children: Vec<usize>,
    cost: f64,
    // Configurations strictly between the parent and this node
    edge: Vec<Configuration>,
}

/// A tree of configurations rooted at one endpoint of the query.
#[derive(Debug, Clone)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub(crate) fn new(root: Configuration) -> Self {
        Self {
            nodes: vec![Node {
                config: root,
                parent: None,
                children: Vec::new(),
                cost: 0.0,
                edge: Vec::new(),
            }],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn config(&self, index: usize) -> &Configuration {
        &self.nodes[index].config
    }

    pub(crate) fn cost(&self, index: usize) -> f64 {
        self.nodes[index].cost
    }

    #[cfg(test)]
    pub(crate) fn parent(&self, index: usize) -> Option<usize> {
        self.nodes[index].parent
    }

    /// Adds a child reached from `parent` by a step of length `step`.
    pub(crate) fn add(
        &mut self,
        config: Configuration,
        parent: usize,
        step: f64,
        edge: Vec<Configuration>,
    ) -> usize {
        let index = self.nodes.len();
        let cost = self.nodes[parent].cost + step;
        self.nodes[parent].children.push(index);
        self.nodes.push(Node {
            config,
            parent: Some(parent),
            children: Vec::new(),
            cost,
            edge,
        });
        index
    }

    /// Index of the node nearest to `q`.
    pub(crate) fn nearest<S: ConfigurationSpace>(&self, space: &S, q: &[f64]) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (index, node) in self.nodes.iter().enumerate() {
            let d = space.distance(&node.config, q);
            if d < best_distance {
                best = index;
                best_distance = d;
            }
        }
        best
    }

    /// Indices of nodes within `radius` of `q`, with their distances.
    pub(crate) fn within<S: ConfigurationSpace>(
        &self,
        space: &S,
        q: &[f64],
        radius: f64,
    ) -> Vec<(usize, f64)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (index, space.distance(&node.config, q)))
            .filter(|&(_, d)| d <= radius)
            .collect()
    }

    /// Reattaches `index` under `parent`, updating the cost of its subtree.
    pub(crate) fn rewire(
        &mut self,
        index: usize,
        parent: usize,
        step: f64,
        edge: Vec<Configuration>,
    ) {
        if let Some(old) = self.nodes[index].parent {
            self.nodes[old].children.retain(|&child| child != index);
        }
        self.nodes[parent].children.push(index);
        let node = &mut self.nodes[index];
        node.parent = Some(parent);
        node.edge = edge;

        let delta = self.nodes[parent].cost + step - self.nodes[index].cost;
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            self.nodes[current].cost += delta;
            stack.extend(self.nodes[current].children.iter().copied());
        }
    }

    /// Configurations from the root to `index`, edges included.
    pub(crate) fn retrace(&self, index: usize) -> Vec<Configuration> {
        let mut chain = Vec::new();
        let mut current = Some(index);
        while let Some(i) = current {
            chain.push(i);
            current = self.nodes[i].parent;
        }
        let mut out = Vec::with_capacity(chain.len());
        for &i in chain.iter().rev() {
            let node = &self.nodes[i];
            out.extend(node.edge.iter().cloned());
            out.push(node.config.clone());
        }
        out
    }

    pub(crate) fn path_to(&self, index: usize) -> Path {
        Path::new(self.retrace(index))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use motion_space::JointSpace;
    use motion_types::JointRange;

    fn line() -> JointSpace {
        JointSpace::new(&[JointRange::bounded(-10.0, 10.0)]).unwrap()
    }

    #[test]
    fn test_nearest_and_retrace() {
        let space = line();
        let mut tree = Tree::new(Configuration::from([0.0]));
        let a = tree.add(Configuration::from([1.0]), 0, 1.0, Vec::new());
        let b = tree.add(Configuration::from([2.0]), a, 1.0, vec![Configuration::from([1.5])]);
        assert_eq!(tree.nearest(&space, &[1.9]), b);
        let path: Vec<f64> = tree.retrace(b).iter().map(|q| q[0]).collect();
        assert_eq!(path, vec![0.0, 1.0, 1.5, 2.0]);
        assert_eq!(tree.cost(b), 2.0);
    }

    #[test]
    fn test_rewire_updates_subtree_costs() {
        let mut tree = Tree::new(Configuration::from([0.0]));
        let a = tree.add(Configuration::from([1.0]), 0, 3.0, Vec::new());
        let b = tree.add(Configuration::from([2.0]), a, 1.0, Vec::new());
        let c = tree.add(Configuration::from([3.0]), b, 1.0, Vec::new());
        assert_eq!(tree.cost(c), 5.0);

        tree.rewire(a, 0, 1.0, Vec::new());
        assert_eq!(tree.cost(a), 1.0);
        assert_eq!(tree.cost(c), 3.0);

        tree.rewire(c, 0, 2.5, Vec::new());
        assert_eq!(tree.parent(c), Some(0));
        assert_eq!(tree.cost(c), 2.5);
        assert_eq!(tree.cost(b), 2.0);
    }

    #[test]
    fn test_within_radius() {
        let space = line();
        let mut tree = Tree::new(Configuration::from([0.0]));
        tree.add(Configuration::from([0.4]), 0, 0.4, Vec::new());
        tree.add(Configuration::from([3.0]), 0, 3.0, Vec::new());
        let near: Vec<usize> = tree
            .within(&space, &[0.2], 0.5)
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        assert_eq!(near, vec![0, 1]);
    }
}
