//! Sort-Tile-Recursive packed R-tree.
//!
//! The tree is bulk-loaded from all items at once and is immutable
//! afterwards. Leaves are packed by sorting items on their envelope centre
//! x into vertical slices, then on centre y within each slice, and grouping
//! runs of `node_capacity` items; upper levels are packed the same way until
//! a single root remains.

use crate::math::Envelope;

/// Default number of children per node.
pub const DEFAULT_NODE_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy)]
enum Child {
    Node(usize),
    Item(usize),
}

#[derive(Debug, Clone, Copy)]
struct Boundable {
    env: Envelope,
    child: Child,
}

#[derive(Debug, Clone)]
struct TreeNode {
    env: Envelope,
    children: Vec<Boundable>,
}

/// Nested view of the items in tree order: each node becomes a list of its
/// children.
#[derive(Debug)]
pub enum ItemTree<'a, T> {
    Item(&'a T),
    Node(Vec<ItemTree<'a, T>>),
}

/// A static spatial index over items with envelopes.
#[derive(Debug, Clone)]
pub struct StrTree<T> {
    items: Vec<(Envelope, T)>,
    nodes: Vec<TreeNode>,
    root: Option<usize>,
    node_capacity: usize,
}

fn centre_x(env: &Envelope) -> f64 {
    (env.min_x() + env.max_x()) / 2.0
}

fn centre_y(env: &Envelope) -> f64 {
    (env.min_y() + env.max_y()) / 2.0
}

impl<T> StrTree<T> {
    /// Builds the tree from `items`. A capacity below 2 is raised to 2.
    #[must_use]
    pub fn load(node_capacity: usize, items: Vec<(Envelope, T)>) -> Self {
        let mut tree = Self {
            items,
            nodes: Vec::new(),
            root: None,
            node_capacity: node_capacity.max(2),
        };
        tree.build();
        tree
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn build(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let mut level: Vec<Boundable> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, (env, _))| Boundable {
                env: *env,
                child: Child::Item(i),
            })
            .collect();
        loop {
            let parents = self.create_parent_boundables(level);
            if parents.len() == 1 {
                if let Child::Node(root) = parents[0].child {
                    self.root = Some(root);
                }
                return;
            }
            level = parents;
        }
    }

    fn create_parent_boundables(&mut self, mut children: Vec<Boundable>) -> Vec<Boundable> {
        let cap = self.node_capacity;
        let min_leaf_count = children.len().div_ceil(cap);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let slice_count = ((min_leaf_count as f64).sqrt().ceil() as usize).max(1);
        let slice_capacity = children.len().div_ceil(slice_count);

        children.sort_by(|a, b| centre_x(&a.env).total_cmp(&centre_x(&b.env)));

        let mut parents = Vec::new();
        for slice in children.chunks(slice_capacity.max(1)) {
            let mut slice = slice.to_vec();
            slice.sort_by(|a, b| centre_y(&a.env).total_cmp(&centre_y(&b.env)));
            for group in slice.chunks(cap) {
                let mut env = Envelope::null();
                for b in group {
                    env.expand_to_include_env(&b.env);
                }
                let id = self.nodes.len();
                self.nodes.push(TreeNode {
                    env,
                    children: group.to_vec(),
                });
                parents.push(Boundable {
                    env,
                    child: Child::Node(id),
                });
            }
        }
        parents
    }

    /// Items whose envelopes intersect `search`, in tree order.
    #[must_use]
    pub fn query(&self, search: &Envelope) -> Vec<&T> {
        let mut matches = Vec::new();
        if let Some(root) = self.root {
            if self.nodes[root].env.intersects(search) {
                self.query_node(root, search, &mut matches);
            }
        }
        matches
    }

    fn query_node<'a>(&'a self, node: usize, search: &Envelope, matches: &mut Vec<&'a T>) {
        for child in &self.nodes[node].children {
            if !child.env.intersects(search) {
                continue;
            }
            match child.child {
                Child::Node(n) => self.query_node(n, search, matches),
                Child::Item(i) => matches.push(&self.items[i].1),
            }
        }
    }

    /// The items grouped by the tree structure. Empty nodes are omitted.
    #[must_use]
    pub fn items_tree(&self) -> Vec<ItemTree<'_, T>> {
        self.root
            .and_then(|root| self.items_tree_of(root))
            .unwrap_or_default()
    }

    fn items_tree_of(&self, node: usize) -> Option<Vec<ItemTree<'_, T>>> {
        let mut values = Vec::new();
        for child in &self.nodes[node].children {
            match child.child {
                Child::Node(n) => {
                    if let Some(sub) = self.items_tree_of(n) {
                        values.push(ItemTree::Node(sub));
                    }
                }
                Child::Item(i) => values.push(ItemTree::Item(&self.items[i].1)),
            }
        }
        (!values.is_empty()).then_some(values)
    }

    /// Height of the tree; 0 for an empty tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        fn depth_of<T>(tree: &StrTree<T>, node: usize) -> usize {
            1 + tree.nodes[node]
                .children
                .iter()
                .map(|c| match c.child {
                    Child::Node(n) => depth_of(tree, n),
                    Child::Item(_) => 0,
                })
                .max()
                .unwrap_or(0)
        }
        self.root.map_or(0, |root| depth_of(self, root))
    }
}
