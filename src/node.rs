use std::fmt;

use crate::Key;

/// Handle to a node stored in a [`Tree`][crate::Tree]. Handles stay valid for the life of the
/// tree and keep naming the same key, even after rotations move the node around.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        let index = u32::try_from(index).expect("more than u32::MAX nodes in one tree");
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A possibly empty pointer to a node in the arena. Used for owning child links and for the
/// non-owning parent link alike; which one it is depends on the field it lives in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Link(pub(crate) Option<NodeId>);

impl Link {
    pub(crate) const NONE: Self = Link(None);

    pub(crate) fn to(id: NodeId) -> Self {
        Link(Some(id))
    }

    pub(crate) fn get(self) -> Option<NodeId> {
        self.0
    }

    pub(crate) fn is_none(self) -> bool {
        self.0.is_none()
    }

    pub(crate) fn take(&mut self) -> Self {
        Link(self.0.take())
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) key: Key,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) parent: Link,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    pub(crate) height: usize,
}

impl Node {
    /// A new leaf hanging off `parent`.
    pub(crate) fn new(parent: Link, key: Key) -> Self {
        Self {
            key,
            left: Link::NONE,
            right: Link::NONE,
            parent,
            height: 1,
        }
    }
}

/// Height lookups over the arena. Absent subtrees have height 0.
pub(crate) fn height_of(nodes: &[Node], link: Link) -> usize {
    link.get().map_or(0, |id| nodes[id.index()].height)
}

/// Recomputes the cached height of `id` from its children.
pub(crate) fn fix_height(nodes: &mut [Node], id: NodeId) {
    let node = &nodes[id.index()];
    let height = height_of(nodes, node.left).max(height_of(nodes, node.right)) + 1;
    nodes[id.index()].height = height;
}

/// `height(left) - height(right)`. Positive means left-heavy.
///
/// See [the Wikipedia page][wiki] for more details. Note that it uses the opposite sign.
///
/// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
pub(crate) fn balance_factor(nodes: &[Node], id: NodeId) -> isize {
    let node = &nodes[id.index()];
    height_of(nodes, node.left) as isize - height_of(nodes, node.right) as isize
}
