use std::cmp::Ordering;
use std::fmt;

use crate::error::{InsertError, InvariantError};
use crate::node::{self, Link, Node, NodeId};
use crate::Key;

/// A self-balancing Binary Search Tree (specifically, an AVL tree) of unique integer keys.
///
/// Nodes live in an arena owned by the tree. Children are owning links, parents are
/// back-references into the same arena, so a rotation can relink a subtree into its former
/// parent without walking down from the root again.
#[derive(Clone, Default)]
pub struct Tree {
    root: Link,
    nodes: Vec<Node>,
}

/// What the rebalancing walk did below a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Rebalance {
    /// Every node seen so far is balanced.
    Unchanged,
    /// A rotation restored the balance. Nothing further up needs checking.
    Rotated,
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree").field("root", &self.root()).finish()
    }
}

impl Tree {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: Link::NONE,
            nodes: Vec::new(),
        }
    }

    /// Generate a new, empty `Tree` with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            root: Link::NONE,
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// How many keys are in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels in the tree. An empty tree has height 0, a single node height 1.
    pub fn height(&self) -> usize {
        node::height_of(&self.nodes, self.root)
    }

    /// The root node, if there is one.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.get().map(|id| NodeRef { tree: self, id })
    }

    /// Looks up a node by the handle [`Tree::insert`] returned for it.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.index() < self.nodes.len()).then(|| NodeRef { tree: self, id })
    }

    /// Potentially finds the node holding `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// let id = tree.insert(1).unwrap();
    ///
    /// assert_eq!(tree.find(1).map(|n| n.id()), Some(id));
    /// assert!(tree.find(42).is_none());
    /// ```
    pub fn find(&self, key: Key) -> Option<NodeRef<'_>> {
        let mut link = self.root;
        while let Some(id) = link.get() {
            let node = &self.nodes[id.index()];
            link = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Equal => return Some(NodeRef { tree: self, id }),
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Whether `key` is in the tree.
    pub fn contains(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Inserts `key` and rebalances the tree, returning a handle to the new node. Inserting a key
    /// that is already present fails and leaves the tree untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::{InsertError, Tree};
    ///
    /// let mut tree = Tree::new();
    ///
    /// let id = tree.insert(10).unwrap();
    /// assert_eq!(tree.node(id).map(|n| n.key()), Some(10));
    ///
    /// assert_eq!(tree.insert(10), Err(InsertError::DuplicateKey(10)));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: Key) -> Result<NodeId, InsertError> {
        let Some(root) = self.root.get() else {
            // A lone node is balanced already.
            let id = self.push(Node::new(Link::NONE, key));
            self.root = Link::to(id);
            return Ok(id);
        };

        let id = self.attach(root, key)?;
        self.rebalance(root, key);

        if cfg!(debug_assertions) {
            let root = self.root().expect("Inserting implies root");
            assert!(root.parent().is_none());
            assert!(root.balance_factor().abs() <= 1);
            assert_eq!(self.nodes[id.index()].key, key);
        }

        Ok(id)
    }

    /// Verifies every invariant of the tree from scratch: key order, balance, parent links and
    /// cached heights. Reports the first violation found.
    pub fn check(&self) -> Result<(), InvariantError> {
        let Some(root) = self.root.get() else {
            return Ok(());
        };
        if let Some(_parent) = self.nodes[root.index()].parent.get() {
            return Err(InvariantError::BadParent {
                key: self.nodes[root.index()].key,
            });
        }
        self.check_subtree(root, None, None).map(|_height| ())
    }

    /// Whether [`Tree::check`] passes.
    pub fn is_avl(&self) -> bool {
        self.check().is_ok()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Descends from `root` to where `key` belongs and hangs a new leaf there.
    fn attach(&mut self, root: NodeId, key: Key) -> Result<NodeId, InsertError> {
        let mut parent = root;
        loop {
            let node = &self.nodes[parent.index()];
            let next = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Equal => return Err(InsertError::DuplicateKey(key)),
                Ordering::Greater => node.right,
            };
            match next.get() {
                Some(child) => parent = child,
                None => break,
            }
        }

        let id = self.push(Node::new(Link::to(parent), key));
        let parent_node = &mut self.nodes[parent.index()];
        if key < parent_node.key {
            parent_node.left = Link::to(id);
        } else {
            parent_node.right = Link::to(id);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(key, parent = parent_node.key, "attached leaf");

        Ok(id)
    }

    /// Restores the AVL invariant after `key` was attached below `root`.
    fn rebalance(&mut self, root: NodeId, key: Key) {
        self.rebalance_toward(root, key);
    }

    /// Post-order walk along the path to the freshly inserted `key`, so the deepest unbalanced
    /// ancestor is the one corrected. Only that path can have changed height.
    ///
    /// See https://en.wikipedia.org/wiki/AVL_tree#Rebalancing for terminology.
    fn rebalance_toward(&mut self, id: NodeId, key: Key) -> Rebalance {
        let node = &self.nodes[id.index()];
        let next = match key.cmp(&node.key) {
            Ordering::Less => node.left,
            Ordering::Equal => Link::NONE,
            Ordering::Greater => node.right,
        };
        let below = match next.get() {
            Some(child) => self.rebalance_toward(child, key),
            None => Rebalance::Unchanged,
        };

        // Heights above a rotation are refreshed too; the rotated subtree is back to its old
        // height so this is a no-op in practice.
        node::fix_height(&mut self.nodes, id);
        if below == Rebalance::Rotated {
            return Rebalance::Rotated;
        }

        let balance = node::balance_factor(&self.nodes, id);
        if balance > 1 {
            let left = self.nodes[id.index()]
                .left
                .get()
                .expect("Left heavy => left child");
            if node::balance_factor(&self.nodes, left) < 0 {
                self.rotate_left(left);
            }
            self.rotate_right(id);
        } else if balance < -1 {
            let right = self.nodes[id.index()]
                .right
                .get()
                .expect("Right heavy => right child");
            if node::balance_factor(&self.nodes, right) > 0 {
                self.rotate_right(right);
            }
            self.rotate_left(id);
        } else {
            return Rebalance::Unchanged;
        }

        Rebalance::Rotated
    }

    /// Rotate `old_root` to the right. This moves its left child up vertically and `old_root`
    /// down vertically. Used to rebalance the tree when the left child is too tall. As such, it
    /// must only be called when there _is_ a left child.
    ///
    /// The former parent's child slot (or the tree's root slot) is pointed at the new subtree
    /// root, which is also returned.
    ///
    /// ## Panics
    ///
    /// When called on a node without a left child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///    Option<parent>            Option<parent>
    ///      /                         /
    ///   old_root                  new_root
    ///    /     \                  /     \
    /// new_root  z     rotate ->  x    old_root
    ///  / \                               /  \
    /// x   y                             y    z
    /// ```
    fn rotate_right(&mut self, old_root: NodeId) -> NodeId {
        let new_root = self.nodes[old_root.index()]
            .left
            .get()
            .expect("Rotate right => left child");
        let old_parent = self.nodes[old_root.index()].parent;
        let moved = self.nodes[new_root.index()].right.take();

        self.nodes[old_root.index()].left = moved;
        if let Some(moved) = moved.get() {
            self.nodes[moved.index()].parent = Link::to(old_root);
        }
        self.nodes[old_root.index()].parent = Link::to(new_root);
        node::fix_height(&mut self.nodes, old_root);

        self.nodes[new_root.index()].right = Link::to(old_root);
        self.nodes[new_root.index()].parent = old_parent;
        node::fix_height(&mut self.nodes, new_root);

        self.replace_child(old_parent, old_root, new_root);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            pivot = self.nodes[old_root.index()].key,
            new_root = self.nodes[new_root.index()].key,
            "rotated right"
        );

        new_root
    }

    /// Mirror image of [`Tree::rotate_right`]: the right child moves up and `old_root` becomes
    /// its left child. Must only be called when there _is_ a right child.
    ///
    /// ```text
    ///  Option<parent>                Option<parent>
    ///    /                             /
    /// old_root                      new_root
    ///  /     \                       /     \
    /// x    new_root   rotate ->   old_root  z
    ///        / \                   /  \
    ///       y   z                 x    y
    /// ```
    fn rotate_left(&mut self, old_root: NodeId) -> NodeId {
        let new_root = self.nodes[old_root.index()]
            .right
            .get()
            .expect("Rotate left => right child");
        let old_parent = self.nodes[old_root.index()].parent;
        let moved = self.nodes[new_root.index()].left.take();

        self.nodes[old_root.index()].right = moved;
        if let Some(moved) = moved.get() {
            self.nodes[moved.index()].parent = Link::to(old_root);
        }
        self.nodes[old_root.index()].parent = Link::to(new_root);
        node::fix_height(&mut self.nodes, old_root);

        self.nodes[new_root.index()].left = Link::to(old_root);
        self.nodes[new_root.index()].parent = old_parent;
        node::fix_height(&mut self.nodes, new_root);

        self.replace_child(old_parent, old_root, new_root);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            pivot = self.nodes[old_root.index()].key,
            new_root = self.nodes[new_root.index()].key,
            "rotated left"
        );

        new_root
    }

    /// Points whichever slot held `old` (a child slot of `parent`, or the root slot when there is
    /// no parent) at `new`.
    fn replace_child(&mut self, parent: Link, old: NodeId, new: NodeId) {
        match parent.get() {
            None => self.root = Link::to(new),
            Some(parent) => {
                let parent = &mut self.nodes[parent.index()];
                if parent.left == Link::to(old) {
                    parent.left = Link::to(new);
                } else {
                    parent.right = Link::to(new);
                }
            }
        }
    }

    /// Checks the subtree at `id` whose keys must lie strictly between `lower` and `upper`.
    /// Returns its measured height.
    fn check_subtree(
        &self,
        id: NodeId,
        lower: Option<Key>,
        upper: Option<Key>,
    ) -> Result<usize, InvariantError> {
        let node = &self.nodes[id.index()];
        let key = node.key;
        if lower.map_or(false, |lower| key <= lower) || upper.map_or(false, |upper| key >= upper) {
            return Err(InvariantError::Unordered { key });
        }

        let mut heights = [0; 2];
        let children = [
            (node.left, lower, Some(key)),
            (node.right, Some(key), upper),
        ];
        for (height, (child, lower, upper)) in heights.iter_mut().zip(children) {
            if let Some(child) = child.get() {
                if self.nodes[child.index()].parent != Link::to(id) {
                    return Err(InvariantError::BadParent {
                        key: self.nodes[child.index()].key,
                    });
                }
                *height = self.check_subtree(child, lower, upper)?;
            }
        }

        let [left_height, right_height] = heights;
        let actual = left_height.max(right_height) + 1;
        if node.height != actual {
            return Err(InvariantError::StaleHeight {
                key,
                cached: node.height,
                actual,
            });
        }

        let balance = left_height as isize - right_height as isize;
        if balance.abs() > 1 {
            return Err(InvariantError::Unbalanced { key, balance });
        }

        Ok(actual)
    }
}

/// A read-only view of one node in a [`Tree`].
#[derive(Copy, Clone)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a Node {
        &self.tree.nodes[self.id.index()]
    }

    fn follow(&self, link: Link) -> Option<NodeRef<'a>> {
        link.get().map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    /// Handle of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The key stored here.
    pub fn key(&self) -> Key {
        self.node().key
    }

    /// Left child, holding smaller keys.
    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.follow(self.node().left)
    }

    /// Right child, holding larger keys.
    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.follow(self.node().right)
    }

    /// The node this one hangs off. `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.follow(self.node().parent)
    }

    /// Levels in the subtree rooted here. A leaf has height 1.
    pub fn height(&self) -> usize {
        self.node().height
    }

    /// `height(left) - height(right)`. Positive means left-heavy.
    pub fn balance_factor(&self) -> isize {
        node::balance_factor(&self.tree.nodes, self.id)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key())
            .field("height", &self.height())
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}
