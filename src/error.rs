//! Errors reported by [`Tree`][crate::Tree].

use thiserror::Error;

use crate::Key;

/// Why an insert didn't happen.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// The tree already holds this key. Nothing was changed.
    #[error("key {0} is already in the tree")]
    DuplicateKey(Key),
}

/// The first broken invariant found by [`Tree::check`][crate::Tree::check].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvariantError {
    /// A key sits on the wrong side of one of its ancestors.
    #[error("key {key} is out of order")]
    Unordered {
        /// The misplaced key.
        key: Key,
    },
    /// The subtree heights under this key differ by more than one.
    #[error("node {key} has balance factor {balance}")]
    Unbalanced {
        /// Key of the unbalanced node.
        key: Key,
        /// `height(left) - height(right)`.
        balance: isize,
    },
    /// A child doesn't point back at the node that owns it, or the root has a parent.
    #[error("node {key} has a broken parent link")]
    BadParent {
        /// Key of the child with the bad link.
        key: Key,
    },
    /// The cached height doesn't match the subtree.
    #[error("node {key} caches height {cached} but its subtree is {actual} high")]
    StaleHeight {
        /// Key of the node.
        key: Key,
        /// What the node says.
        cached: usize,
        /// What the subtree actually measures.
        actual: usize,
    },
}
