//! An AVL tree of integer keys supporting insertion.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is built out of `Node`s. Every `Node` stores a key and may have a left
//! and a right child. The invariants that make it a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a key less than its
//!    own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a key greater than its
//!    own key.
//!
//! Searching takes `O(height)`, so it pays to keep the tree short.
//!
//! ## AVL
//!
//! An AVL tree additionally keeps, for every `Node`, the heights of its two subtrees within one of
//! each other. After inserting a key, at most one single or double rotation is needed to restore
//! that, which keeps the height at `O(lg N)`.
//!
//! # Examples
//!
//! ```
//! use avl::{InsertError, Tree};
//!
//! let mut tree = Tree::new();
//!
//! for key in [10, 20, 30] {
//!     tree.insert(key).unwrap();
//! }
//!
//! // Ascending inserts rotated 20 up to the root.
//! let root = tree.root().unwrap();
//! assert_eq!(root.key(), 20);
//! assert_eq!(root.left().map(|n| n.key()), Some(10));
//! assert_eq!(root.right().map(|n| n.key()), Some(30));
//!
//! // Keys are unique.
//! assert_eq!(tree.insert(20), Err(InsertError::DuplicateKey(20)));
//! assert_eq!(tree.len(), 3);
//! ```
//!
//! ## Logging
//!
//! With the `tracing` feature enabled, attaching a node emits a `trace` event and every rotation
//! emits a `debug` event.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod error;
mod node;
mod tree;


pub use error::{InsertError, InvariantError};
pub use node::NodeId;
pub use tree::{NodeRef, Tree};

/// The key type stored in a [`Tree`].
pub type Key = i32;
