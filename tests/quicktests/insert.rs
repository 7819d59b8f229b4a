use avl::{InsertError, Key, NodeRef, Tree};
use quickcheck_macros::quickcheck;

use std::collections::BTreeSet;

use crate::Op;

/// Walks the tree and collects its keys in order, checking the BST property, the AVL balance and
/// the parent links on the way.
fn collect_checked(node: Option<NodeRef<'_>>, keys: &mut Vec<Key>) -> Option<usize> {
    let Some(node) = node else {
        return Some(0);
    };

    for child in [node.left(), node.right()].into_iter().flatten() {
        if child.parent().map(|p| p.id()) != Some(node.id()) {
            return None;
        }
    }

    let left = collect_checked(node.left(), keys)?;
    if keys.last().map_or(false, |last| *last >= node.key()) {
        return None;
    }
    keys.push(node.key());
    let right = collect_checked(node.right(), keys)?;

    if left.abs_diff(right) > 1 {
        return None;
    }
    Some(left.max(right) + 1)
}

/// Applies the operations to a tree and a set. Returns `false` as soon as the tree disagrees with
/// the set about whether an insert should succeed.
fn do_ops(ops: &[Op<Key>], tree: &mut Tree, set: &mut BTreeSet<Key>) -> bool {
    for op in ops {
        match *op {
            Op::Insert(k) => {
                if tree.insert(k).is_ok() != set.insert(k) {
                    return false;
                }
            }
            Op::InsertTwice(k) => {
                let _ = tree.insert(k);
                set.insert(k);
                if tree.insert(k) != Err(InsertError::DuplicateKey(k)) {
                    return false;
                }
            }
        }
    }

    true
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let ops: Vec<_> = ops
        .into_iter()
        .map(|op| match op {
            Op::Insert(k) => Op::Insert(Key::from(k)),
            Op::InsertTwice(k) => Op::InsertTwice(Key::from(k)),
        })
        .collect();
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    if !do_ops(&ops, &mut tree, &mut set) {
        return false;
    }

    let mut keys = Vec::new();
    collect_checked(tree.root(), &mut keys) == Some(tree.height())
        && keys.into_iter().eq(set.iter().copied())
}

#[quickcheck]
fn bst_and_balance_hold(xs: Vec<Key>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x);
        let mut keys = Vec::new();
        if collect_checked(tree.root(), &mut keys).is_none() {
            return false;
        }
    }

    tree.is_avl()
}

#[quickcheck]
fn size_grows_by_one(xs: Vec<Key>) -> bool {
    let mut tree = Tree::new();
    xs.iter().all(|x| {
        let before = tree.len();
        match tree.insert(*x) {
            Ok(id) => tree.len() == before + 1 && tree.node(id).map(|n| n.key()) == Some(*x),
            Err(InsertError::DuplicateKey(k)) => k == *x && tree.len() == before,
        }
    })
}

#[quickcheck]
fn duplicates_change_nothing(xs: Vec<Key>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x);
    }
    let before = format!("{:?}", tree);

    xs.iter().all(|x| tree.insert(*x).is_err()) && format!("{:?}", tree) == before
}

#[quickcheck]
fn contains(xs: Vec<Key>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x);
    }

    xs.iter().all(|x| tree.contains(*x))
}

#[quickcheck]
fn contains_not(xs: Vec<Key>, nots: Vec<Key>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x);
    }
    let added: BTreeSet<_> = xs.into_iter().collect();
    let nots: BTreeSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| !tree.contains(*x))
}

#[test]
fn scenario_left_left_at_root() {
    let mut tree = Tree::new();
    for key in [10, 20, 30] {
        tree.insert(key).unwrap();
    }

    let root = tree.root().unwrap();
    assert_eq!(root.key(), 20);
    assert_eq!(root.left().unwrap().key(), 10);
    assert_eq!(root.right().unwrap().key(), 30);
    assert_eq!(root.balance_factor(), 0);
}

#[test]
fn scenario_left_right_at_root() {
    let mut tree = Tree::new();
    for key in [30, 10, 20] {
        tree.insert(key).unwrap();
    }

    let root = tree.root().unwrap();
    assert_eq!(root.key(), 20);
    assert_eq!(root.left().unwrap().key(), 10);
    assert_eq!(root.right().unwrap().key(), 30);
    assert!(tree.is_avl());
}
