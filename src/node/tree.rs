//! Post-processing of syntax trees.
//!
//! None of these know anything about grammars; they are pure functions from
//! trees to trees, meant for trimming a parse tree down to the parts a
//! consumer cares about.

use std::ops::Range;

use crate::node::SyntaxTree;

impl<K, L> SyntaxTree<K, L> {
    /// Leaves, left to right.
    pub fn leaves(&self) -> Vec<&L> {
        let mut accum = Vec::new();
        self.collect_leaves(&mut accum);
        accum
    }

    fn collect_leaves<'a>(&'a self, accum: &mut Vec<&'a L>) {
        match self {
            SyntaxTree::Leaf(l) => accum.push(l),
            SyntaxTree::Node(_, children) => {
                for child in children {
                    child.collect_leaves(accum);
                }
            }
        }
    }

    pub fn map_keys<K2>(self, f: &impl Fn(K) -> K2) -> SyntaxTree<K2, L> {
        match self {
            SyntaxTree::Leaf(l) => SyntaxTree::Leaf(l),
            SyntaxTree::Node(k, children) => {
                SyntaxTree::Node(f(k), children.into_iter().map(|c| c.map_keys(f)).collect())
            }
        }
    }

    pub fn map_leaves<L2>(self, f: &impl Fn(L) -> L2) -> SyntaxTree<K, L2> {
        match self {
            SyntaxTree::Leaf(l) => SyntaxTree::Leaf(f(l)),
            SyntaxTree::Node(k, children) => {
                SyntaxTree::Node(k, children.into_iter().map(|c| c.map_leaves(f)).collect())
            }
        }
    }

    /// Removes every node whose key fails `keep`, together with its subtree.
    /// Leaves are always kept. `None` if the root itself is removed.
    pub fn filter(self, keep: &impl Fn(&K) -> bool) -> Option<Self> {
        match self {
            leaf @ SyntaxTree::Leaf(_) => Some(leaf),
            SyntaxTree::Node(k, _) if !keep(&k) => None,
            SyntaxTree::Node(k, children) => {
                Some(SyntaxTree::Node(k, children.into_iter().filter_map(|c| c.filter(keep)).collect()))
            }
        }
    }

    /// Replaces every node that has exactly one child, itself a node, by
    /// that child. Nodes directly above a leaf stay, so leaves keep a key.
    pub fn compressed(self) -> Self {
        match self {
            SyntaxTree::Node(k, mut children) => {
                if children.len() == 1 && !children[0].is_leaf() {
                    children.remove(0).compressed()
                } else {
                    SyntaxTree::Node(k, children.into_iter().map(SyntaxTree::compressed).collect())
                }
            }
            leaf => leaf,
        }
    }

    /// Replaces every node whose key satisfies `explode` by its children,
    /// recursively. The root may explode too, hence the list.
    pub fn explode(self, explode: &impl Fn(&K) -> bool) -> Vec<Self> {
        match self {
            leaf @ SyntaxTree::Leaf(_) => vec![leaf],
            SyntaxTree::Node(k, children) => {
                let children: Vec<Self> = children.into_iter().flat_map(|c| c.explode(explode)).collect();
                if explode(&k) {
                    children
                } else {
                    vec![SyntaxTree::Node(k, children)]
                }
            }
        }
    }
}

impl<K> SyntaxTree<K, Range<usize>> {
    /// The text this tree was parsed from: its leaves' ranges of `input`,
    /// concatenated.
    pub fn yielded(&self, input: &str) -> String {
        self.leaves().into_iter().map(|r| &input[r.clone()]).collect()
    }
}

#[cfg(test)]
#[path = "../tests/tree.rs"]
mod tests_for_tree;
