use crate::node::{NodeId, Side};
use crate::red_black_tree::RedBlackTree;

/// A broken red-black or search tree invariant found by
/// [`RedBlackTree::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("the root has a parent")]
    RootHasParent,
    #[error("the root is red")]
    RedRoot,
    #[error("a red node has a red child")]
    RedRed,
    #[error("black height differs between subtrees: {left} on the left, {right} on the right")]
    BlackHeight { left: usize, right: usize },
    #[error("in-order traversal is not strictly increasing")]
    Order,
    #[error("a child does not link back to its parent")]
    BrokenLink,
    #[error("{reachable} nodes reachable from the root, but the tree holds {len}")]
    Length { reachable: usize, len: usize },
}

impl<T: Ord> RedBlackTree<T> {
    /// Walks the whole tree and checks every invariant. O(n).
    pub fn validate(&self) -> Result<(), Violation> {
        let root = self.root();
        if root.is_nil() {
            return match self.len() {
                0 => Ok(()),
                len => Err(Violation::Length { reachable: 0, len }),
            };
        }
        if !self.parent(root).is_nil() {
            return Err(Violation::RootHasParent);
        }
        if self.color(root).is_red() {
            return Err(Violation::RedRoot);
        }

        let mut walk = Walk {
            tree: self,
            previous: None,
            reachable: 0,
        };
        walk.subtree(root)?;

        match walk.reachable {
            reachable if reachable == self.len() => Ok(()),
            reachable => Err(Violation::Length {
                reachable,
                len: self.len(),
            }),
        }
    }
}

struct Walk<'a, T> {
    tree: &'a RedBlackTree<T>,
    // last value seen in order
    previous: Option<&'a T>,
    reachable: usize,
}

impl<'a, T: Ord> Walk<'a, T> {
    /// Returns the black height of `id`, the sentinel counting as zero.
    fn subtree(&mut self, id: NodeId) -> Result<usize, Violation> {
        if id.is_nil() {
            return Ok(0);
        }

        let tree = self.tree;
        self.reachable += 1;
        if self.reachable > tree.len() {
            // a cycle, or links into freed slots
            return Err(Violation::Length {
                reachable: self.reachable,
                len: tree.len(),
            });
        }

        let node = tree.node(id);
        let (left, right) = (node[Side::Left], node[Side::Right]);
        if !left.is_nil() && left == right {
            return Err(Violation::BrokenLink);
        }
        for child in [left, right] {
            if child.is_nil() {
                continue;
            }
            if tree.parent(child) != id {
                return Err(Violation::BrokenLink);
            }
            if node.color.is_red() && tree.color(child).is_red() {
                return Err(Violation::RedRed);
            }
        }

        let left_height = self.subtree(left)?;
        if self.previous.is_some_and(|previous| previous >= &node.value) {
            return Err(Violation::Order);
        }
        self.previous = Some(&node.value);
        let right_height = self.subtree(right)?;

        if left_height != right_height {
            return Err(Violation::BlackHeight {
                left: left_height,
                right: right_height,
            });
        }
        Ok(left_height + node.color.is_black() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Color;

    fn tree() -> RedBlackTree<i32> {
        [10, 18, 7, 15, 16, 30, 25, 40, 60, 2].into_iter().collect()
    }

    #[test]
    fn valid() {
        assert_eq!(tree().validate(), Ok(()));
        assert_eq!(RedBlackTree::<i32>::new().validate(), Ok(()));
    }

    #[test]
    fn red_root() {
        let mut tree = tree();
        let root = tree.root();
        tree.set_color(root, Color::Red);
        assert_eq!(tree.validate(), Err(Violation::RedRoot));
    }

    #[test]
    fn red_red() {
        let mut tree = tree();
        // 16 (10 (7 (2) .) 15) (25 18 (40 30 60)), 7 sits under red 10
        let id = tree.find(&7);
        tree.set_color(id, Color::Red);
        assert_eq!(tree.validate(), Err(Violation::RedRed));
    }

    #[test]
    fn black_height() {
        let mut tree = tree();
        // 2 is a red leaf under black 7, painting it black adds a black on one side only
        let id = tree.find(&2);
        tree.set_color(id, Color::Black);
        assert_eq!(
            tree.validate(),
            Err(Violation::BlackHeight { left: 1, right: 0 })
        );
    }

    #[test]
    fn display() {
        assert_eq!(Violation::RedRoot.to_string(), "the root is red");
        assert_eq!(
            Violation::Length {
                reachable: 3,
                len: 4
            }
            .to_string(),
            "3 nodes reachable from the root, but the tree holds 4"
        );
    }
}
