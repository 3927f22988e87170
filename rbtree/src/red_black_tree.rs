use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::mem;
use std::borrow::Borrow;
use std::collections::VecDeque;

use log::trace;

use crate::error::Error;
use crate::node::{Color, Node, NodeId, Side};

/// A set of ordered values kept in a red-black tree.
///
/// Inserting a value that is already present leaves the tree untouched.
pub struct RedBlackTree<T> {
    // INVARIANTS:
    //  * every reachable `NodeId` other than `NIL` indexes into `nodes`
    //  * every slot of `nodes` is reachable from `root`
    nodes: Vec<Node<T>>,
    root: NodeId,
}

/// One node of a breadth-first [`RedBlackTree::snapshot`].
///
/// Sentinel children are reported as `None`.
#[derive(Debug, PartialEq, Eq)]
pub struct NodeRecord<'a, T> {
    pub value: &'a T,
    pub color: Color,
    pub left: Option<&'a T>,
    pub right: Option<&'a T>,
}

impl<T> RedBlackTree<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId::NIL,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = NodeId::NIL;
    }

    /// In-order iterator over the values.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    pub fn inorder_for_each<F>(&self, f: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(f)
    }

    pub fn min(&self) -> Result<&T, Error> {
        if self.is_empty() {
            return Err(Error::EmptyTree);
        }
        Ok(&self.node(self.extreme(self.root, Side::Left)).value)
    }

    pub fn max(&self) -> Result<&T, Error> {
        if self.is_empty() {
            return Err(Error::EmptyTree);
        }
        Ok(&self.node(self.extreme(self.root, Side::Right)).value)
    }

    /// Level-order listing of every node, root first.
    pub fn snapshot(&self) -> Vec<NodeRecord<'_, T>> {
        let mut records = Vec::with_capacity(self.len());
        if self.is_empty() {
            return records;
        }

        let mut queue = VecDeque::from([self.root]);
        while let Some(id) = queue.pop_front() {
            let node = self.node(id);
            let (left, right) = (node[Side::Left], node[Side::Right]);
            records.push(NodeRecord {
                value: &node.value,
                color: node.color,
                left: self.value_of(left),
                right: self.value_of(right),
            });
            queue.extend([left, right].into_iter().filter(|child| !child.is_nil()));
        }

        records
    }

    // Arena accessors. The sentinel is handled here so that the algorithms
    // below can treat it like any other black leaf.

    #[inline]
    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        debug_assert!(!id.is_nil(), "the sentinel has no node");
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        debug_assert!(!id.is_nil(), "the sentinel has no node");
        &mut self.nodes[id.index()]
    }

    #[inline]
    fn value_of(&self, id: NodeId) -> Option<&T> {
        (!id.is_nil()).then(|| &self.node(id).value)
    }

    #[inline]
    pub(crate) fn color(&self, id: NodeId) -> Color {
        if id.is_nil() {
            Color::Black
        } else {
            self.node(id).color
        }
    }

    #[inline]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        if id.is_nil() {
            debug_assert!(color.is_black(), "the sentinel must stay black");
            return;
        }
        self.node_mut(id).color = color;
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> NodeId {
        self.node(id).parent
    }

    /// No-op on the sentinel, it never records a parent.
    #[inline]
    fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        if !id.is_nil() {
            self.node_mut(id).parent = parent;
        }
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId, side: Side) -> NodeId {
        self.node(id)[side]
    }

    #[inline]
    fn set_child(&mut self, id: NodeId, side: Side, child: NodeId) {
        debug_assert!(!id.is_nil(), "the sentinel has no children");
        self.node_mut(id)[side] = child;
    }

    /// Which child of its parent `id` is. `id` must not be the root.
    fn side_of(&self, id: NodeId) -> Side {
        let parent = self.parent(id);
        if self.child(parent, Side::Left) == id {
            Side::Left
        } else {
            debug_assert_eq!(self.child(parent, Side::Right), id, "broken parent link");
            Side::Right
        }
    }

    /// Follows `side` links from `id` until the next one is the sentinel.
    fn extreme(&self, mut id: NodeId, side: Side) -> NodeId {
        loop {
            let next = self.child(id, side);
            if next.is_nil() {
                return id;
            }
            id = next;
        }
    }

    fn alloc(&mut self, node: Node<T>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Releases the slot of a detached node and returns its value.
    fn free(&mut self, id: NodeId) -> T {
        let last = NodeId::new(self.nodes.len() - 1);
        if id != last {
            // `swap_remove` moves `last` into `id`, repoint its neighbours
            let parent = self.parent(last);
            if parent.is_nil() {
                self.root = id;
            } else {
                let side = self.side_of(last);
                self.set_child(parent, side, id);
            }
            let (left, right) = (self.child(last, Side::Left), self.child(last, Side::Right));
            self.set_parent(left, id);
            self.set_parent(right, id);
        }
        self.nodes.swap_remove(id.index()).value
    }

    /// Moves `node` down toward `side` and promotes its child on the
    /// opposite side into its place. In-order sequence is unchanged.
    fn rotate(&mut self, node: NodeId, side: Side) {
        //    p                       p
        //    |                       |
        // +-node-+               +-child-+
        // |      |      -->      |       |
        // a  +-child-+       +-node-+    c
        //    |       |       |      |
        //    b       c       a      b
        // drawn for `side == Left`, mirrored for `Right`
        let child = self.child(node, side.opposite());
        debug_assert!(!child.is_nil(), "rotation needs a child to promote");

        let inner = self.child(child, side);
        self.set_child(node, side.opposite(), inner);
        self.set_parent(inner, node);

        self.transplant(node, child);

        self.set_child(child, side, node);
        self.set_parent(node, child);
    }

    /// Puts `new` where `old` hangs in the tree. Children of either node are
    /// left alone.
    fn transplant(&mut self, old: NodeId, new: NodeId) {
        let parent = self.parent(old);
        if parent.is_nil() {
            self.root = new;
        } else {
            let side = self.side_of(old);
            self.set_child(parent, side, new);
        }
        self.set_parent(new, parent);
    }
}

impl<T: Ord> RedBlackTree<T> {
    /// Returns `false` if the value was already present.
    pub fn insert(&mut self, value: T) -> bool {
        // Move left/right down the tree until we find an empty slot
        let mut parent = NodeId::NIL;
        let mut side = Side::Left;
        let mut x = self.root;
        while !x.is_nil() {
            parent = x;
            let node = self.node(x);
            side = match value.cmp(&node.value) {
                Ordering::Less => Side::Left,
                Ordering::Equal => {
                    trace!("insert: value already present, ignoring");
                    return false;
                }
                Ordering::Greater => Side::Right,
            };
            x = node[side];
        }

        let new_node = self.alloc(Node::new(value, parent));
        if parent.is_nil() {
            self.root = new_node;
        } else {
            self.set_child(parent, side, new_node);
        }

        self.insert_fixup(new_node);
        self.assert_valid("insert");
        true
    }

    fn insert_fixup(&mut self, mut node: NodeId) {
        loop {
            debug_assert!(self.color(node).is_red());
            let mut parent = self.parent(node);
            // the root's parent is the sentinel, which is black
            if self.color(parent).is_black() {
                break;
            }

            // red parent is never the root, so the grand parent exists
            let grand_parent = self.parent(parent);
            debug_assert!(self.color(grand_parent).is_black());
            let side = self.side_of(parent);
            let uncle = self.child(grand_parent, side.opposite());

            if self.color(uncle).is_red() {
                //     +--- gp:b ---+               +--- gp:r ---+
                //     |            |               |            |
                //  + p:r +      + u:r +   -->   + p:b +      + u:b +
                //  |     |      |     |         |     |      |     |
                // n:r   a:b    b:b   c:b       n:r   a:b    b:b   c:b
                //
                // Black height is unchanged, but gp may now have a red parent.
                trace!("insert fixup: red uncle, recoloring");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grand_parent, Color::Red);
                node = grand_parent;
                continue;
            }

            if self.side_of(node) == side.opposite() {
                // inner child, turn it into the outer case
                trace!("insert fixup: inner child, rotating parent");
                self.rotate(parent, side);
                mem::swap(&mut node, &mut parent);
            }

            //           +-- gp:b --+            +----- p:b -----+
            //           |          |            |               |
            //      +-- p:r --+    u:b  -->   +- n:r -+     +- gp:r -+
            //      |         |               |       |     |        |
            //  +- n:r -+    c:b             a:b     b:b   c:b      u:b
            //  |       |
            // a:b     b:b
            trace!("insert fixup: outer child, rotating grand parent");
            self.set_color(parent, Color::Black);
            self.set_color(grand_parent, Color::Red);
            self.rotate(grand_parent, side.opposite());
            break;
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Removes `value` and returns it, or `None` if it isn't present.
    pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find(value);
        if node.is_nil() {
            trace!("remove: value not present, ignoring");
            return None;
        }

        let value = self.remove_node(node);
        self.assert_valid("remove");
        Some(value)
    }

    fn remove_node(&mut self, node: NodeId) -> T {
        let mut removed_color = self.color(node);
        let (left, right) = (self.child(node, Side::Left), self.child(node, Side::Right));

        // `x` moves into the vacated slot. It may be the sentinel, so its
        // parent and side are tracked here rather than read back from it.
        let x;
        let x_parent;
        let x_side;
        if left.is_nil() || right.is_nil() {
            x = if left.is_nil() { right } else { left };
            x_parent = self.parent(node);
            x_side = if x_parent.is_nil() {
                Side::Left
            } else {
                self.side_of(node)
            };
            self.transplant(node, x);
        } else {
            // Two children: the successor is the minimum of the right subtree
            // and has no left child. It takes the place of `node`.
            let successor = self.extreme(right, Side::Left);
            removed_color = self.color(successor);
            x = self.child(successor, Side::Right);
            if successor == right {
                x_parent = successor;
                x_side = Side::Right;
            } else {
                x_parent = self.parent(successor);
                x_side = Side::Left;
                self.transplant(successor, x);
                self.set_child(successor, Side::Right, right);
                self.set_parent(right, successor);
            }
            self.transplant(node, successor);
            self.set_child(successor, Side::Left, left);
            self.set_parent(left, successor);
            let color = self.color(node);
            self.set_color(successor, color);
        }

        if removed_color.is_black() {
            self.remove_fixup(x, x_parent, x_side);
        }

        self.free(node)
    }

    /// `x` carries an extra black. `parent` and `side` locate it, since `x`
    /// may be the sentinel.
    fn remove_fixup(&mut self, mut x: NodeId, mut parent: NodeId, mut side: Side) {
        while x != self.root && self.color(x).is_black() {
            debug_assert!(!parent.is_nil());
            let mut sibling = self.child(parent, side.opposite());
            // the paths through the sibling must make up for the missing black
            debug_assert!(!sibling.is_nil());

            if self.color(sibling).is_red() {
                //     +--- p:b ---+                    +--- s:b ---+
                //     |           |                    |           |
                //    x:b      +- s:r -+   -->      +- p:r -+      d:b
                //             |       |            |       |
                //            c:b     d:b          x:b     c:b
                trace!("remove fixup: red sibling");
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.child(parent, side.opposite());
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, side.opposite());
            if self.color(near).is_black() && self.color(far).is_black() {
                // move the extra black up to the parent
                trace!("remove fixup: black nephews, moving up");
                self.set_color(sibling, Color::Red);
                x = parent;
                parent = self.parent(x);
                if !parent.is_nil() {
                    side = self.side_of(x);
                }
                continue;
            }

            if self.color(far).is_black() {
                // near nephew is red, rotate it up to become the far one
                trace!("remove fixup: red near nephew");
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self.child(parent, side.opposite());
            }

            //     +--- p:c ---+                     +--- s:c ---+
            //     |           |                     |           |
            //    x:b      +- s:b -+    -->      +- p:b -+      f:b
            //             |       |             |       |
            //             n      f:r           x:b      n
            trace!("remove fixup: red far nephew");
            let parent_color = self.color(parent);
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            let far = self.child(sibling, side.opposite());
            self.set_color(far, Color::Black);
            self.rotate(parent, side);
            x = self.root;
        }

        self.set_color(x, Color::Black);
    }

    #[cfg(feature = "validate")]
    fn assert_valid(&self, operation: &str) {
        if let Err(violation) = self.validate() {
            panic!("{operation} left the tree invalid: {violation}");
        }
    }

    #[cfg(not(feature = "validate"))]
    #[inline(always)]
    fn assert_valid(&self, _operation: &str) {}
}

impl<T> RedBlackTree<T> {
    pub(crate) fn find<Q>(&self, value: &Q) -> NodeId
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut x = self.root;
        while !x.is_nil() {
            let node = self.node(x);
            match value.cmp(node.value.borrow()) {
                Ordering::Less => x = node[Side::Left],
                Ordering::Equal => return x,
                Ordering::Greater => x = node[Side::Right],
            }
        }

        NodeId::NIL
    }

    pub fn search<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        !self.find(value).is_nil()
    }

    /// Values visited on the way from the root down to `value`, both ends
    /// included.
    pub fn path<Q>(&self, value: &Q) -> Result<Vec<&T>, Error>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut path = Vec::new();
        let mut x = self.root;
        while !x.is_nil() {
            let node = self.node(x);
            path.push(&node.value);
            match value.cmp(node.value.borrow()) {
                Ordering::Less => x = node[Side::Left],
                Ordering::Equal => return Ok(path),
                Ordering::Greater => x = node[Side::Right],
            }
        }

        Err(Error::NotFound)
    }
}

impl<T> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for RedBlackTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord> Extend<T> for RedBlackTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a RedBlackTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Debug for RedBlackTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct DebugNodes<'a, T>(&'a RedBlackTree<T>);

        impl<T> fmt::Debug for DebugNodes<'_, T>
        where
            T: fmt::Debug,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut list = f.debug_list();
                let mut iter = self.0.iter();
                while let Some(node) = iter.next_node() {
                    list.entry(&(&node.value, node.color));
                }
                list.finish()
            }
        }

        f.debug_struct("RedBlackTree")
            .field("len", &self.len())
            .field("root", &self.value_of(self.root))
            .field("nodes", &DebugNodes(self))
            .finish()
    }
}

/// In-order iterator returned by [`RedBlackTree::iter`].
pub struct Iter<'a, T> {
    tree: &'a RedBlackTree<T>,
    // nodes whose left subtree is done but which are not yet yielded
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(tree: &'a RedBlackTree<T>) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
            remaining: tree.len(),
        };
        iter.push_left_spine(tree.root);
        iter
    }

    fn push_left_spine(&mut self, mut id: NodeId) {
        while !id.is_nil() {
            self.stack.push(id);
            id = self.tree.child(id, Side::Left);
        }
    }

    fn next_node(&mut self) -> Option<&'a Node<T>> {
        let tree = self.tree;
        let id = self.stack.pop()?;
        self.push_left_spine(tree.child(id, Side::Right));
        self.remaining -= 1;
        Some(tree.node(id))
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_node().map(|node| &node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
