use core::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// Returns `true` if the color is [`Red`].
    ///
    /// [`Red`]: Color::Red
    #[must_use]
    pub fn is_red(&self) -> bool {
        matches!(self, Self::Red)
    }

    /// Returns `true` if the color is [`Black`].
    ///
    /// [`Black`]: Color::Black
    #[must_use]
    pub fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }
}

/// Which child slot of a node. The rebalancing routines are written once
/// against a `Side` and its opposite instead of twice for left and right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Index of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

impl NodeId {
    /// The sentinel. Never allocated, always black, carries no value.
    pub(crate) const NIL: Self = Self(usize::MAX);

    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index != usize::MAX, "arena index collides with the sentinel");
        Self(index)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }

    #[inline]
    pub(crate) fn is_nil(self) -> bool {
        self == Self::NIL
    }
}

pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) color: Color,
    // non-owning back reference, `NIL` for the root
    pub(crate) parent: NodeId,
    children: [NodeId; 2],
}

impl<T> Node<T> {
    /// New nodes are red leaves.
    pub(crate) fn new(value: T, parent: NodeId) -> Self {
        Self {
            value,
            color: Color::Red,
            parent,
            children: [NodeId::NIL; 2],
        }
    }
}

impl<T> Index<Side> for Node<T> {
    type Output = NodeId;

    #[inline]
    fn index(&self, side: Side) -> &Self::Output {
        match side {
            Side::Left => &self.children[0],
            Side::Right => &self.children[1],
        }
    }
}

impl<T> IndexMut<Side> for Node<T> {
    #[inline]
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        match side {
            Side::Left => &mut self.children[0],
            Side::Right => &mut self.children[1],
        }
    }
}
