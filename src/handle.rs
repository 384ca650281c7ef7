use gfa::gfa::Orientation;
use std::cmp::Ordering;
use std::ops::Add;

/// Newtype that represents a node in the graph, no matter the
/// graph implementation
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    #[inline]
    fn from(num: u64) -> Self {
        NodeId(num)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(num: usize) -> Self {
        NodeId(num as u64)
    }
}

impl From<i32> for NodeId {
    #[inline]
    fn from(num: i32) -> Self {
        NodeId(num as u64)
    }
}

impl From<NodeId> for u64 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl Add<u64> for NodeId {
    type Output = Self;

    #[inline]
    fn add(self, other: u64) -> Self {
        NodeId(self.0 + other)
    }
}

/// A Handle is a node ID with an orientation, packed as a single u64
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Hash, Eq, Ord)]
#[repr(transparent)]
pub struct Handle(pub u64);

/// Returns the forward-oriented `Handle` for a `NodeId`
impl From<NodeId> for Handle {
    #[inline]
    fn from(id: NodeId) -> Handle {
        Handle(id.0 << 1)
    }
}

/// Unpacks the `NodeId` from a `Handle`
impl From<Handle> for NodeId {
    #[inline]
    fn from(h: Handle) -> NodeId {
        h.id()
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let orient = if self.is_reverse() { '-' } else { '+' };
        write!(f, "{}{}", self.id(), orient)
    }
}

impl Handle {
    #[inline]
    pub fn as_integer(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn from_integer(i: u64) -> Self {
        Handle(i)
    }

    #[inline]
    pub fn unpack_number(self) -> u64 {
        self.as_integer() >> 1
    }

    #[inline]
    pub fn unpack_bit(self) -> bool {
        self.as_integer() & 1 != 0
    }

    #[inline]
    pub fn new<T: Into<NodeId>>(id: T, orient: Orientation) -> Handle {
        Handle::pack(id, orient != Orientation::Forward)
    }

    #[inline]
    pub fn pack<T: Into<NodeId>>(id: T, is_reverse: bool) -> Handle {
        let id: NodeId = id.into();
        let uint: u64 = id.into();
        if uint < (0x1 << 63) {
            Handle::from_integer((uint << 1) | is_reverse as u64)
        } else {
            panic!(
                "Tried to create a handle with a node ID that filled 64 bits"
            )
        }
    }

    #[inline]
    pub fn id(self) -> NodeId {
        NodeId(self.unpack_number())
    }

    #[inline]
    pub fn is_reverse(&self) -> bool {
        self.unpack_bit()
    }

    #[inline]
    pub fn flip(self) -> Self {
        Handle(self.as_integer() ^ 1)
    }

    #[inline]
    pub fn forward(self) -> Self {
        if self.is_reverse() {
            self.flip()
        } else {
            self
        }
    }

    /// The node side a traversal of this handle enters through.
    #[inline]
    pub fn left_side(self) -> NodeSide {
        NodeSide {
            id: self.id(),
            is_end: self.is_reverse(),
        }
    }

    /// The node side a traversal of this handle leaves through.
    #[inline]
    pub fn right_side(self) -> NodeSide {
        NodeSide {
            id: self.id(),
            is_end: !self.is_reverse(),
        }
    }
}

/// One of the two ends of a node; `is_end` is the right end of the
/// node in its forward orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeSide {
    pub id: NodeId,
    pub is_end: bool,
}

impl NodeSide {
    #[inline]
    pub fn start(id: NodeId) -> Self {
        NodeSide { id, is_end: false }
    }

    #[inline]
    pub fn end(id: NodeId) -> Self {
        NodeSide { id, is_end: true }
    }

    /// The handle that reads into the node through this side.
    #[inline]
    pub fn entering(self) -> Handle {
        Handle::pack(self.id, self.is_end)
    }

    /// The handle that reads out of the node through this side.
    #[inline]
    pub fn leaving(self) -> Handle {
        Handle::pack(self.id, !self.is_end)
    }
}

/// An edge between two handles, read as "leave `.0` through its
/// right side, then enter `.1` through its left side".
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Hash, Eq, Ord)]
pub struct Edge(pub Handle, pub Handle);

impl Edge {
    /// Construct an edge, taking the orientation of the handles into account
    #[inline]
    pub fn edge_handle(left: Handle, right: Handle) -> Edge {
        let flipped_right = right.flip();
        let flipped_left = left.flip();

        match left.cmp(&flipped_right) {
            Ordering::Greater => Edge(flipped_right, flipped_left),
            Ordering::Equal => {
                if right > flipped_left {
                    Edge(flipped_right, flipped_left)
                } else {
                    Edge(left, right)
                }
            }
            Ordering::Less => Edge(left, right),
        }
    }

    /// The same adjacency, read in the opposite direction.
    #[inline]
    pub fn reverse(self) -> Edge {
        Edge(self.1.flip(), self.0.flip())
    }

    /// The canonical form of this edge, as produced by `edge_handle`.
    #[inline]
    pub fn canonical(self) -> Edge {
        Edge::edge_handle(self.0, self.1)
    }
}

/// Enum for handle orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Direction {
    Left,
    Right,
}
