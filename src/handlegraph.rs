/*!
Traits for immutable access to the nodes and edges of a graph.

The traits are implemented on references to graphs (e.g. `&HashGraph`),
and each one covers one aspect of the graph:

* [`AllHandles`] iterates the nodes of the graph
* [`AllEdges`] iterates the edges of the graph
* [`HandleNeighbors`] finds the neighbors of a handle in a given direction
* [`HandleSequences`] gives access to node sequences

[`HandleGraphRef`] collects them into a single bound.
*/

use crate::handle::{Direction, Edge, Handle, NodeId};

pub mod iter;

pub use self::iter::*;

/// Trait encapsulating the immutable aspects of a handlegraph that
/// don't need to borrow an iterator.
pub trait HandleGraph {
    fn min_node_id(&self) -> NodeId;

    fn max_node_id(&self) -> NodeId;
}

/// Access to all the handles in the graph, in forward orientation.
pub trait AllHandles: Sized {
    type Handles: Iterator<Item = Handle>;

    fn all_handles(self) -> Self::Handles;

    #[inline]
    fn node_count(self) -> usize {
        self.all_handles().count()
    }

    #[inline]
    fn has_node<I: Into<NodeId>>(self, n_id: I) -> bool {
        let n_id = n_id.into();
        self.all_handles().any(|h| h.id() == n_id)
    }
}

/// Access to all the edges in the graph, each edge appearing once in
/// its canonical orientation.
pub trait AllEdges: Sized {
    type Edges: Iterator<Item = Edge>;

    fn all_edges(self) -> Self::Edges;

    #[inline]
    fn edge_count(self) -> usize {
        self.all_edges().count()
    }
}

/// Access to the neighbors of handles in the graph.
///
/// With `Direction::Right`, the iterator yields every `next` such
/// that the edge `handle -> next` exists. With `Direction::Left`, it
/// yields every `prev` such that `prev -> handle` exists, oriented
/// so that `prev` is read before `handle`.
pub trait HandleNeighbors: Sized {
    type Neighbors: Iterator<Item = Handle>;

    fn neighbors(self, handle: Handle, dir: Direction) -> Self::Neighbors;

    #[inline]
    fn degree(self, handle: Handle, dir: Direction) -> usize {
        self.neighbors(handle, dir).count()
    }

    #[inline]
    fn has_edge(self, left: Handle, right: Handle) -> bool {
        self.neighbors(left, Direction::Right).any(|h| h == right)
    }
}

/// Access to the sequences of nodes in the graph.
pub trait HandleSequences: Sized {
    type Sequence: Iterator<Item = u8>;

    /// Iterates the sequence of the node in the handle's local
    /// orientation, i.e. reverse complemented if the handle is
    /// reversed.
    fn sequence_iter(self, handle: Handle) -> Self::Sequence;

    #[inline]
    fn sequence(self, handle: Handle) -> Vec<u8> {
        self.sequence_iter(handle).collect()
    }

    #[inline]
    fn node_len(self, handle: Handle) -> usize {
        self.sequence_iter(handle).count()
    }
}

/// Convenience trait for collecting all the HandleGraph iterator
/// traits in a single bound. The `impl` on `&T`, which has the
/// additional bound that `T: HandleGraph`, makes it possible to use
/// this as the only bound in functions that are generic over
/// `HandleGraph` implementations.
pub trait HandleGraphRef:
    AllEdges + AllHandles + HandleNeighbors + HandleSequences + Copy
{
}

impl<'a, T> HandleGraphRef for &'a T
where
    T: HandleGraph,
    &'a T: AllEdges + AllHandles + HandleNeighbors + HandleSequences + Copy,
{
}
