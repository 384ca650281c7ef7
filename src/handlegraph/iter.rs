//! Iterator adapters used to implement the traits in
//! [`handlegraph`](crate::handlegraph) without boxing closures.

use crate::handle::{Direction, Edge, Handle, NodeId};

use super::{AllHandles, HandleNeighbors};

/// Turns an iterator over borrowed `NodeId`s into forward `Handle`s.
pub struct NodeIdRefHandles<'a, I>
where
    I: Iterator<Item = &'a NodeId> + 'a,
{
    iter: I,
}

impl<'a, I> NodeIdRefHandles<'a, I>
where
    I: Iterator<Item = &'a NodeId> + 'a,
{
    #[inline]
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<'a, I> Iterator for NodeIdRefHandles<'a, I>
where
    I: Iterator<Item = &'a NodeId> + 'a,
{
    type Item = Handle;

    #[inline]
    fn next(&mut self) -> Option<Handle> {
        let id = *self.iter.next()?;
        Some(Handle::pack(id, false))
    }
}

/// Iterates every edge of a graph exactly once, by walking each
/// handle's neighbors and keeping only the edges "owned" by that
/// handle.
///
/// A right edge `h -> next` is owned by `h` when `h` has the smaller
/// (or equal) node ID; a left edge `prev -> h` is owned by `h` when
/// `h` has the strictly smaller node ID, or when it's a reversing
/// self-edge.
pub struct EdgesIter<G>
where
    G: HandleNeighbors + AllHandles + Copy,
{
    graph: G,
    handles: G::Handles,
    buffer: Vec<Edge>,
}

impl<G> EdgesIter<G>
where
    G: HandleNeighbors + AllHandles + Copy,
{
    #[inline]
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            handles: graph.all_handles(),
            buffer: Vec::new(),
        }
    }

    fn fill_buffer(&mut self, handle: Handle) {
        let id = handle.id();

        for next in self.graph.neighbors(handle, Direction::Right) {
            if id <= next.id() {
                self.buffer.push(Edge::edge_handle(handle, next));
            }
        }

        for prev in self.graph.neighbors(handle, Direction::Left) {
            if id < prev.id() || (id == prev.id() && prev.is_reverse()) {
                self.buffer.push(Edge::edge_handle(prev, handle));
            }
        }

        // popped from the back
        self.buffer.reverse();
    }
}

impl<G> Iterator for EdgesIter<G>
where
    G: HandleNeighbors + AllHandles + Copy,
{
    type Item = Edge;

    #[inline]
    fn next(&mut self) -> Option<Edge> {
        loop {
            if let Some(edge) = self.buffer.pop() {
                return Some(edge);
            }
            let handle = self.handles.next()?;
            self.fill_buffer(handle);
        }
    }
}

impl<G> std::iter::FusedIterator for EdgesIter<G>
where
    G: HandleNeighbors + AllHandles + Copy,
    G::Handles: std::iter::FusedIterator,
{
}

/// Iterator adapter over borrowed `Handle`s, optionally flipping
/// each of them; used to orient left neighbors correctly.
pub struct NeighborIter<'a, I>
where
    I: Iterator<Item = &'a Handle>,
{
    flip: bool,
    iter: I,
}

impl<'a, I> NeighborIter<'a, I>
where
    I: Iterator<Item = &'a Handle>,
{
    #[inline]
    pub fn new(iter: I, flip: bool) -> Self {
        Self { flip, iter }
    }
}

impl<'a, I> Iterator for NeighborIter<'a, I>
where
    I: Iterator<Item = &'a Handle>,
{
    type Item = Handle;

    #[inline]
    fn next(&mut self) -> Option<Handle> {
        let next = *self.iter.next()?;
        if self.flip {
            Some(next.flip())
        } else {
            Some(next)
        }
    }
}

/// Iterates a nucleotide sequence either as-is or as its reverse
/// complement.
pub struct SequenceIter<I>
where
    I: Iterator<Item = u8>,
    I: DoubleEndedIterator,
{
    iter: I,
    reversing: bool,
}

impl<I> SequenceIter<I>
where
    I: Iterator<Item = u8>,
    I: DoubleEndedIterator,
{
    #[inline]
    pub fn new(iter: I, reversing: bool) -> Self {
        Self { iter, reversing }
    }
}

impl<I> Iterator for SequenceIter<I>
where
    I: Iterator<Item = u8>,
    I: DoubleEndedIterator,
{
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        if self.reversing {
            self.iter.next_back().map(crate::util::dna::comp_base)
        } else {
            self.iter.next()
        }
    }
}
