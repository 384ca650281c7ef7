/*!
A simple `HashMap`-based graph that implements the graph and path
traits used by the snarl algorithms.
*/

use crate::{
    handle::{Direction, Edge, Handle, NodeId},
    handlegraph::*,
    mutablehandlegraph::*,
    pathhandlegraph::*,
};

use std::collections::hash_map;

pub mod graph;
pub mod node;
pub mod path;

pub use self::graph::HashGraph;
pub use self::node::{Node, OccurIter};
pub use self::path::Path;

use log::warn;

impl HandleGraph for HashGraph {
    #[inline]
    fn min_node_id(&self) -> NodeId {
        self.min_id
    }

    #[inline]
    fn max_node_id(&self) -> NodeId {
        self.max_id
    }
}

impl<'a> AllHandles for &'a HashGraph {
    type Handles = NodeIdRefHandles<'a, hash_map::Keys<'a, NodeId, Node>>;

    #[inline]
    fn all_handles(self) -> Self::Handles {
        NodeIdRefHandles::new(self.graph.keys())
    }

    #[inline]
    fn node_count(self) -> usize {
        self.graph.len()
    }

    #[inline]
    fn has_node<I: Into<NodeId>>(self, n_id: I) -> bool {
        self.graph.contains_key(&n_id.into())
    }
}

impl<'a> AllEdges for &'a HashGraph {
    type Edges = EdgesIter<&'a HashGraph>;

    #[inline]
    fn all_edges(self) -> Self::Edges {
        EdgesIter::new(self)
    }
}

impl<'a> HandleNeighbors for &'a HashGraph {
    type Neighbors = NeighborIter<'a, std::slice::Iter<'a, Handle>>;

    #[inline]
    fn neighbors(self, handle: Handle, dir: Direction) -> Self::Neighbors {
        let node = self.get_node_unchecked(&handle.id());

        let handles = if handle.is_reverse() != (dir == Direction::Left) {
            &node.left_edges
        } else {
            &node.right_edges
        };

        NeighborIter::new(handles.iter(), dir == Direction::Left)
    }
}

impl<'a> HandleSequences for &'a HashGraph {
    type Sequence = SequenceIter<std::iter::Copied<std::slice::Iter<'a, u8>>>;

    #[inline]
    fn sequence_iter(self, handle: Handle) -> Self::Sequence {
        let seq = &self.get_node_unchecked(&handle.id()).sequence;
        SequenceIter::new(seq.iter().copied(), handle.is_reverse())
    }

    #[inline]
    fn node_len(self, handle: Handle) -> usize {
        self.get_node_unchecked(&handle.id()).sequence.len()
    }
}

impl AdditiveHandleGraph for HashGraph {
    fn append_handle(&mut self, sequence: &[u8]) -> Handle {
        let id = if self.graph.is_empty() {
            NodeId::from(1u64)
        } else {
            self.max_id + 1
        };
        self.create_handle(sequence, id)
    }

    fn create_handle<T: Into<NodeId>>(
        &mut self,
        sequence: &[u8],
        node_id: T,
    ) -> Handle {
        let id: NodeId = node_id.into();
        self.graph.insert(id, Node::new(sequence));
        self.max_id = std::cmp::max(self.max_id, id);
        self.min_id = std::cmp::min(self.min_id, id);
        Handle::pack(id, false)
    }

    /// Edges touching a missing node are ignored with a warning.
    /// Adding an edge that already exists does nothing.
    fn create_edge(&mut self, Edge(left, right): Edge) {
        if !self.graph.contains_key(&left.id())
            || !self.graph.contains_key(&right.id())
        {
            warn!("ignoring edge {} -> {} to a missing node", left, right);
            return;
        }

        if let Some(left_node) = self.graph.get_mut(&left.id()) {
            let left_list = if left.is_reverse() {
                &mut left_node.left_edges
            } else {
                &mut left_node.right_edges
            };
            if left_list.contains(&right) {
                return;
            }
            left_list.push(right);
        }

        // a reversing self-edge occupies a single side once
        if left == right.flip() {
            return;
        }

        if let Some(right_node) = self.graph.get_mut(&right.id()) {
            if right.is_reverse() {
                right_node.right_edges.push(left.flip());
            } else {
                right_node.left_edges.push(left.flip());
            }
        }
    }
}

impl<'a> GraphPaths for &'a HashGraph {
    type StepIx = usize;

    #[inline]
    fn path_count(self) -> usize {
        self.paths.len()
    }

    #[inline]
    fn path_len(self, id: PathId) -> Option<usize> {
        self.paths.get(&id).map(|p| p.len())
    }

    #[inline]
    fn path_circular(self, id: PathId) -> Option<bool> {
        self.paths.get(&id).map(|p| p.is_circular)
    }
}

impl<'a> GraphPathNames for &'a HashGraph {
    type PathName = std::iter::Copied<std::slice::Iter<'a, u8>>;

    #[inline]
    fn get_path_id(self, name: &[u8]) -> Option<PathId> {
        self.path_id.get(name).copied()
    }

    #[inline]
    fn get_path_name(self, id: PathId) -> Option<Self::PathName> {
        let path = self.paths.get(&id)?;
        Some(path.name.iter().copied())
    }
}

impl<'a> IntoPathIds for &'a HashGraph {
    type PathIds = std::iter::Copied<hash_map::Keys<'a, PathId, Path>>;

    #[inline]
    fn path_ids(self) -> Self::PathIds {
        self.paths.keys().copied()
    }
}

impl<'a> GraphPathsSteps for &'a HashGraph {
    type Steps =
        std::iter::Enumerate<std::iter::Copied<std::slice::Iter<'a, Handle>>>;

    #[inline]
    fn path_steps(self, id: PathId) -> Option<Self::Steps> {
        let path = self.paths.get(&id)?;
        Some(path.nodes.iter().copied().enumerate())
    }

    #[inline]
    fn path_handle_at_step(self, id: PathId, step: usize) -> Option<Handle> {
        self.paths.get(&id)?.handle_at(step)
    }

    #[inline]
    fn path_first_step(self, id: PathId) -> Option<usize> {
        let path = self.paths.get(&id)?;
        if path.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    #[inline]
    fn path_last_step(self, id: PathId) -> Option<usize> {
        let path = self.paths.get(&id)?;
        path.len().checked_sub(1)
    }

    #[inline]
    fn path_next_step(self, id: PathId, step: usize) -> Option<usize> {
        let path = self.paths.get(&id)?;
        if step + 1 < path.len() {
            Some(step + 1)
        } else if path.is_circular && !path.is_empty() {
            Some(0)
        } else {
            None
        }
    }

    #[inline]
    fn path_prev_step(self, id: PathId, step: usize) -> Option<usize> {
        let path = self.paths.get(&id)?;
        if step > 0 && step <= path.len() {
            Some(step - 1)
        } else if step == 0 && path.is_circular {
            path.len().checked_sub(1)
        } else {
            None
        }
    }
}

impl<'a> IntoNodeOccurrences for &'a HashGraph {
    type Occurrences = OccurIter<'a>;

    #[inline]
    fn steps_on_handle(self, handle: Handle) -> Option<Self::Occurrences> {
        let node = self.graph.get(&handle.id())?;
        Some(OccurIter {
            iter: node.occurrences.iter(),
        })
    }
}

impl MutableGraphPaths for HashGraph {
    type StepIx = usize;

    fn create_path(&mut self, name: &[u8], circular: bool) -> Option<PathId> {
        if self.path_id.contains_key(name) {
            return None;
        }
        let path_id = PathId(self.paths.len() as u64);
        self.path_id.insert(name.to_vec(), path_id);
        self.paths
            .insert(path_id, Path::new(name.to_vec(), path_id, circular));
        Some(path_id)
    }

    fn path_append_step(&mut self, id: PathId, handle: Handle) -> Option<usize> {
        let node = self.graph.get_mut(&handle.id())?;
        let path = self.paths.get_mut(&id)?;
        let step = path.nodes.len();
        path.nodes.push(handle);
        node.occurrences.push((id, step));
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hnd(x: u64) -> Handle {
        Handle::pack(x, false)
    }

    fn diamond() -> HashGraph {
        let mut graph = HashGraph::new();
        let a = graph.append_handle(b"GAT");
        let b = graph.append_handle(b"TA");
        let c = graph.append_handle(b"C");
        let d = graph.append_handle(b"AGG");
        graph.create_edge(Edge(a, b));
        graph.create_edge(Edge(a, c));
        graph.create_edge(Edge(b, d));
        graph.create_edge(Edge(c, d));
        graph
    }

    #[test]
    fn neighbors_follow_orientation() {
        let graph = diamond();

        let mut right: Vec<_> =
            graph.neighbors(hnd(1), Direction::Right).collect();
        right.sort();
        assert_eq!(right, vec![hnd(2), hnd(3)]);

        let mut left: Vec<_> =
            graph.neighbors(hnd(4), Direction::Left).collect();
        left.sort();
        assert_eq!(left, vec![hnd(2), hnd(3)]);

        let rev_right: Vec<_> =
            graph.neighbors(hnd(4).flip(), Direction::Right).collect();
        assert_eq!(rev_right.len(), 2);
        assert!(rev_right.contains(&hnd(2).flip()));

        assert!(graph.has_edge(hnd(1), hnd(2)));
        assert!(graph.has_edge(hnd(2).flip(), hnd(1).flip()));
        assert!(!graph.has_edge(hnd(2), hnd(1)));
    }

    #[test]
    fn edges_are_listed_once() {
        let mut graph = diamond();
        // duplicate and reversed duplicate are both ignored
        graph.create_edge(Edge(hnd(1), hnd(2)));
        graph.create_edge(Edge(hnd(2).flip(), hnd(1).flip()));
        // reversing self-edge
        graph.create_edge(Edge(hnd(3), hnd(3).flip()));

        let mut edges: Vec<_> = graph.all_edges().collect();
        edges.sort();
        assert_eq!(edges.len(), 5);
        assert!(edges.contains(&Edge::edge_handle(hnd(3), hnd(3).flip())));
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn missing_nodes_are_not_linked() {
        let mut graph = diamond();
        graph.create_edge(Edge(hnd(4), hnd(9)));
        assert_eq!(graph.degree(hnd(4), Direction::Right), 0);
    }

    #[test]
    fn reverse_sequence_is_complemented() {
        let graph = diamond();
        assert_eq!(graph.sequence(hnd(1)), b"GAT".to_vec());
        assert_eq!(graph.sequence(hnd(1).flip()), b"ATC".to_vec());
        assert_eq!(graph.node_len(hnd(4).flip()), 3);
    }

    #[test]
    fn paths_record_occurrences() {
        let mut graph = diamond();
        let path = graph.create_path(b"ref", false).unwrap();
        assert!(graph.create_path(b"ref", false).is_none());

        for h in &[hnd(1), hnd(2), hnd(4)] {
            graph.path_append_step(path, *h);
        }

        assert_eq!(graph.get_path_id(b"ref"), Some(path));
        assert_eq!(graph.path_len(path), Some(3));
        assert_eq!(graph.path_first_step(path), Some(0));
        assert_eq!(graph.path_last_step(path), Some(2));
        assert_eq!(graph.path_next_step(path, 2), None);
        assert_eq!(graph.path_prev_step(path, 1), Some(0));
        assert_eq!(graph.path_handle_at_step(path, 1), Some(hnd(2)));

        let occurs: Vec<_> = graph.steps_on_handle(hnd(4)).unwrap().collect();
        assert_eq!(occurs, vec![(path, 2)]);
        assert_eq!(graph.steps_on_handle(hnd(3)).unwrap().count(), 0);
    }
}
