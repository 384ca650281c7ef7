use std::collections::VecDeque;

use fnv::{FnvHashMap, FnvHashSet};

use crate::{
    handle::{Direction, Handle, NodeId},
    handlegraph::HandleNeighbors,
};

use super::{ChainId, SnarlManager};

/// The interior of a snarl, with each child chain collapsed into a
/// single node.
///
/// A child chain is represented by the ID of its first snarl's start
/// node; the forward handle enters the chain at its start, the
/// reverse handle enters it at its end. Ordinary nodes keep their
/// own handles.
///
/// With internal connectivity, the ways out of a chain depend on the
/// connectivity of its snarls; without it, a chain is an opaque node
/// that can only be passed through, and a unary child is a dead end.
pub struct NetGraph<'a, G> {
    graph: G,
    manager: &'a SnarlManager,
    start: Handle,
    end: Handle,
    use_internal_connectivity: bool,
    chain_starts: FnvHashMap<Handle, ChainId>,
    chain_ends: FnvHashMap<Handle, ChainId>,
    chain_nodes: FnvHashMap<NodeId, ChainId>,
}

impl<'a, G: HandleNeighbors + Copy> NetGraph<'a, G> {
    pub fn new(
        graph: G,
        manager: &'a SnarlManager,
        start: Handle,
        end: Handle,
        child_chains: &[ChainId],
        use_internal_connectivity: bool,
    ) -> Self {
        let mut chain_starts = FnvHashMap::default();
        let mut chain_ends = FnvHashMap::default();
        let mut chain_nodes = FnvHashMap::default();

        for &chain in child_chains {
            let (first, last) = match (
                manager.chain_start(chain),
                manager.chain_end(chain),
            ) {
                (Some(first), Some(last)) => (first, last),
                _ => continue,
            };
            chain_starts.insert(first, chain);
            chain_nodes.insert(first.id(), chain);
            if first.id() != last.id() {
                chain_ends.insert(last.flip(), chain);
            }
        }

        NetGraph {
            graph,
            manager,
            start,
            end,
            use_internal_connectivity,
            chain_starts,
            chain_ends,
            chain_nodes,
        }
    }

    #[inline]
    pub fn start(&self) -> Handle {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Handle {
        self.end
    }

    /// Whether the net handle stands for a child chain.
    #[inline]
    pub fn is_child(&self, handle: Handle) -> bool {
        self.chain_nodes.contains_key(&handle.id())
    }

    /// Translate a graph handle that's been stepped onto into the
    /// net graph handle it's part of.
    fn to_net(&self, handle: Handle) -> Handle {
        if let Some(chain) = self.chain_starts.get(&handle) {
            self.chain_handle(*chain, false)
        } else if let Some(chain) = self.chain_ends.get(&handle) {
            self.chain_handle(*chain, true)
        } else {
            handle
        }
    }

    fn chain_handle(&self, chain: ChainId, reverse: bool) -> Handle {
        let id = self
            .manager
            .chain_start(chain)
            .map(|h| h.id())
            .unwrap_or_default();
        Handle::pack(id, reverse)
    }

    /// The graph handles that a walk leaves through after entering
    /// the net handle.
    fn exits(&self, handle: Handle) -> Vec<Handle> {
        if handle == self.end || handle == self.start.flip() {
            return Vec::new();
        }

        let chain = match self.chain_nodes.get(&handle.id()) {
            Some(&chain) => chain,
            None => return vec![handle],
        };

        let snarls: Vec<_> = self
            .manager
            .chain(chain)
            .iter()
            .filter_map(|&id| self.manager.get(id))
            .collect();

        let (first, last) = match (snarls.first(), snarls.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Vec::new(),
        };

        if first.bounds().is_unary() {
            if handle.is_reverse() {
                return Vec::new();
            }
            if self.use_internal_connectivity && first.start_self_reachable()
            {
                return vec![first.start.flip()];
            }
            return Vec::new();
        }

        let through = snarls.iter().all(|s| s.start_end_reachable());
        let mut exits = Vec::new();

        if !handle.is_reverse() {
            if !self.use_internal_connectivity || through {
                exits.push(last.end);
            }
            if self.use_internal_connectivity {
                // turn around at the first snarl that allows it, if
                // the snarls before it can be passed
                let turns = snarls
                    .iter()
                    .position(|s| s.start_self_reachable())
                    .map(|ix| snarls[..ix].iter().all(|s| s.start_end_reachable()))
                    .unwrap_or(false);
                if turns {
                    exits.push(first.start.flip());
                }
            }
        } else {
            if !self.use_internal_connectivity || through {
                exits.push(first.start.flip());
            }
            if self.use_internal_connectivity {
                let turns = snarls
                    .iter()
                    .rev()
                    .position(|s| s.end_self_reachable())
                    .map(|ix| {
                        snarls[snarls.len() - ix..]
                            .iter()
                            .all(|s| s.start_end_reachable())
                    })
                    .unwrap_or(false);
                if turns {
                    exits.push(last.end);
                }
            }
        }

        exits
    }

    /// The net handles reachable in one step from `handle`, reading
    /// to the right, or to the left if `go_left` is set.
    pub fn follow_edges(&self, handle: Handle, go_left: bool) -> Vec<Handle> {
        if go_left {
            return self
                .follow_edges(handle.flip(), false)
                .into_iter()
                .map(Handle::flip)
                .collect();
        }

        let mut next = Vec::new();
        for exit in self.exits(handle) {
            for neighbor in self.graph.neighbors(exit, Direction::Right) {
                let net = self.to_net(neighbor);
                if !next.contains(&net) {
                    next.push(net);
                }
            }
        }
        next
    }

    /// Breadth-first search to the right from `from`, returning
    /// whether each of `targets` was reached.
    fn reaches(&self, from: Handle, targets: &[Handle]) -> Vec<bool> {
        let mut found = vec![false; targets.len()];
        let mut queued: FnvHashSet<Handle> = FnvHashSet::default();
        let mut queue: VecDeque<Handle> = VecDeque::new();
        queue.push_back(from);
        queued.insert(from);

        while let Some(here) = queue.pop_front() {
            for (ix, target) in targets.iter().enumerate() {
                if here == *target {
                    found[ix] = true;
                }
            }
            if found.iter().all(|&f| f) {
                break;
            }
            for next in self.follow_edges(here, false) {
                if queued.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        found
    }

    /// Returns `(start_end_reachable, start_self_reachable,
    /// end_self_reachable)`.
    pub fn reachability(&self) -> (bool, bool, bool) {
        let from_start = self.reaches(self.start, &[self.end, self.start.flip()]);
        let from_end = self.reaches(self.end.flip(), &[self.end]);
        (from_start[0], from_start[1], from_end[0])
    }

    /// All net handles in the part of the net graph that's
    /// connected to the boundaries, in both orientations.
    fn connected_handles(&self) -> Vec<Handle> {
        let mut seen: FnvHashSet<Handle> = FnvHashSet::default();
        let mut queue: VecDeque<Handle> = VecDeque::new();

        for &h in [self.start, self.end.flip()].iter() {
            for h in [h, h.flip()].iter() {
                if seen.insert(*h) {
                    queue.push_back(*h);
                }
            }
        }

        while let Some(here) = queue.pop_front() {
            for next in self.follow_edges(here, false) {
                for h in [next, next.flip()].iter() {
                    if seen.insert(*h) {
                        queue.push_back(*h);
                    }
                }
            }
        }

        let mut handles: Vec<Handle> = seen.into_iter().collect();
        handles.sort();
        handles
    }

    /// Whether the net graph has no directed cycle, checked with an
    /// iterative three-colour depth-first search.
    pub fn is_directed_acyclic(&self) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Colour {
            Grey,
            Black,
        }

        let mut colour: FnvHashMap<Handle, Colour> = FnvHashMap::default();

        for root in self.connected_handles() {
            if colour.contains_key(&root) {
                continue;
            }

            colour.insert(root, Colour::Grey);
            let mut stack: Vec<(Handle, Vec<Handle>)> =
                vec![(root, self.follow_edges(root, false))];

            while let Some((here, mut pending)) = stack.pop() {
                match pending.pop() {
                    None => {
                        colour.insert(here, Colour::Black);
                    }
                    Some(next) => {
                        stack.push((here, pending));
                        match colour.get(&next) {
                            Some(Colour::Grey) => return false,
                            Some(Colour::Black) => {}
                            None => {
                                colour.insert(next, Colour::Grey);
                                let successors = self.follow_edges(next, false);
                                stack.push((next, successors));
                            }
                        }
                    }
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::handle::Edge;
    use crate::hashgraph::HashGraph;
    use crate::mutablehandlegraph::AdditiveHandleGraph;
    use crate::snarls::{Connectivity, Snarl, SnarlBounds};
    use crate::util::test::*;

    fn child(manager: &mut SnarlManager, start: Handle, end: Handle, conn: Connectivity) -> ChainId {
        let id = manager.add_snarl(Snarl::new(SnarlBounds::new(start, end), conn, true), vec![]);
        manager.add_chain(vec![id])
    }

    fn through() -> Connectivity {
        Connectivity {
            start_end_reachable: true,
            directed_acyclic_net_graph: true,
            ..Connectivity::default()
        }
    }

    #[test]
    fn plain_diamond() {
        let graph = diamond();
        let manager = SnarlManager::new();
        let net = NetGraph::new(&graph, &manager, hnd(1), hnd(4), &[], true);

        let mut next = net.follow_edges(hnd(1), false);
        next.sort();
        assert_eq!(next, vec![hnd(2), hnd(3)]);
        assert_eq!(net.follow_edges(hnd(4), true).len(), 2);
        assert!(net.follow_edges(hnd(4), false).is_empty());

        assert_eq!(net.reachability(), (true, false, false));
        assert!(net.is_directed_acyclic());
    }

    #[test]
    fn child_chain_is_one_node() {
        let graph = nested_graph();
        let mut manager = SnarlManager::new();
        let chain = child(&mut manager, hnd(2), hnd(5), through());

        let net = NetGraph::new(&graph, &manager, hnd(1), hnd(6), &[chain], true);
        assert_eq!(net.follow_edges(hnd(1), false), vec![hnd(2)]);
        assert!(net.is_child(hnd(2)));
        assert_eq!(net.follow_edges(hnd(2), false), vec![hnd(6)]);
        assert_eq!(net.follow_edges(hnd(6), true), vec![hnd(2)]);
        assert_eq!(net.reachability(), (true, false, false));
    }

    #[test]
    fn child_connectivity_gates_exits() {
        let graph = nested_graph();
        let mut manager = SnarlManager::new();
        let blocked = Connectivity {
            start_self_reachable: true,
            ..Connectivity::default()
        };
        let chain = child(&mut manager, hnd(2), hnd(5), blocked);

        let net = NetGraph::new(&graph, &manager, hnd(1), hnd(6), &[chain], true);
        // entering the child can only turn back out of its start
        assert_eq!(net.follow_edges(hnd(2), false), vec![hnd(1).flip()]);
        assert_eq!(net.reachability(), (false, true, false));

        // the flat view ignores the child's connectivity
        let flat = NetGraph::new(&graph, &manager, hnd(1), hnd(6), &[chain], false);
        assert_eq!(flat.follow_edges(hnd(2), false), vec![hnd(6)]);
        assert!(flat.is_directed_acyclic());
    }

    #[test]
    fn end_self_reachable_loop() {
        let graph = end_loop_graph();
        let manager = SnarlManager::new();
        let net = NetGraph::new(&graph, &manager, hnd(1), hnd(4), &[], true);
        let (start_end, start_self, end_self) = net.reachability();
        assert!(start_end);
        assert!(!start_self);
        assert!(end_self);
    }

    #[test]
    fn cycle_is_detected() {
        let mut graph: HashGraph = diamond();
        graph.create_edge(Edge(hnd(2), hnd(2)));
        let manager = SnarlManager::new();
        let net = NetGraph::new(&graph, &manager, hnd(1), hnd(4), &[], false);
        assert!(!net.is_directed_acyclic());
    }
}
