use std::collections::BTreeSet;

use fnv::{FnvHashMap, FnvHashSet};

use crate::{
    error::{Result, SnarlError},
    handle::{Direction, Edge, Handle, NodeId},
    handlegraph::HandleNeighbors,
};

use super::{ChainId, Snarl, SnarlBounds, SnarlId, Visit};

/// Owner of a snarl tree.
///
/// Snarls are stored in an arena and refer to each other by
/// [`SnarlId`]; chains are lists of snarl IDs. The manager is built
/// bottom-up by the snarl finder, children before parents, and is
/// read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct SnarlManager {
    snarls: Vec<Snarl>,
    children: Vec<Vec<SnarlId>>,
    child_chains: Vec<Vec<ChainId>>,
    chain_of: Vec<Option<ChainId>>,
    chains: Vec<Vec<SnarlId>>,
    top_level_chains: Vec<ChainId>,
    by_bounds: FnvHashMap<SnarlBounds, SnarlId>,
    // handles that read into a snarl, and whether they enter it
    // through its end
    into: FnvHashMap<Handle, (SnarlId, bool)>,
}

impl SnarlManager {
    pub fn new() -> Self {
        Default::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.snarls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snarls.is_empty()
    }

    #[inline]
    pub fn get(&self, id: SnarlId) -> Option<&Snarl> {
        self.snarls.get(id.0)
    }

    #[inline]
    pub fn snarl(&self, id: SnarlId) -> Result<&Snarl> {
        self.get(id).ok_or(SnarlError::UnknownSnarl(id))
    }

    pub fn snarl_ids(&self) -> impl Iterator<Item = SnarlId> {
        (0..self.snarls.len()).map(SnarlId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SnarlId, &Snarl)> + '_ {
        self.snarls.iter().enumerate().map(|(ix, s)| (SnarlId(ix), s))
    }

    #[inline]
    pub fn parent_of(&self, id: SnarlId) -> Option<SnarlId> {
        self.get(id).and_then(|s| s.parent)
    }

    #[inline]
    pub fn is_top_level(&self, id: SnarlId) -> bool {
        self.parent_of(id).is_none()
    }

    pub fn children_of(&self, id: SnarlId) -> &[SnarlId] {
        self.children.get(id.0).map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn child_chains(&self, id: SnarlId) -> &[ChainId] {
        self.child_chains
            .get(id.0)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    #[inline]
    pub fn chain_of(&self, id: SnarlId) -> Option<ChainId> {
        self.chain_of.get(id.0).copied().flatten()
    }

    pub fn chain(&self, chain: ChainId) -> &[SnarlId] {
        self.chains.get(chain.0).map(|c| c.as_slice()).unwrap_or(&[])
    }

    #[inline]
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn top_level_chains(&self) -> &[ChainId] {
        &self.top_level_chains
    }

    pub fn top_level_snarls(&self) -> Vec<SnarlId> {
        self.top_level_chains
            .iter()
            .flat_map(|&c| self.chain(c).iter().copied())
            .collect()
    }

    /// The handle that enters the chain at its first snarl.
    pub fn chain_start(&self, chain: ChainId) -> Option<Handle> {
        let first = self.chain(chain).first()?;
        Some(self.snarls[first.0].start)
    }

    /// The handle that leaves the chain at its last snarl.
    pub fn chain_end(&self, chain: ChainId) -> Option<Handle> {
        let last = self.chain(chain).last()?;
        Some(self.snarls[last.0].end)
    }

    /// Find the snarl with exactly the given boundaries.
    #[inline]
    pub fn manage(&self, bounds: SnarlBounds) -> Option<SnarlId> {
        self.by_bounds.get(&bounds).copied()
    }

    /// If reading `handle` enters a snarl through one of its
    /// boundaries, return that snarl, and whether it's entered
    /// through its end.
    #[inline]
    pub fn into_which_snarl(&self, handle: Handle) -> Option<(SnarlId, bool)> {
        self.into.get(&handle).copied()
    }

    /// If reading `handle` from inside `in_snarl` (or from the top
    /// level, if `None`) enters one of its child snarls, return the
    /// visit to that child.
    pub fn child_visit_at(
        &self,
        handle: Handle,
        in_snarl: Option<SnarlId>,
    ) -> Option<Visit> {
        let (child, backward) = self.into_which_snarl(handle)?;
        let record = self.get(child)?;
        if Some(child) == in_snarl || record.parent != in_snarl {
            return None;
        }
        if let Some((other, _)) = self.into_which_snarl(handle.flip()) {
            if Some(other) == in_snarl {
                return None;
            }
        }
        Some(Visit::snarl(record.bounds(), backward))
    }

    /// The visits that can follow `visit` inside `in_snarl`. Child
    /// snarls are stepped over as single visits.
    pub fn visits_right<G: HandleNeighbors>(
        &self,
        graph: G,
        visit: Visit,
        in_snarl: Option<SnarlId>,
    ) -> Vec<Visit> {
        let exit = visit.exit_handle();

        if !visit.is_node() {
            // back-to-back children share a boundary node
            if let Some(next_child) = self.child_visit_at(exit, in_snarl) {
                return vec![next_child];
            }
        }

        graph
            .neighbors(exit, Direction::Right)
            .map(|next| {
                self.child_visit_at(next, in_snarl)
                    .unwrap_or(Visit::Node(next))
            })
            .collect()
    }

    /// The visits that can precede `visit` inside `in_snarl`, each
    /// oriented so that it's read before `visit`.
    pub fn visits_left<G: HandleNeighbors>(
        &self,
        graph: G,
        visit: Visit,
        in_snarl: Option<SnarlId>,
    ) -> Vec<Visit> {
        self.visits_right(graph, visit.reverse(), in_snarl)
            .into_iter()
            .map(|v| v.reverse())
            .collect()
    }

    /// The nodes and edges that belong to the snarl itself, and not
    /// to any of its children. Edges are returned in canonical form.
    ///
    /// With `include_boundaries`, the node set also contains the
    /// snarl's own boundaries and the boundaries of its children.
    pub fn shallow_contents<G: HandleNeighbors + Copy>(
        &self,
        graph: G,
        id: SnarlId,
        include_boundaries: bool,
    ) -> Result<(BTreeSet<NodeId>, BTreeSet<Edge>)> {
        let snarl = self.snarl(id)?;
        let (start, end) = (snarl.start, snarl.end);

        let mut nodes: BTreeSet<NodeId> = BTreeSet::new();
        let mut edges: BTreeSet<Edge> = BTreeSet::new();

        if include_boundaries {
            nodes.insert(start.id());
            nodes.insert(end.id());
        }

        let child_bounds: FnvHashSet<NodeId> = self
            .children_of(id)
            .iter()
            .flat_map(|c| {
                let s = &self.snarls[c.0];
                vec![s.start.id(), s.end.id()]
            })
            .collect();

        let mut seen: FnvHashSet<Handle> = FnvHashSet::default();
        let mut stack: Vec<Handle> = vec![start, end.flip()];
        seen.insert(start);
        seen.insert(end.flip());

        while let Some(handle) = stack.pop() {
            for next in graph.neighbors(handle, Direction::Right) {
                edges.insert(Edge::edge_handle(handle, next));

                let mut current = next;
                loop {
                    if current.id() == start.id() || current.id() == end.id() {
                        break;
                    }

                    if let Some(child) = self.child_visit_at(current, Some(id))
                    {
                        if let Some(bounds) = child.bounds() {
                            if include_boundaries {
                                nodes.insert(bounds.start.id());
                                nodes.insert(bounds.end.id());
                            }
                        }
                        let exit = child.exit_handle();
                        if self.child_visit_at(exit, Some(id)).is_some() {
                            current = exit;
                            continue;
                        }
                        if seen.insert(exit) {
                            stack.push(exit);
                        }
                        break;
                    }

                    if child_bounds.contains(&current.id()) {
                        break;
                    }

                    nodes.insert(current.id());
                    for h in [current, current.flip()].iter() {
                        if seen.insert(*h) {
                            stack.push(*h);
                        }
                    }
                    break;
                }
            }
        }

        Ok((nodes, edges))
    }

    /// All snarl IDs, each parent before its children, in chain
    /// order.
    pub fn preorder(&self) -> Vec<SnarlId> {
        let mut order = Vec::with_capacity(self.snarls.len());
        let mut stack: Vec<SnarlId> = self.top_level_snarls();
        stack.reverse();

        while let Some(id) = stack.pop() {
            order.push(id);
            let mut children: Vec<SnarlId> = self
                .child_chains(id)
                .iter()
                .flat_map(|&c| self.chain(c).iter().copied())
                .collect();
            children.reverse();
            stack.extend(children);
        }
        order
    }

    /// All snarl IDs, each child before its parent.
    pub fn postorder(&self) -> Vec<SnarlId> {
        let mut order = Vec::with_capacity(self.snarls.len());
        let mut stack: Vec<(SnarlId, bool)> = self
            .top_level_snarls()
            .into_iter()
            .rev()
            .map(|id| (id, false))
            .collect();

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            stack.push((id, true));
            let children: Vec<SnarlId> = self
                .child_chains(id)
                .iter()
                .flat_map(|&c| self.chain(c).iter().copied())
                .collect();
            stack.extend(children.into_iter().rev().map(|c| (c, false)));
        }
        order
    }

    /// Add a finished snarl, taking ownership of its child chains.
    /// The snarl's children must already be in the manager.
    pub(crate) fn add_snarl(
        &mut self,
        mut snarl: Snarl,
        child_chains: Vec<ChainId>,
    ) -> SnarlId {
        let id = SnarlId(self.snarls.len());
        snarl.parent = None;

        let mut children = Vec::new();
        for &chain in child_chains.iter() {
            for &child in self.chains[chain.0].iter() {
                self.snarls[child.0].parent = Some(id);
                children.push(child);
            }
        }

        self.by_bounds.insert(snarl.bounds(), id);
        self.into.entry(snarl.start).or_insert((id, false));
        if !snarl.bounds().is_unary() {
            self.into.entry(snarl.end.flip()).or_insert((id, true));
        }

        self.snarls.push(snarl);
        self.children.push(children);
        self.child_chains.push(child_chains);
        self.chain_of.push(None);
        id
    }

    pub(crate) fn add_chain(&mut self, snarls: Vec<SnarlId>) -> ChainId {
        let chain = ChainId(self.chains.len());
        for &id in snarls.iter() {
            self.chain_of[id.0] = Some(chain);
        }
        self.chains.push(snarls);
        chain
    }

    pub(crate) fn add_top_level(&mut self, chain: ChainId) {
        self.top_level_chains.push(chain);
    }
}
