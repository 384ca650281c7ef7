/*!
The representative traversal finder.

For an ultrabubble that lies on a backbone path, the finder reports
the backbone's own walk through the snarl, plus one walk for every
"bubble": a path that leaves the backbone, passes through some
off-backbone node, edge or child snarl, and returns to it. Each
bubble is found with two bounded breadth-first searches from its
seed, one to the left and one to the right, and the best-supported
pair of halves is spliced into the backbone walk.

The search is bounded by [`SearchLimits`]; bubbles that aren't found
within the limits are silently dropped. When several bubbles have the
same support, the one found first wins, so the result depends on the
order of the snarl's contents, which are visited by node ID and then
by canonical edge.
*/

use std::collections::{BTreeSet, VecDeque};

use rayon::prelude::*;

use log::{debug, trace, warn};

use crate::{
    error::{Result, SnarlError},
    handle::{Edge, Handle, NodeId},
    handlegraph::HandleGraphRef,
    path_index::PathIndex,
    snarls::{Snarl, SnarlBounds, SnarlId, SnarlManager, SnarlType, Visit},
    support::{support_min, Support, SupportProvider},
};

use super::{SearchLimits, SnarlTraversal, TrivialTraversalFinder};

/// What a bubble search starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seed {
    Node(Handle),
    Edge(Handle, Handle),
    Child(SnarlBounds),
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seed::Node(h) => write!(f, "node {}", h),
            Seed::Edge(l, r) => write!(f, "edge {} -> {}", l, r),
            Seed::Child(b) => write!(f, "child {} -> {}", b.start, b.end),
        }
    }
}

/// The boundary that a visit exposes on one side: the visit itself
/// for a node, or the boundary node a child snarl is read through.
#[inline]
fn frontier(visit: &Visit, left_side: bool) -> Visit {
    match *visit {
        Visit::Node(_) => *visit,
        Visit::Snarl { .. } if left_side => Visit::Node(visit.entry_handle()),
        Visit::Snarl { .. } => Visit::Node(visit.exit_handle()),
    }
}

#[inline]
fn reverse_path(path: &[Visit]) -> Vec<Visit> {
    path.iter().rev().map(|v| v.reverse()).collect()
}

pub struct RepresentativeTraversalFinder<'a, G, S> {
    graph: G,
    manager: &'a SnarlManager,
    supports: S,
    primary: Option<&'a PathIndex>,
    limits: SearchLimits,
}

impl<'a, G, S> RepresentativeTraversalFinder<'a, G, S>
where
    G: HandleGraphRef,
    S: SupportProvider,
{
    /// Create a finder that uses `primary` as the backbone for every
    /// snarl that has both boundaries on it. Other snarls use a walk
    /// from the trivial finder as their backbone.
    pub fn new(
        graph: G,
        manager: &'a SnarlManager,
        supports: S,
        primary: Option<&'a PathIndex>,
        limits: SearchLimits,
    ) -> Self {
        RepresentativeTraversalFinder {
            graph,
            manager,
            supports,
            primary,
            limits,
        }
    }

    #[inline]
    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Find the backbone traversal of the snarl, followed by every
    /// distinct bubble traversal. All traversals run from the
    /// snarl's start to its end.
    pub fn find_traversals(&self, site: SnarlId) -> Result<Vec<SnarlTraversal>> {
        let snarl = self.manager.snarl(site)?;
        if snarl.snarl_type() != SnarlType::Ultrabubble {
            return Err(SnarlError::NotUltrabubble {
                start: snarl.start,
                end: snarl.end,
                snarl_type: snarl.snarl_type(),
            });
        }

        let backbone;
        let index = match self.primary {
            Some(primary)
                if primary.contains(snarl.start.id())
                    && primary.contains(snarl.end.id()) =>
            {
                primary
            }
            _ => {
                backbone = self.synthesize_backbone(site)?;
                &backbone
            }
        };

        let (contents, edges) =
            self.manager.shallow_contents(self.graph, site, true)?;

        let ref_path = self.trace_backbone(site, snarl, index, &contents)?;
        trace!(
            "backbone of {} -> {}: {}",
            snarl.start,
            snarl.end,
            SnarlTraversal::new(ref_path.clone())
        );

        let mut seeds: Vec<Seed> = Vec::new();

        let has_supports = self.supports.has_supports();

        for &id in contents.iter() {
            let handle = Handle::pack(id, false);
            if self.is_any_boundary(handle) {
                continue;
            }
            if has_supports && self.supports.node_support(id).is_zero() {
                continue;
            }
            if index.contains(id) {
                continue;
            }
            seeds.push(Seed::Node(handle));
        }

        for edge in edges.iter() {
            if has_supports && self.supports.edge_support(*edge).is_zero() {
                continue;
            }
            if !index.contains(edge.0.id()) || !index.contains(edge.1.id()) {
                continue;
            }
            seeds.push(Seed::Edge(edge.0, edge.1));
        }

        for &child in self.manager.children_of(site) {
            let bounds = self.manager.snarl(child)?.bounds();
            if index.contains(bounds.start.id())
                && index.contains(bounds.end.id())
            {
                continue;
            }
            seeds.push(Seed::Child(bounds));
        }

        let mut unique: BTreeSet<Vec<Visit>> = BTreeSet::new();

        for seed in seeds {
            let bubble = self.find_bubble(site, index, seed);
            if bubble.is_empty() {
                debug!("no bubble found for {}", seed);
                continue;
            }
            let allele = self.extend_into_allele(&ref_path, &bubble)?;
            unique.insert(allele);
        }

        let mut traversals = Vec::with_capacity(unique.len() + 1);
        traversals.push(SnarlTraversal::new(ref_path.clone()));
        for allele in unique {
            if allele != ref_path {
                traversals.push(SnarlTraversal::new(allele));
            }
        }

        let start_offset = index.offset_of(snarl.start.id()).unwrap_or(0);
        let end_offset = index.offset_of(snarl.end.id()).unwrap_or(0);
        if start_offset > end_offset {
            traversals = traversals.iter().map(|t| t.reversed()).collect();
        }

        Ok(traversals)
    }

    /// Index a walk through the snarl from the trivial finder.
    fn synthesize_backbone(&self, site: SnarlId) -> Result<PathIndex> {
        let trivial = TrivialTraversalFinder::new(self.graph, self.manager);
        let handles: Vec<Handle> = trivial
            .find_traversals(site)?
            .first()
            .map(|t| t.iter().filter_map(|v| v.handle()).collect())
            .unwrap_or_default();

        if handles.is_empty() {
            let snarl = self.manager.snarl(site)?;
            return Err(SnarlError::backbone(format!(
                "no walk through {} -> {} to use as a backbone",
                snarl.start, snarl.end
            )));
        }

        PathIndex::from_handles(self.graph, &handles)
    }

    fn is_any_boundary(&self, handle: Handle) -> bool {
        self.manager.into_which_snarl(handle).is_some()
            || self.manager.into_which_snarl(handle.flip()).is_some()
    }

    /// Walk the backbone between the snarl's boundaries, replacing
    /// each child snarl met on the way with a single visit.
    fn trace_backbone(
        &self,
        site: SnarlId,
        snarl: &Snarl,
        index: &PathIndex,
        contents: &BTreeSet<NodeId>,
    ) -> Result<Vec<Visit>> {
        let site_start = index.offset_of(snarl.start.id()).ok_or_else(|| {
            SnarlError::backbone(format!("start {} is not on the backbone", snarl.start))
        })?;
        let site_end = index.offset_of(snarl.end.id()).ok_or_else(|| {
            SnarlError::backbone(format!("end {} is not on the backbone", snarl.end))
        })?;

        let first = site_start.min(site_end);
        let last = site_start.max(site_end);

        let mut nodes_left: BTreeSet<NodeId> = contents.clone();
        let mut ref_path: Vec<Visit> = Vec::new();

        let next_step = |offset: usize, handle: Handle| {
            index.next_at_or_after(offset + self.graph.node_len(handle))
        };

        let mut cursor = first;
        while let Some((offset, handle)) = index.next_at_or_after(cursor) {
            if offset > last {
                break;
            }

            let child = match self.manager.child_visit_at(handle, Some(site)) {
                Some(child) => child,
                None => {
                    ref_path.push(Visit::Node(handle));
                    nodes_left.remove(&handle.id());
                    cursor = offset + self.graph.node_len(handle);
                    continue;
                }
            };

            ref_path.push(child);

            // skip the child's interior, up to its far boundary
            let mut found = next_step(offset, handle);
            while let Some((f_offset, f_handle)) = found {
                if contents.contains(&f_handle.id()) {
                    break;
                }
                found = next_step(f_offset, f_handle);
            }

            let (f_offset, f_handle) = match found {
                Some(found) => found,
                None => break,
            };

            cursor = f_offset;
            let leaves_child = self
                .manager
                .child_visit_at(f_handle.flip(), Some(site))
                .is_some();
            if leaves_child
                && self.manager.child_visit_at(f_handle, Some(site)).is_none()
            {
                cursor = f_offset + self.graph.node_len(f_handle);
            }
        }

        for &id in nodes_left.iter() {
            let handle = Handle::pack(id, false);
            if self.is_any_boundary(handle) {
                continue;
            }
            if index.contains(id) {
                return Err(SnarlError::backbone(format!(
                    "node {} is on the backbone but not on its walk between {} and {}",
                    id, snarl.start, snarl.end
                )));
            }
        }

        Ok(ref_path)
    }

    /// Find the best-supported path through the seed that starts and
    /// ends on the backbone. Returns an empty path if there is none
    /// within the search limits.
    fn find_bubble(
        &self,
        site: SnarlId,
        index: &PathIndex,
        seed: Seed,
    ) -> Vec<Visit> {
        let (left, right) = match seed {
            Seed::Node(handle) => (Visit::Node(handle), Visit::Node(handle)),
            Seed::Edge(l, r) => {
                let left = self
                    .manager
                    .child_visit_at(l.flip(), Some(site))
                    .map(|v| v.reverse())
                    .unwrap_or(Visit::Node(l));
                let right = self
                    .manager
                    .child_visit_at(r, Some(site))
                    .unwrap_or(Visit::Node(r));
                (left, right)
            }
            Seed::Child(bounds) => {
                let visit = Visit::snarl(bounds, false);
                (visit, visit)
            }
        };

        let left_paths = self.bfs_left(site, index, left);
        let right_paths = self.bfs_right(site, index, right);

        let skip = match seed {
            Seed::Edge(_, _) => 0,
            _ => 1,
        };

        let mut best: Vec<Visit> = Vec::new();
        let mut best_support = Support::default();
        let mut bubble_count = 0;

        'pairs: for (_, left_path) in left_paths.iter() {
            for (_, right_path) in right_paths.iter() {
                let (left_anchor, right_anchor) =
                    match (left_path.first(), right_path.last()) {
                        (Some(l), Some(r)) => (*l, *r),
                        _ => continue,
                    };

                let left_side = left_anchor.entry_handle().left_side();
                let right_side = right_anchor.exit_handle().right_side();

                let (left_pos, left_back) = match index.position(left_side.id) {
                    Some(pos) => pos,
                    None => continue,
                };
                let (right_pos, right_back) =
                    match index.position(right_side.id) {
                        Some(pos) => pos,
                        None => continue,
                    };

                // whether each half runs against the backbone
                let left_rel = left_side.is_end != left_back;
                let right_rel = !right_side.is_end != right_back;

                if left_rel != right_rel {
                    continue;
                }
                if (!left_rel && left_pos >= right_pos)
                    || (left_rel && left_pos <= right_pos)
                {
                    continue;
                }

                let right_half = &right_path[skip.min(right_path.len())..];
                if Self::halves_overlap(left_path, right_half) {
                    continue;
                }

                let mut full: Vec<Visit> = left_path.clone();
                full.extend(right_half.iter().copied());
                if left_rel {
                    full = reverse_path(&full);
                }

                let support = self.min_support_in_path(&full);
                if best.is_empty() || support.total() > best_support.total() {
                    best = full;
                    best_support = support;
                }

                bubble_count += 1;
                if bubble_count >= self.limits.max_bubble_paths {
                    break 'pairs;
                }
            }
        }

        best
    }

    fn halves_overlap(left: &[Visit], right: &[Visit]) -> bool {
        let mut nodes: BTreeSet<NodeId> = BTreeSet::new();
        let mut snarls: BTreeSet<SnarlBounds> = BTreeSet::new();
        for visit in left {
            match visit {
                Visit::Node(h) => {
                    nodes.insert(h.id());
                }
                Visit::Snarl { bounds, .. } => {
                    snarls.insert(*bounds);
                }
            }
        }
        right.iter().any(|visit| match visit {
            Visit::Node(h) => nodes.contains(&h.id()),
            Visit::Snarl { bounds, .. } => snarls.contains(bounds),
        })
    }

    /// The componentwise minimum support over the nodes of the path
    /// and the edges between consecutive visits.
    fn min_support_in_path(&self, path: &[Visit]) -> Support {
        let node_supports = path
            .iter()
            .filter_map(|v| v.node_id())
            .map(|id| self.supports.node_support(id));

        let edge_supports = path.windows(2).filter_map(|pair| {
            let from = pair[0].exit_handle();
            let to = pair[1].entry_handle();
            if self.graph.has_edge(from, to) {
                Some(self.supports.edge_support(Edge(from, to)))
            } else {
                None
            }
        });

        let mut supports = node_supports.chain(edge_supports);
        let first = supports.next().unwrap_or_default();
        supports.fold(first, |min, support| support_min(&min, &support))
    }

    #[inline]
    fn is_anchor(index: &PathIndex, visit: &Visit) -> bool {
        match visit {
            Visit::Node(h) => index.contains(h.id()),
            Visit::Snarl { bounds, backward } => {
                if *backward {
                    index.contains(bounds.end.id())
                } else {
                    index.contains(bounds.start.id())
                }
            }
        }
    }

    fn bp_length(&self, path: &VecDeque<Visit>) -> usize {
        path.iter()
            .filter_map(|v| v.handle())
            .map(|h| self.graph.node_len(h))
            .sum()
    }

    /// Breadth-first search leftwards from the seed until the
    /// backbone is reached. Returns the paths found, each ending with
    /// the seed and starting on the backbone, ordered by their length
    /// in base pairs.
    fn bfs_left(
        &self,
        site: SnarlId,
        index: &PathIndex,
        seed: Visit,
    ) -> BTreeSet<(usize, Vec<Visit>)> {
        let has_supports = self.supports.has_supports();
        let mut results: BTreeSet<(usize, Vec<Visit>)> = BTreeSet::new();

        let mut queue: VecDeque<VecDeque<Visit>> = VecDeque::new();
        queue.push_back(std::iter::once(seed).collect());
        let mut still_to_extend = 1usize;

        while let Some(path) = queue.pop_front() {
            still_to_extend -= 1;

            let front = match path.front() {
                Some(front) => *front,
                None => continue,
            };

            if Self::is_anchor(index, &front) {
                let length = self.bp_length(&path);
                results.insert((length, path.into_iter().collect()));
                continue;
            }

            if path.len() > self.limits.max_depth {
                continue;
            }

            for prev in self.manager.visits_left(self.graph, front, Some(site)) {
                if has_supports {
                    let pruned = match prev {
                        Visit::Node(h) => {
                            let edge = Edge(prev.exit_handle(), front.entry_handle());
                            self.supports.node_support(h.id()).is_zero()
                                || self.supports.edge_support(edge).is_zero()
                        }
                        Visit::Snarl { .. } => self
                            .supports
                            .node_support(prev.entry_handle().id())
                            .is_zero(),
                    };
                    if pruned {
                        continue;
                    }
                }

                if still_to_extend >= self.limits.max_width {
                    continue;
                }

                let mut extended = path.clone();
                extended.push_front(prev);
                queue.push_back(extended);
                still_to_extend += 1;
            }
        }

        results
    }

    /// Like `bfs_left`, but rightwards; the paths start with the
    /// seed and end on the backbone.
    fn bfs_right(
        &self,
        site: SnarlId,
        index: &PathIndex,
        seed: Visit,
    ) -> BTreeSet<(usize, Vec<Visit>)> {
        self.bfs_left(site, index, seed.reverse())
            .into_iter()
            .map(|(length, path)| (length, reverse_path(&path)))
            .collect()
    }

    /// Splice a bubble into the backbone walk, replacing the part of
    /// the backbone between the bubble's two anchors.
    fn extend_into_allele(
        &self,
        ref_path: &[Visit],
        path: &[Visit],
    ) -> Result<Vec<Visit>> {
        let (first, last) = match (path.first(), path.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Ok(ref_path.to_vec()),
        };

        let mut allele: Vec<Visit> = Vec::with_capacity(ref_path.len() + path.len());

        let mut ix = 0;
        loop {
            let ref_visit = match ref_path.get(ix) {
                Some(v) => v,
                None => {
                    return Err(SnarlError::backbone(format!(
                        "bubble start {} is not on the backbone",
                        first
                    )))
                }
            };
            if frontier(ref_visit, false) == frontier(&first, true) {
                break;
            }
            if !first.is_node()
                && frontier(ref_visit, false) == frontier(&first, false)
            {
                break;
            }
            allele.push(*ref_visit);
            ix += 1;
        }

        let mut skip = 0;
        if !ref_path[ix].is_node() {
            allele.push(ref_path[ix]);
            if first.is_node() || first == ref_path[ix] {
                skip = 1;
            }
        }
        allele.extend(path[skip..].iter().copied());

        let matches_end = |ref_visit: &Visit, with_snarls: bool| {
            frontier(ref_visit, true) == frontier(&last, false)
                || (with_snarls
                    && !last.is_node()
                    && frontier(ref_visit, false) == frontier(&last, false))
        };

        let end_ix = match (ix..ref_path.len())
            .find(|&k| matches_end(&ref_path[k], true))
        {
            Some(k) => k,
            None => {
                warn!(
                    "restarting the backbone scan for the end of bubble {} -> {}",
                    first, last
                );
                (0..ref_path.len())
                    .find(|&k| matches_end(&ref_path[k], false))
                    .ok_or_else(|| {
                        SnarlError::backbone(format!(
                            "bubble end {} is not on the backbone",
                            last
                        ))
                    })?
            }
        };

        if !ref_path[end_ix].is_node() {
            if let Some(prev) = allele.last() {
                if prev.is_node() || *prev == ref_path[end_ix] {
                    allele.pop();
                }
            }
            allele.push(ref_path[end_ix]);
        }

        allele.extend(ref_path[end_ix + 1..].iter().copied());

        Ok(allele)
    }
}

impl<'a, G, S> RepresentativeTraversalFinder<'a, G, S>
where
    G: HandleGraphRef + Sync,
    S: SupportProvider + Sync,
{
    /// Find the traversals of every ultrabubble in the manager, in
    /// parallel. Results are in snarl ID order.
    pub fn find_all_traversals(
        &self,
    ) -> Vec<(SnarlId, Result<Vec<SnarlTraversal>>)> {
        let t = std::time::Instant::now();

        let sites: Vec<SnarlId> = self
            .manager
            .iter()
            .filter(|(_, s)| s.is_ultrabubble())
            .map(|(id, _)| id)
            .collect();

        let results: Vec<_> = sites
            .par_iter()
            .map(|&site| (site, self.find_traversals(site)))
            .collect();

        debug!(
            "found traversals of {} ultrabubbles in {:.3} ms",
            results.len(),
            t.elapsed().as_secs_f64() * 1000.0
        );

        results
    }
}
