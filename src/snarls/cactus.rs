/*!
Cactus decomposition of a bidirected graph.

Node sides that are joined by edges are merged into adjacency
components, and each node becomes an edge between the components of
its two sides. In that multigraph, the cut pairs and bridges are
found by XOR labelling of a DFS spanning forest: every non-tree edge
gets a pseudo-random 64-bit label, and every tree edge gets the XOR
of the labels of the non-tree edges that span it. Bridges have label
zero, and edges that share a label form a cut class, which becomes a
cycle in the cactus graph. The vertices of the cactus are the
3-edge-connected components.

The snarl finder walks the resulting cactus to build the snarl tree.
*/

use fnv::FnvHashMap;
use rayon::prelude::*;

use std::collections::VecDeque;

#[allow(unused_imports)]
use log::{debug, trace, warn};

use crate::{
    disjoint::DisjointSets,
    error::{Result, SnarlError},
    handle::{Direction, Handle, NodeId},
    handlegraph::*,
};

/// What a node is in the cactus graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CactusEdge {
    /// Both sides are in the same cactus vertex.
    Internal,
    Bridge,
    /// The node is part of the given cactus cycle.
    Cycle(usize),
}

/// One node of a cactus cycle, read from one cactus vertex to the
/// next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleStep {
    pub node: usize,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone)]
pub struct Cactus {
    nodes: Vec<NodeId>,
    // cactus vertices of each node's left and right side
    node_vertices: Vec<(usize, usize)>,
    kinds: Vec<CactusEdge>,
    cycles: Vec<Vec<CycleStep>>,
    incidences: Vec<Vec<usize>>,
    degrees: Vec<usize>,
    roots: Vec<usize>,
}

#[inline]
fn entry_side(ix: usize, handle: Handle) -> usize {
    if handle.is_reverse() {
        2 * ix + 1
    } else {
        2 * ix
    }
}

#[inline]
fn exit_side(ix: usize, handle: Handle) -> usize {
    if handle.is_reverse() {
        2 * ix
    } else {
        2 * ix + 1
    }
}

/// Deterministic 64-bit label for the edge with index `ix`.
#[inline]
fn splitmix64(ix: u64) -> u64 {
    let mut z = ix.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl Cactus {
    /// Build the cactus graph of `graph`. If a hint path is given,
    /// its first and last node sides are used as the telomeres of
    /// the component it's in.
    pub fn build<G: HandleGraphRef>(
        graph: G,
        hint_path: Option<&[Handle]>,
    ) -> Result<Cactus> {
        let t = std::time::Instant::now();

        let mut nodes: Vec<NodeId> =
            graph.all_handles().map(|h| h.id()).collect();
        nodes.sort();
        let node_ix: FnvHashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(ix, id)| (*id, ix)).collect();

        let n = nodes.len();
        let index_of = |id: NodeId| -> Result<usize> {
            node_ix.get(&id).copied().ok_or(SnarlError::MissingNode(id))
        };

        let mut edges: Vec<(usize, Handle, usize, Handle)> = Vec::new();
        for edge in graph.all_edges() {
            let l_ix = index_of(edge.0.id())?;
            let r_ix = index_of(edge.1.id())?;
            edges.push((l_ix, edge.0, r_ix, edge.1));
        }

        let sides = DisjointSets::new(2 * n);
        let components = DisjointSets::new(n);

        edges.par_iter().for_each(|&(l_ix, l, r_ix, r)| {
            sides.unite(exit_side(l_ix, l) as u64, entry_side(r_ix, r) as u64);
            components.unite(l_ix as u64, r_ix as u64);
        });

        let mut side_edges = vec![0usize; 2 * n];
        for &(l_ix, l, r_ix, r) in edges.iter() {
            side_edges[exit_side(l_ix, l)] += 1;
            side_edges[entry_side(r_ix, r)] += 1;
        }

        let (node_comp, comp_count) = components.dense_classes();
        let mut comp_nodes: Vec<Vec<usize>> = vec![Vec::new(); comp_count];
        for (ix, &comp) in node_comp.iter().enumerate() {
            comp_nodes[comp].push(ix);
        }

        debug!(
            "{} adjacency sides and {} components in {:.3} ms",
            2 * n,
            comp_count,
            t.elapsed().as_secs_f64() * 1000.0
        );

        // the hint path's telomeres, if it's usable
        let hint = match hint_path {
            Some(path) if !path.is_empty() => {
                let first = path[0];
                let last = path[path.len() - 1];
                let f_ix = index_of(first.id())?;
                let l_ix = index_of(last.id())?;
                if node_comp[f_ix] == node_comp[l_ix] {
                    Some((node_comp[f_ix], entry_side(f_ix, first), exit_side(l_ix, last)))
                } else {
                    warn!("hint path ends in two different components, ignoring it");
                    None
                }
            }
            _ => None,
        };

        let mut root_sides: Vec<usize> = Vec::with_capacity(comp_count);
        for (comp, members) in comp_nodes.iter().enumerate() {
            if let Some((_, first, last)) = hint.filter(|h| h.0 == comp) {
                sides.unite(first as u64, last as u64);
                root_sides.push(first);
                continue;
            }

            let tips: Vec<usize> = members
                .iter()
                .flat_map(|&ix| vec![2 * ix, 2 * ix + 1])
                .filter(|&side| side_edges[side] == 0)
                .collect();

            match tips.len() {
                0 => root_sides.push(2 * members[0]),
                1 => root_sides.push(tips[0]),
                _ => {
                    let first = tips[0];
                    let dist = hop_distances(graph, &nodes, &node_ix, first / 2);
                    let mut farthest = tips[1];
                    for &tip in tips[1..].iter() {
                        if dist[tip / 2] > dist[farthest / 2] {
                            farthest = tip;
                        }
                    }
                    trace!(
                        "component {} telomeres {} and {}",
                        comp,
                        first,
                        farthest
                    );
                    sides.unite(first as u64, farthest as u64);
                    root_sides.push(first);
                }
            }
        }

        let (side_vertex, vertex_count) = sides.dense_classes();
        let endpoints: Vec<(usize, usize)> = (0..n)
            .map(|ix| (side_vertex[2 * ix], side_vertex[2 * ix + 1]))
            .collect();

        let mut adjacency: Vec<Vec<(usize, usize)>> =
            vec![Vec::new(); vertex_count];
        for (e, &(a, b)) in endpoints.iter().enumerate() {
            adjacency[a].push((e, b));
            adjacency[b].push((e, a));
        }

        let root_vertices: Vec<usize> =
            root_sides.iter().map(|&s| side_vertex[s]).collect();

        let forest = SpanningForest::new(&adjacency, n, &root_vertices);

        // group the nodes by label
        let mut classes: FnvHashMap<u64, Vec<usize>> = FnvHashMap::default();
        for e in 0..n {
            classes.entry(forest.labels[e]).or_default().push(e);
        }

        let mut kinds = vec![CactusEdge::Internal; n];
        let mut cut_classes: Vec<Vec<usize>> = Vec::new();
        for e in 0..n {
            let label = forest.labels[e];
            if endpoints[e].0 == endpoints[e].1 {
                continue;
            }
            if label == 0 {
                kinds[e] = CactusEdge::Bridge;
                continue;
            }
            let class = &classes[&label];
            if class.len() > 1 && class[0] == e {
                cut_classes.push(class.clone());
            }
        }

        // merge the 3-edge-connected components
        let three_ecc = DisjointSets::new(vertex_count);
        for e in 0..n {
            let label = forest.labels[e];
            if label != 0 && classes[&label].len() == 1 {
                let (a, b) = endpoints[e];
                three_ecc.unite(a as u64, b as u64);
            }
        }

        let mut ordered_classes: Vec<(Vec<(usize, usize, usize)>, Option<(usize, usize, usize)>)> =
            Vec::with_capacity(cut_classes.len());

        for class in cut_classes.iter() {
            let mut tree: Vec<(usize, usize, usize)> = Vec::new();
            let mut back: Option<(usize, usize, usize)> = None;
            for &e in class.iter() {
                match forest.tree_child[e] {
                    Some(child) => {
                        let parent = forest.parent_vertex[child];
                        tree.push((e, parent, child));
                    }
                    None => {
                        let (a, b) = endpoints[e];
                        if forest.pre[a] < forest.pre[b] {
                            back = Some((e, a, b));
                        } else {
                            back = Some((e, b, a));
                        }
                    }
                }
            }
            tree.sort_by_key(|&(_, _, child)| forest.pre[child]);

            for pair in tree.windows(2) {
                three_ecc.unite(pair[0].2 as u64, pair[1].1 as u64);
            }
            if let (Some(first), Some(last)) = (tree.first(), tree.last()) {
                match back {
                    Some((_, lo, hi)) => {
                        three_ecc.unite(last.2 as u64, hi as u64);
                        three_ecc.unite(lo as u64, first.1 as u64);
                    }
                    None => {
                        three_ecc.unite(last.2 as u64, first.1 as u64);
                    }
                }
            }
            ordered_classes.push((tree, back));
        }

        let (cactus_vertex, cactus_count) = three_ecc.dense_classes();

        let mut cycles: Vec<Vec<CycleStep>> = Vec::with_capacity(ordered_classes.len());
        for (tree, back) in ordered_classes {
            let cycle_ix = cycles.len();
            let mut steps: Vec<CycleStep> = Vec::with_capacity(tree.len() + 1);
            for (e, parent, child) in tree {
                steps.push(CycleStep {
                    node: e,
                    from: cactus_vertex[parent],
                    to: cactus_vertex[child],
                });
            }
            if let Some((e, lo, hi)) = back {
                steps.push(CycleStep {
                    node: e,
                    from: cactus_vertex[hi],
                    to: cactus_vertex[lo],
                });
            }
            for step in steps.iter() {
                kinds[step.node] = CactusEdge::Cycle(cycle_ix);
            }
            cycles.push(steps);
        }

        let node_vertices: Vec<(usize, usize)> = endpoints
            .iter()
            .map(|&(a, b)| (cactus_vertex[a], cactus_vertex[b]))
            .collect();

        let mut incidences: Vec<Vec<usize>> = vec![Vec::new(); cactus_count];
        let mut degrees: Vec<usize> = vec![0; cactus_count];
        for (e, &(a, b)) in node_vertices.iter().enumerate() {
            if a == b {
                degrees[a] += 1;
                continue;
            }
            degrees[a] += 1;
            degrees[b] += 1;
            if kinds[e] != CactusEdge::Internal {
                incidences[a].push(e);
                incidences[b].push(e);
            }
        }

        let roots = root_vertices.iter().map(|&v| cactus_vertex[v]).collect();

        debug!(
            "cactus with {} vertices, {} cycles and {} bridges in {:.3} ms",
            cactus_count,
            cycles.len(),
            kinds.iter().filter(|k| **k == CactusEdge::Bridge).count(),
            t.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Cactus {
            nodes,
            node_vertices,
            kinds,
            cycles,
            incidences,
            degrees,
            roots,
        })
    }

    /// One root cactus vertex for each connected component, ordered
    /// by the lowest node ID in the component.
    #[inline]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.degrees.len()
    }

    #[inline]
    pub fn kind(&self, node: usize) -> CactusEdge {
        self.kinds[node]
    }

    #[inline]
    pub fn node_id(&self, node: usize) -> NodeId {
        self.nodes[node]
    }

    /// The bridge and cycle nodes incident to the vertex, in node ID
    /// order.
    #[inline]
    pub fn incidences(&self, vertex: usize) -> &[usize] {
        &self.incidences[vertex]
    }

    /// The number of nodes incident to the vertex, counting nodes
    /// with both sides in the vertex once.
    #[inline]
    pub fn degree(&self, vertex: usize) -> usize {
        self.degrees[vertex]
    }

    pub fn cycle(&self, cycle: usize) -> &[CycleStep] {
        &self.cycles[cycle]
    }

    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    #[inline]
    pub fn other_vertex(&self, node: usize, vertex: usize) -> usize {
        let (a, b) = self.node_vertices[node];
        if a == vertex {
            b
        } else {
            a
        }
    }

    /// The handle of the node that reads out of the vertex.
    #[inline]
    pub fn handle_leaving(&self, node: usize, vertex: usize) -> Handle {
        let (left, _) = self.node_vertices[node];
        Handle::pack(self.nodes[node], left != vertex)
    }

    /// Walk the cycle once, starting by leaving `vertex`. Returns
    /// the handles in walk order, each paired with the vertex it
    /// reads into. Of the two directions, the one that starts with a
    /// forward handle is preferred, then the one whose first node
    /// has the lower ID.
    pub fn cycle_from(&self, cycle: usize, vertex: usize) -> Vec<(Handle, usize)> {
        let steps = &self.cycles[cycle];
        let len = steps.len();
        let pos = match steps.iter().position(|s| s.from == vertex) {
            Some(pos) => pos,
            None => return Vec::new(),
        };

        let forward: Vec<(Handle, usize)> = (0..len)
            .map(|i| {
                let s = steps[(pos + i) % len];
                (self.handle_leaving(s.node, s.from), s.to)
            })
            .collect();

        let backward: Vec<(Handle, usize)> = (0..len)
            .map(|i| {
                let s = steps[(pos + len - 1 - i) % len];
                (self.handle_leaving(s.node, s.to), s.from)
            })
            .collect();

        let (f, b) = (forward[0].0, backward[0].0);
        let use_forward = match (f.is_reverse(), b.is_reverse()) {
            (false, _) => true,
            (true, false) => false,
            (true, true) => f.id() <= b.id(),
        };

        if use_forward {
            forward
        } else {
            backward
        }
    }
}

/// Hop distances from one node to every node, ignoring orientation.
fn hop_distances<G: HandleGraphRef>(
    graph: G,
    nodes: &[NodeId],
    node_ix: &FnvHashMap<NodeId, usize>,
    from: usize,
) -> Vec<usize> {
    let mut dist = vec![std::usize::MAX; nodes.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();
    dist[from] = 0;
    queue.push_back(from);

    while let Some(ix) = queue.pop_front() {
        let handle = Handle::pack(nodes[ix], false);
        let neighbors = graph
            .neighbors(handle, Direction::Left)
            .chain(graph.neighbors(handle, Direction::Right));
        for next in neighbors {
            if let Some(&next_ix) = node_ix.get(&next.id()) {
                if dist[next_ix] == std::usize::MAX {
                    dist[next_ix] = dist[ix] + 1;
                    queue.push_back(next_ix);
                }
            }
        }
    }

    dist
}

/// DFS spanning forest of the adjacency multigraph, with XOR cycle
/// space labels on every edge.
struct SpanningForest {
    pre: Vec<usize>,
    parent_vertex: Vec<usize>,
    // the child vertex of each tree edge
    tree_child: Vec<Option<usize>>,
    labels: Vec<u64>,
}

impl SpanningForest {
    fn new(
        adjacency: &[Vec<(usize, usize)>],
        edge_count: usize,
        roots: &[usize],
    ) -> Self {
        let vertex_count = adjacency.len();
        let mut pre = vec![std::usize::MAX; vertex_count];
        let mut parent_vertex = vec![std::usize::MAX; vertex_count];
        let mut parent_edge: Vec<Option<usize>> = vec![None; vertex_count];
        let mut tree_child: Vec<Option<usize>> = vec![None; edge_count];
        let mut labels = vec![0u64; edge_count];
        let mut acc = vec![0u64; vertex_count];
        let mut edge_seen = vec![false; edge_count];
        let mut order: Vec<usize> = Vec::with_capacity(vertex_count);

        let all_roots = roots.iter().copied().chain(0..vertex_count);
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in all_roots {
            if pre[root] != std::usize::MAX {
                continue;
            }
            pre[root] = order.len();
            order.push(root);
            stack.push((root, 0));

            while let Some((v, next_ix)) = stack.pop() {
                let (e, w) = match adjacency[v].get(next_ix) {
                    Some(&adj) => adj,
                    None => continue,
                };
                stack.push((v, next_ix + 1));

                if edge_seen[e] || parent_edge[v] == Some(e) {
                    continue;
                }
                edge_seen[e] = true;

                if pre[w] == std::usize::MAX {
                    pre[w] = order.len();
                    order.push(w);
                    parent_vertex[w] = v;
                    parent_edge[w] = Some(e);
                    tree_child[e] = Some(w);
                    stack.push((w, 0));
                } else {
                    let label = splitmix64(e as u64);
                    labels[e] = label;
                    acc[v] ^= label;
                    acc[w] ^= label;
                }
            }
        }

        // tree edge labels are the XOR over the child's subtree
        for &v in order.iter().rev() {
            if let Some(e) = parent_edge[v] {
                labels[e] = acc[v];
                let p = parent_vertex[v];
                acc[p] ^= acc[v];
            }
        }

        SpanningForest {
            pre,
            parent_vertex,
            tree_child,
            labels,
        }
    }
}
