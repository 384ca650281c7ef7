use fnv::FnvHashSet;

#[allow(unused_imports)]
use log::{debug, trace, warn};

use crate::{
    error::{Result, SnarlError},
    handle::Handle,
    handlegraph::*,
    pathhandlegraph::*,
};

use super::cactus::{Cactus, CactusEdge};
use super::{
    ChainId, Connectivity, NetGraph, Snarl, SnarlBounds, SnarlId,
    SnarlManager,
};

/// Builds the snarl tree of a graph from its cactus decomposition.
///
/// ```
/// use snarlkit::hashgraph::HashGraph;
/// use snarlkit::handle::Edge;
/// use snarlkit::mutablehandlegraph::AdditiveHandleGraph;
/// use snarlkit::snarls::{CactusSnarlFinder, SnarlType};
///
/// let mut graph = HashGraph::new();
/// let a = graph.append_handle(b"GAT");
/// let b = graph.append_handle(b"T");
/// let c = graph.append_handle(b"C");
/// let d = graph.append_handle(b"AGG");
/// graph.create_edge(Edge(a, b));
/// graph.create_edge(Edge(a, c));
/// graph.create_edge(Edge(b, d));
/// graph.create_edge(Edge(c, d));
///
/// let manager = CactusSnarlFinder::new(&graph).find_snarls().unwrap();
/// let (_, snarl) = manager.iter().next().unwrap();
/// assert_eq!((snarl.start, snarl.end), (a, d));
/// assert_eq!(snarl.snarl_type(), SnarlType::Ultrabubble);
/// ```
pub struct CactusSnarlFinder<G> {
    graph: G,
    hint_path: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arrival {
    Root,
    Cycle(usize),
    Bridge(usize),
}

impl<G> CactusSnarlFinder<G>
where
    G: HandleGraphRef + GraphPathNames + GraphPathsSteps,
{
    pub fn new(graph: G) -> Self {
        CactusSnarlFinder {
            graph,
            hint_path: None,
        }
    }

    /// Use the named path to pick the ends of its component, so
    /// that snarls are oriented along the path.
    pub fn with_hint_path(mut self, name: &[u8]) -> Self {
        self.hint_path = Some(name.to_vec());
        self
    }

    fn hint_handles(&self) -> Result<Option<Vec<Handle>>> {
        let name = match &self.hint_path {
            Some(name) => name,
            None => return Ok(None),
        };
        let missing =
            || SnarlError::MissingPath(String::from_utf8_lossy(name).into());

        let path_id = self.graph.get_path_id(name).ok_or_else(missing)?;
        let steps = self.graph.path_steps(path_id).ok_or_else(missing)?;
        Ok(Some(steps.map(|(_, h)| h).collect()))
    }

    /// Decompose every connected component of the graph into snarls
    /// and chains.
    pub fn find_snarls(&self) -> Result<SnarlManager> {
        let t = std::time::Instant::now();

        let hint = self.hint_handles()?;
        let cactus = Cactus::build(self.graph, hint.as_deref())?;

        let mut manager = SnarlManager::new();
        for &root in cactus.roots() {
            let chains =
                self.walk_vertex(&cactus, &mut manager, root, Arrival::Root)?;
            for chain in chains {
                manager.add_top_level(chain);
            }
        }

        debug!(
            "found {} snarls in {} top level chains in {:.3} ms",
            manager.len(),
            manager.top_level_chains().len(),
            t.elapsed().as_secs_f64() * 1000.0
        );

        Ok(manager)
    }

    /// Emit the chains hanging off a cactus vertex, other than the
    /// one the walk arrived through. Children are added to the
    /// manager before their parents.
    fn walk_vertex(
        &self,
        cactus: &Cactus,
        manager: &mut SnarlManager,
        vertex: usize,
        arrival: Arrival,
    ) -> Result<Vec<ChainId>> {
        let mut chains = Vec::new();
        let mut done_cycles: FnvHashSet<usize> = FnvHashSet::default();

        for &node in cactus.incidences(vertex) {
            match cactus.kind(node) {
                CactusEdge::Internal => {}
                CactusEdge::Bridge => {
                    if arrival == Arrival::Bridge(node) {
                        continue;
                    }
                    let far = cactus.other_vertex(node, vertex);
                    if cactus.degree(far) <= 1 {
                        continue;
                    }
                    let start = cactus.handle_leaving(node, vertex);
                    let children = self.walk_vertex(
                        cactus,
                        manager,
                        far,
                        Arrival::Bridge(node),
                    )?;
                    let id =
                        self.add_snarl(manager, start, start.flip(), children)?;
                    chains.push(manager.add_chain(vec![id]));
                }
                CactusEdge::Cycle(cycle) => {
                    if arrival == Arrival::Cycle(cycle)
                        || !done_cycles.insert(cycle)
                    {
                        continue;
                    }
                    let walk = cactus.cycle_from(cycle, vertex);
                    let mut snarls = Vec::with_capacity(walk.len());
                    for pair in walk.windows(2) {
                        let (start, inside) = pair[0];
                        let (end, _) = pair[1];
                        let children = self.walk_vertex(
                            cactus,
                            manager,
                            inside,
                            Arrival::Cycle(cycle),
                        )?;
                        snarls.push(self.add_snarl(manager, start, end, children)?);
                    }
                    if !snarls.is_empty() {
                        chains.push(manager.add_chain(snarls));
                    }
                }
            }
        }

        Ok(chains)
    }

    /// Classify a snarl whose children are already in the manager,
    /// and add it.
    fn add_snarl(
        &self,
        manager: &mut SnarlManager,
        start: Handle,
        end: Handle,
        child_chains: Vec<ChainId>,
    ) -> Result<SnarlId> {
        for h in [start, end].iter() {
            if !self.graph.has_node(h.id()) {
                return Err(SnarlError::MissingNode(h.id()));
            }
        }

        let bounds = SnarlBounds::new(start, end);

        let internal = NetGraph::new(
            self.graph,
            manager,
            start,
            end,
            &child_chains,
            true,
        );
        let (start_end_reachable, start_self_reachable, end_self_reachable) =
            internal.reachability();

        let flat =
            NetGraph::new(self.graph, manager, start, end, &child_chains, false);
        let directed_acyclic_net_graph = flat.is_directed_acyclic();

        let connectivity = Connectivity {
            start_self_reachable,
            end_self_reachable,
            start_end_reachable,
            directed_acyclic_net_graph,
        };

        let children_are_ultrabubbles = child_chains
            .iter()
            .flat_map(|&chain| manager.chain(chain).iter())
            .all(|&child| {
                manager
                    .get(child)
                    .map(|s| s.is_ultrabubble())
                    .unwrap_or(false)
            });

        let snarl = Snarl::new(bounds, connectivity, children_are_ultrabubbles);
        trace!(
            "snarl {} -> {} is {} ({:?})",
            start,
            end,
            snarl.snarl_type(),
            connectivity
        );

        Ok(manager.add_snarl(snarl, child_chains))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snarls::{SnarlType, Visit};
    use crate::util::test::*;

    fn bounds_of(manager: &SnarlManager) -> Vec<(Handle, Handle, SnarlType)> {
        let mut b: Vec<_> = manager
            .iter()
            .map(|(_, s)| (s.start, s.end, s.snarl_type()))
            .collect();
        b.sort();
        b
    }

    #[test]
    fn empty_graph() {
        let graph = crate::hashgraph::HashGraph::new();
        let manager = CactusSnarlFinder::new(&graph).find_snarls().unwrap();
        assert!(manager.is_empty());
        assert!(manager.top_level_chains().is_empty());
    }

    #[test]
    fn linear_chain() {
        let graph = linear(3);
        let manager = CactusSnarlFinder::new(&graph).find_snarls().unwrap();
        assert_eq!(
            bounds_of(&manager),
            vec![
                (hnd(1), hnd(2), SnarlType::Ultrabubble),
                (hnd(2), hnd(3), SnarlType::Ultrabubble),
            ]
        );
        assert_eq!(manager.top_level_chains().len(), 1);
        let chain = manager.chain(manager.top_level_chains()[0]);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn chain_of_bubbles() {
        let graph = bubble_chain();
        let manager = CactusSnarlFinder::new(&graph).find_snarls().unwrap();
        assert_eq!(
            bounds_of(&manager),
            vec![
                (hnd(1), hnd(4), SnarlType::Ultrabubble),
                (hnd(4), hnd(7), SnarlType::Ultrabubble),
            ]
        );
        let chain = manager.chain(manager.top_level_chains()[0]);
        let first = manager.snarl(chain[0]).unwrap();
        let second = manager.snarl(chain[1]).unwrap();
        assert_eq!(first.end, second.start);
    }

    #[test]
    fn nested_bubble() {
        let graph = nested_graph();
        let manager = CactusSnarlFinder::new(&graph).find_snarls().unwrap();

        let parent = manager
            .manage(SnarlBounds::new(hnd(1), hnd(6)))
            .expect("outer snarl");
        let child = manager
            .manage(SnarlBounds::new(hnd(2), hnd(5)))
            .expect("inner snarl");

        assert_eq!(manager.parent_of(child), Some(parent));
        assert_eq!(manager.children_of(parent), &[child]);
        assert!(manager.snarl(parent).unwrap().is_ultrabubble());
        assert_eq!(
            manager.child_visit_at(hnd(2), Some(parent)),
            Some(Visit::snarl(SnarlBounds::new(hnd(2), hnd(5)), false))
        );
    }

    #[test]
    fn end_self_reachable_is_unclassified() {
        let graph = end_loop_graph();
        let manager = CactusSnarlFinder::new(&graph).find_snarls().unwrap();
        let id = manager
            .manage(SnarlBounds::new(hnd(1), hnd(4)))
            .expect("snarl around the loop");
        let snarl = manager.snarl(id).unwrap();
        assert!(snarl.end_self_reachable());
        assert!(snarl.start_end_reachable());
        assert_eq!(snarl.snarl_type(), SnarlType::Unclassified);
    }

    #[test]
    fn start_self_reachable_is_unclassified() {
        let graph = start_loop_graph();
        let manager = CactusSnarlFinder::new(&graph).find_snarls().unwrap();
        let id = manager
            .manage(SnarlBounds::new(hnd(1), hnd(4)))
            .expect("snarl around the loop");
        let snarl = manager.snarl(id).unwrap();
        assert!(snarl.start_self_reachable());
        assert!(!snarl.end_self_reachable());
        assert!(snarl.start_end_reachable());
        assert!(snarl.directed_acyclic_net_graph());
        assert_eq!(snarl.snarl_type(), SnarlType::Unclassified);
    }

    #[test]
    fn unreachable_end_is_unclassified() {
        let graph = disconnected_ends();
        let manager = CactusSnarlFinder::new(&graph)
            .with_hint_path(b"ref")
            .find_snarls()
            .unwrap();
        let id = manager
            .manage(SnarlBounds::new(hnd(1), hnd(3)))
            .expect("snarl between the path ends");
        let snarl = manager.snarl(id).unwrap();
        assert!(!snarl.start_end_reachable());
        assert!(!snarl.start_self_reachable());
        assert!(!snarl.end_self_reachable());
        assert!(snarl.directed_acyclic_net_graph());
        assert_eq!(snarl.snarl_type(), SnarlType::Unclassified);
    }

    #[test]
    fn unclassified_child_makes_parent_unclassified() {
        let graph = nested_cycle();
        let manager = CactusSnarlFinder::new(&graph).find_snarls().unwrap();

        let child = manager
            .manage(SnarlBounds::new(hnd(2), hnd(5)))
            .expect("inner snarl");
        let child = manager.snarl(child).unwrap();
        assert!(!child.directed_acyclic_net_graph());
        assert_eq!(child.snarl_type(), SnarlType::Unclassified);

        // the parent's own connectivity is regular
        let parent = manager
            .manage(SnarlBounds::new(hnd(1), hnd(6)))
            .expect("outer snarl");
        let parent = manager.snarl(parent).unwrap();
        assert!(parent.start_end_reachable());
        assert!(!parent.start_self_reachable());
        assert!(!parent.end_self_reachable());
        assert!(parent.directed_acyclic_net_graph());
        assert_eq!(parent.snarl_type(), SnarlType::Unclassified);
    }

    #[test]
    fn hanging_bubble_is_unary() {
        let graph = unary_graph();
        let manager = CactusSnarlFinder::new(&graph).find_snarls().unwrap();
        let unary: Vec<_> = manager
            .iter()
            .filter(|(_, s)| s.snarl_type() == SnarlType::Unary)
            .map(|(_, s)| (s.start, s.end))
            .collect();
        assert_eq!(unary, vec![(hnd(5), hnd(5).flip())]);
    }

    #[test]
    fn missing_hint_path() {
        let graph = diamond();
        let res = CactusSnarlFinder::new(&graph)
            .with_hint_path(b"nope")
            .find_snarls();
        assert_eq!(res.err(), Some(SnarlError::MissingPath("nope".into())));
    }
}
