use fnv::FnvHashMap;

use log::debug;

use crate::{
    error::{Result, SnarlError},
    handle::{Direction, Handle},
    handlegraph::HandleGraphRef,
    snarls::{SnarlId, SnarlManager, Visit},
};

use super::SnarlTraversal;

/// Finds a single walk through an ultrabubble, by depth-first search
/// from its start to the first end found. Child snarls are not
/// collapsed, so the walk consists only of node visits.
pub struct TrivialTraversalFinder<'a, G> {
    graph: G,
    manager: &'a SnarlManager,
}

impl<'a, G: HandleGraphRef> TrivialTraversalFinder<'a, G> {
    pub fn new(graph: G, manager: &'a SnarlManager) -> Self {
        TrivialTraversalFinder { graph, manager }
    }

    pub fn find_traversals(&self, site: SnarlId) -> Result<Vec<SnarlTraversal>> {
        let snarl = self.manager.snarl(site)?;
        if !snarl.is_ultrabubble() {
            return Err(SnarlError::NotUltrabubble {
                start: snarl.start,
                end: snarl.end,
                snarl_type: snarl.snarl_type(),
            });
        }

        let (start, end) = (snarl.start, snarl.end);

        let mut previous: FnvHashMap<Handle, Handle> = FnvHashMap::default();
        let mut stack: Vec<Handle> = vec![start];
        let mut found = None;

        while let Some(handle) = stack.pop() {
            if handle.id() == end.id() {
                found = Some(handle);
                break;
            }
            for next in self.graph.neighbors(handle, Direction::Right) {
                if next != start && !previous.contains_key(&next) {
                    previous.insert(next, handle);
                    stack.push(next);
                }
            }
        }

        let mut handle = match found {
            Some(handle) => handle,
            None => {
                debug!("no walk from {} to {}", start, end);
                return Ok(Vec::new());
            }
        };

        let mut visits = vec![Visit::Node(handle)];
        while let Some(&prev) = previous.get(&handle) {
            visits.push(Visit::Node(prev));
            handle = prev;
        }
        visits.reverse();

        Ok(vec![SnarlTraversal::new(visits)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snarls::{CactusSnarlFinder, SnarlBounds};
    use crate::util::test::*;

    #[test]
    fn one_walk_through_diamond() {
        let graph = diamond();
        let manager = CactusSnarlFinder::new(&graph).find_snarls().unwrap();
        let site = manager.manage(SnarlBounds::new(hnd(1), hnd(4))).unwrap();

        let finder = TrivialTraversalFinder::new(&graph, &manager);
        let travs = finder.find_traversals(site).unwrap();
        assert_eq!(travs.len(), 1);

        let visits = &travs[0].visits;
        assert_eq!(visits.len(), 3);
        assert_eq!(visits[0], Visit::Node(hnd(1)));
        assert_eq!(visits[2], Visit::Node(hnd(4)));
    }

    #[test]
    fn child_interiors_are_expanded() {
        let graph = nested_graph();
        let manager = CactusSnarlFinder::new(&graph).find_snarls().unwrap();
        let site = manager.manage(SnarlBounds::new(hnd(1), hnd(6))).unwrap();

        let finder = TrivialTraversalFinder::new(&graph, &manager);
        let travs = finder.find_traversals(site).unwrap();
        assert_eq!(travs[0].len(), 5);
        assert!(travs[0].iter().all(|v| v.is_node()));
    }

    #[test]
    fn rejects_unclassified() {
        let graph = end_loop_graph();
        let manager = CactusSnarlFinder::new(&graph).find_snarls().unwrap();
        let site = manager.manage(SnarlBounds::new(hnd(1), hnd(4))).unwrap();

        let finder = TrivialTraversalFinder::new(&graph, &manager);
        match finder.find_traversals(site) {
            Err(SnarlError::NotUltrabubble { .. }) => {}
            other => panic!("expected an error, got {:?}", other),
        }
    }
}
