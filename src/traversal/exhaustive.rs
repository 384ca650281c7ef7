use crate::{
    error::{Result, SnarlError},
    handle::{Direction, Handle},
    handlegraph::HandleGraphRef,
    snarls::{SnarlId, SnarlManager, Visit},
};

use super::SnarlTraversal;

/// Enumerates every walk through a snarl.
///
/// Child snarls are stepped over: a walk that reaches a child's
/// boundary records the boundary node and a visit to the child, then
/// continues from whichever of the child's boundaries its
/// connectivity allows it to come out of. Walks never repeat a node
/// visit, so cyclic snarls have finitely many walks.
pub struct ExhaustiveTraversalFinder<'a, G> {
    graph: G,
    manager: &'a SnarlManager,
    include_reversing_traversals: bool,
}

impl<'a, G: HandleGraphRef> ExhaustiveTraversalFinder<'a, G> {
    pub fn new(graph: G, manager: &'a SnarlManager) -> Self {
        ExhaustiveTraversalFinder {
            graph,
            manager,
            include_reversing_traversals: false,
        }
    }

    /// Also report walks that leave the snarl back through its
    /// start, and walks that enter and leave through its end.
    pub fn include_reversing_traversals(mut self, include: bool) -> Self {
        self.include_reversing_traversals = include;
        self
    }

    pub fn find_traversals(&self, site: SnarlId) -> Result<Vec<SnarlTraversal>> {
        let snarl = self.manager.snarl(site)?;
        if snarl.bounds().is_unary() {
            return Err(SnarlError::UnarySnarl {
                start: snarl.start,
                end: snarl.end,
            });
        }

        let (start, end) = (snarl.start, snarl.end);
        let stop_at = [end, start.flip()];

        let mut traversals = Vec::new();

        let mut yield_at = vec![end];
        if self.include_reversing_traversals {
            yield_at.push(start.flip());
        }
        self.add_traversals(site, start, &stop_at, &yield_at, &mut traversals);

        if self.include_reversing_traversals && snarl.end_self_reachable() {
            self.add_traversals(
                site,
                end.flip(),
                &stop_at,
                &[end],
                &mut traversals,
            );
        }

        Ok(traversals)
    }

    fn add_traversals(
        &self,
        site: SnarlId,
        from: Handle,
        stop_at: &[Handle],
        yield_at: &[Handle],
        traversals: &mut Vec<SnarlTraversal>,
    ) {
        let mut path: Vec<Visit> = Vec::new();
        // `None` marks where the successors of the path's head begin
        let mut stack: Vec<Option<Handle>> = vec![Some(from)];

        while let Some(entry) = stack.pop() {
            let handle = match entry {
                Some(handle) => handle,
                None => {
                    path.pop();
                    continue;
                }
            };

            if stop_at.contains(&handle) {
                if yield_at.contains(&handle) {
                    let mut visits = path.clone();
                    visits.push(Visit::Node(handle));
                    traversals.push(SnarlTraversal::new(visits));
                }
                continue;
            }

            if path.contains(&Visit::Node(handle)) {
                continue;
            }

            stack.push(None);
            path.push(Visit::Node(handle));

            let child = if handle == from {
                None
            } else {
                self.manager.child_visit_at(handle, Some(site))
            };

            match child {
                Some(child_visit) => {
                    let record = child_visit
                        .bounds()
                        .and_then(|b| self.manager.manage(b))
                        .and_then(|id| self.manager.get(id));
                    let record = match record {
                        Some(record) => record,
                        None => continue,
                    };

                    stack.push(None);
                    path.push(child_visit);

                    if !child_visit.is_backward() {
                        if record.start_end_reachable() {
                            stack.push(Some(record.end));
                        }
                        if record.start_self_reachable() {
                            stack.push(Some(record.start.flip()));
                        }
                    } else {
                        if record.start_end_reachable() {
                            stack.push(Some(record.start.flip()));
                        }
                        if record.end_self_reachable() {
                            stack.push(Some(record.end));
                        }
                    }
                }
                None => {
                    stack.extend(
                        self.graph
                            .neighbors(handle, Direction::Right)
                            .map(Some),
                    );
                }
            }
        }
    }
}
