use std::collections::BTreeMap;

use fnv::FnvHashMap;

use crate::{
    error::{Result, SnarlError},
    handle::{Handle, NodeId},
    handlegraph::HandleSequences,
    pathhandlegraph::{GraphPathNames, GraphPathsSteps},
};

/// Linear coordinates along a single path.
///
/// Offsets are 0-based positions in base pairs of the first base of
/// each step, and increase strictly along the path. Each node can
/// appear at most once on an indexed path.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PathIndex {
    by_id: FnvHashMap<NodeId, (usize, bool)>,
    by_start: BTreeMap<usize, Handle>,
    base_len: usize,
}

impl PathIndex {
    /// Index the embedded path with the given name.
    pub fn from_path<G>(graph: G, name: &[u8]) -> Result<PathIndex>
    where
        G: HandleSequences + GraphPathNames + GraphPathsSteps + Copy,
    {
        let name_str = || String::from_utf8_lossy(name).into_owned();

        let path_id = graph
            .get_path_id(name)
            .ok_or_else(|| SnarlError::MissingPath(name_str()))?;
        let steps = graph
            .path_steps(path_id)
            .ok_or_else(|| SnarlError::MissingPath(name_str()))?;

        Self::index_handles(graph, steps.map(|(_, h)| h), name_str)
    }

    /// Index an explicit sequence of handles, e.g. a traversal that
    /// stands in for a reference path.
    pub fn from_handles<G>(graph: G, handles: &[Handle]) -> Result<PathIndex>
    where
        G: HandleSequences + Copy,
    {
        Self::index_handles(graph, handles.iter().copied(), || {
            String::from("<backbone>")
        })
    }

    fn index_handles<G, I, F>(graph: G, handles: I, name: F) -> Result<PathIndex>
    where
        G: HandleSequences + Copy,
        I: Iterator<Item = Handle>,
        F: Fn() -> String,
    {
        let mut index = PathIndex::default();
        let mut offset = 0usize;

        for handle in handles {
            if index.by_id.contains_key(&handle.id()) {
                return Err(SnarlError::PathRevisitsNode {
                    path: name(),
                    node: handle.id(),
                });
            }
            index
                .by_id
                .insert(handle.id(), (offset, handle.is_reverse()));
            index.by_start.insert(offset, handle);
            offset += graph.node_len(handle);
        }

        index.base_len = offset;
        Ok(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_start.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_start.is_empty()
    }

    /// The length of the path in base pairs.
    #[inline]
    pub fn base_len(&self) -> usize {
        self.base_len
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// The offset of the node on the path, and whether the path
    /// visits it in reverse.
    #[inline]
    pub fn position(&self, id: NodeId) -> Option<(usize, bool)> {
        self.by_id.get(&id).copied()
    }

    #[inline]
    pub fn offset_of(&self, id: NodeId) -> Option<usize> {
        self.position(id).map(|(offset, _)| offset)
    }

    #[inline]
    pub fn handle_at(&self, offset: usize) -> Option<Handle> {
        self.by_start.get(&offset).copied()
    }

    /// The first step that starts at or after `offset`.
    #[inline]
    pub fn next_at_or_after(&self, offset: usize) -> Option<(usize, Handle)> {
        self.by_start
            .range(offset..)
            .next()
            .map(|(&offset, &handle)| (offset, handle))
    }

    /// The steps of the path in order, with their offsets.
    pub fn steps(&self) -> impl Iterator<Item = (usize, Handle)> + '_ {
        self.by_start.iter().map(|(&offset, &handle)| (offset, handle))
    }
}
