use bstr::ByteSlice;
use fnv::FnvHashMap;

use gfa::{
    gfa::{Link, Segment, GFA},
    optfields::OptFields,
};

use log::warn;

use crate::{
    handle::{Edge, Handle, NodeId},
    mutablehandlegraph::*,
    pathhandlegraph::{MutableGraphPaths, PathId},
};

use super::{Node, Path};

/// A handlegraph implementation using `HashMap` to represent the
/// graph topology and nodes, and each path as a `Vec` of nodes.
#[derive(Debug, Clone)]
pub struct HashGraph {
    pub max_id: NodeId,
    pub min_id: NodeId,
    pub graph: FnvHashMap<NodeId, Node>,
    pub path_id: FnvHashMap<Vec<u8>, PathId>,
    pub paths: FnvHashMap<PathId, Path>,
}

impl Default for HashGraph {
    fn default() -> HashGraph {
        HashGraph {
            max_id: NodeId::from(0u64),
            min_id: NodeId::from(std::u64::MAX),
            graph: Default::default(),
            path_id: Default::default(),
            paths: Default::default(),
        }
    }
}

impl HashGraph {
    pub fn new() -> HashGraph {
        Default::default()
    }

    fn add_gfa_segment<T: OptFields>(&mut self, seg: &Segment<usize, T>) {
        self.create_handle(&seg.sequence, seg.name as u64);
    }

    fn add_gfa_link<T: OptFields>(&mut self, link: &Link<usize, T>) {
        let left = Handle::new(link.from_segment as u64, link.from_orient);
        let right = Handle::new(link.to_segment as u64, link.to_orient);

        self.create_edge(Edge(left, right));
    }

    fn add_gfa_path<T: OptFields>(&mut self, path: &gfa::gfa::Path<usize, T>) {
        let name = path.path_name.as_bstr();
        let steps: Vec<Handle> = path
            .iter()
            .map(|(seg, orient)| Handle::new(seg as u64, orient))
            .collect();

        if let Some(missing) =
            steps.iter().find(|h| !self.graph.contains_key(&h.id()))
        {
            warn!("skipping GFA path {} with missing segment {}", name, missing.id());
            return;
        }

        let path_id = match self.create_path(&path.path_name, false) {
            Some(id) => id,
            None => {
                warn!("skipping duplicate GFA path {}", name);
                return;
            }
        };
        for handle in steps {
            self.path_append_step(path_id, handle);
        }
    }

    /// Build a graph from a parsed GFA with numeric segment names.
    /// Segments become nodes, links become edges, and paths become
    /// embedded paths.
    pub fn from_gfa<T: OptFields>(gfa: &GFA<usize, T>) -> HashGraph {
        let mut graph = Self::new();
        gfa.segments.iter().for_each(|s| graph.add_gfa_segment(s));
        gfa.links.iter().for_each(|l| graph.add_gfa_link(l));
        gfa.paths.iter().for_each(|p| graph.add_gfa_path(p));
        graph
    }

    pub fn get_node(&self, node_id: &NodeId) -> Option<&Node> {
        self.graph.get(node_id)
    }

    pub fn get_node_unchecked(&self, node_id: &NodeId) -> &Node {
        self.graph.get(node_id).unwrap_or_else(|| {
            panic!("Tried getting a node that doesn't exist, ID: {:?}", node_id)
        })
    }

    pub fn get_node_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        self.graph.get_mut(node_id)
    }

    pub fn get_path(&self, path_id: &PathId) -> Option<&Path> {
        self.paths.get(path_id)
    }

    /// Node IDs in ascending order.
    pub fn sorted_node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.graph.keys().copied().collect();
        ids.sort();
        ids
    }
}
