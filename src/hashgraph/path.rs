use bstr::BString;

use crate::handle::Handle;
use crate::pathhandlegraph::PathId;

/// An embedded path, stored as the sequence of handles it steps on.
/// Steps are identified by their index in `nodes`.
#[derive(Debug, Clone)]
pub struct Path {
    pub path_id: PathId,
    pub name: BString,
    pub is_circular: bool,
    pub nodes: Vec<Handle>,
}

impl Path {
    pub fn new<T: Into<BString>>(
        name: T,
        path_id: PathId,
        is_circular: bool,
    ) -> Self {
        Path {
            name: name.into(),
            path_id,
            is_circular,
            nodes: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn handle_at(&self, step: usize) -> Option<Handle> {
        self.nodes.get(step).copied()
    }
}
