/*!
Traits for access to the paths embedded in a graph.

Paths are linear walks over oriented handles, and are identified by
a [`PathId`]. Steps on a path are identified by the graph's
`StepIx` type, which is opaque outside of the implementing graph.
*/

use crate::handle::Handle;

/// A unique identifier for a single path.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PathId(pub u64);

impl std::fmt::Display for PathId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Path metadata that doesn't depend on the steps of the paths.
pub trait GraphPaths: Sized {
    type StepIx: Sized + Copy + Eq + Ord;

    fn path_count(self) -> usize;

    /// The number of steps on the path.
    fn path_len(self, id: PathId) -> Option<usize>;

    fn path_circular(self, id: PathId) -> Option<bool>;
}

/// Lookup between path names and IDs.
pub trait GraphPathNames: Sized {
    type PathName: Iterator<Item = u8>;

    fn get_path_id(self, name: &[u8]) -> Option<PathId>;

    fn get_path_name(self, id: PathId) -> Option<Self::PathName>;

    #[inline]
    fn get_path_name_vec(self, id: PathId) -> Option<Vec<u8>> {
        self.get_path_name(id).map(|name| name.collect())
    }
}

/// Iteration over all the path IDs in a graph.
pub trait IntoPathIds: Sized {
    type PathIds: Iterator<Item = PathId>;

    fn path_ids(self) -> Self::PathIds;
}

/// Walking the steps of an embedded path.
pub trait GraphPathsSteps: GraphPaths {
    type Steps: Iterator<Item = (Self::StepIx, Handle)>;

    fn path_steps(self, id: PathId) -> Option<Self::Steps>;

    fn path_handle_at_step(
        self,
        id: PathId,
        step: Self::StepIx,
    ) -> Option<Handle>;

    fn path_first_step(self, id: PathId) -> Option<Self::StepIx>;

    fn path_last_step(self, id: PathId) -> Option<Self::StepIx>;

    fn path_next_step(
        self,
        id: PathId,
        step: Self::StepIx,
    ) -> Option<Self::StepIx>;

    fn path_prev_step(
        self,
        id: PathId,
        step: Self::StepIx,
    ) -> Option<Self::StepIx>;
}

/// The steps on each node, across all paths.
pub trait IntoNodeOccurrences: GraphPaths {
    type Occurrences: Iterator<Item = (PathId, Self::StepIx)>;

    fn steps_on_handle(self, handle: Handle) -> Option<Self::Occurrences>;
}

/// Creating paths and extending them.
pub trait MutableGraphPaths {
    type StepIx: Sized + Copy + Eq;

    /// Create a new, empty path. Returns `None` if a path with the
    /// provided name already exists.
    fn create_path(&mut self, name: &[u8], circular: bool) -> Option<PathId>;

    /// Append a step on `handle` to the path. Returns `None` if the
    /// path or the node doesn't exist.
    fn path_append_step(
        &mut self,
        id: PathId,
        handle: Handle,
    ) -> Option<Self::StepIx>;
}
