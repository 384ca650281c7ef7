use crate::handle::{Edge, Handle, NodeId};

/// Encapsulates adding handles and edges to a handlegraph. This is
/// the only kind of mutation the snarl algorithms need from a graph,
/// as the decomposition is computed on a finished graph.
pub trait AdditiveHandleGraph {
    /// Add a node with the provided sequence to the graph, letting
    /// the graph pick the node ID.
    fn append_handle(&mut self, sequence: &[u8]) -> Handle;

    /// Add a node with the provided sequence and ID to the graph.
    fn create_handle<T: Into<NodeId>>(
        &mut self,
        sequence: &[u8],
        node_id: T,
    ) -> Handle;

    /// Insert an edge into the graph. Edges that are already present,
    /// in either orientation, and edges on missing nodes are ignored.
    fn create_edge(&mut self, edge: Edge);
}
