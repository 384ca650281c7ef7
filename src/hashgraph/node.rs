/*!

`HashGraph` node definition and occurrence iterator

*/

use crate::handle::Handle;
use crate::pathhandlegraph::PathId;

#[derive(Debug, Clone)]
pub struct Node {
    pub sequence: Vec<u8>,
    pub left_edges: Vec<Handle>,
    pub right_edges: Vec<Handle>,
    pub occurrences: Vec<(PathId, usize)>,
}

impl Node {
    pub fn new(sequence: &[u8]) -> Node {
        Node {
            sequence: sequence.into(),
            left_edges: vec![],
            right_edges: vec![],
            occurrences: vec![],
        }
    }
}

/// Iterator on the path occurrences of a node
pub struct OccurIter<'a> {
    pub(super) iter: std::slice::Iter<'a, (PathId, usize)>,
}

impl<'a> Iterator for OccurIter<'a> {
    type Item = (PathId, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().copied()
    }
}
