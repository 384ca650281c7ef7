/*!
Read support for nodes and edges.

A [`Support`] aggregates the read evidence for one graph element.
Along a path, supports are combined with [`support_min`], the
conservative choice; accumulation over several reads uses `+`.
Supports compare by their [`total`](Support::total), i.e. the sum
of the forward and reverse strand counts.
*/

use std::cmp::Ordering;
use std::ops::{Add, AddAssign};

use fnv::FnvHashMap;

use crate::handle::{Edge, NodeId};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Support {
    pub forward: f64,
    pub reverse: f64,
    pub left: f64,
    pub right: f64,
    pub quality: f64,
}

/// Build a support from strand counts and a quality.
#[inline]
pub fn make_support(forward: f64, reverse: f64, quality: f64) -> Support {
    Support {
        forward,
        reverse,
        quality,
        ..Support::default()
    }
}

impl Support {
    #[inline]
    pub fn total(&self) -> f64 {
        self.forward + self.reverse
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.total() == 0.0
    }
}

/// Componentwise minimum over the strand counts and quality.
#[inline]
pub fn support_min(a: &Support, b: &Support) -> Support {
    Support {
        forward: a.forward.min(b.forward),
        reverse: a.reverse.min(b.reverse),
        quality: a.quality.min(b.quality),
        ..Support::default()
    }
}

/// Componentwise maximum over the strand counts and quality.
#[inline]
pub fn support_max(a: &Support, b: &Support) -> Support {
    Support {
        forward: a.forward.max(b.forward),
        reverse: a.reverse.max(b.reverse),
        quality: a.quality.max(b.quality),
        ..Support::default()
    }
}

impl Add for Support {
    type Output = Support;

    #[inline]
    fn add(self, other: Support) -> Support {
        Support {
            forward: self.forward + other.forward,
            reverse: self.reverse + other.reverse,
            left: self.left + other.left,
            right: self.right + other.right,
            quality: self.quality + other.quality,
        }
    }
}

impl AddAssign for Support {
    #[inline]
    fn add_assign(&mut self, other: Support) {
        *self = *self + other;
    }
}

impl PartialOrd for Support {
    #[inline]
    fn partial_cmp(&self, other: &Support) -> Option<Ordering> {
        self.total().partial_cmp(&other.total())
    }
}

impl std::fmt::Display for Support {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.forward, self.reverse)
    }
}

/// Source of read support for the traversal finders.
///
/// When `has_supports` is false, the finders ignore the returned
/// supports when pruning, as all of them would be zero.
pub trait SupportProvider {
    fn has_supports(&self) -> bool;

    fn node_support(&self, id: NodeId) -> Support;

    /// Support for an edge; implementations must give an edge and
    /// its reverse the same support.
    fn edge_support(&self, edge: Edge) -> Support;
}

/// The provider for graphs without any read evidence.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSupports;

impl SupportProvider for NoSupports {
    #[inline]
    fn has_supports(&self) -> bool {
        false
    }

    #[inline]
    fn node_support(&self, _id: NodeId) -> Support {
        Support::default()
    }

    #[inline]
    fn edge_support(&self, _edge: Edge) -> Support {
        Support::default()
    }
}

/// In-memory supports, keyed by node ID and by canonical edge.
/// Elements without an entry have zero support.
#[derive(Debug, Default, Clone)]
pub struct SupportTable {
    nodes: FnvHashMap<NodeId, Support>,
    edges: FnvHashMap<Edge, Support>,
}

impl SupportTable {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set_node_support<I: Into<NodeId>>(&mut self, id: I, support: Support) {
        self.nodes.insert(id.into(), support);
    }

    pub fn set_edge_support(&mut self, edge: Edge, support: Support) {
        self.edges.insert(edge.canonical(), support);
    }

    /// Accumulate support on a node, e.g. one read at a time.
    pub fn add_node_support<I: Into<NodeId>>(&mut self, id: I, support: Support) {
        *self.nodes.entry(id.into()).or_default() += support;
    }

    pub fn add_edge_support(&mut self, edge: Edge, support: Support) {
        *self.edges.entry(edge.canonical()).or_default() += support;
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

impl SupportProvider for SupportTable {
    #[inline]
    fn has_supports(&self) -> bool {
        !self.is_empty()
    }

    #[inline]
    fn node_support(&self, id: NodeId) -> Support {
        self.nodes.get(&id).copied().unwrap_or_default()
    }

    #[inline]
    fn edge_support(&self, edge: Edge) -> Support {
        self.edges.get(&edge.canonical()).copied().unwrap_or_default()
    }
}

impl<'a, T: SupportProvider> SupportProvider for &'a T {
    #[inline]
    fn has_supports(&self) -> bool {
        T::has_supports(self)
    }

    #[inline]
    fn node_support(&self, id: NodeId) -> Support {
        T::node_support(self, id)
    }

    #[inline]
    fn edge_support(&self, edge: Edge) -> Support {
        T::edge_support(self, edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Handle;

    use quickcheck::{Arbitrary, Gen, QuickCheck};

    #[derive(Debug, Clone, Copy)]
    struct SmallSupport(Support);

    impl Arbitrary for SmallSupport {
        fn arbitrary<G: Gen>(g: &mut G) -> SmallSupport {
            let mut count = || (u16::arbitrary(g) % 100) as f64;
            SmallSupport(Support {
                forward: count(),
                reverse: count(),
                left: count(),
                right: count(),
                quality: count(),
            })
        }
    }

    fn min_max_bound(a: SmallSupport, b: SmallSupport) -> bool {
        let (a, b) = (a.0, b.0);
        let min = support_min(&a, &b);
        let max = support_max(&a, &b);

        min.total() <= a.total()
            && min.total() <= b.total()
            && max.total() >= a.total()
            && max.total() >= b.total()
            && min.quality <= a.quality.min(b.quality)
    }

    fn sum_totals_add(a: SmallSupport, b: SmallSupport) -> bool {
        let (a, b) = (a.0, b.0);
        let sum = a + b;
        sum.total() == a.total() + b.total()
            && sum.left == a.left + b.left
            && sum.right == a.right + b.right
    }

    #[test]
    fn support_algebra() {
        QuickCheck::new().tests(500).quickcheck(
            min_max_bound as fn(SmallSupport, SmallSupport) -> bool,
        );
        QuickCheck::new().tests(500).quickcheck(
            sum_totals_add as fn(SmallSupport, SmallSupport) -> bool,
        );
    }

    #[test]
    fn supports_compare_by_total() {
        let a = make_support(3.0, 1.0, 10.0);
        let b = make_support(0.0, 5.0, 1.0);
        assert!(a < b);
        assert_eq!(a.total(), 4.0);
        assert_eq!(format!("{}", a), "3,1");
    }

    #[test]
    fn table_edges_are_orientation_free() {
        let mut table = SupportTable::new();
        assert!(!table.has_supports());

        let edge = Edge(Handle::pack(1u64, false), Handle::pack(2u64, false));
        table.set_edge_support(edge, make_support(2.0, 2.0, 0.0));
        table.add_node_support(1u64, make_support(1.0, 0.0, 0.0));
        table.add_node_support(1u64, make_support(1.0, 1.0, 0.0));

        assert!(table.has_supports());
        assert_eq!(table.edge_support(edge.reverse()).total(), 4.0);
        assert_eq!(table.node_support(NodeId(1)).total(), 3.0);
        assert!(table.node_support(NodeId(2)).is_zero());
    }
}
