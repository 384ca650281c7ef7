/*!
Traversal finding: enumerating walks through a snarl, from its start
to its end, as sequences of [`Visit`]s.

* [`RepresentativeTraversalFinder`] finds the backbone traversal plus
  one alternate for every bubble of off-backbone material
* [`TrivialTraversalFinder`] finds a single walk through an
  ultrabubble
* [`ExhaustiveTraversalFinder`] finds every walk, stepping over child
  snarls

[`TraversalFinder`] wraps the three strategies behind a single
`find_traversals` method.
*/

use crate::{
    error::Result,
    handlegraph::HandleGraphRef,
    snarls::{SnarlId, Visit},
    support::{NoSupports, SupportProvider},
};

pub mod exhaustive;
pub mod representative;
pub mod trivial;

pub use self::exhaustive::ExhaustiveTraversalFinder;
pub use self::representative::RepresentativeTraversalFinder;
pub use self::trivial::TrivialTraversalFinder;

/// A walk through a snarl, from its start to its end inclusive.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnarlTraversal {
    pub visits: Vec<Visit>,
}

impl SnarlTraversal {
    pub fn new(visits: Vec<Visit>) -> Self {
        SnarlTraversal { visits }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Visit> {
        self.visits.iter()
    }

    /// The same walk read in the opposite direction.
    pub fn reversed(&self) -> Self {
        SnarlTraversal {
            visits: self.visits.iter().rev().map(|v| v.reverse()).collect(),
        }
    }
}

impl From<Vec<Visit>> for SnarlTraversal {
    fn from(visits: Vec<Visit>) -> Self {
        SnarlTraversal { visits }
    }
}

impl std::fmt::Display for SnarlTraversal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for visit in self.visits.iter() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}", visit)?;
            first = false;
        }
        Ok(())
    }
}

/// Bounds on the bubble search of the representative finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Partial paths of up to this many visits can be extended.
    pub max_depth: usize,
    /// The most partial paths that can be queued at once.
    pub max_width: usize,
    /// The most left/right combinations tried for each bubble.
    pub max_bubble_paths: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_depth: 1000,
            max_width: 1000,
            max_bubble_paths: 100,
        }
    }
}

impl SearchLimits {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn max_bubble_paths(mut self, max_bubble_paths: usize) -> Self {
        self.max_bubble_paths = max_bubble_paths;
        self
    }
}

/// The traversal finding strategies.
pub enum TraversalFinder<'a, G, S = NoSupports> {
    Trivial(TrivialTraversalFinder<'a, G>),
    Exhaustive(ExhaustiveTraversalFinder<'a, G>),
    Representative(RepresentativeTraversalFinder<'a, G, S>),
}

impl<'a, G, S> TraversalFinder<'a, G, S>
where
    G: HandleGraphRef,
    S: SupportProvider,
{
    pub fn find_traversals(&self, site: SnarlId) -> Result<Vec<SnarlTraversal>> {
        match self {
            TraversalFinder::Trivial(finder) => finder.find_traversals(site),
            TraversalFinder::Exhaustive(finder) => {
                finder.find_traversals(site)
            }
            TraversalFinder::Representative(finder) => {
                finder.find_traversals(site)
            }
        }
    }
}

impl<'a, G> From<TrivialTraversalFinder<'a, G>> for TraversalFinder<'a, G> {
    fn from(finder: TrivialTraversalFinder<'a, G>) -> Self {
        TraversalFinder::Trivial(finder)
    }
}

impl<'a, G> From<ExhaustiveTraversalFinder<'a, G>> for TraversalFinder<'a, G> {
    fn from(finder: ExhaustiveTraversalFinder<'a, G>) -> Self {
        TraversalFinder::Exhaustive(finder)
    }
}

impl<'a, G, S> From<RepresentativeTraversalFinder<'a, G, S>>
    for TraversalFinder<'a, G, S>
{
    fn from(finder: RepresentativeTraversalFinder<'a, G, S>) -> Self {
        TraversalFinder::Representative(finder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Handle;
    use crate::snarls::SnarlBounds;

    use quickcheck::{Arbitrary, Gen, QuickCheck};

    impl Arbitrary for SnarlTraversal {
        fn arbitrary<G: Gen>(g: &mut G) -> SnarlTraversal {
            SnarlTraversal::new(Vec::<Visit>::arbitrary(g))
        }
    }

    fn double_reverse_is_identity(trav: SnarlTraversal) -> bool {
        trav.reversed().reversed() == trav
    }

    #[test]
    fn traversal_reversal() {
        QuickCheck::new().tests(500).quickcheck(
            double_reverse_is_identity as fn(SnarlTraversal) -> bool,
        );
    }

    #[test]
    fn reversed_flips_every_visit() {
        let h = |x: u64| Handle::pack(x, false);
        let child = Visit::snarl(SnarlBounds::new(h(2), h(5)), false);
        let trav = SnarlTraversal::new(vec![Visit::Node(h(1)), child, Visit::Node(h(6))]);
        let rev = trav.reversed();
        assert_eq!(
            rev.visits,
            vec![Visit::Node(h(6).flip()), child.reverse(), Visit::Node(h(1).flip())]
        );
        assert_eq!(format!("{}", trav), "1+,(2+, 5+)+,6+");
    }

    #[test]
    fn default_limits() {
        let limits = SearchLimits::default().max_depth(1);
        assert_eq!(limits.max_depth, 1);
        assert_eq!(limits.max_width, 1000);
        assert_eq!(limits.max_bubble_paths, 100);
    }
}
