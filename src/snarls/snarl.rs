use crate::handle::Handle;

use super::visit::SnarlBounds;

/// Index of a snarl in its manager's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SnarlId(pub usize);

impl std::fmt::Display for SnarlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a chain in its manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChainId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SnarlType {
    Unary,
    Ultrabubble,
    Unclassified,
}

impl std::fmt::Display for SnarlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SnarlType::Unary => "unary",
            SnarlType::Ultrabubble => "ultrabubble",
            SnarlType::Unclassified => "unclassified",
        };
        write!(f, "{}", name)
    }
}

/// The results of the reachability and acyclicity searches on a
/// snarl's net graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Connectivity {
    pub start_self_reachable: bool,
    pub end_self_reachable: bool,
    pub start_end_reachable: bool,
    pub directed_acyclic_net_graph: bool,
}

/// Decide the type of a snarl from its boundaries, its connectivity
/// and whether every child is an ultrabubble. The first matching
/// rule wins.
pub fn classify(
    bounds: SnarlBounds,
    connectivity: &Connectivity,
    children_are_ultrabubbles: bool,
) -> SnarlType {
    if bounds.is_unary() {
        SnarlType::Unary
    } else if !connectivity.start_end_reachable
        || connectivity.start_self_reachable
        || connectivity.end_self_reachable
        || !children_are_ultrabubbles
        || !connectivity.directed_acyclic_net_graph
    {
        SnarlType::Unclassified
    } else {
        SnarlType::Ultrabubble
    }
}

/// A classified snarl, as stored by the [`SnarlManager`](super::SnarlManager).
///
/// `start` and `end` are oriented so that reading `start`, then the
/// interior, then `end` is a walk through the snarl. The type can
/// only be set through [`classify`], so it always agrees with the
/// connectivity.
#[derive(Debug, Clone, PartialEq)]
pub struct Snarl {
    pub start: Handle,
    pub end: Handle,
    pub(crate) parent: Option<SnarlId>,
    snarl_type: SnarlType,
    connectivity: Connectivity,
}

impl Snarl {
    pub fn new(
        bounds: SnarlBounds,
        connectivity: Connectivity,
        children_are_ultrabubbles: bool,
    ) -> Self {
        let snarl_type =
            classify(bounds, &connectivity, children_are_ultrabubbles);
        Snarl {
            start: bounds.start,
            end: bounds.end,
            parent: None,
            snarl_type,
            connectivity,
        }
    }

    #[inline]
    pub fn bounds(&self) -> SnarlBounds {
        SnarlBounds::new(self.start, self.end)
    }

    #[inline]
    pub fn parent(&self) -> Option<SnarlId> {
        self.parent
    }

    #[inline]
    pub fn snarl_type(&self) -> SnarlType {
        self.snarl_type
    }

    #[inline]
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    #[inline]
    pub fn start_self_reachable(&self) -> bool {
        self.connectivity.start_self_reachable
    }

    #[inline]
    pub fn end_self_reachable(&self) -> bool {
        self.connectivity.end_self_reachable
    }

    #[inline]
    pub fn start_end_reachable(&self) -> bool {
        self.connectivity.start_end_reachable
    }

    #[inline]
    pub fn directed_acyclic_net_graph(&self) -> bool {
        self.connectivity.directed_acyclic_net_graph
    }

    #[inline]
    pub fn is_unary(&self) -> bool {
        self.snarl_type == SnarlType::Unary
    }

    #[inline]
    pub fn is_ultrabubble(&self) -> bool {
        self.snarl_type == SnarlType::Ultrabubble
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(start: u64, end: u64) -> SnarlBounds {
        SnarlBounds::new(Handle::pack(start, false), Handle::pack(end, false))
    }

    fn ultrabubble_connectivity() -> Connectivity {
        Connectivity {
            start_self_reachable: false,
            end_self_reachable: false,
            start_end_reachable: true,
            directed_acyclic_net_graph: true,
        }
    }

    #[test]
    fn unary_wins_over_everything() {
        let b = SnarlBounds::new(
            Handle::pack(3u64, false),
            Handle::pack(3u64, true),
        );
        let conn = Connectivity::default();
        assert_eq!(classify(b, &conn, false), SnarlType::Unary);
    }

    #[test]
    fn each_conjunct_is_needed() {
        let b = bounds(1, 4);
        let good = ultrabubble_connectivity();
        assert_eq!(classify(b, &good, true), SnarlType::Ultrabubble);

        let mut no_through = good;
        no_through.start_end_reachable = false;
        assert_eq!(classify(b, &no_through, true), SnarlType::Unclassified);

        let mut start_loop = good;
        start_loop.start_self_reachable = true;
        assert_eq!(classify(b, &start_loop, true), SnarlType::Unclassified);

        let mut end_loop = good;
        end_loop.end_self_reachable = true;
        assert_eq!(classify(b, &end_loop, true), SnarlType::Unclassified);

        assert_eq!(classify(b, &good, false), SnarlType::Unclassified);

        let mut cyclic = good;
        cyclic.directed_acyclic_net_graph = false;
        assert_eq!(classify(b, &cyclic, true), SnarlType::Unclassified);
    }

    #[test]
    fn snarl_records_its_type() {
        let snarl = Snarl::new(bounds(2, 7), ultrabubble_connectivity(), true);
        assert!(snarl.is_ultrabubble());
        assert_eq!(snarl.bounds(), bounds(2, 7));
        assert_eq!(snarl.parent(), None);
    }
}
