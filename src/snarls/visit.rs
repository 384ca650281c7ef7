use std::cmp::Ordering;

use crate::handle::{Handle, NodeId};

/// The boundary pair that identifies a snarl, independently of the
/// manager that owns the snarl record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnarlBounds {
    pub start: Handle,
    pub end: Handle,
}

impl SnarlBounds {
    #[inline]
    pub fn new(start: Handle, end: Handle) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn is_unary(&self) -> bool {
        self.start.id() == self.end.id()
    }
}

/// A single step of a traversal: either an oriented node, or an
/// oriented child snarl that's stepped over as a unit.
///
/// A backward snarl visit enters the snarl through its end and
/// leaves through its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visit {
    Node(Handle),
    Snarl { bounds: SnarlBounds, backward: bool },
}

impl Visit {
    #[inline]
    pub fn node(handle: Handle) -> Self {
        Visit::Node(handle)
    }

    #[inline]
    pub fn snarl(bounds: SnarlBounds, backward: bool) -> Self {
        Visit::Snarl { bounds, backward }
    }

    #[inline]
    pub fn is_node(&self) -> bool {
        matches!(self, Visit::Node(_))
    }

    #[inline]
    pub fn handle(&self) -> Option<Handle> {
        match self {
            Visit::Node(h) => Some(*h),
            Visit::Snarl { .. } => None,
        }
    }

    #[inline]
    pub fn node_id(&self) -> Option<NodeId> {
        self.handle().map(Handle::id)
    }

    #[inline]
    pub fn bounds(&self) -> Option<SnarlBounds> {
        match self {
            Visit::Node(_) => None,
            Visit::Snarl { bounds, .. } => Some(*bounds),
        }
    }

    #[inline]
    pub fn is_backward(&self) -> bool {
        match self {
            Visit::Node(h) => h.is_reverse(),
            Visit::Snarl { backward, .. } => *backward,
        }
    }

    /// The same visit, traversed in the opposite direction.
    #[inline]
    pub fn reverse(&self) -> Self {
        match *self {
            Visit::Node(h) => Visit::Node(h.flip()),
            Visit::Snarl { bounds, backward } => Visit::Snarl {
                bounds,
                backward: !backward,
            },
        }
    }

    /// The boundary handle read when the visit begins.
    #[inline]
    pub fn entry_handle(&self) -> Handle {
        match *self {
            Visit::Node(h) => h,
            Visit::Snarl { bounds, backward } => {
                if backward {
                    bounds.end.flip()
                } else {
                    bounds.start
                }
            }
        }
    }

    /// The boundary handle read when the visit ends; the visit
    /// continues along the edges on its right side.
    #[inline]
    pub fn exit_handle(&self) -> Handle {
        match *self {
            Visit::Node(h) => h,
            Visit::Snarl { bounds, backward } => {
                if backward {
                    bounds.start.flip()
                } else {
                    bounds.end
                }
            }
        }
    }
}

impl From<Handle> for Visit {
    #[inline]
    fn from(handle: Handle) -> Visit {
        Visit::Node(handle)
    }
}

impl std::fmt::Display for Visit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visit::Node(h) => write!(f, "{}", h),
            Visit::Snarl { bounds, backward } => {
                let orient = if *backward { '-' } else { '+' };
                write!(f, "({}, {}){}", bounds.start, bounds.end, orient)
            }
        }
    }
}

/// Node visits sort before snarl visits. Node visits are ordered by
/// node ID, then forward before reverse; snarl visits by their
/// boundaries, then forward before backward.
impl Ord for Visit {
    fn cmp(&self, other: &Visit) -> Ordering {
        match (self, other) {
            (Visit::Node(a), Visit::Node(b)) => a
                .id()
                .cmp(&b.id())
                .then(a.is_reverse().cmp(&b.is_reverse())),
            (Visit::Node(_), Visit::Snarl { .. }) => Ordering::Less,
            (Visit::Snarl { .. }, Visit::Node(_)) => Ordering::Greater,
            (
                Visit::Snarl {
                    bounds: a,
                    backward: a_back,
                },
                Visit::Snarl {
                    bounds: b,
                    backward: b_back,
                },
            ) => a.cmp(b).then(a_back.cmp(b_back)),
        }
    }
}

impl PartialOrd for Visit {
    #[inline]
    fn partial_cmp(&self, other: &Visit) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
