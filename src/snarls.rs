/*!
Snarl decomposition of bidirected graphs.

A snarl is a region of the graph bounded by two oriented nodes, its
`start` and `end`, such that the region is separated from the rest
of the graph by the two boundaries. Snarls nest: the interior of a
snarl can contain child snarls, which are arranged end to end in
chains.

* [`CactusSnarlFinder`] decomposes a graph into its snarl tree
* [`SnarlManager`] owns the tree and answers queries on it
* [`NetGraph`] is the view of a snarl's interior, with each child
  chain collapsed into a single node, that snarls are classified on
* [`Visit`] is a step in a traversal, either a node or a child snarl
*/

pub mod cactus;
pub mod finder;
pub mod manager;
pub mod net_graph;
pub mod snarl;
pub mod visit;

pub use self::finder::CactusSnarlFinder;
pub use self::manager::SnarlManager;
pub use self::net_graph::NetGraph;
pub use self::snarl::{classify, ChainId, Connectivity, Snarl, SnarlId, SnarlType};
pub use self::visit::{SnarlBounds, Visit};
