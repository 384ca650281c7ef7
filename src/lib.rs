/*!
Snarl decomposition and traversal finding for variation graphs.

# Overview

A snarl is a pair of oriented nodes in a bidirected sequence graph
that separate a piece of the graph from the rest, and that can't be
broken into smaller such pieces. Snarls nest, and snarls that share
a boundary form chains; this crate finds them, classifies them, and
enumerates walks ("traversals") through them.

The pieces, from the bottom up:

* [`handle`], [`handlegraph`], [`mutablehandlegraph`] and
  [`pathhandlegraph`] define the graph interface as a set of traits
  over oriented node handles, with [`HashGraph`](hashgraph::HashGraph)
  as the concrete graph that implements them
* [`snarls`] builds the snarl decomposition of a graph from its
  cactus graph, and stores it in a
  [`SnarlManager`](snarls::SnarlManager)
* [`path_index`] gives linear coordinates along an embedded path,
  which is used as the backbone when finding traversals
* [`support`] is read-depth support, and the providers that attach
  it to nodes and edges
* [`traversal`] holds the traversal finders

# Example

```
use snarlkit::{
    hashgraph::HashGraph,
    handle::{Edge, Handle},
    mutablehandlegraph::AdditiveHandleGraph,
    snarls::CactusSnarlFinder,
    traversal::ExhaustiveTraversalFinder,
};

let mut graph = HashGraph::new();
let h1 = graph.append_handle(b"GAT");
let h2 = graph.append_handle(b"TA");
let h3 = graph.append_handle(b"C");
let h4 = graph.append_handle(b"AGG");
graph.create_edge(Edge(h1, h2));
graph.create_edge(Edge(h1, h3));
graph.create_edge(Edge(h2, h4));
graph.create_edge(Edge(h3, h4));

let manager = CactusSnarlFinder::new(&graph).find_snarls().unwrap();
let site = manager.top_level_snarls()[0];

let finder = ExhaustiveTraversalFinder::new(&graph, &manager);
assert_eq!(finder.find_traversals(site).unwrap().len(), 2);
```
*/

pub mod handle;

pub mod handlegraph;
pub mod mutablehandlegraph;
pub mod pathhandlegraph;

pub mod hashgraph;

pub mod disjoint;
pub mod error;
pub mod util;

pub mod path_index;
pub mod snarls;
pub mod support;
pub mod traversal;
