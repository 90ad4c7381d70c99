/*!
`wgraphs` is the algorithm engine behind an interactive graph editor. It works on graphs that are
- **w**eighted : Edges may carry an `f64` weight (or capacity); whether a missing weight counts
  as `1`, `0` or an error is decided per algorithm
- **l**abelled : Nodes and edges are identified by the caller's string ids
- **d**irected or undirected : A single flag per graph decides how every edge is read

# Representation

A [`Graph`](crate::graph::Graph) is an immutable-per-call snapshot of the editor state. Internally,
**nodes** are dense `u32` indices in the range `0..n` (assigned in insertion order) and **edges**
are addressed by their insertion index; the caller's ids only reappear in results.

Algorithms never walk the edge list directly. They build an [`Adjacency`](crate::ops::Adjacency)
view under an explicit [`Orientation`](crate::ops::Orientation), so an undirected graph
consistently exposes every edge in both directions.

# Design

Every operation is a pure function of its graph snapshot and parameters: it validates its own
preconditions, returns a [`Result`](crate::error::Result) and never mutates the input.
Operations with tunables (PageRank, Hamiltonian search, the brute-force enumerations, A*) are also
available as configurable structs that one can alter using the *Builder* pattern before running
them on a graph, optionally initialised from an [`EngineConfig`](crate::config::EngineConfig).

# Usage

There are *4* core submodules you probably want to interact with:
- [`prelude`] includes definitions for nodes, edges, the graph snapshot and adjacency views,
- [`algo`] includes all algorithms: traversal, shortest paths, spanning trees, maximum flow,
  structural decompositions, topological sorting, PageRank, Euler/Hamiltonian cycles and the
  fixed-size brute-force searches,
- [`gens`] includes random weighted graph generators (complete graphs, trees, cycles, ...),
- [`error`] includes the structured [`GraphError`](crate::error::GraphError) every operation
  reports on failure.

In most use-cases, `use wgraphs::{prelude::*, algo::*};` suffices for your needs.

```
use wgraphs::{prelude::*, algo::*};

let mut graph = Graph::directed();
for id in ["A", "B", "C"] {
    graph.add_node(id).unwrap();
}
graph.add_edge("A", "B", 1.0).unwrap();
graph.add_edge("B", "C", 2.0).unwrap();
graph.add_edge("A", "C", 10.0).unwrap();

let path = dijkstra(&graph, "A", "C").unwrap();
assert_eq!(path.path, vec!["A", "B", "C"]);
assert_eq!(path.distance, 3.0);
```

# Logging

The engine emits `tracing` spans and events but never installs a subscriber itself; hosts can use
[`logging::init_tracing`] for a ready-made one.
*/

pub mod algo;
pub mod config;
pub mod edge;
pub mod error;
pub mod gens;
pub mod graph;
pub mod logging;
pub mod node;
pub mod ops;
#[cfg(test)]
pub(crate) mod testing;
pub mod utils;

/// `wgraphs::prelude` includes definitions for nodes and edges, the graph snapshot and all basic
/// graph operation traits.
pub mod prelude {
    pub use super::{edge::*, graph::*, node::*, ops::*};
}
