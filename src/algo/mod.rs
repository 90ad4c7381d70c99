/*!
# Graph Algorithms

All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use wgraphs::algo::*;
```
and gain access to traversal, shortest paths, spanning trees, flows, structural decomposition,
ranking, ordering and the bounded combinatorial searches.

Every operation takes a [`Graph`] snapshot, validates its own preconditions and returns a
[`Result`](crate::error::Result) whose success value carries the caller's node and edge ids.
Operations with tunables are also available as builder structs (e.g. [`PageRank`],
[`HamiltonianSearch`]) configured before being run on a graph.
*/

mod astar;
mod bridges;
mod connectivity;
mod euler;
mod fixed_size;
mod hamiltonian;
mod network_flow;
mod pagerank;
mod shortest_path;
mod spanning_tree;
mod topological;
mod traversal;

use crate::{error::*, prelude::*, utils::*};
use itertools::Itertools;
use serde::Serialize;

pub use astar::*;
pub use bridges::*;
pub use connectivity::*;
pub use euler::*;
pub use fixed_size::*;
pub use hamiltonian::*;
pub use network_flow::*;
pub use pagerank::*;
pub use shortest_path::*;
pub use spanning_tree::*;
pub use topological::*;
pub use traversal::*;
