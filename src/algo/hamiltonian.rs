/*!
# Hamiltonian cycles

Exhaustive backtracking from the first node. The search extends a simple path along unused
nodes and accepts it once it covers every node and an edge leads back to the start. It stops
after a configurable number of accepted cycles, or after the first one in
[`HamiltonianSearch::first_only`] mode.

Parallel edges do not multiply cycles: between two nodes only the first edge is followed. In
undirected graphs every cycle would be found once per direction; only the direction whose
second node precedes its last node (in node order) is reported.

```
use wgraphs::{prelude::*, algo::*};

let mut graph = Graph::undirected();
for id in ["A", "B", "C", "D"] {
    graph.add_node(id).unwrap();
}
for (u, v) in [("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")] {
    graph.add_edge(u, v, None).unwrap();
}

let result = HamiltonianSearch::new().run(&graph).unwrap();
assert_eq!(result.cycles.len(), 1);
assert_eq!(result.cycles[0].nodes, vec!["A", "B", "C", "D", "A"]);
```
*/

use super::*;
use crate::config::HamiltonianConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HamiltonianCycle {
    /// Starts and ends at the first node of the graph
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HamiltonianCycles {
    pub cycles: Vec<HamiltonianCycle>,
    /// *true* if the search stopped because the cycle limit was hit
    pub limit_reached: bool,
    /// Number of path extensions performed
    pub explored: usize,
}

/// Configurable Hamiltonian cycle enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HamiltonianSearch {
    max_cycles: usize,
}

impl Default for HamiltonianSearch {
    fn default() -> Self {
        Self::from_config(&HamiltonianConfig::default())
    }
}

impl HamiltonianSearch {
    /// Search reporting at most `100` cycles
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &HamiltonianConfig) -> Self {
        Self {
            max_cycles: config.max_cycles,
        }
    }

    /// Stop after `max_cycles` cycles; must be positive
    pub fn max_cycles(mut self, max_cycles: usize) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    /// Stop at the first cycle found
    pub fn first_only(self) -> Self {
        self.max_cycles(1)
    }

    /// Runs the search.
    ///
    /// Fails with `InsufficientVertices` below three nodes, with `EmptyGraph` if there are no
    /// edges and with `InvalidParameter` if the cycle limit is zero. Finding no cycle is not an
    /// error.
    #[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
    pub fn run(&self, graph: &Graph) -> Result<HamiltonianCycles> {
        graph.require_nodes()?;
        if graph.len() < 3 {
            return Err(GraphError::InsufficientVertices {
                required: 3,
                found: graph.len(),
            });
        }
        if graph.number_of_edges() == 0 {
            return Err(GraphError::EmptyGraph { reason: "no edges" });
        }
        if self.max_cycles == 0 {
            return Err(GraphError::invalid_parameter(
                "max cycles",
                "at least one cycle must be requested",
            ));
        }

        let neighbors = distinct_neighbors(&Adjacency::of(graph));
        let result = self.search(graph, &neighbors);

        tracing::debug!(
            cycles = result.cycles.len(),
            limit_reached = result.limit_reached,
            explored = result.explored,
            "hamiltonian search finished"
        );
        Ok(result)
    }

    fn search(&self, graph: &Graph, neighbors: &[Vec<Arc>]) -> HamiltonianCycles {
        let n = graph.len();
        let start: Node = 0;

        let mut on_path = NodeBitSet::new(graph.number_of_nodes());
        on_path.set_bit(start);
        let mut path = vec![start];
        let mut path_edges: Vec<NumEdges> = Vec::with_capacity(n);
        let mut frames: Vec<(Node, usize)> = vec![(start, 0)];

        let mut cycles = Vec::new();
        let mut limit_reached = false;
        let mut explored = 0;

        while let Some(frame) = frames.last_mut() {
            let (u, pos) = *frame;
            frame.1 += 1;

            if path.len() == n && pos == 0 {
                let closing = neighbors[u as usize].iter().find(|a| a.target == start);
                if let Some(closing) = closing
                    && (graph.is_directed() || path[1] < path[n - 1])
                {
                    cycles.push(HamiltonianCycle {
                        nodes: graph.node_ids(path.iter().copied().chain([start])),
                        edges: graph.edge_ids(path_edges.iter().copied().chain([closing.edge])),
                    });
                    if cycles.len() >= self.max_cycles {
                        limit_reached = true;
                        break;
                    }
                }
            }

            match neighbors[u as usize].get(pos) {
                Some(arc) if path.len() < n => {
                    if !on_path.get_bit(arc.target) {
                        explored += 1;
                        on_path.set_bit(arc.target);
                        path.push(arc.target);
                        path_edges.push(arc.edge);
                        frames.push((arc.target, 0));
                    }
                }
                _ => {
                    frames.pop();
                    if u != start {
                        on_path.clear_bit(u);
                        path.pop();
                        path_edges.pop();
                    }
                }
            }
        }

        HamiltonianCycles {
            cycles,
            limit_reached,
            explored,
        }
    }
}

/// Per node the first arc to every other node; self-loops are dropped
fn distinct_neighbors(adj: &Adjacency) -> Vec<Vec<Arc>> {
    let mut last_seen = vec![INVALID_NODE; adj.len()];
    adj.vertices()
        .map(|u| {
            adj.arcs_of(u)
                .iter()
                .filter(|arc| {
                    if arc.target == u || last_seen[arc.target as usize] == u {
                        return false;
                    }
                    last_seen[arc.target as usize] = u;
                    true
                })
                .copied()
                .collect()
        })
        .collect()
}

/// All Hamiltonian cycles through the first node, up to the default limit
pub fn hamiltonian_cycles(graph: &Graph) -> Result<HamiltonianCycles> {
    HamiltonianSearch::new().run(graph)
}

/// Any one Hamiltonian cycle
pub fn find_hamiltonian_cycle(graph: &Graph) -> Result<Option<HamiltonianCycle>> {
    Ok(HamiltonianSearch::new()
        .first_only()
        .run(graph)?
        .cycles
        .into_iter()
        .next())
}
