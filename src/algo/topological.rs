/*!
# Topological Sorting

Kahn's algorithm on directed graphs. The ready set is kept ordered by node id, so among all
nodes whose in-degree has dropped to zero the lexicographically smallest id is emitted next and
the result is reproducible regardless of edge order.

Besides the order itself, the sort records the [`TopoStep`]s it took, which is enough to replay
the algorithm one decision at a time.

```
use wgraphs::{prelude::*, algo::*};

let mut graph = Graph::directed();
for id in ["shirt", "tie", "jacket", "belt"] {
    graph.add_node(id).unwrap();
}
graph.add_edge("shirt", "tie", None).unwrap();
graph.add_edge("tie", "jacket", None).unwrap();
graph.add_edge("belt", "jacket", None).unwrap();

let sorted = topological_sort(&graph).unwrap();
assert_eq!(sorted.order, vec!["belt", "shirt", "tie", "jacket"]);
```
*/

use std::collections::{BTreeMap, BTreeSet};

use super::*;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TopoStep {
    /// In-degree of every node before anything is removed
    Init { in_degrees: BTreeMap<String, usize> },
    /// Nodes without incoming edges at the start
    Ready { nodes: Vec<String> },
    /// `node` was placed at `position` of the order
    Select { node: String, position: usize },
    /// The out-edges of `source` were removed
    UpdateDegrees {
        source: String,
        removed_edges: Vec<String>,
        /// New in-degree of every node that lost an edge, in edge order
        in_degrees: Vec<(String, usize)>,
        newly_ready: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologicalOrder {
    pub order: Vec<String>,
    pub steps: Vec<TopoStep>,
}

impl TopologicalOrder {
    /// Index of `id` in the order
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|x| x == id)
    }
}

/// Sorts a directed graph topologically.
///
/// Fails with `NotApplicable` for undirected graphs and with `CycleDetected`, listing the nodes
/// that could not be ordered, if the graph has a cycle.
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn topological_sort(graph: &Graph) -> Result<TopologicalOrder> {
    graph.require_nodes()?;
    if !graph.is_directed() {
        return Err(GraphError::not_applicable("topological sort", true));
    }

    let adj = Adjacency::of(graph);
    let mut in_degree = vec![0usize; graph.len()];
    for edge in graph.edges() {
        in_degree[edge.target() as usize] += 1;
    }

    let mut steps = vec![TopoStep::Init {
        in_degrees: graph
            .vertices()
            .map(|u| (graph.node_id(u).to_string(), in_degree[u as usize]))
            .collect(),
    }];

    let mut ready: BTreeSet<(&str, Node)> = graph
        .vertices()
        .filter(|&u| in_degree[u as usize] == 0)
        .map(|u| (graph.node_id(u), u))
        .collect();
    steps.push(TopoStep::Ready {
        nodes: ready.iter().map(|(id, _)| id.to_string()).collect(),
    });

    let mut order = Vec::with_capacity(graph.len());
    while let Some((id, u)) = ready.pop_first() {
        steps.push(TopoStep::Select {
            node: id.to_string(),
            position: order.len(),
        });
        order.push(u);

        let arcs = adj.arcs_of(u);
        if arcs.is_empty() {
            continue;
        }

        let mut changed = Vec::with_capacity(arcs.len());
        let mut newly_ready = Vec::new();
        for arc in arcs {
            let v = arc.target;
            in_degree[v as usize] -= 1;
            changed.push((graph.node_id(v).to_string(), in_degree[v as usize]));
            if in_degree[v as usize] == 0 {
                ready.insert((graph.node_id(v), v));
                newly_ready.push(graph.node_id(v).to_string());
            }
        }

        steps.push(TopoStep::UpdateDegrees {
            source: id.to_string(),
            removed_edges: graph.edge_ids(arcs.iter().map(|a| a.edge)),
            in_degrees: changed,
            newly_ready,
        });
    }

    if order.len() != graph.len() {
        let remaining = graph.node_ids(graph.vertices().filter(|&u| in_degree[u as usize] > 0));
        tracing::debug!(remaining = remaining.len(), "cycle prevents topological order");
        return Err(GraphError::CycleDetected { remaining });
    }

    tracing::debug!(steps = steps.len(), "topological sort finished");
    Ok(TopologicalOrder {
        order: graph.node_ids(order),
        steps,
    })
}

/// Returns *true* if the directed graph has no cycle
pub fn is_acyclic(graph: &Graph) -> Result<bool> {
    match topological_sort(graph) {
        Ok(_) => Ok(true),
        Err(GraphError::CycleDetected { .. }) => Ok(false),
        Err(err) => Err(err),
    }
}
