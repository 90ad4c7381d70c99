/*!
# Maximum Flow (Edmonds-Karp)

Edge weights are capacities; an edge without weight has capacity `0`. Every edge becomes a pair
of residual arcs. In a directed graph the backward arc starts with capacity `0` and only serves
to cancel flow; in an undirected graph both arcs carry the full capacity, so the edge can be
used in either direction.

Each round runs a BFS over arcs with positive residual capacity from the source. If the sink is
reached, the bottleneck along the BFS path is pushed through it. Once the sink is unreachable
the nodes still reached form the source side of a minimum cut.

```
use wgraphs::{prelude::*, algo::*};

let mut graph = Graph::directed();
for id in ["s", "A", "B", "t"] {
    graph.add_node(id).unwrap();
}
graph.add_edge("s", "A", 3.0).unwrap();
graph.add_edge("A", "t", 3.0).unwrap();
graph.add_edge("s", "B", 2.0).unwrap();
graph.add_edge("B", "t", 2.0).unwrap();

let flow = edmonds_karp(&graph, "s", "t").unwrap();
assert_eq!(flow.max_flow, 5.0);
assert_eq!(flow.min_cut.capacity, 5.0);
```
*/

use std::collections::VecDeque;

use super::*;

/// Residual capacities at or below this are treated as saturated
const FLOW_EPSILON: f64 = 1e-12;

/// Flow assigned to one edge of the input graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeFlow {
    pub id: String,
    /// Endpoint the flow leaves; for undirected edges this follows the direction of the flow
    pub source: String,
    pub target: String,
    pub flow: f64,
    pub capacity: f64,
}

/// One augmentation round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentingPath {
    pub nodes: Vec<String>,
    pub bottleneck: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinCut {
    /// Nodes still reachable from the source in the final residual network
    pub source_side: Vec<String>,
    /// Edges leaving the source side
    pub edges: Vec<String>,
    pub capacity: f64,
}

/// Result of [`edmonds_karp`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaxFlow {
    pub source: String,
    pub sink: String,
    pub max_flow: f64,
    /// Flow of every edge in edge order
    pub edge_flows: Vec<EdgeFlow>,
    pub augmenting_paths: Vec<AugmentingPath>,
    pub min_cut: MinCut,
}

impl MaxFlow {
    /// Edges carrying positive flow
    pub fn used_edges(&self) -> impl Iterator<Item = &EdgeFlow> + '_ {
        self.edge_flows.iter().filter(|e| e.flow > FLOW_EPSILON)
    }
}

#[derive(Debug, Clone, Copy)]
struct ResidualArc {
    target: Node,
    capacity: f64,
    flow: f64,
}

impl ResidualArc {
    fn residual(&self) -> f64 {
        self.capacity - self.flow
    }
}

/// Residual network with arcs `2e` (along edge `e`) and `2e + 1` (against it)
struct ResidualNetwork {
    arcs: Vec<ResidualArc>,
    out_arcs: Vec<Vec<usize>>,
}

impl ResidualNetwork {
    fn new(graph: &Graph) -> Result<Self> {
        let mut arcs = Vec::with_capacity(2 * graph.edges().len());
        let mut out_arcs = vec![Vec::new(); graph.len()];

        for edge in graph.edges() {
            let capacity = edge.weight_or(0.0);
            if capacity < 0.0 {
                return Err(GraphError::invalid_parameter(
                    "capacity",
                    format!("edge {} has negative capacity {capacity}", edge.id),
                ));
            }

            let Edge(u, v) = edge.endpoints;
            let backward = if graph.is_directed() { 0.0 } else { capacity };

            out_arcs[u as usize].push(arcs.len());
            arcs.push(ResidualArc {
                target: v,
                capacity,
                flow: 0.0,
            });
            out_arcs[v as usize].push(arcs.len());
            arcs.push(ResidualArc {
                target: u,
                capacity: backward,
                flow: 0.0,
            });
        }

        Ok(Self { arcs, out_arcs })
    }

    /// BFS over arcs with positive residual capacity. Returns for every reached node the arc it
    /// was reached by (`None` for the source) and whether `sink` was reached.
    fn bfs(&self, source: Node, sink: Node) -> (Vec<Option<Option<usize>>>, bool) {
        let mut parent_arc = vec![None; self.out_arcs.len()];
        parent_arc[source as usize] = Some(None);

        let mut queue = VecDeque::from([source]);
        while let Some(u) = queue.pop_front() {
            if u == sink {
                return (parent_arc, true);
            }

            for &a in &self.out_arcs[u as usize] {
                let arc = self.arcs[a];
                if parent_arc[arc.target as usize].is_none() && arc.residual() > FLOW_EPSILON {
                    parent_arc[arc.target as usize] = Some(Some(a));
                    queue.push_back(arc.target);
                }
            }
        }

        (parent_arc, false)
    }

    /// Arcs of the path from the source to `sink` in source-to-sink order
    fn path_arcs(&self, parent_arc: &[Option<Option<usize>>], sink: Node) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cur = sink;
        while let Some(Some(a)) = parent_arc[cur as usize] {
            path.push(a);
            // the twin of arc `a` points back to its tail
            cur = self.arcs[a ^ 1].target;
        }
        path.reverse();
        path
    }

    fn augment(&mut self, path: &[usize], amount: f64) {
        for &a in path {
            self.arcs[a].flow += amount;
            self.arcs[a ^ 1].flow -= amount;
        }
    }
}

/// Computes a maximum flow from `source` to `sink`.
///
/// Fails with `InvalidParameter` if `source == sink` or some capacity is negative.
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn edmonds_karp(graph: &Graph, source: &str, sink: &str) -> Result<MaxFlow> {
    graph.require_nodes()?;
    let s = graph.node(source)?;
    let t = graph.node(sink)?;
    if s == t {
        return Err(GraphError::invalid_parameter(
            "sink",
            format!("source and sink must differ, both are {source}"),
        ));
    }

    let mut network = ResidualNetwork::new(graph)?;
    let mut max_flow = 0.0;
    let mut augmenting_paths = Vec::new();

    let source_side = loop {
        let (parent_arc, reached_sink) = network.bfs(s, t);
        if !reached_sink {
            break parent_arc;
        }

        let path = network.path_arcs(&parent_arc, t);
        let bottleneck = path
            .iter()
            .map(|&a| network.arcs[a].residual())
            .fold(f64::INFINITY, f64::min);

        network.augment(&path, bottleneck);
        max_flow += bottleneck;

        tracing::trace!(bottleneck, length = path.len(), "augmented");
        augmenting_paths.push(AugmentingPath {
            nodes: graph.node_ids(
                std::iter::once(s).chain(path.iter().map(|&a| network.arcs[a].target)),
            ),
            bottleneck,
        });
    };

    let edge_flows = graph
        .edges()
        .iter()
        .enumerate()
        .map(|(e, edge)| {
            let flow = network.arcs[2 * e].flow;
            let (u, v) = if flow < 0.0 {
                (edge.target(), edge.source())
            } else {
                (edge.source(), edge.target())
            };
            EdgeFlow {
                id: edge.id.clone(),
                source: graph.node_id(u).to_string(),
                target: graph.node_id(v).to_string(),
                flow: flow.abs(),
                capacity: network.arcs[2 * e].capacity,
            }
        })
        .collect_vec();

    let in_source_side = |u: Node| source_side[u as usize].is_some();
    let cut_edges = graph
        .edges()
        .iter()
        .filter(|edge| {
            let (u, v) = (edge.source(), edge.target());
            (in_source_side(u) && !in_source_side(v))
                || (!graph.is_directed() && in_source_side(v) && !in_source_side(u))
        })
        .collect_vec();

    let min_cut = MinCut {
        source_side: graph.node_ids(graph.vertices().filter(|&u| in_source_side(u))),
        capacity: cut_edges.iter().map(|e| e.weight_or(0.0)).sum(),
        edges: cut_edges.iter().map(|e| e.id.clone()).collect(),
    };

    tracing::debug!(
        max_flow,
        rounds = augmenting_paths.len(),
        "edmonds-karp finished"
    );

    Ok(MaxFlow {
        source: source.to_string(),
        sink: sink.to_string(),
        max_flow,
        edge_flows,
        augmenting_paths,
        min_cut,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, testing::*};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn two_disjoint_routes() {
        let graph = weighted_graph(
            true,
            &["s", "A", "B", "t"],
            &[("s", "A", 3.0), ("A", "t", 3.0), ("s", "B", 2.0), ("B", "t", 2.0)],
        );

        let flow = edmonds_karp(&graph, "s", "t").unwrap();
        assert_eq!(flow.max_flow, 5.0);
        assert_eq!(flow.augmenting_paths.len(), 2);
        assert_eq!(flow.augmenting_paths[0].nodes, vec!["s", "A", "t"]);
        assert_eq!(flow.augmenting_paths[0].bottleneck, 3.0);
        assert!(flow.edge_flows.iter().all(|e| e.flow == e.capacity));
        assert_eq!(flow.min_cut.source_side, vec!["s"]);
        assert_eq!(flow.min_cut.edges, vec!["s-A", "s-B"]);
    }

    #[test]
    fn diamond_with_cross_edge() {
        let graph = weighted_graph(
            true,
            &["s", "A", "B", "t"],
            &[
                ("s", "A", 1.0),
                ("s", "B", 1.0),
                ("A", "B", 1.0),
                ("A", "t", 1.0),
                ("B", "t", 1.0),
            ],
        );

        let flow = edmonds_karp(&graph, "s", "t").unwrap();
        assert_eq!(flow.max_flow, 2.0);
        for edge in &flow.edge_flows {
            assert!(edge.flow <= edge.capacity);
        }
    }

    #[test]
    fn conservation_holds() {
        let rng = &mut Pcg64Mcg::seed_from_u64(21);
        for directed in [true, false] {
            for _ in 0..20 {
                let graph = Gnp::new()
                    .nodes(8)
                    .directed(directed)
                    .prob(0.35)
                    .weights(1, 6)
                    .generate(rng)
                    .unwrap();
                let flow = edmonds_karp(&graph, "A", "H").unwrap();

                let mut balance = vec![0.0; graph.len()];
                for edge in &flow.edge_flows {
                    assert!(edge.flow <= edge.capacity + 1e-9);
                    balance[graph.node(&edge.source).unwrap() as usize] -= edge.flow;
                    balance[graph.node(&edge.target).unwrap() as usize] += edge.flow;
                }

                assert!((balance[0] + flow.max_flow).abs() < 1e-9);
                assert!((balance[7] - flow.max_flow).abs() < 1e-9);
                for b in &balance[1..7] {
                    assert!(b.abs() < 1e-9);
                }
            }
        }
    }

    /// The flow value must match the cheapest of all `2^(n-2)` source/sink cuts
    #[test]
    fn max_flow_equals_min_cut() {
        let rng = &mut Pcg64Mcg::seed_from_u64(8);
        for directed in [true, false] {
            for _ in 0..20 {
                let n = 7;
                let graph = Gnp::new()
                    .nodes(n)
                    .directed(directed)
                    .prob(0.4)
                    .weights(1, 9)
                    .generate(rng)
                    .unwrap();
                let flow = edmonds_karp(&graph, "A", "G").unwrap();

                let best = (0u32..1 << (n - 2))
                    .map(|mask| {
                        let in_s = |u: Node| u == 0 || (u != 6 && mask & (1 << (u - 1)) != 0);
                        graph
                            .edges()
                            .iter()
                            .filter(|e| {
                                let (u, v) = (e.source(), e.target());
                                (in_s(u) && !in_s(v)) || (!directed && in_s(v) && !in_s(u))
                            })
                            .map(|e| e.weight_or(0.0))
                            .sum::<f64>()
                    })
                    .fold(f64::INFINITY, f64::min);

                assert_eq!(flow.max_flow, best);
                assert_eq!(flow.min_cut.capacity, best);
            }
        }
    }

    #[test]
    fn undirected_edges_carry_flow_both_ways() {
        let graph = weighted_graph(false, &["s", "A", "t"], &[("A", "s", 4.0), ("t", "A", 1.0)]);

        let flow = edmonds_karp(&graph, "s", "t").unwrap();
        assert_eq!(flow.max_flow, 1.0);

        let first = &flow.edge_flows[0];
        assert_eq!((first.source.as_str(), first.target.as_str()), ("s", "A"));
        assert_eq!(first.flow, 1.0);
        assert_eq!(flow.used_edges().count(), 2);
    }

    #[test]
    fn missing_capacity_is_zero() {
        let graph = unweighted_graph(true, &["s", "t"], &[("s", "t")]);
        let flow = edmonds_karp(&graph, "s", "t").unwrap();
        assert_eq!(flow.max_flow, 0.0);
        assert!(flow.augmenting_paths.is_empty());
    }

    #[test]
    fn invalid_inputs() {
        let graph = weighted_graph(true, &["s", "t"], &[("s", "t", -1.0)]);
        assert_eq!(
            edmonds_karp(&graph, "s", "t").unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            edmonds_karp(&graph, "s", "s").unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            edmonds_karp(&graph, "s", "x").unwrap_err().kind(),
            ErrorKind::NoSuchVertex
        );
    }
}
