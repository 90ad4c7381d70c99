/*!
# A* search

Point-to-point shortest path guided by the straight-line distance between node positions. Every
node must carry a position; a graph that is only partially laid out is rejected up front instead
of silently treating the missing heuristic as `0`.

```
use wgraphs::{prelude::*, algo::*};

let mut graph = Graph::undirected();
graph.add_node_at("A", 0.0, 0.0).unwrap();
graph.add_node_at("B", 1.0, 0.0).unwrap();
graph.add_node_at("C", 2.0, 0.0).unwrap();
graph.add_edge("A", "B", 1.0).unwrap();
graph.add_edge("B", "C", 1.0).unwrap();

let result = AStar::new().heuristic(Heuristic::Manhattan).run(&graph, "A", "C").unwrap();
assert_eq!(result.path, vec!["A", "B", "C"]);
assert_eq!(result.distance, 2.0);
```
*/

use std::collections::BinaryHeap;

use super::{
    shortest_path::{reject_negative_weights, same_distance, trace_back},
    *,
};

/// Distance estimate between a node and the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    #[default]
    Euclidean,
    Manhattan,
}

impl Heuristic {
    pub fn estimate(&self, from: &Point, to: &Point) -> f64 {
        match self {
            Heuristic::Euclidean => from.euclidean(to),
            Heuristic::Manhattan => from.manhattan(to),
        }
    }
}

/// Configurable A* search
#[derive(Debug, Clone, Copy, Default)]
pub struct AStar {
    heuristic: Heuristic,
}

impl AStar {
    /// A* with the euclidean heuristic
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Searches a shortest path from `source` to `target`.
    ///
    /// The open node with the smallest `f = g + h` is expanded next; of equal `f` the one queued
    /// first wins. Expanded nodes are never reopened.
    #[tracing::instrument(skip(self, graph), fields(nodes = graph.number_of_nodes(), heuristic = ?self.heuristic))]
    pub fn run(&self, graph: &Graph, source: &str, target: &str) -> Result<ShortestPath> {
        graph.require_nodes()?;
        let s = graph.node(source)?;
        let t = graph.node(target)?;
        reject_negative_weights(graph, "A*")?;

        let positions = positions_of(graph)?;
        let goal = positions[t as usize];
        let h = |u: Node| self.heuristic.estimate(&positions[u as usize], &goal);

        let adj = Adjacency::of(graph);
        let n = graph.len();
        let mut g_score = vec![Weight::INFINITY; n];
        let mut came_from: Vec<Option<(Node, NumEdges)>> = vec![None; n];
        let mut closed = NodeBitSet::new(graph.number_of_nodes());

        // key is (queue sequence, node); the sequence realizes first-seen tie breaking
        let mut open = BinaryHeap::new();
        let mut sequence: u64 = 0;
        let mut explored = 0;

        g_score[s as usize] = 0.0;
        open.push(MinScored::new(h(s), (sequence, s)));

        while let Some(MinScored { key: (_, u), .. }) = open.pop() {
            if closed.set_bit(u) {
                continue;
            }
            if u == t {
                break;
            }
            explored += 1;

            for arc in adj.arcs_of(u) {
                let v = arc.target;
                if closed.get_bit(v) {
                    continue;
                }

                let tentative = g_score[u as usize] + graph.edge(arc.edge).weight_or(DEFAULT_PATH_WEIGHT);
                if tentative < g_score[v as usize] {
                    g_score[v as usize] = tentative;
                    came_from[v as usize] = Some((u, arc.edge));
                    sequence += 1;
                    open.push(MinScored::new(tentative + h(v), (sequence, v)));
                }
            }
        }

        if !closed.get_bit(t) {
            return Err(GraphError::no_path(source, target));
        }

        let (nodes, edges) = trace_back(&came_from, t);

        tracing::debug!(distance = g_score[t as usize], explored, "a* finished");

        Ok(ShortestPath {
            source: source.to_string(),
            target: target.to_string(),
            path: graph.node_ids(nodes),
            edges: graph.edge_ids(edges),
            distance: g_score[t as usize],
            nodes_explored: explored,
        })
    }
}

fn positions_of(graph: &Graph) -> Result<Vec<Point>> {
    graph
        .vertices()
        .map(|u| {
            graph.position(u).ok_or_else(|| {
                GraphError::invalid_parameter(
                    "position",
                    format!("A* needs a position for every node, {} has none", graph.node_id(u)),
                )
            })
        })
        .collect()
}

/// Shorthand for `AStar::new().heuristic(heuristic).run(..)`
pub fn astar(graph: &Graph, source: &str, target: &str, heuristic: Heuristic) -> Result<ShortestPath> {
    AStar::new().heuristic(heuristic).run(graph, source, target)
}

/// A* and Dijkstra run on the same query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchComparison {
    pub astar: ShortestPath,
    pub dijkstra: ShortestPath,
    /// Whether both found a path of the same length
    pub same_distance: bool,
}

impl SearchComparison {
    /// Number of expansions A* saved compared to Dijkstra (negative if it needed more)
    pub fn explored_saving(&self) -> i64 {
        self.dijkstra.nodes_explored as i64 - self.astar.nodes_explored as i64
    }
}

/// Runs A* and Dijkstra between the same pair of nodes
pub fn compare_astar_dijkstra(
    graph: &Graph,
    source: &str,
    target: &str,
    heuristic: Heuristic,
) -> Result<SearchComparison> {
    let astar = astar(graph, source, target, heuristic)?;
    let dijkstra = dijkstra(graph, source, target)?;

    Ok(SearchComparison {
        same_distance: same_distance(astar.distance, dijkstra.distance),
        astar,
        dijkstra,
    })
}
