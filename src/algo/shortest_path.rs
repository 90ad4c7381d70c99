/*!
# Shortest paths

- [`dijkstra`]: single pair, non-negative weights, binary heap with early stop at the target.
- [`bellman_ford`]: single source, arbitrary weights, reports the actual negative cycle if one
  is reachable from the source.
- [`bellman_ford_path`], [`detect_negative_cycle`] and [`longest_path_dag`] are built on the
  same relaxation core.

Missing weights count as `1` throughout. Undirected edges are relaxed in both directions.
*/

use std::{cmp::Ordering, collections::BinaryHeap};

use super::*;
use crate::error::CycleEdge;

/// Weight used by all shortest path searches for an edge without weight
pub const DEFAULT_PATH_WEIGHT: Weight = 1.0;

/// A single source-target path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortestPath {
    pub source: String,
    pub target: String,
    /// Nodes from `source` to `target`
    pub path: Vec<String>,
    /// Edge ids along `path`; for parallel edges the cheapest one is chosen
    pub edges: Vec<String>,
    pub distance: Weight,
    /// Number of nodes expanded before the target was taken from the queue (Dijkstra/A*), or
    /// reached at all (Bellman-Ford)
    pub nodes_explored: usize,
}

/// Predecessor of a node in a shortest path tree: `(previous node, edge used)`
pub(crate) type Predecessor = Option<(Node, NumEdges)>;

/// Walks the predecessor array back from `target`
pub(crate) fn trace_back(pred: &[Predecessor], target: Node) -> (Vec<Node>, Vec<NumEdges>) {
    let mut nodes = vec![target];
    let mut edges = Vec::new();
    let mut cur = target;
    while let Some((prev, e)) = pred[cur as usize] {
        nodes.push(prev);
        edges.push(e);
        cur = prev;
    }
    nodes.reverse();
    edges.reverse();
    (nodes, edges)
}

fn path_weight_fn(graph: &Graph) -> impl Fn(NumEdges) -> Weight + '_ {
    |e| graph.edge(e).weight_or(DEFAULT_PATH_WEIGHT)
}

pub(crate) fn reject_negative_weights(graph: &Graph, algorithm: &'static str) -> Result<()> {
    match graph.edges().iter().find(|e| e.weight_or(0.0) < 0.0) {
        Some(edge) => Err(GraphError::invalid_parameter(
            "edge weight",
            format!("{algorithm} cannot handle the negative weight of edge {}", edge.id),
        )),
        None => Ok(()),
    }
}

/// Dijkstra's algorithm between `source` and `target`.
///
/// Of several nodes with equal tentative distance the one inserted into the graph first is
/// finalized first. Fails with `InvalidParameter` on negative weights and with `NoPathFound`
/// if `target` is unreachable.
///
/// ```
/// use wgraphs::{prelude::*, algo::*};
///
/// let mut graph = Graph::directed();
/// for id in ["A", "B", "C"] {
///     graph.add_node(id).unwrap();
/// }
/// graph.add_edge("A", "B", 1.0).unwrap();
/// graph.add_edge("B", "C", 2.0).unwrap();
/// graph.add_edge("A", "C", 10.0).unwrap();
///
/// let result = dijkstra(&graph, "A", "C").unwrap();
/// assert_eq!(result.path, vec!["A", "B", "C"]);
/// assert_eq!(result.distance, 3.0);
/// ```
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn dijkstra(graph: &Graph, source: &str, target: &str) -> Result<ShortestPath> {
    graph.require_nodes()?;
    let s = graph.node(source)?;
    let t = graph.node(target)?;
    reject_negative_weights(graph, "Dijkstra")?;

    let adj = Adjacency::of(graph);
    let weight = path_weight_fn(graph);

    let n = graph.len();
    let mut dist = vec![Weight::INFINITY; n];
    let mut pred: Vec<Predecessor> = vec![None; n];
    let mut finalized = NodeBitSet::new(graph.number_of_nodes());
    let mut heap = BinaryHeap::new();
    let mut explored = 0;

    dist[s as usize] = 0.0;
    heap.push(MinScored::new(0.0, s));

    while let Some(MinScored { score, key: u }) = heap.pop() {
        if finalized.set_bit(u) {
            continue;
        }
        if u == t {
            break;
        }
        explored += 1;

        for arc in adj.arcs_of(u) {
            let v = arc.target;
            if finalized.get_bit(v) {
                continue;
            }

            let nd = score + weight(arc.edge);
            if nd < dist[v as usize] {
                dist[v as usize] = nd;
                pred[v as usize] = Some((u, arc.edge));
                heap.push(MinScored::new(nd, v));
            }
        }
    }

    if dist[t as usize].is_infinite() {
        return Err(GraphError::no_path(source, target));
    }

    let (nodes, edges) = trace_back(&pred, t);
    tracing::debug!(distance = dist[t as usize], explored, "dijkstra finished");

    Ok(ShortestPath {
        source: source.to_string(),
        target: target.to_string(),
        path: graph.node_ids(nodes),
        edges: graph.edge_ids(edges),
        distance: dist[t as usize],
        nodes_explored: explored,
    })
}

/// State after running the relaxation passes
struct Relaxation {
    dist: Vec<Weight>,
    pred: Vec<Predecessor>,
    passes: usize,
    /// Some node whose distance could still be lowered after all passes
    unstable: Option<Node>,
}

/// Bellman-Ford relaxation from all `sources` (each at distance 0).
/// Performs at most `max_passes` passes and stops early once a pass changes nothing.
fn relax<W>(graph: &Graph, sources: &[Node], max_passes: usize, weight: W) -> Relaxation
where
    W: Fn(NumEdges) -> Weight,
{
    let adj = Adjacency::of(graph);
    let n = graph.len();

    let mut dist = vec![Weight::INFINITY; n];
    let mut pred: Vec<Predecessor> = vec![None; n];
    for &s in sources {
        dist[s as usize] = 0.0;
    }

    let relax_pass = |dist: &mut Vec<Weight>, pred: &mut Vec<Predecessor>| {
        let mut changed = None;
        for u in graph.vertices() {
            let du = dist[u as usize];
            if du.is_infinite() {
                continue;
            }
            for arc in adj.arcs_of(u) {
                let nd = du + weight(arc.edge);
                if nd < dist[arc.target as usize] {
                    dist[arc.target as usize] = nd;
                    pred[arc.target as usize] = Some((u, arc.edge));
                    changed = Some(arc.target);
                }
            }
        }
        changed
    };

    let mut passes = 0;
    let mut stable = false;
    while passes < max_passes {
        passes += 1;
        if relax_pass(&mut dist, &mut pred).is_none() {
            stable = true;
            break;
        }
    }

    let unstable = if stable {
        None
    } else {
        relax_pass(&mut dist, &mut pred)
    };

    Relaxation {
        dist,
        pred,
        passes,
        unstable,
    }
}

/// Extracts the cycle hanging off the predecessor chain of an unstable node
fn negative_cycle_edges(graph: &Graph, pred: &[Predecessor], unstable: Node) -> Vec<CycleEdge> {
    // n steps back along the predecessors are guaranteed to end inside the cycle
    let mut x = unstable;
    for _ in 0..graph.len() {
        match pred[x as usize] {
            Some((prev, _)) => x = prev,
            None => break,
        }
    }

    let mut cycle = Vec::new();
    let mut cur = x;
    while let Some((prev, e)) = pred[cur as usize] {
        cycle.push((prev, cur, e));
        cur = prev;
        if cur == x || cycle.len() > graph.len() {
            break;
        }
    }
    cycle.reverse();

    cycle
        .into_iter()
        .map(|(u, v, e)| {
            let edge = graph.edge(e);
            CycleEdge {
                id: edge.id.clone(),
                source: graph.node_id(u).to_string(),
                target: graph.node_id(v).to_string(),
                weight: edge.weight_or(DEFAULT_PATH_WEIGHT),
            }
        })
        .collect()
}

/// Distance and path from the Bellman-Ford source to one reachable node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathEntry {
    pub target: String,
    pub distance: Weight,
    pub path: Vec<String>,
    pub edges: Vec<String>,
}

/// Result of [`bellman_ford`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BellmanFordResult {
    pub source: String,
    /// Paths to every other reachable node, shortest first
    pub paths: Vec<PathEntry>,
    /// Nodes without any path from `source`
    pub unreachable: Vec<String>,
    /// Relaxation passes performed before the distances were stable
    pub passes: usize,
}

impl BellmanFordResult {
    /// Distance to `id`, `None` if unreachable or unknown
    pub fn distance_to(&self, id: &str) -> Option<Weight> {
        if id == self.source {
            return Some(0.0);
        }
        self.paths
            .iter()
            .find(|p| p.target == id)
            .map(|p| p.distance)
    }
}

fn run_single_source<W>(graph: &Graph, s: Node, weight: W) -> Result<Relaxation>
where
    W: Fn(NumEdges) -> Weight,
{
    let run = relax(graph, &[s], graph.len().saturating_sub(1), weight);

    if let Some(unstable) = run.unstable {
        let edges = negative_cycle_edges(graph, &run.pred, unstable);
        tracing::debug!(cycle_len = edges.len(), "negative cycle detected");
        return Err(GraphError::NegativeCycleDetected { edges });
    }

    Ok(run)
}

/// Bellman-Ford shortest paths from `source` to all nodes.
///
/// Fails with `NegativeCycleDetected`, carrying the cycle's edges in traversal order, if a
/// negative cycle is reachable from `source`. In undirected graphs any negative edge is such a
/// cycle, as it can be traversed back and forth.
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn bellman_ford(graph: &Graph, source: &str) -> Result<BellmanFordResult> {
    graph.require_nodes()?;
    let s = graph.node(source)?;

    let run = run_single_source(graph, s, path_weight_fn(graph))?;

    let mut paths = Vec::new();
    let mut unreachable = Vec::new();
    for v in graph.vertices().filter(|&v| v != s) {
        if run.dist[v as usize].is_infinite() {
            unreachable.push(graph.node_id(v).to_string());
            continue;
        }

        let (nodes, edges) = trace_back(&run.pred, v);
        paths.push(PathEntry {
            target: graph.node_id(v).to_string(),
            distance: run.dist[v as usize],
            path: graph.node_ids(nodes),
            edges: graph.edge_ids(edges),
        });
    }
    paths.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    tracing::debug!(
        reachable = paths.len(),
        passes = run.passes,
        "bellman-ford finished"
    );

    Ok(BellmanFordResult {
        source: source.to_string(),
        paths,
        unreachable,
        passes: run.passes,
    })
}

/// Bellman-Ford restricted to one target
pub fn bellman_ford_path(graph: &Graph, source: &str, target: &str) -> Result<ShortestPath> {
    graph.require_nodes()?;
    let s = graph.node(source)?;
    let t = graph.node(target)?;

    let run = run_single_source(graph, s, path_weight_fn(graph))?;
    if run.dist[t as usize].is_infinite() {
        return Err(GraphError::no_path(source, target));
    }

    let (nodes, edges) = trace_back(&run.pred, t);
    Ok(ShortestPath {
        source: source.to_string(),
        target: target.to_string(),
        path: graph.node_ids(nodes),
        edges: graph.edge_ids(edges),
        distance: run.dist[t as usize],
        nodes_explored: run.dist.iter().filter(|d| d.is_finite()).count(),
    })
}

/// Searches the whole graph for a negative cycle, regardless of reachability from any node.
/// Returns the cycle's edges or `None`.
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn detect_negative_cycle(graph: &Graph) -> Result<Option<Vec<CycleEdge>>> {
    graph.require_nodes()?;

    // all nodes at distance 0 act as a virtual source connected to everything
    let sources = graph.vertices().collect_vec();
    let run = relax(graph, &sources, graph.len(), path_weight_fn(graph));

    Ok(run
        .unstable
        .map(|u| negative_cycle_edges(graph, &run.pred, u)))
}

/// Longest path between `source` and `target` of a directed acyclic graph.
///
/// Runs the Bellman-Ford core on negated weights. Fails with `NotApplicable` for undirected
/// graphs and with `CycleDetected` if the graph is not acyclic.
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn longest_path_dag(graph: &Graph, source: &str, target: &str) -> Result<ShortestPath> {
    graph.require_nodes()?;
    if !graph.is_directed() {
        return Err(GraphError::not_applicable("longest path", true));
    }
    let s = graph.node(source)?;
    let t = graph.node(target)?;
    topological_sort(graph)?;

    let run = run_single_source(graph, s, |e| {
        -graph.edge(e).weight_or(DEFAULT_PATH_WEIGHT)
    })?;
    if run.dist[t as usize].is_infinite() {
        return Err(GraphError::no_path(source, target));
    }

    let (nodes, edges) = trace_back(&run.pred, t);
    Ok(ShortestPath {
        source: source.to_string(),
        target: target.to_string(),
        path: graph.node_ids(nodes),
        edges: graph.edge_ids(edges),
        distance: -run.dist[t as usize] + 0.0,
        nodes_explored: run.dist.iter().filter(|d| d.is_finite()).count(),
    })
}

/// Compares two distances for equality up to floating point noise
pub(crate) fn same_distance(a: Weight, b: Weight) -> bool {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0),
        _ => a.partial_cmp(&b) == Some(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, testing::*};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn dijkstra_prefers_cheaper_detour() {
        let graph = weighted_graph(
            true,
            &["A", "B", "C"],
            &[("A", "B", 1.0), ("B", "C", 2.0), ("A", "C", 10.0)],
        );

        let result = dijkstra(&graph, "A", "C").unwrap();
        assert_eq!(result.path, vec!["A", "B", "C"]);
        assert_eq!(result.edges, vec!["A-B", "B-C"]);
        assert_eq!(result.distance, 3.0);
    }

    #[test]
    fn dijkstra_picks_cheapest_parallel_edge() {
        let graph = weighted_graph(
            false,
            &["A", "B"],
            &[("A", "B", 5.0), ("B", "A", 2.0), ("A", "B", 3.0)],
        );

        let result = dijkstra(&graph, "B", "A").unwrap();
        assert_eq!(result.edges, vec!["B-A"]);
        assert_eq!(result.distance, 2.0);
    }

    #[test]
    fn dijkstra_missing_weight_is_one() {
        let graph = unweighted_graph(false, &["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        assert_eq!(dijkstra(&graph, "C", "A").unwrap().distance, 2.0);
    }

    #[test]
    fn dijkstra_errors() {
        let graph = weighted_graph(true, &["A", "B", "C"], &[("A", "B", 1.0)]);
        assert_eq!(
            dijkstra(&graph, "B", "A").unwrap_err().kind(),
            ErrorKind::NoPathFound
        );
        assert_eq!(
            dijkstra(&graph, "A", "X").unwrap_err().kind(),
            ErrorKind::NoSuchVertex
        );

        let negative = weighted_graph(true, &["A", "B"], &[("A", "B", -1.0)]);
        assert_eq!(
            dijkstra(&negative, "A", "B").unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );

        let trivial = dijkstra(&graph, "C", "C").unwrap();
        assert_eq!(trivial.path, vec!["C"]);
        assert_eq!(trivial.distance, 0.0);
    }

    #[test]
    fn bellman_ford_handles_negative_edges() {
        let graph = weighted_graph(
            true,
            &["S", "A", "B", "X"],
            &[("S", "A", 4.0), ("S", "B", 2.0), ("A", "B", -3.0)],
        );

        let result = bellman_ford(&graph, "S").unwrap();
        assert_eq!(result.distance_to("B"), Some(1.0));
        assert_eq!(result.distance_to("A"), Some(4.0));
        assert_eq!(result.unreachable, vec!["X"]);
        assert_eq!(result.paths[0].target, "B");
        assert_eq!(result.paths[0].path, vec!["S", "A", "B"]);

        let single = bellman_ford_path(&graph, "S", "B").unwrap();
        assert_eq!(single.edges, vec!["S-A", "A-B"]);
        assert_eq!(
            bellman_ford_path(&graph, "S", "X").unwrap_err().kind(),
            ErrorKind::NoPathFound
        );
    }

    #[test]
    fn bellman_ford_reports_negative_cycle() {
        let graph = weighted_graph(
            true,
            &["S", "A", "B", "C"],
            &[("S", "A", 1.0), ("A", "B", -1.0), ("B", "C", -1.0), ("C", "A", -1.0)],
        );

        let GraphError::NegativeCycleDetected { edges } = bellman_ford(&graph, "S").unwrap_err()
        else {
            panic!("expected a negative cycle");
        };

        assert_eq!(edges.len(), 3);
        let mut ids = edges.iter().map(|e| e.id.clone()).collect_vec();
        ids.sort();
        assert_eq!(ids, vec!["A-B", "B-C", "C-A"]);
        // consecutive edges are chained
        for (a, b) in edges.iter().circular_tuple_windows() {
            assert_eq!(a.target, b.source);
        }
        assert_eq!(edges.iter().map(|e| e.weight).sum::<f64>(), -3.0);
    }

    #[test]
    fn unreachable_negative_cycle() {
        let graph = weighted_graph(
            true,
            &["S", "T", "A", "B"],
            &[("S", "T", 1.0), ("A", "B", -2.0), ("B", "A", 1.0)],
        );

        // invisible from S
        assert!(bellman_ford(&graph, "S").is_ok());

        let cycle = detect_negative_cycle(&graph).unwrap().unwrap();
        assert_eq!(cycle.len(), 2);

        let dag = weighted_graph(true, &["A", "B"], &[("A", "B", -2.0)]);
        assert!(detect_negative_cycle(&dag).unwrap().is_none());
    }

    #[test]
    fn undirected_negative_edge_is_a_cycle() {
        let graph = weighted_graph(false, &["A", "B"], &[("A", "B", -1.0)]);
        assert_eq!(
            bellman_ford(&graph, "A").unwrap_err().kind(),
            ErrorKind::NegativeCycleDetected
        );
    }

    #[test]
    fn longest_path() {
        let graph = weighted_graph(
            true,
            &["A", "B", "C", "D"],
            &[("A", "B", 1.0), ("B", "D", 1.0), ("A", "C", 2.0), ("C", "D", 3.0)],
        );

        let result = longest_path_dag(&graph, "A", "D").unwrap();
        assert_eq!(result.path, vec!["A", "C", "D"]);
        assert_eq!(result.distance, 5.0);

        let mut undirected = graph.clone();
        undirected.set_directed(false);
        assert_eq!(
            longest_path_dag(&undirected, "A", "D").unwrap_err().kind(),
            ErrorKind::NotApplicable
        );

        let cyclic = weighted_graph(true, &["A", "B"], &[("A", "B", 1.0), ("B", "A", 1.0)]);
        assert_eq!(
            longest_path_dag(&cyclic, "A", "B").unwrap_err().kind(),
            ErrorKind::CycleDetected
        );
    }

    #[test]
    fn dijkstra_agrees_with_bellman_ford() {
        let rng = &mut Pcg64Mcg::seed_from_u64(11);
        for directed in [false, true] {
            for _ in 0..25 {
                let graph = Gnp::new()
                    .nodes(12)
                    .directed(directed)
                    .prob(0.25)
                    .weights(1, 9)
                    .generate(rng)
                    .unwrap();
                let bf = bellman_ford(&graph, "A").unwrap();

                for node in graph.nodes().iter().skip(1) {
                    match dijkstra(&graph, "A", &node.id) {
                        Ok(path) => {
                            let expected = bf.distance_to(&node.id).unwrap();
                            assert!(same_distance(path.distance, expected));

                            let sum: f64 = path
                                .edges
                                .iter()
                                .map(|id| {
                                    graph.edges().iter().find(|e| &e.id == id).unwrap().weight_or(1.0)
                                })
                                .sum();
                            assert!(same_distance(sum, path.distance));
                        }
                        Err(err) => {
                            assert_eq!(err.kind(), ErrorKind::NoPathFound);
                            assert!(bf.unreachable.contains(&node.id));
                        }
                    }
                }
            }
        }
    }
}
