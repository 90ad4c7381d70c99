/*!
# Brute-force searches over fixed-size selections

- [`FourVertexPath`]: the cheapest route visiting four distinct nodes one after another, where
  consecutive nodes are joined by their shortest connecting path.
- [`SpanningTreeEnumeration`]: every spanning tree of a small undirected graph, found by testing
  all `(n-1)`-edge subsets.

Both are combinatorial in the input size. Before doing any work they compute the number of
candidates they would test and refuse with `InvalidParameter` if it exceeds the configured
limit.
*/

use super::{traversal::require_weakly_connected, *};
use crate::{
    config::EnumerationConfig,
    utils::combinatorics::{arrangements_capped, binomial_capped, combinations, permutations},
};

/// Number of waypoints visited by [`FourVertexPath`]
pub const WAYPOINTS: usize = 4;

/// Which visiting orders of a chosen set of four nodes are considered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaypointOrder {
    /// Any order of the four nodes
    #[default]
    Free,
    /// Only the order in which the nodes appear in the graph
    AsListed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaypointPath {
    /// The four chosen nodes in visiting order
    pub waypoints: Vec<String>,
    /// All nodes along the route, including intermediate ones
    pub path: Vec<String>,
    /// Edge ids along `path`; the lightest of parallel edges is used
    pub edges: Vec<String>,
    pub total_weight: Weight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaypointSearch {
    /// `None` if no four nodes can be visited in sequence
    pub best: Option<WaypointPath>,
    pub orderings_checked: u64,
}

/// All-pairs distances with successor matrix for path reconstruction
struct AllPairs {
    n: usize,
    dist: Vec<Weight>,
    next: Vec<Node>,
    /// Lightest edge per ordered node pair
    lightest: Vec<Option<NumEdges>>,
}

impl AllPairs {
    /// Floyd-Warshall over the graph's arcs
    fn new(graph: &Graph) -> Self {
        let n = graph.len();
        let mut dist = vec![Weight::INFINITY; n * n];
        let mut next = vec![INVALID_NODE; n * n];
        let mut lightest: Vec<Option<NumEdges>> = vec![None; n * n];

        for u in graph.vertices() {
            dist[u as usize * n + u as usize] = 0.0;
            next[u as usize * n + u as usize] = u;
        }

        let adj = Adjacency::of(graph);
        for u in graph.vertices() {
            for arc in adj.arcs_of(u) {
                let idx = u as usize * n + arc.target as usize;
                let w = graph.edge(arc.edge).weight_or(Weight::INFINITY);
                let lighter = lightest[idx].is_none_or(|e| w < graph.edge(e).weight_or(Weight::INFINITY));
                if lighter {
                    lightest[idx] = Some(arc.edge);
                }
                if u != arc.target && w < dist[idx] {
                    dist[idx] = w;
                    next[idx] = arc.target;
                }
            }
        }

        for k in 0..n {
            for i in 0..n {
                let dik = dist[i * n + k];
                if dik.is_infinite() {
                    continue;
                }
                for j in 0..n {
                    let candidate = dik + dist[k * n + j];
                    if candidate < dist[i * n + j] {
                        dist[i * n + j] = candidate;
                        next[i * n + j] = next[i * n + k];
                    }
                }
            }
        }

        Self {
            n,
            dist,
            next,
            lightest,
        }
    }

    fn distance(&self, u: Node, v: Node) -> Weight {
        self.dist[u as usize * self.n + v as usize]
    }

    /// Appends the nodes after `u` on the shortest `u`-`v` path and the edges used
    fn expand(&self, u: Node, v: Node, nodes: &mut Vec<Node>, edges: &mut Vec<NumEdges>) {
        let mut cur = u;
        while cur != v {
            let step = self.next[cur as usize * self.n + v as usize];
            if let Some(e) = self.lightest[cur as usize * self.n + step as usize] {
                edges.push(e);
            }
            nodes.push(step);
            cur = step;
        }
    }
}

/// Configurable search for the cheapest four-node route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FourVertexPath {
    order: WaypointOrder,
    max_orderings: u64,
}

impl Default for FourVertexPath {
    fn default() -> Self {
        Self::from_config(&EnumerationConfig::default())
    }
}

impl FourVertexPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EnumerationConfig) -> Self {
        Self {
            order: WaypointOrder::default(),
            max_orderings: config.max_vertex_orderings,
        }
    }

    pub fn order(mut self, order: WaypointOrder) -> Self {
        self.order = order;
        self
    }

    /// Refuse graphs that would require testing more orderings than this
    pub fn max_orderings(mut self, max_orderings: u64) -> Self {
        self.max_orderings = max_orderings;
        self
    }

    /// Finds the four nodes `p1..p4` minimizing `d(p1,p2) + d(p2,p3) + d(p3,p4)`.
    ///
    /// Requires at least four nodes (`InsufficientVertices`), a weight on every edge
    /// (`MissingWeight`) and no negative cycle (`NegativeCycleDetected`). Of equally cheap routes
    /// the first one enumerated wins; sets of nodes are enumerated in node order.
    #[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
    pub fn run(&self, graph: &Graph) -> Result<WaypointSearch> {
        graph.require_nodes()?;
        if graph.len() < WAYPOINTS {
            return Err(GraphError::InsufficientVertices {
                required: WAYPOINTS,
                found: graph.len(),
            });
        }
        graph.require_weights()?;
        if let Some(edges) = detect_negative_cycle(graph)? {
            return Err(GraphError::NegativeCycleDetected { edges });
        }

        let (n, k, cap) = (graph.len() as u64, WAYPOINTS as u64, self.max_orderings as u128);
        let total = match self.order {
            WaypointOrder::Free => arrangements_capped(n, k, cap),
            WaypointOrder::AsListed => binomial_capped(n, k, cap),
        };
        if total.is_none() {
            return Err(GraphError::invalid_parameter(
                "graph size",
                format!(
                    "{} nodes need more than {} orderings",
                    graph.len(),
                    self.max_orderings
                ),
            ));
        }

        let apsp = AllPairs::new(graph);
        let nodes = graph.vertices().collect_vec();

        let mut best: Option<(Weight, Vec<Node>)> = None;
        let mut checked = 0u64;
        let mut consider = |route: Vec<Node>| {
            checked += 1;
            let weight: Weight = route
                .iter()
                .tuple_windows()
                .map(|(&u, &v)| apsp.distance(u, v))
                .sum();
            if weight.is_finite() && best.as_ref().is_none_or(|(w, _)| weight < *w) {
                best = Some((weight, route));
            }
        };

        for chosen in combinations(&nodes, WAYPOINTS) {
            match self.order {
                WaypointOrder::Free => permutations(&chosen, WAYPOINTS).for_each(&mut consider),
                WaypointOrder::AsListed => consider(chosen),
            }
        }

        let best = best.map(|(total_weight, waypoints)| {
            let mut path = vec![waypoints[0]];
            let mut edges = Vec::new();
            for (&u, &v) in waypoints.iter().tuple_windows() {
                apsp.expand(u, v, &mut path, &mut edges);
            }
            WaypointPath {
                waypoints: graph.node_ids(waypoints),
                path: graph.node_ids(path),
                edges: graph.edge_ids(edges),
                total_weight,
            }
        });

        tracing::debug!(
            checked,
            found = best.is_some(),
            "four-vertex search finished"
        );

        Ok(WaypointSearch {
            best,
            orderings_checked: checked,
        })
    }
}

/// Cheapest four-node route over any visiting order, with the default limits
pub fn min_weighted_path_four_vertices(graph: &Graph) -> Result<WaypointSearch> {
    FourVertexPath::new().run(graph)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanningTrees {
    /// Trees in the order of their edge subsets
    pub trees: Vec<SpanningTree>,
    pub subsets_checked: u64,
}

impl SpanningTrees {
    /// Some tree of least total weight
    pub fn minimum(&self) -> Option<&SpanningTree> {
        self.trees
            .iter()
            .min_by(|a, b| a.total_weight.total_cmp(&b.total_weight))
    }
}

/// Configurable enumeration of all spanning trees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanningTreeEnumeration {
    max_edge_subsets: u64,
}

impl Default for SpanningTreeEnumeration {
    fn default() -> Self {
        Self::from_config(&EnumerationConfig::default())
    }
}

impl SpanningTreeEnumeration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EnumerationConfig) -> Self {
        Self {
            max_edge_subsets: config.max_edge_subsets,
        }
    }

    /// Refuse graphs with more `(n-1)`-edge subsets than this
    pub fn max_edge_subsets(mut self, max_edge_subsets: u64) -> Self {
        self.max_edge_subsets = max_edge_subsets;
        self
    }

    /// Lists every spanning tree of an undirected graph.
    ///
    /// Missing weights count as `0` in the reported tree weights. Fails with `NotApplicable` for
    /// directed graphs, with `DisconnectedGraph` if there is no spanning tree at all and with
    /// `InvalidParameter` if there are too many subsets to test.
    #[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
    pub fn run(&self, graph: &Graph) -> Result<SpanningTrees> {
        graph.require_nodes()?;
        if graph.is_directed() {
            return Err(GraphError::not_applicable("spanning tree enumeration", false));
        }
        require_weakly_connected(graph)?;

        let tree_size = graph.len() - 1;
        let m = graph.number_of_edges() as u64;
        if binomial_capped(m, tree_size as u64, self.max_edge_subsets as u128).is_none() {
            return Err(GraphError::invalid_parameter(
                "graph size",
                format!(
                    "choosing {tree_size} of {m} edges gives more than {} subsets",
                    self.max_edge_subsets
                ),
            ));
        }

        let edges = (0..graph.number_of_edges()).collect_vec();
        let mut trees = Vec::new();
        let mut checked = 0u64;

        for subset in combinations(&edges, tree_size) {
            checked += 1;
            let mut sets = UnionFind::new(graph.len());
            let acyclic = subset.iter().all(|&e| {
                let Edge(u, v) = graph.edge(e).endpoints;
                sets.union(u, v)
            });
            // n-1 edges without a cycle always span
            if acyclic {
                trees.push(SpanningTree::from_edges(graph, subset));
            }
        }

        tracing::debug!(checked, trees = trees.len(), "spanning tree enumeration finished");

        Ok(SpanningTrees {
            trees,
            subsets_checked: checked,
        })
    }
}

/// All spanning trees with the default limits
pub fn all_spanning_trees(graph: &Graph) -> Result<SpanningTrees> {
    SpanningTreeEnumeration::new().run(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algo::shortest_path::same_distance, error::ErrorKind, testing::*};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn path_graph_route() {
        let graph = weighted_graph(
            false,
            &["A", "B", "C", "D"],
            &[("A", "B", 1.0), ("B", "C", 2.0), ("C", "D", 3.0), ("A", "D", 10.0)],
        );

        let result = min_weighted_path_four_vertices(&graph).unwrap();
        assert_eq!(result.orderings_checked, 24);

        let best = result.best.unwrap();
        assert_eq!(best.waypoints, vec!["A", "B", "C", "D"]);
        assert_eq!(best.total_weight, 6.0);
        assert_eq!(best.edges, vec!["A-B", "B-C", "C-D"]);
    }

    #[test]
    fn route_through_intermediate_nodes() {
        // the cheap way from B to C leads through the hub H
        let graph = weighted_graph(
            true,
            &["A", "B", "C", "D", "H"],
            &[
                ("A", "B", 1.0),
                ("B", "H", 1.0),
                ("H", "C", 1.0),
                ("B", "C", 5.0),
                ("C", "D", 1.0),
            ],
        );

        let best = FourVertexPath::new()
            .order(WaypointOrder::AsListed)
            .run(&graph)
            .unwrap();
        assert_eq!(best.orderings_checked, 5);

        let best = best.best.unwrap();
        assert_eq!(best.waypoints, vec!["A", "B", "C", "D"]);
        assert_eq!(best.path, vec!["A", "B", "H", "C", "D"]);
        assert_eq!(best.edges, vec!["A-B", "B-H", "H-C", "C-D"]);
        assert_eq!(best.total_weight, 4.0);
    }

    #[test]
    fn lightest_parallel_edge_is_reported() {
        let graph = weighted_graph(
            false,
            &["A", "B", "C", "D"],
            &[("A", "B", 3.0), ("B", "A", 1.0), ("B", "C", 1.0), ("C", "D", 1.0)],
        );
        let best = min_weighted_path_four_vertices(&graph).unwrap().best.unwrap();
        assert_eq!(best.total_weight, 3.0);
        assert!(best.edges.contains(&"B-A".to_string()));
    }

    #[test]
    fn no_route() {
        let graph = weighted_graph(true, &["A", "B", "C", "D"], &[("A", "B", 1.0)]);
        let result = min_weighted_path_four_vertices(&graph).unwrap();
        assert!(result.best.is_none());
        assert_eq!(result.orderings_checked, 24);
    }

    #[test]
    fn four_vertex_preconditions() {
        let small = weighted_graph(false, &["A", "B", "C"], &[("A", "B", 1.0)]);
        assert_eq!(
            min_weighted_path_four_vertices(&small).unwrap_err().kind(),
            ErrorKind::InsufficientVertices
        );

        let unweighted = unweighted_graph(false, &["A", "B", "C", "D"], &[("A", "B")]);
        assert_eq!(
            min_weighted_path_four_vertices(&unweighted).unwrap_err().kind(),
            ErrorKind::MissingWeight
        );

        let big = unweighted_graph(false, &["A", "B", "C", "D", "E", "F"], &[]);
        let negative = weighted_graph(
            true,
            &["A", "B", "C", "D"],
            &[("A", "B", 1.0), ("B", "C", -3.0), ("C", "A", 1.0), ("C", "D", 1.0)],
        );
        assert_eq!(
            min_weighted_path_four_vertices(&negative).unwrap_err().kind(),
            ErrorKind::NegativeCycleDetected
        );

        // 6 * 5 * 4 * 3 = 360 orderings, but only C(6, 4) = 15 sets
        assert_eq!(
            FourVertexPath::new().max_orderings(100).run(&big).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        assert!(
            FourVertexPath::new()
                .max_orderings(100)
                .order(WaypointOrder::AsListed)
                .run(&big)
                .is_ok()
        );
    }

    /// The route weight must match a direct evaluation with Dijkstra
    #[test]
    fn agrees_with_dijkstra() {
        let rng = &mut Pcg64Mcg::seed_from_u64(31);
        for directed in [false, true] {
            for _ in 0..10 {
                let graph = Gnp::new()
                    .nodes(7)
                    .directed(directed)
                    .prob(0.4)
                    .weights(1, 9)
                    .generate(rng)
                    .unwrap();
                let Some(best) = min_weighted_path_four_vertices(&graph).unwrap().best else {
                    continue;
                };

                let via_dijkstra: f64 = best
                    .waypoints
                    .iter()
                    .tuple_windows()
                    .map(|(u, v)| dijkstra(&graph, u, v).unwrap().distance)
                    .sum();
                assert!(same_distance(best.total_weight, via_dijkstra));
                assert_eq!(best.path.len(), best.edges.len() + 1);
            }
        }
    }

    fn complete(n: usize) -> Graph {
        let ids = (0..n).map(|i| format!("{i}")).collect_vec();
        let mut graph = Graph::undirected();
        for id in &ids {
            graph.add_node(id.as_str()).unwrap();
        }
        for (u, v) in (0..n).tuple_combinations() {
            graph.add_edge(&ids[u], &ids[v], (u + v) as f64).unwrap();
        }
        graph
    }

    #[test]
    fn cayley_formula() {
        for n in 1..=5 {
            let result = all_spanning_trees(&complete(n)).unwrap();
            assert_eq!(result.trees.len(), n.pow(n.saturating_sub(2) as u32));
            for tree in &result.trees {
                assert_eq!(tree.edges.len(), n - 1);
            }
        }
    }

    #[test]
    fn cycle_has_one_tree_per_edge() {
        let graph = unweighted_graph(
            false,
            &["A", "B", "C", "D"],
            &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")],
        );
        let result = all_spanning_trees(&graph).unwrap();
        assert_eq!(result.trees.len(), 4);
        assert_eq!(result.subsets_checked, 4);
        assert!(result.trees.iter().all(|t| t.total_weight == 0.0));
    }

    #[test]
    fn enumeration_preconditions() {
        let directed = unweighted_graph(true, &["A", "B"], &[("A", "B")]);
        assert_eq!(
            all_spanning_trees(&directed).unwrap_err().kind(),
            ErrorKind::NotApplicable
        );

        let disconnected = unweighted_graph(false, &["A", "B", "C"], &[("A", "B")]);
        assert_eq!(
            all_spanning_trees(&disconnected).unwrap_err().kind(),
            ErrorKind::DisconnectedGraph
        );

        // C(10, 4) = 210
        assert_eq!(
            SpanningTreeEnumeration::new()
                .max_edge_subsets(200)
                .run(&complete(5))
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidParameter
        );
    }

    #[test]
    fn minimum_tree_matches_kruskal() {
        let rng = &mut Pcg64Mcg::seed_from_u64(2);
        let mut tested = 0;
        while tested < 10 {
            let graph = Gnp::new()
                .nodes(6)
                .prob(0.5)
                .weights(1, 9)
                .generate(rng)
                .unwrap();
            if check_connectivity(&graph).unwrap().components.len() != 1 {
                continue;
            }
            tested += 1;

            let all = all_spanning_trees(&graph).unwrap();
            let min = all.minimum().unwrap();
            assert_eq!(min.total_weight, kruskal(&graph).unwrap().total_weight);
        }
    }
}
