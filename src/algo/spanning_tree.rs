/*!
# Spanning Trees

Minimum spanning trees of connected, fully weighted, undirected graphs:
- [`prim`] grows a tree from the first node using a binary heap of candidate edges,
- [`kruskal`] scans all edges by weight and joins components with a [`UnionFind`],
- [`maximum_spanning_tree`] is Kruskal with the scan order reversed.

All of them share the same preconditions, checked in this order: at least one node
(`EmptyGraph`), undirected (`NotApplicable`), every edge weighted (`MissingWeight`),
connected (`DisconnectedGraph`).

```
use wgraphs::{prelude::*, algo::*};

let mut graph = Graph::undirected();
for id in ["A", "B", "C"] {
    graph.add_node(id).unwrap();
}
graph.add_edge("A", "B", 1.0).unwrap();
graph.add_edge("B", "C", 2.0).unwrap();
graph.add_edge("A", "C", 5.0).unwrap();

let tree = kruskal(&graph).unwrap();
assert_eq!(tree.total_weight, 3.0);
assert_eq!(tree.edge_ids(), vec!["A-B", "B-C"]);
```
*/

use std::collections::BinaryHeap;

use super::{traversal::require_weakly_connected, *};

/// An edge selected into a spanning tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub weight: Weight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanningTree {
    /// Edges in the order they were selected
    pub edges: Vec<TreeEdge>,
    pub total_weight: Weight,
    pub node_count: usize,
}

impl SpanningTree {
    pub(crate) fn from_edges(graph: &Graph, selected: Vec<NumEdges>) -> Self {
        let edges = selected
            .into_iter()
            .map(|e| {
                let edge = graph.edge(e);
                TreeEdge {
                    id: edge.id.clone(),
                    source: graph.node_id(edge.source()).to_string(),
                    target: graph.node_id(edge.target()).to_string(),
                    weight: edge.weight_or(0.0),
                }
            })
            .collect_vec();

        Self {
            total_weight: edges.iter().map(|e| e.weight).sum(),
            edges,
            node_count: graph.len(),
        }
    }

    /// Ids of the tree edges in selection order
    pub fn edge_ids(&self) -> Vec<&str> {
        self.edges.iter().map(|e| e.id.as_str()).collect()
    }
}

fn check_preconditions(graph: &Graph, algorithm: &'static str) -> Result<()> {
    graph.require_nodes()?;
    if graph.is_directed() {
        return Err(GraphError::not_applicable(algorithm, false));
    }
    graph.require_weights()?;
    require_weakly_connected(graph)
}

/// Prim's algorithm, starting at the first node.
///
/// Candidate edges of equal weight leave the heap in the order they were pushed; the first
/// candidate reaching a node wins, later ones for the same node are discarded.
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn prim(graph: &Graph) -> Result<SpanningTree> {
    check_preconditions(graph, "Prim's algorithm")?;

    let adj = Adjacency::of(graph);
    let mut in_tree = NodeBitSet::new(graph.number_of_nodes());
    let mut heap: BinaryHeap<MinScored<(u64, Node, NumEdges)>> = BinaryHeap::new();
    let mut sequence: u64 = 0;
    let mut selected = Vec::with_capacity(graph.len().saturating_sub(1));

    let mut add_to_tree = |u: Node, in_tree: &mut NodeBitSet, heap: &mut BinaryHeap<_>| {
        in_tree.set_bit(u);
        for arc in adj.arcs_of(u) {
            if !in_tree.get_bit(arc.target) {
                sequence += 1;
                heap.push(MinScored::new(
                    graph.edge(arc.edge).weight_or(0.0),
                    (sequence, arc.target, arc.edge),
                ));
            }
        }
    };

    add_to_tree(0, &mut in_tree, &mut heap);
    while let Some(MinScored { key: (_, v, e), .. }) = heap.pop() {
        if in_tree.get_bit(v) {
            continue;
        }
        selected.push(e);
        add_to_tree(v, &mut in_tree, &mut heap);
    }

    let tree = SpanningTree::from_edges(graph, selected);
    tracing::debug!(total_weight = tree.total_weight, "prim finished");
    Ok(tree)
}

/// Kruskal over the edges in the given order
fn kruskal_in_order(graph: &Graph, order: Vec<NumEdges>) -> SpanningTree {
    let mut sets = UnionFind::new(graph.len());
    let target = graph.len().saturating_sub(1);
    let mut selected = Vec::with_capacity(target);

    for e in order {
        if selected.len() == target {
            break;
        }
        let Edge(u, v) = graph.edge(e).endpoints;
        if sets.union(u, v) {
            selected.push(e);
        }
    }

    SpanningTree::from_edges(graph, selected)
}

/// Edge indices sorted by weight; ties keep insertion order
fn edges_by_weight(graph: &Graph, descending: bool) -> Vec<NumEdges> {
    let mut order = (0..graph.number_of_edges()).collect_vec();
    order.sort_by(|&a, &b| {
        let (wa, wb) = (graph.edge(a).weight_or(0.0), graph.edge(b).weight_or(0.0));
        if descending { wb.total_cmp(&wa) } else { wa.total_cmp(&wb) }
    });
    order
}

/// Kruskal's algorithm. Of equally weighted edges the one inserted first is considered first.
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn kruskal(graph: &Graph) -> Result<SpanningTree> {
    check_preconditions(graph, "Kruskal's algorithm")?;
    let tree = kruskal_in_order(graph, edges_by_weight(graph, false));
    tracing::debug!(total_weight = tree.total_weight, "kruskal finished");
    Ok(tree)
}

/// Spanning tree of maximum total weight
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn maximum_spanning_tree(graph: &Graph) -> Result<SpanningTree> {
    check_preconditions(graph, "maximum spanning tree")?;
    let tree = kruskal_in_order(graph, edges_by_weight(graph, true));
    tracing::debug!(total_weight = tree.total_weight, "maximum spanning tree finished");
    Ok(tree)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanningTreeComparison {
    pub prim: SpanningTree,
    pub kruskal: SpanningTree,
    /// Both trees have the same total weight
    pub same_weight: bool,
    /// Both trees consist of the same edges
    pub same_edges: bool,
}

/// Runs Prim and Kruskal on the same graph
pub fn compare_spanning_trees(graph: &Graph) -> Result<SpanningTreeComparison> {
    let prim = prim(graph)?;
    let kruskal = kruskal(graph)?;

    let mut prim_ids = prim.edge_ids();
    let mut kruskal_ids = kruskal.edge_ids();
    prim_ids.sort_unstable();
    kruskal_ids.sort_unstable();

    Ok(SpanningTreeComparison {
        same_weight: (prim.total_weight - kruskal.total_weight).abs() < 1e-9,
        same_edges: prim_ids == kruskal_ids,
        prim,
        kruskal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, testing::*};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn triangle() -> Graph {
        weighted_graph(
            false,
            &["A", "B", "C"],
            &[("A", "B", 1.0), ("B", "C", 2.0), ("A", "C", 5.0)],
        )
    }

    #[test]
    fn triangle_mst() {
        let graph = triangle();
        for tree in [prim(&graph).unwrap(), kruskal(&graph).unwrap()] {
            assert_eq!(tree.edge_ids(), vec!["A-B", "B-C"]);
            assert_eq!(tree.total_weight, 3.0);
            assert_eq!(tree.node_count, 3);
        }

        let max = maximum_spanning_tree(&graph).unwrap();
        assert_eq!(max.edge_ids(), vec!["A-C", "B-C"]);
        assert_eq!(max.total_weight, 7.0);
    }

    #[test]
    fn single_node_has_empty_tree() {
        let graph = unweighted_graph(false, &["A"], &[]);
        let tree = prim(&graph).unwrap();
        assert!(tree.edges.is_empty());
        assert_eq!(tree.total_weight, 0.0);
        assert!(kruskal(&graph).unwrap().edges.is_empty());
    }

    #[test]
    fn parallel_edges_and_loops() {
        let graph = weighted_graph(
            false,
            &["A", "B"],
            &[("A", "A", 0.5), ("A", "B", 4.0), ("B", "A", 2.0)],
        );

        for tree in [prim(&graph).unwrap(), kruskal(&graph).unwrap()] {
            assert_eq!(tree.edge_ids(), vec!["B-A"]);
        }
    }

    #[test]
    fn preconditions() {
        let empty = Graph::undirected();
        assert_eq!(prim(&empty).unwrap_err().kind(), ErrorKind::EmptyGraph);

        let mut directed = triangle();
        directed.set_directed(true);
        assert_eq!(kruskal(&directed).unwrap_err().kind(), ErrorKind::NotApplicable);

        let unweighted = unweighted_graph(false, &["A", "B"], &[("A", "B")]);
        for result in [prim(&unweighted), kruskal(&unweighted), maximum_spanning_tree(&unweighted)] {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::MissingWeight);
        }

        let disconnected = weighted_graph(false, &["A", "B", "C"], &[("A", "B", 1.0)]);
        match prim(&disconnected).unwrap_err() {
            GraphError::DisconnectedGraph { reached, total } => {
                assert_eq!((reached, total), (2, 3));
            }
            err => panic!("unexpected error {err}"),
        }
    }

    #[test]
    fn zero_weight_is_a_weight() {
        let graph = weighted_graph(false, &["A", "B", "C"], &[("A", "B", 0.0), ("B", "C", 0.0)]);
        assert_eq!(prim(&graph).unwrap().total_weight, 0.0);
    }

    #[test]
    fn prim_and_kruskal_agree() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);
        let mut tested = 0;
        while tested < 30 {
            let graph = Gnp::new()
                .nodes(14)
                .prob(0.3)
                .weights(1, 5)
                .generate(rng)
                .unwrap();
            if check_connectivity(&graph).unwrap().components.len() != 1 {
                continue;
            }
            tested += 1;

            let cmp = compare_spanning_trees(&graph).unwrap();
            assert!(cmp.same_weight);
            assert_eq!(cmp.prim.edges.len(), 13);
            assert_eq!(cmp.kruskal.edges.len(), 13);

            let max = maximum_spanning_tree(&graph).unwrap();
            assert_eq!(max.edges.len(), 13);
            assert!(max.total_weight >= cmp.kruskal.total_weight);
        }
    }
}
