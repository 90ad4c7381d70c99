/*!
# Basic graph operations

Traits shared by the [`Graph`](crate::graph::Graph) snapshot and the [`Adjacency`] views derived
from it. Algorithms never walk the raw edge list directly; they build an `Adjacency` under the
[`Orientation`] they need and traverse that instead, so directed and undirected semantics are
decided in exactly one place.
*/

use std::ops::Range;

use crate::prelude::*;

/// Provides getters pertaining to the size of the node set
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns *true* if the graph has no nodes
    fn is_empty(&self) -> bool {
        self.number_of_nodes() == 0
    }

    /// Returns an iterator over V
    fn vertices(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }
}

/// Provides getters pertaining to the size of the edge set
pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph
    fn number_of_edges(&self) -> NumEdges;
}

/// One traversable direction of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Arc {
    /// Endpoint reached when following the arc
    pub target: Node,
    /// Index of the underlying edge in the graph
    pub edge: NumEdges,
}

/// Traits pertaining getters for neighborhoods
pub trait AdjacencyList: GraphNodeOrder {
    /// Returns the outgoing arcs of `u` in edge insertion order
    fn arcs_of(&self, u: Node) -> &[Arc];

    /// Returns an iterator over the (open) neighborhood of a given vertex.
    /// Parallel edges yield a neighbor multiple times.
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.arcs_of(u).iter().map(|a| a.target)
    }

    /// Returns the number of arcs leaving `u`
    fn degree_of(&self, u: Node) -> NumNodes {
        self.arcs_of(u).len() as NumNodes
    }
}

/// How edges of a graph are turned into arcs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Follow the graph's own directedness flag
    #[default]
    AsGraph,
    /// Every edge is traversable in both directions
    Undirected,
    /// Directed edges are traversed backwards; undirected graphs are unaffected
    Reversed,
}

/// Compressed adjacency arrays built for a single algorithm call
#[derive(Debug, Clone)]
pub struct Adjacency {
    offsets: Vec<u32>,
    arcs: Vec<Arc>,
}

impl Adjacency {
    /// Builds the adjacency of `graph` under the given orientation.
    ///
    /// Undirected interpretation emits both arcs of every edge, so a self-loop contributes two
    /// arcs to its node.
    pub fn new(graph: &Graph, orientation: Orientation) -> Self {
        let both = match orientation {
            Orientation::AsGraph | Orientation::Reversed => !graph.is_directed(),
            Orientation::Undirected => true,
        };
        let reversed = orientation == Orientation::Reversed;

        let arcs_of_edge = |e: &EdgeData| {
            let Edge(u, v) = if reversed {
                e.endpoints.reverse()
            } else {
                e.endpoints
            };
            std::iter::once((u, v)).chain(both.then_some((v, u)))
        };

        let n = graph.len();
        let mut offsets = vec![0u32; n + 1];
        for (u, _) in graph.edges().iter().flat_map(arcs_of_edge) {
            offsets[u as usize + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }

        let mut fill = offsets.clone();
        let mut arcs = vec![
            Arc {
                target: INVALID_NODE,
                edge: 0
            };
            offsets[n] as usize
        ];
        for (e, data) in graph.edges().iter().enumerate() {
            for (u, v) in arcs_of_edge(data) {
                let slot = &mut fill[u as usize];
                arcs[*slot as usize] = Arc {
                    target: v,
                    edge: e as NumEdges,
                };
                *slot += 1;
            }
        }

        Self { offsets, arcs }
    }

    /// Adjacency following the graph's own directedness
    pub fn of(graph: &Graph) -> Self {
        Self::new(graph, Orientation::AsGraph)
    }

    /// Total number of arcs
    pub fn number_of_arcs(&self) -> usize {
        self.arcs.len()
    }
}

impl GraphNodeOrder for Adjacency {
    fn number_of_nodes(&self) -> NumNodes {
        (self.offsets.len() - 1) as NumNodes
    }
}

impl AdjacencyList for Adjacency {
    fn arcs_of(&self, u: Node) -> &[Arc] {
        let u = u as usize;
        &self.arcs[self.offsets[u] as usize..self.offsets[u + 1] as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use itertools::Itertools;

    #[test]
    fn orientations() {
        let graph = weighted_graph(true, &["A", "B", "C"], &[("A", "B", 1.0), ("C", "B", 1.0)]);

        let out = Adjacency::of(&graph);
        assert_eq!(out.neighbors_of(0).collect_vec(), vec![1]);
        assert_eq!(out.degree_of(1), 0);
        assert_eq!(out.number_of_arcs(), 2);

        let rev = Adjacency::new(&graph, Orientation::Reversed);
        assert_eq!(rev.neighbors_of(1).collect_vec(), vec![0, 2]);
        assert_eq!(rev.degree_of(0), 0);

        let und = Adjacency::new(&graph, Orientation::Undirected);
        assert_eq!(und.neighbors_of(1).collect_vec(), vec![0, 2]);
        assert_eq!(und.number_of_arcs(), 4);
    }

    #[test]
    fn undirected_loops_and_parallel_edges() {
        let graph = weighted_graph(
            false,
            &["A", "B"],
            &[("A", "A", 1.0), ("A", "B", 1.0), ("B", "A", 2.0)],
        );
        let adj = Adjacency::of(&graph);

        assert_eq!(adj.degree_of(0), 4);
        assert_eq!(adj.neighbors_of(0).collect_vec(), vec![0, 0, 1, 1]);
        assert_eq!(
            adj.arcs_of(1).iter().map(|a| a.edge).collect_vec(),
            vec![1, 2]
        );
    }
}
