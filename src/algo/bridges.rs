/*!
# Bridges and articulation points

A single low-link DFS over an undirected graph computes both:
- a tree edge `(u, v)` is a **bridge** if `low[v] > disc[u]`,
- `u` is an **articulation point** if it is a DFS root with more than one child, or a non-root
  with some child `v` satisfying `low[v] >= disc[u]`.

The tree edge leading into a node is skipped by edge index rather than by parent node, so a
pair of parallel edges correctly protects both of its endpoints.
*/

use super::*;

/// Result of [`bridges_and_articulation_points`]
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CutStructure {
    /// Bridge edge ids in the order they were identified
    pub bridges: Vec<String>,
    /// Articulation points in node order
    pub articulation_points: Vec<String>,
}

struct BridgeSearch<'a, G>
where
    G: AdjacencyList,
{
    graph: &'a G,
    nodes_info: Vec<NodeInfo>,
    time: Node,
    bridges: Vec<NumEdges>,
    is_articulation: NodeBitSet,
}

impl<'a, G> BridgeSearch<'a, G>
where
    G: AdjacencyList,
{
    fn new(graph: &'a G) -> Self {
        let n = graph.number_of_nodes();
        Self {
            graph,
            nodes_info: vec![NodeInfo::default(); n as usize],
            time: 0,
            bridges: Vec::new(),
            is_articulation: NodeBitSet::new(n),
        }
    }

    fn compute(mut self) -> (Vec<NumEdges>, NodeBitSet) {
        for u in self.graph.vertices() {
            if self.nodes_info[u as usize].discovery == 0 {
                self.compute_tree(u);
            }
        }

        (self.bridges, self.is_articulation)
    }

    fn discover(&mut self, u: Node, parent_edge: Option<NumEdges>) {
        self.time += 1;
        self.nodes_info[u as usize] = NodeInfo {
            discovery: self.time,
            low: self.time,
            parent_edge,
            children: 0,
        };
    }

    fn compute_tree(&mut self, root: Node) {
        let graph = self.graph;
        self.discover(root, None);
        let mut stack: Vec<(Node, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (u, pos) = *frame;
            frame.1 += 1;

            if let Some(arc) = graph.arcs_of(u).get(pos) {
                let v = arc.target;
                if self.nodes_info[v as usize].discovery == 0 {
                    self.nodes_info[u as usize].children += 1;
                    self.discover(v, Some(arc.edge));
                    stack.push((v, 0));
                } else if self.nodes_info[u as usize].parent_edge != Some(arc.edge) {
                    let v_disc = self.nodes_info[v as usize].discovery;
                    self.nodes_info[u as usize].update_low(v_disc);
                }
                continue;
            }

            // all neighbors of `u` are done; report to its parent
            stack.pop();
            let Some(&(parent, _)) = stack.last() else {
                if self.nodes_info[u as usize].children > 1 {
                    self.is_articulation.set_bit(u);
                }
                continue;
            };

            let info_u = self.nodes_info[u as usize];
            self.nodes_info[parent as usize].update_low(info_u.low);

            let parent_disc = self.nodes_info[parent as usize].discovery;
            if info_u.low > parent_disc
                && let Some(e) = info_u.parent_edge
            {
                self.bridges.push(e);
            }
            if info_u.low >= parent_disc && parent != root {
                self.is_articulation.set_bit(parent);
            }
        }
    }
}

#[derive(Clone, Copy, Default)]
struct NodeInfo {
    /// `0` marks an undiscovered node
    discovery: Node,
    low: Node,
    parent_edge: Option<NumEdges>,
    children: Node,
}

impl NodeInfo {
    fn update_low(&mut self, value: Node) {
        self.low = self.low.min(value);
    }
}

/// Computes bridges and articulation points of an undirected graph in one pass
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn bridges_and_articulation_points(graph: &Graph) -> Result<CutStructure> {
    graph.require_nodes()?;
    if graph.is_directed() {
        return Err(GraphError::not_applicable(
            "bridges and articulation points",
            false,
        ));
    }

    let adj = Adjacency::of(graph);
    let (bridges, articulation) = BridgeSearch::new(&adj).compute();

    tracing::debug!(
        bridges = bridges.len(),
        articulation_points = articulation.cardinality(),
        "cut structure computed"
    );

    Ok(CutStructure {
        bridges: graph.edge_ids(bridges),
        articulation_points: graph.node_ids(graph.vertices().filter(|&u| articulation.get_bit(u))),
    })
}

/// Bridge edge ids of an undirected graph
pub fn bridges(graph: &Graph) -> Result<Vec<String>> {
    Ok(bridges_and_articulation_points(graph)?.bridges)
}

/// Articulation points of an undirected graph
pub fn articulation_points(graph: &Graph) -> Result<Vec<String>> {
    Ok(bridges_and_articulation_points(graph)?.articulation_points)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::ErrorKind, testing::*};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn bridges_in_path() {
        for n in [1usize, 5, 10, 15] {
            let ids = (0..n).map(|i| format!("{i:02}")).collect_vec();
            let mut graph = Graph::undirected();
            for id in &ids {
                graph.add_node(id.as_str()).unwrap();
            }
            for w in ids.windows(2) {
                graph.add_edge(&w[0], &w[1], None).unwrap();
            }

            let mut found = bridges(&graph).unwrap();
            found.sort();
            let expected = ids.windows(2).map(|w| format!("{}-{}", w[0], w[1])).collect_vec();
            assert_eq!(found, expected);

            let cut = articulation_points(&graph).unwrap();
            assert_eq!(cut.len(), n.saturating_sub(2));
        }
    }

    #[test]
    fn bridge_in_example() {
        // two triangles joined by the edge 1-3
        let graph = unweighted_graph(
            false,
            &["0", "1", "2", "3", "4", "5"],
            &[("0", "1"), ("0", "2"), ("2", "1"), ("1", "3"), ("3", "4"), ("4", "5"), ("5", "3")],
        );

        let result = bridges_and_articulation_points(&graph).unwrap();
        assert_eq!(result.bridges, vec!["1-3"]);
        assert_eq!(result.articulation_points, vec!["1", "3"]);
    }

    #[test]
    fn star_center_is_articulation_point() {
        let graph = unweighted_graph(
            false,
            &["C", "A", "B", "D"],
            &[("C", "A"), ("C", "B"), ("C", "D")],
        );

        let result = bridges_and_articulation_points(&graph).unwrap();
        assert_eq!(result.articulation_points, vec!["C"]);
        assert_eq!(result.bridges.len(), 3);
    }

    #[test]
    fn parallel_edges_are_not_bridges() {
        let graph = unweighted_graph(false, &["A", "B", "C"], &[("A", "B"), ("B", "A"), ("B", "C")]);

        let result = bridges_and_articulation_points(&graph).unwrap();
        assert_eq!(result.bridges, vec!["B-C"]);
        assert_eq!(result.articulation_points, vec!["B"]);
    }

    #[test]
    fn directed_is_not_applicable() {
        let graph = unweighted_graph(true, &["A", "B"], &[("A", "B")]);
        assert_eq!(
            bridges(&graph).unwrap_err().kind(),
            ErrorKind::NotApplicable
        );
    }

    /// Removing a bridge must increase the number of components, any other edge must not
    #[test]
    fn bridges_match_brute_force() {
        let rng = &mut Pcg64Mcg::seed_from_u64(5);
        for _ in 0..20 {
            let graph = Gnp::new()
                .nodes(10)
                .prob(0.2)
                .weights(1, 1)
                .generate(rng)
                .unwrap();
            let base = check_connectivity(&graph).unwrap().components.len();
            let found = bridges(&graph).unwrap();

            for (i, edge) in graph.edges().iter().enumerate() {
                let mut reduced = Graph::undirected();
                for node in graph.nodes() {
                    reduced.add_node(node.id.as_str()).unwrap();
                }
                for (j, other) in graph.edges().iter().enumerate() {
                    if i != j {
                        reduced
                            .add_edge_with_id(
                                other.id.as_str(),
                                graph.node_id(other.source()),
                                graph.node_id(other.target()),
                                None,
                            )
                            .unwrap();
                    }
                }

                let comps = check_connectivity(&reduced).unwrap().components.len();
                assert_eq!(comps > base, found.contains(&edge.id));
            }
        }
    }
}
