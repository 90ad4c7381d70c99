/*!
# Strongly connected components and condensation

[`StronglyConnectedComponents`] is an iterative implementation of Tarjan's algorithm over any
[`AdjacencyList`]; [`strongly_connected_components`], [`is_strongly_connected`] and
[`condensation`] wrap it for directed graph snapshots.
*/

use std::{collections::BTreeSet, iter::FusedIterator};

use super::*;

/// Implementation of Tarjan's Algorithm for Strongly Connected Components.
/// It is designed as an iterator that emits the nodes of one strongly connected component at a
/// time, starting with the node that serves as the component's root. The components themselves
/// are emitted in reverse topological order of the condensation.
pub struct StronglyConnectedComponents<'a, G>
where
    G: AdjacencyList,
{
    graph: &'a G,
    idx: Node,

    states: Vec<NodeState>,
    potentially_unvisited: usize,

    path_stack: Vec<Node>,

    call_stack: Vec<StackFrame>,
}

impl<'a, G> StronglyConnectedComponents<'a, G>
where
    G: AdjacencyList,
{
    /// Construct the iterator for some graph
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            idx: 0,
            states: vec![Default::default(); graph.len()],
            potentially_unvisited: 0,

            path_stack: Vec::with_capacity(32),
            call_stack: Vec::with_capacity(32),
        }
    }

    /// Just like in a classic DFS where we want to compute a spanning-forest, we will need to
    /// to visit each node at least once. We start we node 0, and cover all nodes reachable from
    /// there in `search`. Then, we search for an untouched node here, and start over.
    fn next_unvisited_node(&mut self) -> Option<Node> {
        while self.potentially_unvisited < self.graph.len() {
            if !self.states[self.potentially_unvisited].visited {
                let v = self.potentially_unvisited as Node;
                self.push_node(v, None);
                return Some(v);
            }

            self.potentially_unvisited += 1;
        }
        None
    }

    /// Put a pristine stack frame on the call stack. Roughly speaking, this is the first step
    /// to a recursive call of search.
    fn push_node(&mut self, node: Node, parent: Option<Node>) {
        self.call_stack.push(StackFrame {
            node,
            parent: parent.unwrap_or(node),
            initial_stack_len: 0,
            first_call: true,
            next_arc: 0,
        });
    }

    fn search(&mut self) -> Option<Vec<Node>> {
        /*
        The recursive formulation of Tarjan's algorithm overflows the stack on long paths, so
        the recursion is simulated with `self.call_stack`. On first visit of a node v it is
        assigned an index and the same low_link value, the smallest index known to be reachable
        from v. All neighbors are then processed, possibly descending into them. Eventually all
        nodes in an SCC share the same low_link and the unique node with this index is the root.

        All state, including the position in each neighbor list, lives in the call stack, which
        also allows pausing after each component and resuming on the next call.
        */

        let graph = self.graph;

        'recurse: while let Some(frame) = self.call_stack.last_mut() {
            let v = frame.node;

            if frame.first_call {
                frame.first_call = false;
                frame.initial_stack_len = self.path_stack.len() as Node;

                self.states[v as usize].visit(self.idx);
                self.idx += 1;

                self.path_stack.push(v);
            }

            let arcs = graph.arcs_of(v);
            while let Some(arc) = arcs.get(frame.next_arc) {
                frame.next_arc += 1;
                let w = arc.target;
                let w_state = self.states[w as usize];

                if !w_state.visited {
                    self.push_node(w, Some(v));
                    continue 'recurse;
                } else if w_state.on_stack {
                    self.states[v as usize].try_lower_link(w_state.index);
                }
            }

            let Some(frame) = self.call_stack.pop() else {
                break;
            };
            let state = self.states[v as usize];

            self.states[frame.parent as usize].try_lower_link(state.low_link);

            if state.is_root() {
                let component = self.path_stack.split_off(frame.initial_stack_len as usize);

                for &w in &component {
                    self.states[w as usize].on_stack = false;
                }

                debug_assert_eq!(component.first(), Some(&v));

                return Some(component);
            }
        }

        None
    }
}

impl<G> Iterator for StronglyConnectedComponents<'_, G>
where
    G: AdjacencyList,
{
    type Item = Vec<Node>;

    /// Returns either a vector of node ids that form an SCC or None if no further SCC was found
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(x) = self.search() {
                return Some(x);
            }

            self.next_unvisited_node()?;
        }
    }
}

impl<G> FusedIterator for StronglyConnectedComponents<'_, G> where G: AdjacencyList {}

#[derive(Debug, Clone)]
struct StackFrame {
    node: Node,
    parent: Node,
    initial_stack_len: Node,
    first_call: bool,
    next_arc: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct NodeState {
    visited: bool,
    on_stack: bool,
    index: Node,
    low_link: Node,
}

impl NodeState {
    fn visit(&mut self, u: Node) {
        debug_assert!(!self.visited);
        self.index = u;
        self.low_link = u;
        self.visited = true;
        self.on_stack = true;
    }

    fn try_lower_link(&mut self, l: Node) {
        self.low_link = self.low_link.min(l);
    }

    fn is_root(&self) -> bool {
        self.index == self.low_link
    }
}

/// Components of a directed graph, largest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SccDecomposition {
    pub components: Vec<Vec<String>>,
    pub strongly_connected: bool,
}

/// Components in the order they are reported, as node indices
fn sorted_components(graph: &Graph, algorithm: &'static str) -> Result<Vec<Vec<Node>>> {
    graph.require_nodes()?;
    if !graph.is_directed() {
        return Err(GraphError::not_applicable(algorithm, true));
    }

    let adj = Adjacency::of(graph);
    let mut components = StronglyConnectedComponents::new(&adj).collect_vec();
    // stable: equally sized components keep their discovery order
    components.sort_by_key(|comp| std::cmp::Reverse(comp.len()));
    Ok(components)
}

/// Tarjan's strongly connected components of a directed graph, largest component first
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn strongly_connected_components(graph: &Graph) -> Result<SccDecomposition> {
    let components = sorted_components(graph, "strongly connected components")?;
    tracing::debug!(components = components.len(), "scc decomposition finished");

    Ok(SccDecomposition {
        strongly_connected: components.len() == 1,
        components: components
            .into_iter()
            .map(|comp| graph.node_ids(comp))
            .collect(),
    })
}

/// Returns *true* if every node of a directed graph can reach every other node
pub fn is_strongly_connected(graph: &Graph) -> Result<bool> {
    Ok(sorted_components(graph, "strong connectivity")?.len() == 1)
}

/// The graph obtained by collapsing every strongly connected component into one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condensation {
    /// Labels `SCC1, SCC2, ...` in the order of `components`
    pub labels: Vec<String>,
    /// Member nodes of each condensed node, largest component first
    pub components: Vec<Vec<String>>,
    /// Deduplicated edges between condensed nodes as indices into `components`
    pub edges: Vec<(usize, usize)>,
}

impl Condensation {
    /// Index of the component containing `id`
    pub fn component_of(&self, id: &str) -> Option<usize> {
        self.components
            .iter()
            .position(|comp| comp.iter().any(|x| x == id))
    }

    /// Materializes the condensation as a directed graph over the labels
    pub fn to_graph(&self) -> Result<Graph> {
        let mut graph = Graph::directed();
        for label in &self.labels {
            graph.add_node(label.as_str())?;
        }
        for &(a, b) in &self.edges {
            graph.add_edge(&self.labels[a], &self.labels[b], None)?;
        }
        Ok(graph)
    }
}

/// Collapses each strongly connected component of a directed graph into a single node
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn condensation(graph: &Graph) -> Result<Condensation> {
    let components = sorted_components(graph, "condensation")?;

    let mut comp_of = vec![0usize; graph.len()];
    for (i, comp) in components.iter().enumerate() {
        for &u in comp {
            comp_of[u as usize] = i;
        }
    }

    let edges: BTreeSet<(usize, usize)> = graph
        .edges()
        .iter()
        .map(|e| (comp_of[e.source() as usize], comp_of[e.target() as usize]))
        .filter(|(a, b)| a != b)
        .collect();

    tracing::debug!(
        components = components.len(),
        edges = edges.len(),
        "condensation built"
    );

    Ok(Condensation {
        labels: (1..=components.len()).map(|i| format!("SCC{i}")).collect(),
        components: components
            .into_iter()
            .map(|comp| graph.node_ids(comp))
            .collect(),
        edges: edges.into_iter().collect(),
    })
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::{error::ErrorKind, testing::*};

    fn example() -> Graph {
        let ids = ["0", "1", "2", "3", "4", "5", "6", "7"];
        let edges = [
            ("0", "1"),
            ("1", "2"),
            ("1", "4"),
            ("1", "5"),
            ("2", "6"),
            ("2", "3"),
            ("3", "2"),
            ("3", "7"),
            ("4", "0"),
            ("4", "5"),
            ("5", "6"),
            ("6", "5"),
            ("7", "3"),
            ("7", "6"),
        ];
        unweighted_graph(true, &ids, &edges)
    }

    #[test]
    pub fn scc() {
        let result = strongly_connected_components(&example()).unwrap();
        assert_eq!(result.components.len(), 3);
        assert!(!result.strongly_connected);

        // the two components of size 3 come first
        assert_eq!(result.components[0].len(), 3);
        assert_eq!(result.components[1].len(), 3);
        assert_eq!(result.components[2].len(), 2);

        let sccs = sort_components(result.components);
        assert_eq!(sccs[0], ["0", "1", "4"]);
        assert_eq!(sccs[1], ["2", "3", "7"]);
        assert_eq!(sccs[2], ["5", "6"]);
    }

    #[test]
    pub fn scc_tree() {
        let graph = unweighted_graph(
            true,
            &["0", "1", "2", "3", "4", "5", "6"],
            &[("0", "1"), ("1", "2"), ("1", "3"), ("1", "4"), ("3", "5"), ("3", "6")],
        );

        // in a directed tree each vertex is a strongly connected component
        let result = strongly_connected_components(&graph).unwrap();
        assert_eq!(result.components.len(), 7);
        assert!(result.components.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn scc_requires_directed() {
        let graph = unweighted_graph(false, &["A", "B"], &[("A", "B")]);
        assert_eq!(
            strongly_connected_components(&graph).unwrap_err().kind(),
            ErrorKind::NotApplicable
        );
        assert_eq!(
            condensation(&graph).unwrap_err().kind(),
            ErrorKind::NotApplicable
        );
    }

    #[test]
    fn scc_long_cycle() {
        // assert that we can deal with very deep stacks
        let n = 10_000;
        let ids = (0..n).map(|i| i.to_string()).collect_vec();
        let mut graph = Graph::directed();
        for id in &ids {
            graph.add_node(id.as_str()).unwrap();
        }
        for i in 0..n {
            graph.add_edge(&ids[i], &ids[(i + 1) % n], None).unwrap();
        }

        assert!(is_strongly_connected(&graph).unwrap());
    }

    #[test]
    fn scc_partition_random() {
        let rng = &mut Pcg64::seed_from_u64(1234);

        for i in 1..10 {
            let n = 60;
            let graph = Gnp::new()
                .nodes(n)
                .directed(true)
                .prob(0.01 * i as f64)
                .weights(1, 1)
                .generate(rng)
                .unwrap();
            let result = strongly_connected_components(&graph).unwrap();

            let mut all = result.components.concat();
            assert_eq!(all.len(), n as usize);
            all.sort();
            all.dedup();
            assert_eq!(all.len(), n as usize);

            assert!(
                result
                    .components
                    .windows(2)
                    .all(|w| w[0].len() >= w[1].len())
            );
        }
    }

    #[test]
    fn condensation_is_acyclic() {
        let cond = condensation(&example()).unwrap();
        assert_eq!(cond.labels, vec!["SCC1", "SCC2", "SCC3"]);

        let a = cond.component_of("0").unwrap();
        let b = cond.component_of("2").unwrap();
        let c = cond.component_of("5").unwrap();
        assert_eq!(cond.edges.len(), 3);
        assert!(cond.edges.contains(&(a, b)));
        assert!(cond.edges.contains(&(a, c)));
        assert!(cond.edges.contains(&(b, c)));

        let rng = &mut Pcg64::seed_from_u64(99);
        for _ in 0..20 {
            let graph = Gnp::new()
                .nodes(25)
                .directed(true)
                .prob(0.08)
                .weights(1, 1)
                .generate(rng)
                .unwrap();
            let cond = condensation(&graph).unwrap();
            assert!(!detect_cycle(&cond.to_graph().unwrap()).unwrap().has_cycle);
        }
    }
}
