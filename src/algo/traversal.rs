/*!
Graph traversal algorithms and traversal-derived reports.

This module provides:
- A generic traversal iterator ([`TraversalSearch`]) that runs as BFS or DFS depending on the
  frontier container, with or without predecessor tracking.
- The reachability operations offered to callers: [`dfs`], [`bfs`], [`check_connectivity`],
  [`connected_components`] and [`detect_cycle`].

All operations build an [`Adjacency`] honoring the graph's directedness (weak connectivity
uses the undirected view) and run without recursion, so deep graphs cannot exhaust the stack.
*/

use super::*;
use std::{
    collections::{BTreeMap, VecDeque},
    marker::PhantomData,
};

/// Abstraction for items yielded by a traversal iterator.
///
/// A `SequencedItem` encodes both the **node currently visited**
/// and an **optional predecessor** that represents its parent
/// in the traversal tree.
pub trait SequencedItem: Clone + Copy {
    /// Constructs a new item with a predecessor.
    fn new_with_predecessor(predecessor: Node, item: Node) -> Self;

    /// Constructs a new item without predecessor information.
    fn new_without_predecessor(item: Node) -> Self;

    /// Returns the node represented by this item.
    fn item(&self) -> Node;

    /// Returns the predecessor of this node, if any.
    fn predecessor(&self) -> Option<Node>;
}

impl SequencedItem for Node {
    fn new_with_predecessor(_: Node, item: Node) -> Self {
        item
    }
    fn new_without_predecessor(item: Node) -> Self {
        item
    }
    fn item(&self) -> Node {
        *self
    }
    fn predecessor(&self) -> Option<Node> {
        None
    }
}

/// Compact representation of `(predecessor, node)` used for
/// traversals with parent tracking.
///
/// The absence of a predecessor is encoded by setting both entries to the same node.
pub type PredecessorOfNode = (Node, Node);
impl SequencedItem for PredecessorOfNode {
    fn new_with_predecessor(predecessor: Node, item: Node) -> Self {
        (predecessor, item)
    }
    fn new_without_predecessor(item: Node) -> Self {
        (item, item)
    }
    fn item(&self) -> Node {
        self.1
    }
    fn predecessor(&self) -> Option<Node> {
        if self.0 == self.1 { None } else { Some(self.0) }
    }
}

/// Frontier of a traversal.
///
/// - [`VecDeque`] -> queue semantics -> **BFS**
/// - [`Vec`] -> stack semantics -> **DFS**
pub trait NodeSequencer<T> {
    /// Creates a new sequencer initialized with a single node.
    fn init(u: T) -> Self;

    /// Pushes a node into the frontier.
    fn push(&mut self, item: T);

    /// Removes and returns the next node from the frontier.
    fn pop(&mut self) -> Option<T>;

    /// Returns the number of items currently in the frontier.
    fn cardinality(&self) -> usize;
}

impl<T> NodeSequencer<T> for VecDeque<T> {
    fn init(u: T) -> Self {
        Self::from(vec![u])
    }
    fn push(&mut self, u: T) {
        self.push_back(u)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

impl<T> NodeSequencer<T> for Vec<T> {
    fn init(u: T) -> Self {
        vec![u]
    }
    fn push(&mut self, u: T) {
        self.push(u)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

/// Generic traversal iterator supporting BFS and DFS variants.
///
/// Nodes are marked visited when they enter the frontier, so the stack-based variant yields a
/// valid search order but not a DFS preorder; use [`dfs`] for the latter.
pub struct TraversalSearch<'a, G, S, I>
where
    G: AdjacencyList,
    S: NodeSequencer<I>,
    I: SequencedItem,
{
    graph: &'a G,
    visited: NodeBitSet,
    sequencer: S,
    _item: PhantomData<I>,
}

/// A BFS traversal iterator over the graph
pub type BFS<'a, G> = TraversalSearch<'a, G, VecDeque<Node>, Node>;

/// A BFS traversal iterator that records predecessor information
pub type BFSWithPredecessor<'a, G> =
    TraversalSearch<'a, G, VecDeque<PredecessorOfNode>, PredecessorOfNode>;

impl<G, S, I> Iterator for TraversalSearch<'_, G, S, I>
where
    G: AdjacencyList,
    S: NodeSequencer<I>,
    I: SequencedItem,
{
    type Item = I;

    fn next(&mut self) -> Option<Self::Item> {
        let popped = self.sequencer.pop()?;
        let u = popped.item();

        for v in self.graph.neighbors_of(u) {
            if !self.visited.set_bit(v) {
                self.sequencer.push(I::new_with_predecessor(u, v));
            }
        }

        Some(popped)
    }
}

impl<'a, G, S, I> TraversalSearch<'a, G, S, I>
where
    G: AdjacencyList,
    S: NodeSequencer<I>,
    I: SequencedItem,
{
    /// Creates a new traversal iterator starting from `start`.
    pub fn new(graph: &'a G, start: Node) -> Self {
        let mut visited = NodeBitSet::new(graph.number_of_nodes());
        visited.set_bit(start);
        Self {
            graph,
            visited,
            sequencer: S::init(I::new_without_predecessor(start)),
            _item: PhantomData,
        }
    }

    /// Tries to restart the search at an yet unvisited node and returns
    /// true iff successful. Requires that search came to a hold earlier,
    /// i.e. self.next() returned None
    pub fn try_restart_at_unvisited(&mut self) -> bool {
        debug_assert_eq!(self.sequencer.cardinality(), 0);
        match self.graph.vertices().find(|&u| !self.visited.get_bit(u)) {
            None => false,
            Some(x) => {
                self.visited.set_bit(x);
                self.sequencer.push(I::new_without_predecessor(x));
                true
            }
        }
    }
}

/// Partitions the nodes into the components reachable by the given adjacency.
/// Components appear in the order of their smallest node, nodes in discovery order.
pub fn components_of<G: AdjacencyList>(adj: &G) -> Vec<Vec<Node>> {
    if adj.is_empty() {
        return Vec::new();
    }

    let mut bfs = BFS::new(adj, 0);
    let mut components = Vec::new();
    loop {
        components.push(bfs.by_ref().collect_vec());
        if !bfs.try_restart_at_unvisited() {
            return components;
        }
    }
}

/// Result of [`dfs`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthFirstTraversal {
    pub start: String,
    /// Nodes in preorder
    pub order: Vec<String>,
    /// Edges along which a node was discovered, in discovery order
    pub tree_edges: Vec<String>,
    pub visited_count: usize,
    pub total_nodes: usize,
    /// *true* if every node was reached
    pub complete: bool,
}

/// Result of [`bfs`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreadthFirstTraversal {
    pub start: String,
    pub order: Vec<String>,
    /// Hop distance of every reached node from `start`
    pub levels: BTreeMap<String, u32>,
    /// Reached nodes grouped by level, each group in visiting order
    pub level_groups: Vec<Vec<String>>,
    /// BFS-tree parent of every reached node except `start`
    pub parents: BTreeMap<String, String>,
    /// Largest level reached
    pub max_level: u32,
    pub visited_count: usize,
    pub total_nodes: usize,
    pub complete: bool,
}

/// Result of [`check_connectivity`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectivityReport {
    pub connected: bool,
    pub components: Vec<Vec<String>>,
}

/// Result of [`detect_cycle`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleCheck {
    pub has_cycle: bool,
    /// The edge that closed the first cycle found
    pub closing_edge: Option<String>,
}

/// Depth-first traversal from `start`, visiting neighbors in edge insertion order.
///
/// ```
/// use wgraphs::{prelude::*, algo::*};
///
/// let mut graph = Graph::undirected();
/// for id in ["A", "B", "C", "D"] {
///     graph.add_node(id).unwrap();
/// }
/// graph.add_edge("A", "B", None).unwrap();
/// graph.add_edge("A", "C", None).unwrap();
/// graph.add_edge("B", "D", None).unwrap();
///
/// let result = dfs(&graph, "A").unwrap();
/// assert_eq!(result.order, vec!["A", "B", "D", "C"]);
/// assert!(result.complete);
/// ```
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn dfs(graph: &Graph, start: &str) -> Result<DepthFirstTraversal> {
    graph.require_nodes()?;
    let start_node = graph.node(start)?;
    let adj = Adjacency::of(graph);

    let mut visited = NodeBitSet::new(graph.number_of_nodes());
    visited.set_bit(start_node);

    let mut order = vec![start_node];
    let mut tree_edges = Vec::new();
    let mut stack: Vec<(Node, usize)> = vec![(start_node, 0)];

    while let Some(frame) = stack.last_mut() {
        let (u, pos) = *frame;
        frame.1 += 1;

        match adj.arcs_of(u).get(pos) {
            Some(arc) => {
                if !visited.set_bit(arc.target) {
                    order.push(arc.target);
                    tree_edges.push(arc.edge);
                    stack.push((arc.target, 0));
                }
            }
            None => {
                stack.pop();
            }
        }
    }

    tracing::debug!(visited = order.len(), "dfs finished");

    Ok(DepthFirstTraversal {
        start: start.to_string(),
        visited_count: order.len(),
        total_nodes: graph.len(),
        complete: order.len() == graph.len(),
        order: graph.node_ids(order),
        tree_edges: graph.edge_ids(tree_edges),
    })
}

/// Breadth-first traversal from `start` with level (hop distance) information
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn bfs(graph: &Graph, start: &str) -> Result<BreadthFirstTraversal> {
    graph.require_nodes()?;
    let start_node = graph.node(start)?;
    let adj = Adjacency::of(graph);

    let mut depth = vec![0u32; graph.len()];
    let mut order = Vec::new();
    let mut level_groups: Vec<Vec<String>> = Vec::new();
    let mut levels = BTreeMap::new();
    let mut parents = BTreeMap::new();

    for visit in BFSWithPredecessor::new(&adj, start_node) {
        let u = visit.item();
        if let Some(pred) = visit.predecessor() {
            depth[u as usize] = depth[pred as usize] + 1;
            parents.insert(
                graph.node_id(u).to_string(),
                graph.node_id(pred).to_string(),
            );
        }

        let level = depth[u as usize];
        if level_groups.len() <= level as usize {
            level_groups.push(Vec::new());
        }
        level_groups[level as usize].push(graph.node_id(u).to_string());
        levels.insert(graph.node_id(u).to_string(), level);
        order.push(u);
    }

    tracing::debug!(
        visited = order.len(),
        max_level = level_groups.len().saturating_sub(1),
        "bfs finished"
    );

    Ok(BreadthFirstTraversal {
        start: start.to_string(),
        visited_count: order.len(),
        total_nodes: graph.len(),
        complete: order.len() == graph.len(),
        order: graph.node_ids(order),
        max_level: level_groups.len().saturating_sub(1) as u32,
        levels,
        level_groups,
        parents,
    })
}

/// Checks whether the graph is connected; directed graphs are checked for *weak* connectivity.
/// All components are reported, the one containing the first node first.
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn check_connectivity(graph: &Graph) -> Result<ConnectivityReport> {
    graph.require_nodes()?;
    let adj = Adjacency::new(graph, Orientation::Undirected);

    let components = components_of(&adj)
        .into_iter()
        .map(|comp| graph.node_ids(comp))
        .collect_vec();

    tracing::debug!(components = components.len(), "connectivity checked");

    Ok(ConnectivityReport {
        connected: components.len() == 1,
        components,
    })
}

/// Number of nodes reachable from the first node ignoring edge directions
fn weakly_reached(graph: &Graph) -> usize {
    if graph.is_empty() {
        return 0;
    }
    let adj = Adjacency::new(graph, Orientation::Undirected);
    BFS::new(&adj, 0).count()
}

/// The weakly connected components, each as a list of node ids in discovery order
pub fn connected_components(graph: &Graph) -> Result<Vec<Vec<String>>> {
    Ok(check_connectivity(graph)?.components)
}

/// Fails with `DisconnectedGraph` unless the graph is weakly connected
pub(crate) fn require_weakly_connected(graph: &Graph) -> Result<()> {
    let reached = weakly_reached(graph);
    if reached == graph.len() {
        Ok(())
    } else {
        Err(GraphError::DisconnectedGraph {
            reached,
            total: graph.len(),
        })
    }
}

/// Searches for any cycle.
///
/// Directed graphs use three-state coloring, a cycle is closed by an arc into a node that is
/// still in progress. Undirected graphs flag a cycle when an already visited node is reached
/// through any edge other than the one used to enter the current node; hence self-loops and
/// parallel edges count as cycles.
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn detect_cycle(graph: &Graph) -> Result<CycleCheck> {
    graph.require_nodes()?;
    let adj = Adjacency::of(graph);

    let closing = if graph.is_directed() {
        directed_back_edge(&adj)
    } else {
        undirected_back_edge(&adj)
    };

    tracing::debug!(has_cycle = closing.is_some(), "cycle detection finished");

    Ok(CycleCheck {
        has_cycle: closing.is_some(),
        closing_edge: closing.map(|e| graph.edge(e).id.clone()),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Done,
}

fn directed_back_edge<G: AdjacencyList>(adj: &G) -> Option<NumEdges> {
    let mut color = vec![Color::Unvisited; adj.len()];
    let mut stack: Vec<(Node, usize)> = Vec::new();

    for root in adj.vertices() {
        if color[root as usize] != Color::Unvisited {
            continue;
        }

        color[root as usize] = Color::InProgress;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (u, pos) = *frame;
            frame.1 += 1;

            let Some(arc) = adj.arcs_of(u).get(pos) else {
                color[u as usize] = Color::Done;
                stack.pop();
                continue;
            };

            match color[arc.target as usize] {
                Color::InProgress => return Some(arc.edge),
                Color::Unvisited => {
                    color[arc.target as usize] = Color::InProgress;
                    stack.push((arc.target, 0));
                }
                Color::Done => {}
            }
        }
    }

    None
}

fn undirected_back_edge<G: AdjacencyList>(adj: &G) -> Option<NumEdges> {
    let mut visited = NodeBitSet::new(adj.number_of_nodes());
    // (node, edge used to enter it, position in its arc list)
    let mut stack: Vec<(Node, Option<NumEdges>, usize)> = Vec::new();

    for root in adj.vertices() {
        if visited.set_bit(root) {
            continue;
        }
        stack.push((root, None, 0));

        while let Some(frame) = stack.last_mut() {
            let (u, entry, pos) = *frame;
            frame.2 += 1;

            let Some(arc) = adj.arcs_of(u).get(pos) else {
                stack.pop();
                continue;
            };

            if Some(arc.edge) == entry {
                continue;
            }
            if visited.set_bit(arc.target) {
                return Some(arc.edge);
            }
            stack.push((arc.target, Some(arc.edge), 0));
        }
    }

    None
}
