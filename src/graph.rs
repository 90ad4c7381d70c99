/*!
# Graph Snapshot

[`Graph`] is the read-only view every algorithm runs on: an ordered list of labelled nodes, an
ordered list of (possibly parallel) edges with optional weights, and a single directedness flag
that applies to all edges alike.

Nodes are numbered `0..n` in insertion order and edges `0..m` likewise, so that algorithms can
work on dense indices and translate back to the caller's identifiers only when reporting.

The serializable [`GraphSnapshot`] is the form in which an editor hands a graph over:
```
use wgraphs::prelude::*;

let json = r#"{
    "directed": true,
    "nodes": [{ "id": "A" }, { "id": "B", "position": { "x": 1.0, "y": 2.0 } }],
    "edges": [{ "source": "A", "target": "B", "weight": 3 }]
}"#;

let graph = Graph::from_json(json).unwrap();
assert_eq!(graph.number_of_nodes(), 2);
assert_eq!(graph.edge(0).id, "A-B");
assert_eq!(graph.edge(0).weight, Some(3.0));
```
*/

use fxhash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::{error::*, prelude::*};

/// A labelled node with an optional canvas position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
}

/// A labelled edge between two node indices
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeData {
    pub id: String,
    pub endpoints: Edge,
    /// `None` if the caller supplied no (finite) weight
    pub weight: Option<Weight>,
}

impl EdgeData {
    pub fn source(&self) -> Node {
        self.endpoints.0
    }

    pub fn target(&self) -> Node {
        self.endpoints.1
    }

    /// Weight of the edge, or `default` if none was supplied
    pub fn weight_or(&self, default: Weight) -> Weight {
        self.weight.unwrap_or(default)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    directed: bool,
    nodes: Vec<NodeData>,
    edges: Vec<EdgeData>,
    node_index: FxHashMap<String, Node>,
    edge_ids: FxHashSet<String>,
}

impl Graph {
    /// Creates an empty graph
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            ..Default::default()
        }
    }

    /// Shorthand for `Graph::new(true)`
    pub fn directed() -> Self {
        Self::new(true)
    }

    /// Shorthand for `Graph::new(false)`
    pub fn undirected() -> Self {
        Self::new(false)
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Changes how all edges are interpreted
    pub fn set_directed(&mut self, directed: bool) {
        self.directed = directed;
    }

    /// Adds a node without position and returns its index.
    /// Fails with `InvalidParameter` if the id is already taken.
    pub fn add_node(&mut self, id: impl Into<String>) -> Result<Node> {
        self.insert_node(NodeData {
            id: id.into(),
            position: None,
        })
    }

    /// Adds a node at canvas position `(x, y)`
    pub fn add_node_at(&mut self, id: impl Into<String>, x: f64, y: f64) -> Result<Node> {
        self.insert_node(NodeData {
            id: id.into(),
            position: Some(Point::new(x, y)),
        })
    }

    fn insert_node(&mut self, data: NodeData) -> Result<Node> {
        if self.node_index.contains_key(&data.id) {
            return Err(GraphError::invalid_parameter(
                "node id",
                format!("duplicate node id {}", data.id),
            ));
        }

        let u = self.nodes.len() as Node;
        self.node_index.insert(data.id.clone(), u);
        self.nodes.push(data);
        Ok(u)
    }

    /// Adds an edge between two existing nodes and synthesizes its id from the endpoints
    /// (`"source-target"`, suffixed with `#k` if that id is taken already).
    ///
    /// Non-finite weights are stored as missing.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        weight: impl Into<Option<Weight>>,
    ) -> Result<NumEdges> {
        let base = format!("{source}-{target}");
        let mut id = base.clone();
        let mut k = 2;
        while self.edge_ids.contains(&id) {
            id = format!("{base}#{k}");
            k += 1;
        }

        self.add_edge_with_id(id, source, target, weight)
    }

    /// Adds an edge with an explicit id.
    /// Fails with `InvalidParameter` if the id is taken and `NoSuchVertex` if an endpoint is unknown.
    pub fn add_edge_with_id(
        &mut self,
        id: impl Into<String>,
        source: &str,
        target: &str,
        weight: impl Into<Option<Weight>>,
    ) -> Result<NumEdges> {
        let id = id.into();
        if self.edge_ids.contains(&id) {
            return Err(GraphError::invalid_parameter(
                "edge id",
                format!("duplicate edge id {id}"),
            ));
        }

        let endpoints = Edge(self.node(source)?, self.node(target)?);
        let weight = weight.into().filter(|w| w.is_finite());

        let e = self.edges.len() as NumEdges;
        self.edge_ids.insert(id.clone());
        self.edges.push(EdgeData {
            id,
            endpoints,
            weight,
        });
        Ok(e)
    }

    /// Resolves a caller id to its node index
    pub fn node(&self, id: &str) -> Result<Node> {
        self.node_index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::no_such_vertex(id))
    }

    /// Returns the caller id of node `u`
    pub fn node_id(&self, u: Node) -> &str {
        &self.nodes[u as usize].id
    }

    /// Translates a sequence of node indices into caller ids
    pub fn node_ids<I>(&self, nodes: I) -> Vec<String>
    where
        I: IntoIterator<Item = Node>,
    {
        nodes
            .into_iter()
            .map(|u| self.node_id(u).to_string())
            .collect()
    }

    /// Translates a sequence of edge indices into caller ids
    pub fn edge_ids<I>(&self, edges: I) -> Vec<String>
    where
        I: IntoIterator<Item = NumEdges>,
    {
        edges
            .into_iter()
            .map(|e| self.edge(e).id.clone())
            .collect()
    }

    pub fn position(&self, u: Node) -> Option<Point> {
        self.nodes[u as usize].position
    }

    pub fn nodes(&self) -> &[NodeData] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeData] {
        &self.edges
    }

    pub fn edge(&self, e: NumEdges) -> &EdgeData {
        &self.edges[e as usize]
    }

    /// Number of edges without a weight
    pub fn number_of_unweighted_edges(&self) -> usize {
        self.edges.iter().filter(|e| e.weight.is_none()).count()
    }

    /// Fails with `MissingWeight` unless every edge carries a weight
    pub fn require_weights(&self) -> Result<()> {
        match self.number_of_unweighted_edges() {
            0 => Ok(()),
            count => Err(GraphError::MissingWeight { count }),
        }
    }

    /// Fails with `EmptyGraph` if there are no nodes
    pub fn require_nodes(&self) -> Result<()> {
        if self.nodes.is_empty() {
            Err(GraphError::EmptyGraph { reason: "no nodes" })
        } else {
            Ok(())
        }
    }

    /// Parses a JSON [`GraphSnapshot`]
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: GraphSnapshot = serde_json::from_str(json)?;
        Self::try_from(snapshot)
    }

    /// Exports the graph into its serializable form
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            directed: self.directed,
            nodes: self.nodes.clone(),
            edges: self
                .edges
                .iter()
                .map(|e| EdgeSnapshot {
                    id: Some(e.id.clone()),
                    source: self.node_id(e.source()).to_string(),
                    target: self.node_id(e.target()).to_string(),
                    weight: e.weight,
                })
                .collect(),
        }
    }
}

impl GraphNodeOrder for Graph {
    fn number_of_nodes(&self) -> NumNodes {
        self.nodes.len() as NumNodes
    }
}

impl GraphEdgeOrder for Graph {
    fn number_of_edges(&self) -> NumEdges {
        self.edges.len() as NumEdges
    }
}

/// Serializable graph as supplied by an editor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub directed: bool,
    #[serde(default)]
    pub nodes: Vec<NodeData>,
    #[serde(default)]
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
}

impl TryFrom<GraphSnapshot> for Graph {
    type Error = GraphError;

    fn try_from(snapshot: GraphSnapshot) -> Result<Self> {
        let mut graph = Graph::new(snapshot.directed);
        for node in snapshot.nodes {
            graph.insert_node(node)?;
        }

        for edge in snapshot.edges {
            match edge.id {
                Some(id) => graph.add_edge_with_id(id, &edge.source, &edge.target, edge.weight)?,
                None => graph.add_edge(&edge.source, &edge.target, edge.weight)?,
            };
        }

        Ok(graph)
    }
}
