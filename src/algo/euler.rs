/*!
# Euler trails and circuits

A graph with at least one edge has an Euler circuit if it is connected (weakly, for directed
graphs) and every node is balanced: even degree when undirected, in-degree equal to out-degree
when directed. It has an Euler trail if instead exactly two nodes are unbalanced, namely two odd
nodes, or one node with one surplus out-edge (the start) and one with one surplus in-edge (the
end).

[`euler_analysis`] only classifies; [`euler_trail`] also walks the trail with Hierholzer's
algorithm.
*/

use super::{traversal::require_weakly_connected, *};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EulerKind {
    Circuit,
    Trail,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EulerAnalysis {
    pub kind: EulerKind,
    /// Where a trail has to start (for circuits: any node, reported as the first one with edges)
    pub start: Option<String>,
    pub end: Option<String>,
    /// Nodes of odd degree (undirected) or with in-degree != out-degree (directed)
    pub unbalanced: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EulerTrail {
    pub kind: EulerKind,
    /// Visited nodes; one more than the number of edges
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
}

struct Classification {
    kind: EulerKind,
    start: Option<Node>,
    end: Option<Node>,
    unbalanced: Vec<Node>,
}

fn classify(graph: &Graph) -> Result<Classification> {
    graph.require_nodes()?;
    if graph.number_of_edges() == 0 {
        return Err(GraphError::EmptyGraph { reason: "no edges" });
    }
    require_weakly_connected(graph)?;

    let adj = Adjacency::of(graph);
    let first_with_edges = graph.vertices().find(|&u| adj.degree_of(u) > 0);

    if graph.is_directed() {
        // out - in per node
        let mut surplus = vec![0i64; graph.len()];
        for edge in graph.edges() {
            surplus[edge.source() as usize] += 1;
            surplus[edge.target() as usize] -= 1;
        }

        let unbalanced = graph.vertices().filter(|&u| surplus[u as usize] != 0).collect_vec();
        let start = unbalanced.iter().copied().find(|&u| surplus[u as usize] == 1);
        let end = unbalanced.iter().copied().find(|&u| surplus[u as usize] == -1);

        let (kind, start, end) = match unbalanced.len() {
            0 => (EulerKind::Circuit, first_with_edges, first_with_edges),
            2 if start.is_some() && end.is_some() => (EulerKind::Trail, start, end),
            _ => (EulerKind::None, None, None),
        };
        Ok(Classification {
            kind,
            start,
            end,
            unbalanced,
        })
    } else {
        let unbalanced = graph.vertices().filter(|&u| adj.degree_of(u) % 2 == 1).collect_vec();

        let (kind, start, end) = match unbalanced.as_slice() {
            [] => (EulerKind::Circuit, first_with_edges, first_with_edges),
            &[a, b] => (EulerKind::Trail, Some(a), Some(b)),
            _ => (EulerKind::None, None, None),
        };
        Ok(Classification {
            kind,
            start,
            end,
            unbalanced,
        })
    }
}

/// Decides whether an Euler circuit or trail exists.
///
/// Fails with `EmptyGraph` if there are no nodes or no edges and with `DisconnectedGraph` if
/// some node, isolated ones included, cannot be reached.
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn euler_analysis(graph: &Graph) -> Result<EulerAnalysis> {
    let class = classify(graph)?;
    tracing::debug!(kind = ?class.kind, unbalanced = class.unbalanced.len(), "euler analysis finished");

    Ok(EulerAnalysis {
        kind: class.kind,
        start: class.start.map(|u| graph.node_id(u).to_string()),
        end: class.end.map(|u| graph.node_id(u).to_string()),
        unbalanced: graph.node_ids(class.unbalanced),
    })
}

/// Constructs an Euler circuit or trail, `None` if there is neither.
///
/// Hierholzer's algorithm with an explicit stack: follow unused edges until stuck, then back up
/// and splice in the detours found on the way back.
///
/// ```
/// use wgraphs::{prelude::*, algo::*};
///
/// let mut graph = Graph::undirected();
/// for id in ["A", "B", "C"] {
///     graph.add_node(id).unwrap();
/// }
/// graph.add_edge("A", "B", None).unwrap();
/// graph.add_edge("B", "C", None).unwrap();
///
/// let trail = euler_trail(&graph).unwrap().unwrap();
/// assert_eq!(trail.kind, EulerKind::Trail);
/// assert_eq!(trail.nodes, vec!["A", "B", "C"]);
/// ```
#[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
pub fn euler_trail(graph: &Graph) -> Result<Option<EulerTrail>> {
    let class = classify(graph)?;
    let Some(start) = class.start else {
        return Ok(None);
    };

    let adj = Adjacency::of(graph);
    let mut used = EdgeBitSet::new(graph.number_of_edges());
    let mut next_arc = vec![0usize; graph.len()];

    let mut stack: Vec<(Node, Option<NumEdges>)> = vec![(start, None)];
    let mut walk = Vec::with_capacity(graph.number_of_edges() as usize + 1);

    while let Some(&(u, _)) = stack.last() {
        let arcs = adj.arcs_of(u);
        let pos = &mut next_arc[u as usize];
        while *pos < arcs.len() && used.get_bit(arcs[*pos].edge) {
            *pos += 1;
        }

        match arcs.get(*pos) {
            Some(arc) => {
                used.set_bit(arc.edge);
                stack.push((arc.target, Some(arc.edge)));
            }
            None => {
                if let Some(step) = stack.pop() {
                    walk.push(step);
                }
            }
        }
    }
    walk.reverse();

    let nodes = walk.iter().map(|&(u, _)| u).collect_vec();
    let edges = walk.iter().filter_map(|&(_, e)| e).collect_vec();
    debug_assert_eq!(edges.len(), graph.number_of_edges() as usize);

    tracing::debug!(kind = ?class.kind, length = edges.len(), "euler trail constructed");

    Ok(Some(EulerTrail {
        kind: class.kind,
        nodes: graph.node_ids(nodes),
        edges: graph.edge_ids(edges),
    }))
}
