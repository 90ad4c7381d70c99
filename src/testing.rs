//! Fixtures shared by the test modules of the algorithms

use crate::prelude::*;

pub use crate::gens::{DirectedGen, Gnp, GraphGenerator, NumNodesGen, WeightRangeGen};

/// Builds a graph from node ids and `(source, target, weight)` triples
pub fn weighted_graph(directed: bool, nodes: &[&str], edges: &[(&str, &str, f64)]) -> Graph {
    let mut graph = Graph::new(directed);
    for id in nodes {
        graph.add_node(*id).unwrap();
    }
    for (u, v, w) in edges {
        graph.add_edge(u, v, *w).unwrap();
    }
    graph
}

/// Builds a graph where no edge carries a weight
pub fn unweighted_graph(directed: bool, nodes: &[&str], edges: &[(&str, &str)]) -> Graph {
    let mut graph = Graph::new(directed);
    for id in nodes {
        graph.add_node(*id).unwrap();
    }
    for (u, v) in edges {
        graph.add_edge(u, v, None).unwrap();
    }
    graph
}

/// Sorts nodes within each component and the components themselves
pub fn sort_components(mut components: Vec<Vec<String>>) -> Vec<Vec<String>> {
    for comp in &mut components {
        comp.sort();
    }
    components.sort();
    components
}
