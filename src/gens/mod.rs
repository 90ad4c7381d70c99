/*!
# Graph Generators

Random weighted graphs of a few common shapes, meant for populating an editor canvas or feeding
the algorithms with test input. Every generator is a small builder:

1. Create a generator instance (e.g., `Gnp::new()`).
2. Set parameters using the builder traits (e.g., `.nodes(n).prob(p).weights(1, 10)`).
3. Draw the edges via `weighted_edges()` or a complete [`Graph`] via `generate()`.

Node ids are `A` to `Z` for the first 26 nodes and `N26`, `N27`, ... afterwards. Edge ids follow
the usual `"source-target"` scheme of [`Graph::add_edge`]. Weights are integers drawn uniformly
from the configured inclusive range (default `1..=10`).

Supported shapes:
- [`Complete`]: every pair of nodes (both directions when directed)
- [`Cycle`]: `A -> B -> ... -> A`
- [`Star`]: the first node connected to all others
- [`RandomTree`]: every node attached to a uniformly chosen earlier node
- [`Gnp`]: every pair of nodes independently with probability `p`
- [`Bipartite`]: every left node joined to a random non-empty subset of the right side

```
use wgraphs::{prelude::*, gens::*};

let mut rng = rand::rng();
let graph = Complete::new().nodes(4).weights(2, 5).generate(&mut rng).unwrap();

assert_eq!(graph.number_of_edges(), 6);
assert!(graph.edges().iter().all(|e| (2.0..=5.0).contains(&e.weight_or(0.0))));
```
*/

use itertools::Itertools;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::{error::*, prelude::*};

mod random;
mod structured;

pub use random::*;
pub use structured::*;

/// Id of the `u`-th generated node
pub fn node_label(u: Node) -> String {
    match u {
        0..26 => char::from(b'A' + u as u8).to_string(),
        _ => format!("N{u}"),
    }
}

/// Inclusive range of integer edge weights
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WeightRange {
    pub min: u32,
    pub max: u32,
}

impl Default for WeightRange {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

impl WeightRange {
    /// Uniform sampler over the range; fails with `InvalidParameter` if `min > max`
    pub fn sampler(&self) -> Result<WeightSampler> {
        Uniform::new_inclusive(self.min, self.max)
            .map(WeightSampler)
            .map_err(|_| {
                GraphError::invalid_parameter(
                    "weight range",
                    format!("minimum {} exceeds maximum {}", self.min, self.max),
                )
            })
    }
}

/// Draws integer weights as [`Weight`]
#[derive(Debug, Copy, Clone)]
pub struct WeightSampler(Uniform<u32>);

impl Distribution<Weight> for WeightSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Weight {
        self.0.sample(rng) as Weight
    }
}

/// Parameters shared by the single-sided generators
#[derive(Debug, Copy, Clone, Default)]
pub struct GenParams {
    pub n: NumNodes,
    pub directed: bool,
    pub weights: WeightRange,
}

/// Gives the builder traits access to a generator's [`GenParams`]
pub trait WithParams {
    fn params(&self) -> &GenParams;
    fn params_mut(&mut self) -> &mut GenParams;
}

/// Trait for generators that allow setting the number of nodes.
pub trait NumNodesGen {
    /// Sets the number of nodes in the graph generator.
    fn nodes(self, n: NumNodes) -> Self;
}

/// Trait for generators that can produce directed or undirected graphs.
pub trait DirectedGen {
    /// Whether the generated graph is directed (default: undirected)
    fn directed(self, directed: bool) -> Self;
}

/// Trait for generators drawing random edge weights.
pub trait WeightRangeGen {
    /// Sets the inclusive range of edge weights
    fn weights(self, min: u32, max: u32) -> Self;
}

impl<G: WithParams> NumNodesGen for G {
    fn nodes(mut self, n: NumNodes) -> Self {
        self.params_mut().n = n;
        self
    }
}

impl<G: WithParams> DirectedGen for G {
    fn directed(mut self, directed: bool) -> Self {
        self.params_mut().directed = directed;
        self
    }
}

impl<G: WithParams> WeightRangeGen for G {
    fn weights(mut self, min: u32, max: u32) -> Self {
        self.params_mut().weights = WeightRange { min, max };
        self
    }
}

/// General trait for a configurable random weighted graph generator.
pub trait GraphGenerator {
    fn number_of_nodes(&self) -> NumNodes;

    fn is_directed(&self) -> bool;

    /// Draws the weighted edges over nodes `0..n`.
    ///
    /// Fails with `InvalidParameter` if the configuration is unusable (e.g. too few nodes for the
    /// shape or an empty weight range).
    fn weighted_edges<R>(&self, rng: &mut R) -> Result<Vec<(Edge, Weight)>>
    where
        R: Rng;

    /// Builds a complete [`Graph`] with generated node ids
    fn generate<R>(&self, rng: &mut R) -> Result<Graph>
    where
        R: Rng,
    {
        let edges = self.weighted_edges(rng)?;
        let labels = (0..self.number_of_nodes()).map(node_label).collect_vec();

        let mut graph = Graph::new(self.is_directed());
        for label in &labels {
            graph.add_node(label.as_str())?;
        }
        for (Edge(u, v), weight) in edges {
            graph.add_edge(&labels[u as usize], &labels[v as usize], weight)?;
        }

        tracing::debug!(
            nodes = graph.number_of_nodes(),
            edges = graph.number_of_edges(),
            "graph generated"
        );
        Ok(graph)
    }
}

/// Fails with `InvalidParameter` unless `n >= required`
pub(crate) fn require_at_least(name: &'static str, n: NumNodes, required: NumNodes) -> Result<()> {
    if n < required {
        Err(GraphError::invalid_parameter(
            name,
            format!("at least {required} nodes required, got {n}"),
        ))
    } else {
        Ok(())
    }
}
