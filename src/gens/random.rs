use rand_distr::Bernoulli;

use super::*;
use crate::utils::Probability;

/// A G(n, p) graph can be defined by either a probability or the average degree which is more
/// common in practice
#[derive(Debug, Copy, Clone, Default)]
enum GnpType {
    /// No value has been set yet
    #[default]
    NotSet,
    /// Direct probability value
    Prob(f64),
    /// Average degree of a node
    AvgDeg(f64),
}

/// `G(n,p)` graphs contain every possible edge between two distinct nodes with probability `p`
/// independent from each other.
///
/// Undirected graphs draw each unordered pair once, directed graphs each ordered pair. Self-loops
/// are never generated.
#[derive(Debug, Copy, Clone, Default)]
pub struct Gnp {
    params: GenParams,
    p: GnpType,
}

impl Gnp {
    /// Creates a new empty `G(n,p)` generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates `p` directly
    pub fn prob(mut self, prob: f64) -> Self {
        self.p = GnpType::Prob(prob);
        self
    }

    /// Updates `p` such that every node has `deg` incident (or outgoing) edges in expectation.
    /// The conversion happens when edges are drawn.
    pub fn avg_deg(mut self, deg: f64) -> Self {
        self.p = GnpType::AvgDeg(deg);
        self
    }

    fn probability(&self) -> Result<f64> {
        let p = match self.p {
            GnpType::NotSet => {
                return Err(GraphError::invalid_parameter(
                    "edge probability",
                    "neither a probability nor an average degree was set",
                ));
            }
            GnpType::Prob(p) => p,
            GnpType::AvgDeg(d) => d / self.params.n.saturating_sub(1).max(1) as f64,
        };

        if p.is_valid_probility() {
            Ok(p)
        } else {
            Err(GraphError::invalid_parameter(
                "edge probability",
                format!("{p} is not within [0, 1]"),
            ))
        }
    }
}

impl WithParams for Gnp {
    fn params(&self) -> &GenParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut GenParams {
        &mut self.params
    }
}

impl GraphGenerator for Gnp {
    fn number_of_nodes(&self) -> NumNodes {
        self.params.n
    }

    fn is_directed(&self) -> bool {
        self.params.directed
    }

    fn weighted_edges<R: Rng>(&self, rng: &mut R) -> Result<Vec<(Edge, Weight)>> {
        let coin = Bernoulli::new(self.probability()?)
            .map_err(|err| GraphError::invalid_parameter("edge probability", err.to_string()))?;
        let weights = self.params.weights.sampler()?;

        let n = self.params.n;
        let directed = self.params.directed;
        let mut edges = Vec::new();
        for (u, v) in (0..n).cartesian_product(0..n) {
            let candidate = if directed { u != v } else { u < v };
            if candidate && coin.sample(rng) {
                edges.push((Edge(u, v), weights.sample(rng)));
            }
        }
        Ok(edges)
    }
}

/// Bipartite graphs with `left` nodes followed by `right` nodes.
///
/// Every left node draws a number `k` uniformly from `1..=right` and then `k` right nodes with
/// replacement; it is connected to each distinct right node drawn. Edges always point from left
/// to right.
#[derive(Debug, Copy, Clone)]
pub struct Bipartite {
    left: NumNodes,
    right: NumNodes,
    directed: bool,
    weights: WeightRange,
}

impl Default for Bipartite {
    fn default() -> Self {
        Self {
            left: 1,
            right: 1,
            directed: false,
            weights: WeightRange::default(),
        }
    }
}

impl Bipartite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sizes of both sides
    pub fn sides(mut self, left: NumNodes, right: NumNodes) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    /// Returns *true* if `u` belongs to the left side
    pub fn is_left(&self, u: Node) -> bool {
        u < self.left
    }
}

impl DirectedGen for Bipartite {
    fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }
}

impl WeightRangeGen for Bipartite {
    fn weights(mut self, min: u32, max: u32) -> Self {
        self.weights = WeightRange { min, max };
        self
    }
}

impl GraphGenerator for Bipartite {
    fn number_of_nodes(&self) -> NumNodes {
        self.left + self.right
    }

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn weighted_edges<R: Rng>(&self, rng: &mut R) -> Result<Vec<(Edge, Weight)>> {
        require_at_least("left side", self.left, 1)?;
        require_at_least("right side", self.right, 1)?;
        let weights = self.weights.sampler()?;

        let mut edges = Vec::new();
        let mut chosen = NodeBitSet::new(self.right);
        for u in 0..self.left {
            chosen.clear_all();
            let k = rng.random_range(1..=self.right);
            for _ in 0..k {
                chosen.set_bit(rng.random_range(0..self.right));
            }

            for v in chosen.iter_set_bits() {
                edges.push((Edge(u, self.left + v), weights.sample(rng)));
            }
        }
        Ok(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algo::*, error::ErrorKind};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn gnp_extremes() {
        let rng = &mut Pcg64Mcg::seed_from_u64(1);
        for n in [1, 5, 12] {
            let empty = Gnp::new().nodes(n).prob(0.0).generate(rng).unwrap();
            assert_eq!(empty.number_of_edges(), 0);

            let full = Gnp::new().nodes(n).prob(1.0).generate(rng).unwrap();
            assert_eq!(full.number_of_edges(), n * (n - 1) / 2);

            let full = Gnp::new().nodes(n).prob(1.0).directed(true).generate(rng).unwrap();
            assert_eq!(full.number_of_edges(), n * (n - 1));
        }
    }

    #[test]
    fn gnp_density() {
        let rng = &mut Pcg64Mcg::seed_from_u64(2);
        let n = 60;
        let graph = Gnp::new().nodes(n).avg_deg(6.0).generate(rng).unwrap();

        // expected number of edges: n * d / 2 = 180
        let m = graph.number_of_edges();
        assert!((120..240).contains(&m), "{m} edges");
        assert!(graph.edges().iter().all(|e| e.endpoints.0 != e.endpoints.1));
    }

    #[test]
    fn gnp_invalid_probability() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        for generator in [
            Gnp::new().nodes(4),
            Gnp::new().nodes(4).prob(1.5),
            Gnp::new().nodes(4).prob(-0.5),
            Gnp::new().nodes(4).avg_deg(10.0),
        ] {
            assert_eq!(
                generator.generate(rng).unwrap_err().kind(),
                ErrorKind::InvalidParameter
            );
        }
    }

    #[test]
    fn bipartite_structure() {
        let rng = &mut Pcg64Mcg::seed_from_u64(4);
        for _ in 0..20 {
            let generator = Bipartite::new().sides(4, 5);
            let graph = generator.generate(rng).unwrap();
            assert_eq!(graph.number_of_nodes(), 9);

            for edge in graph.edges() {
                assert!(generator.is_left(edge.source()));
                assert!(!generator.is_left(edge.target()));
            }
            for u in 0..4 {
                assert!(graph.edges().iter().any(|e| e.source() == u));
            }

            // every right node is joined at most once per left node
            let ids = graph.edges().iter().map(|e| e.id.clone()).sorted().dedup().count();
            assert_eq!(ids, graph.edges().len());
        }

        assert!(Bipartite::new().sides(0, 3).generate(rng).is_err());
    }

    #[test]
    fn directed_bipartite_is_acyclic() {
        let rng = &mut Pcg64Mcg::seed_from_u64(5);
        let graph = Bipartite::new().sides(3, 3).directed(true).generate(rng).unwrap();
        assert!(is_acyclic(&graph).unwrap());
    }
}
