/*!
# Fixed-shape generators

Generators whose structure is determined by the number of nodes alone (apart from
[`RandomTree`], which draws the parent of every node). Only the weights are random.
*/

use super::*;

/// Every pair of distinct nodes is connected; directed graphs get both directions with
/// independent weights.
#[derive(Debug, Copy, Clone, Default)]
pub struct Complete {
    params: GenParams,
}

impl Complete {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WithParams for Complete {
    fn params(&self) -> &GenParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut GenParams {
        &mut self.params
    }
}

impl GraphGenerator for Complete {
    fn number_of_nodes(&self) -> NumNodes {
        self.params.n
    }

    fn is_directed(&self) -> bool {
        self.params.directed
    }

    fn weighted_edges<R: Rng>(&self, rng: &mut R) -> Result<Vec<(Edge, Weight)>> {
        let weights = self.params.weights.sampler()?;
        let mut edges = Vec::new();
        for (u, v) in (0..self.params.n).tuple_combinations() {
            edges.push((Edge(u, v), weights.sample(rng)));
            if self.params.directed {
                edges.push((Edge(v, u), weights.sample(rng)));
            }
        }
        Ok(edges)
    }
}

/// A single cycle through all nodes in order; requires at least `3` nodes
#[derive(Debug, Copy, Clone, Default)]
pub struct Cycle {
    params: GenParams,
}

impl Cycle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WithParams for Cycle {
    fn params(&self) -> &GenParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut GenParams {
        &mut self.params
    }
}

impl GraphGenerator for Cycle {
    fn number_of_nodes(&self) -> NumNodes {
        self.params.n
    }

    fn is_directed(&self) -> bool {
        self.params.directed
    }

    fn weighted_edges<R: Rng>(&self, rng: &mut R) -> Result<Vec<(Edge, Weight)>> {
        require_at_least("cycle length", self.params.n, 3)?;
        let weights = self.params.weights.sampler()?;

        let n = self.params.n;
        Ok((0..n)
            .map(|u| (Edge(u, (u + 1) % n), weights.sample(rng)))
            .collect())
    }
}

/// The first node (the center) is connected to every other node; requires at least `2` nodes
#[derive(Debug, Copy, Clone, Default)]
pub struct Star {
    params: GenParams,
}

impl Star {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WithParams for Star {
    fn params(&self) -> &GenParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut GenParams {
        &mut self.params
    }
}

impl GraphGenerator for Star {
    fn number_of_nodes(&self) -> NumNodes {
        self.params.n
    }

    fn is_directed(&self) -> bool {
        self.params.directed
    }

    fn weighted_edges<R: Rng>(&self, rng: &mut R) -> Result<Vec<(Edge, Weight)>> {
        require_at_least("star size", self.params.n, 2)?;
        let weights = self.params.weights.sampler()?;

        Ok((1..self.params.n)
            .map(|v| (Edge(0, v), weights.sample(rng)))
            .collect())
    }
}

/// Random tree rooted at the first node.
///
/// Node `i > 0` is attached to a parent drawn uniformly from `0..i`, so every edge points away
/// from the root when the graph is directed.
#[derive(Debug, Copy, Clone, Default)]
pub struct RandomTree {
    params: GenParams,
}

impl RandomTree {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WithParams for RandomTree {
    fn params(&self) -> &GenParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut GenParams {
        &mut self.params
    }
}

impl GraphGenerator for RandomTree {
    fn number_of_nodes(&self) -> NumNodes {
        self.params.n
    }

    fn is_directed(&self) -> bool {
        self.params.directed
    }

    fn weighted_edges<R: Rng>(&self, rng: &mut R) -> Result<Vec<(Edge, Weight)>> {
        require_at_least("tree size", self.params.n, 1)?;
        let weights = self.params.weights.sampler()?;

        Ok((1..self.params.n)
            .map(|v| {
                let parent = rng.random_range(0..v);
                (Edge(parent, v), weights.sample(rng))
            })
            .collect())
    }
}
