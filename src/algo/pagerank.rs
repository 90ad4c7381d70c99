/*!
# PageRank

Power iteration of
`rank'(v) = t(v) + d * Σ rank(u) / outdeg(u)` over all arcs `u -> v`,
where `t(v)` is the teleport mass: `(1 - d) / n` for every node in the global variant and
`1 - d` for the start node only (`0` elsewhere) in the personalized one. Undirected edges
contribute in both directions, both to in-links and out-degrees.

Mass sitting on nodes without out-arcs is not redistributed during the iteration; instead the
final ranks are renormalized to sum to `1`. Iteration stops as soon as the summed absolute
change of one round drops below the tolerance, or after `max_iterations` rounds.

With [`PageRank::record_steps`] the result additionally carries the (not yet renormalized)
ranks after every round, e.g. for animating the convergence.

```
use wgraphs::{prelude::*, algo::*};

let mut graph = Graph::directed();
for id in ["A", "B", "C"] {
    graph.add_node(id).unwrap();
}
graph.add_edge("A", "C", None).unwrap();
graph.add_edge("B", "C", None).unwrap();
graph.add_edge("C", "A", None).unwrap();

let result = PageRank::new().damping_factor(0.85).run(&graph).unwrap();
assert_eq!(result.ranked[0].id, "C");
assert!((result.ranks().map(|(_, r)| r).sum::<f64>() - 1.0).abs() < 1e-9);
```
*/

use super::*;
use crate::config::PageRankConfig;

/// A node with its final rank
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNode {
    pub id: String,
    pub rank: f64,
}

/// Ranks after one round of the power iteration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankStep {
    /// Round number, starting at `1`
    pub iteration: usize,
    /// Summed absolute change of this round
    pub residual: f64,
    /// All nodes in node order; not renormalized
    pub ranks: Vec<RankedNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRankResult {
    /// All nodes by descending rank; equal ranks keep node order
    pub ranked: Vec<RankedNode>,
    pub iterations: usize,
    pub converged: bool,
    /// Summed absolute change of every performed iteration
    pub residuals: Vec<f64>,
    pub damping_factor: f64,
    /// Start node of a personalized run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personalized_for: Option<String>,
    /// One entry per iteration if requested via [`PageRank::record_steps`]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<RankStep>,
}

impl PageRankResult {
    /// Rank of node `id`
    pub fn rank_of(&self, id: &str) -> Option<f64> {
        self.ranked.iter().find(|r| r.id == id).map(|r| r.rank)
    }

    /// `(id, rank)` pairs in descending rank order
    pub fn ranks(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.ranked.iter().map(|r| (r.id.as_str(), r.rank))
    }

    /// The `n` highest ranked nodes (fewer if the graph is smaller)
    pub fn top(&self, n: usize) -> &[RankedNode] {
        &self.ranked[..n.min(self.ranked.len())]
    }
}

/// Configurable PageRank computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRank {
    damping_factor: f64,
    max_iterations: usize,
    tolerance: f64,
    record_steps: bool,
}

impl Default for PageRank {
    fn default() -> Self {
        Self::from_config(&PageRankConfig::default())
    }
}

impl PageRank {
    /// PageRank with damping `0.85`, at most `100` iterations and tolerance `1e-4`
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &PageRankConfig) -> Self {
        Self {
            damping_factor: config.damping_factor,
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
            record_steps: false,
        }
    }

    /// Probability of following an out-arc instead of teleporting; must be in `[0, 1]`
    pub fn damping_factor(mut self, damping_factor: f64) -> Self {
        self.damping_factor = damping_factor;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Non-negative convergence threshold on the summed absolute change per iteration
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Keep a snapshot of all ranks after every iteration (default: off)
    pub fn record_steps(mut self, record_steps: bool) -> Self {
        self.record_steps = record_steps;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.damping_factor.is_valid_probility() {
            return Err(GraphError::invalid_parameter(
                "damping factor",
                format!("{} is not within [0, 1]", self.damping_factor),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(GraphError::invalid_parameter(
                "tolerance",
                format!("{} is not a non-negative number", self.tolerance),
            ));
        }
        Ok(())
    }

    /// Global PageRank with uniform teleportation
    #[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
    pub fn run(&self, graph: &Graph) -> Result<PageRankResult> {
        graph.require_nodes()?;
        self.validate()?;

        let n = graph.len();
        let uniform = 1.0 / n as f64;
        let result = self.iterate(graph, vec![uniform; n], |_| {
            (1.0 - self.damping_factor) * uniform
        });
        Ok(self.finish(graph, result, None))
    }

    /// PageRank where all initial mass and all teleportation go to `start`
    #[tracing::instrument(skip(graph), fields(nodes = graph.number_of_nodes()))]
    pub fn run_personalized(&self, graph: &Graph, start: &str) -> Result<PageRankResult> {
        graph.require_nodes()?;
        let s = graph.node(start)?;
        self.validate()?;

        let mut initial = vec![0.0; graph.len()];
        initial[s as usize] = 1.0;
        let result = self.iterate(graph, initial, |u| {
            if u == s { 1.0 - self.damping_factor } else { 0.0 }
        });
        Ok(self.finish(graph, result, Some(s)))
    }

    fn iterate<T>(&self, graph: &Graph, mut ranks: Vec<f64>, teleport: T) -> Iteration
    where
        T: Fn(Node) -> f64,
    {
        let adj = Adjacency::of(graph);
        let mut next = vec![0.0; ranks.len()];
        let mut residuals = Vec::new();
        let mut snapshots = Vec::new();
        let mut converged = false;

        while residuals.len() < self.max_iterations {
            for (v, r) in next.iter_mut().enumerate() {
                *r = teleport(v as Node);
            }
            for u in graph.vertices() {
                let out = adj.degree_of(u);
                if out == 0 {
                    continue;
                }
                let share = self.damping_factor * ranks[u as usize] / out as f64;
                for v in adj.neighbors_of(u) {
                    next[v as usize] += share;
                }
            }

            let diff: f64 = ranks.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
            std::mem::swap(&mut ranks, &mut next);
            residuals.push(diff);
            if self.record_steps {
                snapshots.push(ranks.clone());
            }
            tracing::trace!(iteration = residuals.len(), diff, "pagerank iteration");

            if diff < self.tolerance {
                converged = true;
                break;
            }
        }

        Iteration {
            ranks,
            residuals,
            snapshots,
            converged,
        }
    }

    fn finish(&self, graph: &Graph, mut it: Iteration, start: Option<Node>) -> PageRankResult {
        let total: f64 = it.ranks.iter().sum();
        if total > 0.0 {
            for r in &mut it.ranks {
                *r /= total;
            }
        } else {
            // all mass leaked through nodes without out-arcs (only possible for d = 1)
            let fallback: Vec<f64> = match start {
                Some(s) => (0..it.ranks.len()).map(|u| if u == s as usize { 1.0 } else { 0.0 }).collect(),
                None => vec![1.0 / it.ranks.len() as f64; it.ranks.len()],
            };
            it.ranks = fallback;
        }

        let in_node_order = |ranks: &[f64]| {
            graph
                .vertices()
                .map(|u| RankedNode {
                    id: graph.node_id(u).to_string(),
                    rank: ranks[u as usize],
                })
                .collect_vec()
        };

        let steps = it
            .snapshots
            .iter()
            .zip(&it.residuals)
            .enumerate()
            .map(|(i, (ranks, &residual))| RankStep {
                iteration: i + 1,
                residual,
                ranks: in_node_order(ranks),
            })
            .collect_vec();

        let mut ranked = in_node_order(&it.ranks);
        ranked.sort_by(|a, b| b.rank.total_cmp(&a.rank));

        tracing::debug!(
            iterations = it.residuals.len(),
            converged = it.converged,
            "pagerank finished"
        );

        PageRankResult {
            ranked,
            iterations: it.residuals.len(),
            converged: it.converged,
            residuals: it.residuals,
            damping_factor: self.damping_factor,
            personalized_for: start.map(|s| graph.node_id(s).to_string()),
            steps,
        }
    }
}

struct Iteration {
    ranks: Vec<f64>,
    residuals: Vec<f64>,
    /// Ranks after every round, only filled when steps are recorded
    snapshots: Vec<Vec<f64>>,
    converged: bool,
}

/// Global PageRank with the default parameters
pub fn pagerank(graph: &Graph) -> Result<PageRankResult> {
    PageRank::new().run(graph)
}

/// Personalized PageRank from `start` with the default parameters
pub fn personalized_pagerank(graph: &Graph, start: &str) -> Result<PageRankResult> {
    PageRank::new().run_personalized(graph, start)
}

/// The `n` highest ranked nodes under the default parameters
pub fn top_pagerank_nodes(graph: &Graph, n: usize) -> Result<Vec<RankedNode>> {
    Ok(pagerank(graph)?.top(n).to_vec())
}
