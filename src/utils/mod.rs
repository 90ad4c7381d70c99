/*!
# Utilities

Small helpers used throughout the algorithms:
- [`combinatorics`]: k-subsets and k-permutations of an ordered sequence plus capped binomials,
- [`UnionFind`]: disjoint sets with path compression and union by rank,
- [`MinScored`]: min-heap entries over `f64` scores with a deterministic tie-break,
- [`Probability`]: range checks for probabilities and damping factors.
*/

use num::{One, Zero};

pub mod combinatorics;
mod scored;
mod union_find;

pub use scored::MinScored;
pub use union_find::UnionFind;

/// Helper trait for probalities
pub trait Probability {
    /// Returns *true* if the probality is valid (ie. between `0` and `1`)
    fn is_valid_probility(&self) -> bool;
}

impl<P> Probability for P
where
    P: Zero + One + PartialOrd,
{
    fn is_valid_probility(&self) -> bool {
        Self::zero().le(self) && Self::one().ge(self)
    }
}
