use std::fmt::{Debug, Display};

use stream_bitset::bitset::BitSetImpl;

use crate::node::Node;

/// An edge is defined by two nodes/endpoints.
/// Whether it is read as directed or not is decided by the owning graph.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(pub Node, pub Node);

/// Edges are addressed by their insertion index.
pub type NumEdges = u32;

/// A BitSet over edge indices
pub type EdgeBitSet = BitSetImpl<NumEdges>;

/// Edge weights (and capacities) are plain floats
pub type Weight = f64;

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Edge {
    /// Reverses the edge by switching the endpoints
    pub fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }
}
