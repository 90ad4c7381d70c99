//! Engine configuration.
//!
//! All tunables of the iterative and enumerative algorithms live in [`EngineConfig`], which can
//! be loaded from TOML. Missing sections and keys fall back to their defaults:
//!
//! ```
//! use wgraphs::config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(
//!     r#"
//!     [pagerank]
//!     damping_factor = 0.9
//!
//!     [hamiltonian]
//!     max_cycles = 10
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.pagerank.damping_factor, 0.9);
//! assert_eq!(config.pagerank.max_iterations, 100);
//! assert_eq!(config.hamiltonian.max_cycles, 10);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub pagerank: PageRankConfig,
    pub hamiltonian: HamiltonianConfig,
    pub enumeration: EnumerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRankConfig {
    pub damping_factor: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            max_iterations: 100,
            tolerance: 1e-4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HamiltonianConfig {
    /// Stop after this many cycles were accepted
    pub max_cycles: usize,
}

impl Default for HamiltonianConfig {
    fn default() -> Self {
        Self { max_cycles: 100 }
    }
}

/// Input size limits for the brute-force searches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationConfig {
    /// Upper bound on the number of `(n-1)`-edge subsets a spanning tree enumeration may test
    pub max_edge_subsets: u64,
    /// Upper bound on the number of vertex orderings the four-vertex search may test
    pub max_vertex_orderings: u64,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            max_edge_subsets: 1_000_000,
            max_vertex_orderings: 5_000_000,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn empty_input_gives_defaults() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn roundtrip() {
        let mut config = EngineConfig::default();
        config.enumeration.max_edge_subsets = 42;

        let copy = EngineConfig::from_toml_str(&config.to_toml_string()).unwrap();
        assert_eq!(copy, config);
    }

    #[test]
    fn bad_types_are_rejected() {
        let err = EngineConfig::from_toml_str("[pagerank]\ndamping_factor = \"high\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
}
