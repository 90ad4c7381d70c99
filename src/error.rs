//! Error types shared by all algorithms.
//!
//! Every public operation returns [`Result`]. A failure is a [`GraphError`], which can be turned
//! into a serializable [`ErrorReport`] (kind, message, optional details) for the calling editor.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// The categories a caller can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    EmptyGraph,
    NoSuchVertex,
    InsufficientVertices,
    NotApplicable,
    DisconnectedGraph,
    MissingWeight,
    NegativeCycleDetected,
    CycleDetected,
    NoPathFound,
    InvalidParameter,
}

/// One edge of a detected negative cycle, in traversal order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub weight: f64,
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph is empty: {reason}")]
    EmptyGraph { reason: &'static str },

    #[error("vertex not found: {id}")]
    NoSuchVertex { id: String },

    #[error("at least {required} vertices are required, found {found}")]
    InsufficientVertices { required: usize, found: usize },

    #[error("{algorithm} requires {requires} graph")]
    NotApplicable {
        algorithm: &'static str,
        requires: &'static str,
    },

    #[error("graph is disconnected: reached {reached} of {total} nodes")]
    DisconnectedGraph { reached: usize, total: usize },

    #[error("{count} edge(s) have no weight")]
    MissingWeight { count: usize },

    #[error("negative cycle detected through {} edge(s)", .edges.len())]
    NegativeCycleDetected { edges: Vec<CycleEdge> },

    #[error("graph contains a cycle through {} node(s)", .remaining.len())]
    CycleDetected { remaining: Vec<String> },

    #[error("no path from {from} to {to}")]
    NoPathFound { from: String, to: String },

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;

impl GraphError {
    pub fn no_such_vertex(id: impl Into<String>) -> Self {
        Self::NoSuchVertex { id: id.into() }
    }

    pub fn not_applicable(algorithm: &'static str, directed_required: bool) -> Self {
        Self::NotApplicable {
            algorithm,
            requires: if directed_required {
                "a directed"
            } else {
                "an undirected"
            },
        }
    }

    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub fn no_path(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::NoPathFound {
            from: source.into(),
            to: target.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::EmptyGraph { .. } => ErrorKind::EmptyGraph,
            GraphError::NoSuchVertex { .. } => ErrorKind::NoSuchVertex,
            GraphError::InsufficientVertices { .. } => ErrorKind::InsufficientVertices,
            GraphError::NotApplicable { .. } => ErrorKind::NotApplicable,
            GraphError::DisconnectedGraph { .. } => ErrorKind::DisconnectedGraph,
            GraphError::MissingWeight { .. } => ErrorKind::MissingWeight,
            GraphError::NegativeCycleDetected { .. } => ErrorKind::NegativeCycleDetected,
            GraphError::CycleDetected { .. } => ErrorKind::CycleDetected,
            GraphError::NoPathFound { .. } => ErrorKind::NoPathFound,
            GraphError::InvalidParameter { .. }
            | GraphError::Snapshot(_)
            | GraphError::Config(_) => ErrorKind::InvalidParameter,
        }
    }

    /// Structured statistics attached to some error kinds
    pub fn details(&self) -> Option<Value> {
        match self {
            GraphError::NoSuchVertex { id } => Some(json!({ "id": id })),
            GraphError::InsufficientVertices { required, found } => {
                Some(json!({ "required": required, "found": found }))
            }
            GraphError::DisconnectedGraph { reached, total } => {
                Some(json!({ "reached": reached, "total": total }))
            }
            GraphError::MissingWeight { count } => Some(json!({ "edgesWithoutWeight": count })),
            GraphError::NegativeCycleDetected { edges } => Some(json!({ "cycleEdges": edges })),
            GraphError::CycleDetected { remaining } => Some(json!({ "remaining": remaining })),
            GraphError::NoPathFound { from, to } => Some(json!({ "source": from, "target": to })),
            _ => None,
        }
    }

    /// Converts the error into the payload handed back across the editor boundary
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
            details: self.details(),
        }
    }
}

/// Error payload as seen by the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
