//! Error type shared by the snarl finder, the path index and the
//! traversal finders.

use thiserror::Error;

use crate::handle::{Handle, NodeId};
use crate::snarls::{SnarlId, SnarlType};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnarlError {
    /// Traversal finding was asked for a snarl it can't handle
    #[error("snarl {start} -> {end} is {snarl_type}, expected an ultrabubble")]
    NotUltrabubble {
        start: Handle,
        end: Handle,
        snarl_type: SnarlType,
    },

    #[error("snarl {start} -> {end} is unary and has no traversals")]
    UnarySnarl { start: Handle, end: Handle },

    /// Only paths that visit each node at most once can be indexed
    #[error("path {path} visits node {node} more than once")]
    PathRevisitsNode { path: String, node: NodeId },

    #[error("no path named {0}")]
    MissingPath(String),

    #[error("node {0} is referenced but missing from the graph")]
    MissingNode(NodeId),

    #[error("no snarl with ID {0}")]
    UnknownSnarl(SnarlId),

    /// The path index and the snarl tree disagree about the graph
    #[error("backbone inconsistency: {message}")]
    BackboneInconsistency { message: String },
}

pub type Result<T> = std::result::Result<T, SnarlError>;

impl SnarlError {
    pub fn backbone(message: impl Into<String>) -> Self {
        Self::BackboneInconsistency {
            message: message.into(),
        }
    }
}
