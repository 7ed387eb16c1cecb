//! Document error types

use thiserror::Error;

use crate::document::NodeId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node is not an element: {0}")]
    NotAnElement(NodeId),

    #[error("Unknown key: {0}")]
    UnknownKey(String),
}
