//! In-memory model of the synchronized tree.
//!
//! [`TrackedTree`] holds the entries observed by previous scans, the
//! [`IdentifierIndex`] maps native filesystem identifiers back to the node
//! that currently owns them.

mod index;
mod tree;

pub use index::*;
pub use tree::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Node not found, {0:?}")]
    NodeNotFound(NodeId),
    #[error("Not a directory, {0:?}")]
    NotADirectory(NodeId),
    #[error("Duplicate name `{name}` under {parent:?}")]
    DuplicateName { parent: NodeId, name: String },
    #[error("The root node cannot be removed")]
    RemoveRoot,
    #[error("Identifier index is inconsistent, {0}")]
    Inconsistent(String),
}

pub type Result<T> = std::result::Result<T, Error>;
