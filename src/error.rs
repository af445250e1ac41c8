//! Module `error` defines the error type shared across the tree, its
//! codec, and its collaborator traits.

use std::{fmt, result};

/// Error variants raised by this crate.
#[derive(Debug)]
pub enum Error {
    /// A caller passed an argument that violates a documented invariant,
    /// e.g. an out-of-range `max_node_size`, or crossed sub-map bounds.
    InvalidArgument(String),
    /// A key or value codec failed to serialize or deserialize a node.
    Serialization(String),
    /// The record engine backing persisted nodes failed an I/O operation.
    Engine(String),
    /// An internal integrity assertion did not hold. Indicates a bug.
    Assertion(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Error::Engine(msg) => write!(f, "engine error: {}", msg),
            Error::Assertion(msg) => write!(f, "assertion failure: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Crate-wide result alias, same shape as the record-engine `Result`
/// this tree was grounded on.
pub type Result<T> = result::Result<T, Error>;
