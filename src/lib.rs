//! `bltree` is a concurrent, ordered key-value index built as a
//! B-link tree (Lehman & Yao): lock-coupling writers, lock-free
//! readers, and sibling links that let a reader caught mid-split
//! simply walk one node to the right instead of retrying from the
//! root.
//!
//! Nodes hold a stable identity (`Node`) wrapping a swappable
//! snapshot (`NodeContent`), so a reader's `snapshot()` never observes
//! a half-written node and never blocks behind a writer's lock. A
//! writer locks at most one node at a time while it holds the
//! coupling, plus (briefly) the root cell during promotion.
//!
//! Values live in memory; `codec` and `engine` exist for callers who
//! want to persist serialized nodes through their own storage, not as
//! part of this crate's own read/write path.

mod codec;
mod config;
mod content;
mod engine;
mod error;
mod left_edge;
mod scanner;
mod search;
mod tree;
mod types;

pub use crate::codec::{
    BytesCodec, KeyCodec, NodeCodec, SerializedNode, U64Codec, ValCodec, ValueKind, ValueSlots,
};
pub use crate::config::{Config, MAX_NODE_SIZE, MIN_NODE_SIZE};
pub use crate::engine::{MemEngine, RecordEngine, CATALOG_RECID};
pub use crate::error::{Error, Result};
pub use crate::scanner::RangeIter;
pub use crate::tree::BTree;
pub use crate::types::{Comparator, NaturalOrd};
