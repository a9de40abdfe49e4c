//! Compressed prefix trie
//!
//! A radix tree over byte-string keys where:
//! - Each edge carries a multi-byte fragment; single-child chains are
//!   compressed away during insertion
//! - Matching is anchored: it resolves stored keys that prefix the
//!   input at one fixed offset, never scanning ahead
//! - Two independent binary forms exist: a sequential stream codec
//!   and a positional buffer with embedded child offsets

mod buffer;
mod codec;
mod node;
mod tree;

pub use node::{MergeFn, Node, ValueIndex};
pub use tree::Trie;
