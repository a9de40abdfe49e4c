//! Trie handle wrapping the root node

use super::node::{MergeFn, Node, ValueIndex};
use crate::Result;
use bytes::Bytes;
use std::io::{Read, Write};

/// A compressed prefix trie mapping byte-string keys to value handles
///
/// Owns the root [`Node`] and exposes key-level operations on top of
/// the node-level primitives. Construction is synchronous and
/// single-threaded; once built, the read operations (`get`,
/// `match_prefix`, `walk`, the encoders) can be shared freely across
/// threads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trie {
    root: Node,
}

impl Trie {
    /// Create an empty trie
    pub fn new() -> Self {
        Trie { root: Node::root() }
    }

    /// Insert a key; on a duplicate the new value overwrites the old
    pub fn insert(&mut self, key: &[u8], value: ValueIndex) {
        self.root.add(Node::leaf(key, value), None);
    }

    /// Insert a key, reconciling a duplicate through `merge`
    ///
    /// `merge` receives the previously stored value and returns the
    /// value to keep; it is not invoked for first-time keys.
    pub fn insert_with<F>(&mut self, key: &[u8], value: ValueIndex, merge: F)
    where
        F: Fn(ValueIndex) -> ValueIndex,
    {
        let merge: MergeFn<'_> = &merge;
        self.root.add(Node::leaf(key, value), Some(merge));
    }

    /// Look up the value stored for an exact key
    pub fn get(&self, key: &[u8]) -> Option<ValueIndex> {
        self.root.get(key)
    }

    /// Whether an exact key is stored
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Whether the trie stores no keys at all
    pub fn is_empty(&self) -> bool {
        self.root.value().is_none() && self.root.children.is_empty()
    }

    /// Report every stored key that prefixes `input[start..]`
    ///
    /// See [`Node::match_at`]: anchored at `start`, callback-driven
    /// termination, returns `true` iff anything matched.
    pub fn match_prefix<F>(&self, input: &[u8], start: usize, on_match: &mut F) -> bool
    where
        F: FnMut(&[u8], ValueIndex) -> bool,
    {
        self.root.match_at(input, start, on_match)
    }

    /// Enumerate every stored key/value pair
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(&[u8], ValueIndex),
    {
        self.root.walk(&[], visit);
    }

    /// Serialize to the sequential stream form
    pub fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.root.encode(writer)
    }

    /// Exact byte count [`Trie::encode`] will write
    pub fn encoded_size(&self) -> usize {
        self.root.encoded_size()
    }

    /// Deserialize from the sequential stream form
    pub fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Trie {
            root: Node::decode(reader)?,
        })
    }

    /// Flatten to the positional buffer form
    pub fn to_buffer(&self) -> Bytes {
        self.root.to_buffer()
    }

    /// Reconstruct from the positional buffer form
    pub fn from_buffer(buf: &[u8]) -> Result<Self> {
        Ok(Trie {
            root: Node::load_node(buf)?,
        })
    }

    /// Borrow the root node
    pub fn root(&self) -> &Node {
        &self.root
    }
}
