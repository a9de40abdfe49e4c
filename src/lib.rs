//! # keytrie
//!
//! A compressed prefix trie (radix tree) mapping byte-string keys to
//! opaque u32 value handles, with anchored multi-pattern prefix
//! matching and two binary serialization forms.
//!
//! ## Core Concepts
//!
//! - **Fragments**: each edge carries a byte run; single-child chains
//!   are compressed into multi-byte fragments as keys are inserted
//! - **Value handles**: nodes store small unsigned integers whose
//!   meaning belongs to the caller, typically indices into
//!   caller-owned storage
//! - **Anchored matching**: `match_prefix` reports every stored key
//!   that prefixes the input at one fixed offset; scanning a longer
//!   text means re-invoking it at each offset of interest
//! - **Two wire forms**: a sequential self-describing stream
//!   (`encode`/`decode`, with `encoded_size` predicting the exact
//!   length) and a positional buffer with embedded child offsets
//!   (`to_buffer`/`from_buffer`) for direct, parse-free access
//!
//! ## Example
//!
//! ```
//! use keytrie::Trie;
//!
//! let mut trie = Trie::new();
//! trie.insert(b"abc", 1);
//! trie.insert(b"abcd", 2);
//!
//! let mut hits = Vec::new();
//! let matched = trie.match_prefix(b"abcdex", 0, &mut |key, value| {
//!     hits.push((key.to_vec(), value));
//!     true
//! });
//! assert!(matched);
//! assert_eq!(hits.len(), 2);
//! ```

pub mod trie;

mod error;

pub use error::{Error, Result};
pub use trie::{MergeFn, Node, Trie, ValueIndex};
