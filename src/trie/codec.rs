//! Sequential stream form of the trie
//!
//! Wire layout per node, depth-first, little-endian:
//! ```text
//! [fragment len: u32]
//! [fragment bytes]
//! [value flag: u8]
//! [value: u32, only when flag == 1]
//! [child count: u32]
//! [children, recursively, in leading-byte order]
//! ```
//!
//! The layout is a fixed internal contract shared by [`Node::encode`]
//! and [`Node::decode`]; [`Node::encoded_size`] predicts the encoded
//! length exactly, so callers can preallocate or validate stream
//! completeness.

use crate::trie::node::Node;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::io::{ErrorKind, Read, Write};

// Distinct leading bytes bound the fan-out of any valid node.
const MAX_CHILDREN: u32 = 256;

impl Node {
    /// Serialize the subtree rooted here to `writer`
    pub fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&(self.fragment.len() as u32).to_le_bytes())?;
        writer.write_all(&self.fragment)?;
        match self.value {
            Some(value) => {
                writer.write_all(&[1])?;
                writer.write_all(&value.to_le_bytes())?;
            }
            None => writer.write_all(&[0])?,
        }
        writer.write_all(&(self.children.len() as u32).to_le_bytes())?;
        for child in self.children.values() {
            child.encode(writer)?;
        }
        Ok(())
    }

    /// Exact number of bytes [`Node::encode`] writes for this subtree
    pub fn encoded_size(&self) -> usize {
        let mut size = 4 + self.fragment.len() + 1 + 4;
        if self.value.is_some() {
            size += 4;
        }
        for child in self.children.values() {
            size += child.encoded_size();
        }
        size
    }

    /// Rebuild a subtree from `reader`
    ///
    /// Fails with [`Error::Corruption`] as soon as the stream declares
    /// a field it cannot satisfy or violates the trie invariants;
    /// failures of the reader itself propagate as [`Error::Io`].
    pub fn decode<R: Read>(reader: &mut R) -> Result<Node> {
        let fragment_len = read_u32(reader)? as usize;
        // Read through a take so a hostile length cannot drive the
        // allocation; a short read means the stream lied.
        let mut fragment = Vec::new();
        let got = reader
            .by_ref()
            .take(fragment_len as u64)
            .read_to_end(&mut fragment)?;
        if got < fragment_len {
            return Err(Error::Corruption(format!(
                "fragment truncated: declared {} bytes, stream had {}",
                fragment_len, got
            )));
        }

        let value = match read_u8(reader)? {
            0 => None,
            1 => Some(read_u32(reader)?),
            flag => {
                return Err(Error::Corruption(format!("invalid value flag: {}", flag)));
            }
        };

        let child_count = read_u32(reader)?;
        if child_count > MAX_CHILDREN {
            return Err(Error::Corruption(format!(
                "child count {} exceeds the byte alphabet",
                child_count
            )));
        }

        let mut children = BTreeMap::new();
        let mut previous: Option<u8> = None;
        for _ in 0..child_count {
            let child = Node::decode(reader)?;
            let Some(&first) = child.fragment.first() else {
                return Err(Error::Corruption("child with empty fragment".into()));
            };
            // Children are written in strictly increasing leading-byte
            // order; anything else is not an encoding of a trie.
            if previous.is_some_and(|prev| first <= prev) {
                return Err(Error::Corruption(format!(
                    "child leading byte {:#04x} out of order",
                    first
                )));
            }
            previous = Some(first);
            children.insert(first, child);
        }

        Ok(Node {
            fragment,
            value,
            children,
        })
    }
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    read_field(reader, &mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    read_field(reader, &mut buf)?;
    Ok(buf[0])
}

// A stream ending mid-field is a format violation, not an I/O failure.
fn read_field<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => Error::Corruption("stream ended mid-field".into()),
        _ => Error::Io(err),
    })
}
