//! Positional buffer form of the trie
//!
//! Unlike the stream form, every node record embeds absolute offsets
//! to its children, so a consumer reaches any subtree by offset
//! arithmetic instead of parsing everything in between. This suits
//! large, rarely-mutated tries loaded from a mapped or shared buffer.
//!
//! Record layout, little-endian, records concatenated depth-first
//! with the root at offset 0:
//! ```text
//! [fragment len: u32]
//! [fragment bytes]
//! [value flag: u8]
//! [value: u32, only when flag == 1]
//! [child count: u32]
//! [child offset: u32, one per child, in leading-byte order]
//! ```

use crate::trie::node::Node;
use crate::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};
use std::collections::BTreeMap;

// Same fan-out bound as the stream form.
const MAX_CHILDREN: u32 = 256;

impl Node {
    /// Flatten the subtree rooted here into a self-contained buffer
    pub fn to_buffer(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.buffer_size());
        self.write_record(&mut buf);
        buf.freeze()
    }

    /// Reconstruct a trie from a buffer produced by [`Node::to_buffer`]
    ///
    /// Every read is bounds-checked and child offsets must point
    /// strictly forward, so a malformed buffer fails with
    /// [`Error::Corruption`] instead of producing a bad tree.
    pub fn load_node(buf: &[u8]) -> Result<Node> {
        Node::load_record(buf, 0)
    }

    // Total buffer length, used to preallocate in to_buffer.
    fn buffer_size(&self) -> usize {
        let mut size = 4 + self.fragment.len() + 1 + 4 + 4 * self.children.len();
        if self.value.is_some() {
            size += 4;
        }
        for child in self.children.values() {
            size += child.buffer_size();
        }
        size
    }

    fn write_record(&self, buf: &mut BytesMut) {
        buf.put_u32_le(self.fragment.len() as u32);
        buf.put_slice(&self.fragment);
        match self.value {
            Some(value) => {
                buf.put_u8(1);
                buf.put_u32_le(value);
            }
            None => buf.put_u8(0),
        }
        buf.put_u32_le(self.children.len() as u32);

        // Reserve the offset table, then patch each slot once the
        // child's record position is known.
        let table = buf.len();
        for _ in 0..self.children.len() {
            buf.put_u32_le(0);
        }
        for (i, child) in self.children.values().enumerate() {
            let offset = buf.len() as u32;
            let slot = table + 4 * i;
            buf[slot..slot + 4].copy_from_slice(&offset.to_le_bytes());
            child.write_record(buf);
        }
    }

    fn load_record(buf: &[u8], offset: usize) -> Result<Node> {
        let mut cursor = offset;

        let fragment_len = read_u32_at(buf, &mut cursor)? as usize;
        let fragment = read_bytes_at(buf, &mut cursor, fragment_len)?.to_vec();

        let value = match read_u8_at(buf, &mut cursor)? {
            0 => None,
            1 => Some(read_u32_at(buf, &mut cursor)?),
            flag => {
                return Err(Error::Corruption(format!("invalid value flag: {}", flag)));
            }
        };

        let child_count = read_u32_at(buf, &mut cursor)?;
        if child_count > MAX_CHILDREN {
            return Err(Error::Corruption(format!(
                "child count {} exceeds the byte alphabet",
                child_count
            )));
        }

        let mut children = BTreeMap::new();
        let mut previous: Option<u8> = None;
        for _ in 0..child_count {
            let child_offset = read_u32_at(buf, &mut cursor)? as usize;
            // Forward-only offsets keep the load terminating on any
            // input: each recursion strictly advances.
            if child_offset <= offset || child_offset >= buf.len() {
                return Err(Error::Corruption(format!(
                    "child offset {} out of bounds",
                    child_offset
                )));
            }
            let child = Node::load_record(buf, child_offset)?;
            let Some(&first) = child.fragment.first() else {
                return Err(Error::Corruption("child with empty fragment".into()));
            };
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

fn read_u32_at(buf: &[u8], cursor: &mut usize) -> Result<u32> {
    let bytes = read_bytes_at(buf, cursor, 4)?;
    Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_u8_at(buf: &[u8], cursor: &mut usize) -> Result<u8> {
    Ok(read_bytes_at(buf, cursor, 1)?[0])
}

fn read_bytes_at<'a>(buf: &'a [u8], cursor: &mut usize, len: usize) -> Result<&'a [u8]> {
    let end = cursor
        .checked_add(len)
        .filter(|&end| end <= buf.len())
        .ok_or_else(|| Error::Corruption("buffer ended mid-record".into()))?;
    let bytes = &buf[*cursor..end];
    *cursor = end;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(keywords: &[&str]) -> Node {
        let mut root = Node::root();
        for (i, keyword) in keywords.iter().enumerate() {
            root.add(Node::leaf(keyword.as_bytes(), i as u32 + 1), None);
        }
        root
    }

    fn roundtrip(keywords: &[&str]) {
        let root = build(keywords);
        let buf = root.to_buffer();
        let loaded = Node::load_node(&buf).unwrap();
        assert_eq!(root, loaded);
    }

    #[test]
    fn test_roundtrip_disjoint_keys() {
        roundtrip(&["abc", "zyx", "mln", "abcd", "abz"]);
    }

    #[test]
    fn test_roundtrip_nested_prefixes() {
        roundtrip(&["abc", "zyx", "abcd"]);
    }

    #[test]
    fn test_roundtrip_edge_split() {
        roundtrip(&["abc", "ac", "zyx"]);
    }

    #[test]
    fn test_roundtrip_empty_trie() {
        roundtrip(&[]);
    }

    #[test]
    fn test_buffer_size_is_exact() {
        let root = build(&["abc", "ac", "zyx", "abcd"]);
        assert_eq!(root.to_buffer().len(), root.buffer_size());
    }

    #[test]
    fn test_loaded_trie_still_matches() {
        let root = build(&["abc", "zyx", "mln", "abcd", "abcdex"]);
        let loaded = Node::load_node(&root.to_buffer()).unwrap();

        let mut reported = Vec::new();
        let matched = loaded.match_at(b"abcdex", 0, &mut |key, value| {
            reported.push((key.to_vec(), value));
            true
        });
        assert!(matched);
        assert_eq!(reported.len(), 3);
    }

    #[test]
    fn test_load_rejects_plain_text() {
        let err = Node::load_node(b"test is error").unwrap_err();
        assert!(matches!(err, Error::Corruption(_)));
    }

    #[test]
    fn test_load_rejects_empty_buffer() {
        let err = Node::load_node(&[]).unwrap_err();
        assert!(matches!(err, Error::Corruption(_)));
    }

    #[test]
    fn test_load_rejects_truncation_anywhere() {
        let root = build(&["abc", "ac", "zyx"]);
        let buf = root.to_buffer();

        for len in 0..buf.len() {
            assert!(
                Node::load_node(&buf[..len]).is_err(),
                "prefix of {} bytes",
                len
            );
        }
    }

    #[test]
    fn test_load_rejects_backward_offset() {
        // Root with one child whose offset points at the root itself.
        let mut buf = Vec::new();
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.push(0);
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        let err = Node::load_node(&buf).unwrap_err();
        assert!(matches!(err, Error::Corruption(_)));
    }

    #[test]
    fn test_load_rejects_offset_past_end() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.push(0);
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&999u32.to_le_bytes());
        let err = Node::load_node(&buf).unwrap_err();
        assert!(matches!(err, Error::Corruption(_)));
    }

    #[test]
    fn test_stream_and_buffer_forms_are_independent() {
        // The two wire forms are distinct contracts; feeding one
        // decoder the other's output must not silently succeed with a
        // different tree.
        let root = build(&["abc", "ac", "zyx"]);

        let buf = root.to_buffer();
        match Node::decode(&mut std::io::Cursor::new(&buf[..])) {
            Ok(decoded) => assert_ne!(root, decoded),
            Err(err) => assert!(matches!(err, Error::Corruption(_))),
        }

        let mut encoded = Vec::new();
        root.encode(&mut encoded).unwrap();
        match Node::load_node(&encoded) {
            Ok(loaded) => assert_ne!(root, loaded),
            Err(err) => assert!(matches!(err, Error::Corruption(_))),
        }
    }
}
