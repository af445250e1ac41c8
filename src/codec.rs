//! Module `codec` implements `NodeCodec`, the binary node layout of
//! §4.2/§6, decoupled from the live `Arc`-addressed tree: it works
//! against a `SerializedNode<K, V>` DTO expressing children/next as
//! `u64` recids, independent of whether a given deployment ever
//! persists the tree at all. This mirrors the teacher's own split
//! between a live index (`llrb.rs`/`mvcc.rs`) and its on-disk node
//! format (`robt_indx.rs`), and provides the `KeyCodec`/`ValCodec`
//! collaborator traits from §6 plus blanket impls in the spirit of the
//! teacher's `trait_i64.rs`/`trait_bytes.rs`.

use std::convert::TryInto;

use crate::error::{Error, Result};

/// Header tags: two low bits select {none, has-left, has-right, both}
/// sentinel combination, the next bit selects leaf vs inner. All eight
/// values land in 180..187 as specified.
const HEADER_BASE: u8 = 180;
const SENT_NONE: u8 = 0;
const SENT_LEFT: u8 = 1;
const SENT_RIGHT: u8 = 2;
const SENT_BOTH: u8 = 3;
const LEAF_BIT: u8 = 4;

fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

fn read_varint(buf: &[u8], pos: &mut usize) -> Result<u64> {
    let mut result: u64 = 0;
    let mut shift = 0u32;
    loop {
        let byte = *buf
            .get(*pos)
            .ok_or_else(|| Error::Serialization("varint truncated".to_string()))?;
        *pos += 1;
        result |= ((byte & 0x7f) as u64) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
        if shift >= 64 {
            return Err(Error::Serialization("varint too long".to_string()));
        }
    }
    Ok(result)
}

/// Key codec collaborator (§6). `start`/`end` bound the sub-range of
/// `keys` that actually needs encoding/decoding — the sentinel slots
/// at the edges of a node are reconstructed from the header, never
/// serialized.
pub trait KeyCodec<K> {
    fn encode_keys(&self, keys: &[K], out: &mut Vec<u8>) -> Result<()>;
    fn decode_keys(&self, buf: &[u8], pos: &mut usize, count: usize) -> Result<Vec<K>>;
}

/// Value codec collaborator (§6).
pub trait ValCodec<V> {
    fn encode_val(&self, val: &V, out: &mut Vec<u8>) -> Result<()>;
    fn decode_val(&self, buf: &[u8], pos: &mut usize) -> Result<V>;
}

/// Fixed-width big-endian codec for `u64` keys/values, the blanket
/// "default comparable type" treatment the teacher gives `i64`/`u64`
/// in `trait_i64.rs`.
#[derive(Clone, Copy, Default)]
pub struct U64Codec;

impl KeyCodec<u64> for U64Codec {
    fn encode_keys(&self, keys: &[u64], out: &mut Vec<u8>) -> Result<()> {
        for k in keys {
            out.extend_from_slice(&k.to_be_bytes());
        }
        Ok(())
    }

    fn decode_keys(&self, buf: &[u8], pos: &mut usize, count: usize) -> Result<Vec<u64>> {
        let mut keys = Vec::with_capacity(count);
        for _ in 0..count {
            let bytes: [u8; 8] = buf
                .get(*pos..*pos + 8)
                .ok_or_else(|| Error::Serialization("key truncated".to_string()))?
                .try_into()
                .unwrap();
            *pos += 8;
            keys.push(u64::from_be_bytes(bytes));
        }
        Ok(keys)
    }
}

impl ValCodec<u64> for U64Codec {
    fn encode_val(&self, val: &u64, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&val.to_be_bytes());
        Ok(())
    }

    fn decode_val(&self, buf: &[u8], pos: &mut usize) -> Result<u64> {
        let bytes: [u8; 8] = buf
            .get(*pos..*pos + 8)
            .ok_or_else(|| Error::Serialization("value truncated".to_string()))?
            .try_into()
            .unwrap();
        *pos += 8;
        Ok(u64::from_be_bytes(bytes))
    }
}

/// Length-prefixed codec for `Vec<u8>` keys/values, the blanket
/// "raw bytes" treatment the teacher gives `Vec<u8>` in
/// `trait_bytes.rs`.
#[derive(Clone, Copy, Default)]
pub struct BytesCodec;

impl KeyCodec<Vec<u8>> for BytesCodec {
    fn encode_keys(&self, keys: &[Vec<u8>], out: &mut Vec<u8>) -> Result<()> {
        for k in keys {
            write_varint(out, k.len() as u64);
            out.extend_from_slice(k);
        }
        Ok(())
    }

    fn decode_keys(&self, buf: &[u8], pos: &mut usize, count: usize) -> Result<Vec<Vec<u8>>> {
        let mut keys = Vec::with_capacity(count);
        for _ in 0..count {
            let len = read_varint(buf, pos)? as usize;
            let slice = buf
                .get(*pos..*pos + len)
                .ok_or_else(|| Error::Serialization("key truncated".to_string()))?;
            keys.push(slice.to_vec());
            *pos += len;
        }
        Ok(keys)
    }
}

impl ValCodec<Vec<u8>> for BytesCodec {
    fn encode_val(&self, val: &Vec<u8>, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, val.len() as u64);
        out.extend_from_slice(val);
        Ok(())
    }

    fn decode_val(&self, buf: &[u8], pos: &mut usize) -> Result<Vec<u8>> {
        let len = read_varint(buf, pos)? as usize;
        let slice = buf
            .get(*pos..*pos + len)
            .ok_or_else(|| Error::Serialization("value truncated".to_string()))?;
        *pos += len;
        Ok(slice.to_vec())
    }
}

/// How a leaf's `size - 2` value slots are encoded on the wire (§6).
pub enum ValueSlots<V> {
    /// Values embedded directly in the node, via `ValCodec`.
    Inline(Vec<V>),
    /// Values stored outside the node; only a recid indirection is
    /// kept here. `0` is the tombstone marker.
    OutsideRecid(Vec<u64>),
    /// No value domain at all (a set): a presence bit per slot.
    Presence(Vec<bool>),
}

/// Wire DTO for one node (§3, §6), independent of the live tree's
/// `Arc<Node<K, V>>` addressing.
pub struct SerializedNode<K, V> {
    pub is_leaf: bool,
    pub has_left_sentinel: bool,
    pub has_right_sentinel: bool,
    /// Real (non-sentinel) key slots only, in order.
    pub keys: Vec<K>,
    /// Leaf only.
    pub vals: ValueSlots<V>,
    /// Leaf: the single sibling recid (0 = none). Inner: one recid per
    /// non-sentinel-link child slot, in order with `keys`, plus the
    /// trailing link recid as the final element (0 = none) — together
    /// `size` varints as specified.
    pub links: Vec<u64>,
    pub num_metas: usize,
}

/// Binary encode/decode of node content (§4.2, §6). `fixed_size()` is
/// always `-1`: this is a variable-length format.
pub struct NodeCodec<K, V, KC, VC> {
    pub key_codec: KC,
    pub val_codec: VC,
    _marker: std::marker::PhantomData<(K, V)>,
}

impl<K, V, KC, VC> NodeCodec<K, V, KC, VC>
where
    KC: KeyCodec<K>,
    VC: ValCodec<V>,
{
    pub fn new(key_codec: KC, val_codec: VC) -> Self {
        NodeCodec {
            key_codec,
            val_codec,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn fixed_size(&self) -> isize {
        -1
    }

    fn header_byte(is_leaf: bool, has_left: bool, has_right: bool) -> u8 {
        let sent = match (has_left, has_right) {
            (false, false) => SENT_NONE,
            (true, false) => SENT_LEFT,
            (false, true) => SENT_RIGHT,
            (true, true) => SENT_BOTH,
        };
        HEADER_BASE + sent + if is_leaf { LEAF_BIT } else { 0 }
    }

    fn parse_header(header: u8) -> Result<(bool, bool, bool)> {
        if !(HEADER_BASE..=187).contains(&header) {
            return Err(Error::Serialization(format!("bad header byte {}", header)));
        }
        let rel = header - HEADER_BASE;
        let is_leaf = rel & LEAF_BIT != 0;
        let sent = rel & 0x03;
        let (has_left, has_right) = match sent {
            SENT_NONE => (false, false),
            SENT_LEFT => (true, false),
            SENT_RIGHT => (false, true),
            SENT_BOTH => (true, true),
            _ => unreachable!(),
        };
        Ok((is_leaf, has_left, has_right))
    }

    pub fn encode(&self, node: &SerializedNode<K, V>) -> Result<Vec<u8>> {
        let size = node.keys.len()
            + node.has_left_sentinel as usize
            + node.has_right_sentinel as usize;
        if size > u8::MAX as usize {
            return Err(Error::Serialization(format!("node too large: {} slots", size)));
        }
        let mut out = Vec::new();
        out.push(Self::header_byte(
            node.is_leaf,
            node.has_left_sentinel,
            node.has_right_sentinel,
        ));
        out.push(size as u8);
        for _ in 0..node.num_metas {
            write_varint(&mut out, 0);
        }
        for recid in &node.links {
            write_varint(&mut out, *recid);
        }
        self.key_codec.encode_keys(&node.keys, &mut out)?;
        if node.is_leaf {
            match &node.vals {
                ValueSlots::Inline(vals) => {
                    for v in vals {
                        self.val_codec.encode_val(v, &mut out)?;
                    }
                }
                ValueSlots::OutsideRecid(recids) => {
                    for r in recids {
                        write_varint(&mut out, *r);
                    }
                }
                ValueSlots::Presence(bits) => {
                    for chunk in bits.chunks(8) {
                        let mut byte = 0u8;
                        for (i, bit) in chunk.iter().enumerate() {
                            if *bit {
                                byte |= 1 << i;
                            }
                        }
                        out.push(byte);
                    }
                }
            }
        }
        Ok(out)
    }

    pub fn decode(&self, buf: &[u8], num_metas: usize, value_kind: ValueKind) -> Result<SerializedNode<K, V>> {
        let mut pos = 0usize;
        let header = *buf
            .get(pos)
            .ok_or_else(|| Error::Serialization("empty node buffer".to_string()))?;
        pos += 1;
        let (is_leaf, has_left, has_right) = Self::parse_header(header)?;
        let size = *buf
            .get(pos)
            .ok_or_else(|| Error::Serialization("missing size byte".to_string()))? as usize;
        pos += 1;
        for _ in 0..num_metas {
            read_varint(buf, &mut pos)?;
        }
        let link_count = if is_leaf { 1 } else { size };
        let mut links = Vec::with_capacity(link_count);
        for _ in 0..link_count {
            links.push(read_varint(buf, &mut pos)?);
        }
        let key_count = size - has_left as usize - has_right as usize;
        let keys = self.key_codec.decode_keys(buf, &mut pos, key_count)?;
        let vals = if is_leaf {
            let slot_count = size - 2;
            match value_kind {
                ValueKind::Inline => {
                    let mut vals = Vec::with_capacity(slot_count);
                    for _ in 0..slot_count {
                        vals.push(self.val_codec.decode_val(buf, &mut pos)?);
                    }
                    ValueSlots::Inline(vals)
                }
                ValueKind::OutsideRecid => {
                    let mut recids = Vec::with_capacity(slot_count);
                    for _ in 0..slot_count {
                        recids.push(read_varint(buf, &mut pos)?);
                    }
                    ValueSlots::OutsideRecid(recids)
                }
                ValueKind::Presence => {
                    let mut bits = Vec::with_capacity(slot_count);
                    let nbytes = (slot_count + 7) / 8;
                    for byte_idx in 0..nbytes {
                        let byte = *buf
                            .get(pos + byte_idx)
                            .ok_or_else(|| Error::Serialization("presence bitmap truncated".to_string()))?;
                        for bit in 0..8 {
                            if bits.len() == slot_count {
                                break;
                            }
                            bits.push(byte & (1 << bit) != 0);
                        }
                    }
                    pos += nbytes;
                    ValueSlots::Presence(bits)
                }
            }
        } else {
            ValueSlots::Inline(Vec::new())
        };
        Ok(SerializedNode {
            is_leaf,
            has_left_sentinel: has_left,
            has_right_sentinel: has_right,
            keys,
            vals,
            links,
            num_metas,
        })
    }
}

/// Which `ValueSlots` variant to reconstruct on decode; the header
/// alone cannot disambiguate "inline" from "outside-recid" for a
/// leaf, so the caller (which knows its own configuration) supplies
/// this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Inline,
    OutsideRecid,
    Presence,
}

#[cfg(test)]
mod codec_test;
