use super::*;

fn leaf_codec() -> NodeCodec<u64, u64, U64Codec, U64Codec> {
    NodeCodec::new(U64Codec, U64Codec)
}

#[test]
fn test_roundtrip_interior_leaf_inline_values() {
    let codec = leaf_codec();
    let node = SerializedNode {
        is_leaf: true,
        has_left_sentinel: false,
        has_right_sentinel: false,
        keys: vec![10, 20, 30, 40],
        vals: ValueSlots::Inline(vec![200, 300]),
        links: vec![99],
        num_metas: 0,
    };
    let bytes = codec.encode(&node).unwrap();
    let decoded = codec.decode(&bytes, 0, ValueKind::Inline).unwrap();
    assert!(decoded.is_leaf);
    assert!(!decoded.has_left_sentinel);
    assert!(!decoded.has_right_sentinel);
    assert_eq!(decoded.keys, vec![10, 20, 30, 40]);
    assert_eq!(decoded.links, vec![99]);
    match decoded.vals {
        ValueSlots::Inline(vals) => assert_eq!(vals, vec![200, 300]),
        _ => panic!("expected inline values"),
    }
}

#[test]
fn test_roundtrip_edge_leaf_with_sentinels() {
    let codec = leaf_codec();
    let node = SerializedNode {
        is_leaf: true,
        has_left_sentinel: true,
        has_right_sentinel: true,
        keys: vec![5],
        vals: ValueSlots::Inline(vec![500]),
        links: vec![0],
        num_metas: 0,
    };
    let bytes = codec.encode(&node).unwrap();
    let decoded = codec.decode(&bytes, 0, ValueKind::Inline).unwrap();
    assert!(decoded.has_left_sentinel);
    assert!(decoded.has_right_sentinel);
    assert_eq!(decoded.keys, vec![5]);
}

#[test]
fn test_roundtrip_inner_node() {
    let codec = leaf_codec();
    let node = SerializedNode {
        is_leaf: false,
        has_left_sentinel: true,
        has_right_sentinel: false,
        keys: vec![10, 20],
        vals: ValueSlots::Inline(vec![]),
        links: vec![1, 2, 3],
        num_metas: 0,
    };
    let bytes = codec.encode(&node).unwrap();
    let decoded = codec.decode(&bytes, 0, ValueKind::Inline).unwrap();
    assert!(!decoded.is_leaf);
    assert_eq!(decoded.links, vec![1, 2, 3]);
    assert_eq!(decoded.keys, vec![10, 20]);
}

#[test]
fn test_roundtrip_presence_set_leaf() {
    let codec = leaf_codec();
    let node = SerializedNode {
        is_leaf: true,
        has_left_sentinel: false,
        has_right_sentinel: false,
        keys: vec![1, 2, 3, 4],
        vals: ValueSlots::Presence(vec![true, false]),
        links: vec![0],
        num_metas: 0,
    };
    let bytes = codec.encode(&node).unwrap();
    let decoded = codec.decode(&bytes, 0, ValueKind::Presence).unwrap();
    match decoded.vals {
        ValueSlots::Presence(bits) => assert_eq!(bits, vec![true, false]),
        _ => panic!("expected presence bitmap"),
    }
}

#[test]
fn test_decode_rejects_bad_header() {
    let codec = leaf_codec();
    let bytes = vec![1u8, 4, 0];
    assert!(codec.decode(&bytes, 0, ValueKind::Inline).is_err());
}

#[test]
fn test_fixed_size_is_variable() {
    let codec = leaf_codec();
    assert_eq!(codec.fixed_size(), -1);
}
