use super::*;

#[test]
fn test_put_get_roundtrip() {
    let engine = MemEngine::new();
    let recid = engine.put(b"hello".to_vec()).unwrap();
    assert_ne!(recid, CATALOG_RECID);
    assert_eq!(engine.get(recid).unwrap(), b"hello".to_vec());
}

#[test]
fn test_update_overwrites() {
    let engine = MemEngine::new();
    let recid = engine.put(b"a".to_vec()).unwrap();
    engine.update(recid, b"b".to_vec()).unwrap();
    assert_eq!(engine.get(recid).unwrap(), b"b".to_vec());
}

#[test]
fn test_missing_recid_errors() {
    let engine = MemEngine::new();
    assert!(engine.get(999).is_err());
    assert!(engine.get(CATALOG_RECID).is_err());
}

#[test]
fn test_read_only_rejects_writes() {
    let engine = MemEngine::read_only();
    assert!(engine.is_read_only());
    assert!(engine.put(b"x".to_vec()).is_err());
}
