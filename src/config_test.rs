use super::*;

#[test]
fn test_default_validates() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_odd_rejected() {
    let c = Config::new(7);
    assert!(c.validate().is_err());
}

#[test]
fn test_too_small_rejected() {
    let c = Config::new(4);
    assert!(c.validate().is_err());
}

#[test]
fn test_too_large_rejected() {
    let c = Config::new(128);
    assert!(c.validate().is_err());
}

#[test]
fn test_boundary_accepted() {
    assert!(Config::new(MIN_NODE_SIZE).validate().is_ok());
    assert!(Config::new(MAX_NODE_SIZE).validate().is_ok());
}
