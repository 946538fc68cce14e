use super::*;

#[test]
fn split_paths_follow_dataset_convention() {
    assert_eq!(Split::Train.frame_path(0), "train/r_0");
    assert_eq!(Split::Test.frame_path(12), "test/r_12");
    assert_eq!(Split::Train.manifest_file_name(), "transforms_train.json");
    assert_eq!(Split::Test.manifest_file_name(), "transforms_test.json");
}

#[test]
fn split_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Split::Train).unwrap(), "\"train\"");
    let s: Split = serde_json::from_str("\"test\"").unwrap();
    assert_eq!(s, Split::Test);
}

#[test]
fn resolution_parses_from_pair() {
    let r: Resolution = serde_json::from_str("[800, 600]").unwrap();
    assert_eq!(r.width, 800);
    assert_eq!(r.height, 600);
    assert!((r.aspect() - 800.0 / 600.0).abs() < 1e-12);
}

#[test]
fn resolution_rejects_zero() {
    assert!(Resolution::new(0, 10).is_err());
    assert!(Resolution::new(10, 0).is_err());
    assert!(Resolution::new(1, 1).is_ok());
}
