use super::*;
use crate::camera::pose::Pose;
use crate::foundation::core::DVec3;
use std::collections::HashSet;

fn record(split: Split, local: usize, angle: f64) -> FrameRecord {
    let eye = DVec3::new(4.0, 1.0 + local as f64, 2.0);
    let pose = Pose::looking_at(local, eye, DVec3::ZERO, DVec3::Z).unwrap();
    FrameRecord::new(split.frame_path(local), 0.0125, &pose.transform(), angle)
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_manifest").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn serialized_keys_keep_contract_order() {
    let mut b = ManifestBuilder::new();
    b.record(Split::Train, record(Split::Train, 0, 0.69));
    let s = serde_json::to_string(&b.finalize(Split::Train).unwrap()).unwrap();

    let pos = |k: &str| s.find(k).unwrap_or_else(|| panic!("missing {k} in {s}"));
    assert!(pos("\"camera_angle_x\"") < pos("\"frames\""));
    assert!(pos("\"file_path\"") < pos("\"rotation\""));
    assert!(pos("\"rotation\"") < pos("\"transform_matrix\""));
    // The intrinsic appears once, at manifest level.
    assert_eq!(s.matches("camera_angle_x").count(), 1);
}

#[test]
fn document_shape() {
    let mut b = ManifestBuilder::new();
    b.record(Split::Test, record(Split::Test, 0, 0.5));
    let v = b.finalize(Split::Test).unwrap().to_value().unwrap();
    assert_eq!(v["camera_angle_x"], 0.5);
    let frame = &v["frames"][0];
    assert_eq!(frame["file_path"], "test/r_0");
    assert_eq!(frame["rotation"], 0.0125);
    let rows = frame["transform_matrix"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.as_array().unwrap().len() == 4));
    assert_eq!(rows[3], serde_json::json!([0.0, 0.0, 0.0, 1.0]));
}

#[test]
fn finalize_takes_angle_from_first_frame_and_keeps_order() {
    let mut b = ManifestBuilder::new();
    for i in 0..5 {
        b.record(Split::Train, record(Split::Train, i, 0.7));
    }
    let m = b.finalize(Split::Train).unwrap();
    assert_eq!(m.camera_angle_x, 0.7);
    let paths: Vec<&str> = m.frames.iter().map(|f| f.file_path.as_str()).collect();
    assert_eq!(paths, ["train/r_0", "train/r_1", "train/r_2", "train/r_3", "train/r_4"]);
}

#[test]
fn empty_split_has_no_manifest() {
    let mut b = ManifestBuilder::new();
    b.record(Split::Train, record(Split::Train, 0, 0.7));
    assert!(b.finalize(Split::Test).is_none());
}

#[test]
fn write_and_reparse_round_trip() {
    let dir = scratch_dir("round_trip");
    let n = 12;
    let mut b = ManifestBuilder::new();
    for i in 0..n {
        b.record(Split::Train, record(Split::Train, i, 0.6911));
    }
    let outcome = b.write_all(&dir).unwrap();
    assert_eq!(outcome.empty_splits, vec![Split::Test]);
    assert_eq!(outcome.written.len(), 1);
    let (split, path) = &outcome.written[0];
    assert_eq!(*split, Split::Train);
    assert_eq!(path, &dir.join("transforms_train.json"));
    assert!(!dir.join("transforms_test.json").exists());

    let parsed = Manifest::from_path(path).unwrap();
    assert_eq!(parsed.frames.len(), n);
    assert!((parsed.camera_angle_x - 0.6911).abs() < 1e-12);
    let unique: HashSet<&str> = parsed.frames.iter().map(|f| f.file_path.as_str()).collect();
    assert_eq!(unique.len(), n);
    for (orig, back) in b.frames(Split::Train).iter().zip(&parsed.frames) {
        assert_eq!(orig.file_path, back.file_path);
        assert_eq!(back.camera_angle_x, parsed.camera_angle_x);
        let (a, c) = (orig.transform().0, back.transform().0);
        assert!(a.abs_diff_eq(c, 1e-12));
        assert!(back.transform().is_orthonormal(1e-6));
    }
}

#[test]
fn from_reader_reports_serde_errors() {
    let err = Manifest::from_reader("{\"frames\": []}".as_bytes()).unwrap_err();
    assert!(matches!(err, OrbitsetError::Serde(_)));
}
