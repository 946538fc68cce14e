use super::*;
use crate::foundation::core::DVec3;
use crate::render::collaborator::RecordingRenderer;

fn cfg(dir: &str, n: i64, train_fraction: f64) -> DatasetConfig {
    let json = format!(
        r#"{{
          "output": {{ "resolution": [8, 8], "format": "PNG", "directory": "{dir}" }},
          "object": {{ "name": "cube", "location": [1, 2, 3] }},
          "camera": {{ "num_images": {n}, "distance": 4, "vertical_movement": 0.5 }},
          "dataset": {{ "train_fraction": {train_fraction} }}
        }}"#
    );
    DatasetConfig::from_reader(json.as_bytes()).unwrap()
}

struct FailOn(usize);

impl RenderCollaborator for FailOn {
    fn render(&mut self, request: &RenderRequest<'_>) -> OrbitsetResult<()> {
        if request.index == self.0 {
            return Err(anyhow::anyhow!("gpu fell over").into());
        }
        Ok(())
    }
}

#[test]
fn plan_orbits_the_object_location() {
    let session = DatasetSession::new(&cfg("target/unit_session/plan", 8, 0.5), Default::default())
        .unwrap();
    let target = DVec3::new(1.0, 2.0, 3.0);
    for pose in session.poses() {
        let horizontal = (pose.position - target).truncate().length();
        assert!((horizontal - 4.0).abs() < 1e-9);
        assert!(pose.forward().dot((target - pose.position).normalize()) > 1.0 - 1e-12);
        assert!(pose.transform().is_orthonormal(1e-9));
    }
    let plan = session.plan();
    assert_eq!(plan.len(), 8);
    assert_eq!(plan[0].file_path, "train/r_0");
    assert_eq!(plan[1].file_path, "test/r_0");
    assert_eq!(
        plan[2].image_path,
        PathBuf::from("target/unit_session/plan/cube/train/r_1.png")
    );
}

#[test]
fn run_renders_in_order_and_writes_manifests() {
    let session = DatasetSession::new(&cfg("target/unit_session/run", 6, 0.5), Default::default())
        .unwrap();
    let mut rec = RecordingRenderer::new();
    let report = session.run(&mut rec).unwrap();

    assert!(rec.ended());
    assert_eq!(rec.setup().unwrap().camera_angle_x, session.render_setup().camera_angle_x);
    let indices: Vec<usize> = rec.requests().iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(report.frames_rendered, 6);
    assert_eq!(report.manifests.len(), 2);
    assert!(report.empty_splits.is_empty());
    assert_eq!(report.stride, Some(2));
}

#[test]
fn abort_policy_returns_render_error() {
    let session = DatasetSession::new(&cfg("target/unit_session/abort", 4, 1.0), Default::default())
        .unwrap();
    let err = session.run(&mut FailOn(2)).unwrap_err();
    match err {
        OrbitsetError::Render { split, index, message } => {
            assert_eq!(split, Split::Train);
            assert_eq!(index, 2);
            assert!(message.contains("gpu fell over"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn skip_policy_drops_frame_and_reports_it() {
    let opts = DatasetSessionOpts {
        on_render_failure: Some(RenderFailurePolicy::Skip),
        ..Default::default()
    };
    let session = DatasetSession::new(&cfg("target/unit_session/skip", 4, 1.0), opts).unwrap();
    let report = session.run(&mut FailOn(1)).unwrap();
    assert_eq!(report.frames_rendered, 3);
    assert_eq!(report.skipped, vec![(Split::Train, 1)]);
    assert_eq!(report.empty_splits, vec![Split::Test]);
}

#[test]
fn overrides_are_validated() {
    let opts = DatasetSessionOpts {
        train_fraction: Some(2.0),
        ..Default::default()
    };
    let err = DatasetSession::new(&cfg("target/unit_session/bad", 4, 1.0), opts).unwrap_err();
    assert!(err.is_config());
}
