use super::*;
use crate::trajectory::sampler::{TrajectoryStrategy, generate};

const TOL: f64 = 1e-6;

#[test]
fn camera_looks_down_local_negative_z() {
    let eye = DVec3::new(5.0, 0.0, 0.0);
    let r = look_at(eye, DVec3::ZERO, DVec3::Z).unwrap();
    let c2w = CameraToWorld::from_rotation_translation(r, eye);

    let ahead = c2w.transform_vector(DVec3::NEG_Z);
    assert!(ahead.abs_diff_eq(DVec3::NEG_X, 1e-12));
    let up = c2w.transform_vector(DVec3::Y);
    assert!(up.abs_diff_eq(DVec3::Z, 1e-12));
    // Right-handed: right = forward × up.
    let right = c2w.transform_vector(DVec3::X);
    assert!(right.abs_diff_eq(DVec3::Y, 1e-12));
}

#[test]
fn target_projects_onto_optical_axis() {
    let eye = DVec3::new(1.0, -2.0, 3.0);
    let target = DVec3::new(0.5, 0.25, -1.0);
    let pose = Pose::looking_at(0, eye, target, DVec3::Y).unwrap();
    let c2w = pose.transform();
    let dist = (target - eye).length();
    let mapped = c2w.transform_point(DVec3::new(0.0, 0.0, -dist));
    assert!(mapped.abs_diff_eq(target, 1e-9));
    assert!(pose.forward().abs_diff_eq((target - eye).normalize(), 1e-12));
}

#[test]
fn rotation_blocks_are_orthonormal_along_trajectories() {
    let strategies = [
        (
            TrajectoryStrategy::CircularOrbit {
                vertical_amplitude: 1.0,
            },
            DVec3::Z,
        ),
        (
            TrajectoryStrategy::SphericalCap {
                theta_max: 80f64.to_radians(),
            },
            DVec3::Y,
        ),
    ];
    for (strategy, up) in strategies {
        for p in generate(50, 4.0, &strategy).unwrap() {
            let pose = Pose::looking_at(p.index, p.position, DVec3::ZERO, up).unwrap();
            assert!(
                pose.transform().is_orthonormal(TOL),
                "{} sample {} not orthonormal",
                strategy.name(),
                p.index
            );
        }
    }
}

#[test]
fn parallel_view_and_up_is_rejected() {
    let err = look_at(DVec3::new(0.0, 5.0, 0.0), DVec3::ZERO, DVec3::Y).unwrap_err();
    assert!(err.is_config());
    assert!(look_at_y_up(DVec3::new(0.0, -3.0, 0.0), DVec3::ZERO).is_err());
    // Nearly parallel still counts as degenerate.
    assert!(look_at(DVec3::new(1e-9, 5.0, 0.0), DVec3::ZERO, DVec3::Y).is_err());
}

#[test]
fn degenerate_pose_names_its_frame() {
    let err = Pose::looking_at(7, DVec3::new(0.0, 0.0, 4.0), DVec3::ZERO, DVec3::Z).unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("frame 7:"), "{err}");
}

#[test]
fn coincident_eye_and_target_is_rejected() {
    assert!(look_at(DVec3::ONE, DVec3::ONE, DVec3::Y).unwrap_err().is_config());
    assert!(look_at(DVec3::X, DVec3::ZERO, DVec3::ZERO).is_err());
}

#[test]
fn rows_are_row_major_with_translation_in_last_column() {
    let eye = DVec3::new(3.0, 4.0, 5.0);
    let pose = Pose::looking_at(2, eye, DVec3::ZERO, DVec3::Z).unwrap();
    let rows = pose.transform().to_rows();
    assert_eq!(rows[3], [0.0, 0.0, 0.0, 1.0]);
    assert_eq!([rows[0][3], rows[1][3], rows[2][3]], [3.0, 4.0, 5.0]);
    // Column 2 of the rotation block is -forward.
    let back = DVec3::new(rows[0][2], rows[1][2], rows[2][2]);
    assert!(back.abs_diff_eq(eye.normalize(), 1e-12));
    assert_eq!(CameraToWorld::from_rows(&rows), pose.transform());
}
