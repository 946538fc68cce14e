use super::*;
use crate::camera::pose::Pose;
use crate::foundation::core::{Resolution, Split};
use crate::render::format::ImageFormat;
use std::path::PathBuf;

fn unit_cube() -> BoxRaycaster {
    BoxRaycaster::new(DVec3::ZERO, 2.0, [0.8, 0.8, 0.85])
}

fn setup(format: ImageFormat, samples: u32) -> RenderSetup {
    RenderSetup {
        resolution: Resolution::new(16, 16).unwrap(),
        format,
        samples,
        camera_angle_x: 0.691_111_161_163_424_3,
    }
}

#[test]
fn slab_test_reports_entry_face() {
    let cube = unit_cube();
    let hit = cube
        .intersect(DVec3::new(0.0, 0.0, 5.0), DVec3::NEG_Z)
        .unwrap();
    assert!((hit.t - 4.0).abs() < 1e-12);
    assert_eq!(hit.normal, DVec3::Z);

    let hit = cube.intersect(DVec3::new(-3.0, 0.2, 0.1), DVec3::X).unwrap();
    assert!((hit.t - 2.0).abs() < 1e-12);
    assert_eq!(hit.normal, DVec3::NEG_X);
}

#[test]
fn slab_test_misses_and_ignores_boxes_behind() {
    let cube = unit_cube();
    assert!(cube.intersect(DVec3::new(0.0, 3.0, 5.0), DVec3::NEG_Z).is_none());
    assert!(cube.intersect(DVec3::new(0.0, 0.0, 5.0), DVec3::Z).is_none());
}

#[test]
fn render_requires_begin() {
    let mut cube = unit_cube();
    let pose = Pose::looking_at(0, DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, DVec3::Y).unwrap();
    let path = PathBuf::from("target/unit_raycast/never.png");
    let err = cube
        .render(&RenderRequest {
            index: 0,
            split: Split::Train,
            transform: pose.transform(),
            camera_angle_x: 0.69,
            output_path: &path,
        })
        .unwrap_err();
    assert!(matches!(err, OrbitsetError::Render { index: 0, .. }));
}

#[test]
fn renders_object_centred_with_transparent_background() {
    let mut cube = unit_cube();
    cube.begin(&setup(ImageFormat::Png, 4)).unwrap();

    let pose = Pose::looking_at(0, DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, DVec3::Y).unwrap();
    let path = PathBuf::from("target/unit_raycast/train/r_0.png");
    let _ = std::fs::remove_file(&path);
    cube.render(&RenderRequest {
        index: 0,
        split: Split::Train,
        transform: pose.transform(),
        camera_angle_x: 0.691_111_161_163_424_3,
        output_path: &path,
    })
    .unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (16, 16));
    assert_eq!(img.get_pixel(8, 8)[3], 255);
    assert!(img.get_pixel(8, 8)[0] > 0);
    assert_eq!(img.get_pixel(0, 0)[3], 0);
    assert_eq!(img.get_pixel(15, 15)[3], 0);
}

#[test]
fn opaque_formats_get_white_background() {
    let mut cube = unit_cube().with_light_dir(DVec3::X);
    cube.begin(&setup(ImageFormat::Bmp, 1)).unwrap();

    let pose = Pose::looking_at(3, DVec3::new(5.0, 0.0, 0.0), DVec3::ZERO, DVec3::Z).unwrap();
    let path = PathBuf::from("target/unit_raycast/test/r_3.bmp");
    cube.render(&RenderRequest {
        index: 3,
        split: Split::Test,
        transform: pose.transform(),
        camera_angle_x: 0.691_111_161_163_424_3,
        output_path: &path,
    })
    .unwrap();

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
    // Face +X is fully lit, so it shows the albedo.
    assert_eq!(img.get_pixel(8, 8).0, [204, 204, 217]);
}

#[test]
fn begin_rejects_bad_field_of_view() {
    let mut cube = unit_cube();
    let mut s = setup(ImageFormat::Png, 1);
    s.camera_angle_x = 0.0;
    assert!(cube.begin(&s).unwrap_err().is_config());
}
