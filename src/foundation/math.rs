use std::f64::consts::TAU;

/// The golden angle `π·(3 − √5)` in radians (~137.5°).
pub const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Horizontal field of view of a 50 mm lens on a 36 mm wide sensor, in degrees.
pub const DEFAULT_ANGLE_X_DEG: f64 = 39.597_752_709_049_864;

/// Per-step rotation constant carried by circular-orbit manifests (`π/250`).
pub const ORBIT_ROTATION_STEP: f64 = 0.012_566_370_614_359_173;

/// Wrap an angle into `[0, 2π)`.
pub fn wrap_tau(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if a >= TAU { 0.0 } else { a }
}

/// Smallest absolute difference between two angles on the circle.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = wrap_tau(a - b);
    d.min(TAU - d)
}
