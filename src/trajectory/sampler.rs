use crate::foundation::core::DVec3;
use crate::foundation::error::{OrbitsetError, OrbitsetResult};
use crate::foundation::math::{GOLDEN_ANGLE, ORBIT_ROTATION_STEP, wrap_tau};
use std::f64::consts::{PI, TAU};

/// Camera placement strategy around the target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrajectoryStrategy {
    /// One horizontal revolution at uniform azimuth steps, with a vertical wobble
    /// `amplitude·sin(azimuth/2)` that completes half a cycle per revolution.
    CircularOrbit {
        /// Peak vertical offset of the wobble (may be zero).
        vertical_amplitude: f64,
    },
    /// Golden-angle spiral over the spherical cap within `theta_max` of the +Z pole.
    SphericalCap {
        /// Maximum polar angle in radians, in `(0, π]`.
        theta_max: f64,
    },
}

impl TrajectoryStrategy {
    /// Check the strategy parameters.
    pub fn validate(&self) -> OrbitsetResult<()> {
        match *self {
            TrajectoryStrategy::CircularOrbit { vertical_amplitude } => {
                if !vertical_amplitude.is_finite() {
                    return Err(OrbitsetError::config(
                        "camera.vertical_movement must be finite",
                    ));
                }
            }
            TrajectoryStrategy::SphericalCap { theta_max } => {
                if !(theta_max > 0.0 && theta_max <= PI) {
                    return Err(OrbitsetError::config(format!(
                        "camera.theta_max_deg must be in (0, 180], got {}",
                        theta_max.to_degrees()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Auxiliary per-frame `rotation` scalar recorded in manifests for this strategy.
    ///
    /// The value is opaque: circular orbits carry a fixed per-step constant unrelated to the
    /// actual azimuth delta, spherical caps carry the golden angle.
    pub fn rotation_step(&self) -> f64 {
        match self {
            TrajectoryStrategy::CircularOrbit { .. } => ORBIT_ROTATION_STEP,
            TrajectoryStrategy::SphericalCap { .. } => GOLDEN_ANGLE,
        }
    }

    /// World-up vector used for look-at when the config does not set one.
    ///
    /// Circular orbits lie in the XY plane and look "level" with +Z up. The spherical cap is
    /// centred on +Z, whose first sample sits on the pole, so it uses +Y.
    pub fn default_world_up(&self) -> DVec3 {
        match self {
            TrajectoryStrategy::CircularOrbit { .. } => DVec3::Z,
            TrajectoryStrategy::SphericalCap { .. } => DVec3::Y,
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            TrajectoryStrategy::CircularOrbit { .. } => "circular-orbit",
            TrajectoryStrategy::SphericalCap { .. } => "spherical-cap",
        }
    }
}

/// One sampled camera position, relative to the orbit centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampledPosition {
    /// Trajectory index in `[0, n)`.
    pub index: usize,
    /// Position relative to the orbit centre.
    pub position: DVec3,
}

/// Sample `n` camera positions at `distance` from the origin.
///
/// The result is ordered by index, has length exactly `n`, and is a pure function of the inputs.
pub fn generate(
    n: usize,
    distance: f64,
    strategy: &TrajectoryStrategy,
) -> OrbitsetResult<Vec<SampledPosition>> {
    if n == 0 {
        return Err(OrbitsetError::config("camera.num_images must be > 0"));
    }
    if !(distance.is_finite() && distance > 0.0) {
        return Err(OrbitsetError::config(format!(
            "camera.distance must be finite and > 0, got {distance}"
        )));
    }
    strategy.validate()?;

    let out = (0..n)
        .map(|index| SampledPosition {
            index,
            position: match *strategy {
                TrajectoryStrategy::CircularOrbit { vertical_amplitude } => {
                    circular_position(index, n, distance, vertical_amplitude)
                }
                TrajectoryStrategy::SphericalCap { theta_max } => {
                    cap_position(index, n, distance, theta_max)
                }
            },
        })
        .collect();
    Ok(out)
}

/// Azimuth of sample `i` of `n` on the circular orbit: `2π·i/n`.
pub fn orbit_azimuth(i: usize, n: usize) -> f64 {
    TAU * (i as f64) / (n as f64)
}

/// Azimuth of sample `i` on the golden-angle spiral, wrapped into `[0, 2π)`.
pub fn golden_azimuth(i: usize) -> f64 {
    wrap_tau((i as f64) * GOLDEN_ANGLE)
}

/// Cosine of the polar angle of sample `i` of `n` on a cap bounded by `theta_max`.
///
/// Linear in `i` from 1 (the pole) down to `cos(theta_max)`, which gives equal-area spacing.
/// A single sample sits on the pole.
pub fn cap_cos_theta(i: usize, n: usize, theta_max: f64) -> f64 {
    if n <= 1 {
        return 1.0;
    }
    let t = (i as f64) / ((n - 1) as f64);
    // Clamp against rounding so acos stays defined.
    (1.0 - t * (1.0 - theta_max.cos())).clamp(-1.0, 1.0)
}

fn circular_position(i: usize, n: usize, distance: f64, vertical_amplitude: f64) -> DVec3 {
    let az = orbit_azimuth(i, n);
    DVec3::new(
        distance * az.cos(),
        distance * az.sin(),
        vertical_amplitude * (az / 2.0).sin(),
    )
}

fn cap_position(i: usize, n: usize, distance: f64, theta_max: f64) -> DVec3 {
    let phi = golden_azimuth(i);
    let theta = cap_cos_theta(i, n, theta_max).acos();
    let (sin_t, cos_t) = theta.sin_cos();
    distance * DVec3::new(sin_t * phi.cos(), sin_t * phi.sin(), cos_t)
}

#[cfg(test)]
#[path = "../../tests/unit/trajectory/sampler.rs"]
mod tests;
