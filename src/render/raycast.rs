use crate::config::model::DatasetConfig;
use crate::foundation::core::DVec3;
use crate::foundation::error::{OrbitsetError, OrbitsetResult};
use crate::manifest::builder::ensure_parent_dir;
use crate::render::collaborator::{RenderCollaborator, RenderRequest, RenderSetup};
use anyhow::Context as _;

const AMBIENT: f64 = 0.2;

/// CPU renderer for an axis-aligned box, used when no external renderer is wired in.
///
/// Each pixel averages a `k×k` stratified grid of rays, `k = floor(sqrt(samples))`. Hits are
/// Lambert-shaded against a fixed key light. The background is transparent for formats with
/// alpha and white otherwise.
#[derive(Clone, Debug)]
pub struct BoxRaycaster {
    min: DVec3,
    max: DVec3,
    albedo: DVec3,
    light_dir: DVec3,
    setup: Option<RenderSetup>,
}

/// Nearest box hit: ray parameter and outward face normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxHit {
    /// Distance along the (unit) ray direction.
    pub t: f64,
    /// Outward normal of the entered face.
    pub normal: DVec3,
}

impl BoxRaycaster {
    /// Box of edge length `size` centred on `center`.
    pub fn new(center: DVec3, size: f64, albedo: [f64; 3]) -> Self {
        let half = DVec3::splat(size * 0.5);
        Self {
            min: center - half,
            max: center + half,
            albedo: DVec3::from_array(albedo).clamp(DVec3::ZERO, DVec3::ONE),
            light_dir: DVec3::new(0.45, 0.3, 0.85).normalize(),
            setup: None,
        }
    }

    /// Box described by the config's object section.
    pub fn from_config(cfg: &DatasetConfig) -> Self {
        Self::new(cfg.target(), cfg.object.size, cfg.object.color)
    }

    /// Override the world-space direction towards the key light.
    pub fn with_light_dir(mut self, dir: DVec3) -> Self {
        if let Some(d) = dir.try_normalize() {
            self.light_dir = d;
        }
        self
    }

    /// Slab test against the box. Returns `None` for misses and hits behind the origin.
    pub fn intersect(&self, origin: DVec3, dir: DVec3) -> Option<BoxHit> {
        const EPSILON: f64 = 1e-12;

        let inv = DVec3::new(
            safe_recip(dir.x, EPSILON),
            safe_recip(dir.y, EPSILON),
            safe_recip(dir.z, EPSILON),
        );
        let t0 = (self.min - origin) * inv;
        let t1 = (self.max - origin) * inv;
        let near = t0.min(t1);
        let far = t0.max(t1);

        let t_near = near.max_element();
        let t_far = far.min_element();
        if t_near > t_far || t_far < 0.0 {
            return None;
        }

        // Origins inside the box see the exit face.
        let (t, axis_t) = if t_near >= 0.0 {
            (t_near, near)
        } else {
            (t_far, far)
        };
        let axis = if axis_t.x == t {
            0
        } else if axis_t.y == t {
            1
        } else {
            2
        };
        let mut normal = DVec3::ZERO;
        normal[axis] = if dir[axis] > 0.0 { -1.0 } else { 1.0 };
        if t_near < 0.0 {
            normal = -normal;
        }
        Some(BoxHit { t, normal })
    }

    fn shade(&self, hit: &BoxHit) -> DVec3 {
        let diffuse = hit.normal.dot(self.light_dir).max(0.0);
        self.albedo * (AMBIENT + (1.0 - AMBIENT) * diffuse)
    }
}

fn safe_recip(v: f64, eps: f64) -> f64 {
    if v.abs() < eps {
        1.0 / eps.copysign(v)
    } else {
        1.0 / v
    }
}

fn to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl RenderCollaborator for BoxRaycaster {
    fn begin(&mut self, setup: &RenderSetup) -> OrbitsetResult<()> {
        if setup.resolution.width == 0 || setup.resolution.height == 0 {
            return Err(OrbitsetError::config("render resolution must be non-zero"));
        }
        if !(setup.camera_angle_x > 0.0 && setup.camera_angle_x < std::f64::consts::PI) {
            return Err(OrbitsetError::config(
                "camera_angle_x must be in (0, π) radians",
            ));
        }
        self.setup = Some(setup.clone());
        Ok(())
    }

    fn render(&mut self, request: &RenderRequest<'_>) -> OrbitsetResult<()> {
        let setup = self.setup.as_ref().ok_or_else(|| {
            OrbitsetError::render(
                request.split,
                request.index,
                "raycaster used before begin()",
            )
        })?;
        let (w, h) = (setup.resolution.width, setup.resolution.height);
        let alpha = setup.format.supports_alpha();
        let channels = if alpha { 4 } else { 3 };

        let k = (f64::from(setup.samples).sqrt().floor() as u32).max(1);
        let inv_spp = 1.0 / f64::from(k * k);
        let tan_x = (request.camera_angle_x * 0.5).tan();
        let tan_y = tan_x / setup.resolution.aspect();
        let origin = request.transform.translation();

        let mut data = Vec::with_capacity((w as usize) * (h as usize) * channels);
        for py in 0..h {
            for px in 0..w {
                let mut rgb = DVec3::ZERO;
                let mut coverage = 0.0;
                for sy in 0..k {
                    for sx in 0..k {
                        let fx = (f64::from(px) + (f64::from(sx) + 0.5) / f64::from(k))
                            / f64::from(w);
                        let fy = (f64::from(py) + (f64::from(sy) + 0.5) / f64::from(k))
                            / f64::from(h);
                        let local = DVec3::new(
                            (2.0 * fx - 1.0) * tan_x,
                            (1.0 - 2.0 * fy) * tan_y,
                            -1.0,
                        );
                        let dir = request.transform.transform_vector(local).normalize();
                        if let Some(hit) = self.intersect(origin, dir) {
                            rgb += self.shade(&hit);
                            coverage += 1.0;
                        } else if !alpha {
                            rgb += DVec3::ONE;
                        }
                    }
                }
                rgb *= inv_spp;
                coverage *= inv_spp;
                if alpha {
                    // Straight alpha: un-weight colour by coverage.
                    let c = if coverage > 0.0 { rgb / coverage } else { rgb };
                    data.extend_from_slice(&[to_u8(c.x), to_u8(c.y), to_u8(c.z), to_u8(coverage)]);
                } else {
                    data.extend_from_slice(&[to_u8(rgb.x), to_u8(rgb.y), to_u8(rgb.z)]);
                }
            }
        }

        ensure_parent_dir(request.output_path)?;
        let color = if alpha {
            image::ColorType::Rgba8
        } else {
            image::ColorType::Rgb8
        };
        image::save_buffer_with_format(
            request.output_path,
            &data,
            w,
            h,
            color,
            setup.format.encoder(),
        )
        .with_context(|| format!("write image '{}'", request.output_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raycast.rs"]
mod tests;
