use crate::foundation::core::{DMat3, DMat4, DVec3};
use crate::foundation::error::{OrbitsetError, OrbitsetResult};

/// Minimum `|forward × up|` accepted before a look-at is considered degenerate.
pub const PARALLEL_EPSILON: f64 = 1e-6;

/// Compute the camera-to-world rotation for a camera at `eye` looking at `target`.
///
/// Camera-local axes follow the OpenGL convention used by NeRF-style datasets: the camera looks
/// down local −Z, local +Y is up and local +X is right. The returned columns are
/// `[right, true_up, -forward]`, a right-handed orthonormal basis.
///
/// Errors when `eye == target` or when the viewing direction is (near-)parallel to `world_up`.
pub fn look_at(eye: DVec3, target: DVec3, world_up: DVec3) -> OrbitsetResult<DMat3> {
    let up = world_up.try_normalize().ok_or_else(|| {
        OrbitsetError::config(format!("world up vector {world_up} has zero length"))
    })?;
    let forward = (target - eye).try_normalize().ok_or_else(|| {
        OrbitsetError::config(format!(
            "camera position {eye} coincides with look-at target {target}"
        ))
    })?;

    let side = forward.cross(up);
    if side.length() < PARALLEL_EPSILON {
        return Err(OrbitsetError::config(format!(
            "viewing direction {forward} from {eye} is parallel to world up {up}"
        )));
    }
    let right = side.normalize();
    let true_up = right.cross(forward);

    Ok(DMat3::from_cols(right, true_up, -forward))
}

/// [`look_at`] with the default +Y world up.
pub fn look_at_y_up(eye: DVec3, target: DVec3) -> OrbitsetResult<DMat3> {
    look_at(eye, target, DVec3::Y)
}

/// A sampled camera: trajectory index, world position and camera-to-world orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Trajectory index in `[0, n)`.
    pub index: usize,
    /// Camera centre in world space.
    pub position: DVec3,
    /// Orthonormal camera-to-world rotation.
    pub orientation: DMat3,
}

impl Pose {
    /// Solve the orientation of a camera at `position` looking at `target`.
    pub fn looking_at(
        index: usize,
        position: DVec3,
        target: DVec3,
        world_up: DVec3,
    ) -> OrbitsetResult<Self> {
        let orientation = look_at(position, target, world_up).map_err(|e| match e {
            OrbitsetError::Config(msg) => OrbitsetError::config(format!("frame {index}: {msg}")),
            other => other,
        })?;
        Ok(Self {
            index,
            position,
            orientation,
        })
    }

    /// Camera-to-world transform of this pose.
    pub fn transform(&self) -> CameraToWorld {
        CameraToWorld::from_rotation_translation(self.orientation, self.position)
    }

    /// Unit vector the camera looks along, in world space.
    pub fn forward(&self) -> DVec3 {
        -self.orientation.z_axis
    }
}

/// 4×4 camera-to-world matrix: rotation block from the orientation, translation column from the
/// camera position, last row `[0, 0, 0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraToWorld(pub DMat4);

impl CameraToWorld {
    /// Compose from a rotation block and a translation column.
    pub fn from_rotation_translation(rotation: DMat3, translation: DVec3) -> Self {
        Self(DMat4::from_cols(
            rotation.x_axis.extend(0.0),
            rotation.y_axis.extend(0.0),
            rotation.z_axis.extend(0.0),
            translation.extend(1.0),
        ))
    }

    /// Upper-left 3×3 rotation block.
    pub fn rotation(&self) -> DMat3 {
        DMat3::from_mat4(self.0)
    }

    /// Translation column (camera centre).
    pub fn translation(&self) -> DVec3 {
        self.0.w_axis.truncate()
    }

    /// Row-major nested array, the layout manifests serialize.
    pub fn to_rows(&self) -> [[f64; 4]; 4] {
        // glam stores columns; transposing yields rows.
        self.0.transpose().to_cols_array_2d()
    }

    /// Rebuild from a row-major nested array.
    pub fn from_rows(rows: &[[f64; 4]; 4]) -> Self {
        Self(DMat4::from_cols_array_2d(rows).transpose())
    }

    /// Map a camera-local point into world space.
    pub fn transform_point(&self, p: DVec3) -> DVec3 {
        self.0.transform_point3(p)
    }

    /// Map a camera-local direction into world space.
    pub fn transform_vector(&self, v: DVec3) -> DVec3 {
        self.0.transform_vector3(v)
    }

    /// Return `true` when the rotation block has unit, mutually orthogonal, right-handed columns.
    pub fn is_orthonormal(&self, tol: f64) -> bool {
        let r = self.rotation();
        let cols = [r.x_axis, r.y_axis, r.z_axis];
        let unit = cols.iter().all(|c| (c.length() - 1.0).abs() <= tol);
        let orthogonal = cols[0].dot(cols[1]).abs() <= tol
            && cols[0].dot(cols[2]).abs() <= tol
            && cols[1].dot(cols[2]).abs() <= tol;
        unit && orthogonal && (r.determinant() - 1.0).abs() <= tol
    }
}

#[cfg(test)]
#[path = "../../tests/unit/camera/pose.rs"]
mod tests;
