use nalgebra::{Matrix4, Point2, Point3, Vector3};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for creating the transformation matrices used by the pipeline.
///
/// All matrices act on column vectors (`M * v`). The camera conventions are
/// Left-Handed: +X right, +Y up, +Z forward (into the screen), and projected depth
/// lands in [0, 1].
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation that turns the canonical forward axis (+Z) towards the given
    /// yaw (about +Y, positive turns right) and pitch (positive looks up).
    pub fn rotation_yaw_pitch(yaw_rad: f32, pitch_rad: f32) -> Matrix4<f32> {
        Self::rotation_y(yaw_rad) * Self::rotation_x(-pitch_rad)
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Builds the orthonormal camera basis (right, up, forward) from a forward
    /// direction and a world-up reference.
    ///
    /// When `forward` is parallel to `world_up` the cross product vanishes; the
    /// world X axis is used as `right` so the basis never collapses.
    pub fn camera_basis(
        forward: &Vector3<f32>,
        world_up: &Vector3<f32>,
    ) -> (Vector3<f32>, Vector3<f32>, Vector3<f32>) {
        let forward = forward.normalize();
        let right = world_up.cross(&forward);
        let right = if right.norm_squared() > 1e-12 {
            right.normalize()
        } else {
            Vector3::x()
        };
        let up = forward.cross(&right);
        (right, up, forward)
    }

    /// Creates a Look-At matrix (Left-Handed) that maps camera space to world space.
    ///
    /// Columns are the camera's right, up and forward axes followed by its origin.
    /// The inverse of this matrix is the world -> view operator.
    pub fn look_at_lh(
        origin: &Point3<f32>,
        forward: &Vector3<f32>,
        world_up: &Vector3<f32>,
    ) -> Matrix4<f32> {
        let (right, up, forward) = Self::camera_basis(forward, world_up);

        Matrix4::new(
            right.x, up.x, forward.x, origin.x,
            right.y, up.y, forward.y, origin.y,
            right.z, up.z, forward.z, origin.z,
            0.0,     0.0,  0.0,       1.0,
        )
    }

    /// Creates a Perspective Projection matrix (Left-Handed).
    ///
    /// `fov` is the tangent of the half vertical field of view. View-space depth is
    /// carried into `w`, and `z / w` maps [near, far] onto [0, 1].
    pub fn perspective_fov_lh(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4<f32> {
        let a = far / (far - near);
        let b = -(far * near) / (far - near);

        Matrix4::new(
            1.0 / (aspect_ratio * fov), 0.0,       0.0, 0.0,
            0.0,                        1.0 / fov, 0.0, 0.0,
            0.0,                        0.0,       a,   b,
            0.0,                        0.0,       1.0, 0.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Converts NDC coordinates to Screen coordinates (Viewport Transform).
/// Note: Y-axis is flipped (NDC +Y is up, Screen +Y is down).
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new((ndc_x + 1.0) * 0.5 * width, (1.0 - ndc_y) * 0.5 * height)
}
