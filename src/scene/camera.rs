use crate::core::math::transform::TransformFactory;
use log::debug;
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Pitch is kept strictly inside (-90, 90) so forward never aligns with world up.
const MAX_PITCH_DEG: f32 = 89.0;
const MIN_FOV_DEG: f32 = 1.0;
const MAX_FOV_DEG: f32 = 179.0;

/// Snapshot of navigation input for one frame, filled in by whatever drives the
/// renderer (a window, a script, a test).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    pub move_forward: bool,
    pub move_backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    /// Relative pointer motion since the previous frame, in pixels (Y down).
    pub mouse_delta_x: f32,
    pub mouse_delta_y: f32,
    pub left_button: bool,
    pub right_button: bool,
}

/// Free-fly camera in a left-handed world (+X right, +Y up, +Z forward).
///
/// Owns position and orientation and derives the view and projection matrices.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point3<f32>,
    fov_angle: f32,
    /// Tangent of half the vertical field of view.
    fov: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,

    right: Vector3<f32>,
    up: Vector3<f32>,
    forward: Vector3<f32>,

    /// Accumulated angles in degrees.
    total_pitch: f32,
    total_yaw: f32,

    pub speed: f32,
    /// Degrees per second per unit of thresholded pointer motion.
    pub rotation_speed: f32,
    pub scroll_speed: f32,

    // --- Cached Matrices ---
    view_matrix: Matrix4<f32>,
    inverse_view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(45.0, Point3::new(0.0, 5.0, -64.0), 0.1, 100.0, 1.0)
    }
}

impl Camera {
    pub fn new(
        fov_degrees: f32,
        origin: Point3<f32>,
        near: f32,
        far: f32,
        aspect_ratio: f32,
    ) -> Self {
        let mut cam = Self {
            origin,
            fov_angle: 0.0,
            fov: 0.0,
            aspect_ratio,
            near,
            far,
            right: Vector3::x(),
            up: Vector3::y(),
            forward: Vector3::z(),
            total_pitch: 0.0,
            total_yaw: 0.0,
            speed: 20.0,
            rotation_speed: 100.0,
            scroll_speed: 5.0,
            view_matrix: Matrix4::identity(),
            inverse_view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.initialize(fov_degrees, origin, near, far);
        cam
    }

    /// Resets field of view, position and clip planes, then rebuilds the matrices.
    pub fn initialize(&mut self, fov_degrees: f32, origin: Point3<f32>, near: f32, far: f32) {
        self.fov_angle = fov_degrees.clamp(MIN_FOV_DEG, MAX_FOV_DEG);
        self.fov = Self::calculate_fov(self.fov_angle);
        self.origin = origin;
        self.near = near;
        self.far = far;
        self.update_orientation();
        self.update_matrices();
    }

    /// Applies one frame of input, then recomputes the matrices so the frame renders
    /// with the updated state.
    pub fn update(&mut self, delta_time: f32, input: &CameraInput) {
        self.move_camera(delta_time, input);
        self.rotate_camera(delta_time, input);
        self.update_orientation();
        self.update_matrices();
    }

    fn move_camera(&mut self, delta_time: f32, input: &CameraInput) {
        let step = delta_time * self.speed;

        if input.strafe_left {
            self.origin -= self.right * step;
        } else if input.strafe_right {
            self.origin += self.right * step;
        }
        if input.move_forward {
            self.origin += self.forward * step;
        } else if input.move_backward {
            self.origin -= self.forward * step;
        }
    }

    fn rotate_camera(&mut self, delta_time: f32, input: &CameraInput) {
        let mouse_x = threshold(input.mouse_delta_x);
        // Screen Y grows downwards; moving the pointer up should look/move up.
        let mouse_y = -threshold(input.mouse_delta_y);
        let angle_step = self.rotation_speed * delta_time;

        match (input.left_button, input.right_button) {
            (true, true) => {
                self.origin += self.up * mouse_y * delta_time * self.speed;
            }
            (true, false) => {
                self.origin += self.forward * mouse_y * delta_time * self.speed;
                self.total_yaw += mouse_x * angle_step;
            }
            (false, true) => {
                self.total_yaw += mouse_x * angle_step;
                self.set_total_pitch(self.total_pitch + mouse_y * angle_step);
            }
            (false, false) => {}
        }
    }

    /// Re-derives the orthonormal basis from the accumulated yaw and pitch.
    fn update_orientation(&mut self) {
        let rotation = TransformFactory::rotation_yaw_pitch(
            self.total_yaw.to_radians(),
            self.total_pitch.to_radians(),
        );
        let forward = (rotation * Vector4::z()).xyz();
        let (right, up, forward) = TransformFactory::camera_basis(&forward, &Vector3::y());
        self.right = right;
        self.up = up;
        self.forward = forward;
    }

    /// Recalculates View and Projection matrices based on current parameters.
    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::look_at_lh(&self.origin, &self.forward, &Vector3::y());
        self.inverse_view_matrix = self
            .view_matrix
            .try_inverse()
            .unwrap_or_else(Matrix4::identity);
        self.projection_matrix =
            TransformFactory::perspective_fov_lh(self.fov, self.aspect_ratio, self.near, self.far);
    }

    /// Moves along the view direction; positive deltas move forward.
    pub fn scroll(&mut self, delta: f32) {
        if delta > 0.0 {
            self.origin += self.forward * self.scroll_speed;
        } else if delta < 0.0 {
            self.origin -= self.forward * self.scroll_speed;
        }
        self.update_matrices();
    }

    pub fn increase_fov(&mut self) {
        self.set_fov_angle(self.fov_angle + 1.0);
    }

    pub fn decrease_fov(&mut self) {
        self.set_fov_angle(self.fov_angle - 1.0);
    }

    pub fn set_fov_angle(&mut self, fov_degrees: f32) {
        self.fov_angle = fov_degrees.clamp(MIN_FOV_DEG, MAX_FOV_DEG);
        self.fov = Self::calculate_fov(self.fov_angle);
        debug!("Camera FOV: {:.0} deg", self.fov_angle);
        self.update_matrices();
    }

    pub fn set_total_yaw(&mut self, yaw_degrees: f32) {
        self.total_yaw = yaw_degrees;
    }

    pub fn set_total_pitch(&mut self, pitch_degrees: f32) {
        self.total_pitch = pitch_degrees.clamp(-MAX_PITCH_DEG, MAX_PITCH_DEG);
    }

    /// Applies yaw/pitch set through the setters without waiting for `update`.
    pub fn refresh(&mut self) {
        self.update_orientation();
        self.update_matrices();
    }

    fn calculate_fov(angle_degrees: f32) -> f32 {
        (angle_degrees * 0.5).to_radians().tan()
    }

    // --- Accessors ---

    pub fn position(&self) -> Point3<f32> {
        self.origin
    }

    pub fn set_position(&mut self, origin: Point3<f32>) {
        self.origin = origin;
        self.update_matrices();
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn fov_angle(&self) -> f32 {
        self.fov_angle
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.update_matrices();
    }

    pub fn total_yaw(&self) -> f32 {
        self.total_yaw
    }

    pub fn total_pitch(&self) -> f32 {
        self.total_pitch
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.forward
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    /// Camera to world.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    /// World to camera; the operator the vertex stage applies.
    pub fn inverse_view_matrix(&self) -> Matrix4<f32> {
        self.inverse_view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    /// World to clip space.
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix * self.inverse_view_matrix
    }
}

/// Collapses pointer motion to -1, 0 or 1, ignoring jitter of one pixel.
fn threshold(delta: f32) -> f32 {
    if delta > 1.0 {
        1.0
    } else if delta < -1.0 {
        -1.0
    } else {
        0.0
    }
}
