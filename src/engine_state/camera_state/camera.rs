//! # Camera Implementation
//!
//! First-person camera derived from the player body each frame:
//! - `Camera`: eye position and orthonormal basis
//! - `Projection`: zoom-scaled symmetric frustum
//! - `CameraUniform`: packed data structure for the face shader
//!
//! The world is y-down, so the camera's up vector points toward `-y` when
//! looking level.

use cgmath::*;

use crate::engine_state::{
    physics::player::{Player, PLAYER_WIDTH},
    voxels::BLOCK_SIZE,
};

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// Maps clip-space depth from `[-1, 1]` to `[0, 1]`.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,  // Scale Z from [-1,1] to [-0.5,0.5]
    0.0, 0.0, 0.5, 1.0,  // Translate Z from [-0.5,0.5] to [0,1]
);

/// Represents a first-person camera in world space.
///
/// # Fields
/// - `eye`: Eye position, offset from the player's body corner
/// - `forward`: Normalized view direction
/// - `up`: Normalized up vector, perpendicular to `forward`
/// - `right`: Normalized right vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub forward: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,
}

impl Camera {
    /// Builds the camera for a player's current body and orientation.
    ///
    /// The eye sits centred over the body, three quarters of a block above
    /// its top.
    ///
    /// # Arguments
    /// * `player` - The player to look through
    ///
    /// # Returns
    /// A camera with an orthonormal basis
    pub fn from_player(player: &Player) -> Self {
        let position = player.position();
        let eye = Point3::new(
            position.x + (PLAYER_WIDTH / 2) as f32,
            position.y - (BLOCK_SIZE * 3 / 4) as f32,
            position.z + (PLAYER_WIDTH / 2) as f32,
        );
        Self::looking(eye, player.yaw, player.pitch)
    }

    /// Builds a camera at `eye` from yaw and pitch in radians.
    pub fn looking(eye: Point3<f32>, yaw: f32, pitch: f32) -> Self {
        let (yaw_sin, yaw_cos) = yaw.sin_cos();
        let (pitch_sin, pitch_cos) = pitch.sin_cos();

        let forward = Vector3::new(pitch_cos * yaw_sin, pitch_sin, pitch_cos * yaw_cos);
        let wing = Vector3::new(-yaw_cos, 0.0, yaw_sin);
        let up = forward.cross(wing).normalize();
        let right = forward.cross(up).normalize();

        Self {
            eye,
            forward,
            up,
            right,
        }
    }

    /// Calculates the view matrix for this camera.
    ///
    /// # Returns
    /// A right-handed 4x4 view matrix
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.eye, self.forward, self.up)
    }
}

/// Symmetric perspective frustum scaled by zoom.
#[derive(Debug)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Half the frustum height at the near plane, before zoom
    half_height: f32,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `half_height` - Half the frustum height at the near plane
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new(width: u32, height: u32, half_height: f32, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: Self::aspect_of(width, height),
            half_height,
            znear,
            zfar,
        }
    }

    fn aspect_of(width: u32, height: u32) -> f32 {
        width.max(1) as f32 / height.max(1) as f32
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = Self::aspect_of(width, height);
    }

    /// Calculates the projection matrix for a zoom factor.
    ///
    /// Smaller zoom narrows the frustum, magnifying the view.
    pub fn calc_matrix(&self, zoom: f32) -> Matrix4<f32> {
        let half_h = self.half_height * zoom;
        let half_w = half_h * self.aspect;
        OPENGL_TO_WGPU_MATRIX * frustum(-half_w, half_w, -half_h, half_h, self.znear, self.zfar)
    }
}

/// GPU-friendly representation of camera data for shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // cgmath types can't be Pod, so matrices go over as arrays
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    /// x: block size in world units
    params: [f32; 4],
}

impl CameraUniform {
    /// Creates a new camera uniform with an identity matrix.
    pub fn new() -> Self {
        Self {
            view_proj: cgmath::Matrix4::identity().into(),
            eye: [0.0; 4],
            params: [BLOCK_SIZE as f32, 0.0, 0.0, 0.0],
        }
    }

    /// Updates the view-projection matrix and eye position.
    ///
    /// # Arguments
    /// * `camera` - The camera to get the view matrix and eye from
    /// * `projection` - The projection to use
    /// * `zoom` - Current zoom factor
    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection, zoom: f32) {
        self.view_proj = (projection.calc_matrix(zoom) * camera.calc_matrix()).into();
        self.eye = [camera.eye.x, camera.eye.y, camera.eye.z, 1.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::grid::WorldDimensions;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn eye_sits_above_the_body_centre() {
        let mut player = Player::spawn(WorldDimensions::new(4, 4, 4));
        player.body.min = Point3::new(100.0, 200.0, 300.0);
        let camera = Camera::from_player(&player);
        assert_eq!(camera.eye, Point3::new(124.0, 155.0, 324.0));
    }

    #[test]
    fn level_camera_looks_along_z_with_up_toward_the_sky() {
        let camera = Camera::looking(Point3::new(0.0, 0.0, 0.0), 0.0, 0.0);
        assert_close(camera.forward, Vector3::new(0.0, 0.0, 1.0));
        assert_close(camera.up, Vector3::new(0.0, -1.0, 0.0));
        assert!(camera.forward.dot(camera.right).abs() < 1e-6);
        assert!(camera.up.dot(camera.right).abs() < 1e-6);
    }

    #[test]
    fn basis_stays_orthonormal_when_pitched() {
        let camera = Camera::looking(Point3::new(0.0, 0.0, 0.0), 1.1, -0.7);
        assert!((camera.forward.magnitude() - 1.0).abs() < 1e-5);
        assert!(camera.forward.dot(camera.up).abs() < 1e-5);
        assert!(camera.forward.dot(camera.right).abs() < 1e-5);
    }

    #[test]
    fn view_matrix_puts_the_eye_at_the_origin_looking_down_negative_z() {
        let camera = Camera::looking(Point3::new(10.0, -5.0, 3.0), 0.4, 0.2);
        let view = camera.calc_matrix();
        let eye = view * camera.eye.to_homogeneous();
        assert!(eye.truncate().magnitude() < 1e-3);

        let ahead = view * (camera.eye + camera.forward * 10.0).to_homogeneous();
        assert!((ahead.z + 10.0).abs() < 1e-3);
    }

    #[test]
    fn zooming_in_magnifies() {
        let projection = Projection::new(800, 400, 9.0, 16.0, 199_999.0);
        let wide = projection.calc_matrix(1.0);
        let narrow = projection.calc_matrix(0.5);
        assert!((narrow.y.y - 2.0 * wide.y.y).abs() < 1e-4);
        assert!((wide.x.x * 2.0 - wide.y.y).abs() < 1e-4);
    }
}
