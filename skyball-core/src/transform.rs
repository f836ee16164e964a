//! Camera and world transforms used by the demo scene.

use glam::{Mat4, Vec3};

/// Vertical field of view of the camera.
pub const FIELD_OF_VIEW: f32 = 90.0;
pub const NEAR_PLANE: f32 = 0.01;
pub const FAR_PLANE: f32 = 1000.0;

/// Angular speed of the mesh rotation in radians per second.
pub const ROTATION_SPEED: f32 = 0.25;
/// Frame rate the rotation step is tuned for.
pub const ASSUMED_FRAME_RATE: f32 = 60.0;
/// Angle added on every frame.
pub const ROTATION_STEP: f32 = ROTATION_SPEED * (1.0 / ASSUMED_FRAME_RATE);

/// Perspective projection for a viewport with the given aspect ratio.
pub fn projection(aspect: f32) -> Mat4 {
    Mat4::perspective_rh_gl(FIELD_OF_VIEW.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
}

/// The fixed camera: moved up and back, rolled upside down.
pub fn view() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 10.0, -20.0))
        * Mat4::from_axis_angle(Vec3::Z, 180.0f32.to_radians())
}

/// Rotation about the Y axis advanced by a fixed step per frame.
///
/// The step does not depend on how much time actually passed, so the visible speed scales with
/// the real frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeshRotation {
    angle: f32,
}

impl MeshRotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advances the rotation by one frame.
    pub fn advance(&mut self) {
        self.angle += ROTATION_STEP;
    }

    pub fn world_transform(&self) -> Mat4 {
        Mat4::from_rotation_y(self.angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_a_240th_radian() {
        assert!((ROTATION_STEP - 1.0 / 240.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rotation_accumulates_fixed_steps() {
        let mut rotation = MeshRotation::new();
        assert_eq!(rotation.world_transform(), Mat4::IDENTITY);

        for _ in 0..240 {
            rotation.advance();
        }
        assert!((rotation.angle() - 1.0).abs() < 1e-4);

        let rotated = rotation.world_transform().transform_vector3(Vec3::X);
        assert!((rotated - Vec3::new(1.0f32.cos(), 0.0, -1.0f32.sin())).length() < 1e-4);
    }

    #[test]
    fn view_flips_and_offsets_camera() {
        let origin = view().transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 10.0, -20.0)).length() < 1e-5);

        let up = view().transform_vector3(Vec3::Y);
        assert!((up - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn projection_maps_near_plane_to_minus_one() {
        let clip = projection(16.0 / 9.0) * glam::Vec4::new(0.0, 0.0, -NEAR_PLANE, 1.0);
        assert!((clip.z / clip.w + 1.0).abs() < 1e-4);
    }
}
