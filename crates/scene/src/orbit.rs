//! Orbit behaviour: circles the camera around the origin.
//!
//! Left to itself the camera drifts around the model and bobs up and down.
//! Dragging steers it directly and the mouse wheel zooms.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::camera::Camera;

/// Pointer input for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrbitInput {
    /// Primary button held
    pub dragging: bool,
    /// Pointer movement since last frame, in pixels
    pub drag_delta: Vec2,
    /// Vertical wheel movement since last frame
    pub wheel_delta: f32,
}

/// Spherical coordinates as `(radius, polar, elevation)`, angles in radians.
pub fn spherical_to_cartesian(spherical: Vec3) -> Vec3 {
    let (radius, polar, elevation) = (spherical.x, spherical.y, spherical.z);
    let a = radius * elevation.cos();
    Vec3::new(a * polar.cos(), radius * elevation.sin(), a * polar.sin())
}

/// Keeps a camera orbiting the origin.
#[derive(Clone, Debug)]
pub struct OrbitRotator {
    spherical: Vec3,
    /// Idle polar speed, radians per millisecond
    pub rotation_speed: f32,
    /// Idle bob frequency, radians per millisecond
    pub up_down_speed: f32,
    /// Zoom factor per wheel unit
    pub wheel_speed: f32,
    /// Radians per dragged pixel
    pub mouse_rotation_speed: f32,
}

impl Default for OrbitRotator {
    fn default() -> Self {
        Self {
            spherical: Vec3::new(10.0, 0.0, 0.0),
            rotation_speed: 0.001,
            up_down_speed: 0.0001,
            wheel_speed: 0.0001,
            mouse_rotation_speed: 0.01,
        }
    }
}

impl OrbitRotator {
    /// Elevation limit, just short of the poles.
    pub const MAX_ELEVATION: f32 = PI * 0.499;

    pub fn new() -> Self {
        Self::default()
    }

    /// Current `(radius, polar, elevation)`.
    pub fn spherical(&self) -> Vec3 {
        self.spherical
    }

    /// Advance one frame and move `camera` accordingly.
    ///
    /// `time_ms` is total engine time, `delta_ms` the last frame's length.
    pub fn update(&mut self, time_ms: f32, delta_ms: f32, input: &OrbitInput, camera: &mut Camera) {
        if input.dragging {
            self.spherical.y -= input.drag_delta.x * self.mouse_rotation_speed;
            self.spherical.z = (self.spherical.z + input.drag_delta.y * self.mouse_rotation_speed)
                .clamp(-Self::MAX_ELEVATION, Self::MAX_ELEVATION);
        } else {
            self.spherical.y += delta_ms * self.rotation_speed;
            self.spherical.z = (time_ms * self.up_down_speed).sin() * PI * 0.25;
        }
        if input.wheel_delta != 0.0 {
            self.spherical.x *= 1.0 + input.wheel_delta * self.wheel_speed;
        }

        camera.position = spherical_to_cartesian(self.spherical);
        camera.look_at(Vec3::ZERO, Vec3::Y);
    }
}
