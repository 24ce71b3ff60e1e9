//! First-person camera + key-binding controller.
//!
//! The camera stores an orthonormal basis (right / up / look) rather than a
//! target point so walk/strafe/pitch compose naturally for maze-style
//! navigation. The view matrix is rebuilt lazily: mutators only mark it
//! dirty and `update_view` re-orthonormalizes the basis once per frame.

use std::collections::HashMap;

use glam::{Mat4, Vec3};

use crate::input::{InputState, KeyCode};

/// First-person camera used by both renderer and app.
///
/// Projection parameters live here so a window resize only has to call
/// [`Camera::set_lens`]; the renderer reads `view()` / `proj()` each frame.
#[derive(Debug, Clone)]
pub struct Camera {
    // ── view parameters ──────────────────────────────────────────────────
    position: Vec3,
    right: Vec3,
    up: Vec3,
    look: Vec3,

    // ── projection parameters ────────────────────────────────────────────
    fovy: f32,
    aspect: f32,
    near_z: f32,
    far_z: f32,

    // ── cached matrices ──────────────────────────────────────────────────
    view: Mat4,
    proj: Mat4,
    view_dirty: bool,

    /// Key bindings for walk/strafe movement.
    pub controller: Controller,
}

impl Default for Camera {
    fn default() -> Self {
        let mut cam = Self {
            position: Vec3::ZERO,
            right: Vec3::X,
            up: Vec3::Y,
            look: Vec3::NEG_Z,
            fovy: 0.25 * std::f32::consts::PI,
            aspect: 1.0,
            near_z: 1.0,
            far_z: 1000.0,
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
            view_dirty: true,
            controller: Controller::with_default_wasd(),
        };
        cam.set_lens(cam.fovy, cam.aspect, cam.near_z, cam.far_z);
        cam
    }
}

impl Camera {
    /// Creates a camera at `position` looking down −Z.
    pub fn new(position: Vec3) -> Self {
        let mut cam = Self::default();
        cam.position = position;
        cam
    }

    /// World-space eye position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.view_dirty = true;
    }

    /// Points the camera at `target` from its current position.
    pub fn look_at(&mut self, target: Vec3, world_up: Vec3) {
        self.look = (target - self.position).normalize();
        self.right = world_up.cross(self.look).normalize();
        self.up = self.look.cross(self.right);
        self.view_dirty = true;
    }

    /// Sets the perspective frustum. Called at startup and on every resize.
    pub fn set_lens(&mut self, fovy: f32, aspect: f32, near_z: f32, far_z: f32) {
        self.fovy = fovy;
        self.aspect = aspect;
        self.near_z = near_z;
        self.far_z = far_z;
        self.proj = Mat4::perspective_rh(fovy, aspect, near_z, far_z);
    }

    #[inline]
    pub fn near_z(&self) -> f32 {
        self.near_z
    }

    #[inline]
    pub fn far_z(&self) -> f32 {
        self.far_z
    }

    // ── movement ─────────────────────────────────────────────────────────

    /// Moves along the look vector (positive = forward).
    pub fn walk(&mut self, distance: f32) {
        self.position += self.look * distance;
        self.view_dirty = true;
    }

    /// Moves along the right vector (positive = right).
    pub fn strafe(&mut self, distance: f32) {
        self.position += self.right * distance;
        self.view_dirty = true;
    }

    /// Tilts the view up/down around the camera's right vector.
    pub fn pitch(&mut self, angle: f32) {
        let rot = Mat4::from_axis_angle(self.right, angle);
        self.up = rot.transform_vector3(self.up);
        self.look = rot.transform_vector3(self.look);
        self.view_dirty = true;
    }

    /// Rotates the whole basis around the world Y axis.
    pub fn rotate_y(&mut self, angle: f32) {
        let rot = Mat4::from_rotation_y(angle);
        self.right = rot.transform_vector3(self.right);
        self.up = rot.transform_vector3(self.up);
        self.look = rot.transform_vector3(self.look);
        self.view_dirty = true;
    }

    // ── matrices ─────────────────────────────────────────────────────────

    /// Rebuilds the view matrix if any mutator ran since the last call.
    ///
    /// Re-orthonormalizes the basis to stop incremental rotations from
    /// accumulating drift.
    pub fn update_view(&mut self) {
        if !self.view_dirty {
            return;
        }

        self.look = self.look.normalize();
        self.up = self.right.cross(self.look).normalize();
        self.right = self.look.cross(self.up);

        self.view = Mat4::look_to_rh(self.position, self.look, self.up);
        self.view_dirty = false;
    }

    /// Current view matrix. `update_view` must have run since the last
    /// mutation; in debug builds a stale read is flagged.
    #[inline]
    pub fn view(&self) -> Mat4 {
        debug_assert!(!self.view_dirty, "Camera::update_view not called");
        self.view
    }

    #[inline]
    pub fn proj(&self) -> Mat4 {
        self.proj
    }
}

// ─── Controller ────────────────────────────────────────────────────────────

/// Maps keys to camera-space movement directions and stores the walk speed.
///
/// `direction` sums the bound directions of all currently-held keys; the
/// result is intentionally not normalised — multiply by `speed` and `dt`
/// to get the displacement for a frame. Z is forward, X is right.
#[derive(Debug, Clone)]
pub struct Controller {
    mappings: HashMap<KeyCode, Vec3>,

    /// Translation speed in world-units per second.
    pub speed: f32,

    /// Mouse-look sensitivity in radians per pixel.
    pub mouse_sensitivity: f32,
}

impl Controller {
    /// Creates an empty controller with no key bindings.
    pub fn new() -> Self {
        Self {
            mappings: HashMap::new(),
            speed: 10.0,
            // a quarter of a degree per pixel
            mouse_sensitivity: 0.25_f32.to_radians(),
        }
    }

    /// Convenience constructor — WASD layout with default parameters.
    pub fn with_default_wasd() -> Self {
        let mut ctl = Self::new();
        ctl.bind(KeyCode::KeyW, Vec3::new(0.0, 0.0, 1.0));
        ctl.bind(KeyCode::KeyS, Vec3::new(0.0, 0.0, -1.0));
        ctl.bind(KeyCode::KeyA, Vec3::new(-1.0, 0.0, 0.0));
        ctl.bind(KeyCode::KeyD, Vec3::new(1.0, 0.0, 0.0));
        ctl
    }

    /// Binds `key` to a camera-space unit direction, replacing any previous
    /// binding for that key.
    pub fn bind(&mut self, key: KeyCode, dir: Vec3) {
        self.mappings.insert(key, dir);
    }

    /// Removes the binding for `key`, if any.
    pub fn unbind(&mut self, key: KeyCode) {
        self.mappings.remove(&key);
    }

    /// Combined movement direction for the keys currently held.
    pub fn direction(&self, input: &InputState) -> Vec3 {
        let mut out = Vec3::ZERO;
        for (key, dir) in &self.mappings {
            if input.is_key_pressed(*key) {
                out += *dir;
            }
        }
        out
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_moves_along_look() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.walk(3.0);
        assert!((cam.position() - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn strafe_moves_along_right() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.strafe(2.0);
        assert!((cam.position() - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn rotate_y_turns_look() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.rotate_y(std::f32::consts::FRAC_PI_2);
        cam.update_view();
        // −Z rotated 90° about +Y lands on −X
        cam.walk(1.0);
        assert!(cam.position().x < -0.99);
        assert!(cam.position().z.abs() < 1e-4);
    }

    #[test]
    fn view_transforms_world_point_to_eye_space() {
        let mut cam = Camera::new(Vec3::new(0.0, 0.0, 5.0));
        cam.update_view();
        let p = cam.view().transform_point3(Vec3::ZERO);
        // point 5 units in front of the eye sits on −Z in view space
        assert!((p - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn controller_sums_held_directions() {
        let ctl = Controller::with_default_wasd();
        let mut input = InputState::new();
        input.update_key(KeyCode::KeyW, true);
        input.update_key(KeyCode::KeyD, true);
        let dir = ctl.direction(&input);
        assert_eq!(dir, Vec3::new(1.0, 0.0, 1.0));
    }
}
