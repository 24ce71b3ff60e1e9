//! GPU-facing constant layouts.
//!
//! All structs are `repr(C)` + `Pod` and mirror the WGSL uniform structs in
//! `assets/shaders/scene.wgsl` field for field — including the explicit
//! padding WGSL's 16-byte alignment rules require. Matrices are stored
//! column-major (`Mat4::to_cols_array_2d`), which wgpu consumes directly.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Maximum lights the pass constants carry; the scene fills a prefix.
pub const MAX_LIGHTS: usize = 16;

// ── Per-object ───────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectConstants {
    pub world: [[f32; 4]; 4],
    pub tex_transform: [[f32; 4]; 4],
}

impl ObjectConstants {
    pub fn new(world: Mat4, tex_transform: Mat4) -> Self {
        Self {
            world: world.to_cols_array_2d(),
            tex_transform: tex_transform.to_cols_array_2d(),
        }
    }
}

impl Default for ObjectConstants {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

// ── Per-material ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialConstants {
    pub diffuse_albedo: [f32; 4],
    pub fresnel_r0: [f32; 3],
    pub roughness: f32,
    pub transform: [[f32; 4]; 4],
}

impl Default for MaterialConstants {
    fn default() -> Self {
        Self {
            diffuse_albedo: [1.0, 1.0, 1.0, 1.0],
            fresnel_r0: [0.01, 0.01, 0.01],
            roughness: 0.25,
            transform: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

// ── Lights ───────────────────────────────────────────────────────────────────

/// One light, interpreted by position in the array: the scene uses the
/// leading entries as directional lights and later entries as point/spot
/// (falloff/spot fields zero when unused).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Light {
    pub strength: [f32; 3],
    pub falloff_start: f32,
    pub direction: [f32; 3],
    pub falloff_end: f32,
    pub position: [f32; 3],
    pub spot_power: f32,
}

impl Light {
    pub fn directional(direction: Vec3, strength: Vec3) -> Self {
        Self {
            strength: strength.to_array(),
            direction: direction.to_array(),
            ..Default::default()
        }
    }

    pub fn point(position: Vec3, strength: Vec3, falloff_start: f32, falloff_end: f32) -> Self {
        Self {
            strength: strength.to_array(),
            position: position.to_array(),
            falloff_start,
            falloff_end,
            ..Default::default()
        }
    }

    pub fn spot(
        position: Vec3,
        direction: Vec3,
        strength: Vec3,
        falloff_start: f32,
        falloff_end: f32,
        spot_power: f32,
    ) -> Self {
        Self {
            strength: strength.to_array(),
            direction: direction.to_array(),
            position: position.to_array(),
            falloff_start,
            falloff_end,
            spot_power,
        }
    }
}

// ── Per-pass ─────────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PassConstants {
    pub view: [[f32; 4]; 4],
    pub inv_view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub inv_proj: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    pub eye_pos: [f32; 3],
    pub _pad0: f32,
    pub render_target_size: [f32; 2],
    pub inv_render_target_size: [f32; 2],
    pub near_z: f32,
    pub far_z: f32,
    pub total_time: f32,
    pub delta_time: f32,
    pub ambient_light: [f32; 4],
    pub lights: [Light; MAX_LIGHTS],
}

impl Default for PassConstants {
    fn default() -> Self {
        let id = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            view: id,
            inv_view: id,
            proj: id,
            inv_proj: id,
            view_proj: id,
            inv_view_proj: id,
            eye_pos: [0.0; 3],
            _pad0: 0.0,
            render_target_size: [0.0; 2],
            inv_render_target_size: [0.0; 2],
            near_z: 0.0,
            far_z: 0.0,
            total_time: 0.0,
            delta_time: 0.0,
            ambient_light: [0.0; 4],
            lights: [Light::default(); MAX_LIGHTS],
        }
    }
}

impl PassConstants {
    /// Fills the matrix block from a view/projection pair.
    pub fn set_matrices(&mut self, view: Mat4, proj: Mat4) {
        let view_proj = proj * view;
        self.view = view.to_cols_array_2d();
        self.inv_view = view.inverse().to_cols_array_2d();
        self.proj = proj.to_cols_array_2d();
        self.inv_proj = proj.inverse().to_cols_array_2d();
        self.view_proj = view_proj.to_cols_array_2d();
        self.inv_view_proj = view_proj.inverse().to_cols_array_2d();
    }

    pub fn set_render_target_size(&mut self, size: Vec2) {
        self.render_target_size = size.to_array();
        self.inv_render_target_size = [1.0 / size.x.max(1.0), 1.0 / size.y.max(1.0)];
    }

    pub fn set_ambient(&mut self, ambient: Vec4) {
        self.ambient_light = ambient.to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_match_wgsl_sizes() {
        // these sizes are baked into the shader and the bind-group layouts
        assert_eq!(std::mem::size_of::<ObjectConstants>(), 128);
        assert_eq!(std::mem::size_of::<MaterialConstants>(), 96);
        assert_eq!(std::mem::size_of::<Light>(), 48);
        assert_eq!(
            std::mem::size_of::<PassConstants>(),
            6 * 64 + 16 + 16 + 16 + 16 + MAX_LIGHTS * 48
        );
    }

    #[test]
    fn set_matrices_produces_consistent_inverses() {
        let mut pass = PassConstants::default();
        let view = Mat4::look_at_rh(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(1.0, 1.5, 0.1, 100.0);
        pass.set_matrices(view, proj);

        let vp = Mat4::from_cols_array_2d(&pass.view_proj);
        let inv_vp = Mat4::from_cols_array_2d(&pass.inv_view_proj);
        assert!((vp * inv_vp).abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }
}
