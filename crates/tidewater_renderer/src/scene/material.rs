//! Shared materials and their registry.

use std::collections::HashMap;

use glam::{Mat4, Vec3, Vec4};

use crate::frame::MaterialConstants;

/// Shading parameters shared by any number of render items.
///
/// `dirty` counts how many frame slots still need this material's updated
/// constants; any mutation must reset it to the ring size so every
/// in-flight copy is refreshed exactly once (see
/// [`MaterialRegistry::flush_constants`]).
pub struct Material {
    pub name: String,
    /// Stable element index in every frame slot's material upload buffer.
    pub index: usize,
    pub diffuse_albedo: Vec4,
    pub fresnel_r0: Vec3,
    pub roughness: f32,
    /// UV transform — animated for the water's scrolling surface.
    pub transform: Mat4,
    /// Slot in an external texture table; the renderer's draw path hands
    /// it through untouched.
    pub texture_index: u32,
    pub dirty: usize,
}

impl Material {
    fn constants(&self) -> MaterialConstants {
        MaterialConstants {
            diffuse_albedo: self.diffuse_albedo.to_array(),
            fresnel_r0: self.fresnel_r0.to_array(),
            roughness: self.roughness,
            transform: self.transform.to_cols_array_2d(),
        }
    }
}

/// Descriptor for [`MaterialRegistry::add`].
pub struct MaterialDesc {
    pub name: &'static str,
    pub diffuse_albedo: Vec4,
    pub fresnel_r0: Vec3,
    pub roughness: f32,
    pub texture_index: u32,
}

/// Owns every material; items refer to entries by arena index.
#[derive(Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    by_name: HashMap<String, usize>,
    ring_size: usize,
}

impl MaterialRegistry {
    /// `ring_size` seeds every dirty counter so new materials propagate to
    /// all frame slots.
    pub fn new(ring_size: usize) -> Self {
        Self {
            materials: Vec::new(),
            by_name: HashMap::new(),
            ring_size,
        }
    }

    /// Inserts a material; its upload-buffer index is its arena index.
    pub fn add(&mut self, desc: MaterialDesc) -> usize {
        let index = self.materials.len();
        self.by_name.insert(desc.name.to_string(), index);
        self.materials.push(Material {
            name: desc.name.to_string(),
            index,
            diffuse_albedo: desc.diffuse_albedo,
            fresnel_r0: desc.fresnel_r0,
            roughness: desc.roughness,
            transform: Mat4::IDENTITY,
            texture_index: desc.texture_index,
            dirty: self.ring_size,
        });
        index
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn get(&self, index: usize) -> &Material {
        &self.materials[index]
    }

    /// Mutable access for animation; the caller owns re-dirtying via
    /// [`MaterialRegistry::mark_dirty`].
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut Material {
        &mut self.materials[index]
    }

    /// Resets the dirty counter after a mutation so the change reaches all
    /// ring slots.
    pub fn mark_dirty(&mut self, index: usize) {
        self.materials[index].dirty = self.ring_size;
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Writes the constants of every still-dirty material through `write`
    /// (the current slot's upload buffer in production, a plain closure in
    /// tests) and decrements its counter.
    pub fn flush_constants<F: FnMut(usize, &MaterialConstants)>(&mut self, mut write: F) {
        for mat in &mut self.materials {
            if mat.dirty > 0 {
                write(mat.index, &mat.constants());
                mat.dirty -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> MaterialRegistry {
        let mut reg = MaterialRegistry::new(3);
        reg.add(MaterialDesc {
            name: "water",
            diffuse_albedo: Vec4::new(0.0, 0.4, 0.8, 0.5),
            fresnel_r0: Vec3::splat(0.1),
            roughness: 0.0,
            texture_index: 0,
        });
        reg
    }

    #[test]
    fn new_material_flushes_once_per_slot() {
        let mut reg = registry();
        let mut writes = 0;
        for _ in 0..5 {
            reg.flush_constants(|_, _| writes += 1);
        }
        // ring size 3: exactly three copies, then quiescent
        assert_eq!(writes, 3);
        assert_eq!(reg.get(0).dirty, 0);
    }

    #[test]
    fn mutation_re_dirties_for_full_ring() {
        let mut reg = registry();
        for _ in 0..3 {
            reg.flush_constants(|_, _| {});
        }

        reg.get_mut(0).roughness = 0.9;
        reg.mark_dirty(0);

        let mut seen = Vec::new();
        for _ in 0..4 {
            reg.flush_constants(|idx, c| seen.push((idx, c.roughness)));
        }
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|(idx, r)| *idx == 0 && *r == 0.9));
    }

    #[test]
    fn lookup_by_name() {
        let reg = registry();
        assert_eq!(reg.index_of("water"), Some(0));
        assert_eq!(reg.index_of("missing"), None);
    }
}
