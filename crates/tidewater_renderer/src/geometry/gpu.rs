//! GPU residency for meshes, plus the geometry arena.
//!
//! `MeshGeometry` pairs the retained CPU [`MeshData`] with optional GPU
//! buffers. Separating the two keeps picking (and tests) free of any
//! device dependency: a geometry is fully usable CPU-side before — or
//! without — `upload` being called.

use std::collections::HashMap;
use std::sync::Arc;

use crate::geometry::MeshData;
use crate::resources::buffer;

/// Where a geometry's vertex data comes from at draw time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VertexSource {
    /// The immutable buffer uploaded with the mesh.
    Static,
    /// The current frame slot's dynamic vertex buffer (the water surface —
    /// rewritten from the wave simulation every frame).
    PerFrame,
}

/// GPU buffers for one mesh.
pub struct GpuMesh {
    pub vertex_buffer: Arc<wgpu::Buffer>,
    pub index_buffer: Arc<wgpu::Buffer>,
    pub index_format: wgpu::IndexFormat,
}

/// A mesh in the geometry arena: CPU data, optional GPU residency, and the
/// vertex sourcing policy.
pub struct MeshGeometry {
    pub name: String,
    pub data: MeshData,
    pub vertex_source: VertexSource,
    gpu: Option<GpuMesh>,
}

impl MeshGeometry {
    pub fn new(name: &str, data: MeshData) -> Self {
        Self {
            name: name.to_string(),
            data,
            vertex_source: VertexSource::Static,
            gpu: None,
        }
    }

    /// Creates the GPU buffer pair from the CPU data.
    pub fn upload(&mut self, device: &wgpu::Device) {
        self.gpu = Some(GpuMesh {
            vertex_buffer: buffer::create_vertex(
                device,
                &format!("{} VB", self.name),
                &self.data.vertices,
            ),
            index_buffer: buffer::create_index(
                device,
                &format!("{} IB", self.name),
                &self.data.indices,
            ),
            index_format: wgpu::IndexFormat::Uint32,
        });
    }

    /// GPU buffers; drawing a never-uploaded geometry is a programming
    /// error.
    pub fn gpu(&self) -> &GpuMesh {
        self.gpu
            .as_ref()
            .expect("MeshGeometry::upload not called before drawing")
    }
}

// ── Arena ────────────────────────────────────────────────────────────────────

/// Owns every `MeshGeometry`; render items refer to entries by index so no
/// raw back-references exist (entries are never removed mid-run).
#[derive(Default)]
pub struct GeometryStore {
    entries: Vec<MeshGeometry>,
    by_name: HashMap<String, usize>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `geometry` and returns its stable arena index.
    pub fn insert(&mut self, geometry: MeshGeometry) -> usize {
        let index = self.entries.len();
        self.by_name.insert(geometry.name.clone(), index);
        self.entries.push(geometry);
        index
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn get(&self, index: usize) -> &MeshGeometry {
        &self.entries[index]
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut MeshGeometry {
        &mut self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives;

    #[test]
    fn store_hands_out_stable_indices() {
        let mut store = GeometryStore::new();
        let a = store.insert(MeshGeometry::new("a", primitives::box_mesh(1.0, 1.0, 1.0)));
        let b = store.insert(MeshGeometry::new("b", primitives::box_mesh(2.0, 2.0, 2.0)));
        assert_ne!(a, b);
        assert_eq!(store.index_of("a"), Some(a));
        assert_eq!(store.get(b).name, "b");
    }

    #[test]
    fn geometry_defaults_to_static_vertices() {
        let g = MeshGeometry::new("g", primitives::box_mesh(1.0, 1.0, 1.0));
        assert_eq!(g.vertex_source, VertexSource::Static);
    }
}
