//! CPU-side mesh representation.
//!
//! `MeshData` keeps vertices and indices on the CPU even after GPU upload —
//! the picking controller walks the raw triangles, so the data must outlive
//! the upload (the GPU buffers are an additional view, not a replacement).

pub mod gpu;
pub mod primitives;
pub mod skull;

use std::collections::HashMap;

use glam::Vec3;

use crate::intersect::Aabb;

// ── Vertex ───────────────────────────────────────────────────────────────────

/// Vertex format shared by every mesh in the scene.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
        }
    }

    /// `VertexBufferLayout` matching the struct's memory layout; used by
    /// every pipeline in the set.
    pub fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 24,
                    shader_location: 2,
                },
            ],
        }
    }
}

// ── Submesh ──────────────────────────────────────────────────────────────────

/// Draw arguments for one named region of a packed mesh buffer.
#[derive(Clone, Debug)]
pub struct Submesh {
    pub index_count: u32,
    pub start_index: u32,
    pub base_vertex: i32,
    /// Bounding box in the mesh's local space.
    pub bounds: Aabb,
}

// ── MeshData ─────────────────────────────────────────────────────────────────

/// A mesh (possibly many submeshes packed into one buffer pair) on the CPU.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub submeshes: HashMap<String, Submesh>,
}

impl MeshData {
    /// Builds a single-submesh mesh covering the whole buffer under `name`.
    pub fn with_single_submesh(
        name: &str,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
    ) -> Self {
        let bounds = Aabb::from_points(vertices.iter().map(|v| Vec3::from(v.position)));
        let mut submeshes = HashMap::new();
        submeshes.insert(
            name.to_string(),
            Submesh {
                index_count: indices.len() as u32,
                start_index: 0,
                base_vertex: 0,
                bounds,
            },
        );
        Self {
            vertices,
            indices,
            submeshes,
        }
    }

    /// Appends `part` as a named submesh, offsetting its draw args past the
    /// data already present.
    pub fn append(&mut self, name: &str, part: &MeshData) {
        let start_index = self.indices.len() as u32;
        let base_vertex = self.vertices.len() as i32;
        let bounds =
            Aabb::from_points(part.vertices.iter().map(|v| Vec3::from(v.position)));

        self.vertices.extend_from_slice(&part.vertices);
        self.indices.extend_from_slice(&part.indices);
        self.submeshes.insert(
            name.to_string(),
            Submesh {
                index_count: part.indices.len() as u32,
                start_index,
                base_vertex,
                bounds,
            },
        );
    }

    pub fn submesh(&self, name: &str) -> Option<&Submesh> {
        self.submeshes.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(dx: f32) -> MeshData {
        MeshData::with_single_submesh(
            "tri",
            vec![
                Vertex::new(Vec3::new(dx, 0.0, 0.0), Vec3::Y, [0.0, 0.0]),
                Vertex::new(Vec3::new(dx + 1.0, 0.0, 0.0), Vec3::Y, [1.0, 0.0]),
                Vertex::new(Vec3::new(dx, 0.0, 1.0), Vec3::Y, [0.0, 1.0]),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn append_offsets_draw_args() {
        let mut packed = MeshData::default();
        packed.append("a", &tri(0.0));
        packed.append("b", &tri(5.0));

        let b = packed.submesh("b").unwrap();
        assert_eq!(b.start_index, 3);
        assert_eq!(b.base_vertex, 3);
        assert_eq!(b.index_count, 3);
        assert_eq!(b.bounds.min.x, 5.0);
        assert_eq!(packed.vertices.len(), 6);
    }
}
