//! Procedural mesh construction for the scene's primitive shapes.
//!
//! Everything returns plain [`MeshData`]; callers pack the parts they want
//! into one geometry via [`MeshData::append`] and upload once.

use glam::{Vec2, Vec3};

use super::{MeshData, Vertex};

/// Axis-aligned box centred at the origin.
pub fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let (w, h, d) = (width * 0.5, height * 0.5, depth * 0.5);

    // 4 vertices per face so each face gets a flat normal.
    let faces: [(Vec3, [Vec3; 4]); 6] = [
        // +Z
        (
            Vec3::Z,
            [
                Vec3::new(-w, -h, d),
                Vec3::new(w, -h, d),
                Vec3::new(w, h, d),
                Vec3::new(-w, h, d),
            ],
        ),
        // −Z
        (
            Vec3::NEG_Z,
            [
                Vec3::new(w, -h, -d),
                Vec3::new(-w, -h, -d),
                Vec3::new(-w, h, -d),
                Vec3::new(w, h, -d),
            ],
        ),
        // +X
        (
            Vec3::X,
            [
                Vec3::new(w, -h, d),
                Vec3::new(w, -h, -d),
                Vec3::new(w, h, -d),
                Vec3::new(w, h, d),
            ],
        ),
        // −X
        (
            Vec3::NEG_X,
            [
                Vec3::new(-w, -h, -d),
                Vec3::new(-w, -h, d),
                Vec3::new(-w, h, d),
                Vec3::new(-w, h, -d),
            ],
        ),
        // +Y
        (
            Vec3::Y,
            [
                Vec3::new(-w, h, d),
                Vec3::new(w, h, d),
                Vec3::new(w, h, -d),
                Vec3::new(-w, h, -d),
            ],
        ),
        // −Y
        (
            Vec3::NEG_Y,
            [
                Vec3::new(-w, -h, -d),
                Vec3::new(w, -h, -d),
                Vec3::new(w, -h, d),
                Vec3::new(-w, -h, d),
            ],
        ),
    ];

    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = vertices.len() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            vertices.push(Vertex::new(corner, normal, uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData::with_single_submesh("box", vertices, indices)
}

/// Flat grid in the XZ plane, `rows` × `cols` samples, centred at the
/// origin. `height` maps (x, z) to a Y displacement — pass `|_, _| 0.0`
/// for a flat sheet — and `normal` supplies the matching surface normal.
pub fn grid<H, N>(
    width: f32,
    depth: f32,
    rows: usize,
    cols: usize,
    mut height: H,
    mut normal: N,
) -> MeshData
where
    H: FnMut(f32, f32) -> f32,
    N: FnMut(f32, f32) -> Vec3,
{
    assert!(rows >= 2 && cols >= 2);

    let dx = width / (cols - 1) as f32;
    let dz = depth / (rows - 1) as f32;
    let du = 1.0 / (cols - 1) as f32;
    let dv = 1.0 / (rows - 1) as f32;

    let mut vertices = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let z = 0.5 * depth - row as f32 * dz;
        for col in 0..cols {
            let x = -0.5 * width + col as f32 * dx;
            vertices.push(Vertex::new(
                Vec3::new(x, height(x, z), z),
                normal(x, z),
                [col as f32 * du, row as f32 * dv],
            ));
        }
    }

    let mut indices = Vec::with_capacity((rows - 1) * (cols - 1) * 6);
    for row in 0..rows - 1 {
        for col in 0..cols - 1 {
            let i = (row * cols + col) as u32;
            let n = cols as u32;
            indices.extend_from_slice(&[i, i + 1, i + n, i + n, i + 1, i + n + 1]);
        }
    }

    MeshData::with_single_submesh("grid", vertices, indices)
}

/// Capped cylinder along Y, centred at the origin.
pub fn cylinder(
    bottom_radius: f32,
    top_radius: f32,
    height: f32,
    slices: usize,
    stacks: usize,
) -> MeshData {
    assert!(slices >= 3 && stacks >= 1);

    let mut vertices = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let stack_height = height / stacks as f32;
    let radius_step = (top_radius - bottom_radius) / stacks as f32;
    let d_theta = std::f32::consts::TAU / slices as f32;

    // side rings (duplicate seam vertex for clean UVs)
    for stack in 0..=stacks {
        let y = -0.5 * height + stack as f32 * stack_height;
        let r = bottom_radius + stack as f32 * radius_step;
        for slice in 0..=slices {
            let theta = slice as f32 * d_theta;
            let (sin, cos) = theta.sin_cos();
            let pos = Vec3::new(r * cos, y, r * sin);
            // slope-aware side normal
            let dr = bottom_radius - top_radius;
            let n = Vec3::new(height * cos, dr, height * sin).normalize();
            vertices.push(Vertex::new(
                pos,
                n,
                [
                    slice as f32 / slices as f32,
                    1.0 - stack as f32 / stacks as f32,
                ],
            ));
        }
    }

    let ring = (slices + 1) as u32;
    for stack in 0..stacks as u32 {
        for slice in 0..slices as u32 {
            let a = stack * ring + slice;
            let b = (stack + 1) * ring + slice;
            indices.extend_from_slice(&[a, b, b + 1, a, b + 1, a + 1]);
        }
    }

    // caps: fan around a centre vertex
    let mut cap = |y: f32, r: f32, normal: Vec3, flip: bool| {
        if r <= 0.0 {
            return;
        }
        let base = vertices.len() as u32;
        for slice in 0..=slices {
            let theta = slice as f32 * d_theta;
            let (sin, cos) = theta.sin_cos();
            vertices.push(Vertex::new(
                Vec3::new(r * cos, y, r * sin),
                normal,
                [0.5 + 0.5 * cos, 0.5 - 0.5 * sin],
            ));
        }
        let centre = vertices.len() as u32;
        vertices.push(Vertex::new(Vec3::new(0.0, y, 0.0), normal, [0.5, 0.5]));
        for slice in 0..slices as u32 {
            if flip {
                indices.extend_from_slice(&[centre, base + slice, base + slice + 1]);
            } else {
                indices.extend_from_slice(&[centre, base + slice + 1, base + slice]);
            }
        }
    };

    cap(0.5 * height, top_radius, Vec3::Y, false);
    cap(-0.5 * height, bottom_radius, Vec3::NEG_Y, true);

    MeshData::with_single_submesh("cylinder", vertices, indices)
}

/// Cone along Y — a cylinder whose top ring collapses to the apex.
pub fn cone(bottom_radius: f32, height: f32, slices: usize, stacks: usize) -> MeshData {
    cylinder(bottom_radius, 0.0, height, slices, stacks)
}

/// Two crossed vertical quads for a tree sprite, rooted at y = 0.
///
/// Normals face ±Z / ±X per quad half; the sprite pipeline disables
/// culling so both sides draw.
pub fn tree_cross(size: Vec2) -> MeshData {
    let (hw, h) = (size.x * 0.5, size.y);

    let mut data = MeshData::default();
    let quad = |a: Vec3, b: Vec3, normal: Vec3| -> MeshData {
        MeshData::with_single_submesh(
            "quad",
            vec![
                Vertex::new(a, normal, [0.0, 1.0]),
                Vertex::new(b, normal, [1.0, 1.0]),
                Vertex::new(b + Vec3::Y * h, normal, [1.0, 0.0]),
                Vertex::new(a + Vec3::Y * h, normal, [0.0, 0.0]),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    };

    data.append("xz", &quad(Vec3::new(-hw, 0.0, 0.0), Vec3::new(hw, 0.0, 0.0), Vec3::Z));
    data.append("zx", &quad(Vec3::new(0.0, 0.0, hw), Vec3::new(0.0, 0.0, -hw), Vec3::X));
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_24_vertices_12_triangles() {
        let b = box_mesh(2.0, 2.0, 2.0);
        assert_eq!(b.vertices.len(), 24);
        assert_eq!(b.indices.len(), 36);
        let bounds = b.submesh("box").unwrap().bounds;
        assert_eq!(bounds.min, Vec3::splat(-1.0));
        assert_eq!(bounds.max, Vec3::splat(1.0));
    }

    #[test]
    fn grid_counts_match_dimensions() {
        let g = grid(10.0, 10.0, 4, 5, |_, _| 0.0, |_, _| Vec3::Y);
        assert_eq!(g.vertices.len(), 20);
        assert_eq!(g.indices.len(), 3 * 4 * 6);
    }

    #[test]
    fn grid_applies_height_function() {
        let g = grid(2.0, 2.0, 3, 3, |x, z| x + z, |_, _| Vec3::Y);
        // centre sample sits at (0, 0) -> height 0; corner at (-1, 1) -> 0
        let heights: Vec<f32> = g.vertices.iter().map(|v| v.position[1]).collect();
        assert!(heights.iter().any(|h| *h != 0.0));
    }

    #[test]
    fn cylinder_indices_reference_valid_vertices() {
        let c = cylinder(1.0, 0.7, 3.0, 8, 2);
        let max = *c.indices.iter().max().unwrap() as usize;
        assert!(max < c.vertices.len());
        assert_eq!(c.indices.len() % 3, 0);
    }

    #[test]
    fn cone_has_no_top_cap() {
        let cone = cone(1.0, 2.0, 8, 1);
        let cyl = cylinder(1.0, 1.0, 2.0, 8, 1);
        assert!(cone.vertices.len() < cyl.vertices.len());
    }

    #[test]
    fn tree_cross_is_two_quads() {
        let t = tree_cross(Vec2::new(2.0, 4.0));
        assert_eq!(t.vertices.len(), 8);
        assert_eq!(t.indices.len(), 12);
        assert_eq!(t.submesh("xz").unwrap().index_count, 6);
    }
}
