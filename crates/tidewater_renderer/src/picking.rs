//! Mouse picking: screen point → view-space ray → per-item local-space
//! intersection.
//!
//! The pick scans the opaque layer only — the picking set is a deliberate
//! subset of the drawables. Two independent results come out of one scan:
//!
//! * the globally nearest intersected **triangle** (drives the highlight
//!   item), and
//! * the nearest **bounding-box** hit distance in world space (drives the
//!   stop-forward movement gate).
//!
//! Keeping the two separate avoids any dependence on candidate iteration
//! order.

use glam::{Mat4, Vec3};

use tidewater_core::Camera;

use crate::geometry::gpu::GeometryStore;
use crate::intersect::{ray_aabb, ray_triangle, Ray};
use crate::scene::{ItemRegistry, RenderLayer};

/// Camera-to-obstacle distance under which forward movement is blocked.
pub const STOP_DISTANCE: f32 = 2.0;

/// The winning triangle of a successful pick.
#[derive(Copy, Clone, Debug)]
pub struct PickHit {
    /// Id of the picked render item.
    pub item: usize,
    /// Triangle index relative to the item's draw range.
    pub triangle: u32,
    /// Hit parameter in the item's local space (see tie-break note).
    pub t: f32,
    /// Absolute draw args for exactly the hit triangle.
    pub start_index: u32,
    pub base_vertex: i32,
    pub geometry: usize,
    pub world: Mat4,
}

/// Result of one pick invocation.
#[derive(Default)]
pub struct PickOutcome {
    pub hit: Option<PickHit>,
    /// Nearest world-space distance at which any candidate's bounding box
    /// was entered, independent of whether a triangle was hit.
    pub nearest_obstacle: Option<f32>,
}

impl PickOutcome {
    /// Whether forward movement should be blocked after this pick.
    pub fn blocks_movement(&self) -> bool {
        self.nearest_obstacle.is_some_and(|d| d < STOP_DISTANCE)
    }
}

/// Casts a pick ray through screen position `(sx, sy)` on a viewport of
/// `(width, height)` pixels.
///
/// Tie-break: a strictly smaller `t` replaces the previous best; an equal
/// `t` keeps the first found. Iteration order (candidates, then triangles)
/// is an implementation detail callers must not rely on.
pub fn pick(
    sx: f32,
    sy: f32,
    width: f32,
    height: f32,
    camera: &Camera,
    items: &ItemRegistry,
    geometries: &GeometryStore,
) -> PickOutcome {
    // Unproject through the projection diagonal: a ray through (vx, vy, −1)
    // in view space passes through the same pixels as one through the
    // projection-window point itself.
    let proj = camera.proj();
    let vx = (2.0 * sx / width - 1.0) / proj.col(0).x;
    let vy = (-2.0 * sy / height + 1.0) / proj.col(1).y;

    let view_ray = Ray::new(Vec3::ZERO, Vec3::new(vx, vy, -1.0));
    let inv_view = camera.view().inverse();

    let mut outcome = PickOutcome::default();

    for &id in items.layer(RenderLayer::Opaque) {
        let item = items.get(id);
        if !item.visible {
            continue;
        }

        // view space → world space → this item's local space
        let to_local = item.world.inverse() * inv_view;
        let local_ray = view_ray.transformed(&to_local);

        // Bounding-box early-out; skipping it would pay O(triangles) for
        // every non-candidate object.
        let Some(t_box) = ray_aabb(&local_ray, &item.bounds) else {
            continue;
        };

        // Movement gate uses the box-entry distance mapped back to world
        // space, so item scaling cannot skew the comparison.
        let entry_world = item
            .world
            .transform_point3(local_ray.origin + local_ray.dir * t_box);
        let obstacle = (entry_world - camera.position()).length();
        if outcome.nearest_obstacle.map_or(true, |d| obstacle < d) {
            outcome.nearest_obstacle = Some(obstacle);
        }

        let mesh = &geometries.get(item.geometry).data;
        let tri_count = item.index_count / 3;
        for tri in 0..tri_count {
            let first = (item.start_index + tri * 3) as usize;
            let fetch = |k: usize| {
                let vi = mesh.indices[first + k] as i64 + item.base_vertex as i64;
                Vec3::from(mesh.vertices[vi as usize].position)
            };
            let (v0, v1, v2) = (fetch(0), fetch(1), fetch(2));

            if let Some(t) = ray_triangle(&local_ray, v0, v1, v2) {
                let better = outcome.hit.map_or(true, |best| t < best.t);
                if better {
                    outcome.hit = Some(PickHit {
                        item: id,
                        triangle: tri,
                        t,
                        start_index: item.start_index + tri * 3,
                        base_vertex: item.base_vertex,
                        geometry: item.geometry,
                        world: item.world,
                    });
                }
            }
        }
    }

    outcome
}

/// Applies a pick outcome to the highlight item: on a hit it becomes
/// visible and draws exactly the winning triangle with the winner's world
/// matrix; on a miss it is hidden and its stored draw range is left
/// untouched.
pub fn apply_to_highlight(items: &mut ItemRegistry, highlight_id: usize, outcome: &PickOutcome) {
    match outcome.hit {
        Some(hit) => {
            let item = items.get_mut(highlight_id);
            item.visible = true;
            item.world = hit.world;
            item.geometry = hit.geometry;
            item.index_count = 3;
            item.start_index = hit.start_index;
            item.base_vertex = hit.base_vertex;
            items.mark_dirty(highlight_id);
        }
        None => {
            items.get_mut(highlight_id).visible = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::gpu::MeshGeometry;
    use crate::geometry::primitives;
    use crate::intersect::Aabb;
    use crate::scene::RenderItemDesc;

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn cube_desc(geometry: usize, world: Mat4) -> RenderItemDesc {
        RenderItemDesc {
            world,
            tex_transform: Mat4::IDENTITY,
            geometry,
            material: 0,
            index_count: 36,
            start_index: 0,
            base_vertex: 0,
            bounds: Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
            visible: true,
        }
    }

    fn scene_with_cube(world: Mat4) -> (GeometryStore, ItemRegistry, usize, usize) {
        let mut geos = GeometryStore::new();
        let cube = geos.insert(MeshGeometry::new("cube", primitives::box_mesh(1.0, 1.0, 1.0)));

        let mut items = ItemRegistry::new(3);
        let cube_item = items.add(RenderLayer::Opaque, cube_desc(cube, world));
        let highlight = items.add(
            RenderLayer::Highlight,
            RenderItemDesc {
                visible: false,
                index_count: 0,
                ..cube_desc(cube, Mat4::IDENTITY)
            },
        );
        (geos, items, cube_item, highlight)
    }

    fn camera_at(eye: Vec3) -> Camera {
        let mut cam = Camera::new(eye);
        cam.set_lens(0.25 * std::f32::consts::PI, W / H, 1.0, 1000.0);
        cam.update_view();
        cam
    }

    #[test]
    fn center_ray_picks_the_cube() {
        let (geos, mut items, cube_item, highlight) = scene_with_cube(Mat4::IDENTITY);
        let cam = camera_at(Vec3::new(0.0, 0.0, 5.0));

        let outcome = pick(W / 2.0, H / 2.0, W, H, &cam, &items, &geos);
        let hit = outcome.hit.expect("cube under the cursor");
        assert_eq!(hit.item, cube_item);
        assert!((hit.t - 4.5).abs() < 1e-3);

        apply_to_highlight(&mut items, highlight, &outcome);
        let h = items.get(highlight);
        assert!(h.visible);
        assert_eq!(h.index_count, 3);
        assert_eq!(h.start_index, hit.start_index);
        assert_eq!(h.world, Mat4::IDENTITY);
        assert_eq!(h.dirty, 3);
    }

    #[test]
    fn pick_respects_world_transform() {
        let world = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let (geos, items, cube_item, _) = scene_with_cube(world);
        let mut cam = camera_at(Vec3::new(10.0, 0.0, 5.0));
        cam.update_view();

        let outcome = pick(W / 2.0, H / 2.0, W, H, &cam, &items, &geos);
        assert_eq!(outcome.hit.expect("hit").item, cube_item);
    }

    #[test]
    fn miss_hides_highlight_and_preserves_range() {
        let (geos, mut items, _, highlight) = scene_with_cube(Mat4::IDENTITY);

        // seed the highlight with a previous pick's range
        {
            let h = items.get_mut(highlight);
            h.visible = true;
            h.index_count = 3;
            h.start_index = 12;
        }

        // camera looks away from the cube
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        cam.rotate_y(std::f32::consts::PI);
        cam.update_view();

        let outcome = pick(W / 2.0, H / 2.0, W, H, &cam, &items, &geos);
        assert!(outcome.hit.is_none());

        apply_to_highlight(&mut items, highlight, &outcome);
        let h = items.get(highlight);
        assert!(!h.visible);
        assert_eq!(h.start_index, 12, "stored range must not be mutated");
        assert_eq!(h.index_count, 3);
    }

    #[test]
    fn bounding_box_hit_without_triangle_hit_does_not_win() {
        let mut geos = GeometryStore::new();
        let cube = geos.insert(MeshGeometry::new("cube", primitives::box_mesh(1.0, 1.0, 1.0)));

        let mut items = ItemRegistry::new(3);
        // decoy listed first: its (deliberately oversized) box straddles
        // the ray, but its triangles sit far off to the side
        let decoy_world = Mat4::from_translation(Vec3::new(50.0, 0.0, 2.0));
        let mut decoy = cube_desc(cube, decoy_world);
        decoy.bounds = Aabb::new(Vec3::new(-60.0, -1.0, -1.0), Vec3::new(60.0, 1.0, 1.0));
        let decoy_id = items.add(RenderLayer::Opaque, decoy);

        let real_id = items.add(RenderLayer::Opaque, cube_desc(cube, Mat4::IDENTITY));

        let cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let outcome = pick(W / 2.0, H / 2.0, W, H, &cam, &items, &geos);

        let hit = outcome.hit.expect("real cube must be found");
        assert_eq!(hit.item, real_id);
        assert_ne!(hit.item, decoy_id);
    }

    #[test]
    fn invisible_items_are_not_candidates() {
        let (geos, mut items, cube_item, _) = scene_with_cube(Mat4::IDENTITY);
        items.get_mut(cube_item).visible = false;

        let cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let outcome = pick(W / 2.0, H / 2.0, W, H, &cam, &items, &geos);
        assert!(outcome.hit.is_none());
        assert!(outcome.nearest_obstacle.is_none());
    }

    #[test]
    fn movement_gate_tracks_nearest_box_not_nearest_triangle() {
        let (geos, items, _, _) = scene_with_cube(Mat4::IDENTITY);

        // far away: no block
        let cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let outcome = pick(W / 2.0, H / 2.0, W, H, &cam, &items, &geos);
        assert!(!outcome.blocks_movement());
        assert!((outcome.nearest_obstacle.unwrap() - 4.5).abs() < 1e-3);

        // close up: blocked
        let cam = camera_at(Vec3::new(0.0, 0.0, 1.6));
        let outcome = pick(W / 2.0, H / 2.0, W, H, &cam, &items, &geos);
        assert!(outcome.blocks_movement());
    }
}
