//! Scene construction: geometry, materials, render items, lights.
//!
//! Layout: a hilly land mass with a wave-simulated water sheet, a walled
//! courtyard of boxes with cylinder pillars and cone roofs, a skull
//! centerpiece, and a ring of tree sprites. The highlight item (for
//! picking) starts invisible.

use std::path::Path;

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

use tidewater_renderer::geometry::{primitives, skull, MeshData};
use tidewater_renderer::{Light, MaterialDesc, RenderItemDesc, RenderLayer, Renderer};

/// Populates `renderer`'s registries. The caller must invoke
/// `build_frame_resources` afterwards.
pub fn build(renderer: &mut Renderer, model_path: Option<&str>) -> anyhow::Result<()> {
    build_geometry(renderer, model_path);
    build_materials(renderer);
    build_items(renderer);
    build_lights(renderer);

    renderer.set_clear_color(wgpu::Color {
        r: 0.40,
        g: 0.58,
        b: 0.93,
        a: 1.0,
    });
    Ok(())
}

// ── Land profile ─────────────────────────────────────────────────────────────

fn hills_height(x: f32, z: f32) -> f32 {
    0.1 * (z * (0.1 * x).sin() + x * (0.1 * z).cos())
}

fn hills_normal(x: f32, z: f32) -> Vec3 {
    // n = (-df/dx, 1, -df/dz)
    Vec3::new(
        -0.03 * z * (0.1 * x).cos() - 0.3 * (0.1 * z).cos(),
        1.0,
        -0.3 * (0.1 * x).sin() + 0.03 * x * (0.1 * z).sin(),
    )
    .normalize()
}

// ── Geometry ─────────────────────────────────────────────────────────────────

fn build_geometry(renderer: &mut Renderer, model_path: Option<&str>) {
    // all primitive shapes share one packed buffer pair
    let mut shapes = MeshData::default();
    shapes.append("box", &primitives::box_mesh(1.0, 1.0, 1.0));
    shapes.append("cylinder", &primitives::cylinder(0.5, 0.3, 3.0, 20, 20));
    shapes.append("cone", &primitives::cone(1.0, 1.0, 20, 20));
    renderer.add_geometry("shapes", shapes);

    let land = primitives::grid(160.0, 160.0, 50, 50, hills_height, hills_normal);
    renderer.add_geometry("land", land);

    // flat placeholder matching the wave grid's dimensions and vertex
    // order; the vertex buffer is replaced by the simulation every frame
    let waves = renderer.waves();
    let (rows, cols) = (waves.row_count(), waves.column_count());
    let (width, depth) = (waves.width(), waves.depth());
    let water = primitives::grid(width, depth, rows, cols, |_, _| 0.0, |_, _| Vec3::Y);
    let water_geo = renderer.add_geometry("water", water);
    renderer.set_water_geometry(water_geo);

    renderer.add_geometry("tree", primitives::tree_cross(Vec2::new(6.0, 10.0)));

    if let Some(path) = model_path {
        match skull::load_skull(Path::new(path)) {
            Ok(mesh) => {
                renderer.add_geometry("skull", mesh);
            }
            Err(err) => {
                // content error: report and continue without the model
                log::warn!("skull model unavailable: {err:#}");
            }
        }
    }
}

// ── Materials ────────────────────────────────────────────────────────────────

fn build_materials(renderer: &mut Renderer) {
    renderer.add_material(MaterialDesc {
        name: "grass",
        diffuse_albedo: Vec4::new(0.25, 0.55, 0.22, 1.0),
        fresnel_r0: Vec3::splat(0.01),
        roughness: 0.9,
        texture_index: 0,
    });
    let water = renderer.add_material(MaterialDesc {
        name: "water",
        diffuse_albedo: Vec4::new(0.1, 0.35, 0.6, 0.55),
        fresnel_r0: Vec3::splat(0.1),
        roughness: 0.0,
        texture_index: 1,
    });
    renderer.set_water_material(water);

    renderer.add_material(MaterialDesc {
        name: "stone",
        diffuse_albedo: Vec4::new(0.55, 0.52, 0.50, 1.0),
        fresnel_r0: Vec3::splat(0.05),
        roughness: 0.7,
        texture_index: 2,
    });
    renderer.add_material(MaterialDesc {
        name: "roof",
        diffuse_albedo: Vec4::new(0.55, 0.22, 0.15, 1.0),
        fresnel_r0: Vec3::splat(0.04),
        roughness: 0.6,
        texture_index: 3,
    });
    renderer.add_material(MaterialDesc {
        name: "bone",
        diffuse_albedo: Vec4::new(0.9, 0.88, 0.82, 1.0),
        fresnel_r0: Vec3::splat(0.05),
        roughness: 0.3,
        texture_index: 4,
    });
    renderer.add_material(MaterialDesc {
        name: "foliage",
        diffuse_albedo: Vec4::new(0.2, 0.5, 0.15, 0.9),
        fresnel_r0: Vec3::splat(0.01),
        roughness: 0.8,
        texture_index: 5,
    });
    renderer.add_material(MaterialDesc {
        name: "highlight",
        diffuse_albedo: Vec4::new(1.0, 1.0, 0.0, 0.6),
        fresnel_r0: Vec3::splat(0.05),
        roughness: 0.0,
        texture_index: 6,
    });
}

// ── Items ────────────────────────────────────────────────────────────────────

/// Adds one item drawing `submesh` of `geometry` with `world`, in `layer`.
fn create_item(
    renderer: &mut Renderer,
    layer: RenderLayer,
    geometry_name: &str,
    submesh_name: &str,
    material_name: &str,
    world: Mat4,
) -> usize {
    let geometry = renderer
        .geometry_index(geometry_name)
        .unwrap_or_else(|| panic!("unknown geometry {geometry_name}"));
    let material = renderer
        .material_index(material_name)
        .unwrap_or_else(|| panic!("unknown material {material_name}"));

    let sub = renderer
        .geometry(geometry)
        .data
        .submesh(submesh_name)
        .unwrap_or_else(|| panic!("unknown submesh {submesh_name}"))
        .clone();

    renderer.add_item(
        layer,
        RenderItemDesc {
            world,
            tex_transform: Mat4::IDENTITY,
            geometry,
            material,
            index_count: sub.index_count,
            start_index: sub.start_index,
            base_vertex: sub.base_vertex,
            bounds: sub.bounds,
            visible: true,
        },
    )
}

fn build_items(renderer: &mut Renderer) {
    let place = |pos: Vec3, scale: Vec3| {
        Mat4::from_scale_rotation_translation(scale, Quat::IDENTITY, pos)
    };

    create_item(
        renderer,
        RenderLayer::Opaque,
        "land",
        "grid",
        "grass",
        Mat4::IDENTITY,
    );

    // courtyard: four walls around the origin
    let wall_y = 1.5;
    for (pos, scale) in [
        (Vec3::new(0.0, wall_y, -20.0), Vec3::new(40.0, 3.0, 1.0)),
        (Vec3::new(0.0, wall_y, 20.0), Vec3::new(40.0, 3.0, 1.0)),
        (Vec3::new(-20.0, wall_y, 0.0), Vec3::new(1.0, 3.0, 40.0)),
        (Vec3::new(20.0, wall_y, 0.0), Vec3::new(1.0, 3.0, 40.0)),
    ] {
        create_item(
            renderer,
            RenderLayer::Opaque,
            "shapes",
            "box",
            "stone",
            place(pos, scale),
        );
    }

    // corner pillars with cone roofs
    for (cx, cz) in [(-20.0, -20.0), (-20.0, 20.0), (20.0, -20.0), (20.0, 20.0)] {
        create_item(
            renderer,
            RenderLayer::Opaque,
            "shapes",
            "cylinder",
            "stone",
            place(Vec3::new(cx, 1.5, cz), Vec3::ONE),
        );
        create_item(
            renderer,
            RenderLayer::Opaque,
            "shapes",
            "cone",
            "roof",
            place(Vec3::new(cx, 3.5, cz), Vec3::ONE),
        );
    }

    // centerpiece (only when the model loaded)
    if renderer.geometry_index("skull").is_some() {
        create_item(
            renderer,
            RenderLayer::Opaque,
            "skull",
            "skull",
            "bone",
            place(Vec3::new(0.0, 1.5, 0.0), Vec3::splat(0.5)),
        );
    }

    // water sheet, southeast of the courtyard
    create_item(
        renderer,
        RenderLayer::Transparent,
        "water",
        "grid",
        "water",
        place(Vec3::new(45.0, 0.0, -45.0), Vec3::ONE),
    );

    // tree sprite ring outside the walls
    for i in 0..8 {
        let angle = i as f32 / 8.0 * std::f32::consts::TAU;
        let pos = Vec3::new(32.0 * angle.cos(), 0.0, 32.0 * angle.sin());
        create_item(
            renderer,
            RenderLayer::Sprites,
            "tree",
            "xz",
            "foliage",
            place(pos, Vec3::ONE) * Mat4::from_rotation_y(angle),
        );
        create_item(
            renderer,
            RenderLayer::Sprites,
            "tree",
            "zx",
            "foliage",
            place(pos, Vec3::ONE) * Mat4::from_rotation_y(angle),
        );
    }

    // picking highlight: invisible until a pick succeeds; its draw range
    // and world matrix are overwritten per pick
    let highlight = renderer.add_item(
        RenderLayer::Highlight,
        RenderItemDesc {
            world: Mat4::IDENTITY,
            tex_transform: Mat4::IDENTITY,
            geometry: renderer.geometry_index("shapes").expect("shapes geometry"),
            material: renderer.material_index("highlight").expect("highlight material"),
            index_count: 0,
            start_index: 0,
            base_vertex: 0,
            bounds: tidewater_renderer::Aabb::new(Vec3::ZERO, Vec3::ZERO),
            visible: false,
        },
    );
    renderer.set_highlight_item(highlight);
}

// ── Lights ───────────────────────────────────────────────────────────────────

fn build_lights(renderer: &mut Renderer) {
    renderer.set_ambient_light(Vec4::new(0.25, 0.25, 0.35, 1.0));
    renderer.set_lights(&[
        // three-point directional rig
        Light::directional(Vec3::new(0.577, -0.577, 0.577), Vec3::splat(0.6)),
        Light::directional(Vec3::new(-0.577, -0.577, 0.577), Vec3::splat(0.3)),
        Light::directional(Vec3::new(0.0, -0.707, -0.707), Vec3::splat(0.15)),
        // courtyard point light
        Light::point(Vec3::new(0.0, 4.0, 0.0), Vec3::new(1.5, 1.2, 0.6), 2.0, 24.0),
        // gate spot
        Light::spot(
            Vec3::new(0.0, 8.0, -18.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::splat(6.0),
            2.0,
            20.0,
            16.0,
        ),
    ]);
}
