//! Top-level renderer and frame scheduler.
//!
//! One [`Renderer::update`] + [`Renderer::render`] pair runs per presented
//! frame:
//!
//! ```text
//! update: camera → acquire slot (fence wait) → material animation →
//!         dirty object/material flush → pass constants → wave step +
//!         vertex upload
//! render: frame packet → pass recording → submit → fence bookkeeping
//! ```
//!
//! The only blocking point is the fence wait inside `acquire_next`; the
//! CPU may record at most `ring size − 1` frames ahead of the GPU.
//! Shutdown drains all in-flight work (`Drop`) before GPU-visible buffers
//! are released.

use glam::{Vec2, Vec3, Vec4};
use rand::Rng;

use tidewater_core::{Camera, Time};

use crate::context::RenderContext;
use crate::frame::{FrameError, FrameRing, Light, PassConstants, DEFAULT_RING_SIZE};
use crate::geometry::gpu::{GeometryStore, MeshGeometry, VertexSource};
use crate::geometry::Vertex;
use crate::graph::{DrawCommand, FramePacket, RenderPass, SlotBindings};
use crate::passes::ScenePass;
use crate::picking::{self, PickOutcome};
use crate::pipeline::{PipelineLayouts, ScenePipelines};
use crate::render_target::RenderTarget;
use crate::scene::{ItemRegistry, MaterialDesc, MaterialRegistry, RenderItemDesc, RenderLayer};
use crate::waves::Waves;

/// Wave grid dimensions and physical constants for the water surface.
const WAVE_ROWS: usize = 128;
const WAVE_COLS: usize = 128;
const WAVE_SPATIAL_STEP: f32 = 1.0;
const WAVE_TIME_STEP: f32 = 0.03;
const WAVE_SPEED: f32 = 4.0;
const WAVE_DAMPING: f32 = 0.2;

/// Seconds between random wave disturbances.
const DISTURB_INTERVAL: f32 = 0.25;

pub struct Renderer {
    pub context: RenderContext,
    render_target: RenderTarget,
    passes: Vec<Box<dyn RenderPass>>,

    pub camera: Camera,

    geometries: GeometryStore,
    materials: MaterialRegistry,
    items: ItemRegistry,

    /// Created by [`Renderer::build_frame_resources`] once the scene is
    /// final (buffer capacities come from the registries).
    ring: Option<FrameRing>,
    layouts: PipelineLayouts,

    waves: Waves,
    water_geometry: Option<usize>,
    water_material: Option<usize>,
    water_scroll: Vec2,
    disturb_timer: f32,

    highlight_item: Option<usize>,
    movement_blocked: bool,

    pass_constants: PassConstants,
    wireframe: bool,

    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(
        context: RenderContext,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let device = &context.device;

        let render_target = RenderTarget::new(device, width, height, format, 4);
        let layouts = PipelineLayouts::new(device);
        let pipelines =
            ScenePipelines::new(device, format, render_target.sample_count(), layouts.clone());

        let mut camera = Camera::new(Vec3::new(0.0, 2.0, 15.0));
        camera.set_lens(
            0.25 * std::f32::consts::PI,
            width as f32 / height.max(1) as f32,
            1.0,
            1000.0,
        );

        let passes: Vec<Box<dyn RenderPass>> = vec![Box::new(ScenePass::new(pipelines))];

        Self {
            context,
            render_target,
            passes,
            camera,
            geometries: GeometryStore::new(),
            materials: MaterialRegistry::new(DEFAULT_RING_SIZE),
            items: ItemRegistry::new(DEFAULT_RING_SIZE),
            ring: None,
            layouts,
            waves: Waves::new(
                WAVE_ROWS,
                WAVE_COLS,
                WAVE_SPATIAL_STEP,
                WAVE_TIME_STEP,
                WAVE_SPEED,
                WAVE_DAMPING,
            ),
            water_geometry: None,
            water_material: None,
            water_scroll: Vec2::ZERO,
            disturb_timer: 0.0,
            highlight_item: None,
            movement_blocked: false,
            pass_constants: PassConstants::default(),
            wireframe: false,
            width,
            height,
        }
    }

    // ── Scene construction ────────────────────────────────────────────────

    /// Uploads `data` and registers it; returns the geometry's arena index.
    pub fn add_geometry(&mut self, name: &str, data: crate::geometry::MeshData) -> usize {
        let mut geometry = MeshGeometry::new(name, data);
        geometry.upload(&self.context.device);
        self.geometries.insert(geometry)
    }

    pub fn geometry(&self, index: usize) -> &MeshGeometry {
        self.geometries.get(index)
    }

    pub fn geometry_index(&self, name: &str) -> Option<usize> {
        self.geometries.index_of(name)
    }

    pub fn add_material(&mut self, desc: MaterialDesc) -> usize {
        self.materials.add(desc)
    }

    pub fn material_index(&self, name: &str) -> Option<usize> {
        self.materials.index_of(name)
    }

    pub fn add_item(&mut self, layer: RenderLayer, desc: RenderItemDesc) -> usize {
        self.items.add(layer, desc)
    }

    pub fn items(&self) -> &ItemRegistry {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut ItemRegistry {
        &mut self.items
    }

    pub fn waves(&self) -> &Waves {
        &self.waves
    }

    /// Marks `geometry` as the water surface: its vertex data comes from
    /// the current frame slot's dynamic buffer instead of a static upload.
    pub fn set_water_geometry(&mut self, geometry: usize) {
        self.geometries.get_mut(geometry).vertex_source = VertexSource::PerFrame;
        self.water_geometry = Some(geometry);
    }

    /// Material whose UV transform scrolls to animate the water texture.
    pub fn set_water_material(&mut self, material: usize) {
        self.water_material = Some(material);
    }

    /// Registers the highlight item updated by [`Renderer::pick`].
    pub fn set_highlight_item(&mut self, item: usize) {
        self.highlight_item = Some(item);
    }

    pub fn set_ambient_light(&mut self, ambient: Vec4) {
        self.pass_constants.set_ambient(ambient);
    }

    /// Installs the scene's light list into the leading entries of the
    /// pass-constant light array.
    pub fn set_lights(&mut self, lights: &[Light]) {
        assert!(lights.len() <= crate::frame::MAX_LIGHTS);
        for (slot, light) in self.pass_constants.lights.iter_mut().zip(lights) {
            *slot = *light;
        }
    }

    /// Allocates the frame-resource ring sized to the final scene. Call
    /// exactly once, after all geometry/materials/items are registered;
    /// the scene is fixed from here on (nothing is added or removed
    /// mid-run).
    pub fn build_frame_resources(&mut self) {
        assert!(self.ring.is_none(), "frame resources already built");
        self.ring = Some(FrameRing::new(
            &self.context.device,
            &self.layouts,
            DEFAULT_RING_SIZE,
            self.items.len(),
            self.materials.len(),
            self.waves.vertex_count(),
        ));
        log::info!(
            "frame ring: {} slots, {} items, {} materials, {} wave vertices",
            DEFAULT_RING_SIZE,
            self.items.len(),
            self.materials.len(),
            self.waves.vertex_count()
        );
    }

    // ── Per-frame scheduling ──────────────────────────────────────────────

    /// Runs the update half of the frame: rotates the ring (blocking on
    /// the slot's fence if the GPU is behind), then refreshes every
    /// CPU-writable buffer of the now-safe slot.
    pub fn update(&mut self, time: Time) -> Result<(), FrameError> {
        self.camera.update_view();

        let ring = self.ring.as_mut().expect("build_frame_resources not called");
        ring.acquire_next(&self.context.device)?;

        self.animate_materials(time);
        self.flush_constants();
        self.update_pass_constants(time);
        self.update_waves(time);
        Ok(())
    }

    /// Scrolls the water material's UV transform (wrapping at 1) and
    /// re-dirties it for full ring propagation.
    fn animate_materials(&mut self, time: Time) {
        let Some(index) = self.water_material else {
            return;
        };

        self.water_scroll.x += 0.1 * time.delta;
        self.water_scroll.y += 0.02 * time.delta;
        self.water_scroll.x %= 1.0;
        self.water_scroll.y %= 1.0;

        let mat = self.materials.get_mut(index);
        mat.transform = glam::Mat4::from_translation(self.water_scroll.extend(0.0));
        self.materials.mark_dirty(index);
    }

    /// Writes the constants of every dirty item/material into the current
    /// slot's upload buffers (one decrement per flush — see the dirty
    /// counter contract on the registries).
    fn flush_constants(&mut self) {
        let slot = self.ring.as_ref().expect("ring").current();
        let queue = &self.context.queue;

        self.items
            .flush_object_constants(|index, constants| slot.object_cb.write(queue, index, constants));
        self.materials
            .flush_constants(|index, constants| slot.material_cb.write(queue, index, constants));
    }

    fn update_pass_constants(&mut self, time: Time) {
        let pass = &mut self.pass_constants;
        pass.set_matrices(self.camera.view(), self.camera.proj());
        pass.eye_pos = self.camera.position().to_array();
        pass.set_render_target_size(Vec2::new(self.width as f32, self.height as f32));
        pass.near_z = self.camera.near_z();
        pass.far_z = self.camera.far_z();
        pass.total_time = time.elapsed as f32;
        pass.delta_time = time.delta;

        let slot = self.ring.as_ref().expect("ring").current();
        crate::resources::buffer::update_uniform(&self.context.queue, &slot.pass_cb, pass);
    }

    /// Advances the wave simulation and uploads the fresh surface into the
    /// current slot's dynamic vertex buffer.
    fn update_waves(&mut self, time: Time) {
        if self.water_geometry.is_none() {
            return;
        }

        // periodic random disturbance at an interior cell
        self.disturb_timer += time.delta;
        while self.disturb_timer >= DISTURB_INTERVAL {
            self.disturb_timer -= DISTURB_INTERVAL;
            let mut rng = rand::thread_rng();
            let row = rng.gen_range(4..self.waves.row_count() - 4);
            let col = rng.gen_range(4..self.waves.column_count() - 4);
            let magnitude = rng.gen_range(0.2_f32..0.5);
            self.waves.disturb(row, col, magnitude);
        }

        self.waves.update(time.delta);

        let width = self.waves.width();
        let depth = self.waves.depth();
        let vertices: Vec<Vertex> = (0..self.waves.vertex_count())
            .map(|i| {
                let position = self.waves.position(i);
                Vertex::new(
                    position,
                    self.waves.normal(i),
                    // map [-w/2, w/2] → [0, 1]
                    [0.5 + position.x / width, 0.5 - position.z / depth],
                )
            })
            .collect();

        let slot = self.ring.as_ref().expect("ring").current();
        self.context
            .queue
            .write_buffer(&slot.waves_vb, 0, bytemuck::cast_slice(&vertices));
    }

    // ── Recording + submission ────────────────────────────────────────────

    /// Records and submits the frame into `surface_view`, then registers
    /// the fence for the slot that produced it.
    pub fn render(&mut self, surface_view: &wgpu::TextureView) {
        let packet = self.build_packet();

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Frame Encoder"),
                });

        let (color_view, resolve_target) = match &self.render_target.msaa_view {
            Some(msaa) => (msaa, Some(surface_view)),
            None => (surface_view, None),
        };

        for pass in &mut self.passes {
            pass.prepare(&self.context.device, &self.context.queue, &packet);
            pass.execute(
                &self.context.device,
                &self.context.queue,
                &mut encoder,
                color_view,
                resolve_target,
                &self.render_target.depth_view,
                &packet,
            );
        }

        self.context.queue.submit(Some(encoder.finish()));
        self.ring
            .as_mut()
            .expect("ring")
            .mark_submitted(&self.context.queue);
    }

    /// Resolves the registries into per-layer draw commands against the
    /// current frame slot.
    fn build_packet(&self) -> FramePacket {
        let slot = self.ring.as_ref().expect("ring").current();

        let mut layers: [Vec<DrawCommand>; RenderLayer::COUNT] = Default::default();
        for layer in RenderLayer::DRAW_ORDER {
            let commands = &mut layers[layer.index()];
            for &id in self.items.layer(layer) {
                let item = self.items.get(id);
                if !item.visible || item.index_count == 0 {
                    continue;
                }

                let geometry = self.geometries.get(item.geometry);
                let gpu = geometry.gpu();
                let vertex_buffer = match geometry.vertex_source {
                    VertexSource::Static => gpu.vertex_buffer.clone(),
                    VertexSource::PerFrame => slot.waves_vb.clone(),
                };

                commands.push(DrawCommand {
                    vertex_buffer,
                    index_buffer: gpu.index_buffer.clone(),
                    index_format: gpu.index_format,
                    index_count: item.index_count,
                    start_index: item.start_index,
                    base_vertex: item.base_vertex,
                    object_offset: slot.object_cb.offset(item.object_index),
                    material_offset: slot.material_cb.offset(item.material),
                });
            }
        }

        FramePacket {
            bindings: SlotBindings {
                pass: slot.pass_bind_group.clone(),
                object: slot.object_cb.bind_group.clone(),
                material: slot.material_cb.bind_group.clone(),
            },
            layers,
            wireframe: self.wireframe,
        }
    }

    // ── Picking ───────────────────────────────────────────────────────────

    /// Casts a pick ray through window coordinates `(sx, sy)`, updates the
    /// highlight item, and re-evaluates the movement gate.
    pub fn pick(&mut self, sx: f32, sy: f32) -> PickOutcome {
        self.camera.update_view();
        let outcome = picking::pick(
            sx,
            sy,
            self.width as f32,
            self.height as f32,
            &self.camera,
            &self.items,
            &self.geometries,
        );

        if let Some(highlight) = self.highlight_item {
            picking::apply_to_highlight(&mut self.items, highlight, &outcome);
        }
        self.movement_blocked = outcome.blocks_movement();

        if let Some(hit) = &outcome.hit {
            log::debug!("picked item {} triangle {}", hit.item, hit.triangle);
        }
        outcome
    }

    /// Whether the last pick found an obstacle close enough to block
    /// forward movement.
    #[inline]
    pub fn movement_blocked(&self) -> bool {
        self.movement_blocked
    }

    // ── Window / misc ─────────────────────────────────────────────────────

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width == 0 || new_height == 0 {
            return;
        }
        self.width = new_width;
        self.height = new_height;
        self.render_target
            .resize(&self.context.device, new_width, new_height);
        self.camera.set_lens(
            0.25 * std::f32::consts::PI,
            new_width as f32 / new_height as f32,
            1.0,
            1000.0,
        );
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.wireframe = wireframe;
    }

    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        for pass in &mut self.passes {
            if let Some(scene) = pass.as_any_mut().downcast_mut::<ScenePass>() {
                scene.clear_color = color;
            }
        }
    }

    /// Drains all in-flight GPU work. Also called from `Drop`; safe to
    /// call repeatedly.
    pub fn wait_idle(&self) {
        if let Some(ring) = &self.ring {
            ring.wait_idle(&self.context.device);
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        // releasing slot buffers while the GPU still reads them would be a
        // use-after-free; drain first
        self.wait_idle();
    }
}
