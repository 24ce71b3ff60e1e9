//! The frame-resource ring.
//!
//! Each slot owns every CPU-writable, GPU-visible resource one in-flight
//! frame needs: the per-object and per-material upload buffers, the pass
//! constants, and the dynamic wave vertex buffer. The ring bounds how far
//! the CPU can run ahead of the GPU to `ring size − 1` frames: acquiring a
//! slot blocks until the fence recorded at that slot's last submission has
//! been completed on the [`GpuTimeline`].
//!
//! Ownership handoff is sequenced purely by the fence — a slot is
//! exclusively the CPU's between `acquire_next` and submission, then
//! logically the GPU's until its fence value is signaled. No locking is
//! involved because there is exactly one recording thread.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::frame::constants::{MaterialConstants, ObjectConstants, PassConstants};
use crate::frame::timeline::GpuTimeline;
use crate::frame::upload::UploadBuffer;
use crate::geometry::Vertex;
use crate::pipeline::PipelineLayouts;
use crate::resources::buffer;

/// Frames allowed in flight. Three trades one extra frame of latency for
/// keeping the GPU fed while the CPU records.
pub const DEFAULT_RING_SIZE: usize = 3;

/// How long a fence wait may stall before the device is declared lost.
const FENCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Condvar slice between device polls while waiting on a fence.
const POLL_SLICE: Duration = Duration::from_millis(1);

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("fence wait exceeded {0:?}; treating device as lost")]
    DeviceLost(Duration),
}

// ── Slot ─────────────────────────────────────────────────────────────────────

/// One ring element: all per-frame upload state plus the fence value from
/// its last submission (0 = never submitted).
pub struct FrameSlot {
    pub object_cb: UploadBuffer<ObjectConstants>,
    pub material_cb: UploadBuffer<MaterialConstants>,
    pub pass_cb: Arc<wgpu::Buffer>,
    pub pass_bind_group: Arc<wgpu::BindGroup>,
    /// Vertex buffer the wave simulation rewrites while this slot is owned
    /// by the CPU.
    pub waves_vb: Arc<wgpu::Buffer>,
    fence: u64,
}

impl FrameSlot {
    fn new(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        index: usize,
        object_count: usize,
        material_count: usize,
        wave_vertex_count: usize,
    ) -> Self {
        let object_cb = UploadBuffer::new(
            device,
            &layouts.object,
            &format!("Frame {index} ObjectCB"),
            object_count,
        );
        let material_cb = UploadBuffer::new(
            device,
            &layouts.material,
            &format!("Frame {index} MaterialCB"),
            material_count,
        );

        let pass_cb = buffer::create_uniform(
            device,
            &format!("Frame {index} PassCB"),
            &PassConstants::default(),
        );
        let pass_bind_group = Arc::new(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Frame {index} Pass BindGroup")),
            layout: &layouts.pass,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: pass_cb.as_entire_binding(),
            }],
        }));

        let waves_vb = buffer::create_dynamic_vertex(
            device,
            &format!("Frame {index} WavesVB"),
            (wave_vertex_count * std::mem::size_of::<Vertex>()) as u64,
        );

        Self {
            object_cb,
            material_cb,
            pass_cb,
            pass_bind_group,
            waves_vb,
            fence: 0,
        }
    }
}

// ── Ring ─────────────────────────────────────────────────────────────────────

pub struct FrameRing {
    slots: Vec<FrameSlot>,
    cursor: usize,
    timeline: Arc<GpuTimeline>,
    /// Last fence value handed out; the next submission gets `+ 1`.
    next_fence: u64,
}

impl FrameRing {
    /// Builds `ring_size` slots sized from the scene (total render items,
    /// materials, wave vertices).
    pub fn new(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        ring_size: usize,
        object_count: usize,
        material_count: usize,
        wave_vertex_count: usize,
    ) -> Self {
        assert!(ring_size >= 1);
        let slots = (0..ring_size)
            .map(|i| {
                FrameSlot::new(
                    device,
                    layouts,
                    i,
                    object_count,
                    material_count,
                    wave_vertex_count,
                )
            })
            .collect();

        Self {
            slots,
            cursor: 0,
            timeline: Arc::new(GpuTimeline::new()),
            next_fence: 0,
        }
    }

    /// Number of slots — also the initial value for dirty counters.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn timeline(&self) -> &Arc<GpuTimeline> {
        &self.timeline
    }

    /// The slot selected by the last `acquire_next`.
    #[inline]
    pub fn current(&self) -> &FrameSlot {
        &self.slots[self.cursor]
    }

    /// Advances to the next slot and blocks until the GPU has completed the
    /// work recorded there last time around. A slot that was never
    /// submitted (fence 0) or whose fence is already complete is returned
    /// without waiting.
    ///
    /// The wait pumps `device.poll` so completion callbacks can fire, and
    /// gives up after [`FENCE_TIMEOUT`] — an unrecoverable device loss.
    pub fn acquire_next(&mut self, device: &wgpu::Device) -> Result<(), FrameError> {
        self.cursor = (self.cursor + 1) % self.slots.len();
        let fence = self.slots[self.cursor].fence;

        if fence != 0 && self.timeline.completed() < fence {
            let deadline = Instant::now() + FENCE_TIMEOUT;
            loop {
                let _ = device.poll(wgpu::Maintain::Poll);
                if self.timeline.wait_for(fence, POLL_SLICE) {
                    break;
                }
                if Instant::now() >= deadline {
                    return Err(FrameError::DeviceLost(FENCE_TIMEOUT));
                }
            }
        }
        Ok(())
    }

    /// Records a submission on the current slot: bumps the monotone fence,
    /// stores it, and registers the timeline signal for when the GPU
    /// finishes the work just queued.
    pub fn mark_submitted(&mut self, queue: &wgpu::Queue) {
        self.next_fence += 1;
        let fence = self.next_fence;
        self.slots[self.cursor].fence = fence;

        let timeline = Arc::clone(&self.timeline);
        queue.on_submitted_work_done(move || timeline.signal(fence));
    }

    /// Drains every in-flight frame. Called on shutdown and before
    /// releasing GPU-visible resources — skipping it would free memory the
    /// GPU may still read.
    pub fn wait_idle(&self, device: &wgpu::Device) {
        if self.next_fence == 0 {
            return;
        }
        let _ = device.poll(wgpu::Maintain::Wait);
        if !self.timeline.wait_for(self.next_fence, FENCE_TIMEOUT) {
            log::error!("GPU failed to drain in-flight frames before shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersect::Aabb;
    use crate::scene::{ItemRegistry, RenderItemDesc, RenderLayer};
    use glam::{Mat4, Vec3};

    /// A full frame loop without a device: the ring's acquire policy
    /// (advance cursor, wait on the slot's recorded fence) run against the
    /// timeline and the dirty-tracking registry.
    ///
    /// With ring size 3, a single static item, and three cycles: no cycle
    /// may stall on a never-submitted slot, the item's constants are
    /// copied exactly once per slot, and its dirty counter ends at zero.
    #[test]
    fn three_cycle_loop_copies_once_per_slot_without_stalls() {
        let timeline = GpuTimeline::new();
        let mut fences = [0u64; 3];
        let mut cursor = 0usize;
        let mut next_fence = 0u64;

        let mut items = ItemRegistry::new(3);
        items.add(
            RenderLayer::Opaque,
            RenderItemDesc {
                world: Mat4::IDENTITY,
                tex_transform: Mat4::IDENTITY,
                geometry: 0,
                material: 0,
                index_count: 36,
                start_index: 0,
                base_vertex: 0,
                bounds: Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
                visible: true,
            },
        );

        let mut copies = 0;
        for _cycle in 0..3 {
            // acquire: advance, then gate on the slot's last fence
            cursor = (cursor + 1) % fences.len();
            let fence = fences[cursor];
            assert!(
                fence == 0 || timeline.completed() >= fence,
                "unused slot must not stall"
            );

            // update: dirty flush into "this slot"
            items.flush_object_constants(|_, _| copies += 1);

            // submit: record the fence; the mock GPU completes instantly
            next_fence += 1;
            fences[cursor] = next_fence;
            timeline.signal(next_fence);
        }

        assert_eq!(copies, 3);
        assert_eq!(items.get(0).dirty, 0);
    }
}
