/// Shared `wgpu::BindGroupLayout` objects used by every pipeline in the
/// set. Centralising them means the frame slots and all layer pipelines
/// agree on one layout per group without re-creating it.
use std::sync::Arc;

use crate::frame::constants::{MaterialConstants, ObjectConstants, PassConstants};

/// All bind-group layouts used by the scene pipelines.
///
/// - group(0) — pass constants (one static uniform buffer per frame slot)
/// - group(1) — object constants via a **dynamic** uniform buffer
/// - group(2) — material constants via a **dynamic** uniform buffer
///
/// The dynamic groups let one large buffer per slot serve every item: draw
/// calls switch a byte offset, not a bind group.
#[derive(Clone)]
pub struct PipelineLayouts {
    pub pass: Arc<wgpu::BindGroupLayout>,
    pub object: Arc<wgpu::BindGroupLayout>,
    pub material: Arc<wgpu::BindGroupLayout>,
}

impl PipelineLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_entry = |has_dynamic_offset: bool, min_size: u64| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset,
                min_binding_size: wgpu::BufferSize::new(min_size),
            },
            count: None,
        };

        let pass = Arc::new(
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Pass"),
                entries: &[uniform_entry(
                    false,
                    std::mem::size_of::<PassConstants>() as u64,
                )],
            }),
        );

        let object = Arc::new(
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Object (dynamic)"),
                entries: &[uniform_entry(
                    true,
                    std::mem::size_of::<ObjectConstants>() as u64,
                )],
            }),
        );

        let material = Arc::new(
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Material (dynamic)"),
                entries: &[uniform_entry(
                    true,
                    std::mem::size_of::<MaterialConstants>() as u64,
                )],
            }),
        );

        Self {
            pass,
            object,
            material,
        }
    }
}
