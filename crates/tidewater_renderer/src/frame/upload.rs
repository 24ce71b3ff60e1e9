//! Per-entity upload buffers with dynamic offsets.
//!
//! One `UploadBuffer<T>` holds the constants of *every* entity of one kind
//! for *one* frame slot. A single bind group references the whole buffer;
//! draw calls supply `offset(index)` as the dynamic offset, so switching
//! entities costs an offset, not a bind-group change.
//!
//! ## Alignment
//!
//! wgpu requires each dynamic-offset element to be aligned to
//! `min_uniform_buffer_offset_alignment` (256 bytes on typical desktop
//! hardware). Each element slot is therefore `align_up(size_of::<T>(),
//! alignment)` bytes, even when fewer are used.

use std::marker::PhantomData;
use std::sync::Arc;

/// A fixed-capacity GPU uniform buffer holding one `T` per element slot,
/// aligned to the device's dynamic-offset requirement.
pub struct UploadBuffer<T: bytemuck::Pod> {
    buffer: Arc<wgpu::Buffer>,
    /// Single bind group referencing the whole buffer with a dynamic offset.
    pub bind_group: Arc<wgpu::BindGroup>,
    stride: u32,
    capacity: usize,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> UploadBuffer<T> {
    /// Creates an `UploadBuffer` for exactly `capacity` elements.
    ///
    /// `layout` must be a bind-group layout with a single uniform entry at
    /// binding 0 and `has_dynamic_offset: true`.
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        capacity: usize,
    ) -> Self {
        let element_size = std::mem::size_of::<T>() as u32;
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let stride = align_up(element_size, alignment);

        let capacity = capacity.max(1);
        let buffer = Arc::new(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64 * stride as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));

        let bind_group = Arc::new(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    // the dynamic window the shader sees is one element
                    size: wgpu::BufferSize::new(element_size as u64),
                }),
            }],
        }));

        Self {
            buffer,
            bind_group,
            stride,
            capacity,
            _marker: PhantomData,
        }
    }

    /// Byte offset of element `index`, for use as a dynamic offset.
    #[inline]
    pub fn offset(&self, index: usize) -> u32 {
        (index as u32).wrapping_mul(self.stride)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Writes `data` into element `index`.
    ///
    /// `index >= capacity` is a precondition violation, not a recoverable
    /// runtime error.
    #[inline]
    pub fn write(&self, queue: &wgpu::Queue, index: usize, data: &T) {
        debug_assert!(index < self.capacity, "UploadBuffer element out of range");
        queue.write_buffer(
            &self.buffer,
            self.offset(index) as u64,
            bytemuck::bytes_of(data),
        );
    }
}

/// Rounds `value` up to the next multiple of `alignment` (a power of two).
#[inline]
pub fn align_up(value: u32, alignment: u32) -> u32 {
    (value + alignment - 1) & !(alignment - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_to_power_of_two() {
        assert_eq!(align_up(0, 256), 0);
        assert_eq!(align_up(1, 256), 256);
        assert_eq!(align_up(128, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
        assert_eq!(align_up(96, 64), 128);
    }
}
