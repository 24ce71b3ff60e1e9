//! Render items and their registry.
//!
//! A `RenderItem` is one instance-to-draw: a transform paired with a
//! submesh of a shared geometry and a shared material, both referenced by
//! arena index (never by pointer — nothing is removed mid-run, but indices
//! keep the borrow structure trivial).

use glam::Mat4;

use crate::frame::ObjectConstants;
use crate::intersect::Aabb;

// ── Layers ───────────────────────────────────────────────────────────────────

/// Pipeline-state partition for batched drawing, in draw order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderLayer {
    Opaque,
    AlphaTested,
    Sprites,
    Transparent,
    Highlight,
}

impl RenderLayer {
    pub const COUNT: usize = 5;

    /// Layers in the order they are drawn each frame (blended layers
    /// last).
    pub const DRAW_ORDER: [RenderLayer; Self::COUNT] = [
        RenderLayer::Opaque,
        RenderLayer::AlphaTested,
        RenderLayer::Sprites,
        RenderLayer::Transparent,
        RenderLayer::Highlight,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            RenderLayer::Opaque => 0,
            RenderLayer::AlphaTested => 1,
            RenderLayer::Sprites => 2,
            RenderLayer::Transparent => 3,
            RenderLayer::Highlight => 4,
        }
    }
}

// ── Item ─────────────────────────────────────────────────────────────────────

/// One drawable instance. Created during scene construction and mutated in
/// place (world matrix, visibility, draw range for the highlight item);
/// never destroyed during a run.
pub struct RenderItem {
    pub world: Mat4,
    pub tex_transform: Mat4,
    /// Frame slots still needing this item's constants (see
    /// [`ItemRegistry::flush_object_constants`]).
    pub dirty: usize,
    /// Stable element index in every frame slot's object upload buffer.
    pub object_index: usize,
    /// Arena index into the geometry store.
    pub geometry: usize,
    /// Arena index into the material registry.
    pub material: usize,
    pub topology: wgpu::PrimitiveTopology,
    pub index_count: u32,
    pub start_index: u32,
    pub base_vertex: i32,
    /// Bounding box in the geometry's local space (picking early-out).
    pub bounds: Aabb,
    pub visible: bool,
}

impl RenderItem {
    fn constants(&self) -> ObjectConstants {
        ObjectConstants::new(self.world, self.tex_transform)
    }
}

/// Everything [`ItemRegistry::add`] needs; `dirty` and `object_index` are
/// assigned by the registry.
pub struct RenderItemDesc {
    pub world: Mat4,
    pub tex_transform: Mat4,
    pub geometry: usize,
    pub material: usize,
    pub index_count: u32,
    pub start_index: u32,
    pub base_vertex: i32,
    pub bounds: Aabb,
    pub visible: bool,
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Flat arena of all render items plus the per-layer partition.
pub struct ItemRegistry {
    items: Vec<RenderItem>,
    layers: [Vec<usize>; RenderLayer::COUNT],
    ring_size: usize,
}

impl ItemRegistry {
    pub fn new(ring_size: usize) -> Self {
        Self {
            items: Vec::new(),
            layers: Default::default(),
            ring_size,
        }
    }

    /// Inserts an item into `layer`; returns its stable id (also its
    /// object-constants index).
    pub fn add(&mut self, layer: RenderLayer, desc: RenderItemDesc) -> usize {
        let id = self.items.len();
        self.items.push(RenderItem {
            world: desc.world,
            tex_transform: desc.tex_transform,
            dirty: self.ring_size,
            object_index: id,
            geometry: desc.geometry,
            material: desc.material,
            topology: wgpu::PrimitiveTopology::TriangleList,
            index_count: desc.index_count,
            start_index: desc.start_index,
            base_vertex: desc.base_vertex,
            bounds: desc.bounds,
            visible: desc.visible,
        });
        self.layers[layer.index()].push(id);
        id
    }

    #[inline]
    pub fn get(&self, id: usize) -> &RenderItem {
        &self.items[id]
    }

    /// Mutable access; the caller must [`mark_dirty`](Self::mark_dirty) if
    /// it changed anything the object constants derive from.
    #[inline]
    pub fn get_mut(&mut self, id: usize) -> &mut RenderItem {
        &mut self.items[id]
    }

    /// Resets the item's dirty counter so a change propagates to every
    /// ring slot.
    pub fn mark_dirty(&mut self, id: usize) {
        self.items[id].dirty = self.ring_size;
    }

    /// Item ids belonging to `layer`, in insertion order.
    pub fn layer(&self, layer: RenderLayer) -> &[usize] {
        &self.layers[layer.index()]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Writes the constants of every still-dirty item through `write` and
    /// decrements its counter — each logical change reaches each of the
    /// `ring_size` slot buffers exactly once, whichever slot happens to be
    /// current when the change lands.
    pub fn flush_object_constants<F: FnMut(usize, &ObjectConstants)>(&mut self, mut write: F) {
        for item in &mut self.items {
            if item.dirty > 0 {
                write(item.object_index, &item.constants());
                item.dirty -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn desc(world: Mat4) -> RenderItemDesc {
        RenderItemDesc {
            world,
            tex_transform: Mat4::IDENTITY,
            geometry: 0,
            material: 0,
            index_count: 36,
            start_index: 0,
            base_vertex: 0,
            bounds: Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
            visible: true,
        }
    }

    #[test]
    fn items_partition_into_layers() {
        let mut reg = ItemRegistry::new(3);
        let a = reg.add(RenderLayer::Opaque, desc(Mat4::IDENTITY));
        let b = reg.add(RenderLayer::Transparent, desc(Mat4::IDENTITY));
        let c = reg.add(RenderLayer::Opaque, desc(Mat4::IDENTITY));

        assert_eq!(reg.layer(RenderLayer::Opaque), &[a, c]);
        assert_eq!(reg.layer(RenderLayer::Transparent), &[b]);
        assert!(reg.layer(RenderLayer::Highlight).is_empty());
    }

    #[test]
    fn object_index_is_stable_and_unique() {
        let mut reg = ItemRegistry::new(3);
        let a = reg.add(RenderLayer::Opaque, desc(Mat4::IDENTITY));
        let b = reg.add(RenderLayer::Highlight, desc(Mat4::IDENTITY));
        assert_eq!(reg.get(a).object_index, a);
        assert_eq!(reg.get(b).object_index, b);
        assert_ne!(a, b);
    }

    /// Ring size 3, one static item, three update cycles — exactly one
    /// copy per slot, then the counter rests at zero.
    #[test]
    fn static_item_copies_once_per_slot_over_three_cycles() {
        let mut reg = ItemRegistry::new(3);
        reg.add(RenderLayer::Opaque, desc(Mat4::IDENTITY));

        let mut copies = 0;
        for _cycle in 0..3 {
            reg.flush_object_constants(|_, _| copies += 1);
        }
        assert_eq!(copies, 3);
        assert_eq!(reg.get(0).dirty, 0);

        // further cycles are free
        reg.flush_object_constants(|_, _| copies += 1);
        assert_eq!(copies, 3);
    }

    #[test]
    fn mid_ring_change_still_reaches_every_slot_once() {
        let mut reg = ItemRegistry::new(3);
        let id = reg.add(RenderLayer::Opaque, desc(Mat4::IDENTITY));

        // two slots see the initial value...
        reg.flush_object_constants(|_, _| {});
        reg.flush_object_constants(|_, _| {});

        // ...then the item moves
        let moved = Mat4::from_translation(Vec3::new(7.0, 0.0, 0.0));
        reg.get_mut(id).world = moved;
        reg.mark_dirty(id);

        let mut writes = Vec::new();
        for _ in 0..5 {
            reg.flush_object_constants(|idx, c| writes.push((idx, c.world[3][0])));
        }
        // the new value lands exactly ring_size more times
        assert_eq!(writes.len(), 3);
        assert!(writes.iter().all(|(idx, x)| *idx == id && *x == 7.0));
    }
}
