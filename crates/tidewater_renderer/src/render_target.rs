//! Frame attachments owned by the renderer: the optional MSAA color
//! texture and the depth buffer.
//!
//! The presentable surface texture always stays single-sampled; with
//! `sample_count > 1` the scene renders into the MSAA texture and resolves
//! into the surface view. The depth buffer's sample count must match the
//! color attachment or validation rejects the pass.

pub struct RenderTarget {
    pub msaa_texture: Option<wgpu::Texture>,
    pub msaa_view: Option<wgpu::TextureView>,

    pub depth_texture: wgpu::Texture,
    pub depth_view: wgpu::TextureView,

    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    sample_count: u32,
}

impl RenderTarget {
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let (msaa_texture, msaa_view) = Self::create_msaa(device, width, height, format, sample_count);
        let (depth_texture, depth_view) = Self::create_depth(device, width, height, sample_count);

        Self {
            msaa_texture,
            msaa_view,
            depth_texture,
            depth_view,
            width,
            height,
            format,
            sample_count,
        }
    }

    #[inline]
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Recreates the attachments when the window changes size.
    pub fn resize(&mut self, device: &wgpu::Device, new_width: u32, new_height: u32) {
        if new_width == self.width && new_height == self.height {
            return;
        }
        self.width = new_width;
        self.height = new_height;

        let (msaa_texture, msaa_view) =
            Self::create_msaa(device, new_width, new_height, self.format, self.sample_count);
        self.msaa_texture = msaa_texture;
        self.msaa_view = msaa_view;

        let (depth_texture, depth_view) =
            Self::create_depth(device, new_width, new_height, self.sample_count);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    fn create_msaa(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> (Option<wgpu::Texture>, Option<wgpu::TextureView>) {
        if sample_count <= 1 {
            return (None, None);
        }
        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("RenderTarget MSAA Color"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
        (Some(tex), Some(view))
    }

    fn create_depth(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("RenderTarget Depth"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
        (tex, view)
    }
}
