use std::sync::Arc;

use tidewater_renderer::{RenderContext, Renderer};
use winit::window::Window;

/// Surface + renderer pair; owns the swapchain configuration.
pub struct GraphicsState {
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub renderer: Renderer,
}

impl GraphicsState {
    pub async fn new(
        window: Arc<Window>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let context = RenderContext::new_with_instance(instance, Some(&surface)).await?;

        let caps = surface.get_capabilities(&context.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);
        let present_mode = if vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &config);

        let renderer = Renderer::new(context, config.width, config.height, config.format);

        Ok(Self {
            surface,
            config,
            renderer,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        // the surface textures are about to be replaced; in-flight frames
        // may still reference them
        self.renderer.wait_idle();

        self.config.width = width;
        self.config.height = height;
        self.surface
            .configure(&self.renderer.context.device, &self.config);
        self.renderer.resize(width, height);
    }

    /// Re-applies the current configuration after a lost/outdated surface.
    pub fn reconfigure(&mut self) {
        self.surface
            .configure(&self.renderer.context.device, &self.config);
    }
}
