//! The winit event loop: feeds input, drives the per-frame update/render
//! pair, and owns window lifecycle (resize, close, surface loss).

use std::sync::Arc;

use tidewater_core::{InputState, KeyCode, MouseButton, TimeClock};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::builder::AppConfig;
use crate::graphics::GraphicsState;
use crate::scene;

struct Runner {
    config: AppConfig,
    window: Option<Arc<Window>>,
    graphics: Option<GraphicsState>,
    input: InputState,
    clock: TimeClock,
}

impl Runner {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            window: None,
            graphics: None,
            input: InputState::new(),
            clock: TimeClock::new(),
        }
    }
}

impl ApplicationHandler for Runner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(w) => Arc::new(w),
            Err(err) => {
                log::error!("window creation failed: {err}");
                event_loop.exit();
                return;
            }
        };

        let mut gfx = match pollster::block_on(GraphicsState::new(
            window.clone(),
            self.config.width,
            self.config.height,
            self.config.vsync,
        )) {
            Ok(gfx) => gfx,
            Err(err) => {
                log::error!("graphics initialization failed: {err:#}");
                event_loop.exit();
                return;
            }
        };

        if let Err(err) = scene::build(&mut gfx.renderer, self.config.model_path.as_deref()) {
            log::error!("scene construction failed: {err:#}");
            event_loop.exit();
            return;
        }
        gfx.renderer.build_frame_resources();

        self.window = Some(window);
        self.graphics = Some(gfx);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(gfx) = &mut self.graphics {
                    gfx.resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(code) = event.physical_key {
                    self.input.update_key(code, event.state.is_pressed());
                    if code == KeyCode::Escape {
                        event_loop.exit();
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.input.set_mouse_position(position.x, position.y);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.input
                    .update_mouse_button(button, state == ElementState::Pressed);

                // right-click: pick the object under the cursor
                if button == MouseButton::Right && state == ElementState::Pressed {
                    if let Some(gfx) = &mut self.graphics {
                        let (x, y) = self.input.mouse_position();
                        gfx.renderer.pick(x as f32, y as f32);
                    }
                }
                // dragging with the left button rotates the camera; reset
                // the delta so the drag starts clean
                if button == MouseButton::Left && state == ElementState::Pressed {
                    self.input.consume_mouse_delta();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gfx), Some(window)) = (&mut self.graphics, &self.window) else {
            return;
        };

        let time = self.clock.tick();
        let dt = time.delta;

        // ── camera input ─────────────────────────────────────────────────
        let camera = &mut gfx.renderer.camera;
        let mut dir = camera.controller.direction(&self.input);
        let speed = camera.controller.speed;
        let sensitivity = camera.controller.mouse_sensitivity;

        // forward motion is gated by the last pick's obstacle distance
        if dir.z > 0.0 && gfx.renderer.movement_blocked() {
            dir.z = 0.0;
        }
        let camera = &mut gfx.renderer.camera;
        camera.walk(dir.z * speed * dt);
        camera.strafe(dir.x * speed * dt);

        let (dx, dy) = self.input.consume_mouse_delta();
        if self.input.is_button_down(MouseButton::Left) {
            camera.pitch(-dy * sensitivity);
            camera.rotate_y(-dx * sensitivity);
        }

        gfx.renderer
            .set_wireframe(self.input.is_key_pressed(KeyCode::Digit1));

        // ── update ───────────────────────────────────────────────────────
        if let Err(err) = gfx.renderer.update(time) {
            log::error!("frame update failed: {err}");
            event_loop.exit();
            return;
        }

        // ── render + present ─────────────────────────────────────────────
        let frame = match gfx.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gfx.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => return,
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory");
                event_loop.exit();
                return;
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        gfx.renderer.render(&view);
        frame.present();

        self.input.end_frame();
        window.request_redraw();
    }
}

pub(crate) fn run_internal(config: AppConfig) -> anyhow::Result<()> {
    let mut runner = Runner::new(config);
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut runner)?;
    Ok(())
}
