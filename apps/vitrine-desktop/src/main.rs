use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use vitrine_camera::{
    OrbitCamera, OrbitController, PANEL_STEP, PANEL_XY_RANGE, PANEL_Z_RANGE, snap_to_step,
};
use vitrine_frame::{Clock, FrameDriver, Viewport};
use vitrine_render_wgpu::SceneRenderer;
use vitrine_scene::Scene;

#[derive(Parser)]
#[command(name = "vitrine-desktop", about = "Decorative 3-D showcase scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Application state: the scene, the camera and its controller, and the
/// frame lifecycle. One explicit context instead of free-standing globals.
struct AppState {
    scene: Scene,
    camera: OrbitCamera,
    controls: OrbitController,
    viewport: Viewport,
    driver: FrameDriver,
    clock: Clock,
    show_panel: bool,
}

impl AppState {
    fn new() -> Self {
        Self {
            scene: Scene::assemble(),
            camera: OrbitCamera::default(),
            controls: OrbitController::new(),
            viewport: Viewport::new(1280, 720, 1.0),
            driver: FrameDriver::new(),
            clock: Clock::start(),
            show_panel: true,
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        egui::Window::new("Camera")
            .default_width(240.0)
            .show(ctx, |ui| {
                let mut pos = self.camera.position;
                let rx = ui.add(
                    egui::Slider::new(&mut pos.x, PANEL_XY_RANGE)
                        .step_by(PANEL_STEP as f64)
                        .text("x"),
                );
                let ry = ui.add(
                    egui::Slider::new(&mut pos.y, PANEL_XY_RANGE)
                        .step_by(PANEL_STEP as f64)
                        .text("y"),
                );
                let rz = ui.add(
                    egui::Slider::new(&mut pos.z, PANEL_Z_RANGE)
                        .step_by(PANEL_STEP as f64)
                        .text("z"),
                );

                // Each slider writes only its own component; orbit drags and
                // slider edits share the position, last write wins.
                if rx.changed() {
                    self.camera.position.x = snap_to_step(pos.x, PANEL_XY_RANGE, PANEL_STEP);
                }
                if ry.changed() {
                    self.camera.position.y = snap_to_step(pos.y, PANEL_XY_RANGE, PANEL_STEP);
                }
                if rz.changed() {
                    self.camera.position.z = snap_to_step(pos.z, PANEL_Z_RANGE, PANEL_STEP);
                }

                ui.separator();
                ui.small("Drag: orbit | Sliders snap to 5");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<SceneRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new() -> Self {
        Self {
            state: AppState::new(),
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    /// Resize order: stored dimensions, then camera aspect, then
    /// the render surface. The projection must be current before the next
    /// render or geometry stretches for one frame.
    fn apply_resize(&mut self, new_size: PhysicalSize<u32>) {
        let (Some(window), Some(surface), Some(device), Some(config)) = (
            &self.window,
            &self.surface,
            &self.device,
            &mut self.config,
        ) else {
            return;
        };

        let scale = window.scale_factor();
        let logical = new_size.to_logical::<u32>(scale);
        let aspect = self
            .state
            .viewport
            .resize(logical.width, logical.height, scale);
        self.state.camera.aspect = aspect;

        let (w, h) = self.state.viewport.surface_size();
        config.width = w;
        config.height = h;
        surface.configure(device, config);
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(device, w, h);
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Vitrine")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("vitrine_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let scale = window.scale_factor();
        let logical = window.inner_size().to_logical::<u32>(scale);
        self.state.camera.aspect =
            self.state
                .viewport
                .resize(logical.width, logical.height, scale);
        let (width, height) = self.state.viewport.surface_size();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = SceneRenderer::new(
            &device,
            &queue,
            surface_format,
            &self.state.scene,
            width,
            height,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        self.state.driver.start();

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(self.window.as_ref().unwrap(), &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.state.driver.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.apply_resize(new_size);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.apply_resize(size);
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                if btn_state == ElementState::Pressed {
                    self.state.controls.begin_drag();
                } else {
                    self.state.controls.end_drag();
                }
            }
            WindowEvent::RedrawRequested => {
                let elapsed = self.state.clock.elapsed_secs();
                let should_render = self.state.driver.tick(
                    &mut self.state.scene,
                    &mut self.state.controls,
                    &mut self.state.camera,
                    elapsed,
                );
                if !should_render {
                    return;
                }

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                if let Some(renderer) = &self.renderer {
                    renderer.render(device, queue, &view, &self.state.scene, &self.state.camera);
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut encoder,
                        &paint_jobs,
                        &screen_descriptor,
                    );
                    {
                        let mut pass = encoder
                            .begin_render_pass(&wgpu::RenderPassDescriptor {
                                label: Some("egui_pass"),
                                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                    view: &view,
                                    resolve_target: None,
                                    ops: wgpu::Operations {
                                        load: wgpu::LoadOp::Load,
                                        store: wgpu::StoreOp::Store,
                                    },
                                })],
                                depth_stencil_attachment: None,
                                ..Default::default()
                            })
                            .forget_lifetime();
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.controls.is_dragging() {
                self.state.controls.drag(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("vitrine-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
