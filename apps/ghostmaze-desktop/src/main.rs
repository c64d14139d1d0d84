use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

use ghostmaze_common::lerp;
use ghostmaze_geometry::build_with_scale;
use ghostmaze_input::{LockRequest, PointerButton, PointerEvent, PointerGate};
use ghostmaze_level::{
    DemoRun, FixedStep, FrameSnapshot, LevelSet, demo_level_set, load_level_set,
};
use ghostmaze_render::{DrawLog, MazeRenderer, MeshStore, OrbitCamera, RenderConfig};
use ghostmaze_render_wgpu::{FrameStats, MeshBuffers, WgpuRenderer, WgpuUploader};

#[derive(Parser)]
#[command(name = "ghostmaze-desktop", about = "Maze renderer desktop viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Level set file (.json, .yaml); the built-in demo levels otherwise
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Render config file (.json, .yaml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_levels(path: Option<&Path>) -> Result<LevelSet> {
    match path {
        Some(path) => load_level_set(path)
            .with_context(|| format!("loading levels from {}", path.display())),
        None => Ok(demo_level_set()),
    }
}

/// Everything that is not GPU state.
struct AppState {
    run: DemoRun,
    clock: FixedStep,
    gate: PointerGate,
    levels_path: Option<PathBuf>,
    frame_time: f32,
    last_dt: f32,
    last_frame: Instant,
    fps: f32,
    stats: FrameStats,
    show_overlay: bool,
    reload_requested: bool,
}

impl AppState {
    fn new(run: DemoRun, ticks_per_second: f32, levels_path: Option<PathBuf>) -> Self {
        Self {
            run,
            clock: FixedStep::new(ticks_per_second),
            gate: PointerGate::new(),
            levels_path,
            frame_time: 0.0,
            last_dt: 0.0,
            last_frame: Instant::now(),
            fps: 0.0,
            stats: FrameStats::default(),
            show_overlay: true,
            reload_requested: false,
        }
    }

    fn update(&mut self, dt: f32) {
        for _ in 0..self.clock.advance(dt) {
            self.run.tick();
        }
        self.frame_time += dt;
        self.last_dt = dt;
        if dt > 0.0 {
            self.fps = lerp(self.fps, 1.0 / dt, 0.1);
        }
    }

    fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot {
            level: self.run.level(),
            player: self.run.player(),
            ghosts: self.run.ghosts(),
            frame_time: self.frame_time,
            time_delta: self.last_dt,
            accumulator: self.clock.accumulator(),
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> Option<LockRequest> {
        match key {
            KeyCode::Escape => return Some(LockRequest::Release),
            KeyCode::F1 => self.show_overlay = !self.show_overlay,
            KeyCode::F5 => self.reload_requested = true,
            _ => {}
        }
        None
    }

    fn draw_ui(&mut self, ctx: &EguiContext, camera: Option<&OrbitCamera>) {
        if !self.show_overlay {
            return;
        }

        egui::Window::new("ghostmaze")
            .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                let level = self.run.level();
                ui.label(format!("Level: {}", level.id));
                ui.label(format!(
                    "Tick: {}  Time: {:.1}s  FPS: {:.0}",
                    self.run.ticks(),
                    self.frame_time,
                    self.fps
                ));
                ui.label(format!(
                    "Draw calls: {}  skipped: {}",
                    self.stats.draw_calls, self.stats.skipped
                ));
                let pressed = level.switches.iter().filter(|s| s.pressed).count();
                ui.label(format!(
                    "Switches: {pressed}/{}  Ghosts alive: {}",
                    level.switches.len(),
                    self.run.ghosts().iter().filter(|g| !g.dead).count()
                ));
                ui.label(format!(
                    "Pointer: {}",
                    if self.gate.is_locked() { "locked" } else { "free" }
                ));
                if let Some(camera) = camera {
                    ui.label(format!(
                        "Camera: yaw {:.2} pitch {:.2}",
                        camera.yaw, camera.pitch
                    ));
                }
                ui.separator();
                ui.small("Click: capture pointer | Esc/RMB: release | F1: overlay | F5: reload");
            });
    }
}

struct GpuApp {
    state: AppState,
    render_config: RenderConfig,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    surface_config: Option<wgpu::SurfaceConfiguration>,
    gpu: Option<WgpuRenderer>,
    maze: Option<MazeRenderer<MeshBuffers>>,
    frame: DrawLog,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState, render_config: RenderConfig) -> Self {
        Self {
            state,
            render_config,
            window: None,
            surface: None,
            device: None,
            queue: None,
            surface_config: None,
            gpu: None,
            maze: None,
            frame: DrawLog::new(),
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("ghostmaze")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("ghostmaze_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let gpu = WgpuRenderer::new(
            &device,
            surface_format,
            surface_config.width,
            surface_config.height,
        )?;

        let output = build_with_scale(
            self.state.run.levels().iter(),
            self.render_config.world_scale,
        );
        let store = MeshStore::upload(&mut WgpuUploader::new(&device), output);
        let aspect = surface_config.width as f32 / surface_config.height as f32;
        let maze = MazeRenderer::new(self.render_config.clone(), store, aspect);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.surface_config = Some(surface_config);
        self.gpu = Some(gpu);
        self.maze = Some(maze);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    /// Ask the platform for (or out of) pointer capture and report the
    /// outcome back to the gate.
    fn apply_lock_request(&mut self, request: Option<LockRequest>) {
        let Some(window) = &self.window else {
            return;
        };
        match request {
            Some(LockRequest::Acquire) => {
                let grabbed = window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
                match grabbed {
                    Ok(()) => {
                        window.set_cursor_visible(false);
                        self.state.gate.handle(PointerEvent::Locked);
                    }
                    Err(e) => tracing::warn!("pointer capture refused: {e}"),
                }
            }
            Some(LockRequest::Release) => {
                if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                    tracing::warn!("pointer release failed: {e}");
                }
                window.set_cursor_visible(true);
                self.state.gate.handle(PointerEvent::Unlocked);
            }
            None => {}
        }
    }

    fn reload_levels(&mut self) {
        self.state.reload_requested = false;
        let Some(path) = self.state.levels_path.clone() else {
            tracing::info!("no level file given, nothing to reload");
            return;
        };
        let levels = match load_levels(Some(&path)) {
            Ok(levels) => levels,
            Err(e) => {
                tracing::error!("failed to reload levels: {e:#}");
                return;
            }
        };
        if levels.is_empty() {
            tracing::warn!("reloaded level set is empty, keeping the current one");
            return;
        }
        if let (Some(device), Some(maze)) = (&self.device, &mut self.maze) {
            let output = build_with_scale(levels.iter(), maze.config().world_scale);
            maze.replace_mesh(&mut WgpuUploader::new(device), output);
        }
        self.state.run.replace_levels(levels);
        tracing::info!(path = %path.display(), "levels reloaded");
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
        self.state.last_frame = now;
        self.state.update(dt);
        if self.state.reload_requested {
            self.reload_levels();
        }

        let Self {
            state,
            window,
            surface,
            device,
            queue,
            surface_config,
            gpu,
            maze,
            frame,
            egui_ctx,
            egui_winit,
            egui_renderer,
            ..
        } = self;
        let (
            Some(window),
            Some(surface),
            Some(device),
            Some(queue),
            Some(surface_config),
            Some(gpu),
            Some(maze),
            Some(egui_winit),
            Some(egui_renderer),
        ) = (
            window.as_ref(),
            surface.as_ref(),
            device.as_ref(),
            queue.as_ref(),
            surface_config.as_ref(),
            gpu.as_mut(),
            maze.as_mut(),
            egui_winit.as_mut(),
            egui_renderer.as_mut(),
        )
        else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, surface_config);
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

        frame.clear_calls();
        maze.render_frame(frame, &state.snapshot());
        state.stats = gpu.submit(device, queue, &view, maze.mesh().handles(), frame);

        let raw_input = egui_winit.take_egui_input(window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx, Some(maze.camera()));
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [surface_config.width, surface_config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
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

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("failed to initialize GPU: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.surface_config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    if let Some(maze) = &mut self.maze {
                        maze.set_aspect(config.width as f32 / config.height as f32);
                    }
                    if let Some(gpu) = &mut self.gpu {
                        gpu.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::Focused(false) => {
                self.apply_lock_request(Some(LockRequest::Release));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                let request = self.state.handle_key(key);
                self.apply_lock_request(request);
            }
            WindowEvent::MouseInput {
                button,
                state: ElementState::Pressed,
                ..
            } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    _ => PointerButton::Other,
                };
                let response = self.state.gate.handle(PointerEvent::Pressed(button));
                self.apply_lock_request(response.request);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
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
            let response = self.state.gate.handle(PointerEvent::Moved {
                dx: delta.0 as f32,
                dy: delta.1 as f32,
            });
            if let (Some((dx, dy)), Some(maze)) = (response.delta, &mut self.maze) {
                maze.apply_pointer_delta(dx, dy);
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

    tracing::info!("ghostmaze-desktop starting");

    let render_config = match &cli.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RenderConfig::default(),
    };
    let levels = load_levels(cli.levels.as_deref())?;
    let run = DemoRun::new(levels).ok_or_else(|| anyhow!("level set is empty"))?;
    let state = AppState::new(run, render_config.ticks_per_second, cli.levels);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state, render_config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
