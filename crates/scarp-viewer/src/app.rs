//! Viewer application — winit event loop driving the engine and camera
//!
//! Input mapping: Space toggles corner/tile picking, Up/Down edits the
//! selected corners' height, Q/E spins yaw, R/F tilts pitch, I/O steps
//! the zoom, WASD pans, the middle mouse button drags the view 1:1, the
//! wheel zooms anchored at the cursor, and Ctrl+wheel edits height.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use scarp_camera::Camera;
use scarp_core::{Color, Vec2};
use scarp_engine::{axis_gizmo, Scene};
use scarp_grid::MapSource;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::render::{GpuVertex, LinePipeline, RenderContext, VertexBuffer, ViewBinding};

/// Keyboard pan distance per frame, in view units
const PAN_STEP: f32 = 5.0;
const YAW_STEP: f32 = 22.5;
const PITCH_STEP: f32 = 5.0;
const HEIGHT_STEP: f32 = 1.0;
const GIZMO_SIZE: f32 = 40.0;

const SKY_TOP: Color = Color::new(196.0 / 255.0, 218.0 / 255.0, 242.0 / 255.0, 1.0);
const SKY_BOTTOM: Color = Color::new(1.0, 179.0 / 255.0, 193.0 / 255.0, 1.0);

/// Viewer parameters, normally filled in by the CLI
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// TOML map file; takes precedence over `image_path`
    pub map_path: Option<PathBuf>,
    /// Grayscale PNG heightmap
    pub image_path: Option<PathBuf>,
    /// Height that a white pixel maps to when loading from PNG
    pub image_max_height: f32,
    pub tile_size_x: f32,
    pub tile_size_y: f32,
    pub height_scale: f32,
    pub angle_x: f32,
    pub angle_y: f32,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            map_path: None,
            image_path: None,
            image_max_height: 9.0,
            tile_size_x: 64.0,
            tile_size_y: 64.0,
            height_scale: 6.0,
            angle_x: 45.0,
            // 35.264 would be the true isometric angle
            angle_y: 35.0,
            window_width: 1200,
            window_height: 800,
        }
    }
}

/// Run the viewer until the window closes
pub fn run(config: ViewerConfig) -> Result<()> {
    let source = load_source(&config)?;
    println!(
        "Loaded map: {}x{} corners",
        source.width(),
        source.height()
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(config, &source);
    event_loop.run_app(&mut app)?;
    Ok(())
}

fn load_source(config: &ViewerConfig) -> Result<MapSource> {
    if let Some(path) = &config.map_path {
        MapSource::from_toml_file(path)
            .with_context(|| format!("failed to load map '{}'", path.display()))
    } else if let Some(path) = &config.image_path {
        MapSource::from_png(path, config.image_max_height)
            .with_context(|| format!("failed to load heightmap '{}'", path.display()))
    } else {
        Ok(MapSource::demo())
    }
}

struct Gfx {
    context: RenderContext,
    pipeline: LinePipeline,
    world_view: ViewBinding,
    screen_view: ViewBinding,
    grid_buffer: VertexBuffer,
    sky_buffer: VertexBuffer,
    gizmo_buffer: VertexBuffer,
}

struct ViewerApp {
    config: ViewerConfig,
    scene: Scene,
    camera: Camera,
    window: Option<Arc<Window>>,
    gfx: Option<Gfx>,
    /// Cursor position in physical pixels, when inside the window
    cursor: Option<Vec2>,
    keys_down: HashSet<KeyCode>,
    modifiers: ModifiersState,
    last_frame: Instant,
}

impl ViewerApp {
    fn new(config: ViewerConfig, source: &MapSource) -> Self {
        let scene = Scene::new(
            source,
            config.tile_size_x,
            config.tile_size_y,
            config.height_scale,
            config.angle_x,
            config.angle_y,
        );
        let camera = Camera::new(Vec2::new(
            config.window_width as f32,
            config.window_height as f32,
        ));

        Self {
            config,
            scene,
            camera,
            window: None,
            gfx: None,
            cursor: None,
            keys_down: HashSet::new(),
            modifiers: ModifiersState::default(),
            last_frame: Instant::now(),
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("Scarp Editor")
            .with_inner_size(PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create viewer window")?,
        );
        self.window = Some(window.clone());

        let context = pollster::block_on(RenderContext::new(window))
            .context("Failed to initialize render context")?;

        let pipeline = LinePipeline::new(&context.device, context.config.format);
        let world_view = pipeline.create_view_binding(&context.device);
        let screen_view = pipeline.create_view_binding(&context.device);
        let grid_buffer = VertexBuffer::new(&context.device, 1024);
        let mut sky_buffer = VertexBuffer::new(&context.device, 6);
        let gizmo_buffer = VertexBuffer::new(&context.device, 6);

        let size = Vec2::new(context.size.width as f32, context.size.height as f32);
        self.camera.set_viewport(size);
        sky_buffer.upload(&context.device, &context.queue, &sky_vertices(size));

        self.last_frame = Instant::now();
        self.gfx = Some(Gfx {
            context,
            pipeline,
            world_view,
            screen_view,
            grid_buffer,
            sky_buffer,
            gizmo_buffer,
        });

        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Space => {
                self.scene.toggle_pick_mode();
                println!("Selection mode: {}", self.scene.pick_mode().label());
            }
            KeyCode::ArrowUp => self.scene.raise_selection(HEIGHT_STEP),
            KeyCode::ArrowDown => self.scene.raise_selection(-HEIGHT_STEP),
            KeyCode::KeyQ => self.scene.rotate(YAW_STEP),
            KeyCode::KeyE => self.scene.rotate(-YAW_STEP),
            KeyCode::KeyR => self.scene.pitch(PITCH_STEP),
            KeyCode::KeyF => self.scene.pitch(-PITCH_STEP),
            KeyCode::KeyI => self.camera.zoom_steps(-1.0),
            KeyCode::KeyO => self.camera.zoom_steps(1.0),
            _ => {}
        }
    }

    fn apply_held_pan(&mut self) {
        let mut direction = Vec2::ZERO;
        if self.keys_down.contains(&KeyCode::KeyW) {
            direction.y -= 1.0;
        }
        if self.keys_down.contains(&KeyCode::KeyS) {
            direction.y += 1.0;
        }
        if self.keys_down.contains(&KeyCode::KeyA) {
            direction.x -= 1.0;
        }
        if self.keys_down.contains(&KeyCode::KeyD) {
            direction.x += 1.0;
        }
        if direction != Vec2::ZERO {
            // normalized so diagonals move at the same speed
            self.camera.pan(direction.normalized() * PAN_STEP);
        }
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.25);
        self.last_frame = now;

        self.apply_held_pan();
        self.camera.update(dt);

        let cursor_world = self.cursor.map(|px| self.camera.pixel_to_world(px));
        self.scene.update(dt, cursor_world);

        self.render();
    }

    fn render(&mut self) {
        let Some(gfx) = &mut self.gfx else {
            return;
        };

        // upload grid lines only when the engine rebuilt them
        if self.scene.needs_rebuild() || gfx.grid_buffer.is_empty() {
            let vertices: Vec<GpuVertex> = self
                .scene
                .line_vertices()
                .iter()
                .map(GpuVertex::from_line_vertex)
                .collect();
            gfx.grid_buffer
                .upload(&gfx.context.device, &gfx.context.queue, &vertices);
        }

        let size = gfx.context.size;
        let viewport = Vec2::new(size.width as f32, size.height as f32);

        let gizmo_origin = Vec2::new(viewport.x - 80.0, 100.0);
        let gizmo: Vec<GpuVertex> = axis_gizmo(
            self.scene.projection(),
            self.scene.current_yaw(),
            gizmo_origin,
            GIZMO_SIZE,
        )
        .iter()
        .map(GpuVertex::from_line_vertex)
        .collect();
        gfx.gizmo_buffer
            .upload(&gfx.context.device, &gfx.context.queue, &gizmo);

        gfx.world_view.write(
            &gfx.context.queue,
            self.camera.center(),
            self.camera.view_size() * 0.5,
        );
        gfx.screen_view
            .write(&gfx.context.queue, viewport * 0.5, viewport * 0.5);

        let output = match gfx.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = gfx.context.size;
                gfx.context.resize(size);
                return;
            }
            Err(e) => {
                eprintln!("Surface error: {e:?}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gfx
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scarp Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scarp Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // sky gradient behind everything, in window pixel space
            pass.set_pipeline(&gfx.pipeline.triangles);
            pass.set_bind_group(0, gfx.screen_view.bind_group(), &[]);
            pass.set_vertex_buffer(0, gfx.sky_buffer.slice());
            pass.draw(0..gfx.sky_buffer.len(), 0..1);

            // grid edges in the camera's view space
            pass.set_pipeline(&gfx.pipeline.lines);
            pass.set_bind_group(0, gfx.world_view.bind_group(), &[]);
            pass.set_vertex_buffer(0, gfx.grid_buffer.slice());
            pass.draw(0..gfx.grid_buffer.len(), 0..1);

            // axis gizmo on top, back in pixel space
            if !gfx.gizmo_buffer.is_empty() {
                pass.set_bind_group(0, gfx.screen_view.bind_group(), &[]);
                pass.set_vertex_buffer(0, gfx.gizmo_buffer.slice());
                pass.draw(0..gfx.gizmo_buffer.len(), 0..1);
            }
        }

        gfx.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                eprintln!("Failed to initialize viewer: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(gfx) = &mut self.gfx {
                    gfx.context.resize(new_size);
                    let size = Vec2::new(
                        new_size.width.max(1) as f32,
                        new_size.height.max(1) as f32,
                    );
                    self.camera.set_viewport(size);
                    gfx.sky_buffer.upload(
                        &gfx.context.device,
                        &gfx.context.queue,
                        &sky_vertices(size),
                    );
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            if code == KeyCode::Escape {
                                event_loop.exit();
                                return;
                            }
                            self.keys_down.insert(code);
                            if !event.repeat {
                                self.handle_key(code);
                            }
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&code);
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let cursor = Vec2::new(position.x as f32, position.y as f32);
                self.cursor = Some(cursor);
                if self.camera.is_dragging() {
                    self.camera.drag_to(cursor);
                }
            }

            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Middle,
                ..
            } => match state {
                ElementState::Pressed => {
                    if let Some(cursor) = self.cursor {
                        self.camera.begin_drag(cursor);
                    }
                }
                ElementState::Released => {
                    self.camera.end_drag();
                }
            },

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / 40.0) as f32,
                };
                if scroll != 0.0 {
                    if self.modifiers.control_key() {
                        self.scene.raise_selection(HEIGHT_STEP * scroll.signum());
                    } else if let Some(cursor) = self.cursor {
                        // wheel up shrinks the view: zoom in at the cursor
                        self.camera.zoom_at(-scroll, cursor);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.frame();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn sky_vertices(size: Vec2) -> [GpuVertex; 6] {
    let top = |x: f32| GpuVertex {
        position: [x, 0.0],
        color: SKY_TOP.to_array(),
    };
    let bottom = |x: f32| GpuVertex {
        position: [x, size.y],
        color: SKY_BOTTOM.to_array(),
    };
    [
        top(0.0),
        top(size.x),
        bottom(size.x),
        bottom(size.x),
        bottom(0.0),
        top(0.0),
    ]
}
