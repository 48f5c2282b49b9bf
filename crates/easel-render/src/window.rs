//! Window management with winit for interactive scenes.

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::context::Context;
use crate::frame::{DEPTH_FORMAT, Frame};
use crate::scene::{Scene, SceneBuilder, SceneKey};

/// Configuration for the scene window.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Easel".to_string(),
            width: 800,
            height: 800,
        }
    }
}

/// Application state for the scene window.
struct SceneApp<'a> {
    config: WindowConfig,
    builder: Option<SceneBuilder>,
    scene: Option<Box<dyn Scene>>,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'a>>,
    surface_config: Option<wgpu::SurfaceConfiguration>,
    ctx: Option<Context>,
    depth_view: Option<wgpu::TextureView>,
    last_cursor: Option<PhysicalPosition<f64>>,
    start_time: Instant,
    instance: wgpu::Instance,
}

impl<'a> SceneApp<'a> {
    fn new(config: WindowConfig, builder: SceneBuilder) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        Self {
            config,
            builder: Some(builder),
            scene: None,
            window: None,
            surface: None,
            surface_config: None,
            ctx: None,
            depth_view: None,
            last_cursor: None,
            start_time: Instant::now(),
            instance,
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        let (Some(config), Some(surface), Some(ctx)) =
            (&mut self.surface_config, &self.surface, &self.ctx)
        else {
            return;
        };
        config.width = new_size.width;
        config.height = new_size.height;
        surface.configure(ctx.device(), config);
        self.depth_view = Some(create_depth_view(ctx, new_size.width, new_size.height));
    }

    fn render(&mut self) {
        let (Some(surface), Some(config), Some(ctx), Some(depth_view), Some(scene)) = (
            &self.surface,
            &self.surface_config,
            &mut self.ctx,
            &self.depth_view,
            &mut self.scene,
        ) else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(ctx.device(), config);
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

        let time = self.start_time.elapsed().as_secs_f32();
        let mut frame = Frame::begin(
            ctx,
            &view,
            Some(depth_view),
            (config.width, config.height),
            scene.clear(),
        );
        if let Err(e) = scene.frame(ctx, &mut frame, time) {
            eprintln!("Scene error: {e:#}");
        }
        drop(frame);

        output.present();
    }

    fn handle_click(&mut self) {
        let (Some(pos), Some(config), Some(scene)) =
            (self.last_cursor, &self.surface_config, &mut self.scene)
        else {
            return;
        };
        // Pixel position to clip space, y flipped so up is positive.
        let x = (pos.x / f64::from(config.width) * 2.0 - 1.0) as f32;
        let y = -(pos.y / f64::from(config.height) * 2.0 - 1.0) as f32;
        scene.on_click(x, y);
    }
}

impl ApplicationHandler for SceneApp<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                eprintln!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let surface = match self.instance.create_surface(window.clone()) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to create surface: {e}");
                event_loop.exit();
                return;
            }
        };

        let mut ctx = match pollster::block_on(Context::for_surface(&self.instance, &surface)) {
            Ok(ctx) => ctx,
            Err(e) => {
                eprintln!("Failed to initialize GPU: {e:#}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let surface_config = ctx.surface_config(size.width, size.height);
        surface.configure(ctx.device(), &surface_config);
        let depth_view = create_depth_view(&ctx, size.width, size.height);

        let scene = match self.builder.take() {
            Some(builder) => match builder(&mut ctx) {
                Ok(scene) => scene,
                Err(e) => {
                    eprintln!("Failed to build scene: {e:#}");
                    event_loop.exit();
                    return;
                }
            },
            None => return,
        };

        self.window = Some(window);
        self.surface = Some(surface);
        self.surface_config = Some(surface_config);
        self.ctx = Some(ctx);
        self.depth_view = Some(depth_view);
        self.scene = Some(scene);
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
            WindowEvent::Resized(new_size) => {
                self.resize(new_size);
            }
            WindowEvent::RedrawRequested => {
                self.render();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.last_cursor = Some(position);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if state == ElementState::Pressed && button == MouseButton::Left {
                    self.handle_click();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let Some(scene) = &mut self.scene else {
                    return;
                };
                if event.state == ElementState::Pressed {
                    match event.logical_key {
                        Key::Named(NamedKey::Escape) => {
                            event_loop.exit();
                        }
                        Key::Named(NamedKey::ArrowUp) => scene.on_key(SceneKey::ArrowUp),
                        Key::Named(NamedKey::ArrowDown) => scene.on_key(SceneKey::ArrowDown),
                        Key::Named(NamedKey::ArrowLeft) => scene.on_key(SceneKey::ArrowLeft),
                        Key::Named(NamedKey::ArrowRight) => scene.on_key(SceneKey::ArrowRight),
                        Key::Character(ref c) => {
                            if let Some(ch) = c.chars().next() {
                                scene.on_key(SceneKey::Character(ch.to_ascii_lowercase()));
                            }
                        }
                        _ => {}
                    }
                }
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

fn create_depth_view(ctx: &Context, width: u32, height: u32) -> wgpu::TextureView {
    ctx.device()
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("Window Depth"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

/// Open a window and run the built scene in it until closed.
pub fn run_scene(config: WindowConfig, builder: SceneBuilder) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = SceneApp::new(config, builder);
    event_loop.run_app(&mut app)?;

    Ok(())
}
