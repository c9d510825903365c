use std::sync::Arc;

use cgmath::Point3;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowAttributes, WindowId},
};

use crate::{
    config::AppConfig,
    error::{GlintError, Result},
    gfx::{
        camera::{Camera, CameraManager, CursorRequest},
        rendering::render_engine::RenderEngine,
        scene::Scene,
    },
    performance::{FrameClock, FrameStats},
    ui::{controls_panel, Controls, UiManager},
};

/// Everything the frame loop reads and mutates besides the GPU objects.
pub struct AppContext {
    pub scene: Scene,
    pub clock: FrameClock,
    pub stats: FrameStats,
    pub controls: Controls,
    pub controls_open: bool,
}

impl AppContext {
    pub fn new(config: &AppConfig) -> Self {
        let camera = Camera::new(config.camera.to_options());
        let controller = config
            .controls
            .to_controller(Point3::from(config.scene.look_at_target));
        let projection = config
            .projection
            .to_projection(config.window.width, config.window.height);

        Self {
            scene: Scene::new(CameraManager::new(camera, controller, projection)),
            clock: FrameClock::new(),
            stats: FrameStats::default(),
            controls: Controls::default(),
            controls_open: true,
        }
    }

    /// Advances time, applies held input and animates the scene.
    pub fn update(&mut self) {
        let frame_time = self.clock.tick();
        self.stats.record(frame_time);

        self.scene
            .camera_manager
            .update(self.clock.delta_seconds());
        self.scene
            .update(self.clock.elapsed_seconds(), &self.controls);
    }
}

pub struct GlintApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    context: AppContext,
    error: Option<GlintError>,
}

impl GlintApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;
        let context = AppContext::new(&config);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                context,
                error: None,
            },
        })
    }

    /// Runs the event loop until the window closes. Start-up failures that
    /// happen inside the loop are returned once it exits.
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_graphics(&mut self, window: Arc<Window>) -> Result<()> {
        let PhysicalSize { width, height } = window.inner_size();

        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.shader_dir.as_deref(),
        ))?;

        let scene = &mut self.context.scene;
        scene.camera_manager.resize(width, height);
        scene.init_gpu_resources(&renderer.scene_gpu());
        for path in &self.config.scene.models {
            if let Err(err) = scene.add_model(&renderer.scene_gpu(), path) {
                warn!("Skipping model: {}", err);
            }
        }

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );
        ui_manager.update_display_size(width, height);

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    fn apply_cursor_request(&mut self, request: CursorRequest) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        match request {
            CursorRequest::Capture => {
                let grabbed = window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
                match grabbed {
                    Ok(()) => window.set_cursor_visible(false),
                    Err(err) => {
                        warn!("Could not grab the cursor: {}", err);
                        self.context.scene.camera_manager.controller.release_cursor();
                    }
                }
            }
            CursorRequest::Release => {
                if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
                    warn!("Could not release the cursor: {}", err);
                }
                window.set_cursor_visible(true);
            }
        }
    }

    fn redraw(&mut self) {
        let (Some(render_engine), Some(window)) = (self.render_engine.as_mut(), self.window.as_ref())
        else {
            return;
        };

        let context = &mut self.context;
        context.update();
        context.scene.sync_gpu(render_engine.queue());
        render_engine.update(
            context.scene.camera_manager.uniform,
            context.scene.lights.to_uniform(),
        );

        let AppContext {
            scene,
            stats,
            controls,
            controls_open,
            ..
        } = context;

        match self.ui_manager.as_mut() {
            Some(ui_manager) => render_engine.render_frame(
                scene,
                Some(
                    |device: &wgpu::Device,
                     queue: &wgpu::Queue,
                     encoder: &mut wgpu::CommandEncoder,
                     view: &wgpu::TextureView| {
                        ui_manager.draw(device, queue, encoder, window, view, |ui| {
                            controls_panel(ui, controls, controls_open, stats);
                        });
                    },
                ),
            ),
            None => render_engine.render_frame_simple(scene),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("Failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };

        if let Err(err) = self.init_graphics(window) {
            error!("Failed to initialise graphics: {}", err);
            self.error = Some(err);
            event_loop.exit();
            return;
        }
        info!("Ctrl + left click to look around, Escape to release the mouse");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let camera_manager = &mut self.context.scene.camera_manager;
        let cursor_captured = camera_manager.controller.is_cursor_captured();

        // While the camera owns the mouse the UI never sees input.
        let ui_captured = !cursor_captured
            && self
                .ui_manager
                .as_mut()
                .is_some_and(|ui| ui.handle_window_event(&window, window_id, &event));

        if !ui_captured {
            if let Some(request) = camera_manager.process_window_event(&event) {
                self.apply_cursor_request(request);
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } if !cursor_captured && !ui_captured => {
                event_loop.exit();
            }
            WindowEvent::Focused(false) if cursor_captured => {
                self.context.scene.camera_manager.controller.release_cursor();
                self.apply_cursor_request(CursorRequest::Release);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.context.scene.camera_manager.resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.context
                .scene
                .camera_manager
                .process_mouse_motion(delta);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn context_follows_config() {
        let mut config = AppConfig::default();
        config.camera.position = [1.0, 2.0, 3.0];
        config.controls.movement_speed = 9.0;
        config.scene.look_at_target = [0.0, 1.0, 0.0];
        config.scene.models = vec![PathBuf::from("ignored.obj")];

        let context = AppContext::new(&config);
        let camera_manager = &context.scene.camera_manager;

        assert_eq!(camera_manager.camera.position(), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(camera_manager.controller.movement_speed, 9.0);
        assert_eq!(camera_manager.controller.look_at_target, Point3::new(0.0, 1.0, 0.0));
        assert!(context.controls_open);
        assert!(context.scene.models().is_empty());
    }

    #[test]
    fn update_records_a_frame_and_animates() {
        let mut context = AppContext::new(&AppConfig::default());
        context.update();
        context.update();

        assert_eq!(context.stats.len(), 2);
        assert_eq!(context.scene.lights.points.len(), 1);
    }
}
