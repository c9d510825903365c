//! ImGui integration
//!
//! Handles ImGui integration with wgpu and winit: frame preparation, input
//! forwarding and the overlay render pass drawn on top of the 3D scene.

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use log::warn;
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{ElementState, Event, WindowEvent},
    window::{Window, WindowId},
};

/// ImGui context, platform glue and wgpu renderer.
pub struct UiManager {
    pub context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Sets up ImGui with locked DPI and the default font.
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating renderer resources
    /// * `queue` - WGPU queue for renderer operations
    /// * `output_color_format` - Target texture format for rendering
    /// * `window` - Window for platform integration
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        let font_size = 18.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Forwards a window event to ImGui and returns whether the UI keeps it
    /// from the camera controls. See [`ui_captures`].
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        window_id: WindowId,
        event: &WindowEvent,
    ) -> bool {
        match event {
            WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::KeyboardInput { .. }
            | WindowEvent::ModifiersChanged(_)
            | WindowEvent::Focused(_) => {
                let winit_event: Event<()> = Event::WindowEvent {
                    window_id,
                    event: event.clone(),
                };
                self.platform
                    .handle_event(self.context.io_mut(), window, &winit_event);
                let io = self.context.io();
                ui_captures(event, io.want_capture_mouse, io.want_capture_keyboard)
            }
            _ => false,
        }
    }

    /// Builds one UI frame with `run_ui`.
    pub fn update_logic<F>(&mut self, window: &Window, run_ui: F)
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(err) = self.platform.prepare_frame(self.context.io_mut(), window) {
            warn!("Failed to prepare UI frame: {}", err);
        }

        let ui = self.context.frame();
        run_ui(ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }
    }

    /// Renders the frame built by the last `update_logic()` on top of `color_attachment`.
    pub fn render_display_only(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        color_attachment: &TextureView,
    ) {
        let draw_data = self.context.render();

        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("imgui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(err) = self
            .renderer
            .render(draw_data, queue, device, &mut render_pass)
        {
            warn!("Failed to render UI: {}", err);
        }
    }

    /// `update_logic()` followed by `render_display_only()`.
    pub fn draw<F>(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        window: &Window,
        color_attachment: &TextureView,
        run_ui: F,
    ) where
        F: FnOnce(&imgui::Ui),
    {
        self.update_logic(window, run_ui);
        self.render_display_only(device, queue, encoder, color_attachment);
    }
}

/// Whether ImGui keeps `event` for itself given what it currently wants.
///
/// Key presses are held back only while ImGui wants the keyboard, mouse
/// events only while it wants the mouse. Releases, modifier changes and
/// focus changes always reach the camera controls so no key stays held.
pub fn ui_captures(event: &WindowEvent, want_mouse: bool, want_keyboard: bool) -> bool {
    match event {
        WindowEvent::KeyboardInput { event, .. } => key_captured(event.state, want_keyboard),
        WindowEvent::MouseInput { state, .. } => *state == ElementState::Pressed && want_mouse,
        WindowEvent::CursorMoved { .. } | WindowEvent::MouseWheel { .. } => want_mouse,
        _ => false,
    }
}

fn key_captured(state: ElementState, want_keyboard: bool) -> bool {
    state == ElementState::Pressed && want_keyboard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{Camera, CameraOptions, FlyController};
    use cgmath::{EuclideanSpace, InnerSpace};
    use winit::{
        event::{DeviceId, MouseButton, MouseScrollDelta, TouchPhase},
        keyboard::KeyCode,
    };

    fn device_id() -> DeviceId {
        // SAFETY: only compared, never handed to the platform.
        unsafe { DeviceId::dummy() }
    }

    #[test]
    fn key_releases_are_never_captured() {
        assert!(!key_captured(ElementState::Released, true));
        assert!(key_captured(ElementState::Pressed, true));
        assert!(!key_captured(ElementState::Pressed, false));
    }

    #[test]
    fn release_over_the_panel_still_stops_the_camera() {
        let mut controller = FlyController::new(1.0, 0.1);
        let mut camera = Camera::new(CameraOptions::default());
        controller.process_key(KeyCode::KeyW, ElementState::Pressed);

        // Pointer over the panel: ImGui wants everything.
        if !key_captured(ElementState::Released, true) {
            controller.process_key(KeyCode::KeyW, ElementState::Released);
        }
        controller.update(1.0, &mut camera);

        assert!(camera.position().to_vec().magnitude() < 1e-6);
    }

    #[test]
    fn focus_changes_pass_through() {
        assert!(!ui_captures(&WindowEvent::Focused(false), true, true));
        assert!(!ui_captures(&WindowEvent::Focused(true), true, true));
    }

    #[test]
    fn mouse_events_follow_mouse_capture() {
        let press = WindowEvent::MouseInput {
            device_id: device_id(),
            state: ElementState::Pressed,
            button: MouseButton::Left,
        };
        let release = WindowEvent::MouseInput {
            device_id: device_id(),
            state: ElementState::Released,
            button: MouseButton::Left,
        };
        let wheel = WindowEvent::MouseWheel {
            device_id: device_id(),
            delta: MouseScrollDelta::LineDelta(0.0, 1.0),
            phase: TouchPhase::Moved,
        };

        assert!(ui_captures(&press, true, false));
        assert!(!ui_captures(&press, false, true));
        assert!(!ui_captures(&release, true, true));
        assert!(ui_captures(&wheel, true, false));
        assert!(!ui_captures(&wheel, false, true));
    }
}
