use cgmath::{InnerSpace, Point3};
use log::debug;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::fly_camera::Camera;

/// What the controller wants done with the OS cursor.
///
/// The controller never owns the window, so grabbing and hiding the cursor is
/// left to whoever does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorRequest {
    /// Lock and hide the cursor, mouse motion now turns the camera.
    Capture,
    /// Give the cursor back to the user.
    Release,
}

/// Keyboard and mouse driven first-person controls.
#[derive(Debug, Clone)]
pub struct FlyController {
    /// World units per second.
    pub movement_speed: f32,
    /// Degrees of rotation per unit of raw mouse motion.
    pub mouse_sensitivity: f32,
    /// Point the camera snaps to while Space is held.
    pub look_at_target: Point3<f32>,
    is_forward_pressed: bool,
    is_backward_pressed: bool,
    is_left_pressed: bool,
    is_right_pressed: bool,
    is_look_at_pressed: bool,
    is_ctrl_held: bool,
    is_cursor_captured: bool,
}

impl FlyController {
    pub fn new(movement_speed: f32, mouse_sensitivity: f32) -> Self {
        Self {
            movement_speed,
            mouse_sensitivity,
            look_at_target: Point3::new(0.0, 0.0, 0.0),
            is_forward_pressed: false,
            is_backward_pressed: false,
            is_left_pressed: false,
            is_right_pressed: false,
            is_look_at_pressed: false,
            is_ctrl_held: false,
            is_cursor_captured: false,
        }
    }

    /// Feeds one window event into the controller.
    ///
    /// Scrolling zooms the camera immediately, everything else only updates
    /// the held-key state consumed by [`FlyController::update`].
    pub fn process_window_event(
        &mut self,
        event: &WindowEvent,
        camera: &mut Camera,
    ) -> Option<CursorRequest> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.process_keyboard(event),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.is_ctrl_held = modifiers.state().control_key();
                None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.process_mouse_button(*button, *state)
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.process_scroll(delta, camera);
                None
            }
            WindowEvent::Focused(false) => {
                self.clear_held_keys();
                None
            }
            _ => None,
        }
    }

    pub fn process_keyboard(&mut self, event: &KeyEvent) -> Option<CursorRequest> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        self.process_key(code, event.state)
    }

    pub fn process_key(&mut self, code: KeyCode, state: ElementState) -> Option<CursorRequest> {
        let pressed = state == ElementState::Pressed;

        match code {
            KeyCode::KeyW => self.is_forward_pressed = pressed,
            KeyCode::KeyS => self.is_backward_pressed = pressed,
            KeyCode::KeyA => self.is_left_pressed = pressed,
            KeyCode::KeyD => self.is_right_pressed = pressed,
            KeyCode::Space => self.is_look_at_pressed = pressed,
            KeyCode::ControlLeft | KeyCode::ControlRight => self.is_ctrl_held = pressed,
            KeyCode::Escape if pressed && self.is_cursor_captured => {
                self.release_cursor();
                return Some(CursorRequest::Release);
            }
            _ => (),
        }
        None
    }

    /// Ctrl + left click hands the mouse over to the camera.
    pub fn process_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
    ) -> Option<CursorRequest> {
        if button == MouseButton::Left
            && state == ElementState::Pressed
            && self.is_ctrl_held
            && !self.is_cursor_captured
        {
            debug!("Cursor captured for mouse look");
            self.is_cursor_captured = true;
            return Some(CursorRequest::Capture);
        }
        None
    }

    /// Raw device motion. Ignored unless the cursor is captured.
    pub fn process_mouse_motion(&self, delta: (f64, f64), camera: &mut Camera) {
        if !self.is_cursor_captured {
            return;
        }
        let offset_x = delta.0 as f32 * self.mouse_sensitivity;
        let offset_y = -delta.1 as f32 * self.mouse_sensitivity;
        camera.rotate(offset_x, offset_y);
    }

    pub fn process_scroll(&self, delta: &MouseScrollDelta, camera: &mut Camera) {
        let scroll = match delta {
            MouseScrollDelta::LineDelta(_, scroll) => *scroll,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => *scroll as f32,
        };
        camera.zoom(scroll);
    }

    /// Applies held keys for a frame that took `dt` seconds.
    pub fn update(&self, dt: f32, camera: &mut Camera) {
        if self.is_look_at_pressed {
            camera.look_at(self.look_at_target);
        }

        let step = self.movement_speed * dt;
        let front = camera.front();
        let side = front.cross(camera.up()).normalize();

        if self.is_forward_pressed {
            camera.move_by(front * step);
        }
        if self.is_backward_pressed {
            camera.move_by(-front * step);
        }
        if self.is_left_pressed {
            camera.move_by(-side * step);
        }
        if self.is_right_pressed {
            camera.move_by(side * step);
        }
    }

    pub fn is_cursor_captured(&self) -> bool {
        self.is_cursor_captured
    }

    /// Drops mouse look, e.g. after the window refused to grab the cursor.
    pub fn release_cursor(&mut self) {
        if self.is_cursor_captured {
            debug!("Cursor released");
        }
        self.is_cursor_captured = false;
    }

    fn clear_held_keys(&mut self) {
        self.is_forward_pressed = false;
        self.is_backward_pressed = false;
        self.is_left_pressed = false;
        self.is_right_pressed = false;
        self.is_look_at_pressed = false;
        self.is_ctrl_held = false;
    }
}

impl Default for FlyController {
    fn default() -> Self {
        Self::new(4.0, 0.1)
    }
}
