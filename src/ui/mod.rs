//! # User Interface Module
//!
//! Dear ImGui overlay for the viewer.
//!
//! - [`UiManager`] wraps the ImGui context, winit platform glue and wgpu renderer
//! - [`Controls`] holds the light, material and animation values the scene reads
//!   every frame
//! - [`controls_panel`] draws the "Controls" window editing them
//!
//! Key presses ImGui wants and mouse events over its windows do not reach the
//! camera; key releases and focus changes always do.

pub mod controls;
pub mod manager;
pub mod panel;

pub use controls::{Controls, ElementControls, LightControls, MaterialControls};
pub use manager::{ui_captures, UiManager};
pub use panel::controls_panel;
