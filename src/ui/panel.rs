//! The "Controls" window.

use imgui::TreeNodeFlags;

use super::controls::{Controls, ElementControls, LightControls, MaterialControls};
use crate::performance::FrameStats;

/// Draws the "Controls" window. `open` is cleared when the window is closed
/// from its title bar or from File > Close.
pub fn controls_panel(ui: &imgui::Ui, controls: &mut Controls, open: &mut bool, stats: &FrameStats) {
    if !*open {
        return;
    }

    let mut close_requested = false;
    ui.window("Controls")
        .size([360.0, 520.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .menu_bar(true)
        .opened(open)
        .build(|| {
            if let Some(_menu_bar) = ui.begin_menu_bar() {
                if let Some(_menu) = ui.begin_menu("File") {
                    if ui.menu_item("Close") {
                        close_requested = true;
                    }
                }
            }

            ui.text(format!(
                "{:.1} FPS ({:.2} ms)",
                stats.fps(),
                stats.average_frame_time_ms()
            ));
            let frame_times = stats.history_ms();
            if !frame_times.is_empty() {
                ui.plot_lines("##frame_times", &frame_times)
                    .graph_size([0.0, 40.0])
                    .scale_min(0.0)
                    .build();
            }
            ui.separator();

            light_section(ui, &mut controls.light, &mut controls.sun_enabled, &mut controls.flashlight_enabled);
            material_section(ui, &mut controls.material);
            elements_section(ui, &mut controls.elements);
        });

    if close_requested {
        *open = false;
    }
}

fn light_section(ui: &imgui::Ui, light: &mut LightControls, sun: &mut bool, flashlight: &mut bool) {
    if ui.collapsing_header("Light", TreeNodeFlags::DEFAULT_OPEN) {
        ui.color_edit3("Color##light", &mut light.color);
        ui.slider("Ambient strength", 0.0, 1.0, &mut light.ambient_strength);
        ui.slider("Diffuse strength", 0.0, 1.0, &mut light.diffuse_strength);
        ui.checkbox("Sun", sun);
        ui.same_line();
        ui.checkbox("Flashlight", flashlight);
    }
}

fn material_section(ui: &imgui::Ui, material: &mut MaterialControls) {
    if ui.collapsing_header("Material", TreeNodeFlags::DEFAULT_OPEN) {
        ui.color_edit3("Color##material", &mut material.color);
        ui.slider("Specular", 0.0, 1.0, &mut material.specular);
        if ui
            .input_float("Shininess", &mut material.shininess)
            .step(1.0)
            .build()
        {
            material.shininess = material.shininess.max(1.0);
        }
    }
}

fn elements_section(ui: &imgui::Ui, elements: &mut ElementControls) {
    if ui.collapsing_header("Elements", TreeNodeFlags::DEFAULT_OPEN) {
        imgui::Drag::new("Light speed")
            .speed(0.01)
            .build(ui, &mut elements.light_speed);
        ui.slider("Light distance", 0.0, 20.0, &mut elements.light_distance);
        ui.slider(
            "Cubes rotation speed",
            0.0,
            180.0,
            &mut elements.cubes_rotation_speed,
        );
    }
}
