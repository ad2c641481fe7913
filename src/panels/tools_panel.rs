use egui::color_picker::{self, Alpha};
use egui::Slider;

use crate::SketchApp;
use crate::tools::ToolKind;

const MIN_BRUSH_SIZE: f32 = 1.0;
const MAX_BRUSH_SIZE: f32 = 50.0;

pub fn tools_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Tools");
            let replaying = app.pad().is_replaying();

            ui.add_enabled_ui(!replaying, |ui| {
                // Selectable labels highlight the active tool
                let active = app.pad().tools().tool;
                for tool in ToolKind::ALL {
                    let label = format!("{} {}", tool.icon(), tool.name());
                    if ui.selectable_label(active == tool, label).clicked() {
                        log::info!("Tool selected from UI: {}", tool.name());
                        app.pad_mut().set_tool(tool);
                    }
                }
                ui.separator();

                ui.horizontal(|ui| {
                    ui.label("Color:");
                    let mut color = app.pad().tools().color;
                    if color_picker::color_edit_button_srgba(ui, &mut color, Alpha::Opaque).changed() {
                        app.pad_mut().set_color(color);
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Size:");
                    let mut size = app.pad().tools().size;
                    if ui.add(Slider::new(&mut size, MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE)).changed() {
                        app.pad_mut().set_size(size);
                    }
                });

                let symmetry = app.pad().tools().symmetry;
                let label = if symmetry { "Symmetry ON" } else { "Toggle Symmetry" };
                if ui.selectable_label(symmetry, label).clicked() {
                    app.pad_mut().toggle_symmetry();
                }
                ui.separator();

                ui.horizontal(|ui| {
                    let can_undo = app.pad().can_undo();
                    let can_redo = app.pad().can_redo();
                    if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                        app.pad_mut().undo();
                    }
                    if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                        app.pad_mut().redo();
                    }
                    if ui.button("Clear").clicked() {
                        app.pad_mut().clear();
                    }
                });

                let picking = app.is_picking_file();
                if ui.add_enabled(!picking, egui::Button::new("Import image…")).clicked() {
                    app.open_image_dialog(ctx);
                }
            });

            ui.separator();
            let replay_label = if replaying { "Replaying…" } else { "Replay" };
            if ui
                .add_enabled(!replaying && app.pad().history_len() > 0, egui::Button::new(replay_label))
                .clicked()
            {
                app.start_playback(ctx);
            }

            let history_label = match app.pad().history_cursor() {
                Some(cursor) => format!("History: {} / {}", cursor + 1, app.pad().history_len()),
                None => "History: empty".to_owned(),
            };
            ui.label(history_label);
            ui.separator();

            let mut dark = app.dark_mode();
            if ui.checkbox(&mut dark, "Dark mode").changed() {
                app.set_dark_mode(ctx, dark);
            }
            ui.small("Images can also be dropped onto the window.");
        });
}
