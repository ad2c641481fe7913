use egui::{Color32, CursorIcon, Rect, Sense, pos2, vec2};

use crate::SketchApp;

pub fn central_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let canvas_rect = ui.available_rect_before_wrap();
            let response = ui.allocate_rect(canvas_rect, Sense::drag());

            // The viewport decides the surface size
            let width = canvas_rect.width().max(1.0) as u32;
            let height = canvas_rect.height().max(1.0) as u32;
            app.pad_mut().resize(width, height);

            app.handle_input(ctx, canvas_rect, response.contains_pointer());

            let painter = ui.painter_at(canvas_rect);
            painter.rect_filled(canvas_rect, 0.0, app.canvas_backdrop());

            let texture = app.surface_texture(ctx);
            let surface = app.pad().surface();
            let image_rect = Rect::from_min_size(
                canvas_rect.min,
                vec2(surface.width() as f32, surface.height() as f32),
            );
            painter.image(
                texture,
                image_rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );

            if !app.pad().is_replaying() {
                response.on_hover_cursor(CursorIcon::Crosshair);
            }
        });
}
