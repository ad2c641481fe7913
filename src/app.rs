use std::time::Duration;

use crate::config::SketchConfig;
use crate::file_handler::FileHandler;
use crate::input::{InputEvent, InputHandler};
use crate::panels::{central_panel, tools_panel};
use crate::sketchpad::Sketchpad;
use crate::texture::SurfaceTexture;

const LIGHT_BACKDROP: egui::Color32 = egui::Color32::WHITE;
const DARK_BACKDROP: egui::Color32 = egui::Color32::from_rgb(0x22, 0x22, 0x22);

/// The drawing application: a toolbar on the left, the canvas filling the rest.
pub struct SketchApp {
    pad: Sketchpad,
    texture: SurfaceTexture,
    input: InputHandler,
    files: FileHandler,
    dark_mode: bool,
    last_playback_time: Option<f64>,
}

impl std::fmt::Debug for SketchApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SketchApp")
            .field("pad", &self.pad)
            .field("dark_mode", &self.dark_mode)
            .finish()
    }
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: SketchConfig) -> Self {
        let app = Self::with_config(config);
        cc.egui_ctx.set_visuals(visuals(app.dark_mode));
        app
    }

    /// Builds the app without a window. The blank starting canvas is
    /// committed so the first stroke can be undone.
    pub fn with_config(config: SketchConfig) -> Self {
        let mut pad = Sketchpad::from_config(&config);
        pad.commit();
        Self {
            pad,
            texture: SurfaceTexture::new(),
            input: InputHandler::new(egui::Rect::NOTHING),
            files: FileHandler::new(),
            dark_mode: config.dark_mode,
            last_playback_time: None,
        }
    }

    pub fn pad(&self) -> &Sketchpad {
        &self.pad
    }

    pub fn pad_mut(&mut self) -> &mut Sketchpad {
        &mut self.pad
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, ctx: &egui::Context, dark: bool) {
        self.dark_mode = dark;
        ctx.set_visuals(visuals(dark));
    }

    /// The color shown behind transparent canvas pixels
    pub fn canvas_backdrop(&self) -> egui::Color32 {
        if self.dark_mode {
            DARK_BACKDROP
        } else {
            LIGHT_BACKDROP
        }
    }

    pub fn surface_texture(&mut self, ctx: &egui::Context) -> egui::TextureId {
        self.texture.texture_id(ctx, self.pad.surface())
    }

    pub fn start_playback(&mut self, ctx: &egui::Context) {
        if self.pad.start_playback() {
            self.last_playback_time = Some(ctx.input(|i| i.time));
            ctx.request_repaint_after(self.pad.playback_interval());
        }
    }

    /// Asks for an image file to import onto the canvas
    pub fn open_image_dialog(&mut self, ctx: &egui::Context) {
        self.files.open_image_dialog(ctx);
    }

    pub fn is_picking_file(&self) -> bool {
        self.files.is_picking()
    }

    /// Routes this frame's canvas input to the sketchpad
    pub fn handle_input(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect, canvas_hovered: bool) {
        self.input.set_canvas_rect(canvas_rect);
        for event in self.input.process_input(ctx, canvas_hovered) {
            self.apply_input(event);
        }
    }

    pub fn apply_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { location } => {
                self.pad.begin_stroke(location.position);
            }
            InputEvent::PointerMove { location } => {
                self.pad.continue_stroke(location.position);
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.pad.end_stroke();
            }
            InputEvent::Undo => {
                self.pad.undo();
            }
            InputEvent::Redo => {
                self.pad.redo();
            }
        }
    }

    fn drive_playback(&mut self, ctx: &egui::Context) {
        if !self.pad.is_replaying() {
            self.last_playback_time = None;
            return;
        }
        let now = ctx.input(|i| i.time);
        let last = self.last_playback_time.replace(now).unwrap_or(now);
        self.pad.advance_playback(Duration::from_secs_f64((now - last).max(0.0)));
        if let Some(wait) = self.pad.time_until_next_frame() {
            ctx.request_repaint_after(wait);
        }
    }
}

fn visuals(dark: bool) -> egui::Visuals {
    if dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    }
}

impl eframe::App for SketchApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.files.check_for_dropped_files(ctx) {
            self.files.import_dropped_files(&mut self.pad);
        }
        self.files.import_picked_file(&mut self.pad);
        self.drive_playback(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.files.preview_files_being_dropped(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.pad.cancel_playback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputLocation;
    use egui::pos2;

    fn at(x: f32, y: f32) -> InputLocation {
        InputLocation {
            position: pos2(x, y),
            is_in_canvas: true,
        }
    }

    #[test]
    fn test_starts_with_blank_entry() {
        let app = SketchApp::with_config(SketchConfig::default());
        assert_eq!(app.pad().history_len(), 1);
        assert_eq!(app.pad().history_cursor(), Some(0));
        assert!(!app.pad().can_undo());
    }

    #[test]
    fn test_pointer_leave_ends_stroke() {
        let mut app = SketchApp::with_config(SketchConfig::default());
        app.apply_input(InputEvent::PointerDown { location: at(10.0, 10.0) });
        app.apply_input(InputEvent::PointerMove { location: at(20.0, 10.0) });
        app.apply_input(InputEvent::PointerLeave);

        assert!(!app.pad().is_drawing());
        assert_eq!(app.pad().history_len(), 2);
        app.apply_input(InputEvent::Undo);
        assert!(app.pad().surface().is_blank());
    }

    fn run_frame_under_popup(ctx: &egui::Context, app: &mut SketchApp, events: Vec<egui::Event>) {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(400.0, 300.0))),
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            central_panel(app, ctx);
            egui::Area::new(egui::Id::new("covering_popup"))
                .order(egui::Order::Foreground)
                .fixed_pos(pos2(50.0, 50.0))
                .show(ctx, |ui| ui.add_sized([200.0, 150.0], egui::Button::new("popup")));
        });
    }

    #[test]
    fn test_click_on_popup_over_canvas_does_not_draw() {
        let ctx = egui::Context::default();
        let mut app = SketchApp::with_config(SketchConfig::default());
        let at = pos2(150.0, 120.0);
        let button = |pressed| egui::Event::PointerButton {
            pos: at,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        };

        run_frame_under_popup(&ctx, &mut app, vec![egui::Event::PointerMoved(at)]);
        run_frame_under_popup(&ctx, &mut app, vec![egui::Event::PointerMoved(at)]);
        run_frame_under_popup(&ctx, &mut app, vec![button(true)]);
        run_frame_under_popup(&ctx, &mut app, vec![button(false)]);

        assert!(!app.pad().is_drawing());
        assert_eq!(app.pad().history_len(), 1);
        assert!(app.pad().surface().is_blank());
    }

    #[test]
    fn test_backdrop_follows_dark_mode() {
        let ctx = egui::Context::default();
        let mut app = SketchApp::with_config(SketchConfig::default());
        assert_eq!(app.canvas_backdrop(), LIGHT_BACKDROP);
        app.set_dark_mode(&ctx, true);
        assert_eq!(app.canvas_backdrop(), DARK_BACKDROP);
    }
}
