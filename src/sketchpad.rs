use std::collections::VecDeque;
use std::task::{Context, Poll};
use std::time::Duration;

use egui::{Color32, Pos2};
use futures::FutureExt;
use futures::future::BoxFuture;
use futures::task::noop_waker_ref;
use image::RgbaImage;

use crate::color::HuePhase;
use crate::config::SketchConfig;
use crate::error::{ImportError, SnapshotError};
use crate::history::History;
use crate::playback::{Playback, PlaybackEvent};
use crate::renderer::{StrokeRenderer, StrokeSession};
use crate::surface::Surface;
use crate::tools::{SprayNozzle, ToolKind, ToolState};

/// Why a redraw was queued, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RedrawReason {
    Undo,
    Redo,
    Resize,
    PlaybackFrame(usize),
    PlaybackDone,
}

struct PendingRedraw {
    reason: RedrawReason,
    decode: BoxFuture<'static, Result<RgbaImage, SnapshotError>>,
}

/// The whole drawing program's state: surface, tools, history, the active
/// stroke and playback.
///
/// Every method is one reaction to one input or timer event. While playback
/// runs, all input is ignored and the methods report `false`.
pub struct Sketchpad {
    surface: Surface,
    tools: ToolState,
    renderer: StrokeRenderer,
    history: History,
    session: Option<StrokeSession>,
    playback: Playback,
    redraws: VecDeque<PendingRedraw>,
}

impl std::fmt::Debug for Sketchpad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sketchpad")
            .field("size", &(self.surface.width(), self.surface.height()))
            .field("tools", &self.tools)
            .field("history_len", &self.history.len())
            .field("cursor", &self.history.cursor())
            .field("drawing", &self.session.is_some())
            .field("replaying", &self.playback.is_active())
            .field("pending_redraws", &self.redraws.len())
            .finish()
    }
}

impl Sketchpad {
    /// Creates a blank sketchpad with an empty history
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Surface::new(width, height),
            tools: ToolState::default(),
            renderer: StrokeRenderer::default(),
            history: History::new(),
            session: None,
            playback: Playback::default(),
            redraws: VecDeque::new(),
        }
    }

    pub fn from_config(config: &SketchConfig) -> Self {
        let mut pad = Self::new(config.canvas_width, config.canvas_height);
        pad.tools = ToolState {
            color: config.brush_color(),
            size: config.brush_size,
            hue: HuePhase::new(config.hue_step_degrees),
            ..ToolState::default()
        };
        pad.renderer = StrokeRenderer::new(SprayNozzle::new(config.spray_density));
        pad.playback = Playback::new(config.playback_interval());
        pad
    }

    /// Replaces the stroke renderer, e.g. with a seeded spray nozzle
    pub fn with_renderer(mut self, renderer: StrokeRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn is_replaying(&self) -> bool {
        self.playback.is_active()
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_some()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_cursor(&self) -> Option<usize> {
        self.history.cursor()
    }

    pub fn can_undo(&self) -> bool {
        !self.is_replaying() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.is_replaying() && self.history.can_redo()
    }

    fn reject(&self, what: &str) -> bool {
        if self.is_replaying() {
            log::trace!("Ignoring {} during playback", what);
            return true;
        }
        false
    }

    // ---- tool controls ------------------------------------------------------

    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        if self.reject("tool change") {
            return false;
        }
        self.tools.tool = tool;
        true
    }

    /// Sets the paint color. Alpha is dropped so overlapping mirrored
    /// segments blend the same as a single one.
    pub fn set_color(&mut self, color: Color32) -> bool {
        if self.reject("color change") {
            return false;
        }
        let [r, g, b, _] = color.to_srgba_unmultiplied();
        self.tools.color = Color32::from_rgb(r, g, b);
        true
    }

    /// Sets the brush size. Non-positive or non-finite sizes are ignored.
    pub fn set_size(&mut self, size: f32) -> bool {
        if self.reject("size change") || !(size.is_finite() && size > 0.0) {
            return false;
        }
        self.tools.size = size;
        true
    }

    /// Flips mirror drawing. The new state is in `tools().symmetry`.
    pub fn toggle_symmetry(&mut self) -> bool {
        if self.reject("symmetry toggle") {
            return false;
        }
        self.tools.toggle_symmetry();
        true
    }

    // ---- strokes ------------------------------------------------------------

    /// Pointer down: opens a stroke session and draws at the start point
    pub fn begin_stroke(&mut self, at: Pos2) -> bool {
        if self.reject("stroke start") {
            return false;
        }
        self.apply_redraws();
        let mut session = StrokeSession::begin(at);
        let segment = session.advance(at);
        self.renderer.render(&mut self.surface, &mut self.tools, segment);
        self.session = Some(session);
        true
    }

    /// Pointer move: draws from the previous point to `to`. Without an open
    /// session this does nothing.
    pub fn continue_stroke(&mut self, to: Pos2) -> bool {
        if self.reject("stroke move") {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let segment = session.advance(to);
        self.renderer.render(&mut self.surface, &mut self.tools, segment);
        true
    }

    /// Pointer up or leave: closes the session and commits the result
    pub fn end_stroke(&mut self) -> bool {
        if self.reject("stroke end") {
            return false;
        }
        if self.session.take().is_none() {
            return false;
        }
        self.commit()
    }

    // ---- history ------------------------------------------------------------

    /// Records the current surface as a new history entry, discarding any
    /// entries after the cursor.
    pub fn commit(&mut self) -> bool {
        if self.reject("commit") {
            return false;
        }
        self.apply_redraws();
        match self.history.commit(&self.surface) {
            Ok(cursor) => {
                log::debug!("Committed snapshot {} of {}", cursor, self.history.len());
                true
            }
            Err(err) => {
                log::error!("Failed to commit snapshot: {}", err);
                false
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        if self.reject("undo") {
            return false;
        }
        let Some(snapshot) = self.history.undo() else {
            log::trace!("Nothing to undo");
            return false;
        };
        let decode = snapshot.decode().boxed();
        log::debug!("Undo to snapshot {:?}", self.history.cursor());
        self.queue_redraw(RedrawReason::Undo, decode);
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.reject("redo") {
            return false;
        }
        let Some(snapshot) = self.history.redo() else {
            log::trace!("Nothing to redo");
            return false;
        };
        let decode = snapshot.decode().boxed();
        log::debug!("Redo to snapshot {:?}", self.history.cursor());
        self.queue_redraw(RedrawReason::Redo, decode);
        true
    }

    /// Wipes the surface and commits the blank result as a new entry
    pub fn clear(&mut self) -> bool {
        if self.reject("clear") {
            return false;
        }
        self.session = None;
        self.redraws.clear();
        self.surface.clear();
        log::info!("Canvas cleared");
        self.commit()
    }

    /// Replaces the surface with `image`, scaled to fit and centered, and
    /// commits. Returns `Ok(false)` during playback.
    pub fn import_image(&mut self, image: &RgbaImage) -> Result<bool, ImportError> {
        if self.reject("image import") {
            return Ok(false);
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(ImportError::EmptyImage);
        }
        self.session = None;
        self.redraws.clear();
        self.surface.draw_image_fitted(image);
        self.history.commit(&self.surface)?;
        log::info!(
            "Imported {}x{} image as snapshot {:?}",
            image.width(),
            image.height(),
            self.history.cursor()
        );
        Ok(true)
    }

    /// Decodes `bytes` (any format the `image` crate knows) and imports it.
    /// An undecodable file leaves the canvas and history untouched.
    pub fn import_image_bytes(&mut self, bytes: &[u8]) -> Result<bool, ImportError> {
        if self.reject("image import") {
            return Ok(false);
        }
        let image = image::load_from_memory(bytes)?.to_rgba8();
        self.import_image(&image)
    }

    // ---- viewport -----------------------------------------------------------

    /// Resizes the surface, which clears it, then redraws the entry under
    /// the cursor. Resizing to the current size does nothing.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.surface.width(), self.surface.height()) {
            return;
        }
        log::debug!("Resizing canvas to {}x{}", width, height);
        self.surface.resize(width, height);
        if self.is_replaying() {
            return;
        }
        if let Some(snapshot) = self.history.current() {
            let decode = snapshot.decode().boxed();
            self.queue_redraw(RedrawReason::Resize, decode);
        }
    }

    // ---- playback -----------------------------------------------------------

    /// Starts replaying the whole history from the first entry. An open
    /// stroke is committed first. Returns false if already replaying or the
    /// history is empty.
    pub fn start_playback(&mut self) -> bool {
        if self.is_replaying() || self.history.is_empty() {
            return false;
        }
        if self.session.is_some() {
            self.end_stroke();
        }
        self.apply_redraws();
        if !self.playback.start(self.history.len()) {
            return false;
        }
        self.surface.clear();
        log::info!("Replaying {} snapshot(s)", self.history.len());
        true
    }

    /// Feeds elapsed time to the playback timer and applies every frame that
    /// became due. Returns the events that fired.
    pub fn advance_playback(&mut self, dt: Duration) -> Vec<PlaybackEvent> {
        let events = self.playback.tick(dt);
        for event in &events {
            match *event {
                PlaybackEvent::Frame(index) => {
                    if let Some(snapshot) = self.history.get(index) {
                        let decode = snapshot.decode().boxed();
                        self.queue_redraw(RedrawReason::PlaybackFrame(index), decode);
                    }
                }
                PlaybackEvent::Finished => {
                    log::info!("Playback finished");
                    if let Some(snapshot) = self.history.current() {
                        let decode = snapshot.decode().boxed();
                        self.queue_redraw(RedrawReason::PlaybackDone, decode);
                    }
                }
            }
        }
        events
    }

    pub fn playback_interval(&self) -> Duration {
        self.playback.interval()
    }

    pub fn time_until_next_frame(&self) -> Option<Duration> {
        self.playback.time_until_next_frame()
    }

    /// Abandons playback and puts the cursor's entry back on the surface
    pub fn cancel_playback(&mut self) -> bool {
        if !self.playback.cancel() {
            return false;
        }
        log::info!("Playback cancelled");
        self.redraws.clear();
        if let Some(snapshot) = self.history.current() {
            let decode = snapshot.decode().boxed();
            self.queue_redraw(RedrawReason::PlaybackDone, decode);
        }
        true
    }

    // ---- redraw queue -------------------------------------------------------

    fn queue_redraw(
        &mut self,
        reason: RedrawReason,
        decode: BoxFuture<'static, Result<RgbaImage, SnapshotError>>,
    ) {
        self.redraws.push_back(PendingRedraw { reason, decode });
        self.apply_redraws();
    }

    /// Applies finished decodes strictly in the order they were issued. A
    /// decode that is still pending blocks everything queued behind it.
    /// Returns the number of redraws still waiting.
    pub fn apply_redraws(&mut self) -> usize {
        let mut cx = Context::from_waker(noop_waker_ref());
        while let Some(front) = self.redraws.front_mut() {
            let result = match front.decode.poll_unpin(&mut cx) {
                Poll::Ready(result) => result,
                Poll::Pending => break,
            };
            let reason = front.reason;
            self.redraws.pop_front();
            match result {
                Ok(image) => {
                    log::trace!("Redraw for {:?}", reason);
                    self.surface.blit(&image);
                }
                Err(err) => log::error!("Redraw for {:?} failed: {}", reason, err),
            }
        }
        self.redraws.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;
    use futures::channel::oneshot;
    use image::Rgba;

    fn filled(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_pending_decode_holds_back_later_redraws() {
        let mut pad = Sketchpad::new(4, 4);
        let (tx, rx) = oneshot::channel::<RgbaImage>();
        let slow = async move { Ok(rx.await.unwrap_or_else(|_| RgbaImage::new(4, 4))) }.boxed();
        pad.queue_redraw(RedrawReason::Undo, slow);
        let fast = futures::future::ready(Ok(filled(4, 4, [255, 0, 0, 255]))).boxed();
        pad.queue_redraw(RedrawReason::Redo, fast);

        // The ready redraw waits behind the pending one
        assert_eq!(pad.apply_redraws(), 2);
        assert!(pad.surface().is_blank());

        tx.send(filled(4, 4, [0, 0, 255, 255])).unwrap();
        assert_eq!(pad.apply_redraws(), 0);
        assert_eq!(pad.surface().pixel(1, 1), Some(Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn test_set_color_drops_alpha() {
        let mut pad = Sketchpad::new(10, 10);
        assert!(pad.set_color(Color32::from_rgba_unmultiplied(255, 0, 0, 128)));
        assert_eq!(pad.tools().color.a(), 255);
        assert_eq!(pad.tools().color, Color32::RED);
    }

    #[test]
    fn test_toggle_symmetry_rejected_during_playback() {
        let mut pad = Sketchpad::new(10, 10);
        pad.commit();
        assert!(pad.start_playback());
        assert!(!pad.toggle_symmetry());
        assert!(!pad.tools().symmetry);
    }

    fn stroke(pad: &mut Sketchpad, from: Pos2, to: Pos2) {
        pad.begin_stroke(from);
        pad.continue_stroke(to);
        pad.end_stroke();
    }

    #[test]
    fn test_stroke_end_commits_once() {
        let mut pad = Sketchpad::new(50, 50);
        pad.commit();
        stroke(&mut pad, pos2(5.0, 5.0), pos2(40.0, 5.0));
        assert_eq!(pad.history_len(), 2);
        assert_eq!(pad.history_cursor(), Some(1));
    }

    #[test]
    fn test_end_without_session_commits_nothing() {
        let mut pad = Sketchpad::new(10, 10);
        assert!(!pad.end_stroke());
        assert_eq!(pad.history_len(), 0);
    }

    #[test]
    fn test_move_without_session_draws_nothing() {
        let mut pad = Sketchpad::new(10, 10);
        assert!(!pad.continue_stroke(pos2(5.0, 5.0)));
        assert!(pad.surface().is_blank());
    }

    #[test]
    fn test_begin_draws_a_dot() {
        let mut pad = Sketchpad::new(20, 20);
        pad.begin_stroke(pos2(10.0, 10.0));
        assert!(pad.is_drawing());
        assert!(!pad.surface().is_blank());
    }

    #[test]
    fn test_undo_restores_previous_surface() {
        let mut pad = Sketchpad::new(30, 30);
        pad.commit();
        stroke(&mut pad, pos2(5.0, 5.0), pos2(25.0, 25.0));
        assert!(!pad.surface().is_blank());

        assert!(pad.undo());
        assert!(pad.surface().is_blank());
        assert!(pad.redo());
        assert!(!pad.surface().is_blank());
    }

    #[test]
    fn test_resize_redraws_current_entry() {
        let mut pad = Sketchpad::new(30, 30);
        stroke(&mut pad, pos2(2.0, 2.0), pos2(8.0, 2.0));
        pad.resize(60, 40);
        assert_eq!((pad.surface().width(), pad.surface().height()), (60, 40));
        assert!(pad.surface().pixel(5, 2).is_some_and(|p| p.0[3] > 0));
    }

    #[test]
    fn test_resize_with_empty_history_stays_blank() {
        let mut pad = Sketchpad::new(30, 30);
        pad.begin_stroke(pos2(5.0, 5.0));
        pad.resize(40, 40);
        assert!(pad.surface().is_blank());
    }

    #[test]
    fn test_set_size_rejects_nonsense() {
        let mut pad = Sketchpad::new(10, 10);
        assert!(!pad.set_size(0.0));
        assert!(!pad.set_size(f32::NAN));
        assert!(pad.set_size(12.0));
        assert_eq!(pad.tools().size, 12.0);
    }

    #[test]
    fn test_from_config_applies_settings() {
        let config = SketchConfig {
            canvas_width: 64,
            canvas_height: 32,
            brush_size: 9.0,
            brush_color: [1, 2, 3],
            ..SketchConfig::default()
        };
        let pad = Sketchpad::from_config(&config);
        assert_eq!(pad.surface().width(), 64);
        assert_eq!(pad.tools().size, 9.0);
        assert_eq!(pad.tools().color, Color32::from_rgb(1, 2, 3));
    }

    #[test]
    fn test_cancel_playback_restores_cursor_entry() {
        let mut pad = Sketchpad::new(20, 20);
        pad.commit();
        stroke(&mut pad, pos2(2.0, 2.0), pos2(18.0, 2.0));
        assert!(pad.start_playback());
        assert!(pad.surface().is_blank());

        assert!(pad.cancel_playback());
        assert!(!pad.is_replaying());
        assert!(!pad.surface().is_blank());
    }
}
