use std::path::Path;

use eframe::egui;
use futures::channel::oneshot;

use crate::sketchpad::Sketchpad;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// A file chosen in the open dialog: its name and contents
type PickedFile = (String, Vec<u8>);

/// Imports image files dropped onto the window or chosen in the open dialog
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
    picked: Option<oneshot::Receiver<Option<PickedFile>>>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks up newly dropped files from the UI context.
    /// Returns true if any arrived this frame.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            if i.raw.dropped_files.is_empty() {
                false
            } else {
                self.dropped_files.extend(i.raw.dropped_files.iter().cloned());
                true
            }
        })
    }

    /// Imports every queued image onto the sketchpad. Each successful import
    /// replaces the canvas and adds a history entry, so the last file wins.
    /// Returns the number of images imported.
    pub fn import_dropped_files(&mut self, pad: &mut Sketchpad) -> usize {
        let mut imported = 0;
        for file in std::mem::take(&mut self.dropped_files) {
            let file_name = display_name(&file);
            if !is_image_file(&file) {
                log::warn!("Dropped file is not a supported type: {}", file_name);
                continue;
            }
            let Some(bytes) = read_bytes(&file, &file_name) else {
                continue;
            };
            if import_bytes(pad, &file_name, &bytes) {
                imported += 1;
            }
        }
        imported
    }

    /// True while the open dialog is showing or its file is being read
    pub fn is_picking(&self) -> bool {
        self.picked.is_some()
    }

    /// Shows the open dialog for an image. The choice is imported by a later
    /// [`Self::import_picked_file`]; `ctx` is repainted once it is ready.
    pub fn open_image_dialog(&mut self, ctx: &egui::Context) {
        if self.is_picking() {
            return;
        }
        let (tx, rx) = oneshot::channel();
        self.picked = Some(rx);

        #[cfg(not(target_arch = "wasm32"))]
        {
            let picked = rfd::FileDialog::new()
                .set_title("Import image")
                .add_filter("Image", &IMAGE_EXTENSIONS[..])
                .pick_file()
                .and_then(|path| match std::fs::read(&path) {
                    Ok(bytes) => Some((path.display().to_string(), bytes)),
                    Err(err) => {
                        log::error!("Failed to read image file: {}: {}", path.display(), err);
                        None
                    }
                });
            let _ = tx.send(picked);
            ctx.request_repaint();
        }

        #[cfg(target_arch = "wasm32")]
        {
            let ctx = ctx.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let dialog = rfd::AsyncFileDialog::new()
                    .set_title("Import image")
                    .add_filter("Image", &IMAGE_EXTENSIONS[..]);
                let picked = match dialog.pick_file().await {
                    Some(handle) => Some((handle.file_name(), handle.read().await)),
                    None => None,
                };
                let _ = tx.send(picked);
                ctx.request_repaint();
            });
        }
    }

    /// Imports the file chosen in the open dialog once it is available.
    /// Returns true if an image was imported.
    pub fn import_picked_file(&mut self, pad: &mut Sketchpad) -> bool {
        let Some(receiver) = self.picked.as_mut() else {
            return false;
        };
        let picked = match receiver.try_recv() {
            Ok(Some(picked)) => picked,
            Ok(None) => return false,
            Err(oneshot::Canceled) => {
                log::warn!("Image dialog went away without an answer");
                self.picked = None;
                return false;
            }
        };
        self.picked = None;
        match picked {
            Some((file_name, bytes)) => import_bytes(pad, &file_name, &bytes),
            None => {
                log::debug!("Image dialog closed without a file");
                false
            }
        }
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        let text = ctx.input(|i| {
            if i.raw.hovered_files.is_empty() {
                return None;
            }
            let mut text = "Drop image to import:\n".to_owned();
            for file in &i.raw.hovered_files {
                match &file.path {
                    Some(path) => text += &format!("\n{}", path.display()),
                    None => text += "\n(Path not available)",
                }
            }
            Some(text)
        });
        let Some(text) = text else {
            return;
        };

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(20.0),
            Color32::WHITE,
        );
    }
}

fn import_bytes(pad: &mut Sketchpad, file_name: &str, bytes: &[u8]) -> bool {
    match pad.import_image_bytes(bytes) {
        Ok(true) => {
            log::info!("Imported {} ({} bytes)", file_name, bytes.len());
            true
        }
        Ok(false) => {
            log::info!("Ignored {} during playback", file_name);
            false
        }
        Err(err) => {
            log::error!("Failed to import {}: {}", file_name, err);
            false
        }
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = file
        .path
        .as_deref()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| file.name.clone().into());
    has_image_extension(&name)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn read_bytes(file: &egui::DroppedFile, file_name: &str) -> Option<Vec<u8>> {
    if let Some(bytes) = &file.bytes {
        return Some(bytes.to_vec());
    }

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(path) = &file.path {
        return match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::error!("Failed to read image file: {}: {}", path.display(), err);
                None
            }
        };
    }

    log::warn!("Dropped file has no accessible data: {}", file_name);
    None
}
