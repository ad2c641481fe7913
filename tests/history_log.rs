use std::io::Cursor;

use egui::{Color32, pos2};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use rainbow_sketch::{ImportError, Sketchpad};

// Helper to create a pad holding one blank entry, like the app at startup
fn create_test_pad() -> Sketchpad {
    let mut pad = Sketchpad::new(64, 48);
    pad.commit();
    pad
}

// Each call leaves a distinguishable mark, so snapshots differ
fn draw_mark(pad: &mut Sketchpad, n: usize) {
    let y = 4.0 + n as f32 * 6.0;
    pad.begin_stroke(pos2(4.0, y));
    pad.continue_stroke(pos2(60.0, y));
    pad.end_stroke();
}

fn png_bytes(image: RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn test_commit_after_undo_truncates_redo() {
    let mut pad = Sketchpad::new(64, 48);
    for n in 0..5 {
        draw_mark(&mut pad, n);
    }
    assert_eq!(pad.history_len(), 5);
    assert_eq!(pad.history_cursor(), Some(4));

    assert!(pad.undo());
    assert!(pad.undo());
    assert_eq!(pad.history_cursor(), Some(2));

    draw_mark(&mut pad, 6);
    assert_eq!(pad.history_len(), 4);
    assert_eq!(pad.history_cursor(), Some(3));

    // The two discarded entries are gone for good
    assert!(!pad.redo());
    assert_eq!(pad.history_cursor(), Some(3));
}

#[test]
fn test_undo_at_first_entry_is_noop() {
    let mut pad = create_test_pad();
    let before = pad.surface().pixels().clone();

    assert!(!pad.undo());
    assert_eq!(pad.history_cursor(), Some(0));
    assert_eq!(pad.history_len(), 1);
    assert_eq!(pad.surface().pixels(), &before);
}

#[test]
fn test_redo_at_last_entry_is_noop() {
    let mut pad = create_test_pad();
    draw_mark(&mut pad, 0);
    let before = pad.surface().pixels().clone();

    assert!(!pad.redo());
    assert_eq!(pad.history_cursor(), Some(1));
    assert_eq!(pad.surface().pixels(), &before);
}

#[test]
fn test_undo_on_empty_history_is_noop() {
    let mut pad = Sketchpad::new(8, 8);
    assert!(!pad.undo());
    assert!(!pad.redo());
    assert_eq!(pad.history_cursor(), None);
}

#[test]
fn test_undo_redo_restore_exact_pixels() {
    let mut pad = create_test_pad();
    draw_mark(&mut pad, 0);
    let first = pad.surface().pixels().clone();
    draw_mark(&mut pad, 1);
    let second = pad.surface().pixels().clone();
    assert_ne!(first, second);

    pad.undo();
    assert_eq!(pad.surface().pixels(), &first);
    pad.redo();
    assert_eq!(pad.surface().pixels(), &second);
}

#[test]
fn test_cursor_stays_in_bounds() {
    let mut pad = Sketchpad::new(32, 32);
    for step in 0..40usize {
        match step % 5 {
            0 | 3 => draw_mark(&mut pad, step % 4),
            1 | 4 => {
                pad.undo();
            }
            _ => {
                pad.redo();
            }
        }
        let len = pad.history_len();
        let cursor = pad.history_cursor().unwrap();
        assert!(cursor < len, "cursor {} out of bounds for {}", cursor, len);
    }
}

#[test]
fn test_clear_appends_one_blank_entry() {
    let mut pad = create_test_pad();
    draw_mark(&mut pad, 0);
    let drawn = pad.surface().pixels().clone();

    assert!(pad.clear());
    assert_eq!(pad.history_len(), 3);
    assert!(pad.surface().is_blank());

    // Clearing an already blank canvas still records an entry
    assert!(pad.clear());
    assert_eq!(pad.history_len(), 4);

    pad.undo();
    pad.undo();
    assert_eq!(pad.surface().pixels(), &drawn);
}

#[test]
fn test_import_commits_fitted_image() {
    let mut pad = create_test_pad();
    let bytes = png_bytes(RgbaImage::from_pixel(16, 48, Rgba([200, 10, 10, 255])));

    assert!(pad.import_image_bytes(&bytes).unwrap());
    assert_eq!(pad.history_len(), 2);
    // 16x48 fits exactly in height, centered horizontally
    assert_eq!(pad.surface().pixel(32, 24), Some(Rgba([200, 10, 10, 255])));
    assert_eq!(pad.surface().pixel(2, 24), Some(Rgba([0, 0, 0, 0])));

    pad.undo();
    assert!(pad.surface().is_blank());
}

#[test]
fn test_import_of_garbage_changes_nothing() {
    let mut pad = create_test_pad();
    draw_mark(&mut pad, 0);
    let before = pad.surface().pixels().clone();

    let result = pad.import_image_bytes(b"definitely not an image");
    assert!(matches!(result, Err(ImportError::Decode(_))));
    assert_eq!(pad.history_len(), 2);
    assert_eq!(pad.surface().pixels(), &before);
}

#[test]
fn test_import_of_empty_image_is_rejected() {
    let mut pad = create_test_pad();
    let result = pad.import_image(&RgbaImage::new(0, 0));
    assert!(matches!(result, Err(ImportError::EmptyImage)));
    assert_eq!(pad.history_len(), 1);
}

#[test]
fn test_resize_restores_cursor_entry() {
    let mut pad = create_test_pad();
    pad.set_color(Color32::RED);
    draw_mark(&mut pad, 0);
    pad.undo();
    pad.resize(100, 100);
    assert!(pad.surface().is_blank());

    pad.redo();
    pad.resize(120, 90);
    assert_eq!(pad.surface().pixel(30, 4), Some(Rgba([255, 0, 0, 255])));
}
