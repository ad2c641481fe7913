use egui::{Color32, ColorImage, Pos2};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::stroke::{BlendMode, Segment, StrokeStyle};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// The raster the user draws on: a fixed-size RGBA buffer mutated in place.
///
/// Every mutation bumps `revision`, which lets the display layer skip
/// re-uploading an unchanged surface.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
    revision: u64,
}

impl Surface {
    /// Creates a fully transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
            revision: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.pixels.get_pixel(x, y))
    }

    /// True when every pixel is fully transparent
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[3] == 0)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Clears every pixel to transparent
    pub fn clear(&mut self) {
        self.pixels.pixels_mut().for_each(|p| *p = TRANSPARENT);
        self.touch();
    }

    /// Replaces the buffer with a blank one of the new size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pixels = RgbaImage::from_pixel(width, height, TRANSPARENT);
        self.touch();
    }

    /// Draws a round-capped segment. A pixel is covered when its center lies
    /// within `width / 2` of the segment.
    pub fn draw_segment(&mut self, segment: Segment, style: &StrokeStyle) {
        let (from, to) = (segment.from(), segment.to());
        if !(from.x.is_finite() && from.y.is_finite() && to.x.is_finite() && to.y.is_finite()) {
            return;
        }
        let radius = (style.width() / 2.0).max(0.5);
        let bounds = segment.bounds(radius);

        let x0 = (bounds.min.x.floor() as i64).max(0);
        let y0 = (bounds.min.y.floor() as i64).max(0);
        let x1 = (bounds.max.x.ceil() as i64).min(i64::from(self.width()) - 1);
        let y1 = (bounds.max.y.ceil() as i64).min(i64::from(self.height()) - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        let source = style.color().to_srgba_unmultiplied();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                if segment.distance_to(center) <= radius {
                    let pixel = self.pixels.get_pixel_mut(x as u32, y as u32);
                    match style.blend() {
                        BlendMode::Normal => source_over(pixel, source),
                        BlendMode::Erase => destination_out(pixel, source[3]),
                    }
                }
            }
        }
        self.touch();
    }

    /// Fills the single pixel containing `(x, y)` with normal blending.
    /// Points outside the surface are ignored.
    pub fn plot_dot(&mut self, at: Pos2, color: Color32) {
        if !(at.x.is_finite() && at.y.is_finite()) {
            return;
        }
        let (x, y) = (at.x.floor(), at.y.floor());
        if x < 0.0 || y < 0.0 || x >= self.width() as f32 || y >= self.height() as f32 {
            return;
        }
        source_over(
            self.pixels.get_pixel_mut(x as u32, y as u32),
            color.to_srgba_unmultiplied(),
        );
        self.touch();
    }

    /// Clears the surface and copies `image` onto it at the origin, cropping
    /// whatever does not fit.
    pub fn blit(&mut self, image: &RgbaImage) {
        self.pixels.pixels_mut().for_each(|p| *p = TRANSPARENT);
        imageops::replace(&mut self.pixels, image, 0, 0);
        self.touch();
    }

    /// Clears the surface and draws `image` scaled to fit, preserving its
    /// aspect ratio, centered on both axes.
    pub fn draw_image_fitted(&mut self, image: &RgbaImage) {
        self.pixels.pixels_mut().for_each(|p| *p = TRANSPARENT);
        let (iw, ih) = image.dimensions();
        if iw > 0 && ih > 0 && self.width() > 0 && self.height() > 0 {
            let scale = (self.width() as f32 / iw as f32).min(self.height() as f32 / ih as f32);
            let w = ((iw as f32 * scale).round() as u32).max(1);
            let h = ((ih as f32 * scale).round() as u32).max(1);
            let x = (i64::from(self.width()) - i64::from(w)) / 2;
            let y = (i64::from(self.height()) - i64::from(h)) / 2;
            if (w, h) == (iw, ih) {
                imageops::overlay(&mut self.pixels, image, x, y);
            } else {
                let scaled = imageops::resize(image, w, h, FilterType::Triangle);
                imageops::overlay(&mut self.pixels, &scaled, x, y);
            }
        }
        self.touch();
    }

    /// Copies the raster into an egui image for display
    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_unmultiplied(
            [self.width() as usize, self.height() as usize],
            self.pixels.as_raw(),
        )
    }
}

// Straight-alpha source-over
fn source_over(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let sa = f32::from(src[3]) / 255.0;
    if sa >= 1.0 {
        *dst = Rgba(src);
        return;
    }
    if sa <= 0.0 {
        return;
    }
    let da = f32::from(dst.0[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let s = f32::from(src[i]);
        let d = f32::from(dst.0[i]);
        out[i] = ((s * sa + d * da * (1.0 - sa)) / out_a).round() as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    *dst = Rgba(out);
}

// Destination-out: existing alpha is scaled by the inverse of the source alpha
fn destination_out(dst: &mut Rgba<u8>, source_alpha: u8) {
    let keep = 1.0 - f32::from(source_alpha) / 255.0;
    let alpha = (f32::from(dst.0[3]) * keep).round() as u8;
    *dst = if alpha == 0 {
        TRANSPARENT
    } else {
        Rgba([dst.0[0], dst.0[1], dst.0[2], alpha])
    };
}
