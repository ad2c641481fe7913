use egui::{Context, TextureHandle, TextureId, TextureOptions};

use crate::surface::Surface;

const TEXTURE_NAME: &str = "sketch_surface";

/// Keeps the surface uploaded as an egui texture, re-uploading only when
/// the surface revision changes.
#[derive(Default)]
pub struct SurfaceTexture {
    handle: Option<TextureHandle>,
    uploaded_revision: Option<u64>,
    uploads: u64,
}

impl std::fmt::Debug for SurfaceTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceTexture")
            .field("uploaded_revision", &self.uploaded_revision)
            .field("uploads", &self.uploads)
            .finish()
    }
}

impl SurfaceTexture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the texture for `surface`, uploading it first if it is stale
    pub fn texture_id(&mut self, ctx: &Context, surface: &Surface) -> TextureId {
        let revision = surface.revision();
        if self.uploaded_revision != Some(revision) || self.handle.is_none() {
            let image = surface.to_color_image();
            if let Some(handle) = self.handle.as_mut() {
                handle.set(image, TextureOptions::NEAREST);
            } else {
                self.handle = Some(ctx.load_texture(TEXTURE_NAME, image, TextureOptions::NEAREST));
            }
            self.uploaded_revision = Some(revision);
            self.uploads += 1;
        }
        self.handle
            .as_ref()
            .map_or(TextureId::default(), TextureHandle::id)
    }

    /// Number of uploads performed so far
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }
}
