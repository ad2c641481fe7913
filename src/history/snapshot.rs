use std::future::Future;
use std::io::Cursor;
use std::sync::Arc;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

use crate::error::SnapshotError;
use crate::surface::Surface;

/// A complete, PNG-encoded image of the surface at one instant.
///
/// Cloning is cheap; the encoded bytes are shared.
#[derive(Clone)]
pub struct Snapshot {
    encoded: Arc<[u8]>,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("encoded", &format!("<{} bytes>", self.encoded.len()))
            .finish()
    }
}

impl Snapshot {
    /// Encodes the current contents of `surface`
    pub fn capture(surface: &Surface) -> Result<Self, SnapshotError> {
        Self::encode(surface.pixels())
    }

    pub fn encode(image: &RgbaImage) -> Result<Self, SnapshotError> {
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(SnapshotError::Encode)?;

        Ok(Self {
            encoded: buf.into(),
            width: image.width(),
            height: image.height(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Decodes the snapshot back into pixels.
    ///
    /// The returned future owns what it needs, so it can outlive the history
    /// entry it came from.
    pub fn decode(&self) -> impl Future<Output = Result<RgbaImage, SnapshotError>> + Send + use<> {
        let encoded = Arc::clone(&self.encoded);
        let expected = (self.width, self.height);
        async move {
            let image = image::load(Cursor::new(&encoded[..]), ImageFormat::Png)
                .map_err(SnapshotError::Decode)?
                .to_rgba8();
            if image.dimensions() != expected {
                return Err(SnapshotError::SizeMismatch {
                    expected,
                    actual: image.dimensions(),
                });
            }
            Ok(image)
        }
    }
}
