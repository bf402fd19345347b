use egui::{ColorImage, Vec2, vec2};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{AnnotatorError, AnnotatorResult};

// Static counter for generating unique IDs
static NEXT_IMAGE_ID: AtomicUsize = AtomicUsize::new(1);

/// Longest side a decoded background keeps unless a smaller limit is given.
///
/// WebGL commonly caps textures at 4096 pixels per side.
pub const DEFAULT_MAX_IMAGE_SIDE: u32 = 4096;

/// A file picked by the user, not yet decoded
#[derive(Clone, Debug)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// The decoded image shown underneath the drawing surface.
///
/// Owned by the controller; dropping it releases the pixel data. Each
/// instance gets a fresh id so the front-end can tell replacements apart.
pub struct BackgroundImage {
    id: usize,
    name: String,
    pixels: Arc<ColorImage>,
}

impl std::fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.pixels.size)
            .finish()
    }
}

impl BackgroundImage {
    pub fn new(name: impl Into<String>, pixels: ColorImage) -> Self {
        let id = NEXT_IMAGE_ID.fetch_add(1, Ordering::SeqCst);
        Self {
            id,
            name: name.into(),
            pixels: Arc::new(pixels),
        }
    }

    /// Decode a selected file with the `image` crate
    pub fn decode(file: &SelectedFile) -> AnnotatorResult<Self> {
        Self::decode_within(file, DEFAULT_MAX_IMAGE_SIDE)
    }

    /// Decode, downscaling so that neither side exceeds `max_side`
    pub fn decode_within(file: &SelectedFile, max_side: u32) -> AnnotatorResult<Self> {
        if file.bytes.is_empty() {
            return Err(AnnotatorError::EmptyFileSelection);
        }

        let decoded = image::load_from_memory(&file.bytes)?;
        log::debug!(
            "Decoded image {}: {}x{}",
            file.name,
            decoded.width(),
            decoded.height()
        );

        let mut rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        let (fit_width, fit_height) = fit_within(width, height, max_side);
        if (fit_width, fit_height) != (width, height) {
            log::info!(
                "Downscaling {} from {}x{} to {}x{}",
                file.name,
                width,
                height,
                fit_width,
                fit_height
            );
            rgba = image::imageops::resize(
                &rgba,
                fit_width,
                fit_height,
                image::imageops::FilterType::Triangle,
            );
        }

        let size = [rgba.width() as usize, rgba.height() as usize];
        let pixels = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        Ok(Self::new(file.name.clone(), pixels))
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pixels(&self) -> &Arc<ColorImage> {
        &self.pixels
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.pixels.size[0] as f32, self.pixels.size[1] as f32)
    }
}

impl Drop for BackgroundImage {
    fn drop(&mut self) {
        log::debug!("Released background image {} ({})", self.id, self.name);
    }
}

/// Scale `(width, height)` down, keeping the aspect ratio, until both fit `max_side`
pub fn fit_within(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let max_side = max_side.max(1);
    let longest = width.max(height);
    if longest <= max_side {
        return (width, height);
    }
    let scale = max_side as f64 / longest as f64;
    let scaled = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_side);
    (scaled(width), scaled(height))
}
