use egui::{Color32, ColorImage, Pos2, pos2};
use image::{Rgba, RgbaImage};

/// Default backing resolution of the drawing surface
pub const SURFACE_WIDTH: u32 = 1600;
pub const SURFACE_HEIGHT: u32 = 1200;

/// A pixel target exposing a canvas-style stroking primitive.
///
/// Coordinates are in surface space. Paths accumulate through `move_to` /
/// `line_to` and are only rasterized by `stroke`, using the color and width
/// set at that moment.
pub trait RenderTarget {
    /// Backing resolution as `(width, height)`
    fn size(&self) -> (u32, u32);

    /// Discard the pending path
    fn begin_path(&mut self);

    fn move_to(&mut self, point: Pos2);

    fn line_to(&mut self, point: Pos2);

    fn set_stroke_color(&mut self, color: Color32);

    fn set_stroke_width(&mut self, width: f32);

    /// Rasterize the pending path with the current stroke style
    fn stroke(&mut self);

    /// Reset every pixel to fully transparent
    fn clear(&mut self);
}

/// Transparent RGBA surface that strokes are rasterized onto.
pub struct PixelSurface {
    pixels: RgbaImage,
    subpaths: Vec<Vec<Pos2>>,
    stroke_color: Color32,
    stroke_width: f32,
    dirty: bool,
}

impl std::fmt::Debug for PixelSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelSurface")
            .field("size", &self.pixels.dimensions())
            .field("stroke_color", &self.stroke_color)
            .field("stroke_width", &self.stroke_width)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Default for PixelSurface {
    fn default() -> Self {
        Self::new(SURFACE_WIDTH, SURFACE_HEIGHT)
    }
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            subpaths: Vec::new(),
            stroke_color: Color32::BLACK,
            stroke_width: 1.0,
            // Start dirty so the first frame uploads a texture
            dirty: true,
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Returns whether the pixels changed since the last call, and resets the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn to_color_image(&self) -> ColorImage {
        let (width, height) = self.pixels.dimensions();
        ColorImage::from_rgba_unmultiplied([width as usize, height as usize], self.pixels.as_raw())
    }

    /// Rasterize one thick segment with round caps.
    ///
    /// Coverage comes from the distance between each pixel center and the
    /// segment, with a one pixel anti-aliased fringe.
    fn rasterize_segment(&mut self, from: Pos2, to: Pos2) {
        let radius = self.stroke_width / 2.0;
        let (width, height) = self.pixels.dimensions();

        let reach = radius + 1.0;
        let min_x = (from.x.min(to.x) - reach).floor().max(0.0);
        let min_y = (from.y.min(to.y) - reach).floor().max(0.0);
        let max_x = (from.x.max(to.x) + reach).ceil().min(width as f32);
        let max_y = (from.y.max(to.y) + reach).ceil().min(height as f32);
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        let [r, g, b, a] = self.stroke_color.to_srgba_unmultiplied();
        for y in min_y as u32..max_y as u32 {
            for x in min_x as u32..max_x as u32 {
                let center = pos2(x as f32 + 0.5, y as f32 + 0.5);
                let distance = distance_to_segment(center, from, to);
                let coverage = (radius - distance + 0.5).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let alpha = (a as f32 * coverage).round() as u8;
                blend_over(self.pixels.get_pixel_mut(x, y), [r, g, b, alpha]);
            }
        }
        self.dirty = true;
    }
}

impl RenderTarget for PixelSurface {
    fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, point: Pos2) {
        self.subpaths.push(vec![point]);
    }

    fn line_to(&mut self, point: Pos2) {
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push(point),
            // Like a canvas, a line without a current point only sets one
            None => self.subpaths.push(vec![point]),
        }
    }

    fn set_stroke_color(&mut self, color: Color32) {
        self.stroke_color = color;
    }

    fn set_stroke_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.stroke_width = width;
        }
    }

    fn stroke(&mut self) {
        let subpaths = std::mem::take(&mut self.subpaths);
        for subpath in &subpaths {
            for pair in subpath.windows(2) {
                self.rasterize_segment(pair[0], pair[1]);
            }
        }
        self.subpaths = subpaths;
    }

    fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
        self.subpaths.clear();
        self.dirty = true;
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let length_sq = ab.length_sq();
    if length_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Source-over blend of an unmultiplied color onto an unmultiplied pixel
fn blend_over(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let src_a = src[3] as f32 / 255.0;
    if src_a <= 0.0 {
        return;
    }
    let dst_a = dst.0[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let s = src[i] as f32;
        let d = dst.0[i] as f32;
        let value = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        out[i] = value.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    dst.0 = out;
}
