use egui::{Pos2, Rect, pos2};

use crate::background::{BackgroundImage, DEFAULT_MAX_IMAGE_SIDE, SelectedFile};
use crate::brush::{BrushColor, BrushSettings};
use crate::command::Command;
use crate::config::AnnotatorConfig;
use crate::error::{AnnotatorError, AnnotatorResult};
use crate::input::PointerEvent;
use crate::stroke::{Segment, StrokeState};
use crate::surface::{PixelSurface, RenderTarget};

/// Owns brush settings, pointer tracking and the rendering target, and turns
/// pointer events into rendered line segments.
pub struct DrawingController<R: RenderTarget = PixelSurface> {
    brush: BrushSettings,
    stroke: StrokeState,
    background: Option<BackgroundImage>,
    target: R,
    /// On-screen rect of the drawing surface, in viewport coordinates
    display_rect: Option<Rect>,
    /// Decoded backgrounds are downscaled to fit this many pixels per side
    max_image_side: u32,
}

impl<R: RenderTarget + std::fmt::Debug> std::fmt::Debug for DrawingController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingController")
            .field("brush", &self.brush)
            .field("stroke", &self.stroke)
            .field("background", &self.background)
            .field("target", &self.target)
            .field("display_rect", &self.display_rect)
            .field("max_image_side", &self.max_image_side)
            .finish()
    }
}

impl Default for DrawingController<PixelSurface> {
    fn default() -> Self {
        Self::new(PixelSurface::default())
    }
}

impl DrawingController<PixelSurface> {
    pub fn from_config(config: &AnnotatorConfig) -> Self {
        let (width, height) = config.surface_size();
        let mut controller = Self::new(PixelSurface::new(width, height));
        controller.brush = config.brush_settings();
        controller
    }
}

impl<R: RenderTarget> DrawingController<R> {
    pub fn new(target: R) -> Self {
        Self {
            brush: BrushSettings::default(),
            stroke: StrokeState::default(),
            background: None,
            target,
            display_rect: None,
            max_image_side: DEFAULT_MAX_IMAGE_SIDE,
        }
    }

    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }

    pub fn stroke_state(&self) -> &StrokeState {
        &self.stroke
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_drawing()
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut R {
        &mut self.target
    }

    pub fn display_rect(&self) -> Option<Rect> {
        self.display_rect
    }

    /// Record where the surface is currently laid out on screen
    pub fn set_display_rect(&mut self, rect: Rect) {
        self.display_rect = Some(rect);
    }

    pub fn max_image_side(&self) -> u32 {
        self.max_image_side
    }

    /// Limit the size of backgrounds decoded from now on, e.g. to the GPU's
    /// maximum texture side. Never raised above [`DEFAULT_MAX_IMAGE_SIDE`].
    pub fn set_max_image_side(&mut self, side: u32) {
        self.max_image_side = side.clamp(1, DEFAULT_MAX_IMAGE_SIDE);
    }

    pub fn apply(&mut self, command: &Command) -> AnnotatorResult<()> {
        command.execute(self)
    }

    /// Decode and store a new background, releasing the previous one.
    ///
    /// On failure the current background is kept.
    pub fn set_image(&mut self, file: Option<&SelectedFile>) -> AnnotatorResult<()> {
        let file = file.ok_or(AnnotatorError::EmptyFileSelection)?;
        let image = BackgroundImage::decode_within(file, self.max_image_side)?;
        let size = image.size();
        log::info!("Background image set to {} ({}x{})", image.name(), size.x, size.y);
        // Assigning drops the old image
        self.background = Some(image);
        Ok(())
    }

    /// Release the background image, if any
    pub fn clear_image(&mut self) {
        if self.background.take().is_some() {
            log::debug!("Background image cleared");
        }
    }

    pub fn set_color(&mut self, hex: &str) -> AnnotatorResult<()> {
        let color: BrushColor = hex.parse()?;
        self.brush.set_color(color);
        log::debug!("Brush color set to {}", color);
        Ok(())
    }

    pub fn set_line_width(&mut self, width: f32) -> AnnotatorResult<()> {
        self.brush.set_line_width(width)?;
        log::debug!("Brush width set to {}", width);
        Ok(())
    }

    pub fn set_line_width_str(&mut self, text: &str) -> AnnotatorResult<()> {
        self.brush.set_line_width_str(text)?;
        log::debug!("Brush width set to {}", self.brush.line_width());
        Ok(())
    }

    /// Convert viewport coordinates into backing surface coordinates.
    ///
    /// Returns `None` until a display rect with positive area is known.
    pub fn map_to_surface_coordinates(&self, client: Pos2) -> Option<Pos2> {
        let rect = self.display_rect?;
        map_to_surface(client, rect, self.target.size())
    }

    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down { position } => self.begin_stroke(position),
            PointerEvent::Move { position } => self.continue_stroke(position),
            PointerEvent::Up { .. } | PointerEvent::Leave => self.end_stroke(),
        }
    }

    /// Enter the drawing state at the pointer position. Renders nothing.
    pub fn begin_stroke(&mut self, client: Pos2) {
        let Some(point) = self.map_to_surface_coordinates(client) else {
            return;
        };
        self.stroke.press(point);
        log::debug!("Stroke started at ({:.1}, {:.1})", point.x, point.y);
    }

    /// Track the pointer, rendering a segment when a stroke is active
    pub fn continue_stroke(&mut self, client: Pos2) {
        let Some(point) = self.map_to_surface_coordinates(client) else {
            return;
        };
        if let Some(segment) = self.stroke.advance(point) {
            self.render_segment(segment);
        }
    }

    pub fn end_stroke(&mut self) {
        if self.stroke.is_drawing() {
            log::debug!("Stroke ended");
        }
        self.stroke.release();
    }

    /// Erase every rendered stroke
    pub fn clear_surface(&mut self) {
        self.target.clear();
        log::debug!("Drawing surface cleared");
    }

    fn render_segment(&mut self, segment: Segment) {
        let target = &mut self.target;
        target.begin_path();
        target.move_to(segment.from);
        target.line_to(segment.to);
        target.set_stroke_width(self.brush.line_width());
        target.set_stroke_color(self.brush.color().color32());
        target.stroke();
    }
}

/// Scale a viewport position inside `rect` to a surface of `backing` size
pub fn map_to_surface(client: Pos2, rect: Rect, backing: (u32, u32)) -> Option<Pos2> {
    if !(rect.width() > 0.0 && rect.height() > 0.0) {
        return None;
    }
    let scale_x = backing.0 as f32 / rect.width();
    let scale_y = backing.1 as f32 / rect.height();
    Some(pos2(
        (client.x - rect.left()) * scale_x,
        (client.y - rect.top()) * scale_y,
    ))
}
