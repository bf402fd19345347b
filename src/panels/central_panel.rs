use egui::{Color32, Rect, Vec2, pos2};

use crate::AnnotatorApp;
use crate::surface::RenderTarget;

/// UV rect covering a whole texture
const FULL_UV: Rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));

pub fn central_panel(app: &mut AnnotatorApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (width, height) = app.controller().target().size();
        let surface_size = Vec2::new(width as f32, height as f32);

        // The region only claims drags so the panel never scrolls under the pen
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());
        let surface_rect = fit_rect(response.rect, surface_size);
        app.controller_mut().set_display_rect(surface_rect);

        // Handle input; popups such as the color picker sit on their own layer
        let events = app.input_mut().process_input(ctx, surface_rect, ui.layer_id());
        for event in &events {
            app.controller_mut().handle_pointer_event(event);
        }

        painter.rect_filled(surface_rect, 0.0, ui.visuals().extreme_bg_color);

        // Background image underneath, drawing surface on top
        if let Some((texture, image_size)) = app.background_texture(ctx) {
            painter.image(texture, fit_rect(surface_rect, image_size), FULL_UV, Color32::WHITE);
        }
        let surface_texture = app.surface_texture(ctx);
        painter.image(surface_texture, surface_rect, FULL_UV, Color32::WHITE);

        if app.controller().is_drawing() {
            ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
        }
    });
}

/// Largest rect with the aspect ratio of `content` centered inside `outer`
pub fn fit_rect(outer: Rect, content: Vec2) -> Rect {
    if content.x <= 0.0 || content.y <= 0.0 {
        return outer;
    }
    let scale = (outer.width() / content.x).min(outer.height() / content.y);
    Rect::from_center_size(outer.center(), content * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_rect_letterboxes() {
        let outer = Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(1000.0, 300.0));
        let fitted = fit_rect(outer, Vec2::new(1600.0, 1200.0));
        assert_eq!(fitted.size(), Vec2::new(400.0, 300.0));
        assert_eq!(fitted.center(), outer.center());
    }

    #[test]
    fn test_fit_rect_degenerate_content() {
        let outer = Rect::from_min_size(pos2(5.0, 5.0), Vec2::new(10.0, 10.0));
        assert_eq!(fit_rect(outer, Vec2::ZERO), outer);
    }
}
