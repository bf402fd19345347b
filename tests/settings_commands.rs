use egui::{Rect, pos2, vec2};
use image_annotator::{AnnotatorError, Command, DrawingController, SelectedFile};
use std::io::Cursor;
use std::sync::Arc;

fn png_file(name: &str, width: u32, height: u32) -> SelectedFile {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    SelectedFile::new(name, bytes.into_inner())
}

fn controller() -> DrawingController {
    let mut controller = DrawingController::default();
    controller.set_display_rect(Rect::from_min_size(pos2(0.0, 0.0), vec2(1600.0, 1200.0)));
    controller
}

#[test]
fn test_line_width_zero_is_rejected_after_five() {
    let mut controller = controller();
    controller.apply(&Command::SetLineWidth("5".to_owned())).unwrap();

    let result = controller.apply(&Command::SetLineWidth("0".to_owned()));
    assert!(matches!(result, Err(AnnotatorError::LineWidthOutOfRange(w)) if w == 0.0));
    assert_eq!(controller.brush().line_width(), 5.0);
}

#[test]
fn test_line_width_guard_is_a_conjunction() {
    let mut controller = controller();
    for text in ["-1", "0.99", "10.01", "1000", "NaN", "inf"] {
        assert!(controller.set_line_width_str(text).is_err(), "accepted {text}");
    }
    assert_eq!(controller.brush().line_width(), 1.0);

    for text in ["1", "2.5", "10"] {
        controller.set_line_width_str(text).unwrap();
    }
    assert_eq!(controller.brush().line_width(), 10.0);
}

#[test]
fn test_non_numeric_width_keeps_previous() {
    let mut controller = controller();
    controller.set_line_width(3.0).unwrap();
    let result = controller.apply(&Command::SetLineWidth("wide".to_owned()));
    assert!(matches!(result, Err(AnnotatorError::NonNumericLineWidth(_))));
    assert_eq!(controller.brush().line_width(), 3.0);
}

#[test]
fn test_invalid_color_keeps_previous() {
    let mut controller = controller();
    controller.apply(&Command::SetColor("#336699".to_owned())).unwrap();
    assert!(controller.apply(&Command::SetColor("#33669".to_owned())).is_err());
    assert!(controller.apply(&Command::SetColor(String::new())).is_err());
    assert_eq!(controller.brush().color().to_hex(), "#336699");
}

#[test]
fn test_empty_file_selection_is_ignored() {
    let mut controller = controller();
    controller.apply(&Command::SelectImage(Some(png_file("first.png", 2, 2)))).unwrap();
    let first_id = controller.background().unwrap().id();

    let result = controller.apply(&Command::SelectImage(None));
    assert!(matches!(result, Err(AnnotatorError::EmptyFileSelection)));
    assert_eq!(controller.background().unwrap().id(), first_id);
}

#[test]
fn test_undecodable_file_keeps_previous_image() {
    let mut controller = controller();
    controller.set_image(Some(&png_file("first.png", 2, 2))).unwrap();

    let broken = SelectedFile::new("broken.png", b"\x89PNG but not really".to_vec());
    assert!(matches!(
        controller.set_image(Some(&broken)),
        Err(AnnotatorError::ImageDecode(_))
    ));
    assert_eq!(controller.background().unwrap().name(), "first.png");
}

#[test]
fn test_new_image_replaces_and_releases_previous() {
    let mut controller = controller();
    controller.set_image(Some(&png_file("first.png", 4, 4))).unwrap();
    let first_pixels = Arc::clone(controller.background().unwrap().pixels());
    let first_id = controller.background().unwrap().id();

    // Draw something on the separate surface
    controller.begin_stroke(pos2(10.0, 10.0));
    controller.continue_stroke(pos2(100.0, 10.0));
    controller.end_stroke();
    let strokes = controller.target().pixels().clone();

    controller.set_image(Some(&png_file("second.png", 8, 6))).unwrap();
    let background = controller.background().unwrap();
    assert_ne!(background.id(), first_id);
    assert_eq!(background.name(), "second.png");
    assert_eq!(background.size(), vec2(8.0, 6.0));

    // Only our clone still holds the old pixels
    assert_eq!(Arc::strong_count(&first_pixels), 1);
    assert_eq!(controller.target().pixels(), &strokes);
}

#[test]
fn test_clear_image_releases_background() {
    let mut controller = controller();
    controller.set_image(Some(&png_file("photo.png", 3, 3))).unwrap();
    let pixels = Arc::clone(controller.background().unwrap().pixels());

    controller.clear_image();
    assert!(controller.background().is_none());
    assert_eq!(Arc::strong_count(&pixels), 1);
}

#[test]
fn test_controller_from_config() {
    let config = image_annotator::AnnotatorConfig::from_json(
        r##"{
            "surface_width": 800,
            "surface_height": 600,
            "default_color": "#ff8800",
            "default_line_width": 4
        }"##,
    )
    .unwrap();
    let controller = DrawingController::from_config(&config);
    assert_eq!(controller.target().pixels().dimensions(), (800, 600));
    assert_eq!(controller.brush().color().to_hex(), "#ff8800");
    assert_eq!(controller.brush().line_width(), 4.0);
}

#[test]
fn test_background_fits_max_texture_side() {
    let mut controller = controller();
    controller.set_max_image_side(300);
    controller.set_image(Some(&png_file("wide.png", 9000, 2))).unwrap();
    assert_eq!(controller.background().unwrap().size(), vec2(300.0, 1.0));

    // Larger GPUs still never go past the default limit
    controller.set_max_image_side(100_000);
    assert_eq!(controller.max_image_side(), 4096);
}

#[test]
fn test_load_image_from_typed_path() {
    let mut app = image_annotator::AnnotatorApp::default();
    let file = png_file("typed.png", 8, 6);
    let path = std::env::temp_dir().join(format!("annotator_typed_{}.png", std::process::id()));
    std::fs::write(&path, &*file.bytes).unwrap();

    *app.image_path_text_mut() = path.display().to_string();
    app.load_image_path();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(app.controller().background().unwrap().size(), vec2(8.0, 6.0));
    assert!(app.image_error().is_none());

    // Missing file and blank path both keep the loaded image
    app.load_image_path();
    assert!(app.image_error().is_some());
    app.image_path_text_mut().clear();
    app.load_image_path();
    assert!(matches!(app.image_error(), Some(msg) if !msg.is_empty()));
    assert!(app.controller().background().is_some());
}
