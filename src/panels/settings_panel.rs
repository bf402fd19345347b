use crate::AnnotatorApp;
use crate::brush::BrushColor;
use crate::command::Command;

pub fn settings_panel(app: &mut AnnotatorApp, ctx: &egui::Context) {
    egui::SidePanel::left("settings_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Image Editor");
            ui.separator();

            // Image selection
            ui.strong("Drop an image file onto the window to annotate it.");
            #[cfg(not(target_arch = "wasm32"))]
            {
                ui.label("Or enter its path:");
                ui.horizontal(|ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(app.image_path_text_mut())
                            .hint_text("/path/to/image.png")
                            .desired_width(140.0),
                    );
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Load").clicked() || submitted {
                        app.load_image_path();
                    }
                });
            }
            if let Some(error) = app.image_error() {
                ui.colored_label(ui.visuals().warn_fg_color, error);
            }
            let image_name = app.controller().background().map(|image| image.name().to_owned());
            match image_name {
                Some(name) => {
                    ui.label(format!("Image: {}", name));
                    if ui.button("Remove image").clicked() {
                        app.controller_mut().clear_image();
                    }
                }
                None => {
                    ui.weak("No image loaded");
                }
            }

            ui.separator();

            // Line width
            ui.label("Choose line width between 1-10:");
            let response = ui.add(
                egui::TextEdit::singleline(app.line_width_text_mut()).desired_width(60.0),
            );
            if response.changed() {
                let text = app.line_width_text_mut().clone();
                app.execute_command(Command::SetLineWidth(text));
            }
            if let Some(error) = app.line_width_error() {
                ui.colored_label(ui.visuals().warn_fg_color, error);
            }

            ui.separator();

            // Color picker
            ui.horizontal(|ui| {
                ui.label("Choose drawer color:");
                let mut color = app.controller().brush().color().color32();
                let changed = egui::color_picker::color_edit_button_srgba(
                    ui,
                    &mut color,
                    egui::color_picker::Alpha::Opaque,
                )
                .changed();
                if changed {
                    let hex = BrushColor::from_color32(color).to_hex();
                    app.execute_command(Command::SetColor(hex));
                }
            });
            ui.label(format!("Current: {}", app.controller().brush().color()));

            ui.separator();

            if ui.button("Clear drawing").clicked() {
                app.controller_mut().clear_surface();
            }

            ui.separator();
            ui.horizontal(|ui| {
                ui.label("State:");
                ui.label(app.controller().stroke_state().name());
            });
        });
}
