use egui::{TextureHandle, TextureId, TextureOptions, Vec2};

use crate::command::Command;
use crate::config::AnnotatorConfig;
use crate::controller::DrawingController;
use crate::file_handler::FileHandler;
use crate::input::InputHandler;
use crate::panels::{central_panel, settings_panel};

pub struct AnnotatorApp {
    controller: DrawingController,
    input: InputHandler,
    file_handler: FileHandler,
    surface_texture: Option<TextureHandle>,
    /// Texture of the current background, tagged with the image id it mirrors
    background_texture: Option<(usize, TextureHandle)>,
    line_width_text: String,
    line_width_error: Option<String>,
    /// Path typed into the settings panel (native only)
    image_path_text: String,
    image_error: Option<String>,
}

impl Default for AnnotatorApp {
    fn default() -> Self {
        Self::with_config(&AnnotatorConfig::default())
    }
}

impl AnnotatorApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_config(&AnnotatorConfig::from_env())
    }

    pub fn with_config(config: &AnnotatorConfig) -> Self {
        let controller = DrawingController::from_config(config);
        let line_width_text = controller.brush().line_width().to_string();
        Self {
            controller,
            input: InputHandler::new(),
            file_handler: FileHandler::new(),
            surface_texture: None,
            background_texture: None,
            line_width_text,
            line_width_error: None,
            image_path_text: String::new(),
            image_error: None,
        }
    }

    pub fn controller(&self) -> &DrawingController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut DrawingController {
        &mut self.controller
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    pub fn line_width_text_mut(&mut self) -> &mut String {
        &mut self.line_width_text
    }

    pub fn line_width_error(&self) -> Option<&str> {
        self.line_width_error.as_deref()
    }

    pub fn image_path_text_mut(&mut self) -> &mut String {
        &mut self.image_path_text
    }

    pub fn image_error(&self) -> Option<&str> {
        self.image_error.as_deref()
    }

    /// Load the background from the typed path. A blank path is an empty selection.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_image_path(&mut self) {
        let path = self.image_path_text.trim();
        let selection = if path.is_empty() {
            None
        } else {
            match FileHandler::read_path(std::path::Path::new(path)) {
                Ok(file) => Some(file),
                Err(err) => {
                    log::warn!("Cannot read {}: {}", path, err);
                    self.image_error = Some(err.to_string());
                    return;
                }
            }
        };
        self.execute_command(Command::SelectImage(selection));
    }

    /// Apply a settings command, logging rejections
    pub fn execute_command(&mut self, command: Command) {
        let result = self.controller.apply(&command);
        if let Err(err) = &result {
            log::warn!("{} rejected: {}", command.name(), err);
        }
        match command {
            Command::SetLineWidth(_) => {
                self.line_width_error = result.err().map(|err| err.to_string());
            }
            Command::SelectImage(_) => {
                self.image_error = result.err().map(|err| err.to_string());
            }
            Command::SetColor(_) => {}
        }
    }

    /// Texture of the drawing surface, re-uploaded when its pixels changed
    pub fn surface_texture(&mut self, ctx: &egui::Context) -> TextureId {
        let surface = self.controller.target_mut();
        let dirty = surface.take_dirty();
        match &mut self.surface_texture {
            Some(handle) => {
                if dirty {
                    handle.set(surface.to_color_image(), TextureOptions::LINEAR);
                }
                handle.id()
            }
            None => {
                let handle = ctx.load_texture(
                    "drawing_surface",
                    surface.to_color_image(),
                    TextureOptions::LINEAR,
                );
                let id = handle.id();
                self.surface_texture = Some(handle);
                id
            }
        }
    }

    /// Texture and pixel size of the background image, if one is loaded.
    ///
    /// The previous texture is dropped (freeing it) once the image changes.
    pub fn background_texture(&mut self, ctx: &egui::Context) -> Option<(TextureId, Vec2)> {
        let Some(image) = self.controller.background() else {
            self.background_texture = None;
            return None;
        };

        let stale = self
            .background_texture
            .as_ref()
            .map_or(true, |(id, _)| *id != image.id());
        if stale {
            let handle = ctx.load_texture(
                format!("background_{}", image.id()),
                image.pixels().as_ref().clone(),
                TextureOptions::LINEAR,
            );
            self.background_texture = Some((image.id(), handle));
        }

        let size = image.size();
        self.background_texture.as_ref().map(|(_, handle)| (handle.id(), size))
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        self.file_handler.preview_files_being_dropped(ctx);
        if self.file_handler.check_for_dropped_files(ctx) {
            let selection = self.file_handler.take_selection();
            self.execute_command(Command::SelectImage(selection));
        }
    }
}

impl eframe::App for AnnotatorApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Backgrounds must fit in a single GPU texture
        let max_side = ctx.input(|i| i.max_texture_side);
        self.controller
            .set_max_image_side(u32::try_from(max_side).unwrap_or(u32::MAX));
        self.handle_dropped_files(ctx);
        settings_panel(self, ctx);
        central_panel(self, ctx);
    }
}
