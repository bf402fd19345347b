use eframe::egui;

use crate::background::SelectedFile;
#[cfg(not(target_arch = "wasm32"))]
use crate::error::AnnotatorResult;

/// Collects files dropped onto the window and turns them into image selections
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up any newly dropped files from the UI context.
    /// Returns true if there is something to process.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
            }
        });
        !self.dropped_files.is_empty()
    }

    /// Take the most recently dropped image file.
    ///
    /// Returns `None` when nothing usable was dropped; non-image files are skipped.
    pub fn take_selection(&mut self) -> Option<SelectedFile> {
        let files = std::mem::take(&mut self.dropped_files);
        files
            .iter()
            .rev()
            .filter(|file| {
                let is_image = is_image_file(file);
                if !is_image {
                    log::warn!("Dropped file is not a supported type: {}", display_name(file));
                }
                is_image
            })
            .find_map(read_file)
    }

    /// Read an image file picked by path from the settings panel
    #[cfg(not(target_arch = "wasm32"))]
    pub fn read_path(path: &std::path::Path) -> AnnotatorResult<SelectedFile> {
        let bytes = std::fs::read(path)?;
        log::info!("Read image from path: {} ({} bytes)", path.display(), bytes.len());
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(SelectedFile::new(name, bytes))
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Dropping image:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else if !file.mime.is_empty() {
                    text += &format!("\n{}", file.mime);
                } else {
                    text += "\n(Path not available)";
                }
            }
            text
        });

        let layer = LayerId::new(Order::Foreground, Id::new("file_drop_target"));
        let painter = ctx.layer_painter(layer);
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
pub fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = match &file.path {
        Some(path) => path.to_string_lossy().into_owned(),
        None => file.name.clone(),
    };
    match name.rsplit_once('.') {
        Some((_, ext)) => matches!(
            ext.to_lowercase().as_str(),
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"
        ),
        None => false,
    }
}

fn read_file(file: &egui::DroppedFile) -> Option<SelectedFile> {
    let name = display_name(file);

    if let Some(bytes) = &file.bytes {
        log::info!("Reading image from memory: {} ({} bytes)", name, bytes.len());
        return Some(SelectedFile::new(name, bytes.clone()));
    }

    // For WASM, we can't read from the filesystem
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Some(path) = &file.path {
            log::info!("Reading image from path: {}", path.display());
            return match std::fs::read(path) {
                Ok(bytes) => Some(SelectedFile::new(name, bytes)),
                Err(err) => {
                    log::error!("Failed to read image file: {}: {}", path.display(), err);
                    None
                }
            };
        }
    }

    log::warn!("Dropped file has no accessible data: {}", name);
    None
}
