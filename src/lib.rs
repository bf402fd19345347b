#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod background;
pub mod brush;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod file_handler;
pub mod input;
pub mod panels;
pub mod stroke;
pub mod surface;

pub use app::AnnotatorApp;
pub use background::{BackgroundImage, SelectedFile};
pub use brush::{BrushColor, BrushSettings, LINE_WIDTH_RANGE};
pub use command::Command;
pub use config::AnnotatorConfig;
pub use controller::{DrawingController, map_to_surface};
pub use error::{AnnotatorError, AnnotatorResult};
pub use input::{InputHandler, PointerEvent, PointerSnapshot};
pub use stroke::{Segment, StrokeState};
pub use surface::{PixelSurface, RenderTarget, SURFACE_HEIGHT, SURFACE_WIDTH};
