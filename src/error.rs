use thiserror::Error;

/// Errors produced while applying settings or loading configuration.
///
/// Every rejection leaves the previously accepted value in place.
#[derive(Error, Debug)]
pub enum AnnotatorError {
    #[error("No file was selected")]
    EmptyFileSelection,
    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("Invalid color value: {0:?}")]
    InvalidColor(String),
    #[error("Line width {0} is outside the allowed range 1-10")]
    LineWidthOutOfRange(f32),
    #[error("Line width must be a number, got {0:?}")]
    NonNumericLineWidth(String),
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AnnotatorResult<T> = Result<T, AnnotatorError>;
