use crate::background::SelectedFile;
use crate::controller::DrawingController;
use crate::error::AnnotatorResult;
use crate::surface::RenderTarget;

/// Configuration updates emitted by the settings panel
#[derive(Debug, Clone)]
pub enum Command {
    /// A file was picked; `None` when the selection came back empty
    SelectImage(Option<SelectedFile>),
    /// Hex color from the color picker
    SetColor(String),
    /// Raw text of the line width field
    SetLineWidth(String),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::SelectImage(_) => "SelectImage",
            Command::SetColor(_) => "SetColor",
            Command::SetLineWidth(_) => "SetLineWidth",
        }
    }

    /// Apply to the controller; rejected values leave its state unchanged
    pub fn execute<R: RenderTarget>(
        &self,
        controller: &mut DrawingController<R>,
    ) -> AnnotatorResult<()> {
        match self {
            Command::SelectImage(file) => controller.set_image(file.as_ref()),
            Command::SetColor(hex) => controller.set_color(hex),
            Command::SetLineWidth(text) => controller.set_line_width_str(text),
        }
    }
}
