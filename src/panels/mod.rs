mod central_panel;
mod settings_panel;

pub use central_panel::{central_panel, fit_rect};
pub use settings_panel::settings_panel;
