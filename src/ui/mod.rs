pub mod surface;
pub mod tui;

pub use surface::{project_history, DisplaySurface};
pub use tui::ChatApp;
