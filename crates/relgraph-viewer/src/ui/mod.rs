pub mod info;
pub mod panel;

pub use info::info_window;
pub use panel::ui_panel;
