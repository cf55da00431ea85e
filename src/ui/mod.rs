mod terminal;
mod ui_text;

pub use terminal::{render_history, render_outcome, render_sizing, spawn_progress_bar};
pub use ui_text::{UI_TEXT, UiText};
