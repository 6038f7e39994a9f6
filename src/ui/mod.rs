pub mod layout;
mod menu;
mod quiz;
mod start;
mod summary;

pub use layout::{calculate_menu_chunks, calculate_quiz_chunks, calculate_summary_chunks};
pub use menu::{draw_learning_path, draw_menu, MenuItem};
pub use quiz::{draw_quit_confirmation, draw_quiz};
pub use start::draw_start;
pub use summary::{draw_summary, format_attempt_date};
