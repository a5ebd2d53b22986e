pub mod banner;
pub mod console;
pub mod progress;
pub mod tui;

pub use console::ConsolePresenter;
pub use tui::{TuiInputPort, TuiOptions};

/// Prints the welcome banner and applies the theme for all subsequent inquire prompts.
/// Call once at startup (e.g. in main after tracing init).
pub fn init_ui() {
    banner::print_welcome();
    tui::apply_theme();
}
