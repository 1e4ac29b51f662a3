//! Terminal output helpers
//!
//! Uses `cliclack` for framed output, spinners and prompts, falling back
//! to plain lines when not attached to an interactive terminal. Commands
//! whose stdout is data (`cat`, `path`, JSON formats) do not go through
//! these helpers.

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    format_size, intro, key_value, remark, step_error_detail, step_info, step_ok,
    step_ok_detail, step_warn_hint,
};
pub use progress::TaskSpinner;
pub use prompts::confirm;
pub use theme::{init_theme, LensTheme};
