//! Custom theme for cliclack prompts

use cliclack::ThemeState;
use console::Style;

/// Blue-accented theme for repolens prompts and spinners
#[derive(Debug, Clone, Default)]
pub struct LensTheme;

impl cliclack::Theme for LensTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().blue(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Submit => Style::new().blue().dim(),
        }
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().blue(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Submit => Style::new().green(),
        }
    }
}

/// Install the theme for all cliclack output
pub fn init_theme() {
    cliclack::set_theme(LensTheme);
}
