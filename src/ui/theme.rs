//! cliclack theme

use cliclack::{Theme, ThemeState};
use console::Style;

/// Blue while a prompt is open, green once answered
#[derive(Debug, Clone, Copy, Default)]
pub struct ForgeTheme;

fn accent(state: &ThemeState, answered: Style) -> Style {
    match state {
        ThemeState::Active => Style::new().blue(),
        ThemeState::Error(_) => Style::new().red().bold(),
        ThemeState::Cancel => Style::new().dim(),
        ThemeState::Submit => answered,
    }
}

impl Theme for ForgeTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        accent(state, Style::new().dim())
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        accent(state, Style::new().green())
    }
}

pub fn init_theme() {
    cliclack::set_theme(ForgeTheme);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitted_prompt_differs_from_active() {
        let theme = ForgeTheme;
        assert_ne!(
            format!("{:?}", theme.state_symbol_color(&ThemeState::Active)),
            format!("{:?}", theme.state_symbol_color(&ThemeState::Submit)),
        );
    }
}
