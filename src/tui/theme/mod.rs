//! Theme configuration

pub mod icons;
pub mod palette;

pub use icons::{Icons, LoadingSpinner};
pub use palette::Palette;

#[derive(Debug, Clone)]
pub struct Theme {
    pub palette: Palette,
    pub icons: Icons,
}

impl Theme {
    pub fn new() -> Self {
        Self {
            palette: Palette::MONO,
            icons: Icons::nerd(),
        }
    }

    pub fn border_set(&self) -> ratatui::symbols::border::Set<'static> {
        ratatui::symbols::border::ROUNDED
    }

    /// Bordered panel with an icon title, as every panel is drawn.
    pub fn panel<'a>(&self, title: String, focused: bool) -> ratatui::widgets::Block<'a> {
        use ratatui::style::Style;
        use ratatui::widgets::{Block, Borders};

        let border = if focused {
            self.palette.accent
        } else {
            self.palette.border
        };
        Block::default()
            .borders(Borders::ALL)
            .border_set(self.border_set())
            .border_style(Style::default().fg(border))
            .title(title)
            .title_style(Style::default().fg(self.palette.accent))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

pub fn get_theme() -> Theme {
    Theme::new()
}

/// Cut `s` to `max_len` characters, marking the cut with an ellipsis.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let char_count: usize = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("Harder Better", 20), "Harder Better");
        assert_eq!(truncate_str("Harder Better", 9), "Harder...");
        assert_eq!(truncate_str("Harder", 2), "Ha");
        assert_eq!(truncate_str("Harder", 0), "");
    }
}
