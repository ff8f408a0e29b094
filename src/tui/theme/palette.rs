//! Color palette

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color,
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub accent: Color,
    pub accent_alt: Color,
    pub border: Color,
    pub playing: Color,
    pub error: Color,
}

impl Palette {
    /// Grayscale with a warm accent for errors
    pub const MONO: Self = Self {
        bg_primary: Color::Rgb(0, 0, 0),          // #000000
        fg_primary: Color::Rgb(255, 255, 255),   // #ffffff
        fg_secondary: Color::Rgb(136, 136, 136), // #888888
        accent: Color::Rgb(255, 255, 255),       // #ffffff
        accent_alt: Color::Rgb(200, 200, 200),   // #c8c8c8
        border: Color::Rgb(64, 64, 64),          // #404040
        playing: Color::Rgb(255, 255, 255),      // #ffffff
        error: Color::Rgb(235, 111, 96),         // #eb6f60
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self::MONO
    }
}
