//! Nerd Font icons for TUI display
//! Requires a Nerd Font to be installed (https://www.nerdfonts.com)

/// Icon set using Nerd Font glyphs
#[derive(Debug, Clone)]
pub struct Icons {
    // Playback controls
    pub play: &'static str,
    pub pause: &'static str,
    pub next: &'static str,
    pub prev: &'static str,

    // Volume
    pub volume_mute: &'static str,
    pub volume_low: &'static str,
    pub volume_high: &'static str,

    // Panels
    pub search: &'static str,
    pub help: &'static str,
    pub music: &'static str,
    pub lyrics: &'static str,

    // Status
    pub success: &'static str,
    pub error: &'static str,

    // Track metadata
    pub artist: &'static str,
    pub album: &'static str,
    pub image: &'static str,
    pub local: &'static str,

    // Progress bar
    pub progress_full: &'static str,
    pub progress_empty: &'static str,
    pub progress_head: &'static str,
}

impl Icons {
    /// Nerd Font icon set
    pub const fn nerd() -> Self {
        Self {
            play: "\u{f04b}",           // nf-fa-play
            pause: "\u{f04c}",          // nf-fa-pause
            next: "\u{f051}",           // nf-fa-step_forward
            prev: "\u{f048}",           // nf-fa-step_backward

            volume_mute: "\u{f026}",    // nf-fa-volume_off
            volume_low: "\u{f027}",     // nf-fa-volume_down
            volume_high: "\u{f028}",    // nf-fa-volume_up

            search: "\u{f002}",         // nf-fa-search
            help: "\u{f059}",           // nf-fa-question_circle
            music: "\u{f001}",          // nf-fa-music
            lyrics: "\u{f15c}",         // nf-fa-file_text_o

            success: "\u{f00c}",        // nf-fa-check
            error: "\u{f00d}",          // nf-fa-times

            artist: "\u{f007}",         // nf-fa-user
            album: "\u{f51f}",          // nf-md-album
            image: "\u{f03e}",          // nf-fa-picture_o
            local: "\u{f07b}",          // nf-fa-folder

            progress_full: "━",
            progress_empty: "─",
            progress_head: "●",
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self::nerd()
    }
}

/// Loading spinner frames
pub struct LoadingSpinner;

impl LoadingSpinner {
    /// Braille-based smooth spinner
    pub const BRAILLE: [&'static str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

    pub fn frame(tick: u64) -> &'static str {
        let idx = (tick / 4) as usize % Self::BRAILLE.len();
        Self::BRAILLE[idx]
    }
}
