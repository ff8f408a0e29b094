//! Root layout widget
//!
//! ┌ Search ───────────────┬ Now Playing ──────────┐
//! │ Query                 │ title / artist / art  │
//! │ results               │ progress, controls    │
//! │                       ├ Lyrics ───────────────┤
//! │                       │                       │
//! └───────────────────────┴───────────────────────┘
//!  status line

use crate::app::state::AppState;
use crate::player::{AudioElement, PlaybackController};
use crate::tui::theme::{get_theme, truncate_str};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{help, lyrics, now_playing, search};

pub fn render<A: AudioElement>(frame: &mut Frame, state: &mut AppState, player: &PlaybackController<A>) {
    let theme = get_theme();
    let root = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(1)])
        .split(root);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(3)])
        .split(cols[1]);

    search::render(frame, state, cols[0]);
    now_playing::render(frame, state, player, right[0]);
    lyrics::render(frame, state, &player.view().lyrics, right[1]);

    let status = Line::from(vec![
        Span::styled(
            " ? help ",
            Style::default()
                .fg(theme.palette.bg_primary)
                .bg(theme.palette.accent_alt),
        ),
        Span::raw(" "),
        Span::styled(
            truncate_str(&state.status, rows[1].width.saturating_sub(10) as usize),
            Style::default().fg(theme.palette.fg_secondary),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), rows[1]);

    if state.show_help {
        help::render(frame, root);
    }
}
