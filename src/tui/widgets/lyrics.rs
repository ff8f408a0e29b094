use crate::app::state::AppState;
use crate::player::LyricsPanel;
use crate::tui::theme::{get_theme, LoadingSpinner};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, state: &mut AppState, panel: &LyricsPanel, area: Rect) {
    let theme = get_theme();

    let block = theme.panel(format!(" {} Lyrics ", theme.icons.lyrics), false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let dim = Style::default().fg(theme.palette.fg_secondary);
    let paragraph = match panel {
        LyricsPanel::Empty => Paragraph::new(""),
        LyricsPanel::Loading => Paragraph::new(Line::from(format!(
            "{} Loading lyrics...",
            LoadingSpinner::frame(state.tick)
        )))
        .style(dim)
        .alignment(Alignment::Center),
        LyricsPanel::Notice(msg) => Paragraph::new(Line::from(msg.as_str()))
            .style(dim)
            .alignment(Alignment::Center),
        LyricsPanel::Lyrics(text) => {
            let lines: Vec<Line> = text.lines().map(Line::from).collect();
            // Wrapped rows only add to the count, so this never hides the last line.
            let max_scroll = lines.len().saturating_sub(1) as u16;
            state.lyrics_scroll = state.lyrics_scroll.min(max_scroll);
            Paragraph::new(lines)
                .style(Style::default().fg(theme.palette.fg_primary))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .scroll((state.lyrics_scroll, 0))
        }
    };
    frame.render_widget(paragraph, inner);
}
