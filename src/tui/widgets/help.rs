//! Keybinding overlay

use crate::tui::theme::{get_theme, Theme};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, area: Rect) {
    let theme = get_theme();
    let popup = centered(area, 72, 20);
    frame.render_widget(Clear, popup);

    let block = theme.panel(format!(" {} Keybinds ", theme.icons.help), true);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let left = vec![
        section_header("Search", &theme),
        keybind("/ or i", "Focus search bar", &theme),
        keybind("Enter", "Run search", &theme),
        keybind("Ctrl+u", "Clear input", &theme),
        keybind("Esc / Tab", "Focus results", &theme),
        Line::default(),
        section_header("Results", &theme),
        keybind("j / Down", "Move down", &theme),
        keybind("k / Up", "Move up", &theme),
        keybind("g / G", "Top / bottom", &theme),
        keybind("Enter", "Play selected", &theme),
        keybind("Click", "Play row", &theme),
    ];

    let right = vec![
        section_header("Playback", &theme),
        keybind("Space", "Play / pause", &theme),
        keybind("n / p", "Next / previous local", &theme),
        keybind("] / [", "Seek 10s", &theme),
        keybind("+ / -", "Volume", &theme),
        keybind("Click bar", "Seek to point", &theme),
        keybind("PgUp/PgDn", "Scroll lyrics", &theme),
        Line::default(),
        section_header("General", &theme),
        keybind("?", "Toggle this help", &theme),
        keybind("q / Esc", "Quit", &theme),
    ];

    frame.render_widget(Paragraph::new(left).wrap(Wrap { trim: false }), cols[0]);
    frame.render_widget(Paragraph::new(right).wrap(Wrap { trim: false }), cols[1]);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn section_header(title: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![Span::styled(
        format!("━━ {} ━━", title),
        Style::default()
            .fg(theme.palette.accent)
            .add_modifier(Modifier::BOLD),
    )])
}

fn keybind(key: &str, desc: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("  ", Style::default()),
        Span::styled(
            format!("{:11}", key),
            Style::default()
                .fg(theme.palette.accent_alt)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc.to_string(), Style::default().fg(theme.palette.fg_primary)),
    ])
}
