//! Now Playing widget - metadata, progress and transport state

use crate::app::state::{AppState, ToastKind};
use crate::player::{AudioElement, PlaybackController, TrackSource};
use crate::tui::theme::{get_theme, truncate_str, Icons};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render<A: AudioElement>(
    frame: &mut Frame,
    state: &mut AppState,
    player: &PlaybackController<A>,
    area: Rect,
) {
    let theme = get_theme();
    let icons = &theme.icons;
    let view = player.view();
    let player_state = player.state();

    let block = theme.panel(format!(" {} Now Playing ", icons.music), false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner)[1];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Artist
            Constraint::Length(1), // Cover
            Constraint::Length(1), // Background
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Progress bar
            Constraint::Length(1), // Time + controls + volume
            Constraint::Min(0),    // Toast
        ])
        .split(padded);

    let width = padded.width as usize;

    if player_state.source.is_none() {
        state.areas.progress_bar = None;
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Nothing loaded. Search for a track or press n for the local playlist.",
                Style::default().fg(theme.palette.fg_secondary),
            ))),
            rows[0],
        );
        render_toast(frame, state, icons, rows[7], width);
        return;
    }

    let origin = match player_state.source {
        Some(TrackSource::Local(i)) => {
            format!("{} {}/{} ", icons.local, i + 1, player.playlist().len())
        }
        _ => format!("{} ", icons.music),
    };
    let title_room = width.saturating_sub(origin.chars().count());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(origin, Style::default().fg(theme.palette.fg_secondary)),
            Span::styled(
                truncate_str(&view.title, title_room),
                Style::default()
                    .fg(theme.palette.fg_primary)
                    .add_modifier(Modifier::BOLD),
            ),
        ])),
        rows[0],
    );

    let meta = [
        (icons.artist, Some(view.artist.as_str())),
        (icons.album, view.cover.as_deref()),
        (icons.image, view.background.as_deref()),
    ];
    for ((icon, value), row) in meta.into_iter().zip(&rows[1..4]) {
        let value = value.filter(|v| !v.is_empty()).unwrap_or("-");
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{icon} "), Style::default().fg(theme.palette.fg_secondary)),
                Span::styled(
                    truncate_str(value, width.saturating_sub(2)),
                    Style::default().fg(theme.palette.fg_secondary),
                ),
            ])),
            *row,
        );
    }

    let progress = player.progress();
    state.areas.progress_bar = Some(rows[5]);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            progress_bar(rows[5].width as usize, progress.percent / 100.0, icons),
            Style::default().fg(theme.palette.accent),
        ))),
        rows[5],
    );

    // The affordance shows what pressing Space would do.
    let play_icon = if player_state.is_playing {
        icons.pause
    } else {
        icons.play
    };
    let volume = player.volume();
    let vol_icon = if volume == 0 {
        icons.volume_mute
    } else if volume < 50 {
        icons.volume_low
    } else {
        icons.volume_high
    };

    let controls = vec![
        Span::styled(
            format!("{}/{}", progress.elapsed, progress.total),
            Style::default().fg(theme.palette.fg_secondary),
        ),
        Span::raw(" "),
        Span::styled(icons.prev, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw(" "),
        Span::styled(play_icon, Style::default().fg(theme.palette.playing)),
        Span::raw(" "),
        Span::styled(icons.next, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw("  "),
        Span::styled(vol_icon, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw(" "),
        Span::styled(
            format!("{volume}%"),
            Style::default().fg(theme.palette.fg_secondary),
        ),
    ];
    frame.render_widget(Paragraph::new(Line::from(controls)), rows[6]);

    render_toast(frame, state, icons, rows[7], width);
}

fn render_toast(frame: &mut Frame, state: &AppState, icons: &Icons, area: Rect, width: usize) {
    let theme = get_theme();
    let Some(toast) = &state.toast else {
        return;
    };
    if toast.is_expired() {
        return;
    }
    let (prefix, color) = match toast.kind {
        ToastKind::Success => (icons.success, theme.palette.playing),
        ToastKind::Error => (icons.error, theme.palette.error),
    };
    let line = Line::from(vec![
        Span::styled(format!("{prefix} "), Style::default().fg(color)),
        Span::styled(
            truncate_str(&toast.message, width.saturating_sub(3)),
            Style::default().fg(color),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// `ratio` is clamped to `0.0..=1.0` by the caller.
fn progress_bar(width: usize, ratio: f64, icons: &Icons) -> String {
    if width < 3 {
        return String::new();
    }

    let filled = ((width - 1) as f64 * ratio).round() as usize;
    let empty = width.saturating_sub(filled + 1);

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..filled {
        bar.push_str(icons.progress_full);
    }
    bar.push_str(icons.progress_head);
    for _ in 0..empty {
        bar.push_str(icons.progress_empty);
    }
    bar
}
