//! Search box and the results list under it

use crate::app::state::{AppState, ResultsPanel, SearchFocus};
use crate::tui::theme::{get_theme, truncate_str, LoadingSpinner};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();

    let block = theme.panel(
        format!(" {} Search ", theme.icons.search),
        state.search_focus == SearchFocus::Results,
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    render_search_box(frame, state, rows[0]);
    render_results(frame, state, rows[1]);
}

fn render_search_box(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let is_focused = state.search_focus == SearchFocus::Input;

    let block = theme.panel(" Query ".to_string(), is_focused);

    let prompt = if state.search.panel == ResultsPanel::Loading {
        format!("{} {}", state.search.query, LoadingSpinner::frame(state.tick))
    } else {
        let cursor = if is_focused { "▏" } else { "" };
        format!("{}{}", state.search.query, cursor)
    };

    let p = Paragraph::new(Line::from(prompt))
        .style(Style::default().fg(theme.palette.fg_primary))
        .block(block);
    frame.render_widget(p, area);
}

fn render_results(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();

    let notice = match &state.search.panel {
        ResultsPanel::Idle => Some("Type a query and press Enter".to_string()),
        ResultsPanel::Loading => Some(format!("{} Searching...", LoadingSpinner::frame(state.tick))),
        ResultsPanel::NoResults => Some("No results found".to_string()),
        ResultsPanel::Error(msg) => Some(format!("Search failed: {msg}")),
        ResultsPanel::Results(_) => None,
    };
    if let Some(text) = notice {
        state.areas.results = None;
        let style = match state.search.panel {
            ResultsPanel::Error(_) => Style::default().fg(theme.palette.error),
            _ => Style::default().fg(theme.palette.fg_secondary),
        };
        frame.render_widget(Paragraph::new(Line::from(text)).style(style), area);
        return;
    }

    state.areas.results = Some(area);

    let visible_height = area.height as usize;
    state.search.update_scroll(visible_height);
    let scroll_offset = state.search.scroll_offset;
    let selected = state.search.selected;
    // Leave room for the highlight symbol.
    let width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = state
        .search
        .tracks()
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_height)
        .map(|(i, track)| {
            let title_style = if i == selected {
                Style::default()
                    .fg(theme.palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.palette.fg_primary)
            };
            let title = truncate_str(track.display_title(), width);
            let artist_room = width.saturating_sub(title.chars().count() + 3);
            ListItem::new(Line::from(vec![
                Span::styled(title, title_style),
                Span::styled(
                    format!(" - {}", truncate_str(&track.artist_name, artist_room)),
                    Style::default().fg(theme.palette.fg_secondary),
                ),
            ]))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(selected.saturating_sub(scroll_offset)));

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(theme.palette.bg_primary)
                .bg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("\u{f054} "); // nf-fa-chevron_right

    frame.render_stateful_widget(list, area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SearchOutcome, TrackSummary};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn track(id: u64, title: &str) -> TrackSummary {
        TrackSummary {
            id,
            title: title.into(),
            short_title: None,
            artist_name: "Daft Punk".into(),
            cover_small: None,
            cover_medium: None,
            cover_big: None,
            preview_url: String::new(),
        }
    }

    fn searched(outcome: SearchOutcome) -> AppState {
        let mut state = AppState::new();
        state.search.query = "daft".into();
        let (id, _) = state.search.begin().unwrap();
        state.search.finish(id, outcome);
        state
    }

    #[test]
    fn test_results_are_listed_and_hit_area_recorded() {
        let mut state = searched(SearchOutcome::Results(vec![
            track(1, "One More Time"),
            track(2, "Aerodynamic"),
        ]));
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, &mut state, area)
            })
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("One More Time"));
        assert!(text.contains("Aerodynamic - Daft Punk"));
        assert!(state.areas.results.is_some());
    }

    #[test]
    fn test_empty_and_error_notices_differ() {
        let mut empty = searched(SearchOutcome::NoResults);
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, &mut empty, area)
            })
            .unwrap();
        assert!(screen_text(&terminal).contains("No results found"));
        assert!(empty.areas.results.is_none());

        let mut failed = searched(SearchOutcome::Failed("timed out".into()));
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, &mut failed, area)
            })
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Search failed: timed out"));
        assert!(!text.contains("No results found"));
    }
}
