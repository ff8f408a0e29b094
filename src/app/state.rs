use crate::catalog::{SearchOutcome, TrackSummary};
use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    Input,
    Results,
}

/// What the results area shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsPanel {
    #[default]
    Idle,
    Loading,
    Results(Vec<TrackSummary>),
    NoResults,
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub panel: ResultsPanel,
    pub selected: usize,
    pub scroll_offset: usize,
    /// Id of the most recent search; older completions are ignored.
    query_id: u64,
}

impl SearchState {
    /// Start a search for the current input. Returns the id and trimmed query,
    /// or `None` when there is nothing to search for.
    pub fn begin(&mut self) -> Option<(u64, String)> {
        let query = self.query.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();
        self.query_id += 1;
        self.panel = ResultsPanel::Loading;
        self.selected = 0;
        self.scroll_offset = 0;
        Some((self.query_id, query))
    }

    /// Apply a finished search. Returns `false` for a superseded one.
    pub fn finish(&mut self, query_id: u64, outcome: SearchOutcome) -> bool {
        if query_id != self.query_id {
            return false;
        }
        self.panel = match outcome {
            SearchOutcome::Results(tracks) => ResultsPanel::Results(tracks),
            SearchOutcome::NoResults => ResultsPanel::NoResults,
            SearchOutcome::Failed(msg) => ResultsPanel::Error(msg),
        };
        true
    }

    pub fn tracks(&self) -> &[TrackSummary] {
        match &self.panel {
            ResultsPanel::Results(tracks) => tracks,
            _ => &[],
        }
    }

    pub fn selected_track(&self) -> Option<&TrackSummary> {
        self.tracks().get(self.selected)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.tracks().len() {
            self.selected = index;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let len = self.tracks().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_last(&mut self) {
        self.selected = self.tracks().len().saturating_sub(1);
    }

    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected - visible_height + 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > std::time::Duration::from_secs(3)
    }
}

/// Screen regions from the last draw, for mouse hit testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitAreas {
    pub results: Option<Rect>,
    pub progress_bar: Option<Rect>,
}

pub struct AppState {
    pub should_quit: bool,
    pub tick: u64,

    pub search: SearchState,
    pub search_focus: SearchFocus,
    pub show_help: bool,
    /// First lyrics line shown; reset whenever a new track loads.
    pub lyrics_scroll: u16,

    pub toast: Option<Toast>,
    pub status: String,

    pub areas: HitAreas,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            tick: 0,
            search: SearchState::default(),
            search_focus: SearchFocus::Input,
            show_help: false,
            lyrics_scroll: 0,
            toast: None,
            status: String::new(),
            areas: HitAreas::default(),
        }
    }
}
