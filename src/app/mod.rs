pub mod actions;
pub mod events;
pub mod state;

use crate::catalog::{CatalogClient, SearchOutcome, TrackSummary};
use crate::config::Config;
use crate::input::{self, Bindings};
use crate::player::mpv::MpvAudio;
use crate::player::{AudioElement, DetachedAudio, LoadTicket, PlaybackController};
use crate::playlist::{self, Playlist};
use crate::tui::{self, TuiTerminal};
use actions::Action;
use events::{Event, NetworkEvent, PlayerEvent};
use state::{AppState, ResultsPanel, SearchFocus, Toast};
use tokio::sync::mpsc;

pub type Player = PlaybackController<Box<dyn AudioElement>>;

pub struct App {
    cfg: Config,
    state: AppState,
    bindings: Bindings,
    catalog: CatalogClient,
    player: Player,
}

impl App {
    pub fn new(cfg: Config) -> anyhow::Result<Self> {
        let catalog = CatalogClient::new(&cfg.catalog)?;
        let player = PlaybackController::new(Box::new(DetachedAudio) as Box<dyn AudioElement>, cfg.player.volume);

        Ok(Self {
            cfg,
            state: AppState::new(),
            bindings: Bindings::new(),
            catalog,
            player,
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone());

        // Without mpv the player still browses and shows lyrics; play is refused.
        let mpv_log = self.cfg.paths.data_dir.join("mpv.log");
        match MpvAudio::spawn(
            tx.clone(),
            self.cfg.player.audio_device.as_deref(),
            Some(mpv_log.as_path()),
            self.player.volume(),
        )
        .await
        {
            Ok(h) => self.player.attach(Box::new(h)),
            Err(e) => {
                tracing::warn!("mpv unavailable: {e:#}");
                self.state.toast = Some(Toast::error(format!("mpv disabled: {e:#}")));
            }
        }

        self.load_playlist();

        tui::draw(terminal, &mut self.state, &self.player)?;

        while let Some(ev) = rx.recv().await {
            match ev {
                Event::Input(input_ev) => {
                    if let Some(action) = self.bindings.map(&self.state, input_ev) {
                        self.handle_action(action, &tx);
                    }
                }
                Event::Player(pe) => self.handle_player(pe),
                Event::Network(ne) => self.handle_network(ne),
            }

            if self.state.should_quit {
                break;
            }

            self.state.tick = self.state.tick.wrapping_add(1);
            tui::draw(terminal, &mut self.state, &self.player)?;
        }

        Ok(())
    }

    /// Read the local playlist and cue its first song. A missing or broken
    /// file leaves the player empty.
    fn load_playlist(&mut self) {
        let path = self.cfg.playlist_path();
        if self.cfg.playlist.path.is_none() && !path.exists() {
            tracing::info!(path = %path.display(), "no local playlist");
            self.state.status = format!("No local playlist at {}", path.display());
            return;
        }
        match playlist::load_songs(&path) {
            Ok(songs) if songs.is_empty() => {
                self.state.status = "Local playlist is empty".into();
            }
            Ok(songs) => {
                let count = songs.len();
                self.player.populate(Playlist::new(songs));
                self.state.toast = Some(Toast::success(format!("Loaded {count} local songs")));
            }
            Err(e) => {
                tracing::warn!("failed to load playlist: {e:#}");
                self.state.toast = Some(Toast::error(format!("Playlist not loaded: {e:#}")));
            }
        }
    }

    fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::SetSearchFocus(focus) => self.state.search_focus = focus,
            Action::ToggleHelp => self.state.show_help = !self.state.show_help,

            Action::ListUp => {
                self.state.search.select_prev();
                self.update_scroll();
            }
            Action::ListDown => {
                self.state.search.select_next();
                self.update_scroll();
            }
            Action::GoTop => {
                self.state.search.select(0);
                self.update_scroll();
            }
            Action::GoBottom => {
                self.state.search.select_last();
                self.update_scroll();
            }
            Action::Activate => {
                if let Some(track) = self.state.search.selected_track().cloned() {
                    self.play_remote(track, tx);
                }
            }
            Action::ActivateRow(row) => {
                if let Some(track) = self.state.search.tracks().get(row).cloned() {
                    self.state.search.select(row);
                    self.play_remote(track, tx);
                }
            }

            Action::InputChar(c) => self.state.search.query.push(c),
            Action::Backspace => {
                self.state.search.query.pop();
            }
            Action::ClearInput => self.state.search.query.clear(),
            Action::StartSearch => self.spawn_search(tx),

            Action::TogglePause => self.player.toggle(),
            Action::PlayNext => self.step_playlist(1),
            Action::PlayPrev => self.step_playlist(-1),
            Action::VolumeUp => {
                let v = self.player.volume_up();
                self.state.status = format!("Volume {v}%");
            }
            Action::VolumeDown => {
                let v = self.player.volume_down();
                self.state.status = format!("Volume {v}%");
            }
            Action::SeekForward => self.player.seek_relative(10.0),
            Action::SeekBack => self.player.seek_relative(-10.0),
            Action::SeekTo { x, width } => {
                self.player.seek_to_fraction(f64::from(x), f64::from(width));
            }

            Action::LyricsUp => {
                self.state.lyrics_scroll = self.state.lyrics_scroll.saturating_sub(5);
            }
            Action::LyricsDown => {
                self.state.lyrics_scroll = self.state.lyrics_scroll.saturating_add(5);
            }

            Action::Resize => {}
        }
    }

    fn update_scroll(&mut self) {
        let visible = self
            .state
            .areas
            .results
            .map(|r| r.height as usize)
            .unwrap_or(10);
        self.state.search.update_scroll(visible);
    }

    fn step_playlist(&mut self, direction: i64) {
        match self.player.advance(direction) {
            Some(_) => self.state.lyrics_scroll = 0,
            None => self.state.status = "No local playlist loaded".into(),
        }
    }

    /// Load a search result, start it, and look up its lyrics in the background.
    fn play_remote(&mut self, track: TrackSummary, tx: &mpsc::Sender<Event>) {
        let artist = track.artist_name.clone();
        let title = track.title.clone();

        let ticket = self.player.load_remote(track);
        self.state.lyrics_scroll = 0;
        if !self.player.play() {
            self.state.toast = Some(Toast::error("Error playing track"));
        }
        self.spawn_lyrics(ticket, artist, title, tx);
    }

    fn spawn_search(&mut self, tx: &mpsc::Sender<Event>) {
        let Some((query_id, query)) = self.state.search.begin() else {
            self.state.status = "Type a query first".into();
            return;
        };
        self.state.status = format!("Searching: {query}");
        tracing::info!(%query, query_id, "search");

        let catalog = self.catalog.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = SearchOutcome::from_result(catalog.search(&query).await);
            let _ = tx
                .send(Event::Network(NetworkEvent::SearchFinished {
                    query_id,
                    query,
                    outcome,
                }))
                .await;
        });
    }

    fn spawn_lyrics(&self, ticket: LoadTicket, artist: String, title: String, tx: &mpsc::Sender<Event>) {
        let catalog = self.catalog.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = crate::lyrics::resolve_lyrics(&catalog, &artist, &title).await;
            let _ = tx
                .send(Event::Network(NetworkEvent::LyricsResolved { ticket, outcome }))
                .await;
        });
    }

    fn handle_player(&mut self, pe: PlayerEvent) {
        match pe {
            PlayerEvent::Started => self.player.on_pause_changed(false),
            PlayerEvent::Paused => self.player.on_pause_changed(true),
            PlayerEvent::Position { seconds } => self.player.on_time_update(seconds),
            PlayerEvent::Duration { seconds } => self.player.on_duration(seconds),
            PlayerEvent::Ended { entry } => {
                if self.player.on_ended(entry).is_some() {
                    self.state.lyrics_scroll = 0;
                }
            }
            PlayerEvent::Error { entry, message } => {
                if self.player.on_playback_error(entry, &message) {
                    self.state.toast = Some(Toast::error(message));
                }
            }
            PlayerEvent::Warning(w) => {
                tracing::debug!("{w}");
                self.state.status = w;
            }
        }
    }

    fn handle_network(&mut self, ne: NetworkEvent) {
        match ne {
            NetworkEvent::SearchFinished {
                query_id,
                query,
                outcome,
            } => {
                if !self.state.search.finish(query_id, outcome) {
                    tracing::debug!(%query, query_id, "dropping superseded search");
                    return;
                }
                self.state.status = match &self.state.search.panel {
                    ResultsPanel::Results(tracks) => {
                        self.state.search_focus = SearchFocus::Results;
                        format!("Results for \"{query}\": {}", tracks.len())
                    }
                    ResultsPanel::NoResults => format!("No results for \"{query}\""),
                    ResultsPanel::Error(_) => "Search failed".into(),
                    ResultsPanel::Idle | ResultsPanel::Loading => String::new(),
                };
            }
            NetworkEvent::LyricsResolved { ticket, outcome } => {
                self.player.apply_lyrics(ticket, outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::LyricsOutcome;
    use crate::player::{LyricsPanel, TrackSource};
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Records the calls made on the audio element, in order.
    #[derive(Clone, Default)]
    struct RecordingAudio {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingAudio {
        fn log(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl AudioElement for RecordingAudio {
        fn set_source(&mut self, url: &str) -> anyhow::Result<()> {
            self.log(format!("set_source {url}"));
            Ok(())
        }
        fn play(&mut self) -> anyhow::Result<()> {
            self.log("play".into());
            Ok(())
        }
        fn pause(&mut self) -> anyhow::Result<()> {
            self.log("pause".into());
            Ok(())
        }
        fn seek(&mut self, _seconds: f64) -> anyhow::Result<()> {
            Ok(())
        }
        fn seek_relative(&mut self, _seconds: f64) -> anyhow::Result<()> {
            Ok(())
        }
        fn set_volume(&mut self, _volume: u8) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn app(data_dir: &Path) -> App {
        let mut cfg = Config::default();
        // Nothing listens here, so catalog lookups fail fast.
        cfg.catalog.base_url = "http://127.0.0.1:9".into();
        cfg.catalog.proxy = String::new();
        cfg.catalog.timeout_secs = 1;
        cfg.paths.data_dir = data_dir.to_path_buf();
        App::new(cfg).unwrap()
    }

    fn track(id: u64) -> TrackSummary {
        TrackSummary {
            id,
            title: format!("Track {id}"),
            short_title: None,
            artist_name: "Artist".into(),
            cover_small: None,
            cover_medium: None,
            cover_big: None,
            preview_url: format!("https://cdn.test/{id}.mp3"),
        }
    }

    #[tokio::test]
    async fn test_play_remote_loads_plays_then_fetches_lyrics() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        let audio = RecordingAudio::default();
        let calls = audio.calls.clone();
        app.player.attach(Box::new(audio));
        let (tx, mut rx) = mpsc::channel(8);

        app.state.lyrics_scroll = 12;
        app.play_remote(track(7), &tx);

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["set_source https://cdn.test/7.mp3".to_string(), "play".to_string()]
        );
        assert!(app.player.state().is_playing);
        assert_eq!(app.player.view().lyrics, LyricsPanel::Loading);
        assert_eq!(app.state.lyrics_scroll, 0);

        let ev = tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .unwrap()
            .unwrap();
        let (ticket, outcome) = match ev {
            Event::Network(NetworkEvent::LyricsResolved { ticket, outcome }) => (ticket, outcome),
            other => panic!("expected a lyrics result, got {other:?}"),
        };
        assert!(app.player.is_current(ticket));
        assert_eq!(outcome, LyricsOutcome::Failed);

        app.handle_network(NetworkEvent::LyricsResolved { ticket, outcome });
        assert_eq!(
            app.player.view().lyrics,
            LyricsPanel::Notice("Couldn't load lyrics".into())
        );
    }

    #[test]
    fn test_superseded_search_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        app.state.search.query = "daft".into();
        let (first, _) = app.state.search.begin().unwrap();
        app.state.search.query = "daft punk".into();
        let (second, _) = app.state.search.begin().unwrap();

        app.handle_network(NetworkEvent::SearchFinished {
            query_id: first,
            query: "daft".into(),
            outcome: SearchOutcome::Results(vec![track(1)]),
        });
        assert_eq!(app.state.search.panel, ResultsPanel::Loading);
        assert_eq!(app.state.search_focus, SearchFocus::Input);

        app.handle_network(NetworkEvent::SearchFinished {
            query_id: second,
            query: "daft punk".into(),
            outcome: SearchOutcome::Results(vec![track(2), track(3)]),
        });
        assert_eq!(app.state.search.tracks()[0].id, 2);
        assert_eq!(app.state.search_focus, SearchFocus::Results);
        assert_eq!(app.state.status, "Results for \"daft punk\": 2");
    }

    #[test]
    fn test_lyrics_for_replaced_track_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        let old = app.player.load_remote(track(1));
        let new = app.player.load_remote(track(2));

        app.handle_network(NetworkEvent::LyricsResolved {
            ticket: old,
            outcome: LyricsOutcome::Found("old words".into()),
        });
        assert_eq!(app.player.view().lyrics, LyricsPanel::Loading);

        app.handle_network(NetworkEvent::LyricsResolved {
            ticket: new,
            outcome: LyricsOutcome::Found("new words".into()),
        });
        assert_eq!(app.player.view().lyrics, LyricsPanel::Lyrics("new words".into()));
    }

    #[test]
    fn test_playlist_loads_from_data_dir_by_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("songs.json"),
            r#"[{"path":"a.mp3","displayName":"Alpha","artist":"Band"}]"#,
        )
        .unwrap();
        let mut app = app(dir.path());

        app.load_playlist();
        assert_eq!(app.player.playlist().len(), 1);
        assert_eq!(app.player.state().source, Some(TrackSource::Local(0)));
        assert!(!app.player.state().is_playing);
    }

    #[test]
    fn test_missing_default_playlist_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        app.load_playlist();
        assert!(app.player.state().source.is_none());
        assert!(app.state.status.starts_with("No local playlist at"));
        assert!(app.state.toast.is_none());
    }
}
