use crate::catalog::TrackSummary;
use crate::lyrics::LyricsOutcome;
use crate::player::{progress, AudioElement, Progress};
use crate::playlist::{LocalSong, Playlist};

const PLAYBACK_ERROR: &str = "Error playing track";
const NO_LOCAL_LYRICS: &str = "No lyrics available";

#[derive(Debug, Clone, PartialEq)]
pub enum TrackSource {
    Remote(TrackSummary),
    /// Index into the local playlist.
    Local(usize),
}

#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    /// Local playlist position; kept while a remote track is playing so
    /// next/prev resume from where the playlist was.
    pub current_index: usize,
    pub is_playing: bool,
    pub source: Option<TrackSource>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LyricsPanel {
    #[default]
    Empty,
    Loading,
    Lyrics(String),
    Notice(String),
}

/// Everything the UI shows about the loaded track.
#[derive(Debug, Clone, Default)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub cover: Option<String>,
    pub background: Option<String>,
    pub lyrics: LyricsPanel,
    pub position_secs: f64,
    pub duration_secs: Option<f64>,
}

/// Identity of one track load. Async work started for a load carries its
/// ticket and is dropped if another load happened in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

pub struct PlaybackController<A> {
    audio: A,
    playlist: Playlist,
    state: PlayerState,
    view: NowPlaying,
    generation: u64,
    volume: u8,
}

impl<A: AudioElement> PlaybackController<A> {
    pub fn new(audio: A, volume: u8) -> Self {
        Self {
            audio,
            playlist: Playlist::default(),
            state: PlayerState::default(),
            view: NowPlaying::default(),
            generation: 0,
            volume: volume.min(100),
        }
    }

    /// Swap in a different backend. Takes effect from the next load; the
    /// current volume is pushed to it right away.
    pub fn attach(&mut self, audio: A) {
        self.audio = audio;
        let volume = self.volume;
        self.set_volume(volume);
    }

    /// Install the local playlist and load (not play) its first entry.
    pub fn populate(&mut self, playlist: Playlist) -> Option<LoadTicket> {
        self.playlist = playlist;
        self.load_local(0)
    }

    /// Load a catalog search result. Lyrics start out as `Loading`; the caller
    /// resolves them and hands the result back through [`apply_lyrics`](Self::apply_lyrics).
    pub fn load_remote(&mut self, track: TrackSummary) -> LoadTicket {
        tracing::info!(id = track.id, title = %track.title, "loading catalog track");
        self.set_source(&track.preview_url);

        self.view = NowPlaying {
            title: track.title.clone(),
            artist: track.artist_name.clone(),
            cover: track.cover_medium.clone(),
            background: track.cover_big.clone(),
            lyrics: LyricsPanel::Loading,
            position_secs: 0.0,
            duration_secs: None,
        };
        self.state.is_playing = false;
        self.state.source = Some(TrackSource::Remote(track));
        self.next_ticket()
    }

    /// Load a playlist entry. Its lyrics, if any, are shown right away.
    pub fn load_local(&mut self, index: usize) -> Option<LoadTicket> {
        let song: LocalSong = self.playlist.get(index)?.clone();
        tracing::info!(index, title = %song.display_name, "loading local track");
        self.set_source(&song.path);

        let cover = Some(song.cover).filter(|c| !c.is_empty());
        self.view = NowPlaying {
            title: song.display_name,
            artist: song.artist,
            background: cover.clone(),
            cover,
            lyrics: match song.lyrics {
                Some(text) if !text.trim().is_empty() => LyricsPanel::Lyrics(text),
                _ => LyricsPanel::Notice(NO_LOCAL_LYRICS.to_string()),
            },
            position_secs: 0.0,
            duration_secs: None,
        };
        self.state.current_index = index;
        self.state.is_playing = false;
        self.state.source = Some(TrackSource::Local(index));
        Some(self.next_ticket())
    }

    /// Returns whether playback actually started.
    pub fn play(&mut self) -> bool {
        if self.state.source.is_none() {
            return false;
        }
        match self.audio.play() {
            Ok(()) => {
                self.state.is_playing = true;
                true
            }
            Err(e) => {
                tracing::warn!("playback refused: {e:#}");
                self.state.is_playing = false;
                self.view.lyrics = LyricsPanel::Notice(PLAYBACK_ERROR.to_string());
                false
            }
        }
    }

    pub fn pause(&mut self) {
        if let Err(e) = self.audio.pause() {
            tracing::warn!("pause failed: {e:#}");
        }
        self.state.is_playing = false;
    }

    pub fn toggle(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move through the local playlist, wrapping at both ends. Playback resumes
    /// on the new track if something was playing before.
    pub fn advance(&mut self, direction: i64) -> Option<LoadTicket> {
        let was_playing = self.state.is_playing;
        let next = self.playlist.step(self.state.current_index, direction)?;
        let ticket = self.load_local(next)?;
        if was_playing {
            self.play();
        }
        Some(ticket)
    }

    /// The backend finished a source. Moves on through the local playlist;
    /// with nothing to move to, the finished track is cued again from the
    /// start so a later play restarts it.
    pub fn on_ended(&mut self, entry: Option<u64>) -> Option<LoadTicket> {
        if !self.is_backend_current(entry) {
            tracing::debug!(?entry, "ignoring end of a replaced source");
            return None;
        }
        if let Some(ticket) = self.advance(1) {
            return Some(ticket);
        }
        self.state.is_playing = false;
        // An idle mpv unloads the file at EOF.
        if let Some(url) = self.current_url() {
            self.set_source(&url);
        }
        self.view.position_secs = 0.0;
        None
    }

    pub fn on_time_update(&mut self, seconds: f64) {
        self.view.position_secs = seconds;
    }

    pub fn on_duration(&mut self, seconds: f64) {
        self.view.duration_secs = Some(seconds);
    }

    /// The backend paused or resumed on its own (or confirmed our request).
    pub fn on_pause_changed(&mut self, paused: bool) {
        if self.state.source.is_some() {
            self.state.is_playing = !paused;
        }
    }

    /// The backend gave up on a source. Returns `false` when the failure
    /// belongs to a source that has since been replaced.
    pub fn on_playback_error(&mut self, entry: Option<u64>, message: &str) -> bool {
        if !self.is_backend_current(entry) {
            tracing::debug!(?entry, %message, "ignoring error for a replaced source");
            return false;
        }
        tracing::warn!(%message, "playback error");
        self.state.is_playing = false;
        self.view.lyrics = LyricsPanel::Notice(PLAYBACK_ERROR.to_string());
        true
    }

    pub fn progress(&self) -> Progress {
        progress(self.view.position_secs, self.view.duration_secs)
    }

    /// Seek to where a click landed on a progress bar `width` wide.
    /// Ignored while the duration is unknown.
    pub fn seek_to_fraction(&mut self, x: f64, width: f64) -> Option<f64> {
        let duration = self
            .view
            .duration_secs
            .filter(|d| d.is_finite() && *d > 0.0)?;
        if width.is_nan() || width <= 0.0 || !x.is_finite() {
            return None;
        }
        let target = (x.clamp(0.0, width) / width) * duration;
        if let Err(e) = self.audio.seek(target) {
            tracing::warn!("seek failed: {e:#}");
            return None;
        }
        self.view.position_secs = target;
        Some(target)
    }

    pub fn seek_relative(&mut self, seconds: f64) {
        if self.state.source.is_none() {
            return;
        }
        if let Err(e) = self.audio.seek_relative(seconds) {
            tracing::warn!("seek failed: {e:#}");
        }
    }

    pub fn volume_up(&mut self) -> u8 {
        self.set_volume(self.volume.saturating_add(5).min(100))
    }

    pub fn volume_down(&mut self) -> u8 {
        self.set_volume(self.volume.saturating_sub(5))
    }

    /// Apply a lyrics result if `ticket` still names the loaded track.
    pub fn apply_lyrics(&mut self, ticket: LoadTicket, outcome: LyricsOutcome) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(?ticket, "dropping lyrics for a track no longer loaded");
            return false;
        }
        self.view.lyrics = match outcome {
            LyricsOutcome::Found(text) => LyricsPanel::Lyrics(text),
            other => LyricsPanel::Notice(other.notice().unwrap_or_default().to_string()),
        };
        true
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn view(&self) -> &NowPlaying {
        &self.view
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    fn is_backend_current(&self, entry: Option<u64>) -> bool {
        entry.is_none_or(|e| self.audio.is_current_entry(e))
    }

    fn current_url(&self) -> Option<String> {
        match self.state.source.as_ref()? {
            TrackSource::Remote(track) => Some(track.preview_url.clone()),
            TrackSource::Local(index) => self.playlist.get(*index).map(|s| s.path.clone()),
        }
    }

    fn set_source(&mut self, url: &str) {
        if let Err(e) = self.audio.set_source(url) {
            tracing::warn!(%url, "set source failed: {e:#}");
        }
    }

    fn set_volume(&mut self, volume: u8) -> u8 {
        self.volume = volume;
        if let Err(e) = self.audio.set_volume(volume) {
            tracing::warn!("set volume failed: {e:#}");
        }
        volume
    }

    fn next_ticket(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }
}
