use crate::catalog::SearchOutcome;
use crate::lyrics::LyricsOutcome;
use crate::player::LoadTicket;

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Player(PlayerEvent),
    Network(NetworkEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize,
}

#[derive(Debug, Clone)]
pub enum PlayerEvent {
    Started,
    Paused,
    Position { seconds: f64 },
    Duration { seconds: f64 },
    /// End of file. `entry` is the backend's id for the finished source.
    Ended { entry: Option<u64> },
    /// A source could not be played.
    Error { entry: Option<u64>, message: String },
    /// Backend noise worth surfacing, but not a playback failure.
    Warning(String),
}

#[derive(Debug, Clone)]
pub enum NetworkEvent {
    SearchFinished { query_id: u64, query: String, outcome: SearchOutcome },
    LyricsResolved { ticket: LoadTicket, outcome: LyricsOutcome },
}
