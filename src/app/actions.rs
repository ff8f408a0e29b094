use super::state::SearchFocus;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    SetSearchFocus(SearchFocus),
    ToggleHelp,

    ListUp,
    ListDown,
    GoTop,
    GoBottom,
    /// Play the selected search result.
    Activate,
    /// Select and play a search result by row.
    ActivateRow(usize),

    InputChar(char),
    Backspace,
    ClearInput,
    StartSearch,

    TogglePause,
    PlayNext,
    PlayPrev,
    VolumeUp,
    VolumeDown,
    SeekForward,
    SeekBack,
    /// Click on the progress bar, `x` columns into a bar `width` wide.
    SeekTo { x: u16, width: u16 },

    LyricsUp,
    LyricsDown,

    Resize,
}
