use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::{AppState, SearchFocus};
use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use std::collections::HashMap;
use tokio::sync::mpsc;

pub fn spawn_input_task(tx: mpsc::Sender<Event>) {
    tokio::task::spawn_blocking(move || {
        loop {
            if event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                let ev = match event::read() {
                    Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => InputEvent::Key(k),
                    Ok(CtEvent::Mouse(m)) => InputEvent::Mouse(m),
                    Ok(CtEvent::Resize(_, _)) => InputEvent::Resize,
                    _ => continue,
                };
                if tx.blocking_send(Event::Input(ev)).is_err() {
                    break;
                }
            }
        }
    });
}

type Chord = (KeyCode, KeyModifiers);

/// Key bindings, built once at startup. Typing into the search box is handled
/// outside the table since any printable key is input there.
#[derive(Debug, Clone)]
pub struct Bindings {
    search_input: HashMap<Chord, Action>,
    player: HashMap<Chord, Action>,
    help: HashMap<Chord, Action>,
}

impl Default for Bindings {
    fn default() -> Self {
        Self::new()
    }
}

impl Bindings {
    pub fn new() -> Self {
        let none = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;

        let search_input = HashMap::from([
            ((KeyCode::Enter, none), Action::StartSearch),
            ((KeyCode::Backspace, none), Action::Backspace),
            ((KeyCode::Char('u'), ctrl), Action::ClearInput),
            ((KeyCode::Esc, none), Action::SetSearchFocus(SearchFocus::Results)),
            ((KeyCode::Tab, none), Action::SetSearchFocus(SearchFocus::Results)),
            ((KeyCode::Down, none), Action::SetSearchFocus(SearchFocus::Results)),
            ((KeyCode::Char('c'), ctrl), Action::Quit),
        ]);

        let player = HashMap::from([
            ((KeyCode::Char('q'), none), Action::Quit),
            ((KeyCode::Esc, none), Action::Quit),
            ((KeyCode::Char('c'), ctrl), Action::Quit),
            ((KeyCode::Char('/'), none), Action::SetSearchFocus(SearchFocus::Input)),
            ((KeyCode::Char('i'), none), Action::SetSearchFocus(SearchFocus::Input)),
            ((KeyCode::Tab, none), Action::SetSearchFocus(SearchFocus::Input)),
            ((KeyCode::Up, none), Action::ListUp),
            ((KeyCode::Char('k'), none), Action::ListUp),
            ((KeyCode::Down, none), Action::ListDown),
            ((KeyCode::Char('j'), none), Action::ListDown),
            ((KeyCode::Char('g'), none), Action::GoTop),
            ((KeyCode::Char('G'), none), Action::GoBottom),
            ((KeyCode::Enter, none), Action::Activate),
            ((KeyCode::Char(' '), none), Action::TogglePause),
            ((KeyCode::Char('n'), none), Action::PlayNext),
            ((KeyCode::Char('p'), none), Action::PlayPrev),
            ((KeyCode::Char(']'), none), Action::SeekForward),
            ((KeyCode::Char('['), none), Action::SeekBack),
            ((KeyCode::Char('+'), none), Action::VolumeUp),
            ((KeyCode::Char('='), none), Action::VolumeUp),
            ((KeyCode::Char('-'), none), Action::VolumeDown),
            ((KeyCode::Char('_'), none), Action::VolumeDown),
            ((KeyCode::PageUp, none), Action::LyricsUp),
            ((KeyCode::PageDown, none), Action::LyricsDown),
            ((KeyCode::Char('?'), none), Action::ToggleHelp),
        ]);

        let help = HashMap::from([
            ((KeyCode::Char('?'), none), Action::ToggleHelp),
            ((KeyCode::Esc, none), Action::ToggleHelp),
            ((KeyCode::Char('q'), none), Action::ToggleHelp),
            ((KeyCode::Char('c'), ctrl), Action::Quit),
        ]);

        Self {
            search_input,
            player,
            help,
        }
    }

    pub fn map(&self, state: &AppState, ev: InputEvent) -> Option<Action> {
        match ev {
            InputEvent::Resize => Some(Action::Resize),
            InputEvent::Mouse(m) => map_mouse(state, m),
            InputEvent::Key(k) => self.map_key(state, k),
        }
    }

    fn map_key(&self, state: &AppState, k: KeyEvent) -> Option<Action> {
        let chord = chord(&k);
        if state.show_help {
            return self.help.get(&chord).cloned();
        }
        if state.search_focus == SearchFocus::Input {
            if let Some(action) = self.search_input.get(&chord) {
                return Some(action.clone());
            }
            return match k.code {
                KeyCode::Char(c) if chord.1 == KeyModifiers::NONE => Some(Action::InputChar(c)),
                _ => None,
            };
        }
        self.player.get(&chord).cloned()
    }
}

/// Shift is already folded into the character for `Char` keys.
fn chord(k: &KeyEvent) -> Chord {
    let mut mods = k.modifiers;
    if matches!(k.code, KeyCode::Char(_)) {
        mods.remove(KeyModifiers::SHIFT);
    }
    (k.code, mods)
}

fn map_mouse(state: &AppState, m: MouseEvent) -> Option<Action> {
    match m.kind {
        MouseEventKind::ScrollUp => Some(Action::ListUp),
        MouseEventKind::ScrollDown => Some(Action::ListDown),
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(bar) = state.areas.progress_bar
                && contains(bar, m.column, m.row)
            {
                return Some(Action::SeekTo {
                    x: m.column - bar.x,
                    width: bar.width,
                });
            }
            if let Some(list) = state.areas.results
                && contains(list, m.column, m.row)
            {
                let row = state.search.scroll_offset + (m.row - list.y) as usize;
                return Some(Action::ActivateRow(row));
            }
            None
        }
        _ => None,
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
