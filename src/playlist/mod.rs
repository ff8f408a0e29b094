//! Local playlist: a static JSON list of songs, loaded once at startup.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One entry of the playlist file:
///
/// ```json
/// [{ "path": "music/a.mp3", "displayName": "A", "artist": "B", "cover": "img/a.jpg", "lyrics": "..." }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSong {
    pub path: String,
    pub display_name: String,
    pub artist: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub lyrics: Option<String>,
}

/// Read the playlist file. Relative song and cover paths are resolved against
/// the file's own directory; URLs are kept as they are.
pub fn load_songs(path: &Path) -> anyhow::Result<Vec<LocalSong>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let mut songs: Vec<LocalSong> =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for song in &mut songs {
        song.path = resolve_location(base, &song.path);
        if !song.cover.is_empty() {
            song.cover = resolve_location(base, &song.cover);
        }
    }
    tracing::info!(count = songs.len(), file = %path.display(), "loaded local playlist");
    Ok(songs)
}

fn resolve_location(base: &Path, location: &str) -> String {
    if location.contains("://") || Path::new(location).is_absolute() {
        return location.to_string();
    }
    base.join(location).to_string_lossy().into_owned()
}

/// Playlist position arithmetic. Unlike a queue, it wraps at both ends.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    songs: Vec<LocalSong>,
}

impl Playlist {
    pub fn new(songs: Vec<LocalSong>) -> Self {
        Self { songs }
    }

    pub fn get(&self, index: usize) -> Option<&LocalSong> {
        self.songs.get(index)
    }

    pub fn songs(&self) -> &[LocalSong] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// `(index + direction + len) mod len`, for any direction.
    pub fn step(&self, index: usize, direction: i64) -> Option<usize> {
        if self.songs.is_empty() {
            return None;
        }
        let len = self.songs.len() as i64;
        Some((index as i64 + direction).rem_euclid(len) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(name: &str) -> LocalSong {
        LocalSong {
            path: format!("{name}.mp3"),
            display_name: name.to_string(),
            artist: "Artist".to_string(),
            cover: String::new(),
            lyrics: None,
        }
    }

    #[test]
    fn test_step_wraps_both_ways() {
        let pl = Playlist::new(vec![song("a"), song("b"), song("c")]);
        assert_eq!(pl.step(0, -1), Some(2));
        assert_eq!(pl.step(2, 1), Some(0));
        assert_eq!(pl.step(1, 1), Some(2));
        assert_eq!(pl.step(1, -1), Some(0));
        assert_eq!(pl.step(0, -4), Some(2));
    }

    #[test]
    fn test_step_empty() {
        assert_eq!(Playlist::default().step(0, 1), None);
    }

    #[test]
    fn test_load_songs_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("songs.json");
        fs::write(
            &file,
            r#"[
                {"path": "music/one.mp3", "displayName": "One", "artist": "X", "cover": "img/one.jpg", "lyrics": "hello"},
                {"path": "https://cdn.test/two.mp3", "displayName": "Two", "artist": "Y", "cover": "https://cdn.test/two.jpg"}
            ]"#,
        )
        .unwrap();

        let songs = load_songs(&file).unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(
            songs[0].path,
            dir.path().join("music/one.mp3").to_string_lossy()
        );
        assert_eq!(songs[0].cover, dir.path().join("img/one.jpg").to_string_lossy());
        assert_eq!(songs[0].lyrics.as_deref(), Some("hello"));
        assert_eq!(songs[1].path, "https://cdn.test/two.mp3");
        assert_eq!(songs[1].display_name, "Two");
        assert!(songs[1].lyrics.is_none());
    }

    #[test]
    fn test_load_songs_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_songs(&dir.path().join("missing.json")).is_err());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(load_songs(&bad).is_err());
    }
}
