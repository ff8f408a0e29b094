use serde::{Deserialize, Serialize};

/// A search hit, flattened from the catalog's nested track record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub id: u64,
    pub title: String,
    pub short_title: Option<String>,
    pub artist_name: String,
    pub cover_small: Option<String>,
    pub cover_medium: Option<String>,
    pub cover_big: Option<String>,
    pub preview_url: String,
}

impl TrackSummary {
    /// Title used in result lists; the catalog's short form when it has one.
    pub fn display_title(&self) -> &str {
        match self.short_title.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => &self.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackDetail {
    pub track: TrackSummary,
    pub lyrics: Option<String>,
}

// Wire format of `/search` and `/track/<id>`.

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub data: Vec<WireTrack>,
    pub error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireError {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTrack {
    pub id: u64,
    pub title: String,
    pub title_short: Option<String>,
    pub artist: WireArtist,
    #[serde(default)]
    pub album: WireAlbum,
    #[serde(default)]
    pub preview: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireArtist {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireAlbum {
    pub cover_small: Option<String>,
    pub cover_medium: Option<String>,
    pub cover_big: Option<String>,
}

/// The parts of `/track/<id>` read on top of the summary fields.
#[derive(Debug, Deserialize)]
pub(crate) struct TrackExtras {
    pub lyrics: Option<WireLyrics>,
    pub error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLyrics {
    pub lyrics: Option<String>,
}

impl From<WireTrack> for TrackSummary {
    fn from(t: WireTrack) -> Self {
        Self {
            id: t.id,
            title: t.title,
            short_title: t.title_short,
            artist_name: t.artist.name,
            cover_small: t.album.cover_small,
            cover_medium: t.album.cover_medium,
            cover_big: t.album.cover_big,
            preview_url: t.preview,
        }
    }
}
