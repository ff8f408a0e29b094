//! Best-effort lyrics lookup against the catalog.
//!
//! The catalog search result that started playback doesn't carry lyrics, so we
//! search again with a structured `artist:".." track:".."` query built from a
//! cleaned-up title, take the first hit and read its detail record.

pub mod normalize;

pub use normalize::normalize_title;

use crate::catalog::Catalog;
use anyhow::Context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsOutcome {
    Found(String),
    /// The structured search had no hits.
    NotFound,
    /// A track matched but has no lyric text.
    Unavailable,
    /// Transport or decoding failure at either step.
    Failed,
}

impl LyricsOutcome {
    /// Status text for outcomes without lyrics.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            LyricsOutcome::Found(_) => None,
            LyricsOutcome::NotFound => Some("Track not found on Deezer"),
            LyricsOutcome::Unavailable => Some("No lyrics available for this track"),
            LyricsOutcome::Failed => Some("Couldn't load lyrics"),
        }
    }
}

pub fn structured_query(artist: &str, title: &str) -> String {
    format!(r#"artist:"{artist}" track:"{title}""#)
}

/// Resolve lyrics for `artist` / `raw_title`. Never fails: errors turn into
/// [`LyricsOutcome::Failed`] after being logged.
pub async fn resolve_lyrics<C: Catalog>(catalog: &C, artist: &str, raw_title: &str) -> LyricsOutcome {
    match lookup(catalog, artist, raw_title).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(%artist, title = %raw_title, "lyrics lookup failed: {e:#}");
            LyricsOutcome::Failed
        }
    }
}

async fn lookup<C: Catalog>(catalog: &C, artist: &str, raw_title: &str) -> anyhow::Result<LyricsOutcome> {
    let title = normalize_title(raw_title);
    let query = structured_query(artist, &title);

    let hits = catalog.search(&query).await.context("lyrics search")?;
    // Catalog order only; no scoring of our own.
    let Some(first) = hits.first() else {
        tracing::debug!(%query, "no catalog match for lyrics");
        return Ok(LyricsOutcome::NotFound);
    };

    let detail = catalog
        .track(first.id)
        .await
        .with_context(|| format!("lyrics detail for track {}", first.id))?;
    tracing::debug!(id = detail.track.id, title = %detail.track.title, "lyrics source track");

    Ok(match detail.lyrics {
        Some(text) => LyricsOutcome::Found(text),
        None => LyricsOutcome::Unavailable,
    })
}
